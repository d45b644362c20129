// src/workbook.rs
//
// XLSX output. Building happens in two steps so the layout can be checked
// without reading a workbook back:
//   1. `plan_*` turns club tables into a `WorkbookPlan` (sheet names + rows).
//   2. `save` renders the plan with rust_xlsxwriter.

use std::{collections::HashMap, path::Path};

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use tracing::debug;

use crate::core::sanitize::{sanitize_sheet_name, SHEET_NAME_MAX};
use crate::data::header_row;
use crate::error::{Result, ScrapeError};
use crate::file::stem_of;
use crate::store::{clean_row, ClubTable};

pub const SINGLE_SHEET_NAME: &str = "All Clubs";
pub const TRAINERS_SHEET_NAME: &str = "Trainers";

/// Columns never grow wider than this many characters.
const MAX_COL_WIDTH: usize = 50;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SheetPlan {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkbookPlan {
    pub sheets: Vec<SheetPlan>,
}

impl WorkbookPlan {
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows.len()).sum()
    }
}

/// One sheet per club, named after the file stem.
pub fn plan_separate_sheets(tables: &[ClubTable]) -> WorkbookPlan {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let sheets = tables
        .iter()
        .map(|t| SheetPlan {
            name: resolve_sheet_name(&sanitize_sheet_name(&stem_of(&t.path)), &mut seen),
            headers: header_row(),
            rows: t.rows.iter().map(|r| clean_row(r)).collect(),
        })
        .collect();
    WorkbookPlan { sheets }
}

/// Everything on one sheet, header once, sorted by club, role, name.
pub fn plan_single_sheet(tables: &[ClubTable]) -> WorkbookPlan {
    let mut rows: Vec<Vec<String>> = tables
        .iter()
        .flat_map(|t| t.rows.iter().map(|r| clean_row(r)))
        .collect();
    // stable: equal keys keep file/document order
    rows.sort_by(|a, b| a[..3].cmp(&b[..3]));
    WorkbookPlan {
        sheets: vec![SheetPlan { name: s!(SINGLE_SHEET_NAME), headers: header_row(), rows }],
    }
}

/// Duplicate handling for sheet names: "<name>", then "<name> (2)", "<name> (3)"...
/// shortening the base so the suffixed name still fits Excel's limit.
/// Excel compares sheet names case-insensitively, so the bookkeeping does too.
fn resolve_sheet_name(base: &str, seen: &mut HashMap<String, usize>) -> String {
    let mut n = 1usize;
    loop {
        let candidate = if n == 1 {
            s!(base)
        } else {
            let suffix = format!(" ({n})");
            let keep = SHEET_NAME_MAX.saturating_sub(suffix.chars().count());
            let head: String = base.chars().take(keep).collect();
            join!(head.trim_end(), &suffix)
        };
        let key = candidate.to_lowercase();
        if !seen.contains_key(&key) {
            seen.insert(key, 1);
            return candidate;
        }
        n += 1;
    }
}

/// Render `plan` to `path`, overwriting. Header cells are bold and columns are
/// sized to their longest cell.
pub fn save(plan: &WorkbookPlan, path: &Path) -> Result<()> {
    let xl = |e: XlsxError| ScrapeError::workbook(path, e);
    let bold = Format::new().set_bold();
    let mut workbook = Workbook::new();

    for sheet in &plan.sheets {
        let ws = workbook.add_worksheet();
        ws.set_name(&sheet.name).map_err(xl)?;
        write_sheet(ws, sheet, &bold).map_err(xl)?;
        debug!("Sheet '{}' with {} rows", sheet.name, sheet.rows.len());
    }

    workbook.save(path).map_err(xl)?;
    Ok(())
}

fn write_sheet(ws: &mut Worksheet, sheet: &SheetPlan, bold: &Format) -> Result<(), XlsxError> {
    let mut widths: Vec<usize> = sheet.headers.iter().map(|h| h.chars().count()).collect();

    for (col, h) in sheet.headers.iter().enumerate() {
        ws.write_string_with_format(0, col as u16, h, bold)?;
    }
    for (r, row) in sheet.rows.iter().enumerate() {
        for (col, cell) in row.iter().enumerate() {
            ws.write_string(r as u32 + 1, col as u16, cell)?;
            if let Some(w) = widths.get_mut(col) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }
    for (col, w) in widths.iter().enumerate() {
        let width = (w + 2).min(MAX_COL_WIDTH);
        ws.set_column_width(col as u16, width as f64)?;
    }
    ws.set_freeze_panes(1, 0)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn table(stem: &str, club: &str, names: &[&str]) -> ClubTable {
        ClubTable {
            path: PathBuf::from(format!("/tmp/{stem}.csv")),
            club: s!(club),
            rows: names
                .iter()
                .map(|n| vec![s!(club), s!("Coach"), s!(*n), s!(""), s!(""), s!("")])
                .collect(),
        }
    }

    #[test]
    fn separate_sheets_keep_per_club_counts() {
        let plan = plan_separate_sheets(&[
            table("FC A", "FC A", &["a1", "a2", "a3"]),
            table("FC B", "FC B", &["b1", "b2", "b3", "b4", "b5"]),
        ]);
        let counts: Vec<(&str, usize)> = plan.sheets.iter().map(|s| (s.name.as_str(), s.rows.len())).collect();
        assert_eq!(counts, vec![("FC A", 3), ("FC B", 5)]);
        assert!(plan.sheets.iter().all(|s| s.headers == header_row()));
    }

    #[test]
    fn single_sheet_concatenates_with_one_header() {
        let plan = plan_single_sheet(&[
            table("b", "FC B", &["z", "y", "x"]),
            table("a", "FC A", &["q", "r", "s", "t", "u"]),
        ]);
        assert_eq!(plan.sheets.len(), 1);
        assert_eq!(plan.sheets[0].name, SINGLE_SHEET_NAME);
        assert_eq!(plan.total_rows(), 8);
        // sorted by club then role then name
        assert_eq!(plan.sheets[0].rows[0][0], "FC A");
        assert_eq!(plan.sheets[0].rows[5][2], "x");
    }

    #[test]
    fn blanks_are_cleaned_in_sheets() {
        let plan = plan_separate_sheets(&[table("a", "FC A", &["n"])]);
        assert_eq!(plan.sheets[0].rows[0][5], crate::data::NA);
    }

    #[test]
    fn truncated_sheet_names_are_deduplicated() {
        let mut seen = HashMap::new();
        let base = "Association Sportive du Haut-Va";
        assert_eq!(resolve_sheet_name(base, &mut seen), base);
        let second = resolve_sheet_name(base, &mut seen);
        assert_eq!(second, "Association Sportive du Hau (2)");
        assert!(second.chars().count() <= SHEET_NAME_MAX);
        assert_eq!(resolve_sheet_name("fc a", &mut seen), "fc a");
        assert_eq!(resolve_sheet_name("FC A", &mut seen), "FC A (2)");
    }

    #[test]
    fn save_writes_a_file() {
        let dir = std::env::temp_dir().join("avf_workbook_save");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("out.xlsx");
        let plan = plan_separate_sheets(&[table("FC A", "FC A", &["a"])]);
        save(&plan, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
