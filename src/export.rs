// src/export.rs
//
// Output facade. Every operation reports plain success/failure and logs the
// reason, so one club's bad file never stops the rest of a run.

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::data::{header_row, TrainerRecord};
use crate::error::Result;
use crate::file::{club_file_path, list_files_with_ext, write_table, CSV_EXT, XLSX_EXT};
use crate::store::{self, load_club_file, ClubTable, DataSummary};
use crate::workbook::{self, SheetPlan, WorkbookPlan, TRAINERS_SHEET_NAME};

pub struct Exporter {
    out_dir: PathBuf,
    combined_filename: String,
}

impl Exporter {
    pub fn new(out_dir: impl Into<PathBuf>, combined_filename: impl Into<String>) -> Self {
        Self { out_dir: out_dir.into(), combined_filename: combined_filename.into() }
    }

    pub fn club_path(&self, club: &str) -> PathBuf {
        club_file_path(&self.out_dir, club)
    }

    pub fn combined_path(&self) -> PathBuf {
        self.out_dir.join(&self.combined_filename)
    }

    /// Write `<out_dir>/<club>.csv`: header + one row per record. Zero records
    /// still produce a header-only file.
    pub fn write_club(&self, records: &[TrainerRecord], club: &str) -> bool {
        match self.try_write_club(records, club) {
            Ok(path) => {
                if records.is_empty() {
                    warn!("No trainer data for {club}; wrote header only to {}", path.display());
                } else {
                    info!("Saved {} records to {}", records.len(), path.display());
                }
                true
            }
            Err(e) => {
                error!("Could not save {club}: {e}");
                false
            }
        }
    }

    pub fn try_write_club(&self, records: &[TrainerRecord], club: &str) -> Result<PathBuf> {
        let path = self.club_path(club);
        let rows: Vec<Vec<String>> = records.iter().map(TrainerRecord::to_row).collect();
        write_table(&path, &header_row(), &rows)?;
        Ok(path)
    }

    /// Merge every per-club CSV into the combined workbook.
    /// True when at least one club made it into the workbook.
    pub fn combine(&self, separate_sheets: bool) -> bool {
        let tables = self.mergeable_tables();
        if tables.is_empty() {
            warn!("No club data found to combine in {}", self.out_dir.display());
            return false;
        }

        let plan = if separate_sheets {
            workbook::plan_separate_sheets(&tables)
        } else {
            workbook::plan_single_sheet(&tables)
        };
        let path = self.combined_path();
        match workbook::save(&plan, &path) {
            Ok(()) => {
                info!(
                    "Combined {} records from {} club files into {}",
                    plan.total_rows(),
                    tables.len(),
                    path.display()
                );
                true
            }
            Err(e) => {
                error!("Could not write combined workbook: {e}");
                false
            }
        }
    }

    /// Convert one club CSV into a sibling `.xlsx` with a single "Trainers" sheet.
    pub fn convert_to_xlsx(&self, csv_path: &Path) -> bool {
        let table = match load_club_file(csv_path) {
            Ok(t) if !t.is_empty() => t,
            Ok(_) => {
                warn!("Skipping {}: no data rows", csv_path.display());
                return false;
            }
            Err(e) => {
                warn!("Skipping {e}");
                return false;
            }
        };

        let plan = WorkbookPlan {
            sheets: vec![SheetPlan {
                name: s!(TRAINERS_SHEET_NAME),
                headers: header_row(),
                rows: table.rows.iter().map(|r| store::clean_row(r)).collect(),
            }],
        };
        let out = csv_path.with_extension(XLSX_EXT);
        match workbook::save(&plan, &out) {
            Ok(()) => {
                info!("Converted {} to {}", csv_path.display(), out.display());
                true
            }
            Err(e) => {
                error!("{e}");
                false
            }
        }
    }

    /// Per-club CSV files currently in the output directory.
    pub fn club_files(&self) -> Vec<PathBuf> {
        list_files_with_ext(&self.out_dir, CSV_EXT).unwrap_or_else(|e| {
            error!("Cannot list {}: {e}", self.out_dir.display());
            Vec::new()
        })
    }

    pub fn summarize(&self) -> DataSummary {
        store::summarize(&self.out_dir)
    }

    /// Valid, non-empty club tables in filename order; the rest are skipped with a warning.
    fn mergeable_tables(&self) -> Vec<ClubTable> {
        let mut tables = Vec::new();
        for path in self.club_files() {
            match load_club_file(&path) {
                Ok(t) if t.is_empty() => warn!("Skipping {}: no data rows", path.display()),
                Ok(t) => tables.push(t),
                Err(e) => warn!("Skipping {e}"),
            }
        }
        tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tmp_dir(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("avf_export_{}", name));
        let _ = fs::remove_dir_all(&p);
        p
    }

    fn rec(club: &str, name: &str) -> TrainerRecord {
        let mut r = TrainerRecord::empty(club);
        r.name = s!(name);
        r
    }

    #[test]
    fn zero_records_write_a_header_only_file() {
        let ex = Exporter::new(tmp_dir("header_only"), "all.xlsx");
        assert!(ex.write_club(&[], "FC Erde"));
        let text = fs::read_to_string(ex.club_path("FC Erde")).unwrap();
        assert_eq!(text, "club,role,name,mobile_phone,private_phone,email\n");
    }

    #[test]
    fn combine_without_data_fails_and_writes_nothing() {
        let ex = Exporter::new(tmp_dir("combine_none"), "all.xlsx");
        assert!(ex.write_club(&[], "Empty"));
        assert!(!ex.combine(true));
        assert!(!ex.combined_path().exists());
    }

    #[test]
    fn convert_creates_sibling_xlsx() {
        let ex = Exporter::new(tmp_dir("convert"), "all.xlsx");
        assert!(ex.write_club(&[rec("FC A", "n")], "FC A"));
        let csv = ex.club_path("FC A");
        assert!(ex.convert_to_xlsx(&csv));
        assert!(csv.with_extension("xlsx").exists());
    }

    #[test]
    fn unwritable_target_reports_false() {
        let dir = tmp_dir("unwritable");
        fs::create_dir_all(&dir).unwrap();
        // the club file path is occupied by a directory
        fs::create_dir_all(dir.join("FC A.csv")).unwrap();
        let ex = Exporter::new(&dir, "all.xlsx");
        assert!(!ex.write_club(&[rec("FC A", "n")], "FC A"));
    }
}
