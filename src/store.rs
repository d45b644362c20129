// src/store.rs
//
// Reading per-club CSV files back from the output directory.
// Everything here is read-only: loading, validating, cleaning, counting.

use std::{fmt, fs, path::{Path, PathBuf}};

use tracing::{debug, warn};

use crate::core::sanitize::normalize_ws;
use crate::csv::{parse_rows, SEP};
use crate::data::{or_na, FIELDNAMES};
use crate::error::{Result, ScrapeError};
use crate::file::{list_files_with_ext, stem_of, CSV_EXT};

/// Header + rows, as read from disk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// One club's file, with columns reordered to FIELDNAMES order.
#[derive(Clone, Debug)]
pub struct ClubTable {
    pub path: PathBuf,
    pub club: String,
    pub rows: Vec<Vec<String>>,
}

impl ClubTable {
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }
    pub fn len(&self) -> usize { self.rows.len() }
}

pub fn load_dataset(path: &Path) -> Result<DataSet> {
    let text = fs::read_to_string(path)?;
    let mut rows = parse_rows(&text, SEP);
    if rows.is_empty() {
        return Err(ScrapeError::malformed(path, "file is empty"));
    }
    let headers = rows.remove(0);
    Ok(DataSet { headers, rows })
}

/// Load a club file, requiring all six columns in any order.
/// Header-only files load fine with zero rows.
pub fn load_club_file(path: &Path) -> Result<ClubTable> {
    let ds = load_dataset(path)?;

    let mut index = Vec::with_capacity(FIELDNAMES.len());
    let mut missing = Vec::new();
    for field in FIELDNAMES {
        match ds.headers.iter().position(|h| h.trim().eq_ignore_ascii_case(field)) {
            Some(i) => index.push(i),
            None => missing.push(field),
        }
    }
    if !missing.is_empty() {
        return Err(ScrapeError::malformed(path, format!("missing columns: {}", missing.join(", "))));
    }

    let rows: Vec<Vec<String>> = ds
        .rows
        .iter()
        .map(|r| index.iter().map(|&i| r.get(i).cloned().unwrap_or_default()).collect())
        .collect();

    let club = rows
        .first()
        .map(|r| r[0].trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| stem_of(path));

    debug!("Loaded {} rows for {club} from {}", rows.len(), path.display());
    Ok(ClubTable { path: path.to_path_buf(), club, rows })
}

const PHONE_COLS: [usize; 2] = [3, 4];

/// Trim cells, fill blanks with the sentinel, collapse spaces inside phone numbers.
pub fn clean_row(row: &[String]) -> Vec<String> {
    row.iter()
        .enumerate()
        .map(|(i, cell)| {
            if PHONE_COLS.contains(&i) { or_na(&normalize_ws(cell)) } else { or_na(cell) }
        })
        .collect()
}

/* ---------------- Summary ---------------- */

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClubCount {
    pub name: String,
    pub trainers: usize,
    pub file: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSummary {
    pub total_files: usize,
    pub total_clubs: usize,
    pub total_trainers: usize,
    pub clubs: Vec<ClubCount>,
    pub files_with_errors: Vec<String>,
}

impl DataSummary {
    pub fn count_for(&self, club: &str) -> Option<usize> {
        self.clubs.iter().find(|c| c.name == club).map(|c| c.trainers)
    }
}

/// Count what is on disk in `dir`. Unreadable files are listed, not fatal.
pub fn summarize(dir: &Path) -> DataSummary {
    let files = match list_files_with_ext(dir, CSV_EXT) {
        Ok(f) => f,
        Err(e) => {
            warn!("Cannot list {}: {e}", dir.display());
            return DataSummary::default();
        }
    };

    let mut summary = DataSummary { total_files: files.len(), ..Default::default() };
    for path in &files {
        let file = path.file_name().map(|f| f.to_string_lossy().into_owned()).unwrap_or_default();
        match load_club_file(path) {
            Ok(t) => {
                summary.total_trainers += t.len();
                summary.clubs.push(ClubCount { name: t.club, trainers: t.rows.len(), file });
            }
            Err(e) => {
                warn!("{e}");
                summary.files_with_errors.push(file);
            }
        }
    }
    summary.total_clubs = summary.clubs.len();
    summary
}

impl fmt::Display for DataSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(50);
        writeln!(f, "{rule}")?;
        writeln!(f, "AVF CLUB SCRAPER - DATA SUMMARY")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Total files: {}", self.total_files)?;
        writeln!(f, "Total clubs: {}", self.total_clubs)?;
        writeln!(f, "Total trainers: {}", self.total_trainers)?;
        writeln!(f, "Files with errors: {}", self.files_with_errors.len())?;

        if !self.clubs.is_empty() {
            let mut clubs: Vec<&ClubCount> = self.clubs.iter().collect();
            clubs.sort_by(|a, b| a.name.cmp(&b.name));
            writeln!(f, "\nClubs:")?;
            writeln!(f, "{}", "-".repeat(30))?;
            for c in clubs {
                writeln!(f, "  {:<20} | {:>3} trainers", c.name, c.trainers)?;
            }
        }
        if !self.files_with_errors.is_empty() {
            writeln!(f, "\nFiles with errors:")?;
            writeln!(f, "{}", "-".repeat(20))?;
            for file in &self.files_with_errors {
                writeln!(f, "  - {file}")?;
            }
        }
        write!(f, "{rule}")
    }
}
