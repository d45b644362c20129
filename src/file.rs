// src/file.rs

use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use crate::core::sanitize::sanitize_club_filename;
use crate::csv::{write_row, SEP};
use crate::error::{Result, ScrapeError};

pub const CSV_EXT: &str = "csv";
pub const XLSX_EXT: &str = "xlsx";

/// `<dir>/<sanitized club>.csv`
pub fn club_file_path(dir: &Path, club: &str) -> PathBuf {
    dir.join(join!(&sanitize_club_filename(club), ".", CSV_EXT))
}

/// Create/truncate `path` and write header + rows. Parent dirs are created.
pub fn write_table(path: &Path, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    let io = |e| ScrapeError::write(path, e);

    let file = File::create(path).map_err(io)?; // truncate/overwrite
    let mut out = BufWriter::new(file);
    write_row(&mut out, headers, SEP).map_err(io)?;
    for row in rows {
        write_row(&mut out, row, SEP).map_err(io)?;
    }
    out.flush().map_err(io)?;
    Ok(())
}

/// Regular files in `dir` with extension `ext` (case-insensitive), sorted by name.
/// A missing directory is simply empty.
pub fn list_files_with_ext(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() { continue; }
        let matches = path
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if matches {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ScrapeError::write(
            dir,
            std::io::Error::other("path exists but is not a directory"),
        ));
    }
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| ScrapeError::write(dir, e))?;
    }
    Ok(())
}

/// File stem as text (lossy), used as the fallback club name.
pub fn stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
