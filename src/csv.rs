// src/csv.rs
use std::io::{self, Write};
use std::mem::take;

/// Field separator for every file this tool writes.
pub const SEP: char = ',';

/* ---------------- Parsing ---------------- */

/// Minimal CSV parser (quotes + CRLF tolerant). Blank lines are dropped.
pub fn parse_rows(text: &str, sep: char) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut field = s!();
    let mut row = Vec::new();
    let mut in_quotes = false;
    // a UTF-8 BOM from spreadsheet round-trips would end up in the first header cell
    let mut chars = text.trim_start_matches('\u{feff}').chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next(); // double-quote escape
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            c if c == sep && !in_quotes => {
                // move the field without cloning
                row.push(take(&mut field));
            }
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) { chars.next(); }
                row.push(take(&mut field));
                if !(row.len() == 1 && row[0].is_empty()) {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    // Flush any trailing field/row even if quotes were unterminated.
    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

/* ---------------- Writing ---------------- */

fn needs_quotes(field: &str, sep: char) -> bool {
    field.contains(sep) || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Write a single CSV row to any writer.
pub fn write_row<W: Write>(mut w: W, row: &[String], sep: char) -> io::Result<()> {
    let mut first = true;
    for cell in row {
        if !first { write!(w, "{}", sep)?; } else { first = false; }
        if needs_quotes(cell, sep) {
            let escaped = cell.replace('"', "\"\"");
            write!(w, "\"{}\"", escaped)?;
        } else {
            write!(w, "{}", cell)?;
        }
    }
    writeln!(w)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| s!(*c)).collect()
    }

    #[test]
    fn quoting_survives_a_parse() {
        let mut path = std::env::temp_dir();
        path.push("avf_csv_quoting");
        path.push("q.csv");
        let rows = vec![v(&["FC Sion", "Coach, U15", "He said \"hi\"", "multi\nline"])];
        crate::file::write_table(&path, &v(&["a", "b", "c", "d"]), &rows).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let parsed = parse_rows(&text, SEP);
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1], rows[0]);
    }

    #[test]
    fn crlf_blank_lines_and_bom() {
        let parsed = parse_rows("\u{feff}club,name\r\n\r\nA,B\r\nC,D", SEP);
        assert_eq!(parsed, vec![v(&["club", "name"]), v(&["A", "B"]), v(&["C", "D"])]);
    }

    #[test]
    fn empty_text_has_no_rows() {
        assert!(parse_rows("", SEP).is_empty());
        assert!(parse_rows("\n\n", SEP).is_empty());
    }
}
