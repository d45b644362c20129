// src/specs/trainers.rs
//! Scraping *spec* for the club staff page.
//!
//! Layout (MatchCenter, `default.aspx?v=<club>&a=tr`):
//! ```text
//! <div class="liste">
//!   <div class="row heading"><h5>Entraîneur juniors D</h5></div>
//!   <div class="row">
//!     <div class="col-md-6"><span class="ftName">Jean Dupont</span> ...
//!        <a href="javascript:openMess('club.ch', 'jdupont')">...</a></div>
//!     <div class="col-md-6">Mobile : +41 79 ... Tél privé : +41 27 ...</div>
//!   </div>
//!   ... repeats ...
//! </div>
//! ```
//! One heading row is one staff entry. Its data row is the next sibling `div.row`.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::core::html::{
    attr_value, has_classes, inner_after_open_tag, open_tag_end, strip_tags, tag_name, Markup, Sibling,
};
use crate::core::vischars::visible_text;
use crate::data::{or_na, TrainerRecord, NA};

/// `javascript:openMess('<domain>', '<user>')`
static OPEN_MESS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"openMess\(\s*'([^']*)'\s*,\s*'([^']*)'\s*\)").expect("valid regex"));

static PRIVATE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Tél\s+privé\s*:\s*(\+[\d\s()]+)").expect("valid regex"));

static MOBILE_PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Mobile\s*:\s*(\+[\d\s()]+)").expect("valid regex"));

/// What follows a heading row.
enum DataRow<'a> {
    Found(&'a str),
    /// Another heading or the end of the list: the entry has no details.
    Missing,
    /// The page ends inside the entry.
    Truncated,
}

/// Every staff entry on the page, in document order, stamped with `club`.
/// Pages without a recognizable staff list give an empty Vec. On a page cut
/// off mid-list, the entries completed before the cut are kept.
pub fn extract(markup: &str, club: &str) -> Vec<TrainerRecord> {
    let doc = Markup::new(markup);
    let mut records = Vec::new();
    let mut covered = 0usize;

    for list in doc.extents_with_classes("div", &["liste"]) {
        // a nested .liste was already walked as part of its parent
        if list.start < covered {
            continue;
        }
        covered = list.end;
        if !list.closed {
            debug!("Staff list for {club} is cut off; keeping complete entries");
        }

        let liste = doc.sub(list.start, list.end);
        for (hs, he) in liste.elements_with_classes("div", &["row", "heading"]) {
            let heading = &liste.raw()[hs..he];
            match data_row_after(&liste, he) {
                DataRow::Found(row) => records.push(entry(heading, Some(row), club)),
                DataRow::Missing => records.push(entry(heading, None, club)),
                DataRow::Truncated => debug!("Dropping cut-off entry: {}", role(heading)),
            }
        }
    }

    debug!("Found {} staff entries for {club}", records.len());
    records
}

fn entry(heading: &str, data_row: Option<&str>, club: &str) -> TrainerRecord {
    let mut rec = TrainerRecord::empty(club);
    rec.role = role(heading);

    let Some(row) = data_row else {
        debug!("Heading without data row: {}", rec.role);
        return rec;
    };
    let row = Markup::new(row);
    rec.name = name(&row);
    rec.email = email(&row);
    let (mobile, private) = phones(&row);
    rec.mobile_phone = mobile;
    rec.private_phone = private;
    rec
}

/// (is `div.row`, is also `.heading`) for the opener at `at`.
fn row_kind(s: &str, at: usize) -> (bool, bool) {
    let Some(end) = open_tag_end(s, at) else { return (false, false) };
    let opener = &s[at..end];
    let is_row = tag_name(s, at) == "div" && has_classes(opener, &["row"]);
    (is_row, is_row && has_classes(opener, &["heading"]))
}

/// Next sibling `div.row` after the heading that is not another heading.
fn data_row_after<'m>(liste: &Markup<'m>, from: usize) -> DataRow<'m> {
    let s = liste.raw();
    let mut pos = from;
    loop {
        match liste.next_sibling(pos) {
            Sibling::Element(a, b) => match row_kind(s, a) {
                (true, true) => return DataRow::Missing,
                (true, false) => return DataRow::Found(&s[a..b]),
                _ => pos = b,
            },
            Sibling::Unclosed(a) => {
                return match row_kind(s, a) {
                    (true, true) => DataRow::Missing,
                    _ => DataRow::Truncated,
                };
            }
            Sibling::ParentClosed => return DataRow::Missing,
            Sibling::EndOfInput => return DataRow::Truncated,
        }
    }
}

fn role(heading: &str) -> String {
    let m = Markup::new(heading);
    m.find_open("h5", 0)
        .and_then(|at| m.element_block(at))
        .map(|(a, b)| strip_tags(inner_after_open_tag(&heading[a..b])))
        .map(|t| or_na(&t))
        .unwrap_or_else(|| na!())
}

fn name(row: &Markup) -> String {
    row.first_element_with_classes("span", &["ftName"])
        .map(visible_text)
        .map(|t| or_na(&t))
        .unwrap_or_else(|| na!())
}

fn email(row: &Markup) -> String {
    let s = row.raw();
    let mut pos = 0;
    while let Some(at) = row.find_open("a", pos) {
        let Some(end) = open_tag_end(s, at) else { break };
        pos = end;

        let Some(href) = attr_value(&s[at..end], "href") else { continue };
        if !href.contains("javascript:openMess") {
            continue;
        }
        if let Some(c) = OPEN_MESS.captures(&href) {
            let domain = c[1].trim();
            let user = c[2].trim();
            if !domain.is_empty() || !user.is_empty() {
                return format!("{user}@{domain}");
            }
        }
    }
    na!()
}

/// (mobile, private)
fn phones(row: &Markup) -> (String, String) {
    let s = row.raw();
    let cols = row.elements_with_classes("div", &["col-md-6"]);
    let text = match cols.get(1) {
        Some(&(a, b)) => visible_text(&s[a..b]),
        None => visible_text(s),
    };
    let grab = |re: &Regex| {
        re.captures(&text)
            .map(|c| or_na(&c[1]))
            .unwrap_or_else(|| s!(NA))
    };
    (grab(&MOBILE_PHONE), grab(&PRIVATE_PHONE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn staff(role: &str, name: &str, contact: &str, email_href: &str) -> String {
        format!(
            r#"<div class="row heading"><div class="col-12"><h5>{role}</h5></div></div>
            <div class="row">
              <div class="col-md-6"><span class="ftName">{name}</span><br>
                 <a href="{email_href}"><i class="fa fa-envelope"></i></a></div>
              <div class="col-md-6">{contact}</div>
            </div>"#
        )
    }

    fn page(entries: &[String]) -> String {
        format!(
            "<html><body><div class=\"container\"><div class=\"liste\">{}</div></div></body></html>",
            entries.concat()
        )
    }

    #[test]
    fn extracts_all_six_fields() {
        let html = page(&[staff(
            "Entra&icirc;neur Juniors D",
            "Jean &nbsp;Dupont",
            "<b>Mobile</b> : +41 79 123 45 67<br><b>T&eacute;l priv&eacute;</b> : +41 (27) 322 11 00",
            "javascript:openMess('fc-sion.ch', 'jdupont')",
        )]);
        let recs = extract(&html, "FC Sion");
        assert_eq!(recs.len(), 1);
        let r = &recs[0];
        assert_eq!(r.club, "FC Sion");
        assert_eq!(r.role, "Entraîneur Juniors D");
        assert_eq!(r.name, "Jean Dupont");
        assert_eq!(r.mobile_phone, "+41 79 123 45 67");
        assert_eq!(r.private_phone, "+41 (27) 322 11 00");
        assert_eq!(r.email, "jdupont@fc-sion.ch");
    }

    #[test]
    fn missing_fields_become_sentinels() {
        let html = page(&[staff("", "", "no phones here", "mailto:x@y")]);
        let r = &extract(&html, "FC Erde")[0];
        assert_eq!(r.role, NA);
        assert_eq!(r.name, NA);
        assert_eq!(r.mobile_phone, NA);
        assert_eq!(r.private_phone, NA);
        assert_eq!(r.email, NA);
        assert!(r.to_row().iter().all(|f| !f.is_empty()));
    }

    #[test]
    fn heading_without_data_row_still_counts() {
        let html = page(&[
            s!(r#"<div class="row heading"><h5>Président</h5></div>"#),
            staff("Coach", "Ann Roh", "Mobile : +41 78 000 00 00", "javascript:openMess('a.ch','ann')"),
        ]);
        let recs = extract(&html, "FC Riddes");
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0].role, "Président");
        assert_eq!(recs[0].name, NA);
        assert_eq!(recs[1].name, "Ann Roh");
        assert_eq!(recs[1].email, "ann@a.ch");
    }

    #[test]
    fn document_order_is_preserved() {
        let names = ["Zoé", "Alain", "Marc", "Alain"];
        let entries: Vec<String> = names
            .iter()
            .enumerate()
            .map(|(i, n)| staff(&format!("Role {i}"), n, "", ""))
            .collect();
        let recs = extract(&page(&entries), "FC Granges");
        let got: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(got, names);
        assert_eq!(recs[3].role, "Role 3");
    }

    #[test]
    fn unrecognized_pages_yield_nothing() {
        assert!(extract("", "X").is_empty());
        assert!(extract("<html><body><h1>Session expired</h1></body></html>", "X").is_empty());
        assert!(extract("<div class=\"liste\"><div class=\"row heading\"", "X").is_empty());
        // headings outside a staff list are not staff entries
        assert!(extract("<div class=\"row heading\"><h5>News</h5></div>", "X").is_empty());
    }

    #[test]
    fn single_contact_column_falls_back_to_whole_row() {
        let html = r#"<div class="liste">
            <div class="row heading"><h5>Caissier</h5></div>
            <div class="row"><div class="col-12"><span class="ftName">Luc</span> Mobile: +41 76 1 2</div></div>
        </div>"#;
        let r = &extract(html, "FC Chalais")[0];
        assert_eq!(r.mobile_phone, "+41 76 1 2");
        assert_eq!(r.private_phone, NA);
    }

    #[test]
    fn malformed_email_is_kept_verbatim() {
        let html = page(&[staff("R", "N", "", "javascript:openMess('', 'not an email')")]);
        assert_eq!(extract(&html, "C")[0].email, "not an email@");
    }

    #[test]
    fn commented_out_entries_are_ignored() {
        let old = r#"<!-- <div class="row heading"><h5>Old</h5></div> -->"#;
        let real = r#"<div class="row heading"><h5>Coach</h5></div><div class="row"><span class="ftName">Ann</span></div>"#;
        for html in [
            format!(r#"<div class="liste">{old}{real}</div>"#),
            format!(r#"<div class="liste">{real}{old}</div>"#),
        ] {
            let recs = extract(&html, "X");
            assert_eq!(recs.len(), 1, "{html}");
            assert_eq!(recs[0].role, "Coach");
            assert_eq!(recs[0].name, "Ann");
        }
    }

    #[test]
    fn comment_between_heading_and_data_row_is_skipped() {
        let html = r#"<div class="liste"><div class="row heading"><h5>Coach</h5></div>
            <!-- <div class="row"><span class="ftName">Ghost</span></div> -->
            <div class="row"><span class="ftName">Ann</span></div></div>"#;
        assert_eq!(extract(html, "X")[0].name, "Ann");
    }

    #[test]
    fn cut_off_list_keeps_complete_entries() {
        let full = page(&[
            staff("A", "Ann", "Mobile : +41 1", ""),
            staff("B", "Bob", "", ""),
            staff("C", "Cid", "", ""),
        ]);

        // cut inside the third heading
        let cut = full.find(">C<").unwrap();
        let recs = extract(&full[..cut], "X");
        let names: Vec<&str> = recs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Ann", "Bob"]);

        // third heading complete, its data row cut off
        let cut = full.find("Cid").unwrap();
        assert_eq!(extract(&full[..cut], "X").len(), 2);

        // third entry complete, only the list's closing tags missing
        let cut = full.find("</div></div></body>").unwrap();
        assert_eq!(extract(&full[..cut], "X").len(), 3);
    }
}
