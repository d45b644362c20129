// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific extraction rules. Each spec knows *where the data lives in
//! one page's HTML* and turns raw markup into rows. Nothing else in the crate
//! depends on the site's markup, so a layout change on the site is fixed here
//! and only here.
//!
//! ## What lives here
//! - **Pure HTML parsing**: markup in, records out. No networking, no files.
//! - **Anchor choice**: which containers, classes and labels identify a field.
//! - **Tolerant extraction** on top of `core::html` (case-insensitive, balanced
//!   element blocks), `core::vischars` (visible text) and `core::sanitize`
//!   (entities, whitespace).
//!
//! ## What does **not** live here
//! - Fetching and retries (`core::net`).
//! - CSV/workbook output (`export`, `file`, `workbook`).
//! - Deciding whether zero rows is a failure (`scrape`).
//!
//! ## Conventions & invariants
//! - A missing anchor never fails the page; the field becomes `N/A`.
//! - A page with no recognizable entries yields an empty list, not an error.
//! - Output order is document order.
//!
//! ## Current specs
//! - `trainers`: the MatchCenter club staff page (`a=tr`).
pub mod trainers;
