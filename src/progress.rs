// src/progress.rs
/// Per-club progress reporting for a scrape run.
/// Frontends implement this to surface status to users; every method has a
/// no-op default so an implementation only overrides what it shows.
pub trait Progress {
    /// Called once with the number of clubs about to be processed.
    fn begin(&mut self, _total: usize) {}

    /// A club is about to be fetched. `index` is 0-based.
    fn club_started(&mut self, _index: usize, _name: &str) {}

    /// The club's file was written with `records` rows.
    fn club_done(&mut self, _name: &str, _records: usize) {}

    /// Fetch or write failed for this club; the run continues.
    fn club_failed(&mut self, _name: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}
