// src/scrape.rs
//
// Sequential driver: for each club, fetch -> extract -> write, then pause.
// A failing club is recorded and the run moves on.

use std::{collections::BTreeMap, thread, time::Duration};

use tracing::{error, info, warn};

use crate::{
    config::Config,
    core::net::Fetch,
    data::ClubTarget,
    export::Exporter,
    progress::Progress,
    specs,
};

/// Result for one club.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOutcome {
    pub club: String,
    pub success: bool,
    /// Rows written, when the club succeeded.
    pub records: Option<usize>,
}

impl ScrapeOutcome {
    fn ok(club: &str, records: usize) -> Self {
        Self { club: s!(club), success: true, records: Some(records) }
    }

    fn failed(club: &str) -> Self {
        Self { club: s!(club), success: false, records: None }
    }
}

/// Outcomes in processing order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<ScrapeOutcome>,
}

impl RunReport {
    pub fn get(&self, club: &str) -> Option<bool> {
        self.outcomes.iter().find(|o| o.club == club).map(|o| o.success)
    }

    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.success).count()
    }

    pub fn failed_clubs(&self) -> Vec<&str> {
        self.outcomes.iter().filter(|o| !o.success).map(|o| o.club.as_str()).collect()
    }

    pub fn any_succeeded(&self) -> bool {
        self.outcomes.iter().any(|o| o.success)
    }

    pub fn total_records(&self) -> usize {
        self.outcomes.iter().filter_map(|o| o.records).sum()
    }

    /// club name -> success
    pub fn to_map(&self) -> BTreeMap<String, bool> {
        self.outcomes.iter().map(|o| (o.club.clone(), o.success)).collect()
    }
}

pub struct Orchestrator<'a, F: Fetch> {
    config: &'a Config,
    fetcher: F,
    exporter: Exporter,
    convert_xlsx: bool,
    pause: Box<dyn FnMut(Duration) + 'a>,
}

impl<'a, F: Fetch> Orchestrator<'a, F> {
    pub fn new(config: &'a Config, fetcher: F) -> Self {
        Self {
            config,
            fetcher,
            exporter: Exporter::new(&config.out_dir, config.combined_filename.as_str()),
            convert_xlsx: false,
            pause: Box::new(thread::sleep),
        }
    }

    /// Also write `<club>.xlsx` next to each non-empty club CSV.
    pub fn with_xlsx(mut self, on: bool) -> Self {
        self.convert_xlsx = on;
        self
    }

    /// Replace the between-clubs sleep.
    pub fn with_pause(mut self, pause: impl FnMut(Duration) + 'a) -> Self {
        self.pause = Box::new(pause);
        self
    }

    pub fn exporter(&self) -> &Exporter { &self.exporter }

    /// Process `clubs` in order, pausing `config.delay` between two clubs.
    pub fn run(&mut self, clubs: &[ClubTarget], mut progress: Option<&mut dyn Progress>) -> RunReport {
        let total = clubs.len();
        info!("Starting scrape of {total} clubs");
        if let Some(p) = progress.as_deref_mut() {
            p.begin(total);
        }

        let mut report = RunReport::default();
        for (i, club) in clubs.iter().enumerate() {
            info!("[{}/{total}] Processing {}", i + 1, club.name);
            if let Some(p) = progress.as_deref_mut() {
                p.club_started(i, &club.name);
            }

            let outcome = self.scrape_club(club);
            if let Some(p) = progress.as_deref_mut() {
                match outcome.records {
                    Some(n) if outcome.success => p.club_done(&club.name, n),
                    _ => p.club_failed(&club.name),
                }
            }
            report.outcomes.push(outcome);

            if i + 1 < total && !self.config.delay.is_zero() {
                info!("Waiting {}s before next request...", self.config.delay.as_secs_f64());
                (self.pause)(self.config.delay);
            }
        }

        info!("Scraping completed: {}/{total} clubs successful", report.successful());
        let failed = report.failed_clubs();
        if !failed.is_empty() {
            warn!("Failed clubs: {}", failed.join(", "));
        }
        if let Some(p) = progress.as_deref_mut() {
            p.finish();
        }
        report
    }

    /// Fetch, extract and write one club. Never panics, never aborts the batch.
    pub fn scrape_club(&self, club: &ClubTarget) -> ScrapeOutcome {
        let url = self.config.club_url(&club.id);
        let markup = match self.fetcher.fetch(&url) {
            Ok(m) => m,
            Err(e) => {
                error!("{}: {e}", club.name);
                return ScrapeOutcome::failed(&club.name);
            }
        };

        let records = specs::trainers::extract(&markup, &club.name);
        if records.is_empty() {
            warn!("No trainer data found for {}", club.name);
        } else {
            info!("Extracted {} trainers for {}", records.len(), club.name);
        }

        if !self.exporter.write_club(&records, &club.name) {
            return ScrapeOutcome::failed(&club.name);
        }
        if self.convert_xlsx && !records.is_empty() {
            // the CSV is the primary output; a failed conversion is only logged
            self.exporter.convert_to_xlsx(&self.exporter.club_path(&club.name));
        }
        ScrapeOutcome::ok(&club.name, records.len())
    }
}
