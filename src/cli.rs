// src/cli.rs
use std::{io::Write, path::PathBuf, process::ExitCode};

use clap::Parser;
use tracing::info;

use crate::{
    config::Config,
    core::net::{Curl, Fetcher},
    error::Result,
    file::ensure_directory,
    log,
    progress::Progress,
    scrape::Orchestrator,
};

/// Scrape trainer contacts from AVF MatchCenter club pages into CSV and XLSX.
#[derive(Debug, Parser)]
#[command(name = "avf_scrape", version, about)]
pub struct Args {
    /// Only scrape these clubs (names as listed by --list-clubs)
    #[arg(long, num_args = 1.., value_name = "NAME")]
    pub clubs: Vec<String>,

    /// Directory for the per-club CSV files and the combined workbook
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Also convert each club CSV to XLSX
    #[arg(long)]
    pub xlsx: bool,

    /// Skip the combined workbook
    #[arg(long)]
    pub no_combine: bool,

    /// Put every club on one sheet of the combined workbook
    #[arg(long)]
    pub single_sheet: bool,

    /// Print a summary of the output directory at the end
    #[arg(long)]
    pub summary: bool,

    /// Print the configured clubs as `name,id` and exit
    #[arg(long)]
    pub list_clubs: bool,

    /// Debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Command-line layer: applied last, over file and environment.
    pub fn apply_to(&self, cfg: &mut Config) {
        if let Some(dir) = &self.output_dir {
            cfg.out_dir = dir.clone();
        }
        if self.single_sheet {
            cfg.separate_sheets = false;
        }
    }
}

/// Parse the process arguments and run. Help and version exit 0, bad arguments 1.
pub fn run() -> Result<ExitCode> {
    match Args::try_parse() {
        Ok(args) => run_with(args),
        Err(e) => {
            let _ = e.print();
            Ok(if e.use_stderr() { ExitCode::FAILURE } else { ExitCode::SUCCESS })
        }
    }
}

pub fn run_with(args: Args) -> Result<ExitCode> {
    let mut cfg = Config::load(args.config.as_deref())?;
    cfg.apply_env();
    args.apply_to(&mut cfg);

    log::init(args.verbose, &cfg.log_file);

    if args.list_clubs {
        for club in &cfg.clubs {
            println!("{},{}", club.name, club.id);
        }
        return Ok(ExitCode::SUCCESS);
    }

    cfg.validate()?;
    let clubs = if args.clubs.is_empty() { cfg.clubs.clone() } else { cfg.select_clubs(&args.clubs)? };
    ensure_directory(&cfg.out_dir)?;

    let fetcher = Fetcher::new(
        Curl::new(cfg.request_timeout),
        cfg.headers.clone(),
        cfg.cookie.clone(),
        cfg.retry_policy(),
    );
    let mut orchestrator = Orchestrator::new(&cfg, fetcher).with_xlsx(args.xlsx);
    let mut progress = ConsoleProgress::default();
    let report = orchestrator.run(&clubs, Some(&mut progress));

    if report.any_succeeded() && !args.no_combine {
        orchestrator.exporter().combine(cfg.separate_sheets);
    }

    println!(
        "{}/{} clubs scraped, {} trainers written to {}",
        report.successful(),
        clubs.len(),
        report.total_records(),
        cfg.out_dir.display()
    );
    let failed = report.failed_clubs();
    if !failed.is_empty() {
        println!("Failed: {}", failed.join(", "));
    }
    if args.summary {
        println!("{}", orchestrator.exporter().summarize());
    }

    if report.any_succeeded() {
        Ok(ExitCode::SUCCESS)
    } else {
        info!("No club succeeded");
        Ok(ExitCode::FAILURE)
    }
}

/// One stdout line per club.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    current: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }

    fn club_started(&mut self, index: usize, name: &str) {
        self.current = index + 1;
        print!("[{}/{}] {name} ... ", self.current, self.total);
        let _ = std::io::stdout().flush();
    }

    fn club_done(&mut self, _name: &str, records: usize) {
        println!("{records} trainers");
    }

    fn club_failed(&mut self, _name: &str) {
        println!("failed");
    }
}
