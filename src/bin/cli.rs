// src/bin/cli.rs
use std::process::ExitCode;

use avf_scrape::cli;

fn main() -> color_eyre::Result<ExitCode> {
    color_eyre::install()?;
    Ok(cli::run()?)
}
