// src/log.rs
//
// Process-wide logging: a `tracing` subscriber with two outputs.
// - stderr: compact, elapsed-time stamps, for the person running the tool.
// - log file: appended plain text, kept across runs.
// `RUST_LOG` overrides the level chosen by `--verbose`.

use std::{
    fs::{File, OpenOptions},
    io,
    path::Path,
    sync::Mutex,
};

use tracing_subscriber::{fmt, fmt::time::Uptime, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Safe to call more than once; later calls are no-ops.
/// An unopenable log file only disables the file output.
pub fn init(verbose: bool, log_file: &Path) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let file_layer = match open_log_file(log_file) {
        Ok(file) => Some(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        ),
        Err(e) => {
            eprintln!("Cannot open log file {}: {e}", log_file.display());
            None
        }
    };

    let stderr_layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(Uptime::default())
        .with_writer(io::stderr);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_switches_to_debug() {
        assert_eq!(default_directive(false), "info");
        assert_eq!(default_directive(true), "debug");
    }

    #[test]
    fn init_creates_the_log_file_and_tolerates_repeats() {
        let dir = std::env::temp_dir().join("avf_log_init");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("run.log");
        init(false, &path);
        init(true, &path);
        assert!(path.exists());
    }
}
