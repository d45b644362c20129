// src/error.rs
use std::{io, path::PathBuf};

use thiserror::Error;

/// One failed run of the transport program.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("could not start transport: {0}")]
    Spawn(#[source] io::Error),

    #[error("transport exited with code {code}: {stderr}")]
    Exit { code: i32, stderr: String },

    #[error("request timed out")]
    Timeout,

    #[error("transport terminated by signal")]
    Signal,
}

impl TransportError {
    /// A missing transport program will not appear between attempts.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, TransportError::Spawn(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("failed to fetch {url} after {attempts} attempt(s): {source}")]
    TransportFailure {
        url: String,
        attempts: u32,
        #[source]
        source: TransportError,
    },

    #[error("configuration missing: {0}")]
    ConfigurationMissing(String),

    #[error("invalid config file {}: {source}", path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not write {}: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("workbook error for {}: {source}", path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: rust_xlsxwriter::XlsxError,
    },

    #[error("malformed club file {}: {reason}", path.display())]
    MalformedFile { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ScrapeError {
    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ScrapeError::WriteFailure { path: path.into(), source }
    }

    pub fn workbook(path: impl Into<PathBuf>, source: rust_xlsxwriter::XlsxError) -> Self {
        ScrapeError::Workbook { path: path.into(), source }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        ScrapeError::MalformedFile { path: path.into(), reason: reason.into() }
    }
}

pub type Result<T, E = ScrapeError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_not_retryable() {
        let e = TransportError::Spawn(io::Error::from(io::ErrorKind::NotFound));
        assert!(!e.is_retryable());
        let e = TransportError::Spawn(io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(e.is_retryable());
        assert!(TransportError::Timeout.is_retryable());
        assert!(TransportError::Exit { code: 22, stderr: s!() }.is_retryable());
    }
}
