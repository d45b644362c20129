// src/core/net.rs
// HTTP GET through an external `curl` process, wrapped in a bounded retry loop.
//
// Two seams:
// - `Transport`: one attempt, one process. Swap it for a native client or a test double.
// - `Fetch`: the whole capability the orchestrator needs (URL in, body out).

use std::{
    process::{Command, Stdio},
    thread,
    time::Duration,
};

use tracing::{debug, error, info, warn};

use crate::error::{Result, ScrapeError, TransportError};

/// A single request attempt.
pub trait Transport {
    fn get(&self, url: &str, headers: &[String], cookie: &str) -> Result<String, TransportError>;
}

/// Anything that can turn a URL into page text, retries included.
pub trait Fetch {
    fn fetch(&self, url: &str) -> Result<String>;
}

/* ---------------- curl transport ---------------- */

/// curl exit code for `--max-time` expiry.
const CURL_TIMEOUT_EXIT: i32 = 28;

#[derive(Clone, Debug)]
pub struct Curl {
    pub program: String,
    pub timeout: Duration,
}

impl Default for Curl {
    fn default() -> Self {
        Self { program: s!("curl"), timeout: Duration::from_secs(30) }
    }
}

impl Curl {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, ..Self::default() }
    }

    fn args(&self, url: &str, headers: &[String], cookie: &str) -> Vec<String> {
        let mut args = vec![
            s!("--location"),
            s!("--silent"),
            s!("--show-error"),
            // HTTP >= 400 becomes exit 22 instead of an error page on stdout
            s!("--fail"),
            s!("--max-time"),
            self.timeout.as_secs().max(1).to_string(),
        ];
        for h in headers {
            args.push(s!("--header"));
            args.push(h.clone());
        }
        if !cookie.is_empty() {
            args.push(s!("--header"));
            args.push(join!("Cookie: ", cookie));
        }
        args.push(s!(url));
        args
    }
}

impl Transport for Curl {
    fn get(&self, url: &str, headers: &[String], cookie: &str) -> Result<String, TransportError> {
        let out = Command::new(&self.program)
            .args(self.args(url, headers, cookie))
            .stdin(Stdio::null())
            .output()
            .map_err(TransportError::Spawn)?;

        match out.status.code() {
            Some(0) => Ok(String::from_utf8_lossy(&out.stdout).into_owned()),
            Some(CURL_TIMEOUT_EXIT) => Err(TransportError::Timeout),
            Some(code) => Err(TransportError::Exit {
                code,
                stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
            }),
            None => Err(TransportError::Signal),
        }
    }
}

/* ---------------- retry policy ---------------- */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first one included. Never zero.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryPolicy {
    /// Pause before retry number `retry` (1-based): base * 2^(retry-1), capped.
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let factor = 1u32.checked_shl(retry - 1).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/* ---------------- fetcher ---------------- */

/// Attaches the configured headers and cookie to every request and retries
/// failed attempts according to `RetryPolicy`.
pub struct Fetcher<T: Transport> {
    transport: T,
    headers: Vec<String>,
    cookie: String,
    policy: RetryPolicy,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, headers: Vec<String>, cookie: impl Into<String>, policy: RetryPolicy) -> Self {
        Self { transport, headers, cookie: cookie.into(), policy }
    }
}

impl<T: Transport> Fetch for Fetcher<T> {
    fn fetch(&self, url: &str) -> Result<String> {
        info!("Fetching URL: {url}");
        let max = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let err = match self.transport.get(url, &self.headers, &self.cookie) {
                Ok(body) => {
                    if body.trim().is_empty() {
                        warn!("Empty response from {url}");
                    } else {
                        debug!("Fetched {} bytes from {url}", body.len());
                    }
                    return Ok(body);
                }
                Err(e) => e,
            };

            error!("Attempt {attempt}/{max} for {url} failed: {err}");
            if !err.is_retryable() || attempt >= max {
                if !err.is_retryable() {
                    error!("Transport unavailable, not retrying. Is curl installed and on PATH?");
                }
                return Err(ScrapeError::TransportFailure { url: s!(url), attempts: attempt, source: err });
            }

            let wait = self.policy.delay_before_retry(attempt);
            info!("Retrying in {:.1}s... (attempt {}/{max})", wait.as_secs_f64(), attempt + 1);
            thread::sleep(wait);
        }
    }
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<String> {
        (**self).fetch(url)
    }
}
