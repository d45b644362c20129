// src/config/options.rs
//
// Run configuration. Layers, lowest precedence first:
//   built-in defaults -> TOML file -> AVF_* environment -> command line.
// The command-line layer lives in `cli`; everything else is here.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::{debug, warn};

use super::consts::*;
use crate::core::net::RetryPolicy;
use crate::data::ClubTarget;
use crate::error::{Result, ScrapeError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub clubs: Vec<ClubTarget>,
    pub base_url: String,
    pub headers: Vec<String>,
    pub cookie: String,
    pub out_dir: PathBuf,
    pub max_attempts: u32,
    pub retry_base_delay: Duration,
    pub retry_max_delay: Duration,
    pub request_timeout: Duration,
    /// Pause between two clubs.
    pub delay: Duration,
    pub combined_filename: String,
    pub separate_sheets: bool,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            clubs: CLUBS.iter().map(|(name, id)| ClubTarget::new(*name, *id)).collect(),
            base_url: s!(BASE_URL),
            headers: HEADERS.iter().map(|h| s!(*h)).collect(),
            cookie: s!(),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            max_attempts: MAX_ATTEMPTS,
            retry_base_delay: Duration::from_secs(RETRY_BASE_DELAY_SECS),
            retry_max_delay: Duration::from_secs(RETRY_MAX_DELAY_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            delay: Duration::from_secs(DELAY_SECS),
            combined_filename: s!(COMBINED_FILENAME),
            separate_sheets: SEPARATE_SHEETS,
            log_file: PathBuf::from(LOG_FILE),
        }
    }
}

/// Club ids may be written as `"1005"` or `1005`.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
enum ClubId {
    Num(u64),
    Text(String),
}

impl ClubId {
    fn into_string(self) -> String {
        match self {
            ClubId::Num(n) => n.to_string(),
            ClubId::Text(t) => t,
        }
    }
}

/// On-disk shape of the config file. Every key is optional; durations are seconds.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    base_url: Option<String>,
    headers: Option<Vec<String>>,
    cookie: Option<String>,
    out_dir: Option<PathBuf>,
    max_attempts: Option<u32>,
    retry_base_delay: Option<u64>,
    retry_max_delay: Option<u64>,
    request_timeout: Option<u64>,
    delay: Option<u64>,
    combined_filename: Option<String>,
    separate_sheets: Option<bool>,
    log_file: Option<PathBuf>,
    /// name -> id. Replaces the built-in club list when present.
    clubs: Option<BTreeMap<String, ClubId>>,
}

impl FileConfig {
    pub fn parse(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| ScrapeError::ConfigFile { path: path.to_path_buf(), source })
    }
}

impl Config {
    /// Defaults, then `path` if given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(p) = path {
            let text = fs::read_to_string(p)?;
            cfg.apply_file(FileConfig::parse(&text, p)?);
            debug!("Loaded config file {}", p.display());
        }
        Ok(cfg)
    }

    pub fn apply_file(&mut self, file: FileConfig) {
        let FileConfig {
            base_url,
            headers,
            cookie,
            out_dir,
            max_attempts,
            retry_base_delay,
            retry_max_delay,
            request_timeout,
            delay,
            combined_filename,
            separate_sheets,
            log_file,
            clubs,
        } = file;

        if let Some(v) = base_url { self.base_url = v; }
        if let Some(v) = headers { self.headers = v; }
        if let Some(v) = cookie { self.cookie = v; }
        if let Some(v) = out_dir { self.out_dir = v; }
        if let Some(v) = max_attempts { self.max_attempts = v; }
        if let Some(v) = retry_base_delay { self.retry_base_delay = Duration::from_secs(v); }
        if let Some(v) = retry_max_delay { self.retry_max_delay = Duration::from_secs(v); }
        if let Some(v) = request_timeout { self.request_timeout = Duration::from_secs(v); }
        if let Some(v) = delay { self.delay = Duration::from_secs(v); }
        if let Some(v) = combined_filename { self.combined_filename = v; }
        if let Some(v) = separate_sheets { self.separate_sheets = v; }
        if let Some(v) = log_file { self.log_file = v; }
        if let Some(map) = clubs {
            self.clubs = map.into_iter().map(|(name, id)| ClubTarget::new(name, id.into_string())).collect();
        }
    }

    /// Apply AVF_COOKIE, AVF_OUTPUT_DIR and AVF_DELAY from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Same as `apply_env`, reading variables through `lookup`.
    /// Empty values count as unset.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_COOKIE) {
            self.cookie = v;
        }
        if let Some(v) = get(ENV_OUTPUT_DIR) {
            self.out_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_DELAY) {
            match v.trim().parse::<u64>() {
                Ok(secs) => self.delay = Duration::from_secs(secs),
                Err(_) => warn!("Ignoring {ENV_DELAY}={v}: not a whole number of seconds"),
            }
        }
    }

    /// Checked once, before any request goes out.
    pub fn validate(&self) -> Result<()> {
        let missing = |msg: &str| Err(ScrapeError::ConfigurationMissing(s!(msg)));

        if self.clubs.is_empty() {
            return missing("no clubs configured");
        }
        if self.cookie.trim().is_empty() {
            return missing("session cookie is empty (set AVF_COOKIE or `cookie` in the config file)");
        }
        if !self.base_url.contains(CLUB_ID_PLACEHOLDER) {
            return missing("base_url has no {club_id} placeholder");
        }
        if self.max_attempts == 0 {
            return missing("max_attempts must be at least 1");
        }
        if self.out_dir.as_os_str().is_empty() {
            return missing("output directory is empty");
        }
        Ok(())
    }

    pub fn club_url(&self, club_id: &str) -> String {
        self.base_url.replace(CLUB_ID_PLACEHOLDER, club_id)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: self.retry_base_delay,
            max_delay: self.retry_max_delay,
        }
    }

    /// Configured clubs matching `names`, in the order given.
    /// Exact match first, then case-insensitive.
    pub fn select_clubs(&self, names: &[String]) -> Result<Vec<ClubTarget>> {
        let mut out = Vec::with_capacity(names.len());
        let mut unknown = Vec::new();

        for name in names {
            let wanted = name.trim();
            let found = self
                .clubs
                .iter()
                .find(|c| c.name == wanted)
                .or_else(|| self.clubs.iter().find(|c| c.name.to_lowercase() == wanted.to_lowercase()));
            match found {
                Some(c) if !out.contains(c) => out.push(c.clone()),
                Some(_) => {}
                None => unknown.push(wanted),
            }
        }

        if !unknown.is_empty() {
            let available: Vec<&str> = self.clubs.iter().map(|c| c.name.as_str()).collect();
            return Err(ScrapeError::ConfigurationMissing(format!(
                "unknown club(s): {}. Available: {}",
                unknown.join(", "),
                available.join(", ")
            )));
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_cookie() -> Config {
        Config { cookie: s!("sid=1"), ..Config::default() }
    }

    #[test]
    fn defaults_match_the_published_tool() {
        let c = Config::default();
        assert_eq!(c.clubs.len(), 14);
        assert_eq!(c.clubs[0], ClubTarget::new("FC Vétroz", "1005"));
        assert_eq!(c.clubs[13], ClubTarget::new("FC Granges", "975"));
        assert_eq!(c.out_dir, PathBuf::from("data"));
        assert_eq!(c.delay, Duration::from_secs(3));
        assert_eq!(c.max_attempts, 3);
        assert_eq!(c.combined_filename, "combined_club_trainers.xlsx");
        assert!(c.separate_sheets);
        assert!(c.cookie.is_empty());
    }

    #[test]
    fn club_url_fills_the_placeholder() {
        let c = Config::default();
        assert_eq!(
            c.club_url("1000"),
            "https://matchcenter.avf-wfv.ch/default.aspx?v=1000&oid=17&lng=2&a=tr"
        );
    }

    #[test]
    fn file_layer_overrides_only_given_keys() {
        let text = r#"
            cookie = "abc=1"
            delay = 0
            separate_sheets = false

            [clubs]
            "FC Test" = 42
            "FC Other" = "7"
        "#;
        let mut c = Config::default();
        c.apply_file(FileConfig::parse(text, Path::new("t.toml")).unwrap());
        assert_eq!(c.cookie, "abc=1");
        assert_eq!(c.delay, Duration::ZERO);
        assert!(!c.separate_sheets);
        assert_eq!(c.max_attempts, 3);
        assert_eq!(c.clubs, vec![ClubTarget::new("FC Other", "7"), ClubTarget::new("FC Test", "42")]);
    }

    #[test]
    fn bad_file_is_a_config_error() {
        let err = FileConfig::parse("delay = \"soon\"", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ScrapeError::ConfigFile { .. }));
        let err = FileConfig::parse("colour = 1", Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, ScrapeError::ConfigFile { .. }));
    }

    #[test]
    fn env_layer_wins_over_file_and_ignores_junk_delay() {
        let mut c = Config::default();
        c.apply_file(FileConfig::parse("cookie = \"from-file\"", Path::new("t.toml")).unwrap());
        c.apply_env_with(|k| match k {
            "AVF_COOKIE" => Some(s!("from-env")),
            "AVF_OUTPUT_DIR" => Some(s!("out")),
            "AVF_DELAY" => Some(s!("soon")),
            _ => None,
        });
        assert_eq!(c.cookie, "from-env");
        assert_eq!(c.out_dir, PathBuf::from("out"));
        assert_eq!(c.delay, Duration::from_secs(3));

        c.apply_env_with(|k| (k == "AVF_DELAY").then(|| s!("10")));
        assert_eq!(c.delay, Duration::from_secs(10));
        assert_eq!(c.cookie, "from-env");
    }

    #[test]
    fn validation_names_what_is_missing() {
        assert!(with_cookie().validate().is_ok());

        let cases = [
            Config::default(),
            Config { clubs: vec![], ..with_cookie() },
            Config { base_url: s!("https://x/?v=1"), ..with_cookie() },
            Config { max_attempts: 0, ..with_cookie() },
            Config { out_dir: PathBuf::new(), ..with_cookie() },
        ];
        for c in cases {
            assert!(matches!(c.validate(), Err(ScrapeError::ConfigurationMissing(_))));
        }
    }

    #[test]
    fn selecting_clubs_by_name() {
        let c = Config::default();
        let picked = c.select_clubs(&[s!("FC Sion"), s!("fc erde"), s!("FC Sion")]).unwrap();
        let names: Vec<&str> = picked.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["FC Sion", "FC Erde"]);

        let err = c.select_clubs(&[s!("FC Nowhere")]).unwrap_err().to_string();
        assert!(err.contains("FC Nowhere"));
        assert!(err.contains("FC Vétroz"));
    }

    #[test]
    fn retry_policy_follows_config() {
        let c = Config { max_attempts: 5, ..Config::default() };
        let p = c.retry_policy();
        assert_eq!(p.max_attempts, 5);
        assert_eq!(p.base_delay, Duration::from_secs(2));
        assert_eq!(p.max_delay, Duration::from_secs(30));
    }
}
