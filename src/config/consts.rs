// src/config/consts.rs

// Net config
pub const BASE_URL: &str = "https://matchcenter.avf-wfv.ch/default.aspx?v={club_id}&oid=17&lng=2&a=tr";
pub const CLUB_ID_PLACEHOLDER: &str = "{club_id}";

/// Sent with every request so the site serves the regular desktop page.
pub const HEADERS: [&str; 6] = [
    "User-Agent: Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
    "Accept: text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    "Accept-Language: en-US,en;q=0.5",
    "Connection: keep-alive",
    "Upgrade-Insecure-Requests: 1",
    "Cache-Control: max-age=0",
];

// Clubs (display name, MatchCenter id), in scrape order
pub const CLUBS: [(&str, &str); 14] = [
    ("FC Vétroz", "1005"),
    ("FC Conthey", "970"),
    ("FC Sion", "1000"),
    ("FC Bramois", "964"),
    ("FC Châteauneuf", "967"),
    ("FC Grimisuat", "976"),
    ("US Ayent-Arbaz", "962"),
    ("FC Chalais", "1011"),
    ("FC Riddes", "990"),
    ("FC Printse-Nendaz", "1006753"),
    ("FC Erde", "971"),
    ("FC US Hérens", "1006"),
    ("FC Sierre", "999"),
    ("FC Granges", "975"),
];

// Retry
pub const MAX_ATTEMPTS: u32 = 3;
pub const RETRY_BASE_DELAY_SECS: u64 = 2;
pub const RETRY_MAX_DELAY_SECS: u64 = 30;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

// Pacing
pub const DELAY_SECS: u64 = 3; // be polite

// Export
pub const DEFAULT_OUT_DIR: &str = "data";
pub const COMBINED_FILENAME: &str = "combined_club_trainers.xlsx";
pub const SEPARATE_SHEETS: bool = true;

// Logging
pub const LOG_FILE: &str = "avf_scraper.log";

// Environment overrides
pub const ENV_COOKIE: &str = "AVF_COOKIE";
pub const ENV_OUTPUT_DIR: &str = "AVF_OUTPUT_DIR";
pub const ENV_DELAY: &str = "AVF_DELAY";
