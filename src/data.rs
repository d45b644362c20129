// src/data.rs
//
// Row-level data model shared by extraction, export and summary.
//
// - TrainerRecord: one output row, always six fields in FIELDNAMES order.
// - ClubTarget: one configured club (display name + MatchCenter id).

/// Placeholder for any value the page did not provide.
pub const NA: &str = "N/A";

/// Column names, in output order.
pub const FIELDNAMES: [&str; 6] = [
    "club",
    "role",
    "name",
    "mobile_phone",
    "private_phone",
    "email",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClubTarget {
    pub name: String,
    pub id: String,
}

impl ClubTarget {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self { name: name.into(), id: id.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainerRecord {
    pub club: String,
    pub role: String,
    pub name: String,
    pub mobile_phone: String,
    pub private_phone: String,
    pub email: String,
}

impl TrainerRecord {
    /// A record for `club` with every other field set to the sentinel.
    pub fn empty(club: &str) -> Self {
        Self {
            club: or_na(club),
            role: na!(),
            name: na!(),
            mobile_phone: na!(),
            private_phone: na!(),
            email: na!(),
        }
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.club.clone(),
            self.role.clone(),
            self.name.clone(),
            self.mobile_phone.clone(),
            self.private_phone.clone(),
            self.email.clone(),
        ]
    }
}

/// Trimmed value, or the sentinel when nothing is left.
pub fn or_na(s: &str) -> String {
    let t = s.trim();
    if t.is_empty() { na!() } else { s!(t) }
}

pub fn header_row() -> Vec<String> {
    FIELDNAMES.iter().map(|f| s!(*f)).collect()
}
