use serde::{Deserialize, Serialize};

// ── Latest date ──────────────────────────────────────────────────────────

/// The most recent date found across the whole input list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestEntry {
    /// 1-indexed position of the fragment that carried the date
    pub position: usize,
    /// Canonical 8-digit form, e.g. "20230624"
    pub yyyymmdd: String,
    pub fragment: String,
}

// ── Per-fragment records ─────────────────────────────────────────────────

/// A fragment that yielded a valid calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub position: usize,
    pub yyyymmdd: String,
    /// Which pattern rule produced the date (EraShortForm, GregorianLong, ...)
    pub rule: String,
}

/// A fragment with no usable date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub position: usize,
    pub fragment: String,
    pub detail: String,
}

// ── JSON output format ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateReport {
    /// `null` when no fragment produced a valid date
    pub latest: Option<LatestEntry>,
    #[serde(default)]
    pub matches: Vec<MatchEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailureEntry>,
}

impl DateReport {
    pub fn is_empty(&self) -> bool {
        self.latest.is_none()
    }
}
