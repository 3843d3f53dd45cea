use std::fmt;

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use crate::era::EraTable;
use crate::error::{ConfigError, FragmentError};
use crate::numerals::{parse_digits, parse_era_year, to_half_width_digits};
use crate::rules::{DateCaptures, PatternRule, RuleKind, build_rules};

/// Used when the caller supplies no fragments.
pub const SAMPLE_FRAGMENTS: &[&str] = &[
    "令和４年７月４日登記",
    "2023年6月24日",
    "Some text without a date",
];

// ── Canonical date ───────────────────────────────────────────────────

/// A calendar-valid date in years 1–9999, printed as YYYYMMDD.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalDate(NaiveDate);

impl CanonicalDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        if !(1..=9999).contains(&year) {
            return None;
        }
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn yyyymmdd(&self) -> String {
        format!(
            "{:04}{:02}{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl fmt::Display for CanonicalDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.yyyymmdd())
    }
}

// ── Per-fragment outcome ─────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentOutcome {
    Found {
        /// 1-indexed position in the input list
        position: usize,
        date: CanonicalDate,
        rule: RuleKind,
    },
    Failed {
        position: usize,
        /// The fragment as supplied, line breaks included
        fragment: String,
        error: FragmentError,
    },
}

impl FragmentOutcome {
    pub fn position(&self) -> usize {
        match self {
            Self::Found { position, .. } | Self::Failed { position, .. } => *position,
        }
    }

    pub fn date(&self) -> Option<CanonicalDate> {
        match self {
            Self::Found { date, .. } => Some(*date),
            Self::Failed { .. } => None,
        }
    }

    /// Human-readable failure detail, `None` for found dates.
    pub fn detail(&self) -> Option<String> {
        match self {
            Self::Found { .. } => None,
            Self::Failed {
                fragment, error, ..
            } => Some(format!("{error}: {}", strip_line_breaks(fragment))),
        }
    }
}

/// The most recent date across an input list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestDate {
    pub position: usize,
    pub date: CanonicalDate,
}

/// Everything a run produced: one outcome per fragment, plus the winner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub outcomes: Vec<FragmentOutcome>,
    pub latest: Option<LatestDate>,
}

impl Extraction {
    pub fn found(&self) -> impl Iterator<Item = &FragmentOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FragmentOutcome::Found { .. }))
    }

    pub fn failures(&self) -> impl Iterator<Item = &FragmentOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, FragmentOutcome::Failed { .. }))
    }
}

// ── Extractor ────────────────────────────────────────────────────────

/// Finds the first date in each fragment and picks the latest one.
///
/// Holds only read-only state (the era table and compiled rules), so a
/// single extractor can serve any number of independent runs.
pub struct DateExtractor {
    eras: EraTable,
    rules: Vec<PatternRule>,
}

impl DateExtractor {
    pub fn new(eras: EraTable) -> Result<Self, ConfigError> {
        let rules = build_rules(&eras)?;
        Ok(DateExtractor { eras, rules })
    }

    pub fn eras(&self) -> &EraTable {
        &self.eras
    }

    /// Position and date of the most recent date, or `None` if no
    /// fragment holds a valid one.
    pub fn extract<S: AsRef<str>>(&self, fragments: &[S]) -> Option<LatestDate> {
        self.report(fragments).latest
    }

    pub fn report<S: AsRef<str>>(&self, fragments: &[S]) -> Extraction {
        let outcomes = self.scan(fragments);
        let latest = select_latest(&outcomes);
        Extraction { outcomes, latest }
    }

    /// One outcome per fragment, in input order.
    ///
    /// Failures are logged as `"<position>: <detail>"` and recorded; they
    /// never stop the scan.
    pub fn scan<S: AsRef<str>>(&self, fragments: &[S]) -> Vec<FragmentOutcome> {
        fragments
            .iter()
            .enumerate()
            .map(|(i, fragment)| {
                let position = i + 1;
                let fragment = fragment.as_ref();
                let outcome = match self.extract_one(fragment) {
                    Ok((date, rule)) => {
                        debug!(position, rule = rule.as_str(), %date, "date found");
                        FragmentOutcome::Found {
                            position,
                            date,
                            rule,
                        }
                    }
                    Err(error) => FragmentOutcome::Failed {
                        position,
                        fragment: fragment.to_string(),
                        error,
                    },
                };
                if let Some(detail) = outcome.detail() {
                    warn!("{position}: {detail}");
                }
                outcome
            })
            .collect()
    }

    /// Date carried by a single fragment and the rule that found it.
    ///
    /// Rules are tried in priority order; the first one that yields a
    /// valid date wins. When none does, the first error more specific than
    /// a pattern miss is returned.
    pub fn extract_one(&self, fragment: &str) -> Result<(CanonicalDate, RuleKind), FragmentError> {
        let text = strip_line_breaks(fragment);
        let mut first_error: Option<FragmentError> = None;

        for rule in &self.rules {
            let Some(caps) = rule.captures(&text) else {
                continue;
            };
            match self.resolve(rule.kind, &caps) {
                Ok(date) => return Ok((date, rule.kind)),
                Err(e) => {
                    debug!(rule = rule.kind.as_str(), raw = caps.raw, error = %e, "match rejected");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        Err(first_error.unwrap_or(FragmentError::PatternMiss))
    }

    /// Turn captured numeral groups into a validated date.
    fn resolve(&self, kind: RuleKind, caps: &DateCaptures<'_>) -> Result<CanonicalDate, FragmentError> {
        let invalid = |year: String| FragmentError::CalendarInvalid {
            year,
            month: to_half_width_digits(caps.month),
            day: to_half_width_digits(caps.day),
        };

        let year = match (kind.is_era_based(), caps.era) {
            (true, Some(era)) => {
                if self.eras.start_year(era).is_none() {
                    return Err(FragmentError::EraUnknown {
                        era: era.to_string(),
                    });
                }
                let era_year = parse_era_year(caps.year)
                    .ok_or_else(|| invalid(format!("{era}{}", to_half_width_digits(caps.year))))?;
                self.eras
                    .to_gregorian(era, era_year)
                    .ok_or_else(|| invalid(format!("{era}{era_year}")))?
            }
            _ => parse_digits(caps.year)
                .and_then(|y| i32::try_from(y).ok())
                .ok_or_else(|| invalid(to_half_width_digits(caps.year)))?,
        };

        let month = parse_digits(caps.month);
        let day = parse_digits(caps.day);
        let date = match (month, day) {
            (Some(m), Some(d)) => CanonicalDate::from_ymd(year, m, d),
            _ => None,
        };
        date.ok_or_else(|| invalid(year.to_string()))
    }
}

/// Latest date among the found outcomes. Ties go to the earliest fragment.
pub fn select_latest(outcomes: &[FragmentOutcome]) -> Option<LatestDate> {
    outcomes.iter().fold(None, |best: Option<LatestDate>, o| {
        let FragmentOutcome::Found { position, date, .. } = o else {
            return best;
        };
        match best {
            Some(b) if b.date >= *date => Some(b),
            _ => Some(LatestDate {
                position: *position,
                date: *date,
            }),
        }
    })
}

/// Remove embedded `\n` / `\r` so dates broken across lines match as one.
pub fn strip_line_breaks(s: &str) -> String {
    s.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}
