//! Date extraction for Japanese registry text.
//!
//! Scans free-form fragments for Japanese-era (`令和４年７月４日`) and
//! Gregorian (`2023年6月24日`, `2023/6/24`) dates, normalizes each to
//! YYYYMMDD and reports which fragment carries the most recent one.

pub mod era;
pub mod error;
pub mod extractor;
pub mod numerals;
pub mod rules;

pub use era::EraTable;
pub use error::{ConfigError, FragmentError};
pub use extractor::{CanonicalDate, DateExtractor, Extraction, FragmentOutcome, LatestDate};
pub use rules::RuleKind;
