use thiserror::Error;

/// Why a single fragment produced no usable date.
///
/// These never abort a run: the extractor turns each one into a failure
/// record and moves on to the next fragment.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FragmentError {
    #[error("no date pattern matched")]
    PatternMiss,

    #[error("unknown era {era}")]
    EraUnknown { era: String },

    #[error("invalid calendar date {year}-{month}-{day}")]
    CalendarInvalid {
        year: String,
        month: String,
        day: String,
    },
}

/// Caller-visible configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid era spec {0:?}, expected NAME=YEAR")]
    InvalidEraSpec(String),

    #[error("invalid era start year {0:?}")]
    InvalidStartYear(String),

    #[error("date pattern failed to compile: {0}")]
    Pattern(#[from] regex::Error),
}
