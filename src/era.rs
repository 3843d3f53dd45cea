//! Japanese imperial eras (元号) and their first Gregorian years.
//!
//! An [`EraTable`] is a read-only value handed to the extractor. The
//! built-in table covers the modern eras; callers can extend or override
//! entries before constructing an extractor, but nothing mutates a table
//! once extraction starts.

use std::str::FromStr;

use crate::error::ConfigError;

// ── Built-in eras ────────────────────────────────────────────────────

/// A single built-in era name with its romanized form.
pub struct EraEntry {
    pub name: &'static str,
    pub romaji: &'static str,
    pub start_year: i32,
}

/// Modern eras, chronological. Era boundaries overlap by convention:
/// 平成31年4月30日 and 令和1年5月1日 are consecutive days in 2019.
pub static BUILTIN_ERAS: &[EraEntry] = &[
    EraEntry {
        name: "明治",
        romaji: "Meiji",
        start_year: 1868,
    },
    EraEntry {
        name: "大正",
        romaji: "Taisho",
        start_year: 1912,
    },
    EraEntry {
        name: "昭和",
        romaji: "Showa",
        start_year: 1926,
    },
    EraEntry {
        name: "平成",
        romaji: "Heisei",
        start_year: 1989,
    },
    EraEntry {
        name: "令和",
        romaji: "Reiwa",
        start_year: 2019,
    },
];

/// Romanized name of a built-in era, if known.
pub fn romaji(name: &str) -> Option<&'static str> {
    BUILTIN_ERAS
        .iter()
        .find(|e| e.name == name)
        .map(|e| e.romaji)
}

// ── Era table ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Era {
    pub name: String,
    pub start_year: i32,
}

/// Mapping from era name to the Gregorian year of its first year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraTable {
    eras: Vec<Era>,
}

impl Default for EraTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl EraTable {
    /// Meiji through Reiwa.
    pub fn builtin() -> Self {
        Self {
            eras: BUILTIN_ERAS
                .iter()
                .map(|e| Era {
                    name: e.name.to_string(),
                    start_year: e.start_year,
                })
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self { eras: Vec::new() }
    }

    /// Add an era, replacing the start year if the name already exists.
    pub fn with_era(mut self, name: impl Into<String>, start_year: i32) -> Self {
        let name = name.into();
        match self.eras.iter_mut().find(|e| e.name == name) {
            Some(existing) => existing.start_year = start_year,
            None => self.eras.push(Era { name, start_year }),
        }
        self
    }

    pub fn start_year(&self, name: &str) -> Option<i32> {
        self.eras
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.start_year)
    }

    /// Gregorian year for `era_year` of `name` (year 1 is the start year).
    pub fn to_gregorian(&self, name: &str, era_year: u32) -> Option<i32> {
        let start = self.start_year(name)?;
        let offset = i32::try_from(era_year).ok()?;
        start.checked_add(offset)?.checked_sub(1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.eras.iter().map(|e| e.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Era> {
        self.eras.iter()
    }

    pub fn len(&self) -> usize {
        self.eras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.eras.is_empty()
    }
}

// ── Era spec from the command line ───────────────────────────────────

/// `NAME=YEAR`, e.g. `慶応=1865`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraSpec {
    pub name: String,
    pub start_year: i32,
}

impl FromStr for EraSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, year) = s
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidEraSpec(s.to_string()))?;
        let name = name.trim();
        if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c.is_ascii_digit()) {
            return Err(ConfigError::InvalidEraSpec(s.to_string()));
        }
        let start_year = year
            .trim()
            .parse::<i32>()
            .ok()
            .filter(|y| (1..=9999).contains(y))
            .ok_or_else(|| ConfigError::InvalidStartYear(year.trim().to_string()))?;
        Ok(EraSpec {
            name: name.to_string(),
            start_year,
        })
    }
}

// ── Regex support ────────────────────────────────────────────────────

/// Build a regex alternation matching any of the given era names.
/// Sorted by length descending so a longer name wins over its prefix.
pub fn build_era_regex<'a>(names: impl IntoIterator<Item = &'a str>) -> String {
    let mut names: Vec<&str> = names.into_iter().collect();
    names.sort_by_key(|b| std::cmp::Reverse(b.chars().count()));
    names.dedup();
    let escaped: Vec<String> = names.iter().map(|n| regex::escape(n)).collect();
    format!("(?:{})", escaped.join("|"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_start_years() {
        let table = EraTable::builtin();
        assert_eq!(table.start_year("明治"), Some(1868));
        assert_eq!(table.start_year("大正"), Some(1912));
        assert_eq!(table.start_year("昭和"), Some(1926));
        assert_eq!(table.start_year("平成"), Some(1989));
        assert_eq!(table.start_year("令和"), Some(2019));
        assert_eq!(table.len(), 5);
    }

    #[test]
    fn test_to_gregorian() {
        let table = EraTable::builtin();
        assert_eq!(table.to_gregorian("令和", 1), Some(2019));
        assert_eq!(table.to_gregorian("令和", 4), Some(2022));
        assert_eq!(table.to_gregorian("平成", 31), Some(2019));
        assert_eq!(table.to_gregorian("昭和", 64), Some(1989));
    }

    #[test]
    fn test_to_gregorian_unknown_era() {
        assert!(EraTable::builtin().to_gregorian("慶応", 3).is_none());
        assert!(EraTable::empty().to_gregorian("令和", 1).is_none());
    }

    #[test]
    fn test_with_era_adds_and_overrides() {
        let table = EraTable::builtin().with_era("慶応", 1865).with_era("令和", 2020);
        assert_eq!(table.start_year("慶応"), Some(1865));
        assert_eq!(table.start_year("令和"), Some(2020));
        assert_eq!(table.len(), 6);
    }

    #[test]
    fn test_era_spec_parse() {
        let spec: EraSpec = "慶応=1865".parse().unwrap();
        assert_eq!(spec.name, "慶応");
        assert_eq!(spec.start_year, 1865);
    }

    #[test]
    fn test_era_spec_rejects_malformed() {
        assert!("慶応".parse::<EraSpec>().is_err());
        assert!("=1865".parse::<EraSpec>().is_err());
        assert!("慶応=soon".parse::<EraSpec>().is_err());
        assert!("慶応=0".parse::<EraSpec>().is_err());
        assert!("慶 応=1865".parse::<EraSpec>().is_err());
    }

    #[test]
    fn test_build_era_regex_longest_first() {
        let re = build_era_regex(["令和", "天平感宝", "天平"]);
        assert_eq!(re, "(?:天平感宝|令和|天平)");
    }

    #[test]
    fn test_romaji() {
        assert_eq!(romaji("令和"), Some("Reiwa"));
        assert_eq!(romaji("慶応"), None);
    }
}
