use regex::Regex;

use crate::era::{BUILTIN_ERAS, EraTable, build_era_regex};
use crate::error::ConfigError;

// ── Regex building blocks ──────────────────────────────────────────
//
// Real data examples:
//   令和４年７月４日登記
//   平成３１年 ４月３０日
//   2023年6月24日
//   2023/06/24
//   平成17年法務省令第18号附則第3条第2項の規定により移記
//   平成21年12月
//   5日
//
// Line breaks are removed before matching, so the last example reaches
// the rules as the single line "…移記平成21年12月5日". That clean second
// date is already caught by EraShortForm; EraLegalForm only decides when
// other text sits inside the second date, e.g. "平成21年（略）12月5日".

/// One numeral group, half- or full-width.
const DIGITS: &str = "[0-9０-９]+";
/// Era year: digits or 元 (first year of the era).
const ERA_YEAR: &str = "(?:[0-9０-９]+|元)";

// ── Rule kinds ─────────────────────────────────────────────────────

/// The pattern rules, in the fixed priority they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// {era}{Y}年{M}月{D}日, whitespace allowed around the numerals
    EraShortForm,
    /// YYYY年M月D日
    GregorianLong,
    /// YYYY/M/D
    GregorianSlash,
    /// {era}{Y}年法務省令第N号…の規定により…{era}{Y}年{M}月{D}日
    EraLegalForm,
}

impl RuleKind {
    pub const PRIORITY: [RuleKind; 4] = [
        Self::EraShortForm,
        Self::GregorianLong,
        Self::GregorianSlash,
        Self::EraLegalForm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EraShortForm => "EraShortForm",
            Self::GregorianLong => "GregorianLong",
            Self::GregorianSlash => "GregorianSlash",
            Self::EraLegalForm => "EraLegalForm",
        }
    }

    pub fn is_era_based(&self) -> bool {
        matches!(self, Self::EraShortForm | Self::EraLegalForm)
    }

    fn pattern(&self, era_re: &str) -> String {
        match self {
            Self::EraShortForm => format!(
                r"(?P<era>{era_re})\s*(?P<year>{ERA_YEAR})\s*年\s*(?P<month>{DIGITS})\s*月\s*(?P<day>{DIGITS})\s*日"
            ),
            Self::GregorianLong => {
                r"(?P<year>[0-9０-９]{4})年(?P<month>[0-9０-９]{1,2})月(?P<day>[0-9０-９]{1,2})日".to_string()
            }
            Self::GregorianSlash => {
                r"(?P<year>[0-9０-９]{4})[/／](?P<month>[0-9０-９]{1,2})[/／](?P<day>[0-9０-９]{1,2})".to_string()
            }
            // The first era date names the ordinance; the registration date
            // is the second one, and that is what gets captured.
            Self::EraLegalForm => format!(
                r"(?s)(?P<law_era>{era_re}){ERA_YEAR}年法務省令第{DIGITS}号.*?の規定により.*?(?P<era>{era_re})(?P<year>{ERA_YEAR})年.*?(?P<month>{DIGITS})月.*?(?P<day>{DIGITS})日"
            ),
        }
    }
}

// ── Compiled rule ──────────────────────────────────────────────────

/// Raw numeral groups captured by a rule, before any conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCaptures<'t> {
    pub era: Option<&'t str>,
    pub year: &'t str,
    pub month: &'t str,
    pub day: &'t str,
    /// Matched date text
    pub raw: &'t str,
}

pub struct PatternRule {
    pub kind: RuleKind,
    re: Regex,
}

impl PatternRule {
    fn new(kind: RuleKind, era_re: &str) -> Result<Self, ConfigError> {
        let re = Regex::new(&kind.pattern(era_re))?;
        Ok(PatternRule { kind, re })
    }

    /// First match of this rule anywhere in `text`.
    pub fn captures<'t>(&self, text: &'t str) -> Option<DateCaptures<'t>> {
        let caps = self.re.captures(text)?;
        let start = caps
            .name("law_era")
            .or_else(|| caps.name("era"))
            .or_else(|| caps.name("year"))?
            .start();
        let end = caps.get(0)?.end();
        Some(DateCaptures {
            era: caps.name("era").map(|m| m.as_str()),
            year: caps.name("year")?.as_str(),
            month: caps.name("month")?.as_str(),
            day: caps.name("day")?.as_str(),
            raw: &text[start..end],
        })
    }
}

/// Compile every rule in priority order.
///
/// Era rules recognise the built-in era names plus any extra names in
/// `eras`. A recognised name missing from `eras` still matches, and is
/// reported as an unknown era during resolution.
pub fn build_rules(eras: &EraTable) -> Result<Vec<PatternRule>, ConfigError> {
    let names = BUILTIN_ERAS.iter().map(|e| e.name).chain(eras.names());
    let era_re = build_era_regex(names);

    RuleKind::PRIORITY
        .iter()
        .map(|kind| PatternRule::new(*kind, &era_re))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(kind: RuleKind) -> PatternRule {
        build_rules(&EraTable::builtin())
            .unwrap()
            .into_iter()
            .find(|r| r.kind == kind)
            .unwrap()
    }

    #[test]
    fn test_priority_order() {
        let kinds: Vec<RuleKind> = build_rules(&EraTable::builtin())
            .unwrap()
            .iter()
            .map(|r| r.kind)
            .collect();
        assert_eq!(kinds, RuleKind::PRIORITY.to_vec());
    }

    #[test]
    fn test_era_short_form_full_width() {
        let c = rule(RuleKind::EraShortForm)
            .captures("令和４年７月４日登記")
            .unwrap();
        assert_eq!(c.era, Some("令和"));
        assert_eq!((c.year, c.month, c.day), ("４", "７", "４"));
        assert_eq!(c.raw, "令和４年７月４日");
    }

    #[test]
    fn test_era_short_form_whitespace() {
        let c = rule(RuleKind::EraShortForm)
            .captures("受付 平成 ３１ 年 ４ 月　３０ 日")
            .unwrap();
        assert_eq!(c.era, Some("平成"));
        assert_eq!((c.year, c.month, c.day), ("３１", "４", "３０"));
    }

    #[test]
    fn test_era_short_form_gannen() {
        let c = rule(RuleKind::EraShortForm)
            .captures("令和元年5月1日")
            .unwrap();
        assert_eq!(c.year, "元");
    }

    #[test]
    fn test_era_short_form_ignores_gregorian() {
        assert!(rule(RuleKind::EraShortForm).captures("2023年6月24日").is_none());
    }

    #[test]
    fn test_gregorian_long() {
        let c = rule(RuleKind::GregorianLong)
            .captures("登記日 2023年6月24日 受付")
            .unwrap();
        assert_eq!(c.era, None);
        assert_eq!((c.year, c.month, c.day), ("2023", "6", "24"));
    }

    #[test]
    fn test_gregorian_slash() {
        let c = rule(RuleKind::GregorianSlash)
            .captures("date: 2021/12/05")
            .unwrap();
        assert_eq!((c.year, c.month, c.day), ("2021", "12", "05"));
    }

    #[test]
    fn test_gregorian_year_anywhere_in_digit_run() {
        let c = rule(RuleKind::GregorianSlash).captures("12023/1/1").unwrap();
        assert_eq!((c.year, c.month, c.day), ("2023", "1", "1"));
        let c = rule(RuleKind::GregorianLong).captures("12023年6月24日").unwrap();
        assert_eq!(c.raw, "2023年6月24日");
        let c = rule(RuleKind::GregorianLong).captures("第2023年6月24日").unwrap();
        assert_eq!(c.raw, "2023年6月24日");
    }

    #[test]
    fn test_gregorian_slash_needs_four_digit_year() {
        assert!(rule(RuleKind::GregorianSlash).captures("21/12/05").is_none());
    }

    #[test]
    fn test_legal_form_takes_second_date() {
        let text = "平成17年法務省令第18号附則第3条第2項の規定により移記平成21年（略）12月5日";
        let c = rule(RuleKind::EraLegalForm).captures(text).unwrap();
        assert_eq!(c.era, Some("平成"));
        assert_eq!((c.year, c.month, c.day), ("21", "12", "5"));
    }

    #[test]
    fn test_legal_form_requires_statute_phrase() {
        let text = "平成17年法務省令第18号により平成21年12月5日";
        assert!(rule(RuleKind::EraLegalForm).captures(text).is_none());
    }

    #[test]
    fn test_extra_era_name_recognised() {
        let rules = build_rules(&EraTable::builtin().with_era("慶応", 1865)).unwrap();
        let c = rules[0].captures("慶応3年10月14日").unwrap();
        assert_eq!(c.era, Some("慶応"));
    }
}
