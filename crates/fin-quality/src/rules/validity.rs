//! Range and format rules for years, revenue amounts, fiscal periods and
//! industry codes. Values that cannot be read as the expected kind fail.

use super::ValueRule;
use crate::types::RuleKind;
use crate::utils::{cell_integer, cell_real, cell_text};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

static FISCAL_PERIOD_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{1,2}-(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)$")
        .expect("Invalid regex: fiscal period end")
});

// Prefix match only (no end anchor).
static INDUSTRY_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}\s*-\s*.+").expect("Invalid regex: industry code"));

/// Integer year within an inclusive range.
pub struct YearRangeRule {
    column: String,
    min: i64,
    max: i64,
}

impl YearRangeRule {
    pub fn new(column: impl Into<String>, min: i64, max: i64) -> Self {
        Self {
            column: column.into(),
            min,
            max,
        }
    }
}

impl ValueRule for YearRangeRule {
    fn kind(&self) -> RuleKind {
        RuleKind::YearRange
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn accepts(&self, value: &AnyValue<'_>) -> bool {
        cell_integer(value).is_some_and(|year| (self.min..=self.max).contains(&year))
    }
}

/// Non-negative amount no larger than a ceiling.
pub struct RevenueRangeRule {
    column: String,
    max: f64,
}

impl RevenueRangeRule {
    pub fn new(column: impl Into<String>, max: f64) -> Self {
        Self {
            column: column.into(),
            max,
        }
    }
}

impl ValueRule for RevenueRangeRule {
    fn kind(&self) -> RuleKind {
        RuleKind::RevenueRange
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn accepts(&self, value: &AnyValue<'_>) -> bool {
        // A parsed NaN compares false on both sides and passes.
        cell_real(value).is_some_and(|amount| !(amount < 0.0 || amount > self.max))
    }
}

/// Text form checked against a compiled pattern.
pub struct PatternRule {
    kind: RuleKind,
    column: String,
    pattern: &'static Lazy<Regex>,
}

impl PatternRule {
    /// `D-Mon` or `DD-Mon`, e.g. `30-Jun`.
    pub fn fiscal_period_end(column: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::FiscalPeriodFormat,
            column: column.into(),
            pattern: &FISCAL_PERIOD_PATTERN,
        }
    }

    /// Four digits, a hyphen, then a description, e.g. `7010 - Holding companies`.
    pub fn industry_code(column: impl Into<String>) -> Self {
        Self {
            kind: RuleKind::IndustryCodeFormat,
            column: column.into(),
            pattern: &INDUSTRY_CODE_PATTERN,
        }
    }

    pub fn accepts_text(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

impl ValueRule for PatternRule {
    fn kind(&self) -> RuleKind {
        self.kind
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn accepts(&self, value: &AnyValue<'_>) -> bool {
        cell_text(value).is_some_and(|text| self.accepts_text(&text))
    }
}
