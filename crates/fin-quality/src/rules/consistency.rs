//! Formatting rules for names, status types and currency codes.

use super::ValueRule;
use crate::types::RuleKind;
use crate::utils::{cell_text, is_title_cased, is_upper_cased};
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;

/// Upper-case initial followed only by upper-case letters and the
/// punctuation that appears in registered company names.
static COMPANY_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Z\s&\.\-\(\),]*$").expect("Invalid regex: company name")
});

static CURRENCY_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("Invalid regex: currency code"));

/// Company names must be upper-case, title-case, or match the registered-name pattern.
pub struct CompanyNameRule {
    column: String,
}

impl CompanyNameRule {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    pub fn accepts_name(name: &str) -> bool {
        is_upper_cased(name) || is_title_cased(name) || COMPANY_NAME_PATTERN.is_match(name)
    }
}

impl ValueRule for CompanyNameRule {
    fn kind(&self) -> RuleKind {
        RuleKind::CompanyNameFormat
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn accepts(&self, value: &AnyValue<'_>) -> bool {
        cell_text(value).is_some_and(|name| Self::accepts_name(&name))
    }
}

/// Case-insensitive membership in a fixed vocabulary.
pub struct AllowedValuesRule {
    kind: RuleKind,
    column: String,
    allowed: Vec<String>,
}

impl AllowedValuesRule {
    pub fn new(kind: RuleKind, column: impl Into<String>, allowed: &[String]) -> Self {
        Self {
            kind,
            column: column.into(),
            allowed: allowed.iter().map(|v| v.to_uppercase()).collect(),
        }
    }

    pub fn accepts_text(&self, text: &str) -> bool {
        let upper = text.to_uppercase();
        self.allowed.iter().any(|v| *v == upper)
    }
}

impl ValueRule for AllowedValuesRule {
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

/// Three-letter currency code, compared after upper-casing.
pub struct CurrencyCodeRule {
    column: String,
}

impl CurrencyCodeRule {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }

    pub fn accepts_code(code: &str) -> bool {
        CURRENCY_CODE_PATTERN.is_match(&code.to_uppercase())
    }
}

impl ValueRule for CurrencyCodeRule {
    fn kind(&self) -> RuleKind {
        RuleKind::CurrencyCode
    }

    fn column(&self) -> &str {
        &self.column
    }

    fn accepts(&self, value: &AnyValue<'_>) -> bool {
        cell_text(value).is_some_and(|code| Self::accepts_code(&code))
    }
}
