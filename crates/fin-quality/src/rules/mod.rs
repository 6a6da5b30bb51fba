//! Per-record rule definitions.
//!
//! A [`ValueRule`] looks at one column of one record and decides whether the
//! value is acceptable. A [`RuleSet`] binds its rules to the columns a
//! dataset actually has and reports, for every record, the first rule that
//! rejected it. Missing columns and missing values are skipped: absence is
//! the completeness check's concern, not a format defect.

mod consistency;
mod validity;

pub use consistency::{AllowedValuesRule, CompanyNameRule, CurrencyCodeRule};
pub use validity::{PatternRule, RevenueRangeRule, YearRangeRule};

use crate::config::QualityConfig;
use crate::config::columns;
use crate::types::{RuleKind, RuleViolation};
use crate::utils::is_missing;
use polars::prelude::*;

/// A predicate over the value of a single column.
pub trait ValueRule: Send + Sync {
    /// Sub-condition reported when this rule rejects a value.
    fn kind(&self) -> RuleKind;

    /// Column this rule reads.
    fn column(&self) -> &str;

    /// Whether a present (non-null, non-NaN) value passes.
    fn accepts(&self, value: &AnyValue<'_>) -> bool;
}

/// An ordered list of rules evaluated with OR semantics.
pub struct RuleSet {
    rules: Vec<Box<dyn ValueRule>>,
}

impl RuleSet {
    pub fn new(rules: Vec<Box<dyn ValueRule>>) -> Self {
        Self { rules }
    }

    /// Company name, operation status, IPO status and currency unit checks.
    pub fn consistency(config: &QualityConfig) -> Self {
        Self::new(vec![
            Box::new(CompanyNameRule::new(columns::COMPANY_NAME)),
            Box::new(AllowedValuesRule::new(
                RuleKind::OperationStatus,
                columns::OPERATION_STATUS,
                &config.operation_statuses,
            )),
            Box::new(AllowedValuesRule::new(
                RuleKind::IpoStatus,
                columns::IPO_STATUS,
                &config.ipo_statuses,
            )),
            Box::new(CurrencyCodeRule::new(columns::REVENUE_UNIT)),
        ])
    }

    /// Year, revenue, fiscal period end and industry code checks.
    pub fn validity(config: &QualityConfig) -> Self {
        Self::new(vec![
            Box::new(YearRangeRule::new(
                columns::TIME_VALUE,
                config.min_year,
                config.max_year,
            )),
            Box::new(RevenueRangeRule::new(columns::REVENUE, config.max_revenue)),
            Box::new(PatternRule::fiscal_period_end(columns::FISCAL_PERIOD_END)),
            Box::new(PatternRule::industry_code(columns::INDUSTRY_CODE)),
        ])
    }

    /// Names of the rule columns present in `df`, in rule order.
    pub fn applicable_columns(&self, df: &DataFrame) -> Vec<String> {
        self.bind(df)
            .into_iter()
            .map(|(rule, _)| rule.column().to_string())
            .collect()
    }

    /// Evaluate every record of `df`, returning one entry per record.
    pub fn evaluate(&self, df: &DataFrame) -> PolarsResult<Vec<Option<RuleViolation>>> {
        let bound = self.bind(df);
        (0..df.height())
            .map(|row| evaluate_record(&bound, row))
            .collect()
    }

    fn bind<'a>(&'a self, df: &'a DataFrame) -> Vec<(&'a dyn ValueRule, &'a Column)> {
        self.rules
            .iter()
            .filter_map(|rule| {
                df.column(rule.column())
                    .ok()
                    .map(|column| (rule.as_ref(), column))
            })
            .collect()
    }
}

/// First rule that rejects the record at `row`, if any.
fn evaluate_record(
    bound: &[(&dyn ValueRule, &Column)],
    row: usize,
) -> PolarsResult<Option<RuleViolation>> {
    for (rule, column) in bound {
        let value = column.get(row)?;
        if is_missing(&value) {
            continue;
        }
        if !rule.accepts(&value) {
            return Ok(Some(RuleViolation::new(rule.kind(), rule.column())));
        }
    }
    Ok(None)
}
