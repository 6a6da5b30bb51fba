use crate::config::columns::FLAG_PREFIX;
use serde::{Deserialize, Serialize};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use std::fmt;

/// The four quality dimensions, in evaluation order.
///
/// The derived `Ord` follows declaration order, so any `BTreeMap` keyed by
/// dimension iterates (and serializes) completeness first and uniqueness last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityDimension {
    Completeness,
    Consistency,
    Validity,
    Uniqueness,
}

impl QualityDimension {
    /// All dimensions in evaluation order.
    pub const ALL: [QualityDimension; 4] = [
        QualityDimension::Completeness,
        QualityDimension::Consistency,
        QualityDimension::Validity,
        QualityDimension::Uniqueness,
    ];

    /// Machine name, as used in report keys and flag column names.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Completeness => "completeness",
            Self::Consistency => "consistency",
            Self::Validity => "validity",
            Self::Uniqueness => "uniqueness",
        }
    }

    /// Returns a human-readable name for the dimension.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Completeness => "Completeness",
            Self::Consistency => "Consistency",
            Self::Validity => "Validity",
            Self::Uniqueness => "Uniqueness",
        }
    }

    /// Name of the per-record flag column this dimension writes.
    pub fn flag_column(&self) -> String {
        format!("{}{}", FLAG_PREFIX, self.name())
    }
}

impl fmt::Display for QualityDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which sub-condition flagged a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// A critical column is null.
    MissingValue,
    /// Company name is neither upper-case, title-case nor the allowed pattern.
    CompanyNameFormat,
    /// Operation status outside the allowed set.
    OperationStatus,
    /// IPO status outside the allowed set.
    IpoStatus,
    /// Currency unit is not a three-letter code.
    CurrencyCode,
    /// Year unparsable or outside the accepted range.
    YearRange,
    /// Revenue unparsable, negative or above the ceiling.
    RevenueRange,
    /// Fiscal period end not in `D-Mon` form.
    FiscalPeriodFormat,
    /// Industry code not in `NNNN - Description` form.
    IndustryCodeFormat,
    /// Key tuple shared with at least one other record.
    DuplicateKey,
}

impl RuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::MissingValue => "missing_value",
            Self::CompanyNameFormat => "company_name_format",
            Self::OperationStatus => "operation_status",
            Self::IpoStatus => "ipo_status",
            Self::CurrencyCode => "currency_code",
            Self::YearRange => "year_range",
            Self::RevenueRange => "revenue_range",
            Self::FiscalPeriodFormat => "fiscal_period_format",
            Self::IndustryCodeFormat => "industry_code_format",
            Self::DuplicateKey => "duplicate_key",
        }
    }
}

/// The first failing sub-check for one record, with the column it read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleViolation {
    pub rule: RuleKind,
    pub column: String,
}

impl RuleViolation {
    pub fn new(rule: RuleKind, column: impl Into<String>) -> Self {
        Self {
            rule,
            column: column.into(),
        }
    }
}

/// Dataset-level result of one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionResult {
    /// Number of flagged records.
    pub total_issues: usize,
    /// Flagged records as a percentage of all records (0.0 for an empty dataset).
    pub percentage: f64,
    /// Which columns or rules were checked.
    pub description: String,
}

impl DimensionResult {
    pub fn new(total_issues: usize, record_count: usize, description: impl Into<String>) -> Self {
        Self {
            total_issues,
            percentage: crate::utils::percentage(total_issues, record_count),
            description: description.into(),
        }
    }
}

/// Dimension results keyed by dimension, iterated in evaluation order.
pub type QualityMeasures = BTreeMap<QualityDimension, DimensionResult>;

/// Everything one evaluator produced for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionOutcome {
    pub dimension: QualityDimension,
    pub result: DimensionResult,
    /// One entry per record: the violation that flagged it, if any.
    pub violations: Vec<Option<RuleViolation>>,
}

impl DimensionOutcome {
    /// Per-record flags (0 or 1), in record order.
    pub fn flags(&self) -> Vec<i64> {
        self.violations
            .iter()
            .map(|v| i64::from(v.is_some()))
            .collect()
    }

    /// Count of flagged records per rule.
    pub fn rule_counts(&self) -> BTreeMap<RuleKind, usize> {
        let mut counts = BTreeMap::new();
        for violation in self.violations.iter().flatten() {
            *counts.entry(violation.rule).or_insert(0) += 1;
        }
        counts
    }
}

/// Outcomes of a full run over all four dimensions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityRun {
    /// One outcome per dimension, in evaluation order.
    pub outcomes: Vec<DimensionOutcome>,
}

impl QualityRun {
    /// Dimension results keyed by dimension.
    pub fn measures(&self) -> QualityMeasures {
        self.outcomes
            .iter()
            .map(|o| (o.dimension, o.result.clone()))
            .collect()
    }

    pub fn outcome(&self, dimension: QualityDimension) -> Option<&DimensionOutcome> {
        self.outcomes.iter().find(|o| o.dimension == dimension)
    }

    /// Per-record OR of every dimension's flag.
    pub fn overall_flags(&self, record_count: usize) -> Vec<i64> {
        let mut overall = vec![0i64; record_count];
        for outcome in &self.outcomes {
            for (slot, flag) in overall.iter_mut().zip(outcome.flags()) {
                *slot = (*slot).max(flag);
            }
        }
        overall
    }

    /// Every violation recorded against one record, in evaluation order.
    pub fn violations_for(&self, row: usize) -> Vec<(QualityDimension, &RuleViolation)> {
        self.outcomes
            .iter()
            .filter_map(|o| {
                o.violations
                    .get(row)
                    .and_then(Option::as_ref)
                    .map(|v| (o.dimension, v))
            })
            .collect()
    }
}

/// Schema metadata captured in the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// Column names in dataset order.
    pub columns: Vec<String>,
    /// Type label per column, in dataset order.
    pub data_types: IndexMap<String, String>,
}

/// Machine-readable quality report for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitySummary {
    pub total_records: usize,
    pub quality_measures: QualityMeasures,
    /// 0.0 - 100.0
    pub overall_quality_score: f64,
    /// ISO-8601 (RFC 3339) generation time.
    pub timestamp: String,
    pub dataset_info: DatasetInfo,
}
