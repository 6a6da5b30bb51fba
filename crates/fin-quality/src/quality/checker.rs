use crate::config::QualityConfig;
use crate::config::columns::{FLAG_OVERALL, FLAG_PREFIX};
use crate::error::{Result, ResultExt};
use crate::quality::summary::SummaryBuilder;
use crate::rules::RuleSet;
use crate::types::{
    DimensionOutcome, DimensionResult, QualityDimension, QualityRun, QualitySummary, RuleKind,
    RuleViolation,
};
use crate::utils::{cell_text, column_names, has_column, is_missing};
use polars::prelude::*;
use std::collections::HashMap;
use tracing::{debug, info, warn};

const CONSISTENCY_DESCRIPTION: &str =
    "Inconsistent formatting in company names, status types, or currency codes";
const VALIDITY_DESCRIPTION: &str = "Invalid data ranges, formats, or values detected";

/// Evaluates a dataset against the four quality dimensions.
///
/// Every `check_*` method appends (or replaces) its flag column on the
/// DataFrame and returns its outcome; nothing is accumulated on the checker,
/// so one instance can serve any number of datasets.
///
/// # Example
///
/// ```rust,ignore
/// use fin_quality::QualityChecker;
///
/// let checker = QualityChecker::default();
/// let run = checker.run_all_checks(&mut df)?;
/// let summary = checker.generate_quality_summary(&df, &run);
/// println!("Score: {:.2}", summary.overall_quality_score);
/// ```
pub struct QualityChecker {
    config: QualityConfig,
    consistency_rules: RuleSet,
    validity_rules: RuleSet,
}

static_assertions::assert_impl_all!(QualityChecker: Send, Sync);

impl Default for QualityChecker {
    fn default() -> Self {
        Self::from_valid_config(QualityConfig::default())
    }
}

impl QualityChecker {
    /// Create a checker, validating the configuration first.
    pub fn new(config: QualityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: QualityConfig) -> Self {
        Self {
            consistency_rules: RuleSet::consistency(&config),
            validity_rules: RuleSet::validity(&config),
            config,
        }
    }

    /// Run all four checks in order, then append `flag_overall`.
    pub fn run_all_checks(&self, df: &mut DataFrame) -> Result<QualityRun> {
        info!("Starting data quality checks...");

        let outcomes = vec![
            self.check_completeness(df)?,
            self.check_consistency(df)?,
            self.check_validity(df)?,
            self.check_uniqueness(df)?,
        ];
        let run = QualityRun { outcomes };

        let overall = run.overall_flags(df.height());
        df.with_column(Series::new(FLAG_OVERALL.into(), overall))
            .context(format!("Writing {FLAG_OVERALL}"))?;

        info!("All data quality checks completed.");
        Ok(run)
    }

    /// Build the summary report for a dataset annotated by [`Self::run_all_checks`].
    pub fn generate_quality_summary(&self, df: &DataFrame, run: &QualityRun) -> QualitySummary {
        SummaryBuilder::build(df, &run.measures())
    }

    // ==================== Completeness ====================

    /// Columns the completeness check will read for this dataset.
    ///
    /// Critical columns that exist, in configured order; otherwise the
    /// first few columns of the dataset.
    pub fn completeness_columns(&self, df: &DataFrame) -> Vec<String> {
        let existing: Vec<String> = self
            .config
            .critical_columns
            .iter()
            .filter(|c| has_column(df, c))
            .cloned()
            .collect();

        if !existing.is_empty() {
            return existing;
        }

        let fallback: Vec<String> = column_names(df)
            .into_iter()
            .take(self.config.fallback_column_count)
            .collect();
        warn!(
            "No critical columns found, using first {} columns",
            fallback.len()
        );
        fallback
    }

    /// Flag records with a missing value in any critical column.
    pub fn check_completeness(&self, df: &mut DataFrame) -> Result<DimensionOutcome> {
        let checked = self.completeness_columns(df);

        let violations = {
            let bound: Vec<&Column> = checked
                .iter()
                .map(|name| df.column(name))
                .collect::<PolarsResult<_>>()?;

            (0..df.height())
                .map(|row| first_missing(&bound, row))
                .collect::<PolarsResult<Vec<_>>>()?
        };

        let description = format!("Missing values in critical columns: {:?}", checked);
        self.finish(df, QualityDimension::Completeness, violations, description)
    }

    // ==================== Consistency ====================

    /// Flag records with inconsistent names, statuses or currency codes.
    pub fn check_consistency(&self, df: &mut DataFrame) -> Result<DimensionOutcome> {
        debug!(
            "Consistency rules apply to columns: {:?}",
            self.consistency_rules.applicable_columns(df)
        );
        let violations = self.consistency_rules.evaluate(df)?;
        self.finish(
            df,
            QualityDimension::Consistency,
            violations,
            CONSISTENCY_DESCRIPTION,
        )
    }

    // ==================== Validity ====================

    /// Flag records with out-of-range or malformed values.
    pub fn check_validity(&self, df: &mut DataFrame) -> Result<DimensionOutcome> {
        debug!(
            "Validity rules apply to columns: {:?}",
            self.validity_rules.applicable_columns(df)
        );
        let violations = self.validity_rules.evaluate(df)?;
        self.finish(df, QualityDimension::Validity, violations, VALIDITY_DESCRIPTION)
    }

    // ==================== Uniqueness ====================

    /// Columns the uniqueness check will key on for this dataset.
    ///
    /// Preferred key columns that exist, in configured order; otherwise every
    /// column that is not a flag column.
    pub fn key_columns(&self, df: &DataFrame) -> Vec<String> {
        let existing: Vec<String> = self
            .config
            .key_columns
            .iter()
            .filter(|c| has_column(df, c))
            .cloned()
            .collect();

        if !existing.is_empty() {
            return existing;
        }

        warn!("No key columns found for uniqueness check, using all non-flag columns");
        column_names(df)
            .into_iter()
            .filter(|c| !c.starts_with(FLAG_PREFIX))
            .collect()
    }

    /// Flag every record whose key tuple occurs more than once.
    pub fn check_uniqueness(&self, df: &mut DataFrame) -> Result<DimensionOutcome> {
        let keys = self.key_columns(df);

        let violations = if keys.is_empty() {
            vec![None; df.height()]
        } else {
            let bound: Vec<&Column> = keys
                .iter()
                .map(|name| df.column(name))
                .collect::<PolarsResult<_>>()?;
            let tuples = (0..df.height())
                .map(|row| key_tuple(&bound, row))
                .collect::<PolarsResult<Vec<_>>>()?;

            let mut occurrences: HashMap<&[Option<String>], usize> = HashMap::new();
            for tuple in &tuples {
                *occurrences.entry(tuple.as_slice()).or_insert(0) += 1;
            }

            let joined = keys.join(",");
            tuples
                .iter()
                .map(|tuple| {
                    (occurrences[tuple.as_slice()] > 1)
                        .then(|| RuleViolation::new(RuleKind::DuplicateKey, joined.as_str()))
                })
                .collect()
        };

        let description = format!("Duplicate records based on columns: {:?}", keys);
        self.finish(df, QualityDimension::Uniqueness, violations, description)
    }

    // ==================== Shared ====================

    /// Write the flag column, log the result and package the outcome.
    fn finish(
        &self,
        df: &mut DataFrame,
        dimension: QualityDimension,
        violations: Vec<Option<RuleViolation>>,
        description: impl Into<String>,
    ) -> Result<DimensionOutcome> {
        let total_issues = violations.iter().filter(|v| v.is_some()).count();
        let outcome = DimensionOutcome {
            dimension,
            result: DimensionResult::new(total_issues, df.height(), description),
            violations,
        };

        let flag_column = dimension.flag_column();
        df.with_column(Series::new(flag_column.as_str().into(), outcome.flags()))
            .context(format!("Writing {flag_column}"))?;

        info!(
            "{} check: {} issues found ({:.2}%)",
            dimension.display_name(),
            outcome.result.total_issues,
            outcome.result.percentage
        );
        for (rule, count) in outcome.rule_counts() {
            debug!("  {}: {} records", rule.name(), count);
        }

        Ok(outcome)
    }
}

/// First checked column whose value is missing at `row`.
fn first_missing(columns: &[&Column], row: usize) -> PolarsResult<Option<RuleViolation>> {
    for column in columns {
        if is_missing(&column.get(row)?) {
            return Ok(Some(RuleViolation::new(
                RuleKind::MissingValue,
                column.name().as_str(),
            )));
        }
    }
    Ok(None)
}

/// Hashable key for one record; missing cells compare equal to each other.
fn key_tuple(columns: &[&Column], row: usize) -> PolarsResult<Vec<Option<String>>> {
    columns
        .iter()
        .map(|column| column.get(row).map(|value| cell_text(&value)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flag_values(df: &DataFrame, name: &str) -> Vec<i64> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .i64()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap())
            .collect()
    }

    fn sample_frame() -> DataFrame {
        df![
            "providerkey" => ["P1", "P2", "P3", "P4", "P4"],
            "timevalue" => [2019i64, 2019, 1700, 2020, 2020],
            "fiscalperiodend" => ["30-Jun", "31-Dec", "31-Dec", "31-Mar", "31-Mar"],
            "companynameofficial" => ["ACME CORP", "Beta Ltd", "Gamma Inc", "Delta Co", "Delta Co"],
            "operationstatustype" => ["Active", "ACTIVE", "Dormant", "Inactive", "Inactive"],
            "ipostatustype" => ["Public", "Private", "Subsidiary", "Public", "Public"],
            "geonameen" => ["UK", "US", "DE", "FR", "FR"],
            "industrycode" => ["7010 - Head offices", "6420 - Holdings", "7010 - Head offices", "6420 - Holdings", "6420 - Holdings"],
            "REVENUE" => [Some(1_000_000.0f64), None, Some(5.0), Some(10.0), Some(10.0)],
            "unit_REVENUE" => ["USD", "GBP", "EUR", "EUR", "EUR"],
        ]
        .unwrap()
    }

    // ==================== completeness tests ====================

    #[test]
    fn test_completeness_flags_missing_critical_value() {
        let mut df = sample_frame();
        let outcome = QualityChecker::default().check_completeness(&mut df).unwrap();

        assert_eq!(outcome.result.total_issues, 1);
        assert_eq!(flag_values(&df, "flag_completeness"), vec![0, 1, 0, 0, 0]);
        assert_eq!(
            outcome.violations[1],
            Some(RuleViolation::new(RuleKind::MissingValue, "REVENUE"))
        );
        assert_eq!(outcome.result.percentage, 20.0);
    }

    #[test]
    fn test_completeness_treats_nan_as_missing() {
        let mut df = df!["REVENUE" => [1.0f64, f64::NAN]].unwrap();
        let outcome = QualityChecker::default().check_completeness(&mut df).unwrap();
        assert_eq!(outcome.flags(), vec![0, 1]);
    }

    #[test]
    fn test_completeness_uses_only_existing_critical_columns() {
        let df = df!["REVENUE" => [1.0f64], "extra" => [None::<i64>]].unwrap();
        let columns = QualityChecker::default().completeness_columns(&df);
        assert_eq!(columns, vec!["REVENUE"]);
    }

    #[test]
    fn test_completeness_fallback_to_leading_columns() {
        let mut df = df![
            "a" => [Some(1i64), Some(2)],
            "b" => [Some(1i64), Some(2)],
            "c" => [Some(1i64), Some(2)],
            "d" => [Some(1i64), Some(2)],
            "e" => [Some(1i64), None],
        ]
        .unwrap();
        let checker = QualityChecker::default();

        assert_eq!(checker.completeness_columns(&df), vec!["a", "b", "c", "d"]);

        // The null in "e" is outside the fallback window.
        let outcome = checker.check_completeness(&mut df).unwrap();
        assert_eq!(outcome.result.total_issues, 0);
        assert!(outcome.result.description.contains("\"a\""));
    }

    #[test]
    fn test_completeness_fallback_narrow_frame() {
        let df = df!["x" => [1i64], "y" => [2i64]].unwrap();
        assert_eq!(
            QualityChecker::default().completeness_columns(&df),
            vec!["x", "y"]
        );
    }

    // ==================== consistency tests ====================

    #[test]
    fn test_consistency_accepts_clean_records() {
        let mut df = sample_frame();
        let outcome = QualityChecker::default().check_consistency(&mut df).unwrap();
        assert_eq!(outcome.result.total_issues, 0);
        assert_eq!(outcome.result.description, CONSISTENCY_DESCRIPTION);
    }

    #[test]
    fn test_consistency_flags_each_sub_check() {
        let mut df = df![
            "companynameofficial" => [Some("acme corp!"), Some("ACME CORP"), None, Some("ACME CORP"), Some("ACME CORP")],
            "operationstatustype" => [Some("Active"), Some("Closed"), Some("Active"), Some("Active"), Some("Active")],
            "ipostatustype" => [Some("Public"), Some("Public"), Some("Listed"), Some("Public"), Some("Public")],
            "unit_REVENUE" => [Some("USD"), Some("USD"), Some("USD"), Some("US$"), None],
        ]
        .unwrap();
        let outcome = QualityChecker::default().check_consistency(&mut df).unwrap();

        let rules: Vec<Option<RuleKind>> = outcome
            .violations
            .iter()
            .map(|v| v.as_ref().map(|v| v.rule))
            .collect();
        assert_eq!(
            rules,
            vec![
                Some(RuleKind::CompanyNameFormat),
                Some(RuleKind::OperationStatus),
                Some(RuleKind::IpoStatus),
                Some(RuleKind::CurrencyCode),
                None,
            ]
        );
        assert_eq!(flag_values(&df, "flag_consistency"), vec![1, 1, 1, 1, 0]);
    }

    #[test]
    fn test_consistency_without_rule_columns() {
        let mut df = df!["other" => ["anything", "goes"]].unwrap();
        let outcome = QualityChecker::default().check_consistency(&mut df).unwrap();
        assert_eq!(outcome.flags(), vec![0, 0]);
    }

    // ==================== validity tests ====================

    #[test]
    fn test_validity_flags_out_of_range_year() {
        let mut df = sample_frame();
        let outcome = QualityChecker::default().check_validity(&mut df).unwrap();

        assert_eq!(outcome.result.total_issues, 1);
        assert_eq!(flag_values(&df, "flag_validity"), vec![0, 0, 1, 0, 0]);
        assert_eq!(outcome.result.description, VALIDITY_DESCRIPTION);
    }

    #[test]
    fn test_validity_examples() {
        let mut df = df![
            "timevalue" => [2019i64, 1850, 2019, 2019, 2019],
            "REVENUE" => [1_000_000.0f64, 1.0, -5.0, 1.0, 1.0],
            "fiscalperiodend" => ["30-Jun", "30-Jun", "30-Jun", "June 30", "30-Jun"],
            "industrycode" => ["7010 - X", "7010 - X", "7010 - X", "7010 - X", "Holding"],
        ]
        .unwrap();
        let outcome = QualityChecker::default().check_validity(&mut df).unwrap();

        assert_eq!(outcome.flags(), vec![0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_validity_string_year_column() {
        let mut df = df!["timevalue" => ["2019", "abc", "1899"]].unwrap();
        let outcome = QualityChecker::default().check_validity(&mut df).unwrap();
        assert_eq!(outcome.flags(), vec![0, 1, 1]);
    }

    #[test]
    fn test_validity_respects_configured_range() {
        let config = QualityConfig::builder().year_range(2000, 2010).build().unwrap();
        let checker = QualityChecker::new(config).unwrap();
        let mut df = df!["timevalue" => [1999i64, 2005, 2011]].unwrap();

        let outcome = checker.check_validity(&mut df).unwrap();
        assert_eq!(outcome.flags(), vec![1, 0, 1]);
    }

    // ==================== uniqueness tests ====================

    #[test]
    fn test_uniqueness_flags_all_members_of_duplicate_group() {
        let mut df = sample_frame();
        let outcome = QualityChecker::default().check_uniqueness(&mut df).unwrap();

        assert_eq!(outcome.result.total_issues, 2);
        assert_eq!(flag_values(&df, "flag_uniqueness"), vec![0, 0, 0, 1, 1]);
        assert_eq!(
            outcome.result.description,
            r#"Duplicate records based on columns: ["providerkey", "timevalue", "fiscalperiodend"]"#
        );
    }

    #[test]
    fn test_uniqueness_nulls_compare_equal() {
        let mut df = df![
            "providerkey" => [Some("P1"), Some("P1"), Some("P1")],
            "timevalue" => [None::<i64>, None, Some(2019)],
        ]
        .unwrap();
        let outcome = QualityChecker::default().check_uniqueness(&mut df).unwrap();
        assert_eq!(outcome.flags(), vec![1, 1, 0]);
    }

    #[test]
    fn test_uniqueness_fallback_ignores_flag_columns() {
        let mut df = df![
            "a" => [1i64, 1, 2],
            "b" => ["x", "x", "x"],
            "flag_completeness" => [0i64, 1, 0],
        ]
        .unwrap();
        let checker = QualityChecker::default();

        assert_eq!(checker.key_columns(&df), vec!["a", "b"]);
        let outcome = checker.check_uniqueness(&mut df).unwrap();
        assert_eq!(outcome.flags(), vec![1, 1, 0]);
    }

    // ==================== run_all_checks tests ====================

    #[test]
    fn test_run_all_checks_appends_flags_in_order() {
        let mut df = sample_frame();
        let original_width = df.width();
        QualityChecker::default().run_all_checks(&mut df).unwrap();

        let names = column_names(&df);
        assert_eq!(
            &names[original_width..],
            &[
                "flag_completeness",
                "flag_consistency",
                "flag_validity",
                "flag_uniqueness",
                "flag_overall"
            ]
        );
    }

    #[test]
    fn test_overall_flag_is_max_of_dimensions() {
        let mut df = sample_frame();
        QualityChecker::default().run_all_checks(&mut df).unwrap();

        let dims: Vec<Vec<i64>> = QualityDimension::ALL
            .iter()
            .map(|d| flag_values(&df, &d.flag_column()))
            .collect();
        let overall = flag_values(&df, "flag_overall");

        for (row, value) in overall.iter().enumerate() {
            let expected = dims.iter().map(|flags| flags[row]).max().unwrap();
            assert_eq!(*value, expected);
        }
        assert_eq!(overall, vec![0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_rerun_replaces_flag_columns() {
        let mut df = sample_frame();
        let checker = QualityChecker::default();

        checker.run_all_checks(&mut df).unwrap();
        let first = df.clone();
        checker.run_all_checks(&mut df).unwrap();

        assert_eq!(df.width(), first.width());
        for name in ["flag_completeness", "flag_consistency", "flag_validity", "flag_uniqueness", "flag_overall"] {
            assert_eq!(flag_values(&df, name), flag_values(&first, name));
        }
    }

    #[test]
    fn test_run_all_checks_on_empty_frame() {
        let mut df = df!["providerkey" => Vec::<String>::new()].unwrap();
        let checker = QualityChecker::default();
        let run = checker.run_all_checks(&mut df).unwrap();

        assert_eq!(df.height(), 0);
        assert!(run.outcomes.iter().all(|o| o.result.percentage == 0.0));

        let summary = checker.generate_quality_summary(&df, &run);
        assert_eq!(summary.overall_quality_score, 0.0);
        assert_eq!(summary.total_records, 0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = QualityConfig {
            fallback_column_count: 0,
            ..QualityConfig::default()
        };
        let err = QualityChecker::new(config).err().unwrap();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
