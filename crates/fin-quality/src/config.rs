//! Configuration types for the quality checker.
//!
//! The defaults reproduce the fixed rule set for corporate financial
//! records. The builder exists so a host can point the checks at a
//! differently-shaped extract without touching the rules themselves.

use crate::error::QualityError;
use serde::{Deserialize, Serialize};

/// Column names the rules look for.
pub mod columns {
    pub const TIME_VALUE: &str = "timevalue";
    pub const PROVIDER_KEY: &str = "providerkey";
    pub const COMPANY_NAME: &str = "companynameofficial";
    pub const FISCAL_PERIOD_END: &str = "fiscalperiodend";
    pub const OPERATION_STATUS: &str = "operationstatustype";
    pub const IPO_STATUS: &str = "ipostatustype";
    pub const GEO_NAME: &str = "geonameen";
    pub const INDUSTRY_CODE: &str = "industrycode";
    pub const REVENUE: &str = "REVENUE";
    pub const REVENUE_UNIT: &str = "unit_REVENUE";

    /// Prefix shared by every flag column the checker writes.
    pub const FLAG_PREFIX: &str = "flag_";
    pub const FLAG_OVERALL: &str = "flag_overall";
}

const DEFAULT_CRITICAL_COLUMNS: [&str; 10] = [
    columns::TIME_VALUE,
    columns::PROVIDER_KEY,
    columns::COMPANY_NAME,
    columns::FISCAL_PERIOD_END,
    columns::OPERATION_STATUS,
    columns::IPO_STATUS,
    columns::GEO_NAME,
    columns::INDUSTRY_CODE,
    columns::REVENUE,
    columns::REVENUE_UNIT,
];

const DEFAULT_KEY_COLUMNS: [&str; 3] = [
    columns::PROVIDER_KEY,
    columns::TIME_VALUE,
    columns::FISCAL_PERIOD_END,
];

const DEFAULT_OPERATION_STATUSES: [&str; 4] = ["ACTIVE", "INACTIVE", "DORMANT", "LIQUIDATION"];
const DEFAULT_IPO_STATUSES: [&str; 3] = ["PUBLIC", "PRIVATE", "SUBSIDIARY"];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Configuration for the quality checker.
///
/// Use [`QualityConfig::builder()`] to override individual settings.
///
/// # Example
///
/// ```rust,ignore
/// use fin_quality::config::QualityConfig;
///
/// let config = QualityConfig::builder()
///     .year_range(1950, 2025)
///     .max_revenue(1e12)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Columns whose nullness is a completeness defect, in report order.
    pub critical_columns: Vec<String>,

    /// Preferred key columns for duplicate detection, in report order.
    pub key_columns: Vec<String>,

    /// How many leading columns completeness falls back to when none of
    /// the critical columns exist.
    /// Default: 4
    pub fallback_column_count: usize,

    /// Earliest accepted `timevalue` year (inclusive).
    /// Default: 1900
    pub min_year: i64,

    /// Latest accepted `timevalue` year (inclusive).
    /// Default: 2030
    pub max_year: i64,

    /// Largest accepted `REVENUE` amount (inclusive).
    /// Default: 1e15
    pub max_revenue: f64,

    /// Accepted operation statuses, compared upper-cased.
    pub operation_statuses: Vec<String>,

    /// Accepted IPO statuses, compared upper-cased.
    pub ipo_statuses: Vec<String>,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            critical_columns: owned(&DEFAULT_CRITICAL_COLUMNS),
            key_columns: owned(&DEFAULT_KEY_COLUMNS),
            fallback_column_count: 4,
            min_year: 1900,
            max_year: 2030,
            max_revenue: 1e15,
            operation_statuses: owned(&DEFAULT_OPERATION_STATUSES),
            ipo_statuses: owned(&DEFAULT_IPO_STATUSES),
        }
    }
}

impl QualityConfig {
    /// Create a new configuration builder.
    pub fn builder() -> QualityConfigBuilder {
        QualityConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.min_year > self.max_year {
            return Err(ConfigValidationError::InvalidYearRange {
                min: self.min_year,
                max: self.max_year,
            });
        }

        if !self.max_revenue.is_finite() || self.max_revenue < 0.0 {
            return Err(ConfigValidationError::InvalidRevenueCeiling(
                self.max_revenue,
            ));
        }

        if self.fallback_column_count == 0 {
            return Err(ConfigValidationError::InvalidFallbackWidth(
                self.fallback_column_count,
            ));
        }

        if self.operation_statuses.is_empty() {
            return Err(ConfigValidationError::EmptyAllowedValues(
                "operation_statuses".to_string(),
            ));
        }

        if self.ipo_statuses.is_empty() {
            return Err(ConfigValidationError::EmptyAllowedValues(
                "ipo_statuses".to_string(),
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid year range: {min}..={max} (min must not exceed max)")]
    InvalidYearRange { min: i64, max: i64 },

    #[error("Invalid revenue ceiling: {0} (must be finite and non-negative)")]
    InvalidRevenueCeiling(f64),

    #[error("Invalid fallback column count: {0} (must be at least 1)")]
    InvalidFallbackWidth(usize),

    #[error("Allowed values for '{0}' must not be empty")]
    EmptyAllowedValues(String),
}

impl From<ConfigValidationError> for QualityError {
    fn from(err: ConfigValidationError) -> Self {
        QualityError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`QualityConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct QualityConfigBuilder {
    critical_columns: Option<Vec<String>>,
    key_columns: Option<Vec<String>>,
    fallback_column_count: Option<usize>,
    year_range: Option<(i64, i64)>,
    max_revenue: Option<f64>,
    operation_statuses: Option<Vec<String>>,
    ipo_statuses: Option<Vec<String>>,
}

impl QualityConfigBuilder {
    /// Replace the critical column list used by the completeness check.
    pub fn critical_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.critical_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the preferred key columns used by the uniqueness check.
    pub fn key_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Set how many leading columns completeness falls back to.
    pub fn fallback_column_count(mut self, count: usize) -> Self {
        self.fallback_column_count = Some(count);
        self
    }

    /// Set the accepted `timevalue` range, both ends inclusive.
    pub fn year_range(mut self, min: i64, max: i64) -> Self {
        self.year_range = Some((min, max));
        self
    }

    /// Set the largest accepted revenue amount.
    pub fn max_revenue(mut self, max: f64) -> Self {
        self.max_revenue = Some(max);
        self
    }

    /// Replace the accepted operation statuses.
    pub fn operation_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.operation_statuses = Some(statuses.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the accepted IPO statuses.
    pub fn ipo_statuses<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ipo_statuses = Some(statuses.into_iter().map(Into::into).collect());
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `QualityConfig` or an error if validation fails.
    pub fn build(self) -> Result<QualityConfig, ConfigValidationError> {
        let defaults = QualityConfig::default();
        let (min_year, max_year) = self
            .year_range
            .unwrap_or((defaults.min_year, defaults.max_year));

        let config = QualityConfig {
            critical_columns: self.critical_columns.unwrap_or(defaults.critical_columns),
            key_columns: self.key_columns.unwrap_or(defaults.key_columns),
            fallback_column_count: self
                .fallback_column_count
                .unwrap_or(defaults.fallback_column_count),
            min_year,
            max_year,
            max_revenue: self.max_revenue.unwrap_or(defaults.max_revenue),
            operation_statuses: self
                .operation_statuses
                .unwrap_or(defaults.operation_statuses),
            ipo_statuses: self.ipo_statuses.unwrap_or(defaults.ipo_statuses),
        };

        config.validate()?;
        Ok(config)
    }
}
