//! Financial Records Quality Checker
//!
//! Rule-based data quality checks for corporate financial records, built on
//! Polars.
//!
//! # Overview
//!
//! A dataset of one row per company per fiscal year is evaluated along four
//! dimensions:
//!
//! - **Completeness**: a critical attribute is missing
//! - **Consistency**: a company name, status or currency code is badly formatted
//! - **Validity**: a year, revenue, fiscal period or industry code is out of range
//! - **Uniqueness**: the record duplicates another on the key columns
//!
//! Each check appends a `flag_<dimension>` column (0/1) to the dataset, and a
//! final `flag_overall` marks records with any defect. A
//! [`QualitySummary`] reports per-dimension counts, percentages and an
//! overall score between 0 and 100.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fin_quality::{QualityChecker, reporting};
//!
//! let mut df = reporting::load_dataset("CaseStudy_Quality_sample25.csv")?;
//!
//! let checker = QualityChecker::default();
//! let run = checker.run_all_checks(&mut df)?;
//! let summary = checker.generate_quality_summary(&df, &run);
//!
//! println!("Overall quality score: {:.2}", summary.overall_quality_score);
//! ```
//!
//! # Configuration
//!
//! Use [`QualityConfig`] to point the rules at a differently-shaped extract:
//!
//! ```rust,ignore
//! use fin_quality::{QualityChecker, QualityConfig};
//!
//! let config = QualityConfig::builder()
//!     .key_columns(["providerkey", "timevalue"])
//!     .year_range(1950, 2025)
//!     .max_revenue(1e13)
//!     .build()?;
//!
//! let checker = QualityChecker::new(config)?;
//! ```
//!
//! # Explaining flags
//!
//! Every evaluator records the rule that triggered for each flagged record:
//!
//! ```rust,ignore
//! for (dimension, violation) in run.violations_for(3) {
//!     println!("{dimension}: {} on {}", violation.rule.name(), violation.column);
//! }
//! ```

pub mod config;
pub mod error;
pub mod quality;
pub mod reporting;
pub mod rules;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{ConfigValidationError, QualityConfig, QualityConfigBuilder};
pub use error::{QualityError, Result as QualityResult, ResultExt};
pub use quality::{QualityChecker, SummaryBuilder};
pub use reporting::{DatasetFormat, load_dataset, save_dataset, save_summary_report};
pub use rules::{RuleSet, ValueRule};
pub use types::{
    DatasetInfo, DimensionOutcome, DimensionResult, QualityDimension, QualityMeasures,
    QualityRun, QualitySummary, RuleKind, RuleViolation,
};
