use crate::types::{DatasetInfo, QualityMeasures, QualitySummary};
use crate::utils::{column_names, dtype_label};
use chrono::Local;
use polars::prelude::*;

/// Assembles the [`QualitySummary`] for an annotated dataset.
pub struct SummaryBuilder;

impl SummaryBuilder {
    pub fn build(df: &DataFrame, measures: &QualityMeasures) -> QualitySummary {
        let total_records = df.height();
        QualitySummary {
            total_records,
            quality_measures: measures.clone(),
            overall_quality_score: Self::overall_quality_score(measures, total_records),
            timestamp: Local::now().to_rfc3339(),
            dataset_info: Self::dataset_info(df),
        }
    }

    /// `100 - average per-dimension defect rate`, floored at 0.
    ///
    /// Returns 0.0 when there is nothing to score (no records or no measures).
    pub fn overall_quality_score(measures: &QualityMeasures, total_records: usize) -> f64 {
        let total_possible = total_records * measures.len();
        if total_possible == 0 {
            return 0.0;
        }

        let total_issues: usize = measures.values().map(|m| m.total_issues).sum();
        let score = 100.0 - (total_issues as f64 / total_possible as f64 * 100.0);
        score.clamp(0.0, 100.0)
    }

    pub fn dataset_info(df: &DataFrame) -> DatasetInfo {
        let data_types = df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), dtype_label(col.dtype())))
            .collect();

        DatasetInfo {
            columns: column_names(df),
            data_types,
        }
    }
}
