use crate::error::{QualityError, Result};
use crate::reporting::loader::DatasetFormat;
use crate::types::QualitySummary;
use polars::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use tracing::{error, info};

/// Write the annotated dataset as CSV or Parquet, by extension.
///
/// Parent directories are created as needed.
pub fn save_dataset(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match write_frame(df, path) {
        Ok(()) => {
            info!("Results saved to {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Error saving results: {}", e);
            Err(QualityError::save_failed(path, e))
        }
    }
}

/// Write the summary report as pretty-printed JSON.
///
/// Parent directories are created as needed.
pub fn save_summary_report(summary: &QualitySummary, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    match write_json(summary, path) {
        Ok(()) => {
            info!("Summary report saved to {}", path.display());
            Ok(())
        }
        Err(e) => {
            error!("Error saving summary: {}", e);
            Err(QualityError::save_failed(path, e))
        }
    }
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}

fn write_frame(df: &mut DataFrame, path: &Path) -> PolarsResult<()> {
    ensure_parent(path)?;
    let mut file = File::create(path)?;

    match DatasetFormat::from_path(path) {
        DatasetFormat::Csv => CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(b',')
            .with_quote_char(b'"')
            .finish(df),
        DatasetFormat::Parquet => ParquetWriter::new(file).finish(df).map(|_| ()),
    }
}

fn write_json(summary: &QualitySummary, path: &Path) -> Result<()> {
    ensure_parent(path)?;
    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(summary)?.as_bytes())?;
    Ok(())
}
