use crate::error::{QualityError, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::{debug, error, info};

/// Cell texts read as missing values, alongside empty fields.
const NULL_MARKERS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// On-disk tabular formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatasetFormat {
    #[default]
    Csv,
    Parquet,
}

impl DatasetFormat {
    /// `.parquet` / `.pq` map to Parquet; everything else is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("parquet") | Some("pq") => Self::Parquet,
            _ => Self::Csv,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Parquet => "parquet",
        }
    }
}

/// Load a dataset from CSV or Parquet.
///
/// CSV files must have a header row. Column types are inferred from the
/// whole file, so a stray text cell turns its column into text instead of
/// failing the load. The usual spreadsheet null markers (`NA`, `n/a`,
/// `NULL`, `nan`, ...) read as missing.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let format = DatasetFormat::from_path(path);
    debug!("Loading {:?} dataset from {}", format, path.display());

    match read_frame(path, format) {
        Ok(df) => {
            info!("Data loaded successfully. Shape: {:?}", df.shape());
            Ok(df)
        }
        Err(e) => {
            error!("Error loading data: {}", e);
            Err(QualityError::load_failed(path, e))
        }
    }
}

fn read_frame(path: &Path, format: DatasetFormat) -> PolarsResult<DataFrame> {
    match format {
        DatasetFormat::Csv => CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .map_parse_options(|opts| opts.with_null_values(Some(null_markers())))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish(),
        DatasetFormat::Parquet => {
            let file = File::open(path)?;
            ParquetReader::new(file).finish()
        }
    }
}

fn null_markers() -> NullValues {
    NullValues::AllColumns(
        NULL_MARKERS
            .iter()
            .copied()
            .map(PlSmallStr::from_static)
            .collect(),
    )
}
