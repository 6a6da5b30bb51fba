//! Dataset I/O and report writing.
//!
//! The format is chosen from the file extension: `.parquet`/`.pq` are
//! Parquet, everything else is CSV.
//!
//! # Example
//!
//! ```rust,ignore
//! use fin_quality::reporting::{load_dataset, save_dataset, save_summary_report};
//!
//! let mut df = load_dataset("CaseStudy_Quality_sample25.csv")?;
//! let run = checker.run_all_checks(&mut df)?;
//! let summary = checker.generate_quality_summary(&df, &run);
//!
//! save_dataset(&mut df, "CaseStudy_Quality_sample25_checked.csv")?;
//! save_summary_report(&summary, "quality_summary_report.json")?;
//! ```

mod exporter;
mod loader;

pub use exporter::{save_dataset, save_summary_report};
pub use loader::{DatasetFormat, load_dataset};
