//! Custom error types for the quality checker.
//!
//! Missing columns and unparsable cell values are never errors here: the
//! rules treat them as "skip this sub-check" and "validity defect"
//! respectively. What remains are storage failures, bad configuration and
//! the wrapped library errors underneath them.
//!
//! Errors are serializable so they can be reported as `{code, message}`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::Path;
use thiserror::Error;

/// The main error type for quality checking.
#[derive(Error, Debug)]
pub enum QualityError {
    /// The source dataset could not be read or parsed.
    #[error("Failed to load dataset from '{path}': {reason}")]
    LoadFailed { path: String, reason: String },

    /// The annotated dataset or the summary report could not be written.
    #[error("Failed to save '{path}': {reason}")]
    SaveFailed { path: String, reason: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<QualityError>,
    },
}

impl QualityError {
    pub(crate) fn load_failed(path: &Path, reason: impl ToString) -> Self {
        QualityError::LoadFailed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn save_failed(path: &Path, reason: impl ToString) -> Self {
        QualityError::SaveFailed {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        QualityError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for callers that branch on the failure kind.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LoadFailed { .. } => "LOAD_FAILED",
            Self::SaveFailed { .. } => "SAVE_FAILED",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from reading or writing storage.
    pub fn is_storage_failure(&self) -> bool {
        match self {
            Self::LoadFailed { .. } | Self::SaveFailed { .. } | Self::Io(_) => true,
            Self::WithContext { source, .. } => source.is_storage_failure(),
            _ => false,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for QualityError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("QualityError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for quality operations.
pub type Result<T> = std::result::Result<T, QualityError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| QualityError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            QualityError::InvalidConfig("x".to_string()).error_code(),
            "INVALID_CONFIG"
        );
        assert_eq!(
            QualityError::load_failed(Path::new("data.csv"), "boom").error_code(),
            "LOAD_FAILED"
        );
    }

    #[test]
    fn test_load_failed_message_names_path() {
        let error = QualityError::load_failed(Path::new("missing.csv"), "no such file");
        let message = error.to_string();
        assert!(message.contains("missing.csv"));
        assert!(message.contains("no such file"));
    }

    #[test]
    fn test_is_storage_failure() {
        assert!(QualityError::save_failed(Path::new("out.csv"), "denied").is_storage_failure());
        assert!(!QualityError::InvalidConfig("bad".to_string()).is_storage_failure());
        assert!(
            QualityError::load_failed(Path::new("in.csv"), "bad")
                .with_context("During startup")
                .is_storage_failure()
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = QualityError::save_failed(Path::new("report.json"), "read-only");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("SAVE_FAILED"));
        assert!(json.contains("report.json"));
    }

    #[test]
    fn test_with_context() {
        let error = QualityError::InvalidConfig("empty".to_string()).with_context("Building checker");
        assert!(error.to_string().contains("Building checker"));
        assert_eq!(error.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_polars_result_context() {
        use polars::prelude::*;

        let mut df = df!["a" => [1i64, 2]].unwrap();
        let err = df
            .with_column(Series::new("flag_validity".into(), vec![0i64, 1, 0]))
            .map(|_| ())
            .context("Writing flag_validity")
            .unwrap_err();

        assert_eq!(err.error_code(), "POLARS_ERROR");
        assert!(err.to_string().starts_with("Writing flag_validity: "));
    }
}
