use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure descriptor for a single export operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Nothing to export: the record set is empty")]
    EmptyInput,

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("Document generation failed: {0}")]
    Generation(String),

    #[error("Failed to save export: {0}")]
    Sink(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Broad classification used for logging and for choosing how to surface
/// an error to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    /// The caller asked for something that cannot be exported.
    UserError,
    /// The artifact could not be built.
    GenerationError,
    /// The artifact was built but could not be delivered.
    StorageError,
    /// Invalid or unreadable configuration.
    ConfigError,
}

impl ExportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::EmptyInput | Self::UnsupportedFormat(_) => ErrorCategory::UserError,
            Self::Generation(_) => ErrorCategory::GenerationError,
            Self::Sink(_) => ErrorCategory::StorageError,
            Self::Config(_) => ErrorCategory::ConfigError,
        }
    }

    /// Returns a message fit for a toast or a terminal line. Internal
    /// details of generation failures are hidden.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput => "There is no data to export.".into(),
            Self::UnsupportedFormat(format) => {
                format!("'{format}' is not a supported export format (use csv, pdf or excel).")
            }
            Self::Generation(_) => "The export file could not be generated.".into(),
            Self::Sink(msg) => format!("The export file could not be saved: {msg}"),
            Self::Config(msg) => format!("Configuration issue: {msg}"),
        }
    }

    /// Wraps an `anyhow` error from a renderer, keeping the whole context chain.
    pub fn generation(err: anyhow::Error) -> Self {
        Self::Generation(format!("{err:#}"))
    }

    /// Wraps an `anyhow` error from a file sink, keeping the whole context chain.
    pub fn sink(err: anyhow::Error) -> Self {
        Self::Sink(format!("{err:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};

    #[test]
    fn test_empty_input_is_user_error() {
        assert_eq!(ExportError::EmptyInput.category(), ErrorCategory::UserError);
        assert_eq!(
            ExportError::EmptyInput.user_message(),
            "There is no data to export."
        );
    }

    #[test]
    fn test_unsupported_format_names_the_format() {
        let err = ExportError::UnsupportedFormat("docx".into());
        assert_eq!(err.category(), ErrorCategory::UserError);
        assert!(err.user_message().contains("'docx'"));
        assert_eq!(err.to_string(), "Unsupported export format: docx");
    }

    #[test]
    fn test_generation_hides_internals_from_user() {
        let err = ExportError::Generation("row 1048577 out of range".into());
        assert_eq!(err.category(), ErrorCategory::GenerationError);
        assert_eq!(err.user_message(), "The export file could not be generated.");
    }

    #[test]
    fn test_generation_keeps_context_chain() {
        let source: anyhow::Result<()> = Err(anyhow!("disk full"));
        let err = source.context("Failed to flush CSV writer").unwrap_err();
        let wrapped = ExportError::generation(err);
        assert_eq!(
            wrapped,
            ExportError::Generation("Failed to flush CSV writer: disk full".into())
        );
    }

    #[test]
    fn test_sink_error_category() {
        let err = ExportError::sink(anyhow!("permission denied"));
        assert_eq!(err.category(), ErrorCategory::StorageError);
        assert!(err.user_message().contains("permission denied"));
    }

    #[test]
    fn test_category_serde_round_trip() {
        for category in [
            ErrorCategory::UserError,
            ErrorCategory::GenerationError,
            ErrorCategory::StorageError,
            ErrorCategory::ConfigError,
        ] {
            let json = serde_json::to_string(&category).unwrap();
            let back: ErrorCategory = serde_json::from_str(&json).unwrap();
            assert_eq!(category, back);
        }
    }
}
