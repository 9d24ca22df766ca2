//! Error types for the discharge explorer
//!
//! Structured error handling using thiserror. Every failure that stops a
//! recomputation is one of these variants; the smoothing step has its own
//! non-fatal outcome type in `pipeline::smoothing`.

use thiserror::Error;

/// Main error type for dataset loading and recomputation
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// File I/O error
    #[error("Failed to access file: {0}")]
    FileIo(#[from] std::io::Error),

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Unsupported file format
    #[error("Unsupported file format: {extension}")]
    UnsupportedFormat { extension: String },

    /// Column not found in data
    #[error("Column '{column}' selected for {control} not found in dataset")]
    ColumnNotFound { control: String, column: String },

    /// Empty dataset error
    #[error("Dataset is empty or has no rows")]
    EmptyDataset,

    /// Data validation error
    #[error("Data validation failed: {0}")]
    Validation(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for explorer operations
pub type Result<T> = std::result::Result<T, ExplorerError>;

impl ExplorerError {
    /// Shorthand for a missing column referenced by a control
    pub fn missing_column(control: &str, column: &str) -> Self {
        ExplorerError::ColumnNotFound {
            control: control.to_string(),
            column: column.to_string(),
        }
    }

    /// Whether the error stems from the control state rather than the data
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ExplorerError::Config(_) | ExplorerError::ColumnNotFound { .. }
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            ExplorerError::FileIo(e) => format!("File error: {}", e),
            ExplorerError::Polars(e) => format!("Data error: {}", e),
            ExplorerError::Config(msg) => format!("Config error: {}", msg),
            ExplorerError::UnsupportedFormat { extension } => {
                format!("Unsupported file format: '.{}'", extension)
            }
            ExplorerError::ColumnNotFound { control, column } => {
                format!("Column '{}' not found ({})", column, control)
            }
            ExplorerError::EmptyDataset => "Dataset is empty".to_string(),
            ExplorerError::Validation(msg) => format!("Validation error: {}", msg),
            ExplorerError::Json(e) => format!("JSON error: {}", e),
        }
    }

    /// Get a short title for the error
    pub fn title(&self) -> &'static str {
        match self {
            ExplorerError::FileIo(_) => "File Error",
            ExplorerError::Polars(_) => "Data Error",
            ExplorerError::Config(_) => "Configuration Error",
            ExplorerError::UnsupportedFormat { .. } => "Unsupported Format",
            ExplorerError::ColumnNotFound { .. } => "Configuration Error",
            ExplorerError::EmptyDataset => "Empty Dataset",
            ExplorerError::Validation(_) => "Validation Error",
            ExplorerError::Json(_) => "JSON Error",
        }
    }
}
