// src/error.rs
// Standardized error types for hydrorisk

use std::path::PathBuf;

use thiserror::Error;

use crate::risk::RiskCategory;

/// Main error type for the hydrorisk library
#[derive(Error, Debug)]
pub enum RiskError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("dataset is empty")]
    EmptyDataset,

    #[error("training split is missing classes: {}", format_categories(.0))]
    MissingClasses(Vec<RiskCategory>),

    #[error("model artifact not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience type alias for Result using RiskError
pub type Result<T> = std::result::Result<T, RiskError>;

fn format_categories(categories: &[RiskCategory]) -> String {
    categories
        .iter()
        .map(RiskCategory::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
