//! Crate-wide error type.
//!
//! Loading, selection parsing and the summary pipelines all return
//! `AppError`, so the CLI and the HTTP layer only have one type to report.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Load-time failures are fatal: the store is never partially built.
    #[error("Missing column: {0}")]
    MissingColumn(&'static str),

    #[error("Parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    #[error("Invalid selection value: {0}")]
    InvalidSelection(String),

    #[error("Invalid theme: {0}")]
    InvalidTheme(String),

    /// A "top" pipeline had no group to pick from.
    #[error("No data for {0}")]
    EmptyResult(&'static str),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Errors caused by the caller's input rather than by the data or the host.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::InvalidSelection(_) | AppError::InvalidTheme(_) | AppError::Json(_)
        )
    }
}

pub type AppResult<T> = Result<T, AppError>;
