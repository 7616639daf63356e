//! CLI error type.

use thiserror::Error;

/// Errors surfaced to the terminal. Thin wrappers over the library's
/// error taxonomy plus argument problems of the CLI's own.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Store(#[from] tilevault::store::StoreError),

    #[error("{0}")]
    Resolve(#[from] tilevault::grid::ResolveError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Config(String),
}
