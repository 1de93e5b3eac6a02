use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading routes and catalogs
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("could not find column with names: {0:?}")]
    MissingColumn(&'static [&'static str]),

    #[error("row {row}: invalid {field} value {value:?}")]
    InvalidNumber {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("unknown input format")]
    UnknownFormat,
}

pub type RouteResult<T> = Result<T, RouteError>;
