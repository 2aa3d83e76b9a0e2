use std::path::PathBuf;

use thiserror::Error;

/// Failure taxonomy for a single invocation. Every stage aborts on its
/// first error; none of these are retried.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("source history store unavailable: {path}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not initialize merged store at {path}: {source}")]
    StoreInit {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Two sources disagree on the meaning of a primary key. Surfaced
    /// distinctly so the operator can investigate instead of retrying.
    #[error("id space collision while merging {table}: {source}")]
    IdSpaceCollision {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("invalid date: {input:?}")]
    InvalidDate { input: String },

    #[error("query execution failed: {0}")]
    QueryExecution(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
