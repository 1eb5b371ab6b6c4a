// ⚠️ Structural errors
// Data-quality problems are never errors here: they become InvalidFragment
// entries. This enum is only for caller contract violations and I/O.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
