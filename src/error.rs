use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MachineError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("menu source {path:?} cannot be read: {source}")]
    MenuUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed menu entry {name:?}: {reason}")]
    MalformedMenuEntry { name: String, reason: String },
    #[error("invalid quantity {amount} for {ingredient}: must be a positive integer")]
    InvalidQuantity { ingredient: String, amount: i64 },
    #[error("unknown ingredient: {0}")]
    UnknownIngredient(String),
    #[error("insufficient {0}")]
    InsufficientStock(String),
}

pub type Result<T> = std::result::Result<T, MachineError>;
