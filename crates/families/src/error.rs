use thiserror::Error;

use crate::model::Sku;

#[derive(Debug, Error)]
pub enum FamilyError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (empty tier table, zero capacity, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// A transaction line is empty or holds a non-integer token.
    #[error("line {line}: {message}")]
    InputFormat { line: usize, message: String },
    /// Forced fallback found every family full.
    #[error(
        "capacity exhausted: cannot place SKU {sku}, all {families} families are full \
         (total capacity {capacity})"
    )]
    CapacityExhausted {
        sku: Sku,
        families: usize,
        capacity: usize,
    },
    /// IO error while reading transactions.
    #[error("IO error: {0}")]
    Io(String),
}

impl From<std::io::Error> for FamilyError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
