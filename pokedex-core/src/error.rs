//! Core error types for Pokedex.

use thiserror::Error;

/// Core error type for Pokedex operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A page query that cannot be served.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}
