//! Primitive type errors

use thiserror::Error;

/// Errors raised when constructing primitive types from external input
#[derive(Debug, Error)]
pub enum PrimitiveError {
    /// Input was not valid hexadecimal
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    /// Input had the wrong byte length
    #[error("invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        /// Required byte length
        expected: usize,
        /// Byte length actually supplied
        actual: usize,
    },
}

impl From<hex::FromHexError> for PrimitiveError {
    fn from(e: hex::FromHexError) -> Self {
        PrimitiveError::InvalidHex(e.to_string())
    }
}
