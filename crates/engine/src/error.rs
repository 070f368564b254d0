//! The module contains the errors the engine can return.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] returned when a money string cannot be parsed.
//! - [`InvalidToken`] returned when a session token cannot be decoded.
//! - [`ExpiredToken`] returned when a session token is past its `exp`.
//!
//!  [`InvalidAmount`]: EngineError::InvalidAmount
//!  [`InvalidToken`]: EngineError::InvalidToken
//!  [`ExpiredToken`]: EngineError::ExpiredToken
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid token: {0}")]
    InvalidToken(String),
    #[error("Session expired")]
    ExpiredToken,
}
