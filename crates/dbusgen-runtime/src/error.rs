//! Runtime error types.

use thiserror::Error;

/// A value did not have the shape a generated binding expected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConversionError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("missing argument at position {index}")]
    MissingArgument { index: usize },
}

impl ConversionError {
    pub fn mismatch(expected: &'static str, found: &crate::Value) -> Self {
        Self::TypeMismatch {
            expected,
            found: found.kind(),
        }
    }
}

/// Errors returned by proxy calls.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The remote side replied with a D-Bus error.
    #[error("{name}: {message}")]
    Call { name: String, message: String },

    #[error("connection closed")]
    Disconnected,

    /// The reply did not match the declared output types.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}
