//! Error types for pilgrimage.
//!
//! The in-process stores never fail: precondition violations are absorbed as
//! no-ops. These errors belong to the outer shell (configuration loading and
//! the demo CLI).

use thiserror::Error;

/// The main error type for pilgrimage operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Catalog Errors ===
    /// No demo identity with the given id exists.
    #[error("unknown demo identity '{id}' (try `pilgrim identities`)")]
    UnknownIdentity {
        /// The id that was looked up.
        id: String,
    },
}

/// A specialized Result type for pilgrimage operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an unknown identity error.
    #[must_use]
    pub fn unknown_identity(id: impl Into<String>) -> Self {
        Self::UnknownIdentity { id: id.into() }
    }
}
