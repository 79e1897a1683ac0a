//! Error types for `Cardex`.
//!
//! The engine is pure in-memory computation, so the taxonomy is narrow:
//! query validation, configuration, and failures reported back by a
//! persistence callback during a flush.

use thiserror::Error;

/// Result type alias for `Cardex` operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in `Cardex` operations.
///
/// Error codes follow the pattern `CARDEX-XXX`.
#[derive(Error, Debug)]
pub enum Error {
    /// Search term normalizes to fewer letters than required (CARDEX-001).
    #[error("[CARDEX-001] Search term too short: need at least {min} letters, got {actual}")]
    TermTooShort {
        /// Minimum number of normalized letters.
        min: usize,
        /// Normalized letter count of the submitted term.
        actual: usize,
    },

    /// Configuration error (CARDEX-002).
    #[error("[CARDEX-002] Configuration error: {0}")]
    Config(String),

    /// The persistence callback of a flush failed (CARDEX-003).
    ///
    /// No aggregate was marked clean; the next flush retries them.
    #[error("[CARDEX-003] Persistence error: {0}")]
    Persistence(String),
}

impl Error {
    /// Returns the error code (e.g., "CARDEX-001").
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::TermTooShort { .. } => "CARDEX-001",
            Self::Config(_) => "CARDEX-002",
            Self::Persistence(_) => "CARDEX-003",
        }
    }

    /// Returns true if the error is a caller-side validation failure.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::TermTooShort { .. })
    }
}

impl From<crate::config::ConfigError> for Error {
    fn from(err: crate::config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}
