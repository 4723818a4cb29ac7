use std::collections::TryReserveError;
use thiserror::Error;

/// Result type for keyring operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving data keys through keyrings
#[derive(Error, Debug)]
pub enum Error {
    /// Storage for a keyring or an accumulator could not be reserved
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),

    /// A keyring call left the data key in a state that violates the keyring contract
    #[error("Bad state: {0}")]
    BadState(String),

    /// Failure reported by a keyring provider
    #[error("Keyring error ({keyring}): {message}")]
    Provider {
        /// Name of the keyring that failed
        keyring: String,
        /// Provider supplied description
        message: String,
    },

    /// No keyring produced a data key and at least one of them failed
    #[error("Unable to decrypt data key: {}", join_messages(.0))]
    Aggregate(Vec<Error>),

    /// Algorithm suite id that is not known to this library
    #[error("Unsupported algorithm suite: {0:#06x}")]
    UnsupportedAlgorithm(u16),

    /// Errors related to JSON serialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Creates a provider error for the named keyring
    pub fn provider(keyring: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Provider {
            keyring: keyring.into(),
            message: message.into(),
        }
    }
}

fn join_messages(errors: &[Error]) -> String {
    errors
        .iter()
        .map(Error::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
