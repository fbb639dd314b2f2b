//! Error types for keyproof operations

use thiserror::Error;

use crate::names::Handle;

/// Result type for keyproof operations
pub type Result<T> = std::result::Result<T, KeyproofError>;

/// Keyproof errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyproofError {
    /// A fresh name was declared twice inside one proof tree
    #[error("Name collision: {0} is already registered")]
    NameCollision(String),

    /// A base element is missing from the base lookup
    #[error("Missing base for {0}")]
    MissingBase(Handle),

    /// A witness or randomizer is missing from the secret lookup
    #[error("Missing secret for {0}")]
    MissingSecret(Handle),

    /// A response is missing from the proof lookup
    #[error("Missing response for {0}")]
    MissingResponse(Handle),

    /// Proof failed its structural check
    #[error("Malformed proof: {0}")]
    MalformedProof(String),

    /// Witnesses cannot be used for this relation
    #[error("Invalid witness: {0}")]
    InvalidWitness(String),

    /// Group parameters rejected
    #[error("Invalid group: {0}")]
    InvalidGroup(String),

    /// Proof parameters rejected
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for KeyproofError {
    fn from(e: serde_json::Error) -> Self {
        KeyproofError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = KeyproofError::NameCollision("x_y_m_r_add_mod".to_string());
        assert!(err.to_string().contains("x_y_m_r_add_mod"));

        let err = KeyproofError::MissingSecret(Handle::H);
        assert_eq!(err.to_string(), "Missing secret for #1");
    }

    #[test]
    fn test_from_serde_json() {
        let parse = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: KeyproofError = parse.into();
        assert!(matches!(err, KeyproofError::SerializationError(_)));
    }
}
