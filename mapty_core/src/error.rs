//! Error types for the mapty_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for mapty_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad or missing form input, reported to the user
    #[error("Validation error: {0}")]
    Validation(String),

    /// Lookup by workout identifier failed
    #[error("Workout not found: {0}")]
    NotFound(String),

    /// A workout with this identifier is already present
    #[error("Duplicate workout id: {0}")]
    DuplicateId(String),

    /// Persisted blob is unparsable or semantically invalid
    #[error("Corrupt data: {0}")]
    CorruptData(String),

    /// No starting coordinate could be acquired
    #[error("Geolocation unavailable: {0}")]
    GeolocationUnavailable(String),

    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Whether this error is meant to be shown to the user rather than only logged
    pub fn is_user_facing(&self) -> bool {
        matches!(self, Error::Validation(_) | Error::GeolocationUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_kinds() {
        assert!(Error::Validation("distance".into()).is_user_facing());
        assert!(Error::GeolocationUnavailable("denied".into()).is_user_facing());
        assert!(!Error::NotFound("123".into()).is_user_facing());
        assert!(!Error::CorruptData("truncated".into()).is_user_facing());
    }

    #[test]
    fn test_display_includes_detail() {
        let err = Error::NotFound("1697000000000".into());
        assert_eq!(err.to_string(), "Workout not found: 1697000000000");
    }
}
