//! Client error handling
//!
//! Two failure domains cross the core boundary: the durable store and
//! the AI layer. Persistence read failures fall back to defaults inside
//! the repository, and AI failures surface as values the caller can
//! substitute a fallback for. Nothing here unwinds through a session
//! command.

use thiserror::Error;

/// Durable store failure
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("no usable data directory on this platform")]
    NoDataDir,
}

/// AI-layer failure, always recoverable at the call site
#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("AI service returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("AI response contained no content")]
    MissingContent,

    #[error("AI response did not match the expected schema: {0}")]
    Schema(String),

    #[error("AI layer is disabled in configuration")]
    Disabled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_message() {
        let err = AiError::Schema("missing field `title`".to_string());
        assert!(err.to_string().contains("expected schema"));
        assert!(err.to_string().contains("missing field `title`"));
    }

    #[test]
    fn test_store_error_wraps_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = StoreError::from(io);
        assert!(matches!(err, StoreError::Io(_)));
    }
}
