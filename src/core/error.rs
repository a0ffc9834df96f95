//! Structured error handling for facesync
//!
//! Provides a small hierarchical error type with operation context,
//! plus a dedicated rejection type for the emotion ingestion path so
//! callers can tell validation failures apart without string matching.

use std::fmt;
use thiserror::Error;

/// Result type alias with FaceError
pub type Result<T> = std::result::Result<T, FaceError>;

/// Main error type for facesync
#[derive(Error, Debug, Clone)]
pub enum FaceError {
    /// Audio analysis errors
    #[error("Audio analysis error ({operation}): {message}")]
    Audio {
        message: String,
        operation: AudioOperation,
    },

    /// Avatar model errors (missing morph set, bad descriptor)
    #[error("Avatar model error: {message}")]
    Model {
        message: String,
        model_name: Option<String>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Emotion event rejected during ingestion
    #[error("Emotion event rejected: {0}")]
    Rejected(#[from] RejectReason),

    /// Internal/bug errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Audio operation types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioOperation {
    Attach,
    Transform,
    Sample,
}

impl fmt::Display for AudioOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioOperation::Attach => write!(f, "attach"),
            AudioOperation::Transform => write!(f, "transform setup"),
            AudioOperation::Sample => write!(f, "sampling"),
        }
    }
}

/// Why an inbound emotion event was dropped
///
/// Rejections never mutate state; they are logged at the ingestion
/// boundary and surfaced to callers that want to count or assert them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// Payload is not valid UTF-8 JSON
    #[error("payload is not valid JSON: {0}")]
    Malformed(String),

    /// `type` field present but not "emotion"
    #[error("payload type is `{0}`, expected \"emotion\"")]
    WrongType(String),

    /// Required field missing or empty
    #[error("missing or empty field `{0}`")]
    MissingField(&'static str),

    /// Emotion string outside the closed enum
    #[error("unknown emotion `{0}`")]
    UnknownEmotion(String),

    /// Source string outside {user, agent}
    #[error("unknown source `{0}`")]
    UnknownSource(String),
}
