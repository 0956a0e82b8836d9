//! Error types for namelog core.

use thiserror::Error;

/// Errors that can occur in pure key/codec/event operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("malformed key: {0}")]
    MalformedKey(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("invalid value: {0}")]
    InvalidValue(String),

    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,
}
