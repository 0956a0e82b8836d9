//! Error types for ledger operations.

use thiserror::Error;

/// Errors that can occur talking to the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Could not reach the ledger. Never masked as an empty result.
    #[error("transport error: {0}")]
    Transport(String),

    /// The ledger refused the append (authorization, resource budget,
    /// congestion). The reason string is the ledger's, verbatim.
    #[error("rejected by ledger: {reason}")]
    Rejected { reason: String },

    /// The envelope itself is malformed (bad signature, bad shape).
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// The subscription side of the ledger has shut down.
    #[error("ledger subscription closed")]
    SubscriptionClosed,
}

/// Result type for ledger operations.
pub type Result<T> = std::result::Result<T, LedgerError>;
