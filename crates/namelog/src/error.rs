//! Error types for the namelog client.

use thiserror::Error;

use namelog_ledger::LedgerError;

use crate::signer::SignerError;

/// Errors surfaced by the client facade.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Caller-side precondition violation; no ledger call was attempted.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// The authorizing party declined. Distinct from a ledger rejection
    /// so callers can avoid alarming the user.
    #[error("cancelled by user")]
    Cancelled,

    /// The signer failed for a reason other than declining.
    #[error("signer error: {0}")]
    Signer(String),

    /// The ledger at the other end is not the one this session expects.
    #[error("wrong chain: expected {expected}, ledger reports {actual}")]
    WrongChain { expected: u64, actual: u64 },

    /// A ledger-side failure, passed through verbatim.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

impl From<SignerError> for ClientError {
    fn from(e: SignerError) -> Self {
        match e {
            SignerError::Cancelled => ClientError::Cancelled,
            SignerError::Signing(msg) => ClientError::Signer(msg),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
