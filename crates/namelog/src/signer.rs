//! The signer seam: where wallet-held keys plug in.
//!
//! The client never holds key material itself in production; it asks an
//! injected [`Signer`] to authorize each append. A wallet-backed signer
//! may prompt a user, who may decline - that surfaces as
//! [`SignerError::Cancelled`], kept distinct from ledger rejections.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

use namelog_core::{Keypair, PublicKey, Signature};

/// Errors from the signing seam.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The authorizing party declined to sign.
    #[error("signing declined")]
    Cancelled,

    /// The signer failed (locked keystore, device error, ...).
    #[error("signing failed: {0}")]
    Signing(String),
}

/// An authorized writer identity.
///
/// `sign` is async because real signers may round-trip through a wallet
/// UI or hardware device.
#[async_trait]
pub trait Signer: Send + Sync {
    /// The public key appends will be attributed to.
    fn public_key(&self) -> PublicKey;

    /// Sign a message, or decline.
    async fn sign(&self, message: &[u8]) -> Result<Signature, SignerError>;
}

/// A signer backed by an in-process keypair. Used by tests and by
/// deployments that manage their own keys.
pub struct LocalSigner {
    keypair: Keypair,
}

impl LocalSigner {
    /// Wrap a keypair.
    pub fn new(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// Generate a fresh random identity.
    pub fn random() -> Self {
        Self::new(Keypair::generate())
    }
}

#[async_trait]
impl Signer for LocalSigner {
    fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    async fn sign(&self, message: &[u8]) -> Result<Signature, SignerError> {
        Ok(self.keypair.sign(message))
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalSigner({:?})", self.public_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_signer_signs() {
        let signer = LocalSigner::new(Keypair::from_seed(&[3u8; 32]));
        let signature = signer.sign(b"message").await.unwrap();
        signer
            .public_key()
            .verify(b"message", &signature)
            .expect("signature must verify");
    }
}
