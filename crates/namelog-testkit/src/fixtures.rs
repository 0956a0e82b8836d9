//! Test fixtures and helpers.
//!
//! Common setup code for tests built on the memory ledger.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

use namelog::{ClientConfig, LocalSigner, NameClient, Signer, SignerError};
use namelog_core::{
    ChangeEvent, EventEnvelope, FixedKey, Keypair, PublicKey, RecordType, Signature,
};
use namelog_ledger::MemoryLedger;

/// A fixture holding a writer keypair and a shared memory ledger.
pub struct TestFixture {
    pub keypair: Keypair,
    pub ledger: Arc<MemoryLedger>,
}

impl TestFixture {
    /// Create a fixture with a random keypair and an empty ledger.
    pub fn new() -> Self {
        Self {
            keypair: Keypair::generate(),
            ledger: Arc::new(MemoryLedger::new()),
        }
    }

    /// Create with a deterministic keypair from a seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            keypair: Keypair::from_seed(&seed),
            ledger: Arc::new(MemoryLedger::new()),
        }
    }

    /// The fixture keypair's public key.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// A client over the fixture's ledger, signing with its keypair.
    pub fn client(&self) -> NameClient<Arc<MemoryLedger>> {
        NameClient::new(
            Arc::clone(&self.ledger),
            Arc::new(LocalSigner::new(self.keypair.clone())),
            ClientConfig::default(),
        )
    }

    /// A client whose signer declines every request.
    pub fn declining_client(&self) -> NameClient<Arc<MemoryLedger>> {
        NameClient::new(
            Arc::clone(&self.ledger),
            Arc::new(DecliningSigner::new(self.public_key())),
            ClientConfig::default(),
        )
    }

    /// Build a signed envelope for direct ledger appends.
    pub fn make_envelope(
        &self,
        name: &str,
        record_type: RecordType,
        label: &str,
        data: &[u8],
    ) -> EventEnvelope {
        let event = ChangeEvent::new(
            FixedKey::encode(name),
            FixedKey::encode(label),
            record_type,
            Bytes::copy_from_slice(data),
        );
        EventEnvelope::sign(event, 1_736_870_400_000, &self.keypair)
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// A signer that declines every request, for exercising the cancelled
/// path.
pub struct DecliningSigner {
    public_key: PublicKey,
}

impl DecliningSigner {
    /// Create a declining signer claiming the given identity.
    pub fn new(public_key: PublicKey) -> Self {
        Self { public_key }
    }
}

#[async_trait]
impl Signer for DecliningSigner {
    fn public_key(&self) -> PublicKey {
        self.public_key
    }

    async fn sign(&self, _message: &[u8]) -> Result<Signature, SignerError> {
        Err(SignerError::Cancelled)
    }
}
