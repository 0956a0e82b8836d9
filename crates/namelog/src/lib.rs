//! # Namelog
//!
//! A client for a decentralized naming service: resolve human-readable
//! names to typed records (addresses, content hashes, keys, DNS-style
//! entries) stored as an append-only event log on a shared ledger, and
//! append new changes as an authorized writer.
//!
//! ## Key Concepts
//!
//! - **ChangeEvent**: immutable, ledger-ordered; the source of truth.
//! - **RecordState**: derived per-name state, rebuilt by folding the full
//!   event sequence. Never persisted, so it cannot drift from the log.
//! - **Last-writer-wins**: the later event in ledger order fully
//!   supersedes earlier ones for the same (type, label) key.
//! - **Tombstone**: an empty-data event clears a key but keeps it
//!   visible as "no value".
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use namelog::{ClientConfig, LocalSigner, NameClient};
//! use namelog::core::RecordType;
//! use namelog::ledger::MemoryLedger;
//!
//! async fn example() {
//!     let ledger = Arc::new(MemoryLedger::new());
//!     let signer = Arc::new(LocalSigner::random());
//!     let client = NameClient::new(ledger, signer, ClientConfig::default());
//!
//!     let commit = client
//!         .submit("alice", RecordType::Txt, "", "hello world")
//!         .await
//!         .unwrap();
//!     println!("committed as {commit}");
//!
//!     let state = client.resolve("alice").await.unwrap();
//!     assert_eq!(state.value_of(RecordType::Txt, ""), Some("hello world"));
//! }
//! ```

pub mod client;
pub mod error;
pub mod signer;
pub mod watch;

// Re-export component crates
pub use namelog_core as core;
pub use namelog_ledger as ledger;

// Re-export main types for convenience
pub use client::{ClientConfig, NameClient};
pub use error::{ClientError, Result};
pub use signer::{LocalSigner, Signer, SignerError};
pub use watch::WatchHandle;

// Re-export commonly used core types
pub use namelog_core::{
    ChangeEvent, CodecRegistry, CommitId, FixedKey, Keypair, PublicKey, RecordKey, RecordState,
    RecordType, RecordValue,
};
