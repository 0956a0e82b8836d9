//! # Namelog Testkit
//!
//! Testing utilities for namelog.
//!
//! ## Overview
//!
//! - **Fixtures**: a wired-up [`TestFixture`] (keypair + memory ledger +
//!   client) plus event helpers and a declining test signer.
//! - **Generators**: proptest strategies for names, labels, record types,
//!   and address values.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use namelog_testkit::TestFixture;
//! use namelog::core::RecordType;
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     let client = fixture.client();
//!     client.submit("alice", RecordType::Txt, "", "hi").await.unwrap();
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{DecliningSigner, TestFixture};
pub use generators::{address_value, key_text, label_text, record_type};
