//! # Namelog Ledger
//!
//! The ledger seam: the append-only event log is an external,
//! shared service the client only reads from and appends to. This crate
//! defines that boundary and an in-memory implementation.
//!
//! ## Key Types
//!
//! - [`Ledger`] - Async trait for fetch / append / subscribe / chain id
//! - [`EventFilter`] - Exact-match name scope for queries and subscriptions
//! - [`EventSignal`] - Signal-only change subscription (no payloads)
//! - [`MemoryLedger`] - Reference implementation and test double
//!
//! ## Contract Notes
//!
//! - `fetch_events` returns events in ledger order; that ordering is what
//!   makes last-writer-wins reduction well defined.
//! - A transport failure is an error, never an empty result. Empty means
//!   "no events".
//! - `append` resolves only once the ledger confirms inclusion.
//! - Subscriptions are at-least-once "something changed" signals; callers
//!   must re-fetch rather than trust any pushed payload.

pub mod error;
pub mod filter;
pub mod memory;
pub mod subscribe;
pub mod traits;

pub use error::{LedgerError, Result};
pub use filter::EventFilter;
pub use memory::MemoryLedger;
pub use subscribe::EventSignal;
pub use traits::Ledger;
