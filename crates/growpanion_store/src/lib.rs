//! # Growpanion Store
//!
//! Document store trait and backends for the Growpanion backup engine.
//!
//! The application keeps its state in four named collections: grows,
//! plants, fertilizer mixes, and a singleton settings record. This crate
//! provides the store abstraction the backup engine reads from and writes
//! to, without interpreting entity contents.
//!
//! ## Design Principles
//!
//! - Entities are **opaque records**: the store only understands the
//!   mandatory `id` field, everything else passes through untouched
//! - All writes go through [`Store::with_transaction`], which commits
//!   all-or-nothing
//! - Backends must be `Send + Sync` for shared access
//!
//! ## Available Backends
//!
//! - [`MemoryStore`] - For testing and ephemeral state
//! - [`FileStore`] - Persists the collections as a single JSON document
//!
//! ## Example
//!
//! ```rust
//! use growpanion_store::{Collection, MemoryStore, Record, Store};
//!
//! let store = MemoryStore::new();
//! store
//!     .with_transaction(&mut |txn| {
//!         txn.put(Collection::Grows, Record::new("g1"))?;
//!         Ok(())
//!     })
//!     .unwrap();
//! assert_eq!(store.to_array(Collection::Grows).unwrap().len(), 1);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;
mod record;
mod state;

pub use backend::{Collection, Store, StoreTransaction};
pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::{Record, Settings};
pub use state::StoreState;
