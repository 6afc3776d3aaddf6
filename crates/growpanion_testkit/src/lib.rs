//! # Growpanion Testkit
//!
//! Test utilities for the Growpanion backup engine.
//!
//! This crate provides:
//! - Fixtures: canned records, settings, snapshots, and pre-populated
//!   stores
//! - Fault injection: a store wrapper that fails partway through a
//!   transaction, for exercising rollback behavior
//!
//! ## Usage
//!
//! ```rust
//! use growpanion_testkit::fixtures::seeded_store;
//! use growpanion_store::{Collection, Store};
//!
//! let store = seeded_store();
//! assert!(!store.to_array(Collection::Grows).unwrap().is_empty());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faults;
pub mod fixtures;

pub use faults::FailingStore;
pub use fixtures::{sample_snapshot, sample_snapshot_data, seeded_state, seeded_store};
