//! Record catalog subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     seed.rs (built-in fixture table)  ─┐
//!     catalog JSON file (optional)      ─┴→ store.rs (validate keys)
//!                                            → RecordStore (immutable)
//!                                            → shared via Arc to handlers
//! ```
//!
//! # Design Decisions
//! - The store is built once before the listener binds; there is no reload path
//! - Keys are the decimal form of each record's `oid`
//! - Reads need no locking since nothing writes after startup

pub mod record;
pub mod seed;
pub mod store;

pub use record::Record;
pub use store::{CatalogError, RecordStore};
