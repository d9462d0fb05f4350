//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! ListenerConfig (host, port)
//!     → listener.rs (bind, report local address)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - A bind failure is fatal; the caller exits the process

pub mod listener;

pub use listener::{bind, ListenerError};
