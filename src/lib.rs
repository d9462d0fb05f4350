//! Mock stock quotes HTTP API.
//!
//! Serves a read-only catalog of stock records over two endpoints and logs
//! one access line per request.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ request id ─▶ access log ─▶ CORS ─▶ handlers ─▶ catalog
//!                                      │                      │
//!     Client Response                  ▼                      │
//!     ◀────────────── status recorder (first status wins) ◀───┘
//! ```

pub mod catalog;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use catalog::{Record, RecordStore};
pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
