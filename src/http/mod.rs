//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, CORS)
//!     → middleware/access_log.rs (time the request, log one line)
//!     → handlers.rs (list / lookup against the record store)
//!     → recorder.rs (status recorded as the body streams out)
//!     → Send to client
//! ```

pub mod error;
pub mod form;
pub mod handlers;
pub mod middleware;
pub mod recorder;
pub mod server;

pub use error::{ApiError, ErrorEnvelope};
pub use recorder::{
    CapturedStatus, ConnectionTakeover, ResponseSink, ResponseWriter, SinkError, StatusRecorder,
    StreamingSink,
};
pub use server::{build_router, AppState, HttpServer};
