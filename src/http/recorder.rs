//! Status-recording response sink.
//!
//! # Responsibilities
//! - Define the response sink seam (status, headers, body, connection takeover)
//! - Decorate any sink so the first status written is captured for logging
//! - Observe a response as it streams to hyper, one body chunk at a time
//!
//! # Design Decisions
//! - The first status written is authoritative; later writes still reach the sink
//! - No status written means 200, matching what the transport sends implicitly
//! - Connection takeover is an optional capability queried at runtime

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use axum::body::Bytes;
use axum::http::{HeaderMap, StatusCode};
use hyper::upgrade::OnUpgrade;
use thiserror::Error;

/// Errors surfaced by response sinks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("response sink does not support connection takeover")]
    TakeoverUnsupported,

    #[error("connection has been taken over")]
    TakenOver,
}

/// Something a handler writes its response into.
pub trait ResponseSink {
    /// Set the response status. Sinks decide whether a repeated call takes effect.
    fn write_status(&mut self, status: StatusCode);

    /// Response headers, mutable until the response is sent.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Append a chunk to the response body.
    fn write_body(&mut self, chunk: Bytes) -> Result<(), SinkError>;

    /// The takeover capability, when this sink's transport supports it.
    fn as_takeover(&mut self) -> Option<&mut dyn ConnectionTakeover> {
        None
    }
}

/// Hands the raw connection to the caller for a protocol upgrade.
pub trait ConnectionTakeover {
    fn take_over(&mut self) -> Result<OnUpgrade, SinkError>;
}

/// Per-request record of the first status written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturedStatus {
    status: StatusCode,
    recorded: bool,
}

impl CapturedStatus {
    /// Capture `status` unless one was already recorded. Returns whether it was captured.
    pub fn record(&mut self, status: StatusCode) -> bool {
        if self.recorded {
            return false;
        }
        self.status = status;
        self.recorded = true;
        true
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Whether a status was explicitly written.
    pub fn is_recorded(&self) -> bool {
        self.recorded
    }
}

impl Default for CapturedStatus {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            recorded: false,
        }
    }
}

/// Decorates a sink, forwarding every operation and capturing the first status.
#[derive(Debug)]
pub struct StatusRecorder<S> {
    inner: S,
    captured: CapturedStatus,
    bytes_written: usize,
}

impl<S: ResponseSink> StatusRecorder<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            captured: CapturedStatus::default(),
            bytes_written: 0,
        }
    }

    pub fn captured(&self) -> CapturedStatus {
        self.captured
    }

    /// The status that will be logged for this response.
    pub fn status(&self) -> StatusCode {
        self.captured.status()
    }

    /// Body bytes accepted by the underlying sink.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Take the raw connection through the underlying sink.
    pub fn take_over(&mut self) -> Result<OnUpgrade, SinkError> {
        match self.inner.as_takeover() {
            Some(takeover) => takeover.take_over(),
            None => Err(SinkError::TakeoverUnsupported),
        }
    }

    pub fn into_parts(self) -> (S, CapturedStatus) {
        (self.inner, self.captured)
    }
}

impl<S: ResponseSink> ResponseSink for StatusRecorder<S> {
    fn write_status(&mut self, status: StatusCode) {
        self.captured.record(status);
        self.inner.write_status(status);
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        self.inner.headers_mut()
    }

    fn write_body(&mut self, chunk: Bytes) -> Result<(), SinkError> {
        let len = chunk.len();
        self.inner.write_body(chunk)?;
        self.bytes_written += len;
        Ok(())
    }

    fn as_takeover(&mut self) -> Option<&mut dyn ConnectionTakeover> {
        self.inner.as_takeover()
    }
}

/// Sink in front of hyper's connection: body bytes stream straight through,
/// the sink tracks the committed head and whether the connection was taken.
///
/// Like an HTTP/1 connection, the status is committed by the first status or
/// body write; later status writes are ignored.
#[derive(Debug, Default)]
pub struct StreamingSink {
    status: Option<StatusCode>,
    headers: HeaderMap,
    upgrade: Option<OnUpgrade>,
    supports_takeover: bool,
    taken_over: bool,
}

impl StreamingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable connection takeover, backed by the request's pending upgrade.
    pub fn with_upgrade(mut self, upgrade: OnUpgrade) -> Self {
        self.upgrade = Some(upgrade);
        self.supports_takeover = true;
        self
    }

    /// The committed status, if any write happened yet.
    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn is_taken_over(&self) -> bool {
        self.taken_over
    }
}

impl ResponseSink for StreamingSink {
    fn write_status(&mut self, status: StatusCode) {
        if self.taken_over {
            return;
        }
        match self.status {
            Some(committed) => tracing::warn!(
                committed = committed.as_u16(),
                ignored = status.as_u16(),
                "superfluous status write"
            ),
            None => self.status = Some(status),
        }
    }

    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_body(&mut self, _chunk: Bytes) -> Result<(), SinkError> {
        if self.taken_over {
            return Err(SinkError::TakenOver);
        }
        self.status.get_or_insert(StatusCode::OK);
        Ok(())
    }

    fn as_takeover(&mut self) -> Option<&mut dyn ConnectionTakeover> {
        if self.supports_takeover {
            Some(self)
        } else {
            None
        }
    }
}

impl ConnectionTakeover for StreamingSink {
    fn take_over(&mut self) -> Result<OnUpgrade, SinkError> {
        let upgrade = self.upgrade.take().ok_or(SinkError::TakenOver)?;
        self.taken_over = true;
        Ok(upgrade)
    }
}

/// Per-request handle on the status recorder, shared by the logging
/// middleware, the handler (through a request extension) and the response
/// body.
#[derive(Debug, Clone)]
pub struct ResponseWriter {
    inner: Arc<Mutex<StatusRecorder<StreamingSink>>>,
}

impl ResponseWriter {
    pub fn new(sink: StreamingSink) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StatusRecorder::new(sink))),
        }
    }

    /// Run `f` against the recorder.
    pub fn with<R>(&self, f: impl FnOnce(&mut StatusRecorder<StreamingSink>) -> R) -> R {
        f(&mut self.lock())
    }

    /// Take the raw connection for a protocol upgrade.
    pub fn take_over(&self) -> Result<OnUpgrade, SinkError> {
        self.lock().take_over()
    }

    pub fn write_body(&self, chunk: Bytes) -> Result<(), SinkError> {
        self.lock().write_body(chunk)
    }

    pub fn captured(&self) -> CapturedStatus {
        self.lock().captured()
    }

    pub fn bytes_written(&self) -> usize {
        self.lock().bytes_written()
    }

    fn lock(&self) -> MutexGuard<'_, StatusRecorder<StreamingSink>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
