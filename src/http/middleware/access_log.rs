//! Access log middleware.
//! Emits exactly one line per request once the response has been fully written.

use std::fmt;
use std::net::SocketAddr;
use std::pin::Pin;
use std::task::{ready, Context, Poll};
use std::time::{Duration, Instant};

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{ConnectInfo, Request},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use http_body::{Frame, SizeHint};
use hyper::upgrade::OnUpgrade;

use crate::http::recorder::{ResponseSink, ResponseWriter, StreamingSink};
use crate::observability::metrics;

/// Tracing target for access log lines.
pub const ACCESS_LOG_TARGET: &str = "stocks_api::access";

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const X_REQUEST_ID: &str = "x-request-id";

/// Request facts captured before the handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub client: String,
    pub method: String,
    pub uri: String,
    pub protocol: String,
    pub user_agent: String,
    pub request_id: String,
}

impl RequestLine {
    pub fn from_request(request: &Request) -> Self {
        let headers = request.headers();
        let peer = request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);

        Self {
            client: client_address(headers, peer),
            method: request.method().to_string(),
            uri: request
                .uri()
                .path_and_query()
                .map_or_else(|| request.uri().path().to_string(), ToString::to_string),
            protocol: format!("{:?}", request.version()),
            user_agent: header_or_dash(headers, header::USER_AGENT.as_str()),
            request_id: header_or_dash(headers, X_REQUEST_ID),
        }
    }
}

/// One completed request.
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    pub request: RequestLine,
    pub status: u16,
    pub bytes: usize,
    pub took: Duration,
}

impl AccessLogEntry {
    pub fn emit(&self) {
        tracing::info!(
            target: ACCESS_LOG_TARGET,
            client = %self.request.client,
            method = %self.request.method,
            uri = %self.request.uri,
            protocol = %self.request.protocol,
            status = self.status,
            user_agent = %self.request.user_agent,
            bytes = self.bytes,
            request_id = %self.request.request_id,
            took_ms = self.took.as_secs_f64() * 1000.0,
            "{}",
            self
        );
    }
}

impl fmt::Display for AccessLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} {} {} {} {} Took: {}",
            self.request.client,
            self.request.method,
            self.request.uri,
            self.request.protocol,
            self.status,
            self.request.user_agent,
            format_elapsed(self.took)
        )
    }
}

/// Render a duration in milliseconds with three decimals.
pub fn format_elapsed(took: Duration) -> String {
    format!("{:.3}ms", took.as_secs_f64() * 1000.0)
}

/// Forwarded-for header when present and non-empty, else the peer address.
pub fn client_address(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(X_FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(forwarded), _) => forwarded.to_string(),
        (None, Some(peer)) => peer.to_string(),
        (None, None) => "-".to_string(),
    }
}

fn header_or_dash(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("-")
        .to_string()
}

/// Substitutes a [`ResponseWriter`] for the request's response sink, then
/// logs the request when its response body finishes, fails or is dropped.
pub async fn access_log_middleware(mut request: Request, next: Next) -> Response {
    let begin = Instant::now();
    let line = RequestLine::from_request(&request);

    let sink = match request.extensions().get::<OnUpgrade>() {
        Some(upgrade) => StreamingSink::new().with_upgrade(upgrade.clone()),
        None => StreamingSink::new(),
    };
    let writer = ResponseWriter::new(sink);
    request.extensions_mut().insert(writer.clone());

    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    writer.with(|recorder| {
        recorder.headers_mut().extend(std::mem::take(&mut parts.headers));
        recorder.write_status(parts.status);
        parts.headers = std::mem::take(recorder.headers_mut());
    });

    let body = LoggedBody {
        inner: body,
        writer,
        pending: Some((line, begin)),
    };
    Response::from_parts(parts, Body::new(body))
}

/// Response body that feeds every data frame through the request's
/// [`ResponseWriter`] and emits the access log entry exactly once.
struct LoggedBody {
    inner: Body,
    writer: ResponseWriter,
    pending: Option<(RequestLine, Instant)>,
}

impl LoggedBody {
    fn finish(&mut self) {
        let Some((request, begin)) = self.pending.take() else {
            return;
        };

        let entry = AccessLogEntry {
            request,
            status: self.writer.captured().status().as_u16(),
            bytes: self.writer.bytes_written(),
            took: begin.elapsed(),
        };
        entry.emit();
        metrics::record_request(&entry.request.method, entry.status, entry.took);
    }
}

impl HttpBody for LoggedBody {
    type Data = Bytes;
    type Error = axum::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Bytes>, axum::Error>>> {
        let this = self.get_mut();

        match ready!(Pin::new(&mut this.inner).poll_frame(cx)) {
            Some(Ok(frame)) => {
                if let Some(chunk) = frame.data_ref() {
                    if let Err(e) = this.writer.write_body(chunk.clone()) {
                        tracing::warn!(error = %e, "Response sink rejected body");
                        this.finish();
                        return Poll::Ready(Some(Err(axum::Error::new(e))));
                    }
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Response body stream failed");
                this.finish();
                Poll::Ready(Some(Err(e)))
            }
            None => {
                this.finish();
                Poll::Ready(None)
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

impl Drop for LoggedBody {
    fn drop(&mut self) {
        self.finish();
    }
}
