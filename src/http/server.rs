//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, access log, CORS)
//! - Bind server to listener
//! - Graceful shutdown on the lifecycle signal

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::Method,
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
};

use crate::catalog::RecordStore;
use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::http::middleware::access_log_middleware;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub max_body_size: usize,
}

/// HTTP server for the stocks API.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    records: usize,
}

impl HttpServer {
    /// Create a new HTTP server serving `store`.
    pub fn new(config: ServiceConfig, store: RecordStore) -> Self {
        let records = store.len();
        let state = AppState {
            store: Arc::new(store),
            max_body_size: config.security.max_body_size,
        };

        Self {
            router: build_router(state),
            config,
            records,
        }
    }

    /// Run the server until `shutdown` fires, accepting connections on `listener`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            records = self.records,
            "HTTP server starting"
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
///
/// Layers run outermost-first: request ID, access log, CORS, handler.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/stocks",
            get(handlers::list_stocks).post(handlers::lookup_stock),
        )
        .route("/health", get(handlers::health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(middleware::from_fn(access_log_middleware))
                .layer(cors_layer()),
        )
}

/// Every origin, the read methods, any request header.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::HEAD])
        .allow_headers(Any)
}
