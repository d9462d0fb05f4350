//! Shared utilities for integration tests.

use std::net::SocketAddr;

use stocks_api::config::ServiceConfig;
use stocks_api::{HttpServer, RecordStore, Shutdown};

/// A server running on an ephemeral loopback port.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the real server with `store` and return once it accepts connections.
pub async fn start_server(store: RecordStore) -> TestServer {
    let mut config = ServiceConfig::default();
    config.listener.host = "127.0.0.1".to_string();
    config.listener.port = 0;

    let listener = stocks_api::net::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, store);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}

/// An HTTP client that never pools or proxies.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
