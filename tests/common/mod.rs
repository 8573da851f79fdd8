//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use log_endpoint::config::AppConfig;
use log_endpoint::http::HttpServer;
use log_endpoint::lifecycle::Shutdown;
use log_endpoint::log_service::MemorySink;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A server running on an ephemeral local port.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    pub sink: Arc<MemorySink>,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<AppConfig>,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) -> Result<(), std::io::Error> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked")
    }
}

/// Start a server with the given config, recording into a fresh `MemorySink`.
pub async fn start_server(mut config: AppConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    config.listener.bind_address = addr.to_string();

    let sink = Arc::new(MemorySink::new());
    let server = HttpServer::with_sink(config, sink.clone());
    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(listener, updates_rx, server_shutdown).await });

    TestServer {
        addr,
        sink,
        shutdown,
        config_updates,
        handle,
    }
}

/// Client without connection pooling or system proxy settings.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
