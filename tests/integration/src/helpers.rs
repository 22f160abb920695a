//! Test helpers for integration tests
//!
//! Provides a test server over the in-memory store, request helpers, and
//! response assertions.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use vc_api::{run_until, AppState};
use vc_common::{AppConfig, AppError};
use vc_core::ManualClock;
use vc_db::MemoryVoiceStore;
use vc_service::ServiceContextBuilder;

/// 2024-03-15T12:00:00Z
pub const TEST_EPOCH: i64 = 1_710_504_000;

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: MemoryVoiceStore,
    pub clock: Arc<ManualClock>,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<Result<(), AppError>>,
}

impl TestServer {
    /// Start a server over a fresh store with the clock at [`TEST_EPOCH`]
    pub async fn start() -> Result<Self> {
        Self::start_with_store(MemoryVoiceStore::new()).await
    }

    /// Start a server over an existing store
    pub async fn start_with_store(store: MemoryVoiceStore) -> Result<Self> {
        let clock = Arc::new(ManualClock::new(TEST_EPOCH));
        let config = test_config()?;

        let service_context = ServiceContextBuilder::new()
            .store(Arc::new(store.clone()))
            .clock(clock.clone())
            .ranking(config.ranking.clone())
            .build()?;
        let state = AppState::new(service_context, config);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(run_until(state, listener, async move {
            shutdown_rx.await.ok();
        }));

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        let server = Self {
            addr,
            client,
            store,
            clock,
            shutdown: Some(shutdown_tx),
            handle,
        };
        server.wait_until_ready().await?;
        Ok(server)
    }

    /// Poll the liveness probe until the server answers
    async fn wait_until_ready(&self) -> Result<()> {
        for _ in 0..50 {
            if let Ok(response) = self.get("/health").await {
                if response.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        anyhow::bail!("Test server did not become ready")
    }

    /// Trigger graceful shutdown and wait for it to finish
    pub async fn shutdown(mut self) -> Result<MemoryVoiceStore> {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        self.handle.await??;
        Ok(self.store)
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request without a body
    pub async fn post_empty(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).send().await?)
    }

    /// Make a PUT request with JSON body
    pub async fn put<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.put(&url).json(body).send().await?)
    }

    /// Submit a voice event and wait until it is accounted
    pub async fn voice_event<T: Serialize>(&self, body: &T) -> Result<Response> {
        self.post("/api/v1/voice/events?wait=true", body).await
    }

    /// Move the server clock to `TEST_EPOCH + offset`
    pub fn at(&self, offset: i64) {
        self.clock.set(TEST_EPOCH + offset);
    }
}

/// Configuration with every required key set and small ranking limits
pub fn test_config() -> Result<AppConfig> {
    let values: HashMap<&str, &str> = HashMap::from([
        ("APP_ENV", "development"),
        ("API_PORT", "0"),
        ("DATABASE_URL", "postgres://unused"),
        ("TRACKER_WORKERS", "2"),
        ("TRACKER_QUEUE_CAPACITY", "16"),
        ("RANKING_DEFAULT_LIMIT", "2"),
        ("RANKING_MAX_LIMIT", "5"),
    ]);

    AppConfig::from_lookup(|key| values.get(key).map(|v| (*v).to_string()))
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Missing error code in {body}"))
}
