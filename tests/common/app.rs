use std::sync::Arc;

use axum_test::TestServer;
use serde_json::Value;
use spec_explorer::build_router;
use spec_explorer::config::{Config, LogFormat};
use spec_explorer::services::{DocumentLoader, StaticLoader};
use spec_explorer::state::AppState;

/// Test configuration
pub fn test_config() -> Config {
    Config {
        spec_source: "in-memory".to_string(),
        fetch_timeout_seconds: 5,
        session_idle_seconds: 1800,
        log_format: LogFormat::Pretty,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// Test application wrapper
pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
}

impl TestApp {
    /// Create a test application serving `document`, already loaded
    pub async fn new(document: Value) -> Self {
        let app = Self::unloaded(Arc::new(StaticLoader::new(document)));
        app.state
            .reload()
            .await
            .expect("Failed to load test document");
        app
    }

    /// Create a test application whose catalog has not been loaded yet
    pub fn unloaded(loader: Arc<dyn DocumentLoader>) -> Self {
        Self::from_state(AppState::with_loader(test_config(), loader))
    }

    /// Create a test application over a prepared state
    pub fn from_state(state: AppState) -> Self {
        let router = build_router(state.clone());
        let server = TestServer::new(router).expect("Failed to create test server");

        Self { server, state }
    }

    /// Create a test application whose only load attempt failed
    pub async fn failing() -> Self {
        let app = Self::unloaded(Arc::new(StaticLoader::failing()));
        assert!(app.state.reload().await.is_err());
        app
    }
}
