mod common;

use std::future::IntoFuture;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::{json, Value};
use spec_explorer::error::AppResult;
use spec_explorer::services::{DocumentLoader, ExplorerSession, StaticLoader};
use spec_explorer::sessions::{InMemorySessionStore, SessionHandle, SessionStore};
use spec_explorer::state::AppState;
use uuid::Uuid;

use common::app::test_config;
use common::{explorer_document, tscore_document, TestApp};

/// Loader whose document can be swapped between reloads
struct SwappableLoader {
    document: Mutex<Value>,
}

impl SwappableLoader {
    fn new(document: Value) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }

    fn swap(&self, document: Value) {
        *self.document.lock().unwrap() = document;
    }
}

#[async_trait]
impl DocumentLoader for SwappableLoader {
    async fn load(&self) -> AppResult<Value> {
        Ok(self.document.lock().unwrap().clone())
    }

    fn describe(&self) -> String {
        "swappable".to_string()
    }
}

/// Session store that is slow to hand out sessions, so overlapping
/// requests interleave
struct SlowSessionStore {
    inner: InMemorySessionStore,
    delay: Duration,
}

#[async_trait]
impl SessionStore for SlowSessionStore {
    async fn create(&self, session: ExplorerSession) -> AppResult<Uuid> {
        self.inner.create(session).await
    }

    async fn get(&self, session_id: Uuid) -> AppResult<Option<SessionHandle>> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(session_id).await
    }

    async fn delete(&self, session_id: Uuid) -> AppResult<()> {
        self.inner.delete(session_id).await
    }

    async fn count(&self) -> AppResult<u64> {
        self.inner.count().await
    }

    async fn purge_idle(&self) -> AppResult<u64> {
        self.inner.purge_idle().await
    }
}

async fn app_with_store(store: Arc<dyn SessionStore>) -> TestApp {
    let mut state = AppState::with_loader(
        test_config(),
        Arc::new(StaticLoader::new(explorer_document())),
    );
    state.sessions = store;
    state.reload().await.unwrap();
    TestApp::from_state(state)
}

async fn create_session(app: &TestApp, body: Value) -> Value {
    let response = app.server.post("/api/sessions").json(&body).await;
    response.assert_status(StatusCode::CREATED);
    response.json()
}

fn visible_names(body: &Value) -> Vec<String> {
    body["visible"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_new_session_selects_first_by_name() {
    let app = TestApp::new(explorer_document()).await;

    let body = create_session(&app, json!({})).await;

    assert!(body["id"].as_str().is_some());
    assert_eq!(body["query"], "");
    assert_eq!(body["sort"], "name_ascending");
    assert_eq!(body["tab"], "details");
    assert_eq!(body["visible"].as_array().unwrap().len(), 5);
    assert_eq!(body["selected"]["name"], "Create user");
    assert_eq!(body["panel"]["tab"], "details");
    assert_eq!(body["panel"]["view"]["id"], 3);
    assert!(body["notice"].is_null());
}

#[tokio::test]
async fn test_create_with_query_and_sort() {
    let app = TestApp::new(explorer_document()).await;

    let body = create_session(&app, json!({"query": "user", "sort": "Name Z-A"})).await;

    assert_eq!(body["sort"], "name_descending");
    assert_eq!(visible_names(&body), vec!["List users", "Create user"]);
    // Default selection ignores the requested sort
    assert_eq!(body["selected"]["name"], "Create user");
}

#[tokio::test]
async fn test_create_with_unknown_sort() {
    let app = TestApp::new(explorer_document()).await;

    let response = app
        .server
        .post("/api/sessions")
        .json(&json!({"sort": "random"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_session_unavailable_while_loading() {
    let app = TestApp::unloaded(Arc::new(SwappableLoader::new(explorer_document())));

    let response = app.server.post("/api/sessions").json(&json!({})).await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_empty_catalog_session() {
    let app = TestApp::new(json!({"paths": {}})).await;

    let body = create_session(&app, json!({})).await;

    assert!(body["selected"].is_null());
    assert!(body["panel"].is_null());
    assert_eq!(body["notice"], "No APIs available");
}

#[tokio::test]
async fn test_query_keeps_hidden_selection() {
    let app = TestApp::new(explorer_document()).await;
    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();

    let response = app
        .server
        .put(&format!("/api/sessions/{}/query", id))
        .json(&json!({"query": "pet"}))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(visible_names(&body), vec!["Get pet"]);
    assert_eq!(body["selected"]["name"], "Create user");
}

#[tokio::test]
async fn test_query_without_matches() {
    let app = TestApp::new(explorer_document()).await;
    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();

    let body: Value = app
        .server
        .put(&format!("/api/sessions/{}/query", id))
        .json(&json!({"query": "nothing here"}))
        .await
        .json();

    assert!(body["visible"].as_array().unwrap().is_empty());
    assert_eq!(body["notice"], "No results found");
}

#[tokio::test]
async fn test_sort_change_keeps_selection() {
    let app = TestApp::new(explorer_document()).await;
    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();

    let body: Value = app
        .server
        .put(&format!("/api/sessions/{}/sort", id))
        .json(&json!({"sort": "name_descending"}))
        .await
        .json();

    assert_eq!(
        visible_names(&body),
        vec!["Unnamed API", "tScore", "List users", "Get pet", "Create user"]
    );
    assert_eq!(body["selected"]["name"], "Create user");

    app.server
        .put(&format!("/api/sessions/{}/sort", id))
        .json(&json!({"sort": "sideways"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_select_and_switch_tabs() {
    let app = TestApp::new(explorer_document()).await;
    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();

    let body: Value = app
        .server
        .put(&format!("/api/sessions/{}/tab", id))
        .json(&json!({"tab": "method"}))
        .await
        .json();
    assert_eq!(body["panel"]["tab"], "method");
    assert_eq!(body["panel"]["method"], "POST");
    assert_eq!(body["panel"]["path"], "/users");

    // Selecting goes back to the details tab
    let body: Value = app
        .server
        .put(&format!("/api/sessions/{}/selection", id))
        .json(&json!({"id": 4}))
        .await
        .json();
    assert_eq!(body["selected"]["name"], "Get pet");
    assert_eq!(body["tab"], "details");
    assert_eq!(body["panel"]["view"]["path"], "/pets/{id}");

    let body: Value = app
        .server
        .put(&format!("/api/sessions/{}/tab", id))
        .json(&json!({"tab": "security"}))
        .await
        .json();
    assert_eq!(body["panel"]["tab"], "security");
    assert!(body["panel"]["security"].as_str().unwrap().contains("api_key"));
}

#[tokio::test]
async fn test_select_unknown_endpoint_clears_selection() {
    let app = TestApp::new(explorer_document()).await;
    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();

    let response = app
        .server
        .put(&format!("/api/sessions/{}/selection", id))
        .json(&json!({"id": 99}))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert!(body["selected"].is_null());
    assert!(body["panel"].is_null());
    assert_eq!(body["notice"], "Select an API from the sidebar to see its details");
}

#[tokio::test]
async fn test_state_persists_between_requests() {
    let app = TestApp::new(explorer_document()).await;
    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();

    app.server
        .put(&format!("/api/sessions/{}/selection", id))
        .json(&json!({"id": 2}))
        .await
        .assert_status(StatusCode::OK);
    app.server
        .put(&format!("/api/sessions/{}/query", id))
        .json(&json!({"query": "users"}))
        .await
        .assert_status(StatusCode::OK);

    let body: Value = app.server.get(&format!("/api/sessions/{}", id)).await.json();
    assert_eq!(body["query"], "users");
    assert_eq!(body["selected"]["id"], 2);
    assert_eq!(visible_names(&body), vec!["List users"]);
}

#[tokio::test]
async fn test_unknown_session() {
    let app = TestApp::new(explorer_document()).await;

    let response = app
        .server
        .get("/api/sessions/00000000-0000-0000-0000-000000000000")
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_session() {
    let app = TestApp::new(explorer_document()).await;
    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();

    let health: Value = app.server.get("/health").await.json();
    assert_eq!(health["sessions"], 1);

    app.server
        .delete(&format!("/api/sessions/{}", id))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let health: Value = app.server.get("/health").await.json();
    assert_eq!(health["sessions"], 0);

    app.server
        .get(&format!("/api/sessions/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    app.server
        .delete(&format!("/api/sessions/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reload_recomputes_default_selection() {
    let loader = Arc::new(SwappableLoader::new(explorer_document()));
    let app = TestApp::unloaded(loader.clone());
    app.state.reload().await.unwrap();

    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();
    assert_eq!(session["selected"]["name"], "Create user");

    loader.swap(tscore_document());
    app.server
        .post("/api/catalog/reload")
        .await
        .assert_status(StatusCode::OK);

    let body: Value = app.server.get(&format!("/api/sessions/{}", id)).await.json();
    assert_eq!(body["selected"]["name"], "tScore");
    assert_eq!(visible_names(&body), vec!["tScore"]);
}

#[tokio::test]
async fn test_reload_drops_vanished_selection() {
    let loader = Arc::new(SwappableLoader::new(explorer_document()));
    let app = TestApp::unloaded(loader.clone());
    app.state.reload().await.unwrap();

    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();
    app.server
        .put(&format!("/api/sessions/{}/selection", id))
        .json(&json!({"id": 4}))
        .await
        .assert_status(StatusCode::OK);

    loader.swap(tscore_document());
    app.state.reload().await.unwrap();

    let body: Value = app.server.get(&format!("/api/sessions/{}", id)).await.json();
    assert!(body["selected"].is_null());
}

#[tokio::test]
async fn test_reload_keeps_surviving_selection() {
    let loader = Arc::new(SwappableLoader::new(explorer_document()));
    let app = TestApp::unloaded(loader.clone());
    app.state.reload().await.unwrap();

    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();
    app.server
        .put(&format!("/api/sessions/{}/selection", id))
        .json(&json!({"id": 1}))
        .await
        .assert_status(StatusCode::OK);

    loader.swap(tscore_document());
    app.state.reload().await.unwrap();

    let body: Value = app.server.get(&format!("/api/sessions/{}", id)).await.json();
    assert_eq!(body["selected"]["id"], 1);
    assert_eq!(body["selected"]["name"], "tScore");
}

#[tokio::test]
async fn test_concurrent_updates_are_all_kept() {
    let app = app_with_store(Arc::new(SlowSessionStore {
        inner: InMemorySessionStore::default(),
        delay: Duration::from_millis(50),
    }))
    .await;
    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();

    let query_path = format!("/api/sessions/{}/query", id);
    let sort_path = format!("/api/sessions/{}/sort", id);
    let tab_path = format!("/api/sessions/{}/tab", id);
    let get_path = format!("/api/sessions/{}", id);

    let (query, sort, tab, read) = tokio::join!(
        app.server
            .put(&query_path)
            .json(&json!({"query": "user"}))
            .into_future(),
        app.server
            .put(&sort_path)
            .json(&json!({"sort": "name_descending"}))
            .into_future(),
        app.server
            .put(&tab_path)
            .json(&json!({"tab": "security"}))
            .into_future(),
        app.server.get(&get_path).into_future(),
    );
    query.assert_status(StatusCode::OK);
    sort.assert_status(StatusCode::OK);
    tab.assert_status(StatusCode::OK);
    read.assert_status(StatusCode::OK);

    let body: Value = app.server.get(&get_path).await.json();
    assert_eq!(body["query"], "user");
    assert_eq!(body["sort"], "name_descending");
    assert_eq!(body["tab"], "security");
    assert_eq!(visible_names(&body), vec!["List users", "Create user"]);
}

#[tokio::test]
async fn test_idle_session_expires() {
    let app = app_with_store(Arc::new(InMemorySessionStore::new(Duration::from_millis(30)))).await;
    let session = create_session(&app, json!({})).await;
    let id = session["id"].as_str().unwrap();

    tokio::time::sleep(Duration::from_millis(80)).await;

    app.server
        .get(&format!("/api/sessions/{}", id))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let health: Value = app.server.get("/health").await.json();
    assert_eq!(health["sessions"], 0);
}
