use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::error::{AppError, AppResult};

/// Source of the raw specification document.
///
/// A loader only fetches and parses; it never normalizes. Errors are
/// reported as `AppError::LoadFailed`.
#[async_trait]
pub trait DocumentLoader: Send + Sync {
    /// Fetch and parse the whole document
    async fn load(&self) -> AppResult<Value>;

    /// Where the document comes from, for status output and logs
    fn describe(&self) -> String;
}

/// Pick a loader for a configured source: http(s) URLs are fetched, anything
/// else is read from the filesystem.
pub fn loader_for_source(source: &str, timeout: Duration) -> AppResult<Arc<dyn DocumentLoader>> {
    if source.starts_with("http://") || source.starts_with("https://") {
        Ok(Arc::new(HttpLoader::new(source, timeout)?))
    } else {
        Ok(Arc::new(FileLoader::new(source)))
    }
}

/// Reads the document from a local JSON file.
#[derive(Debug, Clone)]
pub struct FileLoader {
    path: PathBuf,
}

impl FileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentLoader for FileLoader {
    async fn load(&self) -> AppResult<Value> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::LoadFailed(format!("{}: {}", self.path.display(), e)))?;
        Ok(serde_json::from_str(&text)?)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Fetches the document over HTTP.
#[derive(Debug, Clone)]
pub struct HttpLoader {
    client: Client,
    url: String,
}

impl HttpLoader {
    pub fn new(url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl DocumentLoader for HttpLoader {
    async fn load(&self) -> AppResult<Value> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::LoadFailed(format!(
                "{} responded with {}",
                self.url, status
            )));
        }

        // Parse from text so object key order follows the document
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Serves a document already in memory. Used when embedding the explorer and
/// in tests.
#[derive(Debug, Clone)]
pub struct StaticLoader {
    document: Option<Value>,
}

impl StaticLoader {
    pub fn new(document: Value) -> Self {
        Self {
            document: Some(document),
        }
    }

    /// A loader whose every load fails.
    pub fn failing() -> Self {
        Self { document: None }
    }
}

#[async_trait]
impl DocumentLoader for StaticLoader {
    async fn load(&self) -> AppResult<Value> {
        self.document
            .clone()
            .ok_or_else(|| AppError::LoadFailed("no document available".to_string()))
    }

    fn describe(&self) -> String {
        "in-memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_file_loader_preserves_key_order() {
        let path = std::env::temp_dir().join(format!("spec-explorer-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, r#"{"paths": {"/z": {"get": {}}, "/a": {"get": {}}}}"#)
            .await
            .unwrap();

        let doc = FileLoader::new(&path).load().await.unwrap();
        let keys: Vec<&String> = doc["paths"].as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["/z", "/a"]);

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_file_loader_missing_file() {
        let err = FileLoader::new("/definitely/not/here.json")
            .load()
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::LoadFailed(_)));
    }

    #[tokio::test]
    async fn test_file_loader_invalid_json() {
        let path = std::env::temp_dir().join(format!("spec-explorer-{}.json", uuid::Uuid::new_v4()));
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let err = FileLoader::new(&path).load().await.unwrap_err();
        assert!(matches!(err, AppError::LoadFailed(_)));

        tokio::fs::remove_file(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_static_loader() {
        let doc = StaticLoader::new(json!({"paths": {}})).load().await.unwrap();
        assert_eq!(doc, json!({"paths": {}}));

        assert!(StaticLoader::failing().load().await.is_err());
    }

    #[test]
    fn test_loader_for_source() {
        let timeout = Duration::from_secs(1);

        let http = loader_for_source("https://example.com/openapi.json", timeout).unwrap();
        assert_eq!(http.describe(), "https://example.com/openapi.json");

        let file = loader_for_source("data/openapi.json", timeout).unwrap();
        assert_eq!(file.describe(), "data/openapi.json");
    }
}
