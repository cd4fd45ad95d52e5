use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::{loader_for_source, Catalog, DocumentLoader};
use crate::sessions::{InMemorySessionStore, SessionStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Where the specification document comes from
    pub loader: Arc<dyn DocumentLoader>,
    /// The catalog currently being served
    pub catalog: CatalogSlot,
    /// Explorer sessions
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Create a new AppState with the loader the config points at.
    /// Nothing is loaded yet; call `reload` to fill the catalog.
    pub fn new(config: Config) -> Result<Self, AppStateError> {
        let loader = loader_for_source(&config.spec_source, config.fetch_timeout())
            .map_err(|e| AppStateError::Loader(e.to_string()))?;

        Ok(Self::with_loader(config, loader))
    }

    /// Create AppState with a custom loader (for embedding and testing)
    pub fn with_loader(config: Config, loader: Arc<dyn DocumentLoader>) -> Self {
        let sessions = Arc::new(InMemorySessionStore::new(config.session_idle_timeout()));

        Self {
            config,
            loader,
            catalog: CatalogSlot::new(),
            sessions,
        }
    }

    /// Load the document, normalize it and swap the new catalog in.
    ///
    /// Overlapping reloads resolve by request order: a load that was started
    /// before the currently applied one is discarded when it finishes, and its
    /// caller gets whatever the slot serves at that point.
    pub async fn reload(&self) -> AppResult<Arc<Catalog>> {
        let ticket = self.catalog.begin().await;
        let source = self.loader.describe();
        tracing::info!(source = %source, ticket, "Loading specification document");

        let result = match self.loader.load().await {
            Ok(doc) => Catalog::from_document(&doc).map(Arc::new),
            Err(e) => Err(e),
        };

        let outcome = match &result {
            Ok(catalog) => Ok(catalog.clone()),
            Err(e) => Err(e.to_string()),
        };

        if !self.catalog.finish(ticket, outcome).await {
            // A newer load already decided what is served
            tracing::debug!(ticket, "Discarding result of a superseded load");
            return self.catalog.catalog().await;
        }

        match &result {
            Ok(catalog) => tracing::info!(
                source = %source,
                endpoints = catalog.len(),
                "Catalog loaded"
            ),
            Err(e) => tracing::warn!(source = %source, error = %e, "Catalog load failed"),
        }

        result
    }
}

/// Lifecycle of the served catalog.
#[derive(Debug, Clone)]
pub enum LoadState {
    Loading,
    Loaded(Arc<Catalog>),
    Failed(String),
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Loaded(_) => "loaded",
            Self::Failed(_) => "failed",
        }
    }
}

/// Point-in-time summary of the catalog slot.
#[derive(Debug, Clone)]
pub struct CatalogStatus {
    pub state: LoadState,
    pub last_error: Option<String>,
    pub loaded_at: Option<OffsetDateTime>,
}

struct SlotInner {
    state: LoadState,
    last_error: Option<String>,
    loaded_at: Option<OffsetDateTime>,
    applied: u64,
}

/// Holds the served catalog. A new catalog replaces the old one in a single
/// write, so readers see either the old or the new catalog, never a mix.
#[derive(Clone)]
pub struct CatalogSlot {
    inner: Arc<RwLock<SlotInner>>,
    requested: Arc<AtomicU64>,
}

impl CatalogSlot {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(SlotInner {
                state: LoadState::Loading,
                last_error: None,
                loaded_at: None,
                applied: 0,
            })),
            requested: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Take a ticket for a new load. A slot without a catalog goes back to
    /// `Loading`; a loaded slot keeps serving until the load finishes.
    pub async fn begin(&self) -> u64 {
        let ticket = self.requested.fetch_add(1, Ordering::SeqCst) + 1;
        let mut inner = self.inner.write().await;
        if matches!(inner.state, LoadState::Failed(_)) {
            inner.state = LoadState::Loading;
        }
        ticket
    }

    /// Apply the outcome of the load holding `ticket`. Returns `false` when a
    /// newer load has already been applied and this outcome was dropped.
    ///
    /// A failure after a successful load keeps the previous catalog and only
    /// records the error.
    pub async fn finish(&self, ticket: u64, outcome: Result<Arc<Catalog>, String>) -> bool {
        let mut inner = self.inner.write().await;
        if ticket < inner.applied {
            return false;
        }
        inner.applied = ticket;

        match outcome {
            Ok(catalog) => {
                inner.state = LoadState::Loaded(catalog);
                inner.last_error = None;
                inner.loaded_at = Some(OffsetDateTime::now_utc());
            }
            Err(message) => {
                if !matches!(inner.state, LoadState::Loaded(_)) {
                    inner.state = LoadState::Failed(message.clone());
                }
                inner.last_error = Some(message);
            }
        }
        true
    }

    pub async fn state(&self) -> LoadState {
        self.inner.read().await.state.clone()
    }

    pub async fn status(&self) -> CatalogStatus {
        let inner = self.inner.read().await;
        CatalogStatus {
            state: inner.state.clone(),
            last_error: inner.last_error.clone(),
            loaded_at: inner.loaded_at,
        }
    }

    /// The loaded catalog, or `CatalogUnavailable` while loading or failed.
    pub async fn catalog(&self) -> AppResult<Arc<Catalog>> {
        match self.state().await {
            LoadState::Loaded(catalog) => Ok(catalog),
            LoadState::Loading => Err(AppError::CatalogUnavailable(
                "catalog is still loading".to_string(),
            )),
            LoadState::Failed(message) => Err(AppError::CatalogUnavailable(format!(
                "last load failed: {}",
                message
            ))),
        }
    }
}

impl Default for CatalogSlot {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("Document loader error: {0}")]
    Loader(String),
}
