use std::ops::Deref;
use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::services::Catalog;
use crate::state::AppState;

/// Catalog snapshot taken when the request came in
#[derive(Debug, Clone)]
pub struct LoadedCatalog(pub Arc<Catalog>);

impl Deref for LoadedCatalog {
    type Target = Catalog;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Extractor for LoadedCatalog - can be used directly in handlers
/// Example: `async fn handler(catalog: LoadedCatalog) -> ... { }`
impl<S> FromRequestParts<S> for LoadedCatalog
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<LoadedCatalog>()
            .cloned()
            .ok_or_else(|| AppError::CatalogUnavailable("catalog is not loaded".to_string()))
    }
}

/// Catalog middleware - rejects requests while no catalog is loaded and
/// injects the current snapshot into request extensions
pub async fn catalog_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let catalog = state.catalog.catalog().await?;

    // Insert the snapshot so the whole request sees one catalog
    request.extensions_mut().insert(LoadedCatalog(catalog));

    // Continue to handler
    Ok(next.run(request).await)
}
