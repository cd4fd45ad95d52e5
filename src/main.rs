use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use spec_explorer::config::{Config, LogFormat};
use spec_explorer::handlers::{
    CatalogStatusResponse, CreateSessionRequest, DetailPanel, EndpointListResponse,
    EndpointResponse, EndpointSummaryResponse, HealthResponse, RenderSchemaRequest,
    SelectEndpointRequest, SessionResponse, UpdateQueryRequest, UpdateSortRequest,
    UpdateTabRequest,
};
use spec_explorer::models::{
    EndpointView, MediaSchemaView, ParameterRow, ParameterTable, PropertyRow, RenderedSchema,
    RequestBodyView, ResponseView,
};
use spec_explorer::services::{DetailTab, SortKey};
use spec_explorer::state::AppState;
use spec_explorer::{build_router, handlers};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,
        handlers::catalog::get_catalog_status,
        handlers::catalog::reload_catalog,
        handlers::catalog::list_endpoints,
        handlers::catalog::get_endpoint,
        handlers::catalog::get_endpoint_view,
        handlers::session::create_session,
        handlers::session::get_session,
        handlers::session::update_query,
        handlers::session::update_sort,
        handlers::session::select_endpoint,
        handlers::session::update_tab,
        handlers::session::delete_session,
        handlers::schema::render_schema,
    ),
    components(schemas(
        HealthResponse,
        CatalogStatusResponse,
        EndpointListResponse,
        EndpointSummaryResponse,
        EndpointResponse,
        EndpointView,
        ParameterTable,
        ParameterRow,
        RequestBodyView,
        ResponseView,
        MediaSchemaView,
        RenderedSchema,
        PropertyRow,
        SortKey,
        DetailTab,
        CreateSessionRequest,
        UpdateQueryRequest,
        UpdateSortRequest,
        SelectEndpointRequest,
        UpdateTabRequest,
        SessionResponse,
        DetailPanel,
        RenderSchemaRequest,
    )),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Catalog", description = "Catalog load status and reload"),
        (name = "Endpoints", description = "Browse, search and sort normalized endpoints"),
        (name = "Sessions", description = "Explorer sessions: query, sort, selection and detail tab"),
        (name = "Schema", description = "Schema rendering")
    )
)]
struct ApiDoc;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("spec_explorer=info,tower_http=info"));

    match format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);
    let addr = config.server_addr();

    // Initialize application state; the catalog loads in the background
    let state = AppState::new(config).context("Failed to initialize application state")?;
    tracing::info!(source = %state.loader.describe(), "Specification source configured");

    let loader_state = state.clone();
    tokio::spawn(async move {
        // Failures are recorded on the catalog slot and logged by reload
        let _ = loader_state.reload().await;
    });

    // Drop idle explorer sessions
    let sessions = state.sessions.clone();
    let sweep_every = state.config.session_idle_timeout().min(SWEEP_INTERVAL);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep_every.max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            match sessions.purge_idle().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "Dropped idle sessions"),
                Err(e) => tracing::warn!(error = %e, "Session sweep failed"),
            }
        }
    });

    // Build the main application router
    let app = build_router(state)
        // Add Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Server started on http://{}", addr);
    tracing::info!("Swagger UI: http://{}/swagger-ui/", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
