pub mod catalog;
pub mod common;
pub mod health;
pub mod schema;
pub mod session;

pub use catalog::{
    get_catalog_status, get_endpoint, get_endpoint_view, list_endpoints, reload_catalog,
    CatalogStatusResponse, EndpointListResponse, EndpointResponse, EndpointSummaryResponse,
};
pub use common::ListParams;
pub use health::{health, HealthResponse};
pub use schema::{render_schema, RenderSchemaRequest};
pub use session::{
    create_session, delete_session, get_session, select_endpoint, update_query, update_sort,
    update_tab, CreateSessionRequest, DetailPanel, SelectEndpointRequest, SessionResponse,
    UpdateQueryRequest, UpdateSortRequest, UpdateTabRequest,
};
