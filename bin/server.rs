// Telco Catalog - Web Server
// Thin request layer over the core: parses parameters, maps error kinds to
// status codes, and delegates everything else to the library.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use telco_catalog::{
    analytics, query, AnalyticsFilter, Business, BusinessQuery, BusinessUpdate, Catalog,
    CatalogError, Generator, GeneratorConfig, NewBusiness, NewService, Service, ServiceQuery,
    ServiceUpdate,
};

/// Shared application state
#[derive(Clone)]
struct AppState {
    catalog: Catalog,
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(err: CatalogError) -> ApiError {
    let status = match &err {
        CatalogError::NotFound { .. } => StatusCode::NOT_FOUND,
        CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
        CatalogError::Conflict { .. } => StatusCode::CONFLICT,
        CatalogError::Configuration(_) => StatusCode::BAD_REQUEST,
        CatalogError::Csv(_) | CatalogError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorBody {
            detail: err.to_string(),
        }),
    )
}

/// Pagination envelope matching the classic list-endpoint shape
#[derive(Serialize)]
struct PageEnvelope<T> {
    items: Vec<T>,
    total: usize,
    page: usize,
    size: usize,
    pages: usize,
}

impl<T> PageEnvelope<T> {
    fn new(items: Vec<T>, total: usize, skip: i64, limit: i64) -> Self {
        let size = limit.max(1) as usize;
        PageEnvelope {
            items,
            total,
            page: (skip.max(0) as usize) / size + 1,
            size,
            pages: total.div_ceil(size),
        }
    }
}

// ============================================================================
// Parameter types
// ============================================================================

fn default_limit() -> i64 {
    100
}

#[derive(Deserialize)]
struct BusinessListParams {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    search: Option<String>,
    industry: Option<String>,
    province: Option<String>,
    city: Option<String>,
    account_status: Option<String>,
}

impl BusinessListParams {
    fn into_query(self) -> Result<BusinessQuery, ApiError> {
        Ok(BusinessQuery {
            industry: self
                .industry
                .map(|s| s.parse())
                .transpose()
                .map_err(api_error)?,
            province: self.province,
            city: self.city,
            account_status: self
                .account_status
                .map(|s| s.parse())
                .transpose()
                .map_err(api_error)?,
            search: self.search,
            skip: self.skip,
            limit: self.limit,
        })
    }
}

#[derive(Deserialize)]
struct ServiceListParams {
    #[serde(default)]
    skip: i64,
    #[serde(default = "default_limit")]
    limit: i64,
    service_type: Option<String>,
    status: Option<String>,
    business_id: Option<String>,
}

impl ServiceListParams {
    fn into_query(self) -> Result<ServiceQuery, ApiError> {
        Ok(ServiceQuery {
            service_type: self
                .service_type
                .map(|s| s.parse())
                .transpose()
                .map_err(api_error)?,
            status: self
                .status
                .map(|s| s.parse())
                .transpose()
                .map_err(api_error)?,
            business_id: self.business_id,
            skip: self.skip,
            limit: self.limit,
        })
    }
}

#[derive(Deserialize)]
struct AnalyticsParams {
    industry: Option<String>,
    province: Option<String>,
    city: Option<String>,
    account_status: Option<String>,
}

impl AnalyticsParams {
    fn into_filter(self) -> Result<AnalyticsFilter, ApiError> {
        Ok(AnalyticsFilter {
            industry: self
                .industry
                .map(|s| s.parse())
                .transpose()
                .map_err(api_error)?,
            province: self.province,
            city: self.city,
            account_status: self
                .account_status
                .map(|s| s.parse())
                .transpose()
                .map_err(api_error)?,
        })
    }
}

#[derive(Deserialize)]
struct CityParams {
    province: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy", "service": "telco-catalog" }))
}

async fn list_businesses(
    State(state): State<AppState>,
    Query(params): Query<BusinessListParams>,
) -> Result<Json<PageEnvelope<Business>>, ApiError> {
    let q = params.into_query()?;
    let page = query::businesses(&state.catalog, &q).map_err(api_error)?;
    Ok(Json(PageEnvelope::new(page.items, page.total, q.skip, q.limit)))
}

async fn get_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Business>, ApiError> {
    state.catalog.get_business(&id).map(Json).map_err(api_error)
}

async fn create_business(
    State(state): State<AppState>,
    Json(new): Json<NewBusiness>,
) -> Result<(StatusCode, Json<Business>), ApiError> {
    let business = state.catalog.create_business(new).map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(business)))
}

async fn update_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<BusinessUpdate>,
) -> Result<Json<Business>, ApiError> {
    state
        .catalog
        .update_business(&id, update)
        .map(Json)
        .map_err(api_error)
}

async fn delete_business(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.catalog.delete_business(&id).map_err(api_error)?;
    Ok(Json(serde_json::json!({ "message": "business deleted" })))
}

async fn list_business_services(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Service>>, ApiError> {
    // 404 for an unknown business; the catalog itself answers with an
    // empty list, so the existence check lives here
    state.catalog.get_business(&id).map_err(api_error)?;
    Ok(Json(state.catalog.services_for_business(&id)))
}

async fn create_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(new): Json<NewService>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    let service = state.catalog.create_service(&id, new).map_err(api_error)?;
    Ok((StatusCode::CREATED, Json(service)))
}

async fn list_services(
    State(state): State<AppState>,
    Query(params): Query<ServiceListParams>,
) -> Result<Json<PageEnvelope<Service>>, ApiError> {
    let q = params.into_query()?;
    let page = query::services(&state.catalog, &q).map_err(api_error)?;
    Ok(Json(PageEnvelope::new(page.items, page.total, q.skip, q.limit)))
}

async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Service>, ApiError> {
    state.catalog.get_service(id).map(Json).map_err(api_error)
}

async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(update): Json<ServiceUpdate>,
) -> Result<Json<Service>, ApiError> {
    state
        .catalog
        .update_service(id, update)
        .map(Json)
        .map_err(api_error)
}

async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.catalog.delete_service(id).map_err(api_error)?;
    Ok(Json(serde_json::json!({ "message": "service deleted" })))
}

async fn revenue_analytics(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<telco_catalog::RevenueSummary>, ApiError> {
    let filter = params.into_filter()?;
    Ok(Json(analytics::revenue_summary(&state.catalog, Some(&filter))))
}

async fn customer_analytics(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<telco_catalog::CustomerSummary>, ApiError> {
    let filter = params.into_filter()?;
    Ok(Json(analytics::customer_summary(&state.catalog, Some(&filter))))
}

async fn analytics_summary(
    State(state): State<AppState>,
    Query(params): Query<AnalyticsParams>,
) -> Result<Json<telco_catalog::CombinedSummary>, ApiError> {
    let filter = params.into_filter()?;
    Ok(Json(analytics::combined_summary(&state.catalog, Some(&filter))))
}

async fn list_industries() -> Json<Vec<&'static str>> {
    Json(telco_catalog::reference::industries())
}

async fn list_provinces() -> Json<Vec<&'static str>> {
    Json(telco_catalog::reference::provinces())
}

async fn list_cities(Query(params): Query<CityParams>) -> Json<Vec<&'static str>> {
    Json(telco_catalog::reference::cities(params.province.as_deref()))
}

async fn list_service_types() -> Json<Vec<&'static str>> {
    Json(telco_catalog::reference::service_types())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() {
    println!("🌐 Telco Catalog - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    // Seed the catalog at startup; size and seed come from the environment
    let count: usize = std::env::var("TELCO_DATASET")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(500);
    let seed: Option<u64> = std::env::var("TELCO_SEED")
        .ok()
        .and_then(|v| v.parse().ok());

    let catalog = Catalog::new();
    if count > 0 {
        let generator = Generator::new(GeneratorConfig::default());
        let dataset = generator
            .generate(count, seed)
            .expect("dataset generation failed");
        catalog.load(dataset).expect("dataset load failed");
    }
    let (businesses, services) = catalog.counts();
    println!("✓ Catalog seeded: {} businesses, {} services", businesses, services);

    let state = AppState { catalog };

    let api_routes = Router::new()
        .route("/businesses", get(list_businesses).post(create_business))
        .route(
            "/businesses/:id",
            get(get_business).put(update_business).delete(delete_business),
        )
        .route(
            "/businesses/:id/services",
            get(list_business_services).post(create_service),
        )
        .route("/services", get(list_services))
        .route(
            "/services/:id",
            get(get_service).put(update_service).delete(delete_service),
        )
        .route("/analytics/revenue", get(revenue_analytics))
        .route("/analytics/customers", get(customer_analytics))
        .route("/analytics/summary", get(analytics_summary))
        .route("/industries", get(list_industries))
        .route("/provinces", get(list_provinces))
        .route("/cities", get(list_cities))
        .route("/service-types", get(list_service_types))
        .with_state(state);

    let app = Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes)
        .layer(CorsLayer::permissive());

    let addr = "0.0.0.0:8000";
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    println!("\n🚀 Server running on http://localhost:8000");
    println!("   Try: http://localhost:8000/api/v1/businesses");
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app)
        .await
        .expect("Failed to start server");
}
