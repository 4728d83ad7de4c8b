// South African Public Reference Data - Web Server
// Read-only REST API over the loaded datasets

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use za_public_data::{
    catalog, export_dataset, Constraints, DatasetConfig, EntityKind, ExportError, ExportFormat,
    FilterResult, ReferenceDataset, VERSION,
};

const BIND_ADDR_ENV: &str = "ZA_BIND_ADDR";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Shared application state
#[derive(Clone)]
struct AppState {
    dataset: Arc<ReferenceDataset>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    records: usize,
    complete: bool,
}

#[derive(Deserialize)]
struct DownloadParams {
    format: Option<String>,
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(ApiResponse::<()>::error(message))).into_response()
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let records: usize = state.dataset.counts().iter().map(|(_, n)| n).sum();

    Json(ApiResponse::ok(HealthResponse {
        status: "OK",
        version: VERSION,
        records,
        complete: state.dataset.report().is_complete(),
    }))
}

/// GET /api/catalog - Dataset metadata
async fn get_catalog(State(state): State<AppState>) -> Response {
    match catalog(&state.dataset) {
        Ok(datasets) => (StatusCode::OK, Json(ApiResponse::ok(datasets))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "catalog failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /api/:kind?field=value&search=term - Filtered collection
async fn query_kind(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let Ok(kind) = kind.parse::<EntityKind>() else {
        let result = FilterResult::<()>::failure(format!("Unknown dataset: {}", kind));
        return (StatusCode::NOT_FOUND, Json(result)).into_response();
    };

    let constraints = Constraints::from_params(&params);
    let result = state.dataset.query(kind, &constraints);

    let status = if result.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(result)).into_response()
}

/// GET /api/:kind/:code - Single record by code
async fn get_record(
    State(state): State<AppState>,
    Path((kind, code)): Path<(String, String)>,
) -> Response {
    let Ok(kind) = kind.parse::<EntityKind>() else {
        return not_found(format!("Unknown dataset: {}", kind));
    };

    match state.dataset.lookup_code(kind, &code) {
        Some(record) => (StatusCode::OK, Json(ApiResponse::ok(record))).into_response(),
        None => not_found(format!("No {} with code {}", kind.label().to_lowercase(), code)),
    }
}

/// GET /api/download/:key?format=json|csv - Dataset file
async fn download(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let format = match params.format.as_deref().map(str::parse::<ExportFormat>) {
        None => ExportFormat::Json,
        Some(Ok(format)) => format,
        Some(Err(e)) => {
            return (StatusCode::BAD_REQUEST, Json(ApiResponse::<()>::error(e.to_string()))).into_response();
        }
    };

    match export_dataset(&state.dataset, &key, format) {
        Ok(body) => {
            let disposition = format!("attachment; filename=\"{}.{}\"", key, format.extension());
            (
                [
                    (header::CONTENT_TYPE, format.content_type().to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                body,
            )
                .into_response()
        }
        Err(e @ ExportError::UnknownDataset(_)) => not_found(e.to_string()),
        Err(e) => {
            tracing::error!(dataset = %key, error = %e, "download failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error(e.to_string())),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    tracing::info!(version = VERSION, "Starting reference data server");

    let config = DatasetConfig::from_env();
    let dataset = ReferenceDataset::load(&config);
    tracing::info!("{}", dataset.report().summary());

    let state = AppState {
        dataset: Arc::new(dataset),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/catalog", get(get_catalog))
        .route("/download/:key", get(download))
        .route("/:kind", get(query_kind))
        .route("/:kind/:code", get(get_record))
        .with_state(state);

    let app = Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = std::env::var(BIND_ADDR_ENV).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(%addr, "Server running");

    axum::serve(listener, app).await?;
    Ok(())
}
