//! # API REST
//!
//! REST gateway for refrigeration diagnostics.
//!
//! Handles:
//! - serving the diagnostic type registry so forms can build their menus
//! - validating diagnose requests against the registry before they leave the process
//! - relaying valid requests to the external diagnose endpoint through a `DiagnoseClient`
//! - OpenAPI/Swagger documentation and CORS
//!
//! Uses `api-shared` for response types and `rackdiag-core` for the registry and client.

#![warn(rust_2018_idioms)]

use api_shared::{ErrorRes, HealthRes, HealthService, ListDiagnosticsRes};
use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use rackdiag_core::{
    schema, DiagError, DiagnoseClient, DiagnoseFailure, DiagnoseRequest, DiagnosisResult,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Application state shared across gateway handlers.
#[derive(Clone)]
pub struct AppState {
    client: Arc<dyn DiagnoseClient>,
    timeout: Duration,
}

impl AppState {
    /// `timeout` bounds each relayed call, independent of any client-level timeout.
    pub fn new(client: Arc<dyn DiagnoseClient>, timeout: Duration) -> Self {
        Self { client, timeout }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_diagnostics, diagnose),
    components(schemas(
        HealthRes,
        ListDiagnosticsRes,
        api_shared::DiagnosticTypeRes,
        api_shared::FieldSpecRes,
        ErrorRes,
        DiagnoseRequest,
        DiagnosisResult,
    ))
)]
struct ApiDoc;

type ApiError = (StatusCode, Json<ErrorRes>);

/// Build the gateway router with all routes, Swagger UI and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/diagnostics", get(list_diagnostics))
        .route("/api/diagnose", post(diagnose))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
#[axum::debug_handler]
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/diagnostics",
    responses(
        (status = 200, description = "Diagnostic types in menu order", body = ListDiagnosticsRes)
    )
)]
/// List every diagnostic type with its required fields and defaults.
#[axum::debug_handler]
async fn list_diagnostics(State(_state): State<AppState>) -> Json<ListDiagnosticsRes> {
    Json(ListDiagnosticsRes::from_registry())
}

#[utoipa::path(
    post,
    path = "/api/diagnose",
    request_body = DiagnoseRequest,
    responses(
        (status = 200, description = "Diagnosis from the upstream endpoint", body = DiagnosisResult),
        (status = 400, description = "Unknown diagnostic type or wrong field set", body = ErrorRes),
        (status = 502, description = "Upstream endpoint failed", body = ErrorRes),
        (status = 504, description = "Upstream endpoint timed out", body = ErrorRes)
    )
)]
/// Validate a diagnose request and relay it upstream.
///
/// # Errors
/// - `400 Bad Request` if the type is unknown or `inputs` is not exactly the type's field set.
/// - `502 Bad Gateway` if the upstream call fails or returns an undecodable body.
/// - `504 Gateway Timeout` if the upstream call exceeds the configured timeout.
#[axum::debug_handler]
async fn diagnose(
    State(state): State<AppState>,
    Json(req): Json<DiagnoseRequest>,
) -> Result<Json<DiagnosisResult>, ApiError> {
    let diagnostic_type = schema::find(&req.diagnostic_type).ok_or_else(|| {
        bad_request(DiagError::UnknownDiagnosticType(req.diagnostic_type.clone()))
    })?;
    schema::validate_inputs(diagnostic_type, &req.inputs).map_err(bad_request)?;

    let outcome = match tokio::time::timeout(state.timeout, state.client.diagnose(&req)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(DiagnoseFailure::Timeout(state.timeout)),
    };

    match outcome {
        Ok(result) => Ok(Json(result)),
        Err(failure) => {
            tracing::error!("Diagnose relay error: {:?}", failure);
            let status = match failure {
                DiagnoseFailure::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                _ => StatusCode::BAD_GATEWAY,
            };
            Err((status, Json(ErrorRes::new(failure))))
        }
    }
}

fn bad_request(error: DiagError) -> ApiError {
    tracing::warn!("Rejected diagnose request: {}", error);
    (StatusCode::BAD_REQUEST, Json(ErrorRes::new(error)))
}
