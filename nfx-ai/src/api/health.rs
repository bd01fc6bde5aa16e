//! Service index, health check and 404 fallback

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::{ApiError, AppState, SERVICE_NAME};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct EndpointIndex {
    pub route_optimization: &'static str,
    pub route_estimate: &'static str,
    pub maintenance_prediction: &'static str,
    pub maintenance_batch_prediction: &'static str,
    pub maintenance_schedule: &'static str,
    pub vehicle_recommendations: &'static str,
    pub demand_prediction: &'static str,
    pub similar_vehicles: &'static str,
}

/// Service descriptor served at `/`
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub service: String,
    pub version: String,
    pub status: String,
    pub endpoints: EndpointIndex,
}

/// GET /
pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        status: "running".to_string(),
        endpoints: EndpointIndex {
            route_optimization: "/api/ai/routes/optimize",
            route_estimate: "/api/ai/routes/estimate",
            maintenance_prediction: "/api/ai/maintenance/predict",
            maintenance_batch_prediction: "/api/ai/maintenance/batch-predict",
            maintenance_schedule: "/api/ai/maintenance/schedule-optimization",
            vehicle_recommendations: "/api/ai/recommendations/vehicles",
            demand_prediction: "/api/ai/recommendations/demand-prediction",
            similar_vehicles: "/api/ai/recommendations/similar-vehicles",
        },
    })
}

/// GET /health
///
/// Health check endpoint for monitoring.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);

    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
    })
}

/// Fallback for unknown paths
pub async fn not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}

/// Build index and health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
}
