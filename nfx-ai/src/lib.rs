//! nfx-ai library - NeuroFleetX AI microservice
//!
//! Route optimization, maintenance prediction and vehicle recommendation
//! behind a JSON-over-HTTP API.

pub mod api;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use services::{MaintenancePredictor, RecommendationEngine, RouteOptimizer};

/// Module name reported by health and index endpoints
pub const SERVICE_NAME: &str = "NeuroFleetX AI Microservice";

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub route_optimizer: Arc<RouteOptimizer>,
    pub maintenance_predictor: Arc<MaintenancePredictor>,
    pub recommendation_engine: Arc<RecommendationEngine>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            route_optimizer: Arc::new(RouteOptimizer::new()),
            maintenance_predictor: Arc::new(MaintenancePredictor::new()),
            recommendation_engine: Arc::new(RecommendationEngine::new()),
            startup_time: Utc::now(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build application router
///
/// All routes are public and CORS-permissive. Unknown paths fall through to
/// a JSON 404.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::route_routes())
        .merge(api::maintenance_routes())
        .merge(api::recommendation_routes())
        .fallback(api::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
