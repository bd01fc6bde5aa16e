//! Vehicle recommendation endpoints
//!
//! - POST /api/ai/recommendations/vehicles
//! - POST /api/ai/recommendations/demand-prediction
//! - POST /api/ai/recommendations/similar-vehicles

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::services::recommendation_engine::{
    DemandForecast, Preferences, ScoredVehicle, SimilarVehicle, Vehicle,
};
use crate::{ApiError, ApiResult, AppState};

/// Recommendation request body
///
/// ```json
/// {
///   "user_id": "user123",
///   "preferences": {
///     "preferred_type": "EV",
///     "seats": 4,
///     "max_price_per_hour": 30,
///     "eco_friendly": true
///   },
///   "vehicles": [...],
///   "top_n": 5
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    #[serde(default)]
    pub user_id: Option<Value>,
    /// Echoed back verbatim; parsed into `Preferences` for scoring
    #[serde(default)]
    pub preferences: Map<String, Value>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_top_n() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub user_id: Option<Value>,
    pub total_vehicles_analyzed: usize,
    pub recommendations: Vec<ScoredVehicle>,
    pub preferences_used: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct DemandRequest {
    #[serde(default = "default_hour")]
    pub hour: u32,
    /// 0 = Monday … 6 = Sunday
    #[serde(default = "default_day_of_week")]
    pub day_of_week: u32,
}

fn default_hour() -> u32 {
    12
}

fn default_day_of_week() -> u32 {
    3
}

#[derive(Debug, Deserialize)]
pub struct SimilarRequest {
    pub vehicle: Option<Vehicle>,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default = "default_similar_top_n")]
    pub top_n: usize,
}

fn default_similar_top_n() -> usize {
    3
}

#[derive(Debug, Serialize)]
pub struct SimilarResponse {
    pub target_vehicle_id: Option<Value>,
    pub similar_vehicles: Vec<SimilarVehicle>,
}

/// POST /api/ai/recommendations/vehicles
pub async fn recommend_vehicles(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationRequest>, JsonRejection>,
) -> ApiResult<Json<RecommendationResponse>> {
    let Json(request) = payload?;

    if request.vehicles.is_empty() {
        return Err(ApiError::BadRequest("No vehicles provided".to_string()));
    }

    let preferences: Preferences =
        serde_json::from_value(Value::Object(request.preferences.clone()))
            .map_err(|e| ApiError::BadRequest(format!("Invalid preferences: {}", e)))?;

    let recommendations = state.recommendation_engine.recommend(
        &request.vehicles,
        &preferences,
        request.top_n,
    )?;

    info!(
        "Recommended {} of {} vehicles",
        recommendations.len(),
        request.vehicles.len()
    );

    Ok(Json(RecommendationResponse {
        user_id: request.user_id,
        total_vehicles_analyzed: request.vehicles.len(),
        recommendations,
        preferences_used: request.preferences,
    }))
}

/// POST /api/ai/recommendations/demand-prediction
pub async fn predict_demand(
    State(state): State<AppState>,
    payload: Result<Json<DemandRequest>, JsonRejection>,
) -> ApiResult<Json<DemandForecast>> {
    let Json(request) = payload?;

    let forecast = state
        .recommendation_engine
        .predict_demand(request.hour, request.day_of_week)?;

    Ok(Json(forecast))
}

/// POST /api/ai/recommendations/similar-vehicles
pub async fn find_similar_vehicles(
    State(state): State<AppState>,
    payload: Result<Json<SimilarRequest>, JsonRejection>,
) -> ApiResult<Json<SimilarResponse>> {
    let Json(request) = payload?;

    let target = request
        .vehicle
        .ok_or_else(|| ApiError::BadRequest("Target vehicle is required".to_string()))?;

    let similar_vehicles =
        state
            .recommendation_engine
            .find_similar(&target, &request.vehicles, request.top_n);

    Ok(Json(SimilarResponse {
        target_vehicle_id: target.id,
        similar_vehicles,
    }))
}

/// Build vehicle recommendation routes
pub fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ai/recommendations/vehicles", post(recommend_vehicles))
        .route(
            "/api/ai/recommendations/demand-prediction",
            post(predict_demand),
        )
        .route(
            "/api/ai/recommendations/similar-vehicles",
            post(find_similar_vehicles),
        )
}
