//! Route optimization endpoints
//!
//! - POST /api/ai/routes/optimize
//! - POST /api/ai/routes/estimate

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::services::route_optimizer::{OptimizedRoute, TripEstimate, Waypoint};
use crate::{ApiError, ApiResult, AppState};

const MISSING_ENDPOINTS: &str = "Start and end locations are required";

/// Route request body
///
/// ```json
/// {
///   "start": {"lat": 40.7128, "lng": -74.0060, "name": "Start Location"},
///   "end": {"lat": 40.7589, "lng": -73.9851, "name": "End Location"},
///   "waypoints": [{"lat": 40.7484, "lng": -73.9857, "name": "Waypoint"}],
///   "traffic_level": "medium",
///   "vehicle_type": "EV"
/// }
/// ```
#[derive(Debug, Deserialize)]
pub struct RouteRequest {
    /// Kept raw so an empty or partial object reads as missing
    #[serde(default)]
    pub start: Option<Value>,
    #[serde(default)]
    pub end: Option<Value>,
    #[serde(default)]
    pub waypoints: Vec<Waypoint>,
    #[serde(default = "default_traffic_level")]
    pub traffic_level: String,
    #[serde(default = "default_vehicle_type")]
    pub vehicle_type: String,
}

fn default_traffic_level() -> String {
    "medium".to_string()
}

fn default_vehicle_type() -> String {
    "EV".to_string()
}

impl RouteRequest {
    fn endpoints(&self) -> ApiResult<(Waypoint, Waypoint)> {
        match (parse_stop(self.start.as_ref())?, parse_stop(self.end.as_ref())?) {
            (Some(start), Some(end)) => Ok((start, end)),
            _ => Err(ApiError::BadRequest(MISSING_ENDPOINTS.to_string())),
        }
    }
}

/// `None` for an absent stop: missing, `null`, or an object without both coordinates
fn parse_stop(value: Option<&Value>) -> ApiResult<Option<Waypoint>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(fields)) if !(fields.contains_key("lat") && fields.contains_key("lng")) => {
            Ok(None)
        }
        Some(stop @ Value::Object(_)) => serde_json::from_value(stop.clone())
            .map(Some)
            .map_err(|e| ApiError::BadRequest(format!("Invalid location: {}", e))),
        Some(other) => Err(ApiError::BadRequest(format!(
            "Location must be an object, got {}",
            other
        ))),
    }
}

/// POST /api/ai/routes/optimize
pub async fn optimize_route(
    State(state): State<AppState>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> ApiResult<Json<OptimizedRoute>> {
    let Json(request) = payload?;
    let (start, end) = request.endpoints()?;

    let result = state.route_optimizer.optimize(
        &start,
        &end,
        &request.waypoints,
        &request.traffic_level,
        &request.vehicle_type,
    )?;

    info!(
        "Route optimized: {} segments, {} km",
        result.route.len(),
        result.summary.total_distance_km
    );

    Ok(Json(result))
}

/// POST /api/ai/routes/estimate
///
/// Quick single-leg estimate; waypoints are ignored.
pub async fn estimate_trip(
    State(state): State<AppState>,
    payload: Result<Json<RouteRequest>, JsonRejection>,
) -> ApiResult<Json<TripEstimate>> {
    let Json(request) = payload?;
    let (start, end) = request.endpoints()?;

    let estimate = state.route_optimizer.estimate(
        &start,
        &end,
        &request.traffic_level,
        &request.vehicle_type,
    )?;

    Ok(Json(estimate))
}

/// Build route optimization routes
pub fn route_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ai/routes/optimize", post(optimize_route))
        .route("/api/ai/routes/estimate", post(estimate_trip))
}
