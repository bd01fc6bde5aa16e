//! Maintenance prediction endpoints
//!
//! - POST /api/ai/maintenance/predict
//! - POST /api/ai/maintenance/batch-predict
//! - POST /api/ai/maintenance/schedule-optimization

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use tracing::info;

use crate::services::maintenance_predictor::{
    BatchPrediction, MaintenancePrediction, MaintenanceSchedule, VehicleHealth,
};
use crate::{ApiResult, AppState};

/// Fleet request body for batch endpoints
#[derive(Debug, Deserialize)]
pub struct FleetRequest {
    #[serde(default)]
    pub vehicles: Vec<VehicleHealth>,
}

/// POST /api/ai/maintenance/predict
///
/// ```json
/// {
///   "vehicle_id": "VH-0001",
///   "mileage": 45000,
///   "engine_health": 75,
///   "tire_health": 60,
///   "brake_health": 80,
///   "battery_level": 85,
///   "days_since_service": 120,
///   "avg_daily_distance": 60
/// }
/// ```
pub async fn predict_maintenance(
    State(state): State<AppState>,
    payload: Result<Json<VehicleHealth>, JsonRejection>,
) -> ApiResult<Json<MaintenancePrediction>> {
    let Json(vehicle) = payload?;

    let prediction = state.maintenance_predictor.predict(&vehicle)?;

    info!(
        "Maintenance prediction for {}: {:?} (p={})",
        vehicle
            .vehicle_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_else(|| "unidentified vehicle".to_string()),
        prediction.priority,
        prediction.probability
    );

    Ok(Json(prediction))
}

/// POST /api/ai/maintenance/batch-predict
pub async fn batch_predict(
    State(state): State<AppState>,
    payload: Result<Json<FleetRequest>, JsonRejection>,
) -> ApiResult<Json<BatchPrediction>> {
    let Json(request) = payload?;

    let batch = state.maintenance_predictor.batch_predict(&request.vehicles)?;

    info!(
        "Batch maintenance prediction: {} vehicles, {} critical, {} high",
        batch.total_vehicles, batch.critical_count, batch.high_count
    );

    Ok(Json(batch))
}

/// POST /api/ai/maintenance/schedule-optimization
pub async fn optimize_schedule(
    State(state): State<AppState>,
    payload: Result<Json<FleetRequest>, JsonRejection>,
) -> ApiResult<Json<MaintenanceSchedule>> {
    let Json(request) = payload?;

    let plan = state
        .maintenance_predictor
        .optimize_schedule(&request.vehicles)?;

    Ok(Json(plan))
}

/// Build maintenance prediction routes
pub fn maintenance_routes() -> Router<AppState> {
    Router::new()
        .route("/api/ai/maintenance/predict", post(predict_maintenance))
        .route("/api/ai/maintenance/batch-predict", post(batch_predict))
        .route(
            "/api/ai/maintenance/schedule-optimization",
            post(optimize_schedule),
        )
}
