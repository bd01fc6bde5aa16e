//! Scoring services
//!
//! Each service is a stateless scorer: plain structs in, plain structs out.
//! Handlers in `crate::api` own the HTTP contract around them.

pub mod maintenance_predictor;
pub mod recommendation_engine;
pub mod route_optimizer;

pub use maintenance_predictor::MaintenancePredictor;
pub use recommendation_engine::RecommendationEngine;
pub use route_optimizer::RouteOptimizer;

/// Round to `places` decimal places, exact ties to even
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
