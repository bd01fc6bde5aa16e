//! HTTP API handlers for nfx-ai
//!
//! Route groups:
//! - `/api/ai/routes/*` route optimization
//! - `/api/ai/maintenance/*` maintenance prediction
//! - `/api/ai/recommendations/*` vehicle recommendation

pub mod health;
pub mod maintenance;
pub mod recommendations;
pub mod routes;

pub use health::{health_routes, not_found};
pub use maintenance::maintenance_routes;
pub use recommendations::recommendation_routes;
pub use routes::route_routes;
