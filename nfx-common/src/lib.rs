//! # NeuroFleetX Common Library
//!
//! Shared code for NeuroFleetX services:
//! - Error types
//! - Bootstrap configuration (TOML + environment)
//! - Geodesic distance on the WGS-84 ellipsoid

pub mod config;
pub mod error;
pub mod geodesy;

pub use error::{Error, Result};
pub use geodesy::GeoPoint;
