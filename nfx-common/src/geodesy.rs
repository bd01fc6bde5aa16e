//! Geodesic distance between GPS coordinates
//!
//! Distances are measured on the WGS-84 ellipsoid with Karney's geodesic
//! algorithm (`geo::Geodesic`), which converges for every pair of points
//! including near-antipodal ones.

use geo::{Distance, Geodesic, Point};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Reject non-finite or out-of-range coordinates
    pub fn validate(&self) -> Result<()> {
        if !self.lat.is_finite() || !(-90.0..=90.0).contains(&self.lat) {
            return Err(Error::InvalidInput(format!(
                "Latitude must be within [-90, 90], got {}",
                self.lat
            )));
        }
        if !self.lng.is_finite() || !(-180.0..=180.0).contains(&self.lng) {
            return Err(Error::InvalidInput(format!(
                "Longitude must be within [-180, 180], got {}",
                self.lng
            )));
        }
        Ok(())
    }

    /// Geodesic distance to another point in kilometers
    pub fn distance_km(&self, other: &GeoPoint) -> f64 {
        distance_km(self, other)
    }
}

impl From<GeoPoint> for Point<f64> {
    /// `geo` points are (x, y) = (longitude, latitude)
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lng, p.lat)
    }
}

/// Geodesic distance between two points in kilometers
pub fn distance_km(a: &GeoPoint, b: &GeoPoint) -> f64 {
    Geodesic::distance(Point::from(*a), Point::from(*b)) / 1000.0
}
