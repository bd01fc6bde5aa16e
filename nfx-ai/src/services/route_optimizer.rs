//! Route Optimizer Service
//!
//! Aggregates an ordered list of stops into per-segment and total
//! distance, travel time and energy/fuel cost estimates.
//!
//! - Distance: geodesic distance between consecutive stops
//! - Time: `distance / 40 km/h × traffic multiplier`
//! - Cost: `distance × cost per km` for the vehicle class

use nfx_common::{GeoPoint, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::round_to;

/// Average city speed used for time estimates
pub const AVG_SPEED_KMH: f64 = 40.0;

/// Multiplier applied when the traffic label is not recognized
pub const DEFAULT_TRAFFIC_MULTIPLIER: f64 = 1.3;

/// Cost per km applied when the vehicle type is not recognized
pub const DEFAULT_COST_PER_KM: f64 = 0.12;

pub const HIGH_TRAFFIC_ADVISORY: &str =
    "Consider delaying trip by 1-2 hours for better traffic conditions";

/// Caller-supplied traffic condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrafficLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl TrafficLevel {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "low" => Some(TrafficLevel::Low),
            "medium" => Some(TrafficLevel::Medium),
            "high" => Some(TrafficLevel::High),
            "very_high" => Some(TrafficLevel::VeryHigh),
            _ => None,
        }
    }

    pub fn multiplier(&self) -> f64 {
        match self {
            TrafficLevel::Low => 1.0,
            TrafficLevel::Medium => 1.3,
            TrafficLevel::High => 1.7,
            TrafficLevel::VeryHigh => 2.2,
        }
    }

    /// Congested enough to advise delaying the trip
    pub fn is_congested(&self) -> bool {
        matches!(self, TrafficLevel::High | TrafficLevel::VeryHigh)
    }
}

/// Vehicle classes with known running costs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VehicleClass {
    Ev,
    Sedan,
    Suv,
    Van,
    Bike,
}

impl VehicleClass {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "EV" => Some(VehicleClass::Ev),
            "SEDAN" => Some(VehicleClass::Sedan),
            "SUV" => Some(VehicleClass::Suv),
            "VAN" => Some(VehicleClass::Van),
            "BIKE" => Some(VehicleClass::Bike),
            _ => None,
        }
    }

    /// Energy/fuel cost per kilometer
    pub fn cost_per_km(&self) -> f64 {
        match self {
            VehicleClass::Ev => 0.05,
            VehicleClass::Sedan => 0.12,
            VehicleClass::Suv => 0.18,
            VehicleClass::Van => 0.15,
            VehicleClass::Bike => 0.03,
        }
    }
}

/// A stop on the route
///
/// Everything besides the coordinates is carried through untouched, so
/// segments echo each stop exactly as the caller sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Waypoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            name: None,
            extra: Map::new(),
        }
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// One leg between consecutive stops
#[derive(Debug, Clone, Serialize)]
pub struct RouteSegment {
    pub from: Waypoint,
    pub to: Waypoint,
    pub distance_km: f64,
    pub time_minutes: f64,
    pub traffic_level: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub total_distance_km: f64,
    pub estimated_time_minutes: f64,
    pub estimated_cost: f64,
    pub traffic_level: String,
    pub vehicle_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OptimizedRoute {
    pub route: Vec<RouteSegment>,
    pub summary: RouteSummary,
    pub recommendation: Option<String>,
}

/// Single-leg quick estimate
#[derive(Debug, Clone, Serialize)]
pub struct TripEstimate {
    pub distance_km: f64,
    pub time_minutes: f64,
    pub cost: f64,
    pub traffic_level: String,
}

/// Route Optimizer
pub struct RouteOptimizer {
    avg_speed_kmh: f64,
}

impl Default for RouteOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteOptimizer {
    pub fn new() -> Self {
        Self {
            avg_speed_kmh: AVG_SPEED_KMH,
        }
    }

    /// Travel time in minutes for a distance under the given traffic label
    pub fn estimate_time(&self, distance_km: f64, traffic_level: &str) -> f64 {
        let multiplier = TrafficLevel::from_label(traffic_level)
            .map(|level| level.multiplier())
            .unwrap_or(DEFAULT_TRAFFIC_MULTIPLIER);

        distance_km / self.avg_speed_kmh * multiplier * 60.0
    }

    /// Energy/fuel cost for a distance driven by the given vehicle type
    pub fn fuel_cost(&self, distance_km: f64, vehicle_type: &str) -> f64 {
        let cost_per_km = VehicleClass::from_code(vehicle_type)
            .map(|class| class.cost_per_km())
            .unwrap_or(DEFAULT_COST_PER_KM);

        distance_km * cost_per_km
    }

    /// Build the route `start → waypoints… → end` and aggregate its estimates
    ///
    /// Totals are computed from the unrounded distance sum; only the
    /// reported figures are rounded.
    ///
    /// # Errors
    /// Returns `InvalidInput` if any stop has out-of-range coordinates
    pub fn optimize(
        &self,
        start: &Waypoint,
        end: &Waypoint,
        waypoints: &[Waypoint],
        traffic_level: &str,
        vehicle_type: &str,
    ) -> Result<OptimizedRoute> {
        let stops: Vec<&Waypoint> = std::iter::once(start)
            .chain(waypoints.iter())
            .chain(std::iter::once(end))
            .collect();

        for stop in &stops {
            stop.point().validate()?;
        }

        let mut total_distance = 0.0;
        let mut segments = Vec::with_capacity(stops.len() - 1);

        for pair in stops.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            let distance = from.point().distance_km(&to.point());
            let time = self.estimate_time(distance, traffic_level);

            segments.push(RouteSegment {
                from: from.clone(),
                to: to.clone(),
                distance_km: round_to(distance, 2),
                time_minutes: round_to(time, 1),
                traffic_level: traffic_level.to_string(),
            });

            total_distance += distance;
        }

        let total_time = self.estimate_time(total_distance, traffic_level);
        let total_cost = self.fuel_cost(total_distance, vehicle_type);

        let recommendation = TrafficLevel::from_label(traffic_level)
            .filter(TrafficLevel::is_congested)
            .map(|_| HIGH_TRAFFIC_ADVISORY.to_string());

        debug!(
            "Optimized route: {} segments, {:.2} km, traffic={}, vehicle={}",
            segments.len(),
            total_distance,
            traffic_level,
            vehicle_type
        );

        Ok(OptimizedRoute {
            route: segments,
            summary: RouteSummary {
                total_distance_km: round_to(total_distance, 2),
                estimated_time_minutes: round_to(total_time, 1),
                estimated_cost: round_to(total_cost, 2),
                traffic_level: traffic_level.to_string(),
                vehicle_type: vehicle_type.to_string(),
            },
            recommendation,
        })
    }

    /// Direct distance/time/cost between two points
    pub fn estimate(
        &self,
        start: &Waypoint,
        end: &Waypoint,
        traffic_level: &str,
        vehicle_type: &str,
    ) -> Result<TripEstimate> {
        let (a, b) = (start.point(), end.point());
        a.validate()?;
        b.validate()?;

        let distance = a.distance_km(&b);

        Ok(TripEstimate {
            distance_km: round_to(distance, 2),
            time_minutes: round_to(self.estimate_time(distance, traffic_level), 1),
            cost: round_to(self.fuel_cost(distance, vehicle_type), 2),
            traffic_level: traffic_level.to_string(),
        })
    }
}
