//! Recommendation Engine Service
//!
//! Ranks candidate vehicles against a rider's stated preferences, forecasts
//! demand from time-of-week patterns, and finds vehicles similar to a given one.
//!
//! **Match score weights** (points at full match):
//! - Type match: 30
//! - Seat sufficiency: 20
//! - Price headroom: 25 × (1 − price / max price)
//! - Rating: 2 per star
//! - Battery: 15 (≥70), 10.5 (≥50), 4.5 otherwise
//! - Eco bonus: 10 for an EV when eco-friendly is requested

use nfx_common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::round_to;

const TYPE_WEIGHT: f64 = 3.0;
const SEATS_WEIGHT: f64 = 2.0;
const PRICE_WEIGHT: f64 = 2.5;
const RATING_WEIGHT: f64 = 2.0;
const BATTERY_WEIGHT: f64 = 1.5;
const ECO_WEIGHT: f64 = 1.0;

pub const EV_TYPE: &str = "EV";
pub const DEFAULT_REASON: &str = "Available and ready to book";

/// Rental vehicle as listed by the fleet
///
/// Only the scoring fields are typed; everything else the caller sends is
/// kept in `extra` and returned unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_per_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Vehicle {
    fn is_type(&self, wanted: Option<&str>) -> bool {
        matches!((self.vehicle_type.as_deref(), wanted), (Some(a), Some(b)) if a == b)
    }

    fn is_ev(&self) -> bool {
        self.vehicle_type.as_deref() == Some(EV_TYPE)
    }
}

/// Rider preferences with defaults for anything unstated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_type: Option<String>,
    #[serde(default = "default_seats")]
    pub seats: u32,
    #[serde(default = "default_max_price")]
    pub max_price_per_hour: f64,
    #[serde(default)]
    pub eco_friendly: bool,
}

fn default_seats() -> u32 {
    4
}

fn default_max_price() -> f64 {
    100.0
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            preferred_type: None,
            seats: default_seats(),
            max_price_per_hour: default_max_price(),
            eco_friendly: false,
        }
    }
}

impl Preferences {
    pub fn validate(&self) -> Result<()> {
        if !self.max_price_per_hour.is_finite() || self.max_price_per_hour <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "max_price_per_hour must be positive, got {}",
                self.max_price_per_hour
            )));
        }
        Ok(())
    }
}

/// Vehicle annotated with its match score and reasons
#[derive(Debug, Clone, Serialize)]
pub struct ScoredVehicle {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub match_score: f64,
    pub match_percentage: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub recommendation_reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DemandLevel {
    VeryHigh,
    High,
    Medium,
    Low,
}

/// Time-of-week demand forecast with a dynamic price multiplier
#[derive(Debug, Clone, Serialize)]
pub struct DemandForecast {
    pub demand_level: DemandLevel,
    pub demand_score: u32,
    pub price_multiplier: f64,
    pub is_peak_hour: bool,
    pub is_weekend: bool,
}

/// Candidate annotated with its similarity to a target vehicle
#[derive(Debug, Clone, Serialize)]
pub struct SimilarVehicle {
    #[serde(flatten)]
    pub vehicle: Vehicle,
    pub similarity_score: u32,
}

/// Recommendation Engine
#[derive(Debug, Default)]
pub struct RecommendationEngine;

impl RecommendationEngine {
    pub fn new() -> Self {
        Self
    }

    /// Weighted preference match, rounded to two decimals
    pub fn match_score(&self, vehicle: &Vehicle, prefs: &Preferences) -> f64 {
        let mut score = 0.0;

        if vehicle.is_type(prefs.preferred_type.as_deref()) {
            score += TYPE_WEIGHT * 10.0;
        }

        if vehicle.seats.unwrap_or(4) >= prefs.seats {
            score += SEATS_WEIGHT * 10.0;
        }

        let price = vehicle.price_per_hour.unwrap_or(0.0);
        if price <= prefs.max_price_per_hour {
            score += PRICE_WEIGHT * (1.0 - price / prefs.max_price_per_hour) * 10.0;
        }

        score += RATING_WEIGHT * vehicle.rating.unwrap_or(0.0);

        // Unknown charge is treated as full
        let battery = vehicle.battery.unwrap_or(100.0);
        score += BATTERY_WEIGHT
            * if battery >= 70.0 {
                10.0
            } else if battery >= 50.0 {
                7.0
            } else {
                3.0
            };

        if prefs.eco_friendly && vehicle.is_ev() {
            score += ECO_WEIGHT * 10.0;
        }

        round_to(score, 2)
    }

    /// Human-readable reasons; unknown battery counts as empty here
    pub fn reasons(&self, vehicle: &Vehicle, prefs: &Preferences) -> Vec<String> {
        let mut reasons = Vec::new();

        if vehicle.is_type(prefs.preferred_type.as_deref()) {
            if let Some(kind) = &vehicle.vehicle_type {
                reasons.push(format!("Matches your preferred type: {}", kind));
            }
        }

        let rating = vehicle.rating.unwrap_or(0.0);
        if rating >= 4.5 {
            reasons.push(format!("Highly rated ({}/5)", rating));
        }

        if vehicle.battery.unwrap_or(0.0) >= 80.0 {
            reasons.push("Excellent battery level".to_string());
        }

        if vehicle.is_ev() && prefs.eco_friendly {
            reasons.push("Eco-friendly electric vehicle".to_string());
        }

        if vehicle.price_per_hour.unwrap_or(0.0) <= prefs.max_price_per_hour * 0.7 {
            reasons.push("Great value for money".to_string());
        }

        if reasons.is_empty() {
            reasons.push(DEFAULT_REASON.to_string());
        }
        reasons
    }

    /// Rank vehicles by match score and return the best `top_n` with reasons
    ///
    /// Ties keep their input order.
    pub fn recommend(
        &self,
        vehicles: &[Vehicle],
        prefs: &Preferences,
        top_n: usize,
    ) -> Result<Vec<ScoredVehicle>> {
        prefs.validate()?;

        let mut scored: Vec<ScoredVehicle> = vehicles
            .iter()
            .map(|vehicle| {
                let match_score = self.match_score(vehicle, prefs);
                ScoredVehicle {
                    vehicle: vehicle.clone(),
                    match_score,
                    match_percentage: match_score.clamp(0.0, 100.0) as u32,
                    recommendation_reasons: Vec::new(),
                }
            })
            .collect();

        scored.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
        scored.truncate(top_n);

        for rec in &mut scored {
            rec.recommendation_reasons = self.reasons(&rec.vehicle, prefs);
        }

        debug!(
            "Ranked {} vehicles, returning {}",
            vehicles.len(),
            scored.len()
        );

        Ok(scored)
    }

    /// Demand forecast for an hour of day (0-23) and day of week (0 = Monday)
    pub fn predict_demand(&self, hour: u32, day_of_week: u32) -> Result<DemandForecast> {
        if hour > 23 {
            return Err(Error::InvalidInput(format!(
                "hour must be within 0-23, got {}",
                hour
            )));
        }
        if day_of_week > 6 {
            return Err(Error::InvalidInput(format!(
                "day_of_week must be within 0-6, got {}",
                day_of_week
            )));
        }

        let is_peak_hour = (7..=9).contains(&hour) || (17..=19).contains(&hour);
        let is_weekend = day_of_week >= 5;

        let mut demand_score = 50;
        if is_peak_hour {
            demand_score += 30;
        }
        demand_score += if is_weekend { 10 } else { 5 };

        let (demand_level, price_multiplier) = match demand_score {
            s if s >= 80 => (DemandLevel::VeryHigh, 1.5),
            s if s >= 65 => (DemandLevel::High, 1.3),
            s if s >= 40 => (DemandLevel::Medium, 1.0),
            _ => (DemandLevel::Low, 0.9),
        };

        Ok(DemandForecast {
            demand_level,
            demand_score,
            price_multiplier,
            is_peak_hour,
            is_weekend,
        })
    }

    /// Similarity of a candidate to the target (0-100)
    pub fn similarity_score(&self, target: &Vehicle, candidate: &Vehicle) -> u32 {
        let mut score = 0;

        // Two untyped vehicles count as the same type
        if candidate.vehicle_type == target.vehicle_type {
            score += 40;
        }

        let target_price = target.price_per_hour.unwrap_or(0.0);
        if target_price > 0.0 {
            let candidate_price = candidate.price_per_hour.unwrap_or(0.0);
            if (target_price - candidate_price).abs() / target_price <= 0.2 {
                score += 30;
            }
        }

        let rating_diff = (target.rating.unwrap_or(0.0) - candidate.rating.unwrap_or(0.0)).abs();
        if rating_diff <= 0.5 {
            score += 30;
        }

        score
    }

    /// The `top_n` candidates most similar to `target`, excluding the target itself
    ///
    /// A candidate is the target when their ids are equal, and two absent
    /// ids are equal.
    pub fn find_similar(
        &self,
        target: &Vehicle,
        candidates: &[Vehicle],
        top_n: usize,
    ) -> Vec<SimilarVehicle> {
        let mut similar: Vec<SimilarVehicle> = candidates
            .iter()
            .filter(|candidate| candidate.id != target.id)
            .map(|candidate| SimilarVehicle {
                vehicle: candidate.clone(),
                similarity_score: self.similarity_score(target, candidate),
            })
            .collect();

        similar.sort_by(|a, b| b.similarity_score.cmp(&a.similarity_score));
        similar.truncate(top_n);
        similar
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(id: &str, price: f64, rating: f64, battery: f64) -> Vehicle {
        Vehicle {
            id: Some(Value::from(id)),
            vehicle_type: Some("EV".to_string()),
            seats: Some(5),
            price_per_hour: Some(price),
            rating: Some(rating),
            battery: Some(battery),
            extra: Map::new(),
        }
    }

    fn eco_prefs() -> Preferences {
        Preferences {
            preferred_type: Some("EV".to_string()),
            seats: 4,
            max_price_per_hour: 30.0,
            eco_friendly: true,
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {}, got {}",
            expected,
            actual
        );
    }

    #[test]
    fn test_full_match_score() {
        let engine = RecommendationEngine::new();
        // 30 + 20 + 25 × (1 − 20/30) + 2 × 4.8 + 15 + 10
        let score = engine.match_score(&ev("EV-1", 20.0, 4.8, 85.0), &eco_prefs());
        assert_close(score, 92.93);
    }

    #[test]
    fn test_match_score_tie_rounds_to_even() {
        let engine = RecommendationEngine::new();
        let prefs = Preferences {
            preferred_type: Some("SEDAN".to_string()),
            max_price_per_hour: 40.0,
            ..Default::default()
        };
        let sedan = Vehicle {
            vehicle_type: Some("SEDAN".to_string()),
            price_per_hour: Some(15.0),
            rating: Some(4.0),
            battery: Some(90.0),
            ..Default::default()
        };
        // 30 + 20 + 15.625 + 8 + 15 = 88.625 exactly
        assert_close(engine.match_score(&sedan, &prefs), 88.62);
    }

    #[test]
    fn test_battery_tiers() {
        let engine = RecommendationEngine::new();
        let prefs = Preferences::default();
        let base = Vehicle {
            price_per_hour: Some(100.0),
            ..Default::default()
        };

        // seats 20, price headroom 0, rating 0
        let with_battery = |b: Option<f64>| Vehicle {
            battery: b,
            ..base.clone()
        };
        assert_close(engine.match_score(&with_battery(Some(70.0)), &prefs), 35.0);
        assert_close(engine.match_score(&with_battery(Some(50.0)), &prefs), 30.5);
        assert_close(engine.match_score(&with_battery(Some(49.0)), &prefs), 24.5);
        assert_close(engine.match_score(&with_battery(None), &prefs), 35.0);
    }

    #[test]
    fn test_over_budget_and_too_few_seats() {
        let engine = RecommendationEngine::new();
        let van = Vehicle {
            vehicle_type: Some("VAN".to_string()),
            seats: Some(2),
            price_per_hour: Some(40.0),
            rating: Some(3.0),
            battery: Some(60.0),
            ..Default::default()
        };
        // rating 6 + battery 10.5, nothing else
        assert_close(engine.match_score(&van, &eco_prefs()), 16.5);
    }

    #[test]
    fn test_missing_types_do_not_match() {
        let engine = RecommendationEngine::new();
        let prefs = Preferences::default();
        let untyped = Vehicle::default();
        // seats 20 + price 25 + battery 15, no type bonus
        assert_close(engine.match_score(&untyped, &prefs), 60.0);
    }

    #[test]
    fn test_reasons() {
        let engine = RecommendationEngine::new();
        let reasons = engine.reasons(&ev("EV-1", 20.0, 4.8, 85.0), &eco_prefs());
        assert_eq!(
            reasons,
            vec![
                "Matches your preferred type: EV",
                "Highly rated (4.8/5)",
                "Excellent battery level",
                "Eco-friendly electric vehicle",
                "Great value for money",
            ]
        );
    }

    #[test]
    fn test_reasons_fallback() {
        let engine = RecommendationEngine::new();
        let plain = Vehicle {
            vehicle_type: Some("SUV".to_string()),
            price_per_hour: Some(29.0),
            rating: Some(4.0),
            ..Default::default()
        };
        assert_eq!(engine.reasons(&plain, &eco_prefs()), vec![DEFAULT_REASON]);
    }

    #[test]
    fn test_recommend_ranks_and_truncates() {
        let engine = RecommendationEngine::new();
        let fleet = vec![
            ev("A", 29.0, 3.0, 40.0),
            ev("B", 10.0, 5.0, 90.0),
            ev("C", 20.0, 4.0, 75.0),
        ];

        let top = engine.recommend(&fleet, &eco_prefs(), 2).unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].vehicle.id, Some(Value::from("B")));
        assert_eq!(top[1].vehicle.id, Some(Value::from("C")));
        // 101.67 points caps at 100 percent
        assert_close(top[0].match_score, 101.67);
        assert_eq!(top[0].match_percentage, 100);
        assert_eq!(top[1].match_percentage, 91);
        assert!(!top[0].recommendation_reasons.is_empty());
    }

    #[test]
    fn test_recommend_keeps_input_order_on_ties() {
        let engine = RecommendationEngine::new();
        let fleet = vec![ev("first", 20.0, 4.0, 90.0), ev("second", 20.0, 4.0, 90.0)];
        let top = engine.recommend(&fleet, &eco_prefs(), 5).unwrap();
        assert_eq!(top[0].vehicle.id, Some(Value::from("first")));
        assert_eq!(top[1].vehicle.id, Some(Value::from("second")));
    }

    #[test]
    fn test_recommend_rejects_non_positive_budget() {
        let engine = RecommendationEngine::new();
        let prefs = Preferences {
            max_price_per_hour: 0.0,
            ..Default::default()
        };
        assert!(engine.recommend(&[Vehicle::default()], &prefs, 5).is_err());
    }

    #[test]
    fn test_extra_fields_round_trip() {
        let json = serde_json::json!({
            "id": 7,
            "type": "SEDAN",
            "model": "Model S",
            "location": {"lat": 1.0, "lng": 2.0}
        });
        let vehicle: Vehicle = serde_json::from_value(json).unwrap();
        assert_eq!(vehicle.extra["model"], "Model S");

        let out = serde_json::to_value(&vehicle).unwrap();
        assert_eq!(out["model"], "Model S");
        assert_eq!(out["location"]["lng"], 2.0);
        assert_eq!(out["type"], "SEDAN");
    }

    #[test]
    fn test_demand_peak_weekday() {
        let engine = RecommendationEngine::new();
        let forecast = engine.predict_demand(8, 1).unwrap();
        assert!(forecast.is_peak_hour);
        assert!(!forecast.is_weekend);
        assert_eq!(forecast.demand_score, 85);
        assert_eq!(forecast.demand_level, DemandLevel::VeryHigh);
        assert_eq!(forecast.price_multiplier, 1.5);
    }

    #[test]
    fn test_demand_off_peak_weekend() {
        let engine = RecommendationEngine::new();
        let forecast = engine.predict_demand(12, 6).unwrap();
        assert!(!forecast.is_peak_hour);
        assert!(forecast.is_weekend);
        assert_eq!(forecast.demand_score, 60);
        assert_eq!(forecast.demand_level, DemandLevel::Medium);
        assert_eq!(forecast.price_multiplier, 1.0);
    }

    #[test]
    fn test_demand_rejects_out_of_range() {
        let engine = RecommendationEngine::new();
        assert!(engine.predict_demand(24, 0).is_err());
        assert!(engine.predict_demand(0, 7).is_err());
    }

    #[test]
    fn test_find_similar() {
        let engine = RecommendationEngine::new();
        let target = ev("T", 20.0, 4.5, 80.0);
        let candidates = vec![
            ev("T", 20.0, 4.5, 80.0),
            Vehicle {
                id: Some(Value::from("S")),
                vehicle_type: Some("SUV".to_string()),
                price_per_hour: Some(50.0),
                rating: Some(2.0),
                ..Default::default()
            },
            ev("near", 23.0, 4.2, 50.0),
            ev("pricey", 30.0, 4.6, 50.0),
        ];

        let similar = engine.find_similar(&target, &candidates, 3);
        assert_eq!(similar.len(), 3);
        assert_eq!(similar[0].vehicle.id, Some(Value::from("near")));
        assert_eq!(similar[0].similarity_score, 100);
        assert_eq!(similar[1].vehicle.id, Some(Value::from("pricey")));
        assert_eq!(similar[1].similarity_score, 70);
        assert_eq!(similar[2].similarity_score, 0);
    }

    #[test]
    fn test_similarity_untyped_vehicles_share_type() {
        let engine = RecommendationEngine::new();
        let target = Vehicle {
            rating: Some(4.0),
            ..Default::default()
        };
        let candidate = Vehicle {
            rating: Some(1.0),
            ..Default::default()
        };
        assert_eq!(engine.similarity_score(&target, &candidate), 40);
    }

    #[test]
    fn test_find_similar_without_target_id_skips_unidentified() {
        let engine = RecommendationEngine::new();
        let target = Vehicle::default();
        let candidates = vec![Vehicle::default(), ev("EV-1", 20.0, 4.0, 80.0)];

        let similar = engine.find_similar(&target, &candidates, 5);
        assert_eq!(similar.len(), 1);
        assert_eq!(similar[0].vehicle.id, Some(Value::from("EV-1")));
    }
}
