//! Maintenance Predictor Service
//!
//! Classifies vehicles as needing maintenance from seven health features,
//! derives a priority tier, itemizes issues with recommended actions and
//! estimates the repair cost.
//!
//! The decision rule is
//! `engine < 50 OR tire < 50 OR brake < 50 OR mileage > 80 000`.
//! It is exposed as a probability: each rule term yields a signed margin
//! past its threshold, and the largest margin maps linearly onto `[0, 1]`
//! around 0.5. `probability > 0.5` is therefore exactly the rule, while the
//! distance past the threshold drives the priority tier.

use nfx_common::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::round_to;

/// Placeholder issue when nothing crosses a threshold
pub const NO_ISSUES: &str = "No critical issues detected";

/// Placeholder recommendation when nothing crosses a threshold
pub const NO_RECOMMENDATIONS: &str = "Continue regular monitoring";

/// Cost of any issue without a specific estimate
pub const DEFAULT_ISSUE_COST: u32 = 100;

/// Vehicle health snapshot supplied by the caller
///
/// Missing features take neutral defaults: brand-new vehicle, full health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleHealth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<Value>,
    #[serde(default)]
    pub mileage: f64,
    #[serde(default = "full_health")]
    pub engine_health: f64,
    #[serde(default = "full_health")]
    pub tire_health: f64,
    #[serde(default = "full_health")]
    pub brake_health: f64,
    #[serde(default = "full_health")]
    pub battery_level: f64,
    #[serde(default)]
    pub days_since_service: f64,
    #[serde(default = "default_avg_daily_distance")]
    pub avg_daily_distance: f64,
}

fn full_health() -> f64 {
    100.0
}

fn default_avg_daily_distance() -> f64 {
    50.0
}

impl Default for VehicleHealth {
    fn default() -> Self {
        Self {
            vehicle_id: None,
            mileage: 0.0,
            engine_health: full_health(),
            tire_health: full_health(),
            brake_health: full_health(),
            battery_level: full_health(),
            days_since_service: 0.0,
            avg_daily_distance: default_avg_daily_distance(),
        }
    }
}

impl VehicleHealth {
    fn features(&self) -> [(&'static str, f64); 7] {
        [
            ("mileage", self.mileage),
            ("engine_health", self.engine_health),
            ("tire_health", self.tire_health),
            ("brake_health", self.brake_health),
            ("battery_level", self.battery_level),
            ("days_since_service", self.days_since_service),
            ("avg_daily_distance", self.avg_daily_distance),
        ]
    }

    /// All features must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.features() {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Maintenance urgency, ordered most urgent first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.8 {
            Priority::Critical
        } else if probability > 0.6 {
            Priority::High
        } else if probability > 0.4 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

/// Threshold findings with fixed wording and cost
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceIssue {
    EngineHealth,
    TireWear,
    BrakeDegradation,
    HighMileage,
    OverdueService,
}

impl MaintenanceIssue {
    const ALL: [MaintenanceIssue; 5] = [
        MaintenanceIssue::EngineHealth,
        MaintenanceIssue::TireWear,
        MaintenanceIssue::BrakeDegradation,
        MaintenanceIssue::HighMileage,
        MaintenanceIssue::OverdueService,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            MaintenanceIssue::EngineHealth => "Engine health critical",
            MaintenanceIssue::TireWear => "Tire wear detected",
            MaintenanceIssue::BrakeDegradation => "Brake system degradation",
            MaintenanceIssue::HighMileage => "High mileage",
            MaintenanceIssue::OverdueService => "Overdue for service",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            MaintenanceIssue::EngineHealth => "Schedule engine inspection immediately",
            MaintenanceIssue::TireWear => "Replace tires within 7 days",
            MaintenanceIssue::BrakeDegradation => "Brake service required urgently",
            MaintenanceIssue::HighMileage => "Comprehensive service recommended",
            MaintenanceIssue::OverdueService => "Schedule routine maintenance",
        }
    }

    pub fn cost(&self) -> u32 {
        match self {
            MaintenanceIssue::EngineHealth => 1500,
            MaintenanceIssue::TireWear => 600,
            MaintenanceIssue::BrakeDegradation => 400,
            MaintenanceIssue::HighMileage => 800,
            MaintenanceIssue::OverdueService => 200,
        }
    }

    pub fn from_description(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|issue| issue.description() == text)
    }
}

/// Margin-based risk classifier over the health features
#[derive(Debug, Clone)]
pub struct RiskClassifier {
    /// Subsystem health strictly below this needs maintenance
    health_threshold: f64,
    /// Health points past the threshold that saturate the probability
    health_band: f64,
    /// Mileage strictly above this needs maintenance
    mileage_threshold: f64,
    /// Kilometers past the threshold that saturate the probability
    mileage_band: f64,
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self {
            health_threshold: 50.0,
            health_band: 10.0,
            mileage_threshold: 80_000.0,
            mileage_band: 10_000.0,
        }
    }
}

impl RiskClassifier {
    /// Probability that the vehicle needs maintenance
    pub fn probability(&self, vehicle: &VehicleHealth) -> f64 {
        let health_margin = |health: f64| (self.health_threshold - health) / self.health_band;

        let margin = [
            health_margin(vehicle.engine_health),
            health_margin(vehicle.tire_health),
            health_margin(vehicle.brake_health),
            (vehicle.mileage - self.mileage_threshold) / self.mileage_band,
        ]
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);

        (0.5 + margin / 2.0).clamp(0.0, 1.0)
    }
}

/// Prediction for one vehicle
#[derive(Debug, Clone, Serialize)]
pub struct MaintenancePrediction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle_id: Option<Value>,
    pub needs_maintenance: bool,
    pub probability: f64,
    pub priority: Priority,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub estimated_days_until_maintenance: u32,
    pub confidence: f64,
    pub estimated_cost: u32,
}

/// Fleet-wide predictions ordered by urgency
#[derive(Debug, Clone, Serialize)]
pub struct BatchPrediction {
    pub total_vehicles: usize,
    pub critical_count: usize,
    pub high_count: usize,
    pub predictions: Vec<MaintenancePrediction>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ScheduleBuckets {
    pub immediate: Vec<MaintenancePrediction>,
    pub this_week: Vec<MaintenancePrediction>,
    pub this_month: Vec<MaintenancePrediction>,
    pub routine: Vec<MaintenancePrediction>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleSummary {
    pub immediate_action: usize,
    pub this_week: usize,
    pub this_month: usize,
    pub routine: usize,
}

/// Predictions grouped into service windows by priority
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceSchedule {
    pub schedule: ScheduleBuckets,
    pub summary: ScheduleSummary,
}

/// Maintenance Predictor
pub struct MaintenancePredictor {
    classifier: RiskClassifier,
    /// Days since last service beyond which a vehicle is overdue
    overdue_after_days: f64,
}

impl Default for MaintenancePredictor {
    fn default() -> Self {
        Self::new()
    }
}

impl MaintenancePredictor {
    pub fn new() -> Self {
        Self {
            classifier: RiskClassifier::default(),
            overdue_after_days: 180.0,
        }
    }

    /// Predict maintenance needs for a single vehicle
    ///
    /// # Errors
    /// Returns `InvalidInput` for negative or non-finite features
    pub fn predict(&self, vehicle: &VehicleHealth) -> Result<MaintenancePrediction> {
        vehicle.validate()?;

        let probability = self.classifier.probability(vehicle);
        let needs_maintenance = probability > 0.5;
        let priority = Priority::from_probability(probability);

        let found = self.detect_issues(vehicle);
        let (issues, recommendations) = if found.is_empty() {
            (vec![NO_ISSUES.to_string()], vec![NO_RECOMMENDATIONS.to_string()])
        } else {
            (
                found.iter().map(|i| i.description().to_string()).collect(),
                found.iter().map(|i| i.recommendation().to_string()).collect(),
            )
        };

        let estimated_days_until_maintenance = if needs_maintenance {
            (((1.0 - probability) * 30.0) as u32).max(1)
        } else {
            ((1.0 - probability) * 90.0) as u32
        };

        let confidence = round_to((1.0 - (0.5 - probability).abs() * 2.0) * 100.0, 1);
        let estimated_cost = self.estimate_cost(&issues);

        debug!(
            "Maintenance prediction: p={:.3} priority={:?} issues={}",
            probability,
            priority,
            found.len()
        );

        Ok(MaintenancePrediction {
            vehicle_id: vehicle.vehicle_id.clone(),
            needs_maintenance,
            probability: round_to(probability, 3),
            priority,
            issues,
            recommendations,
            estimated_days_until_maintenance,
            confidence,
            estimated_cost,
        })
    }

    fn detect_issues(&self, vehicle: &VehicleHealth) -> Vec<MaintenanceIssue> {
        let checks = [
            (vehicle.engine_health < 50.0, MaintenanceIssue::EngineHealth),
            (vehicle.tire_health < 50.0, MaintenanceIssue::TireWear),
            (vehicle.brake_health < 50.0, MaintenanceIssue::BrakeDegradation),
            (vehicle.mileage > 80_000.0, MaintenanceIssue::HighMileage),
            (
                vehicle.days_since_service > self.overdue_after_days,
                MaintenanceIssue::OverdueService,
            ),
        ];

        checks
            .into_iter()
            .filter_map(|(hit, issue)| hit.then_some(issue))
            .collect()
    }

    /// Sum of per-issue cost estimates; unknown issue text costs the default
    pub fn estimate_cost<S: AsRef<str>>(&self, issues: &[S]) -> u32 {
        issues
            .iter()
            .map(|text| {
                MaintenanceIssue::from_description(text.as_ref())
                    .map(|issue| issue.cost())
                    .unwrap_or(DEFAULT_ISSUE_COST)
            })
            .sum()
    }

    /// Predict for every vehicle, most urgent first
    ///
    /// Vehicles without an id are labelled `"Unknown"`. Equal priorities
    /// keep their input order.
    pub fn batch_predict(&self, vehicles: &[VehicleHealth]) -> Result<BatchPrediction> {
        let mut predictions = vehicles
            .iter()
            .map(|vehicle| {
                let mut prediction = self.predict(vehicle)?;
                prediction
                    .vehicle_id
                    .get_or_insert_with(|| Value::String("Unknown".to_string()));
                Ok(prediction)
            })
            .collect::<Result<Vec<_>>>()?;

        predictions.sort_by_key(|p| p.priority);

        let count = |priority: Priority| predictions.iter().filter(|p| p.priority == priority).count();

        Ok(BatchPrediction {
            total_vehicles: predictions.len(),
            critical_count: count(Priority::Critical),
            high_count: count(Priority::High),
            predictions,
        })
    }

    /// Group fleet predictions into service windows
    pub fn optimize_schedule(&self, vehicles: &[VehicleHealth]) -> Result<MaintenanceSchedule> {
        let mut schedule = ScheduleBuckets::default();

        for vehicle in vehicles {
            let prediction = self.predict(vehicle)?;
            let bucket = match prediction.priority {
                Priority::Critical => &mut schedule.immediate,
                Priority::High => &mut schedule.this_week,
                Priority::Medium => &mut schedule.this_month,
                Priority::Low => &mut schedule.routine,
            };
            bucket.push(prediction);
        }

        let summary = ScheduleSummary {
            immediate_action: schedule.immediate.len(),
            this_week: schedule.this_week.len(),
            this_month: schedule.this_month.len(),
            routine: schedule.routine.len(),
        };

        Ok(MaintenanceSchedule { schedule, summary })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(engine: f64, tire: f64, brake: f64, mileage: f64) -> VehicleHealth {
        VehicleHealth {
            engine_health: engine,
            tire_health: tire,
            brake_health: brake,
            mileage,
            ..Default::default()
        }
    }

    #[test]
    fn test_healthy_vehicle() {
        let predictor = MaintenancePredictor::new();
        let p = predictor.predict(&VehicleHealth::default()).unwrap();

        assert!(!p.needs_maintenance);
        assert_eq!(p.probability, 0.0);
        assert_eq!(p.priority, Priority::Low);
        assert_eq!(p.issues, vec![NO_ISSUES]);
        assert_eq!(p.recommendations, vec![NO_RECOMMENDATIONS]);
        assert_eq!(p.estimated_days_until_maintenance, 90);
        assert_eq!(p.confidence, 0.0);
        // The placeholder issue is priced at the default rate
        assert_eq!(p.estimated_cost, DEFAULT_ISSUE_COST);
    }

    #[test]
    fn test_threshold_is_strict() {
        let predictor = MaintenancePredictor::new();

        let at_health = predictor.predict(&vehicle(50.0, 100.0, 100.0, 0.0)).unwrap();
        assert!(!at_health.needs_maintenance);
        assert_eq!(at_health.probability, 0.5);
        assert_eq!(at_health.priority, Priority::Medium);
        assert_eq!(at_health.confidence, 100.0);
        assert_eq!(at_health.estimated_days_until_maintenance, 45);

        let at_mileage = predictor.predict(&vehicle(100.0, 100.0, 100.0, 80_000.0)).unwrap();
        assert!(!at_mileage.needs_maintenance);
        assert_eq!(at_mileage.issues, vec![NO_ISSUES]);
    }

    #[test]
    fn test_decision_matches_or_rule() {
        let predictor = MaintenancePredictor::new();
        let cases = [
            (49.9, 100.0, 100.0, 0.0, true),
            (100.0, 49.9, 100.0, 0.0, true),
            (100.0, 100.0, 49.9, 0.0, true),
            (100.0, 100.0, 100.0, 80_000.5, true),
            (50.1, 50.1, 50.1, 79_999.0, false),
            (75.0, 60.0, 80.0, 45_000.0, false),
        ];

        for (engine, tire, brake, mileage, expected) in cases {
            let p = predictor.predict(&vehicle(engine, tire, brake, mileage)).unwrap();
            assert_eq!(
                p.needs_maintenance, expected,
                "engine={} tire={} brake={} mileage={}",
                engine, tire, brake, mileage
            );
        }
    }

    #[test]
    fn test_priority_tiers() {
        let predictor = MaintenancePredictor::new();

        let critical = predictor.predict(&vehicle(30.0, 100.0, 100.0, 0.0)).unwrap();
        assert_eq!(critical.priority, Priority::Critical);
        assert_eq!(critical.probability, 1.0);
        assert_eq!(critical.estimated_days_until_maintenance, 1);

        let high = predictor.predict(&vehicle(100.0, 45.0, 100.0, 0.0)).unwrap();
        assert_eq!(high.priority, Priority::High);
        assert_eq!(high.probability, 0.75);
        assert_eq!(high.estimated_days_until_maintenance, 7);
        assert_eq!(high.confidence, 50.0);

        let medium = predictor.predict(&vehicle(100.0, 100.0, 49.0, 0.0)).unwrap();
        assert_eq!(medium.priority, Priority::Medium);
        assert!(medium.needs_maintenance);
        assert_eq!(medium.estimated_days_until_maintenance, 13);

        let high_mileage = predictor.predict(&vehicle(100.0, 100.0, 100.0, 90_000.0)).unwrap();
        assert_eq!(high_mileage.priority, Priority::Critical);
    }

    #[test]
    fn test_battery_and_daily_distance_do_not_move_decision() {
        let predictor = MaintenancePredictor::new();
        let drained = VehicleHealth {
            battery_level: 1.0,
            avg_daily_distance: 900.0,
            ..Default::default()
        };
        let p = predictor.predict(&drained).unwrap();
        assert!(!p.needs_maintenance);
        assert_eq!(p.priority, Priority::Low);
    }

    #[test]
    fn test_issues_and_costs() {
        let predictor = MaintenancePredictor::new();
        let worn = VehicleHealth {
            engine_health: 40.0,
            tire_health: 30.0,
            brake_health: 20.0,
            mileage: 95_000.0,
            days_since_service: 200.0,
            ..Default::default()
        };

        let p = predictor.predict(&worn).unwrap();
        assert_eq!(
            p.issues,
            vec![
                "Engine health critical",
                "Tire wear detected",
                "Brake system degradation",
                "High mileage",
                "Overdue for service",
            ]
        );
        assert_eq!(p.recommendations.len(), 5);
        assert_eq!(p.recommendations[1], "Replace tires within 7 days");
        assert_eq!(p.estimated_cost, 1500 + 600 + 400 + 800 + 200);
    }

    #[test]
    fn test_overdue_service_alone_is_not_a_maintenance_decision() {
        let predictor = MaintenancePredictor::new();
        let overdue = VehicleHealth {
            days_since_service: 181.0,
            ..Default::default()
        };
        let p = predictor.predict(&overdue).unwrap();
        assert!(!p.needs_maintenance);
        assert_eq!(p.issues, vec!["Overdue for service"]);
        assert_eq!(p.estimated_cost, 200);
    }

    #[test]
    fn test_estimate_cost_unknown_issue() {
        let predictor = MaintenancePredictor::new();
        assert_eq!(predictor.estimate_cost(&["Rattling noise", "High mileage"]), 900);
        assert_eq!(predictor.estimate_cost::<&str>(&[]), 0);
    }

    #[test]
    fn test_rejects_negative_features() {
        let predictor = MaintenancePredictor::new();
        let bad = VehicleHealth {
            mileage: -5.0,
            ..Default::default()
        };
        assert!(matches!(predictor.predict(&bad), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_batch_orders_by_priority() {
        let predictor = MaintenancePredictor::new();
        let low = VehicleHealth {
            vehicle_id: Some(Value::from("VH-LOW")),
            ..Default::default()
        };
        let critical = vehicle(10.0, 100.0, 100.0, 0.0);

        let batch = predictor.batch_predict(&[low, critical]).unwrap();
        assert_eq!(batch.total_vehicles, 2);
        assert_eq!(batch.critical_count, 1);
        assert_eq!(batch.high_count, 0);
        assert_eq!(batch.predictions[0].priority, Priority::Critical);
        assert_eq!(batch.predictions[0].vehicle_id, Some(Value::from("Unknown")));
        assert_eq!(batch.predictions[1].vehicle_id, Some(Value::from("VH-LOW")));
    }

    #[test]
    fn test_schedule_buckets() {
        let predictor = MaintenancePredictor::new();
        let fleet = [
            vehicle(10.0, 100.0, 100.0, 0.0),
            vehicle(100.0, 45.0, 100.0, 0.0),
            vehicle(100.0, 100.0, 49.0, 0.0),
            VehicleHealth::default(),
            VehicleHealth::default(),
        ];

        let plan = predictor.optimize_schedule(&fleet).unwrap();
        assert_eq!(plan.summary.immediate_action, 1);
        assert_eq!(plan.summary.this_week, 1);
        assert_eq!(plan.summary.this_month, 1);
        assert_eq!(plan.summary.routine, 2);
        assert_eq!(plan.schedule.routine.len(), 2);
    }

    #[test]
    fn test_priority_serializes_upper_case() {
        assert_eq!(
            serde_json::to_value(Priority::Critical).unwrap(),
            Value::from("CRITICAL")
        );
    }
}
