//! Weighted multi-criteria scoring of candidate diversion routes.

use serde::{Deserialize, Serialize};

use crate::models::Airfield;
use crate::performance::PerformanceProfile;

/// Distance a route score is normalized against.
pub const REFERENCE_DIVERSION_NM: f64 = 5000.0;

/// Cost of the reference diversion at a typical wide-body per-NM cost,
/// used to normalize the operating-cost term.
pub const REFERENCE_DIVERSION_COST_USD: f64 = 150_000.0;

/// Sub-score weights. Callers may pass any weight set; values are used
/// as-is without renormalization so a deliberate bias is possible.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub distance: f64,
    pub fuel: f64,
    pub runway: f64,
    pub weather: f64,
    pub cost: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            distance: 0.30,
            fuel: 0.25,
            runway: 0.20,
            weather: 0.15,
            cost: 0.10,
        }
    }
}

/// Composite route score; lower is better. Pure function of its inputs.
///
/// `weather_risk` is a caller-supplied risk in [0, 1]; pass `None` to use
/// the placeholder.
pub fn score_route(
    distance_nm: f64,
    fuel_required_kg: f64,
    fuel_remaining_kg: f64,
    airfield: &Airfield,
    profile: &PerformanceProfile,
    weather_risk: Option<f64>,
    weather_risk_placeholder: f64,
    weights: &ScoreWeights,
) -> f64 {
    let distance_score = distance_nm / REFERENCE_DIVERSION_NM;
    // +1 in the denominator guards the fuel-exhausted case.
    let fuel_score = fuel_required_kg / (fuel_remaining_kg + 1.0);
    let runway_score =
        ((profile.required_runway_m - airfield.longest_runway_m) / profile.required_runway_m)
            .max(0.0);
    let weather_score = weather_risk.unwrap_or(weather_risk_placeholder);
    let cost_score = distance_nm * profile.cost_per_nm_usd / REFERENCE_DIVERSION_COST_USD;

    weights.distance * distance_score
        + weights.fuel * fuel_score
        + weights.runway * runway_score
        + weights.weather * weather_score
        + weights.cost * cost_score
}

/// Estimated operating cost of flying a route, for downstream cost
/// collaborators.
pub fn operating_cost_usd(distance_nm: f64, profile: &PerformanceProfile) -> f64 {
    distance_nm * profile.cost_per_nm_usd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApproachCategory;
    use crate::performance::DEFAULT_PROFILE;

    fn airfield(runway_m: f64) -> Airfield {
        Airfield {
            icao: "EINN".into(),
            name: "Shannon".into(),
            lat: 52.702,
            lon: -8.925,
            elevation_ft: 46.0,
            longest_runway_m: runway_m,
            fuel_available: true,
            customs_available: true,
            emergency_services: true,
            approach_category: ApproachCategory::Cat3,
            fire_category: 9,
            maintenance_capability: true,
            accepted_types: None,
            weather: None,
        }
    }

    #[test]
    fn default_weights_sum_to_one() {
        let w = ScoreWeights::default();
        let sum = w.distance + w.fuel + w.runway + w.weather + w.cost;
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn longer_routes_score_worse() {
        let w = ScoreWeights::default();
        let near = score_route(500.0, 7000.0, 45000.0, &airfield(3200.0), &DEFAULT_PROFILE, None, 0.5, &w);
        let far = score_route(1500.0, 21000.0, 45000.0, &airfield(3200.0), &DEFAULT_PROFILE, None, 0.5, &w);
        assert!(far > near);
    }

    #[test]
    fn short_runway_adds_penalty() {
        let w = ScoreWeights::default();
        let long = score_route(500.0, 7000.0, 45000.0, &airfield(3200.0), &DEFAULT_PROFILE, None, 0.5, &w);
        let short = score_route(500.0, 7000.0, 45000.0, &airfield(1800.0), &DEFAULT_PROFILE, None, 0.5, &w);
        assert!(short > long);
        // Runways longer than required are not rewarded below zero.
        let very_long = score_route(500.0, 7000.0, 45000.0, &airfield(4500.0), &DEFAULT_PROFILE, None, 0.5, &w);
        assert!((very_long - long).abs() < 1e-12);
    }

    #[test]
    fn zero_fuel_remaining_does_not_divide_by_zero() {
        let w = ScoreWeights::default();
        let score = score_route(500.0, 7000.0, 0.0, &airfield(3200.0), &DEFAULT_PROFILE, None, 0.5, &w);
        assert!(score.is_finite());
    }

    #[test]
    fn score_invariant_to_weight_key_order() {
        // The score is a pure function of weight values, not of the order
        // keys appear in a serialized weight document.
        let a: ScoreWeights = serde_json::from_str(
            r#"{"distance": 0.3, "fuel": 0.25, "runway": 0.2, "weather": 0.15, "cost": 0.1}"#,
        )
        .unwrap();
        let b: ScoreWeights = serde_json::from_str(
            r#"{"cost": 0.1, "weather": 0.15, "runway": 0.2, "fuel": 0.25, "distance": 0.3}"#,
        )
        .unwrap();
        let s1 = score_route(800.0, 11000.0, 45000.0, &airfield(3200.0), &DEFAULT_PROFILE, None, 0.5, &a);
        let s2 = score_route(800.0, 11000.0, 45000.0, &airfield(3200.0), &DEFAULT_PROFILE, None, 0.5, &b);
        assert_eq!(s1, s2);
    }

    #[test]
    fn caller_weights_are_not_renormalized() {
        // Doubling every weight doubles the score.
        let w = ScoreWeights::default();
        let doubled = ScoreWeights {
            distance: 0.6,
            fuel: 0.5,
            runway: 0.4,
            weather: 0.3,
            cost: 0.2,
        };
        let base = score_route(800.0, 11000.0, 45000.0, &airfield(3200.0), &DEFAULT_PROFILE, None, 0.5, &w);
        let biased = score_route(800.0, 11000.0, 45000.0, &airfield(3200.0), &DEFAULT_PROFILE, None, 0.5, &doubled);
        assert!((biased - 2.0 * base).abs() < 1e-12);
    }
}
