//! Fast airfield triage, independent of path search.
//!
//! Produces a bounded ordinal ranking of alternates for decision-support
//! displays; the continuous route score lives in [`crate::score`].

use serde::{Deserialize, Serialize};

use crate::models::{AircraftState, Airfield};
use crate::performance::PerformanceTable;
use crate::spatial::haversine_nm;

/// Weather minimums for an unrestricted suitability check.
const MIN_VISIBILITY_M: f64 = 3000.0;
const MIN_CEILING_FT: f64 = 1000.0;

/// Inputs supplied by the external failure/risk classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FailureContext {
    /// The failure mandates an immediate diversion
    pub diversion_required: bool,
    /// Multiplier on the aircraft's required landing distance
    pub landing_distance_factor: f64,
    /// Minimum rescue and fire fighting category
    pub required_fire_category: u8,
}

impl Default for FailureContext {
    fn default() -> Self {
        Self {
            diversion_required: false,
            landing_distance_factor: 1.0,
            required_fire_category: 8,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuitabilityCategory {
    Excellent,
    Good,
    Adequate,
    Marginal,
    Unsuitable,
}

impl SuitabilityCategory {
    fn from_score(score: f64) -> Self {
        if score >= 7.0 {
            Self::Excellent
        } else if score >= 5.0 {
            Self::Good
        } else if score >= 3.0 {
            Self::Adequate
        } else if score >= 1.0 {
            Self::Marginal
        } else {
            Self::Unsuitable
        }
    }
}

/// Per-airfield triage result with the individual checks exposed so a
/// display layer can explain the category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuitabilityReport {
    pub icao: String,
    pub distance_nm: f64,
    pub score: f64,
    pub category: SuitabilityCategory,
    pub runway_ok: bool,
    pub fire_category_ok: bool,
    pub weather_ok: bool,
    pub maintenance_ok: bool,
}

/// Rank airfields by the composite suitability score:
/// `3*runway + 2*firecat + 2*weather + 1*maintenance - distance/100`,
/// sorted by score descending, then distance ascending.
pub fn rank_airfields(
    aircraft: &AircraftState,
    airfields: &[Airfield],
    performance: &PerformanceTable,
    failure: &FailureContext,
) -> Vec<SuitabilityReport> {
    let (profile, _) = performance.lookup(&aircraft.aircraft_type);
    let required_runway_m = profile.required_runway_m * failure.landing_distance_factor;

    let mut reports: Vec<SuitabilityReport> = airfields
        .iter()
        .map(|airfield| {
            let runway_ok = airfield.longest_runway_m >= required_runway_m;
            let fire_category_ok = airfield.fire_category >= failure.required_fire_category;
            // Missing weather fails the minimums check.
            let weather_ok = airfield
                .weather
                .map(|wx| wx.visibility_m >= MIN_VISIBILITY_M && wx.ceiling_ft >= MIN_CEILING_FT)
                .unwrap_or(false);
            let maintenance_ok = if failure.diversion_required {
                airfield.maintenance_capability
            } else {
                true
            };
            let distance_nm =
                haversine_nm(aircraft.lat, aircraft.lon, airfield.lat, airfield.lon);

            let mut score = -distance_nm / 100.0;
            if runway_ok {
                score += 3.0;
            }
            if fire_category_ok {
                score += 2.0;
            }
            if weather_ok {
                score += 2.0;
            }
            if maintenance_ok {
                score += 1.0;
            }

            SuitabilityReport {
                icao: airfield.icao.clone(),
                distance_nm,
                score,
                category: SuitabilityCategory::from_score(score),
                runway_ok,
                fire_category_ok,
                weather_ok,
                maintenance_ok,
            }
        })
        .collect();

    reports.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.distance_nm.total_cmp(&b.distance_nm))
    });
    reports
}
