//! Core data models for the diversion planning engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of the aircraft requesting a diversion.
///
/// Owned by the caller; immutable input to one planning invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AircraftState {
    pub lat: f64,
    pub lon: f64,
    pub altitude_ft: f64,
    pub ground_speed_kt: f64,
    pub heading_deg: f64,
    /// Aircraft type designator, e.g. "A350-1000"
    pub aircraft_type: String,
    #[serde(default)]
    pub flight_number: Option<String>,
    #[serde(default)]
    pub registration: Option<String>,
    pub fuel_remaining_kg: f64,
    pub fuel_flow_kg_hr: f64,
    #[serde(default)]
    pub passenger_count: u32,
    pub observed_at: DateTime<Utc>,
}

/// Severity of a hazard, in increasing order of required clearance.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum HazardSeverity {
    Light,
    /// Fallback when the reporting service omits a severity.
    #[default]
    Moderate,
    Severe,
    Extreme,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardCategory {
    /// Convective weather cell
    Weather,
    /// Restricted or closed airspace
    Restricted,
    /// Volcanic ash contamination
    Volcanic,
    /// Military activity area
    Military,
}

/// A time-bounded region of airspace to be avoided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardZone {
    pub id: String,
    /// Polygon vertices as [lat, lon] pairs
    pub polygon: Vec<[f64; 2]>,
    #[serde(default)]
    pub severity: HazardSeverity,
    pub category: HazardCategory,
    /// The hazard is active at any query time at or before this instant
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub wind_speed_kt: Option<f64>,
    #[serde(default)]
    pub visibility_m: Option<f64>,
    #[serde(default)]
    pub ceiling_ft: Option<f64>,
}

impl HazardZone {
    /// A hazard is active iff the query time is at or before its expiry.
    pub fn is_active(&self, at: DateTime<Utc>) -> bool {
        at <= self.expires_at
    }

    /// Check if a geographic point is inside this hazard's polygon.
    /// Uses ray casting algorithm.
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        let n = self.polygon.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let yi = self.polygon[i][0];
            let xi = self.polygon[i][1];
            let yj = self.polygon[j][0];
            let xj = self.polygon[j][1];

            if ((yi > lat) != (yj > lat)) && (lon < (xj - xi) * (lat - yi) / (yj - yi) + xi) {
                inside = !inside;
            }
            j = i;
        }

        inside
    }

    /// Validate the hazard polygon.
    /// Returns list of validation errors (empty = valid).
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.polygon.len() < 3 {
            errors.push("Polygon must have at least 3 vertices".to_string());
        }
        for vertex in &self.polygon {
            if vertex[0].abs() > 90.0 || vertex[1].abs() > 180.0 {
                errors.push(format!(
                    "Vertex [{}, {}] outside valid coordinate range",
                    vertex[0], vertex[1]
                ));
                break;
            }
        }
        errors
    }
}

/// Instrument approach capability of an airfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproachCategory {
    Cat1,
    Cat2,
    Cat3,
    NonPrecision,
}

/// Current surface weather at an airfield, for the suitability minimums check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AirfieldWeather {
    pub visibility_m: f64,
    pub ceiling_ft: f64,
}

/// Reference data for a candidate diversion airfield. Never mutated by the
/// engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airfield {
    pub icao: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub elevation_ft: f64,
    pub longest_runway_m: f64,
    pub fuel_available: bool,
    pub customs_available: bool,
    pub emergency_services: bool,
    pub approach_category: ApproachCategory,
    /// ICAO rescue and fire fighting category (1-10)
    pub fire_category: u8,
    pub maintenance_capability: bool,
    /// Aircraft types this airfield accepts; `None` accepts all types
    #[serde(default)]
    pub accepted_types: Option<Vec<String>>,
    #[serde(default)]
    pub weather: Option<AirfieldWeather>,
}

impl Airfield {
    /// Whether this airfield accepts the given aircraft type.
    pub fn accepts(&self, aircraft_type: &str) -> bool {
        match &self.accepted_types {
            Some(types) => types.iter().any(|t| t == aircraft_type),
            None => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteWaypoint {
    pub lat: f64,
    pub lon: f64,
}

/// A scored diversion route to one candidate airfield.
///
/// Produced fresh per (aircraft, airfield) pair; immutable once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateRoute {
    pub airfield_icao: String,
    pub waypoints: Vec<RouteWaypoint>,
    /// Great-circle length along the waypoints
    pub distance_nm: f64,
    pub fuel_required_kg: f64,
    pub flight_time_hr: f64,
    pub eta: DateTime<Utc>,
    /// Composite route score; lower is better
    pub score: f64,
    pub estimated_cost_usd: f64,
    /// Weather risk component used in the score
    pub weather_risk: f64,
    /// Destination has customs facilities for an international arrival
    pub regulatory_cleared: bool,
    /// Destination can handle the passenger load in an emergency
    pub passenger_capacity_ok: bool,
    /// Performance lookup fell back to the default profile
    pub used_default_profile: bool,
    /// Waypoints came from the trajectory refiner rather than the raw search
    pub refined: bool,
}
