//! Aircraft performance lookup used to turn path length into time and fuel.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-type cruise constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PerformanceProfile {
    pub cruise_speed_kt: f64,
    pub fuel_flow_kg_hr: f64,
    pub max_alt_ft: f64,
    pub range_nm: f64,
    /// Landing distance required at typical diversion weight
    pub required_runway_m: f64,
    /// Direct operating cost per nautical mile
    pub cost_per_nm_usd: f64,
}

/// Fallback profile for unrecognized type strings: a generic mid-size
/// long-haul twin. Lookups never fail because of an unknown type.
pub const DEFAULT_PROFILE: PerformanceProfile = PerformanceProfile {
    cruise_speed_kt: 480.0,
    fuel_flow_kg_hr: 6500.0,
    max_alt_ft: 41000.0,
    range_nm: 7000.0,
    required_runway_m: 2500.0,
    cost_per_nm_usd: 24.0,
};

/// Static per-type performance table, loaded once and shared read-only for
/// the process lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceTable {
    profiles: HashMap<String, PerformanceProfile>,
}

impl Default for PerformanceTable {
    fn default() -> Self {
        let mut profiles = HashMap::new();
        let entries: [(&str, PerformanceProfile); 7] = [
            (
                "A350-1000",
                PerformanceProfile {
                    cruise_speed_kt: 488.0,
                    fuel_flow_kg_hr: 6800.0,
                    max_alt_ft: 41450.0,
                    range_nm: 8700.0,
                    required_runway_m: 2600.0,
                    cost_per_nm_usd: 30.0,
                },
            ),
            (
                "A350-900",
                PerformanceProfile {
                    cruise_speed_kt: 488.0,
                    fuel_flow_kg_hr: 6200.0,
                    max_alt_ft: 41450.0,
                    range_nm: 8100.0,
                    required_runway_m: 2450.0,
                    cost_per_nm_usd: 28.0,
                },
            ),
            (
                "B777-300ER",
                PerformanceProfile {
                    cruise_speed_kt: 490.0,
                    fuel_flow_kg_hr: 7500.0,
                    max_alt_ft: 43100.0,
                    range_nm: 7370.0,
                    required_runway_m: 2800.0,
                    cost_per_nm_usd: 32.0,
                },
            ),
            (
                "B787-9",
                PerformanceProfile {
                    cruise_speed_kt: 488.0,
                    fuel_flow_kg_hr: 5600.0,
                    max_alt_ft: 43000.0,
                    range_nm: 7530.0,
                    required_runway_m: 2500.0,
                    cost_per_nm_usd: 26.0,
                },
            ),
            (
                "A330-300",
                PerformanceProfile {
                    cruise_speed_kt: 470.0,
                    fuel_flow_kg_hr: 5700.0,
                    max_alt_ft: 41100.0,
                    range_nm: 6350.0,
                    required_runway_m: 2500.0,
                    cost_per_nm_usd: 25.0,
                },
            ),
            (
                "A320neo",
                PerformanceProfile {
                    cruise_speed_kt: 450.0,
                    fuel_flow_kg_hr: 2200.0,
                    max_alt_ft: 39800.0,
                    range_nm: 3400.0,
                    required_runway_m: 2000.0,
                    cost_per_nm_usd: 14.0,
                },
            ),
            (
                "B737-800",
                PerformanceProfile {
                    cruise_speed_kt: 447.0,
                    fuel_flow_kg_hr: 2400.0,
                    max_alt_ft: 41000.0,
                    range_nm: 2935.0,
                    required_runway_m: 2100.0,
                    cost_per_nm_usd: 14.0,
                },
            ),
        ];
        for (name, profile) in entries {
            profiles.insert(name.to_string(), profile);
        }
        Self { profiles }
    }
}

impl PerformanceTable {
    /// Look up a type designator. Returns the profile and whether the
    /// default fallback was used.
    pub fn lookup(&self, aircraft_type: &str) -> (&PerformanceProfile, bool) {
        match self.profiles.get(aircraft_type) {
            Some(profile) => (profile, false),
            None => (&DEFAULT_PROFILE, true),
        }
    }

    /// Add or replace profiles, e.g. from a JSON reference document.
    pub fn extend(&mut self, entries: HashMap<String, PerformanceProfile>) {
        self.profiles.extend(entries);
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

/// Flight time in hours for a distance at the profile's cruise speed.
pub fn estimate_time_hr(distance_nm: f64, profile: &PerformanceProfile) -> f64 {
    distance_nm / profile.cruise_speed_kt
}

/// Fuel burn in kilograms over a flight time at the profile's cruise flow.
pub fn estimate_fuel_kg(time_hr: f64, profile: &PerformanceProfile) -> f64 {
    time_hr * profile.fuel_flow_kg_hr
}
