//! Planner configuration and process-wide reference data.
//!
//! Reference tables are loaded once at startup and shared read-only into
//! every planning call; the engine never reloads them per invocation.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::graph::GridConfig;
use crate::models::Airfield;
use crate::performance::{PerformanceProfile, PerformanceTable};
use crate::refine::{RefineConfig, RefineObjective};
use crate::score::ScoreWeights;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed reference document: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("reference document contains no airfields")]
    EmptyAirfieldList,
}

/// Tunables for one planner instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub grid: GridConfig,
    pub weights: ScoreWeights,
    pub refine: RefineConfig,
    pub objective: RefineObjective,
    /// Weather sub-score used when the caller supplies no risk value
    pub weather_risk_placeholder: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            weights: ScoreWeights::default(),
            refine: RefineConfig::default(),
            objective: RefineObjective::default(),
            weather_risk_placeholder: 0.5,
        }
    }
}

/// Immutable reference tables shared across planning invocations.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub airfields: Vec<Airfield>,
    pub performance: PerformanceTable,
}

impl ReferenceData {
    pub fn new(airfields: Vec<Airfield>, performance: PerformanceTable) -> Self {
        Self {
            airfields,
            performance,
        }
    }

    /// Load airfields from a JSON array, with the built-in performance table.
    pub fn from_airfield_json(json: &str) -> Result<Self, ConfigError> {
        let airfields = load_airfields(json)?;
        Ok(Self::new(airfields, PerformanceTable::default()))
    }
}

/// Parse an airfield reference document (JSON array of airfield records).
pub fn load_airfields(json: &str) -> Result<Vec<Airfield>, ConfigError> {
    let airfields: Vec<Airfield> = serde_json::from_str(json)?;
    if airfields.is_empty() {
        return Err(ConfigError::EmptyAirfieldList);
    }
    Ok(airfields)
}

/// Parse extra performance profiles (JSON object keyed by type designator)
/// and merge them over the built-in table.
pub fn load_performance_profiles(
    table: &mut PerformanceTable,
    json: &str,
) -> Result<(), ConfigError> {
    let entries: HashMap<String, PerformanceProfile> = serde_json::from_str(json)?;
    table.extend(entries);
    Ok(())
}
