pub mod config;
pub mod graph;
pub mod hazard;
pub mod models;
pub mod performance;
pub mod refine;
pub mod score;
pub mod search;
pub mod selector;
pub mod spatial;
pub mod suitability;

pub use config::{
    load_airfields, load_performance_profiles, ConfigError, PlannerConfig, ReferenceData,
};
pub use graph::{AirspaceGraph, GridConfig, GridNode};
pub use hazard::{avoidance_buffer_nm, HazardField};
pub use models::{
    AircraftState, Airfield, AirfieldWeather, ApproachCategory, CandidateRoute, HazardCategory,
    HazardSeverity, HazardZone, RouteWaypoint,
};
pub use performance::{
    estimate_fuel_kg, estimate_time_hr, PerformanceProfile, PerformanceTable, DEFAULT_PROFILE,
};
pub use refine::{
    DescentRefiner, RefineConfig, RefineError, RefineObjective, RefinedPath, TrajectoryRefiner,
};
pub use score::{score_route, ScoreWeights, REFERENCE_DIVERSION_NM};
pub use search::{find_path, simplify_path, SearchResult};
pub use selector::{DiversionPlan, DiversionPlanner, PlanError};
pub use spatial::{haversine_nm, project, unproject, EARTH_RADIUS_NM};
pub use suitability::{
    rank_airfields, FailureContext, SuitabilityCategory, SuitabilityReport,
};
