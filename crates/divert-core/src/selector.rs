//! Diversion selection: evaluates every candidate airfield and returns the
//! lowest-scoring feasible route.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::config::{PlannerConfig, ReferenceData};
use crate::graph::AirspaceGraph;
use crate::hazard::HazardField;
use crate::models::{AircraftState, Airfield, CandidateRoute, HazardZone, RouteWaypoint};
use crate::performance::{estimate_fuel_kg, estimate_time_hr};
use crate::refine::{DescentRefiner, TrajectoryRefiner};
use crate::score::{operating_cost_usd, score_route};
use crate::search::{find_path, simplify_path};
use crate::spatial::{haversine_nm, project};
use crate::suitability::{rank_airfields, FailureContext, SuitabilityReport};

/// Leg-length bounds applied when collapsing the grid path into waypoints.
const MAX_LEG_NM: f64 = 240.0;
const MIN_LEG_NM: f64 = 8.0;

#[derive(Debug, Error)]
pub enum PlanError {
    /// The corridor grid produced no traversable nodes at all.
    #[error("no traversable graph nodes in the corridor to {icao}")]
    NoGraphNodes { icao: String },
    /// A* found no path between the origin and destination nodes.
    #[error("corridor to {icao} is fully blocked by hazards")]
    BlockedCorridor { icao: String },
    /// The airfield's type whitelist excludes this aircraft.
    #[error("{icao} does not accept aircraft type {aircraft_type}")]
    UnsupportedAircraftType { icao: String, aircraft_type: String },
    /// The route would burn more fuel than remains on board.
    #[error("route to {icao} needs {required_kg:.0} kg fuel, {remaining_kg:.0} kg remaining")]
    InsufficientFuel {
        icao: String,
        required_kg: f64,
        remaining_kg: f64,
    },
    /// Every candidate airfield failed. The one fatal planning error.
    #[error("no feasible diversion among {candidates} candidate airfields")]
    NoFeasibleDiversion { candidates: usize },
}

/// Result of a successful planning run.
#[derive(Debug, Clone)]
pub struct DiversionPlan {
    /// The selected (lowest-scoring) route
    pub route: CandidateRoute,
    /// Every successfully scored candidate, best first
    pub candidates: Vec<CandidateRoute>,
    /// Independent suitability triage of all airfields
    pub alternates: Vec<SuitabilityReport>,
    pub candidates_failed: usize,
}

/// Orchestrates hazard modelling, graph search, refinement and scoring
/// across all candidate airfields.
///
/// Holds only shared read-only reference data, so one planner can serve
/// many planning invocations (and candidate evaluations are independent,
/// should a caller wish to shard them across threads).
pub struct DiversionPlanner {
    reference: Arc<ReferenceData>,
    config: PlannerConfig,
    refiner: Option<Box<dyn TrajectoryRefiner + Send + Sync>>,
}

impl DiversionPlanner {
    /// Planner with the built-in descent refiner.
    pub fn new(reference: Arc<ReferenceData>, config: PlannerConfig) -> Self {
        Self {
            reference,
            config,
            refiner: Some(Box::new(DescentRefiner)),
        }
    }

    /// Planner without a trajectory refiner; every route is the coarse path.
    pub fn without_refiner(reference: Arc<ReferenceData>, config: PlannerConfig) -> Self {
        Self {
            reference,
            config,
            refiner: None,
        }
    }

    /// Swap in a custom refinement strategy.
    pub fn with_refiner(
        mut self,
        refiner: Box<dyn TrajectoryRefiner + Send + Sync>,
    ) -> Self {
        self.refiner = Some(refiner);
        self
    }

    /// Plan a diversion for the aircraft given the currently known hazards.
    ///
    /// Per-candidate failures are logged and skipped; only exhaustion of all
    /// candidates surfaces as [`PlanError::NoFeasibleDiversion`].
    pub fn plan(
        &self,
        aircraft: &AircraftState,
        hazards: &[HazardZone],
        failure: &FailureContext,
        now: DateTime<Utc>,
    ) -> Result<DiversionPlan, PlanError> {
        // One reference latitude and one merged hazard region per run, shared
        // by every candidate evaluation.
        let ref_lat = aircraft.lat;
        let field = HazardField::build(hazards, now, ref_lat);

        let alternates = rank_airfields(
            aircraft,
            &self.reference.airfields,
            &self.reference.performance,
            failure,
        );

        let mut candidates: Vec<CandidateRoute> = Vec::new();
        let mut failed = 0usize;
        for airfield in &self.reference.airfields {
            match self.evaluate_candidate(aircraft, airfield, &field, ref_lat, now) {
                Ok(route) => candidates.push(route),
                Err(err) => {
                    tracing::warn!("candidate {} skipped: {}", airfield.icao, err);
                    failed += 1;
                }
            }
        }

        if candidates.is_empty() {
            tracing::error!(
                "no feasible diversion for {} at ({:.2}, {:.2})",
                aircraft.aircraft_type,
                aircraft.lat,
                aircraft.lon
            );
            return Err(PlanError::NoFeasibleDiversion {
                candidates: self.reference.airfields.len(),
            });
        }

        // Deterministic aggregation: stable order by score, then distance,
        // then ICAO, independent of evaluation order.
        candidates.sort_by(|a, b| {
            a.score
                .total_cmp(&b.score)
                .then_with(|| a.distance_nm.total_cmp(&b.distance_nm))
                .then_with(|| a.airfield_icao.cmp(&b.airfield_icao))
        });

        let route = candidates[0].clone();
        tracing::info!(
            "selected diversion to {} ({:.0} NM, score {:.3})",
            route.airfield_icao,
            route.distance_nm,
            route.score
        );

        Ok(DiversionPlan {
            route,
            candidates,
            alternates,
            candidates_failed: failed,
        })
    }

    fn evaluate_candidate(
        &self,
        aircraft: &AircraftState,
        airfield: &Airfield,
        field: &HazardField,
        ref_lat: f64,
        now: DateTime<Utc>,
    ) -> Result<CandidateRoute, PlanError> {
        if !airfield.accepts(&aircraft.aircraft_type) {
            return Err(PlanError::UnsupportedAircraftType {
                icao: airfield.icao.clone(),
                aircraft_type: aircraft.aircraft_type.clone(),
            });
        }

        let origin = project(aircraft.lat, aircraft.lon, ref_lat);
        let dest = project(airfield.lat, airfield.lon, ref_lat);

        let graph = AirspaceGraph::build(origin, dest, field, &self.config.grid);
        if graph.is_empty() {
            return Err(PlanError::NoGraphNodes {
                icao: airfield.icao.clone(),
            });
        }
        let start = graph
            .nearest_node(origin.0, origin.1)
            .ok_or_else(|| PlanError::NoGraphNodes {
                icao: airfield.icao.clone(),
            })?;
        let goal = graph
            .nearest_node(dest.0, dest.1)
            .ok_or_else(|| PlanError::NoGraphNodes {
                icao: airfield.icao.clone(),
            })?;

        let result = find_path(&graph, start, goal).ok_or_else(|| PlanError::BlockedCorridor {
            icao: airfield.icao.clone(),
        })?;
        tracing::debug!(
            "path to {}: {} nodes, cost {:.1}, {} visited",
            airfield.icao,
            result.path.len(),
            result.cost,
            result.nodes_visited
        );

        // Anchor the node path on the true endpoints before collapsing it.
        let mut planar: Vec<(f64, f64)> = Vec::with_capacity(result.path.len() + 2);
        planar.push(origin);
        for &index in &result.path {
            let node = graph.node(index);
            planar.push((node.x, node.y));
        }
        planar.push(dest);
        let planar = simplify_path(&planar, field, MAX_LEG_NM, MIN_LEG_NM);

        let mut waypoints: Vec<RouteWaypoint> = planar
            .iter()
            .map(|&(x, y)| {
                let (lat, lon) = crate::spatial::unproject(x, y, ref_lat);
                RouteWaypoint { lat, lon }
            })
            .collect();
        // Pin the exact endpoint coordinates against projection rounding.
        if let Some(first) = waypoints.first_mut() {
            first.lat = aircraft.lat;
            first.lon = aircraft.lon;
        }
        if let Some(last) = waypoints.last_mut() {
            last.lat = airfield.lat;
            last.lon = airfield.lon;
        }

        let (profile, used_default_profile) =
            self.reference.performance.lookup(&aircraft.aircraft_type);

        let mut distance_nm = route_length_nm(&waypoints);
        let mut flight_time_hr = estimate_time_hr(distance_nm, profile);
        let mut fuel_required_kg = estimate_fuel_kg(flight_time_hr, profile);
        let mut refined = false;

        if let Some(refiner) = &self.refiner {
            match refiner.refine(
                &waypoints,
                profile,
                field,
                ref_lat,
                self.config.objective,
                &self.config.refine,
            ) {
                Ok(path) => {
                    waypoints = path.waypoints;
                    distance_nm = route_length_nm(&waypoints);
                    flight_time_hr = path.flight_time_hr;
                    fuel_required_kg = path.fuel_kg;
                    refined = true;
                }
                Err(err) => {
                    // Advisory stage: keep the coarse path.
                    tracing::debug!("refinement for {} skipped: {}", airfield.icao, err);
                }
            }
        }

        if fuel_required_kg > aircraft.fuel_remaining_kg {
            return Err(PlanError::InsufficientFuel {
                icao: airfield.icao.clone(),
                required_kg: fuel_required_kg,
                remaining_kg: aircraft.fuel_remaining_kg,
            });
        }

        let weather_risk = self.config.weather_risk_placeholder;
        let score = score_route(
            distance_nm,
            fuel_required_kg,
            aircraft.fuel_remaining_kg,
            airfield,
            profile,
            None,
            weather_risk,
            &self.config.weights,
        );

        Ok(CandidateRoute {
            airfield_icao: airfield.icao.clone(),
            waypoints,
            distance_nm,
            fuel_required_kg,
            flight_time_hr,
            eta: now + Duration::seconds((flight_time_hr * 3600.0).round() as i64),
            score,
            estimated_cost_usd: operating_cost_usd(distance_nm, profile),
            weather_risk,
            regulatory_cleared: airfield.customs_available,
            passenger_capacity_ok: airfield.emergency_services || aircraft.passenger_count == 0,
            used_default_profile,
            refined,
        })
    }
}

fn route_length_nm(waypoints: &[RouteWaypoint]) -> f64 {
    waypoints
        .windows(2)
        .map(|pair| haversine_nm(pair[0].lat, pair[0].lon, pair[1].lat, pair[1].lon))
        .sum()
}
