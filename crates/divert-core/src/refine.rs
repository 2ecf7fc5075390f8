//! Optional trajectory refinement: bounded perturbation of interior
//! waypoints under per-segment speed and duration limits.
//!
//! This stage is advisory. Callers fall back to the coarse path on any
//! [`RefineError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hazard::HazardField;
use crate::models::RouteWaypoint;
use crate::performance::PerformanceProfile;
use crate::spatial::{planar_distance_nm, project, unproject};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefineObjective {
    /// Minimize total fuel burn
    Fuel,
    /// Minimize total flight time
    Time,
    /// 0.6 fuel + 0.4 time, both normalized against the coarse path
    #[default]
    Blended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefineConfig {
    /// Maximum displacement of an interior waypoint, degrees (~30 NM at 0.5)
    pub max_waypoint_shift_deg: f64,
    /// Segment speed band as fractions of cruise speed
    pub speed_floor: f64,
    pub speed_ceiling: f64,
    /// Per-segment duration bounds, minutes
    pub min_segment_min: f64,
    pub max_segment_min: f64,
    /// Iteration budget for the descent loop
    pub max_passes: u32,
    /// Optional cap on total flight time
    pub time_horizon_hr: Option<f64>,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_waypoint_shift_deg: 0.5,
            speed_floor: 0.8,
            speed_ceiling: 1.1,
            min_segment_min: 1.0,
            max_segment_min: 60.0,
            max_passes: 40,
            time_horizon_hr: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum RefineError {
    #[error("refinement needs at least 3 waypoints, got {0}")]
    TooFewWaypoints(usize),
    #[error("segment {0} cannot satisfy the speed and duration bounds")]
    InfeasibleSegment(usize),
    #[error("total duration {actual_hr:.2} h exceeds horizon {horizon_hr:.2} h")]
    HorizonExceeded { actual_hr: f64, horizon_hr: f64 },
}

/// Result of a successful refinement pass.
#[derive(Debug, Clone)]
pub struct RefinedPath {
    pub waypoints: Vec<RouteWaypoint>,
    pub flight_time_hr: f64,
    pub fuel_kg: f64,
}

/// Strategy seam for the continuous-optimization stage. The engine works
/// without one (coarse path passthrough), and implementations may be swapped
/// in by the caller.
pub trait TrajectoryRefiner {
    fn refine(
        &self,
        waypoints: &[RouteWaypoint],
        profile: &PerformanceProfile,
        field: &HazardField,
        ref_lat: f64,
        objective: RefineObjective,
        config: &RefineConfig,
    ) -> Result<RefinedPath, RefineError>;
}

/// Built-in refiner: coordinate descent over the interior waypoints in the
/// planar frame with a shrinking step. First and last waypoints never move;
/// moves that exceed the shift bound, enter the hazard union, or break the
/// segment bounds are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescentRefiner;

impl TrajectoryRefiner for DescentRefiner {
    fn refine(
        &self,
        waypoints: &[RouteWaypoint],
        profile: &PerformanceProfile,
        field: &HazardField,
        ref_lat: f64,
        objective: RefineObjective,
        config: &RefineConfig,
    ) -> Result<RefinedPath, RefineError> {
        if waypoints.len() < 3 {
            return Err(RefineError::TooFewWaypoints(waypoints.len()));
        }

        let original: Vec<(f64, f64)> = waypoints
            .iter()
            .map(|wp| project(wp.lat, wp.lon, ref_lat))
            .collect();
        let mut points = original.clone();

        let baseline = evaluate(&points, profile, config)?;
        let mut best = baseline;
        let mut best_objective = 1.0; // baseline normalized against itself

        let shift_limit_nm = config.max_waypoint_shift_deg * 60.0;
        let mut step_nm = shift_limit_nm / 4.0;

        const DIRECTIONS: [(f64, f64); 8] = [
            (1.0, 0.0),
            (-1.0, 0.0),
            (0.0, 1.0),
            (0.0, -1.0),
            (0.7071, 0.7071),
            (0.7071, -0.7071),
            (-0.7071, 0.7071),
            (-0.7071, -0.7071),
        ];

        for _ in 0..config.max_passes {
            let mut improved = false;
            for index in 1..points.len() - 1 {
                for (dx, dy) in DIRECTIONS {
                    let candidate = (points[index].0 + dx * step_nm, points[index].1 + dy * step_nm);
                    if planar_distance_nm(candidate, original[index]) > shift_limit_nm {
                        continue;
                    }
                    if field.contains(candidate.0, candidate.1)
                        || !segment_clear(points[index - 1], candidate, field)
                        || !segment_clear(candidate, points[index + 1], field)
                    {
                        continue;
                    }
                    let previous = points[index];
                    points[index] = candidate;
                    match evaluate(&points, profile, config) {
                        Ok(plan) => {
                            let value = objective_value(objective, &plan, &baseline);
                            if value < best_objective - 1e-9 {
                                best_objective = value;
                                best = plan;
                                improved = true;
                            } else {
                                points[index] = previous;
                            }
                        }
                        Err(_) => points[index] = previous,
                    }
                }
            }
            if !improved {
                step_nm /= 2.0;
                if step_nm < 0.5 {
                    break;
                }
            }
        }

        let refined = points
            .iter()
            .map(|&(x, y)| {
                let (lat, lon) = unproject(x, y, ref_lat);
                RouteWaypoint { lat, lon }
            })
            .collect();

        Ok(RefinedPath {
            waypoints: refined,
            flight_time_hr: best.time_hr,
            fuel_kg: best.fuel_kg,
        })
    }
}

fn segment_clear(a: (f64, f64), b: (f64, f64), field: &HazardField) -> bool {
    if field.is_empty() {
        return true;
    }
    let length = planar_distance_nm(a, b);
    let steps = ((length / 2.0).ceil() as usize).clamp(1, 500);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        if field.contains(a.0 + t * (b.0 - a.0), a.1 + t * (b.1 - a.1)) {
            return false;
        }
    }
    true
}

#[derive(Debug, Clone, Copy)]
struct SegmentPlan {
    time_hr: f64,
    fuel_kg: f64,
}

/// Price a waypoint sequence: per segment, the fastest speed inside the band
/// that also satisfies the duration bounds, distance = speed x time.
fn evaluate(
    points: &[(f64, f64)],
    profile: &PerformanceProfile,
    config: &RefineConfig,
) -> Result<SegmentPlan, RefineError> {
    let speed_max = config.speed_ceiling * profile.cruise_speed_kt;
    let speed_min = config.speed_floor * profile.cruise_speed_kt;

    let mut time_hr = 0.0;
    for (index, pair) in points.windows(2).enumerate() {
        let dist_nm = planar_distance_nm(pair[0], pair[1]);
        let fastest_duration_min = dist_nm / speed_max * 60.0;
        if fastest_duration_min > config.max_segment_min {
            return Err(RefineError::InfeasibleSegment(index));
        }
        let speed = if fastest_duration_min < config.min_segment_min {
            // Stretch the segment to the duration floor; the required speed
            // must stay inside the band.
            let required = dist_nm * 60.0 / config.min_segment_min;
            if required < speed_min {
                return Err(RefineError::InfeasibleSegment(index));
            }
            required
        } else {
            speed_max
        };
        time_hr += dist_nm / speed;
    }

    if let Some(horizon_hr) = config.time_horizon_hr {
        if time_hr > horizon_hr {
            return Err(RefineError::HorizonExceeded {
                actual_hr: time_hr,
                horizon_hr,
            });
        }
    }

    Ok(SegmentPlan {
        time_hr,
        fuel_kg: time_hr * profile.fuel_flow_kg_hr,
    })
}

fn objective_value(objective: RefineObjective, plan: &SegmentPlan, baseline: &SegmentPlan) -> f64 {
    let fuel = plan.fuel_kg / baseline.fuel_kg.max(1e-9);
    let time = plan.time_hr / baseline.time_hr.max(1e-9);
    match objective {
        RefineObjective::Fuel => fuel,
        RefineObjective::Time => time,
        RefineObjective::Blended => 0.6 * fuel + 0.4 * time,
    }
}
