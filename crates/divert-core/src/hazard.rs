//! Hazard buffering and the merged avoidance region queried during graph
//! construction and refinement.

use chrono::{DateTime, Utc};

use crate::models::{HazardSeverity, HazardZone};
use crate::spatial::{distance_to_segment_nm, project};

/// Avoidance buffer distance for a hazard severity, in nautical miles.
///
/// Monotonically non-decreasing in severity order; the table is fixed and
/// not configurable at run time.
pub fn avoidance_buffer_nm(severity: HazardSeverity) -> f64 {
    match severity {
        HazardSeverity::Light => 5.0,
        HazardSeverity::Moderate => 10.0,
        HazardSeverity::Severe => 20.0,
        HazardSeverity::Extreme => 50.0,
    }
}

/// One active hazard projected into the planar frame with its buffer.
#[derive(Debug, Clone)]
struct BufferedZone {
    ring: Vec<(f64, f64)>,
    buffer_nm: f64,
}

impl BufferedZone {
    /// Distance from a point to the polygon boundary; meaningful for points
    /// outside the ring.
    fn boundary_distance(&self, x: f64, y: f64) -> f64 {
        let n = self.ring.len();
        let mut min = f64::INFINITY;
        for i in 0..n {
            let a = self.ring[i];
            let b = self.ring[(i + 1) % n];
            min = min.min(distance_to_segment_nm((x, y), a, b));
        }
        min
    }

    fn ring_contains(&self, x: f64, y: f64) -> bool {
        let n = self.ring.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let (xi, yi) = self.ring[i];
            let (xj, yj) = self.ring[j];
            if ((yi > y) != (yj > y)) && (x < (xj - xi) * (y - yi) / (yj - yi) + xi) {
                inside = !inside;
            }
            j = i;
        }
        inside
    }
}

/// The merged avoidance region for one planning run: every active hazard,
/// buffered by its severity.
///
/// Built once per run and shared across all candidate evaluations. Rather
/// than materializing a union polygon, membership and clearance are answered
/// by querying each buffered zone directly.
#[derive(Debug, Clone)]
pub struct HazardField {
    zones: Vec<BufferedZone>,
}

impl HazardField {
    /// Project each hazard active at `at` into the planar frame anchored at
    /// `ref_lat` and attach its severity buffer.
    pub fn build(hazards: &[HazardZone], at: DateTime<Utc>, ref_lat: f64) -> Self {
        let zones = hazards
            .iter()
            .filter(|hazard| hazard.is_active(at) && hazard.validate().is_empty())
            .map(|hazard| BufferedZone {
                ring: hazard
                    .polygon
                    .iter()
                    .map(|vertex| project(vertex[0], vertex[1], ref_lat))
                    .collect(),
                buffer_nm: avoidance_buffer_nm(hazard.severity),
            })
            .collect();
        Self { zones }
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Buffered-union membership: inside any hazard polygon, or within its
    /// buffer distance of the polygon boundary.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        self.zones.iter().any(|zone| {
            zone.ring_contains(x, y) || zone.boundary_distance(x, y) <= zone.buffer_nm
        })
    }

    /// Distance from a point to the buffered union, 0.0 inside it and
    /// `f64::INFINITY` when no hazards are active.
    pub fn clearance_nm(&self, x: f64, y: f64) -> f64 {
        let mut min = f64::INFINITY;
        for zone in &self.zones {
            if zone.ring_contains(x, y) {
                return 0.0;
            }
            let d = zone.boundary_distance(x, y) - zone.buffer_nm;
            if d <= 0.0 {
                return 0.0;
            }
            min = min.min(d);
        }
        min
    }
}
