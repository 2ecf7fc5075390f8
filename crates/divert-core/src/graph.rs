//! Airspace graph construction over the origin-destination corridor.

use serde::{Deserialize, Serialize};

use crate::hazard::HazardField;

/// Upper bound on grid cells before the spacing is coarsened.
const MAX_GRID_CELLS: usize = 400_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Grid spacing for routes up to `widen_beyond_nm`
    pub spacing_nm: f64,
    /// Grid spacing for longer routes
    pub wide_spacing_nm: f64,
    /// Route distance beyond which the wide spacing applies
    pub widen_beyond_nm: f64,
    /// Search margin around the origin/destination bounding box
    pub margin_nm: f64,
    /// Edges closer than this to the hazard union pick up a proximity penalty
    pub penalty_radius_nm: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing_nm: 5.0,
            wide_spacing_nm: 10.0,
            widen_beyond_nm: 1000.0,
            margin_nm: 300.0,
            penalty_radius_nm: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GridNode {
    pub x: f64,
    pub y: f64,
}

/// Grid graph over the search corridor.
///
/// Arena layout: nodes live in a flat vector and edges refer to them by
/// integer index, so the graph owns no interior references.
#[derive(Debug, Clone)]
pub struct AirspaceGraph {
    nodes: Vec<GridNode>,
    adjacency: Vec<Vec<(u32, f64)>>,
    spacing_nm: f64,
}

impl AirspaceGraph {
    /// Lay a regular grid over the corridor bounding box plus the search
    /// margin, excluding points inside the buffered hazard union, and connect
    /// each surviving node to its 8 grid neighbours.
    ///
    /// Edge weight is the segment length plus a penalty growing linearly as
    /// the edge midpoint's hazard clearance falls below the penalty radius,
    /// reaching the base length at zero clearance.
    pub fn build(
        origin: (f64, f64),
        dest: (f64, f64),
        field: &HazardField,
        config: &GridConfig,
    ) -> Self {
        let direct_nm = crate::spatial::planar_distance_nm(origin, dest);
        let mut spacing = if direct_nm > config.widen_beyond_nm {
            config.wide_spacing_nm
        } else {
            config.spacing_nm
        };

        let min_x = origin.0.min(dest.0) - config.margin_nm;
        let max_x = origin.0.max(dest.0) + config.margin_nm;
        let min_y = origin.1.min(dest.1) - config.margin_nm;
        let max_y = origin.1.max(dest.1) + config.margin_nm;

        let mut cols = ((max_x - min_x) / spacing).ceil() as usize + 1;
        let mut rows = ((max_y - min_y) / spacing).ceil() as usize + 1;
        while cols * rows > MAX_GRID_CELLS {
            spacing *= 2.0;
            cols = ((max_x - min_x) / spacing).ceil() as usize + 1;
            rows = ((max_y - min_y) / spacing).ceil() as usize + 1;
        }

        let mut nodes = Vec::new();
        let mut cell_to_node: Vec<Option<u32>> = vec![None; cols * rows];
        for row in 0..rows {
            for col in 0..cols {
                let x = min_x + col as f64 * spacing;
                let y = min_y + row as f64 * spacing;
                // Hard exclusion: hazardous grid points never become nodes.
                if field.contains(x, y) {
                    continue;
                }
                cell_to_node[row * cols + col] = Some(nodes.len() as u32);
                nodes.push(GridNode { x, y });
            }
        }

        let mut adjacency: Vec<Vec<(u32, f64)>> = vec![Vec::new(); nodes.len()];
        // Forward half of the 8-neighbourhood; each edge is inserted once and
        // mirrored into both adjacency lists.
        const OFFSETS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (1, -1)];
        for row in 0..rows {
            for col in 0..cols {
                let Some(a) = cell_to_node[row * cols + col] else {
                    continue;
                };
                for (dc, dr) in OFFSETS {
                    let ncol = col as isize + dc;
                    let nrow = row as isize + dr;
                    if ncol < 0 || nrow < 0 || ncol as usize >= cols || nrow as usize >= rows {
                        continue;
                    }
                    let Some(b) = cell_to_node[nrow as usize * cols + ncol as usize] else {
                        continue;
                    };
                    let weight = edge_weight(nodes[a as usize], nodes[b as usize], field, config);
                    adjacency[a as usize].push((b, weight));
                    adjacency[b as usize].push((a, weight));
                }
            }
        }

        Self {
            nodes,
            adjacency,
            spacing_nm: spacing,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: u32) -> GridNode {
        self.nodes[index as usize]
    }

    pub fn neighbors(&self, index: u32) -> &[(u32, f64)] {
        &self.adjacency[index as usize]
    }

    pub fn spacing_nm(&self) -> f64 {
        self.spacing_nm
    }

    /// Node closest to a planar point, by linear scan.
    pub fn nearest_node(&self, x: f64, y: f64) -> Option<u32> {
        let mut best: Option<(u32, f64)> = None;
        for (index, node) in self.nodes.iter().enumerate() {
            let dx = node.x - x;
            let dy = node.y - y;
            let dist_sq = dx * dx + dy * dy;
            let closer = best.map(|(_, d)| dist_sq < d).unwrap_or(true);
            if closer {
                best = Some((index as u32, dist_sq));
            }
        }
        best.map(|(index, _)| index)
    }
}

fn edge_weight(a: GridNode, b: GridNode, field: &HazardField, config: &GridConfig) -> f64 {
    let base = crate::spatial::planar_distance_nm((a.x, a.y), (b.x, b.y));
    let mid = ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
    let clearance = field.clearance_nm(mid.0, mid.1);
    if clearance < config.penalty_radius_nm {
        base + base * (1.0 - clearance / config.penalty_radius_nm)
    } else {
        base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HazardCategory, HazardSeverity, HazardZone};
    use chrono::Utc;

    fn small_config() -> GridConfig {
        GridConfig {
            spacing_nm: 5.0,
            wide_spacing_nm: 10.0,
            widen_beyond_nm: 1000.0,
            margin_nm: 30.0,
            penalty_radius_nm: 50.0,
        }
    }

    fn empty_field() -> HazardField {
        HazardField::build(&[], Utc::now(), 55.0)
    }

    #[test]
    fn grid_covers_corridor_with_eight_neighbors() {
        let graph = AirspaceGraph::build((0.0, 0.0), (50.0, 0.0), &empty_field(), &small_config());
        assert!(!graph.is_empty());

        // An interior node has all 8 neighbours.
        let center = graph.nearest_node(25.0, 0.0).unwrap();
        assert_eq!(graph.neighbors(center).len(), 8);

        // Without hazards every edge weight is the pure segment length.
        for (neighbor, weight) in graph.neighbors(center) {
            let a = graph.node(center);
            let b = graph.node(*neighbor);
            let dist = crate::spatial::planar_distance_nm((a.x, a.y), (b.x, b.y));
            assert!((weight - dist).abs() < 1e-9);
        }
    }

    #[test]
    fn hazard_nodes_are_excluded() {
        let now = Utc::now();
        let hazard = HazardZone {
            id: "wx1".to_string(),
            polygon: vec![[55.4, -0.7], [55.4, 0.7], [54.6, 0.7], [54.6, -0.7]],
            severity: HazardSeverity::Moderate,
            category: HazardCategory::Weather,
            expires_at: now + chrono::Duration::hours(1),
            wind_speed_kt: None,
            visibility_m: None,
            ceiling_ft: None,
        };
        let field = HazardField::build(&[hazard], now, 55.0);
        let origin = crate::spatial::project(55.0, -2.0, 55.0);
        let dest = crate::spatial::project(55.0, 2.0, 55.0);
        let graph = AirspaceGraph::build(origin, dest, &field, &small_config());

        assert!(!graph.is_empty());
        for index in 0..graph.len() as u32 {
            let node = graph.node(index);
            assert!(
                !field.contains(node.x, node.y),
                "node {index} inside hazard union"
            );
        }
    }

    #[test]
    fn edges_near_hazard_carry_penalty() {
        let now = Utc::now();
        let hazard = HazardZone {
            id: "wx1".to_string(),
            polygon: vec![[55.5, -0.5], [55.5, 0.5], [54.5, 0.5], [54.5, -0.5]],
            severity: HazardSeverity::Light,
            category: HazardCategory::Weather,
            expires_at: now + chrono::Duration::hours(1),
            wind_speed_kt: None,
            visibility_m: None,
            ceiling_ft: None,
        };
        let field = HazardField::build(&[hazard], now, 55.0);
        let origin = crate::spatial::project(55.0, -3.0, 55.0);
        let dest = crate::spatial::project(55.0, 3.0, 55.0);
        let graph = AirspaceGraph::build(origin, dest, &field, &small_config());

        // Find an edge whose midpoint clearance is inside the penalty radius;
        // its weight must exceed its geometric length.
        let mut penalized = 0;
        for index in 0..graph.len() as u32 {
            let a = graph.node(index);
            for (neighbor, weight) in graph.neighbors(index) {
                let b = graph.node(*neighbor);
                let base = crate::spatial::planar_distance_nm((a.x, a.y), (b.x, b.y));
                let mid = ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
                let clearance = field.clearance_nm(mid.0, mid.1);
                if clearance < 50.0 {
                    assert!(*weight > base, "expected penalty on edge near hazard");
                    penalized += 1;
                } else {
                    assert!((weight - base).abs() < 1e-9);
                }
            }
        }
        assert!(penalized > 0);
    }

    #[test]
    fn total_blockage_empties_graph() {
        let now = Utc::now();
        // Hazard far larger than the corridor plus margin.
        let hazard = HazardZone {
            id: "ash".to_string(),
            polygon: vec![[75.0, -40.0], [75.0, 40.0], [35.0, 40.0], [35.0, -40.0]],
            severity: HazardSeverity::Extreme,
            category: HazardCategory::Volcanic,
            expires_at: now + chrono::Duration::hours(6),
            wind_speed_kt: None,
            visibility_m: None,
            ceiling_ft: None,
        };
        let field = HazardField::build(&[hazard], now, 55.0);
        let origin = crate::spatial::project(55.0, -2.0, 55.0);
        let dest = crate::spatial::project(55.0, 2.0, 55.0);
        let graph = AirspaceGraph::build(origin, dest, &field, &small_config());
        assert!(graph.is_empty());
    }
}
