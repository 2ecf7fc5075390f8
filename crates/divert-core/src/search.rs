//! A* path search over the airspace graph, plus line-of-sight path
//! simplification.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::graph::AirspaceGraph;
use crate::hazard::HazardField;
use crate::spatial::planar_distance_nm;

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    f_score: FloatOrd,
    g_score: FloatOrd,
    node: u32,
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.g_score.cmp(&other.g_score))
            .then_with(|| self.node.cmp(&other.node))
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Node indices from start to goal, inclusive
    pub path: Vec<u32>,
    /// Sum of edge weights along the path
    pub cost: f64,
    pub nodes_visited: usize,
}

/// A* between two graph nodes with the straight-line distance to the goal as
/// heuristic. Admissible because every edge weight is at least its segment
/// length.
///
/// Equal-cost candidates are ordered by f-score, then g-score, then node
/// index, so results are reproducible across runs.
///
/// Returns `None` when the corridor is blocked (no path exists).
pub fn find_path(graph: &AirspaceGraph, start: u32, goal: u32) -> Option<SearchResult> {
    let node_count = graph.len();
    let goal_node = graph.node(goal);
    let heuristic = |index: u32| {
        let node = graph.node(index);
        planar_distance_nm((node.x, node.y), (goal_node.x, goal_node.y))
    };

    let mut g_score = vec![f64::INFINITY; node_count];
    let mut came_from: Vec<u32> = vec![u32::MAX; node_count];
    let mut closed = vec![false; node_count];
    let mut open: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();

    g_score[start as usize] = 0.0;
    open.push(Reverse(OpenNode {
        f_score: FloatOrd(heuristic(start)),
        g_score: FloatOrd(0.0),
        node: start,
    }));

    let mut nodes_visited = 0usize;

    while let Some(Reverse(current)) = open.pop() {
        if closed[current.node as usize] {
            continue;
        }
        let best_g = g_score[current.node as usize];
        if current.g_score.0 > best_g + 1e-9 {
            continue;
        }
        closed[current.node as usize] = true;
        nodes_visited += 1;

        if current.node == goal {
            let mut path = Vec::new();
            let mut node = goal;
            loop {
                path.push(node);
                if node == start {
                    break;
                }
                node = came_from[node as usize];
            }
            path.reverse();
            return Some(SearchResult {
                path,
                cost: best_g,
                nodes_visited,
            });
        }

        for &(neighbor, weight) in graph.neighbors(current.node) {
            if closed[neighbor as usize] {
                continue;
            }
            let tentative_g = best_g + weight;
            if tentative_g < g_score[neighbor as usize] {
                g_score[neighbor as usize] = tentative_g;
                came_from[neighbor as usize] = current.node;
                open.push(Reverse(OpenNode {
                    f_score: FloatOrd(tentative_g + heuristic(neighbor)),
                    g_score: FloatOrd(tentative_g),
                    node: neighbor,
                }));
            }
        }
    }

    None
}

/// Collapse a dense grid path into corner waypoints by string pulling.
///
/// A later point replaces the intermediate run when the straight segment to
/// it stays clear of the buffered hazard union and is no longer than
/// `max_leg_nm`. Corners closer than `min_leg_nm` are merged so downstream
/// per-segment duration bounds stay satisfiable.
pub fn simplify_path(
    points: &[(f64, f64)],
    field: &HazardField,
    max_leg_nm: f64,
    min_leg_nm: f64,
) -> Vec<(f64, f64)> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut out = vec![points[0]];
    let mut current = 0usize;
    while current < points.len() - 1 {
        let mut furthest = current + 1;
        for target in (current + 2)..points.len() {
            if planar_distance_nm(points[current], points[target]) > max_leg_nm {
                break;
            }
            if segment_is_clear(points[current], points[target], field) {
                furthest = target;
            }
        }
        out.push(points[furthest]);
        current = furthest;
    }

    // Merge corners that landed too close together; the final point always
    // survives.
    let mut merged: Vec<(f64, f64)> = vec![out[0]];
    for (i, &point) in out.iter().enumerate().skip(1) {
        let last = merged[merged.len() - 1];
        if planar_distance_nm(last, point) >= min_leg_nm || i == out.len() - 1 {
            merged.push(point);
        }
    }
    if merged.len() >= 3 {
        let last = merged[merged.len() - 1];
        let prev = merged[merged.len() - 2];
        if planar_distance_nm(prev, last) < min_leg_nm {
            merged.remove(merged.len() - 2);
        }
    }
    merged
}

fn segment_is_clear(a: (f64, f64), b: (f64, f64), field: &HazardField) -> bool {
    if field.is_empty() {
        return true;
    }
    let length = planar_distance_nm(a, b);
    let steps = ((length / 2.0).ceil() as usize).clamp(1, 500);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let x = a.0 + t * (b.0 - a.0);
        let y = a.1 + t * (b.1 - a.1);
        if field.contains(x, y) {
            return false;
        }
    }
    true
}
