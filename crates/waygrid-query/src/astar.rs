//! Weighted A* search over a navigation grid

use std::collections::HashMap;
use std::sync::Mutex;

use waygrid::{Grid, Heading, NodeRef, NodeState};
use waygrid_common::Vec3;

use crate::heuristic::Heuristic;
use crate::path_cache::PathCache;
use crate::priority_queue::MinQueue;

/// Default multiplier applied to the heuristic estimate.
///
/// Weighting well above 1 trades optimality for speed: the search runs
/// nearly greedy toward the goal and expands far fewer nodes, which is the
/// right trade for frequent queries on dense grids.
pub const DEFAULT_HEURISTIC_WEIGHT: f32 = 8.0;

/// Counters describing how a query was answered
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchStats {
    /// Nodes popped and expanded by the search; zero on a cache hit
    pub nodes_expanded: usize,
    /// True when the path was served from the cache
    pub cache_hit: bool,
}

/// Per-search transient node record
struct SearchNode {
    g: f32,
    parent: Option<NodeRef>,
    closed: bool,
}

/// Path query engine over an immutable grid.
///
/// The engine owns its path cache behind a mutex, so a shared engine can
/// serve queries from multiple threads. The grid itself is borrowed per
/// call and never mutated.
#[derive(Debug, Default)]
pub struct PathEngine {
    cache: Mutex<PathCache>,
}

impl PathEngine {
    /// Creates an engine with an empty path cache
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(PathCache::new()),
        }
    }

    /// Finds a path with the default heuristic and weight.
    ///
    /// Returns node-center waypoints from the start node to the end node
    /// inclusive, or an empty vector when either endpoint misses the grid
    /// or no connected route exists.
    pub fn find_path(&self, grid: &Grid, start: Vec3, end: Vec3) -> Vec<Vec3> {
        self.find_path_with(grid, start, end, Heuristic::default(), DEFAULT_HEURISTIC_WEIGHT)
    }

    /// Finds a path with an explicit heuristic and weight
    pub fn find_path_with(
        &self,
        grid: &Grid,
        start: Vec3,
        end: Vec3,
        heuristic: Heuristic,
        weight: f32,
    ) -> Vec<Vec3> {
        self.find_path_with_stats(grid, start, end, heuristic, weight).0
    }

    /// Finds a path and reports how the query was answered
    pub fn find_path_with_stats(
        &self,
        grid: &Grid,
        start: Vec3,
        end: Vec3,
        heuristic: Heuristic,
        weight: f32,
    ) -> (Vec<Vec3>, SearchStats) {
        let mut stats = SearchStats::default();

        let (Some(start_ref), Some(end_ref)) = (grid.find_node(start), grid.find_node(end))
        else {
            return (Vec::new(), stats);
        };

        {
            let cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            if let Some(entry) = cache.get(start_ref, end_ref) {
                stats.cache_hit = true;
                return (entry.waypoints.clone(), stats);
            }
        }

        let waypoints = search(grid, start_ref, end_ref, heuristic, weight, &mut stats);

        if !waypoints.is_empty() {
            let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
            cache.insert(start_ref, end_ref, waypoints.clone());
        }

        (waypoints, stats)
    }

    /// Drops every cached path
    pub fn clear_cache(&self) {
        self.cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

fn search(
    grid: &Grid,
    start_ref: NodeRef,
    end_ref: NodeRef,
    heuristic: Heuristic,
    weight: f32,
    stats: &mut SearchStats,
) -> Vec<Vec3> {
    let Some(end_node) = grid.node(end_ref) else {
        return Vec::new();
    };
    let end_center = end_node.center;

    let mut records: HashMap<NodeRef, SearchNode> = HashMap::new();
    let mut open = MinQueue::with_capacity(64);

    records.insert(
        start_ref,
        SearchNode {
            g: 0.0,
            parent: None,
            closed: false,
        },
    );
    if let Some(start_node) = grid.node(start_ref) {
        open.push(weight * heuristic.estimate(start_node.center, end_center), start_ref);
    }

    while let Some((_, current_ref)) = open.pop() {
        let current_g = match records.get_mut(&current_ref) {
            // Stale heap entry for a node that was already expanded.
            Some(record) if record.closed => continue,
            Some(record) => {
                record.closed = true;
                record.g
            }
            None => continue,
        };

        if current_ref == end_ref {
            return reconstruct(grid, &records, end_ref);
        }
        stats.nodes_expanded += 1;

        let Some(current_node) = grid.node(current_ref) else {
            continue;
        };

        for heading in Heading::ALL {
            let Some(neighbor_ref) = current_node.neighbor(heading) else {
                continue;
            };
            let Some(neighbor) = grid.node(neighbor_ref) else {
                continue;
            };
            if neighbor.state == NodeState::Closed {
                continue;
            }

            // Movement is costed by terrain difficulty alone; hop length is
            // uniform on the lattice and the heuristic handles direction.
            let tentative = current_g + neighbor.cost;

            match records.get_mut(&neighbor_ref) {
                // Closed nodes are never re-expanded, even when a cheaper
                // route to them turns up later.
                Some(record) if record.closed || tentative >= record.g => continue,
                Some(record) => {
                    record.g = tentative;
                    record.parent = Some(current_ref);
                }
                None => {
                    records.insert(
                        neighbor_ref,
                        SearchNode {
                            g: tentative,
                            parent: Some(current_ref),
                            closed: false,
                        },
                    );
                }
            }

            let f = tentative + weight * heuristic.estimate(neighbor.center, end_center);
            open.push(f, neighbor_ref);
        }
    }

    Vec::new()
}

fn reconstruct(grid: &Grid, records: &HashMap<NodeRef, SearchNode>, end_ref: NodeRef) -> Vec<Vec3> {
    let mut waypoints = Vec::new();
    let mut cursor = Some(end_ref);

    while let Some(node_ref) = cursor {
        let Some(node) = grid.node(node_ref) else {
            break;
        };
        waypoints.push(node.center);
        cursor = records.get(&node_ref).and_then(|r| r.parent);
    }

    waypoints.reverse();
    waypoints
}
