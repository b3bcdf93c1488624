//! Grid builder: turns sampled columns into a connected node set
//!
//! Every 2x2 neighborhood of lattice columns can contribute nodes. Columns of
//! depth one produce exactly one quad; columns of differing depths (bridges
//! over floors) are walked layer by layer, clamping shallower stacks to their
//! last hit, and a layer only becomes a node when its vertical spread stays
//! within one cell, so unrelated layers never get paired into a quad.

use std::collections::HashMap;

use waygrid_common::{content_hash, points_eq, Error, Result, Triangle, Vec3};

use crate::context::{BuildContext, LogLevel, TimerCategory};
use crate::grid::Grid;
use crate::node::{GridNode, Heading, NodeRef};
use crate::sampler::{sample_columns, CollisionSample, ColumnLattice};
use crate::settings::GridSettings;

/// Corner coincidence tolerance for adjacency inference
const CORNER_EPS: f32 = 1e-3;

/// Builder for walkable-surface grid generation
#[derive(Debug, Clone)]
pub struct GridBuilder {
    settings: GridSettings,
}

impl GridBuilder {
    /// Creates a new builder with the specified settings
    pub fn new(settings: GridSettings) -> Self {
        Self { settings }
    }

    /// Gets a reference to the settings
    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Builds a grid from the input triangle soup
    pub fn build(&self, triangles: &[Triangle]) -> Result<Grid> {
        let mut ctx = BuildContext::new();
        self.build_with_context(triangles, &mut ctx)
    }

    /// Builds a grid, recording logs and timings into `ctx`
    pub fn build_with_context(
        &self,
        triangles: &[Triangle],
        ctx: &mut BuildContext,
    ) -> Result<Grid> {
        self.settings.validate()?;

        for (idx, tri) in triangles.iter().enumerate() {
            if !tri.is_finite() {
                return Err(Error::InvalidGeometry(format!(
                    "triangle {idx} has a non-finite vertex"
                )));
            }
        }

        ctx.start_timer(TimerCategory::Total);

        ctx.start_timer(TimerCategory::Sampling);
        let lattice = sample_columns(triangles, &self.settings);
        ctx.stop_timer(TimerCategory::Sampling);

        ctx.start_timer(TimerCategory::NodeGeneration);
        let mut nodes = generate_nodes(&lattice, triangles, &self.settings);
        ctx.stop_timer(TimerCategory::NodeGeneration);

        ctx.start_timer(TimerCategory::Adjacency);
        link_neighbors(&mut nodes, self.settings.cell_size);
        ctx.stop_timer(TimerCategory::Adjacency);

        ctx.stop_timer(TimerCategory::Total);
        ctx.log(
            LogLevel::Info,
            format!(
                "generated {} nodes from a {}x{} column lattice",
                nodes.len(),
                lattice.columns_x(),
                lattice.columns_z()
            ),
        );

        let hash = geometry_hash(triangles, &self.settings);
        Ok(Grid::new(nodes, self.settings, hash))
    }

    /// Offloads the whole synchronous build to a blocking task.
    ///
    /// The builder is consumed so a caller cannot run two builds against the
    /// same settings concurrently.
    pub async fn build_async(self, triangles: Vec<Triangle>) -> Result<Grid> {
        tokio::task::spawn_blocking(move || self.build(&triangles))
            .await
            .map_err(|e| Error::Background(e.to_string()))?
    }
}

/// Content hash of a geometry snapshot under the given settings.
///
/// Matches the hash embedded in grids built from the same inputs, so callers
/// can decide whether a persisted grid is still usable.
pub fn geometry_hash(triangles: &[Triangle], settings: &GridSettings) -> String {
    content_hash(triangles, &settings.digest_bytes())
}

/// Emits quad nodes from every 2x2 column neighborhood
fn generate_nodes(
    lattice: &ColumnLattice,
    triangles: &[Triangle],
    settings: &GridSettings,
) -> Vec<GridNode> {
    let mut nodes = Vec::new();
    if lattice.columns_x() < 2 || lattice.columns_z() < 2 {
        return nodes;
    }

    for cz in 0..lattice.columns_z() - 1 {
        for cx in 0..lattice.columns_x() - 1 {
            let stacks = [
                lattice.stack(cx, cz),
                lattice.stack(cx + 1, cz),
                lattice.stack(cx, cz + 1),
                lattice.stack(cx + 1, cz + 1),
            ];

            // A hole or obstacle void: no footprint here.
            if stacks.iter().any(|s| s.is_empty()) {
                continue;
            }

            if stacks.iter().all(|s| s.len() == 1) {
                let layer = [stacks[0][0], stacks[1][0], stacks[2][0], stacks[3][0]];
                if let Some(node) = emit_node(&layer, triangles, settings) {
                    nodes.push(node);
                }
                continue;
            }

            // Multi-layer case: walk layers to the deepest stack, clamping
            // shallower stacks to their last hit.
            let depth = stacks.iter().map(|s| s.len()).max().unwrap_or(0);
            for i in 0..depth {
                let layer = [
                    clamped(stacks[0], i),
                    clamped(stacks[1], i),
                    clamped(stacks[2], i),
                    clamped(stacks[3], i),
                ];

                let max_y = layer.iter().map(|s| s.point.y).fold(f32::MIN, f32::max);
                let min_y = layer.iter().map(|s| s.point.y).fold(f32::MAX, f32::min);
                if max_y - min_y > settings.cell_size {
                    // Spurious pairing of unrelated layers.
                    continue;
                }

                if let Some(node) = emit_node(&layer, triangles, settings) {
                    nodes.push(node);
                }
            }
        }
    }

    nodes
}

#[inline]
fn clamped(stack: &[CollisionSample], i: usize) -> CollisionSample {
    stack[i.min(stack.len() - 1)]
}

/// Builds a node from four corner samples, or nothing when corner roles stay
/// ambiguous or the surface is steeper than the accepted inclination
fn emit_node(
    layer: &[CollisionSample; 4],
    triangles: &[Triangle],
    settings: &GridSettings,
) -> Option<GridNode> {
    let (north_east, north_west, south_west, south_east) =
        assign_corners([layer[0].point, layer[1].point, layer[2].point, layer[3].point])?;

    let cost = surface_inclination(layer, triangles);
    if cost > settings.max_inclination {
        return None;
    }

    Some(GridNode::new(
        north_east, north_west, south_west, south_east, cost,
    ))
}

/// Angle in radians between world-up and the averaged normal of the four
/// contributing triangles. Normals are flipped upward first so the winding
/// order of the source geometry does not matter.
fn surface_inclination(layer: &[CollisionSample; 4], triangles: &[Triangle]) -> f32 {
    let mut sum = Vec3::ZERO;
    for sample in layer {
        let mut n = triangles[sample.triangle].normal();
        if n.y < 0.0 {
            n = -n;
        }
        sum += n;
    }

    let avg = sum.normalize_or_zero();
    if avg == Vec3::ZERO {
        return std::f32::consts::FRAC_PI_2;
    }
    avg.y.clamp(-1.0, 1.0).acos()
}

/// Assigns NE/NW/SW/SE roles by matching each point against the quad's own
/// min/max X and Z extents.
///
/// Roles are claimed in the fixed order NE, NW, SW, SE and the first
/// unassigned point satisfying a role's predicate wins; on a degenerate quad
/// (zero extent on an axis) the predicates overlap and this ordering alone
/// decides. Returns `None` when any role stays unmatched.
fn assign_corners(points: [Vec3; 4]) -> Option<(Vec3, Vec3, Vec3, Vec3)> {
    let min_x = points.iter().map(|p| p.x).fold(f32::MAX, f32::min);
    let max_x = points.iter().map(|p| p.x).fold(f32::MIN, f32::max);
    let min_z = points.iter().map(|p| p.z).fold(f32::MAX, f32::min);
    let max_z = points.iter().map(|p| p.z).fold(f32::MIN, f32::max);

    let matches = |value: f32, bound: f32| (value - bound).abs() <= CORNER_EPS;
    let mut taken = [false; 4];

    let mut claim = |want_x: f32, want_z: f32| -> Option<Vec3> {
        for (i, p) in points.iter().enumerate() {
            if !taken[i] && matches(p.x, want_x) && matches(p.z, want_z) {
                taken[i] = true;
                return Some(*p);
            }
        }
        None
    };

    let north_east = claim(max_x, max_z)?;
    let north_west = claim(min_x, max_z)?;
    let south_west = claim(min_x, min_z)?;
    let south_east = claim(max_x, min_z)?;

    Some((north_east, north_west, south_west, south_east))
}

/// Wires 8-directional adjacency between nodes with coincident footprint
/// corners.
///
/// Nodes are bucketed by lattice cell so only same-and-neighboring buckets
/// are compared; linking is symmetric (heading plus its opposite) and
/// idempotent, and pairs where either side is already fully connected are
/// skipped.
pub(crate) fn link_neighbors(nodes: &mut [GridNode], cell_size: f32) {
    let mut buckets: HashMap<(i32, i32), Vec<usize>> = HashMap::new();
    for (i, node) in nodes.iter().enumerate() {
        buckets
            .entry(bucket_key(node.center, cell_size))
            .or_default()
            .push(i);
    }

    for (&(bx, bz), members) in &buckets {
        for &i in members {
            for dz in -1..=1 {
                for dx in -1..=1 {
                    let Some(others) = buckets.get(&(bx + dx, bz + dz)) else {
                        continue;
                    };
                    for &j in others {
                        // Each unordered pair exactly once.
                        if j <= i {
                            continue;
                        }
                        if nodes[i].is_fully_connected() || nodes[j].is_fully_connected() {
                            continue;
                        }
                        let Some(heading) = heading_between(&nodes[i], &nodes[j]) else {
                            continue;
                        };
                        if nodes[i].neighbor(heading).is_none() {
                            nodes[i].set_neighbor(heading, NodeRef::new(j as u32));
                        }
                        let opposite = heading.opposite();
                        if nodes[j].neighbor(opposite).is_none() {
                            nodes[j].set_neighbor(opposite, NodeRef::new(i as u32));
                        }
                    }
                }
            }
        }
    }
}

#[inline]
fn bucket_key(center: Vec3, cell_size: f32) -> (i32, i32) {
    (
        (center.x / cell_size).floor() as i32,
        (center.z / cell_size).floor() as i32,
    )
}

/// The heading from `a` towards `b` when their footprints share corners.
///
/// Cardinal neighbors share an edge (two corners), diagonal neighbors a
/// single corner. Corners are compared in full 3D so stacked layers over the
/// same column never link.
fn heading_between(a: &GridNode, b: &GridNode) -> Option<Heading> {
    let eq = |p: &Vec3, q: &Vec3| points_eq(p, q, CORNER_EPS);

    if eq(&a.north_east, &b.south_east) && eq(&a.north_west, &b.south_west) {
        Some(Heading::North)
    } else if eq(&a.south_east, &b.north_east) && eq(&a.south_west, &b.north_west) {
        Some(Heading::South)
    } else if eq(&a.north_east, &b.north_west) && eq(&a.south_east, &b.south_west) {
        Some(Heading::East)
    } else if eq(&a.north_west, &b.north_east) && eq(&a.south_west, &b.south_east) {
        Some(Heading::West)
    } else if eq(&a.north_east, &b.south_west) {
        Some(Heading::NorthEast)
    } else if eq(&a.north_west, &b.south_east) {
        Some(Heading::NorthWest)
    } else if eq(&a.south_east, &b.north_west) {
        Some(Heading::SouthEast)
    } else if eq(&a.south_west, &b.north_east) {
        Some(Heading::SouthWest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_at(x: f32, z: f32, y: f32) -> GridNode {
        GridNode::new(
            Vec3::new(x + 1.0, y, z + 1.0),
            Vec3::new(x, y, z + 1.0),
            Vec3::new(x, y, z),
            Vec3::new(x + 1.0, y, z),
            0.0,
        )
    }

    #[test]
    fn test_assign_corners_roles() {
        let (ne, nw, sw, se) = assign_corners([
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.5, 0.0),
            Vec3::new(0.0, 0.2, 1.0),
            Vec3::new(1.0, 0.7, 1.0),
        ])
        .unwrap();

        assert_eq!(ne, Vec3::new(1.0, 0.7, 1.0));
        assert_eq!(nw, Vec3::new(0.0, 0.2, 1.0));
        assert_eq!(sw, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(se, Vec3::new(1.0, 0.5, 0.0));
    }

    #[test]
    fn test_assign_corners_degenerate_quad_uses_claim_order() {
        // Zero extent along X: every point matches both min and max X, so
        // the fixed NE, NW, SW, SE claim order decides.
        let quad = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
        ];
        let (ne, nw, sw, se) = assign_corners(quad).unwrap();
        assert_eq!(ne.z, 1.0);
        assert_eq!(nw.z, 1.0);
        assert_eq!(sw.z, 0.0);
        assert_eq!(se.z, 0.0);
    }

    #[test]
    fn test_heading_between_cardinals_and_diagonals() {
        let a = node_at(0.0, 0.0, 0.0);
        assert_eq!(
            heading_between(&a, &node_at(0.0, 1.0, 0.0)),
            Some(Heading::North)
        );
        assert_eq!(
            heading_between(&a, &node_at(1.0, 0.0, 0.0)),
            Some(Heading::East)
        );
        assert_eq!(
            heading_between(&a, &node_at(1.0, 1.0, 0.0)),
            Some(Heading::NorthEast)
        );
        assert_eq!(
            heading_between(&a, &node_at(-1.0, -1.0, 0.0)),
            Some(Heading::SouthWest)
        );
        assert_eq!(heading_between(&a, &node_at(2.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_heading_between_rejects_stacked_layers() {
        let floor = node_at(0.0, 0.0, 0.0);
        let bridge_next_door = node_at(1.0, 0.0, 20.0);
        assert_eq!(heading_between(&floor, &bridge_next_door), None);
    }

    #[test]
    fn test_link_neighbors_symmetry() {
        let mut nodes = vec![
            node_at(0.0, 0.0, 0.0),
            node_at(1.0, 0.0, 0.0),
            node_at(0.0, 1.0, 0.0),
            node_at(1.0, 1.0, 0.0),
        ];
        link_neighbors(&mut nodes, 1.0);

        for (i, node) in nodes.iter().enumerate() {
            for heading in Heading::ALL {
                if let Some(other) = node.neighbor(heading) {
                    let back = nodes[other.index()].neighbor(heading.opposite());
                    assert_eq!(back, Some(NodeRef::new(i as u32)));
                }
            }
        }

        // 2x2 block: every node sees the other three.
        for node in &nodes {
            assert_eq!(node.neighbor_count(), 3);
        }
    }

    #[test]
    fn test_link_neighbors_is_idempotent() {
        let mut nodes = vec![node_at(0.0, 0.0, 0.0), node_at(1.0, 0.0, 0.0)];
        link_neighbors(&mut nodes, 1.0);
        let before: Vec<_> = nodes.iter().map(|n| *n.neighbors()).collect();
        link_neighbors(&mut nodes, 1.0);
        let after: Vec<_> = nodes.iter().map(|n| *n.neighbors()).collect();
        assert_eq!(before, after);
    }
}
