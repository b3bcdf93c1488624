//! Read-after-build grid container and spatial point queries

use waygrid_common::Vec3;

use crate::node::{GridNode, NodeRef};
use crate::settings::GridSettings;

/// Immutable-after-build container of grid nodes plus generation settings
///
/// A grid is built once per geometry snapshot; rebuilding produces an
/// entirely new node set, so node references and any caches keyed on them
/// must be discarded together with the old grid. Structure is read-only
/// after build and safe for concurrent queries.
#[derive(Debug, Clone)]
pub struct Grid {
    nodes: Vec<GridNode>,
    settings: GridSettings,
    content_hash: String,
}

impl Grid {
    pub(crate) fn new(nodes: Vec<GridNode>, settings: GridSettings, content_hash: String) -> Self {
        Self {
            nodes,
            settings,
            content_hash,
        }
    }

    /// Read-only view of all nodes
    pub fn nodes(&self) -> &[GridNode] {
        &self.nodes
    }

    /// Resolves a node reference
    pub fn node(&self, node_ref: NodeRef) -> Option<&GridNode> {
        self.nodes.get(node_ref.index())
    }

    /// The settings the grid was generated with
    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    /// Content hash of the source geometry and settings
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Finds the node whose XZ footprint contains `point`.
    ///
    /// When several footprints contain the point (stacked surface layers),
    /// the node with the smallest squared distance from `point` to its
    /// center wins, which selects the layer nearest in height.
    pub fn find_node(&self, point: Vec3) -> Option<NodeRef> {
        let mut best: Option<(usize, f32)> = None;

        for (i, node) in self.nodes.iter().enumerate() {
            if !node.contains_xz(point) {
                continue;
            }
            let d = point.distance_squared(node.center);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((i, d)),
            }
        }

        best.map(|(i, _)| NodeRef::new(i as u32))
    }

    /// True when `point` lies on some node's footprint
    pub fn is_walkable(&self, point: Vec3) -> bool {
        self.find_node(point).is_some()
    }

    /// The center of the node containing `point`, if any
    pub fn walkable_center(&self, point: Vec3) -> Option<Vec3> {
        self.find_node(point)
            .and_then(|r| self.node(r))
            .map(|n| n.center)
    }

    /// Extension point for dynamic obstacles. Does nothing; dynamic
    /// obstacles are not supported by this design.
    pub fn add_obstacle(&mut self, _min: Vec3, _max: Vec3) {}

    /// Extension point for dynamic obstacles. Does nothing; dynamic
    /// obstacles are not supported by this design.
    pub fn remove_obstacle(&mut self, _min: Vec3, _max: Vec3) {}

    /// Extension point for manual node connections (off-grid links).
    /// Does nothing.
    pub fn add_connection(&mut self, _from: Vec3, _to: Vec3) {}

    /// Extension point for localized re-generation around a position.
    /// Does nothing; rebuild the whole grid instead.
    pub fn update_at(&mut self, _position: Vec3) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::GridNode;

    fn node_at(x: f32, z: f32, y: f32) -> GridNode {
        GridNode::new(
            Vec3::new(x + 1.0, y, z + 1.0),
            Vec3::new(x, y, z + 1.0),
            Vec3::new(x, y, z),
            Vec3::new(x + 1.0, y, z),
            0.0,
        )
    }

    fn two_layer_grid() -> Grid {
        Grid::new(
            vec![node_at(0.0, 0.0, 0.0), node_at(0.0, 0.0, 20.0)],
            GridSettings::default(),
            "test".to_string(),
        )
    }

    #[test]
    fn test_find_node_selects_nearest_layer() {
        let grid = two_layer_grid();

        let on_floor = grid.find_node(Vec3::new(0.5, 0.0, 0.5)).unwrap();
        assert_eq!(on_floor.index(), 0);

        let on_bridge = grid.find_node(Vec3::new(0.5, 19.0, 0.5)).unwrap();
        assert_eq!(on_bridge.index(), 1);
    }

    #[test]
    fn test_find_node_outside_every_footprint() {
        let grid = two_layer_grid();
        assert_eq!(grid.find_node(Vec3::new(5.0, 0.0, 5.0)), None);
        assert!(!grid.is_walkable(Vec3::new(5.0, 0.0, 5.0)));
    }

    #[test]
    fn test_walkable_center() {
        let grid = two_layer_grid();
        assert_eq!(
            grid.walkable_center(Vec3::new(0.25, 0.0, 0.25)),
            Some(Vec3::new(0.5, 0.0, 0.5))
        );
        assert_eq!(grid.walkable_center(Vec3::new(9.0, 0.0, 9.0)), None);
    }

    #[test]
    fn test_obstacle_stubs_do_not_mutate() {
        let mut grid = two_layer_grid();
        let before = grid.nodes().len();
        grid.add_obstacle(Vec3::ZERO, Vec3::ONE);
        grid.remove_obstacle(Vec3::ZERO, Vec3::ONE);
        grid.add_connection(Vec3::ZERO, Vec3::ONE);
        grid.update_at(Vec3::ZERO);
        assert_eq!(grid.nodes().len(), before);
        assert!(grid.is_walkable(Vec3::new(0.5, 0.0, 0.5)));
    }
}
