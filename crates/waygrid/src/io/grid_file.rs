//! Flattened serializable projection of a grid
//!
//! Adjacency is not persisted; the loader re-runs the deterministic
//! neighbor-wiring pass over the restored corner data.

use serde::{Deserialize, Serialize};
use waygrid_common::{Error, Result, Vec3};

use crate::builder::link_neighbors;
use crate::grid::Grid;
use crate::node::{GridNode, NodeState};
use crate::settings::GridSettings;

/// One node as a flat corner/center/cost/state tuple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub state: u8,
    pub cost: f32,
    pub north_east: [f32; 3],
    pub north_west: [f32; 3],
    pub south_west: [f32; 3],
    pub south_east: [f32; 3],
    pub center: [f32; 3],
}

impl NodeRecord {
    fn from_node(node: &GridNode) -> Self {
        Self {
            state: node.state.to_u8(),
            cost: node.cost,
            north_east: node.north_east.to_array(),
            north_west: node.north_west.to_array(),
            south_west: node.south_west.to_array(),
            south_east: node.south_east.to_array(),
            center: node.center.to_array(),
        }
    }

    fn into_node(self) -> Result<GridNode> {
        let state = NodeState::from_u8(self.state).ok_or_else(|| {
            Error::CorruptGridFile(format!("unknown node state tag {}", self.state))
        })?;

        let mut node = GridNode::new(
            Vec3::from_array(self.north_east),
            Vec3::from_array(self.north_west),
            Vec3::from_array(self.south_west),
            Vec3::from_array(self.south_east),
            self.cost,
        );
        node.state = state;
        Ok(node)
    }
}

/// The serializable bundle written to a grid file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFile {
    pub settings: GridSettings,
    pub nodes: Vec<NodeRecord>,
    pub content_hash: String,
}

impl GridFile {
    /// Flattens a grid into its persisted projection
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            settings: *grid.settings(),
            nodes: grid.nodes().iter().map(NodeRecord::from_node).collect(),
            content_hash: grid.content_hash().to_string(),
        }
    }

    /// Restores a grid, re-deriving adjacency from the corner data
    pub fn into_grid(self) -> Result<Grid> {
        self.settings.validate()?;

        let mut nodes = self
            .nodes
            .into_iter()
            .map(NodeRecord::into_node)
            .collect::<Result<Vec<_>>>()?;
        link_neighbors(&mut nodes, self.settings.cell_size);

        Ok(Grid::new(nodes, self.settings, self.content_hash))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_record_rejects_bad_state() {
        let record = NodeRecord {
            state: 9,
            cost: 0.0,
            north_east: [1.0, 0.0, 1.0],
            north_west: [0.0, 0.0, 1.0],
            south_west: [0.0, 0.0, 0.0],
            south_east: [1.0, 0.0, 0.0],
            center: [0.5, 0.0, 0.5],
        };
        assert!(matches!(
            record.into_node(),
            Err(Error::CorruptGridFile(_))
        ));
    }
}
