//! Grid node, heading and node reference types
//!
//! Nodes are quad footprints on the XZ plane (Y-up, north = +Z, east = +X)
//! with up to 8 neighbors stored in a fixed heading-indexed array, so “fully
//! connected” is a constant-time slot-occupancy check.

use waygrid_common::Vec3;

/// Reference to a node inside a [`Grid`](crate::Grid)
///
/// References are only valid against the grid that produced them; a rebuild
/// produces an entirely new node set and invalidates all previous references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(u32);

impl NodeRef {
    /// Creates a new node reference from a raw index
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// The raw index of the referenced node
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One of the 8 compass directions indexing a node's neighbors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Heading {
    /// All headings in index order
    pub const ALL: [Heading; 8] = [
        Heading::North,
        Heading::NorthEast,
        Heading::East,
        Heading::SouthEast,
        Heading::South,
        Heading::SouthWest,
        Heading::West,
        Heading::NorthWest,
    ];

    /// Neighbor-slot index of this heading
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The reverse compass direction
    pub fn opposite(self) -> Heading {
        match self {
            Heading::North => Heading::South,
            Heading::NorthEast => Heading::SouthWest,
            Heading::East => Heading::West,
            Heading::SouthEast => Heading::NorthWest,
            Heading::South => Heading::North,
            Heading::SouthWest => Heading::NorthEast,
            Heading::West => Heading::East,
            Heading::NorthWest => Heading::SouthEast,
        }
    }
}

/// Persisted node state tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeState {
    /// State has not been assigned
    #[default]
    Unset,
    /// Node is open for traversal
    Clear,
    /// Node is blocked
    Closed,
}

impl NodeState {
    /// Byte encoding used by the grid file format
    pub fn to_u8(self) -> u8 {
        match self {
            NodeState::Unset => 0,
            NodeState::Clear => 1,
            NodeState::Closed => 2,
        }
    }

    /// Decodes the grid file byte encoding
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(NodeState::Unset),
            1 => Some(NodeState::Clear),
            2 => Some(NodeState::Closed),
            _ => None,
        }
    }
}

/// A quad-footprint node of the navigation grid
///
/// The four corners span an XZ-plane rectangle but may differ in height.
/// Search-time open/closed bookkeeping is held in per-search transient state,
/// never on the node itself.
#[derive(Debug, Clone)]
pub struct GridNode {
    /// Corner at max X, max Z
    pub north_east: Vec3,
    /// Corner at min X, max Z
    pub north_west: Vec3,
    /// Corner at min X, min Z
    pub south_west: Vec3,
    /// Corner at max X, min Z
    pub south_east: Vec3,
    /// Average of the four corners
    pub center: Vec3,
    /// Traversal cost: angle in radians between world-up and the averaged
    /// normal of the contributing triangles
    pub cost: f32,
    /// Persisted state tag
    pub state: NodeState,
    neighbors: [Option<NodeRef>; 8],
}

impl GridNode {
    /// Creates a node from its four corners and traversal cost
    pub fn new(
        north_east: Vec3,
        north_west: Vec3,
        south_west: Vec3,
        south_east: Vec3,
        cost: f32,
    ) -> Self {
        let center = (north_east + north_west + south_west + south_east) / 4.0;
        Self {
            north_east,
            north_west,
            south_west,
            south_east,
            center,
            cost,
            state: NodeState::Unset,
            neighbors: [None; 8],
        }
    }

    /// The neighbor linked in the given heading, if any
    #[inline]
    pub fn neighbor(&self, heading: Heading) -> Option<NodeRef> {
        self.neighbors[heading.index()]
    }

    /// Links a neighbor in the given heading slot
    #[inline]
    pub fn set_neighbor(&mut self, heading: Heading, node: NodeRef) {
        self.neighbors[heading.index()] = Some(node);
    }

    /// All 8 heading-indexed neighbor slots
    pub fn neighbors(&self) -> &[Option<NodeRef>; 8] {
        &self.neighbors
    }

    /// Number of occupied neighbor slots
    pub fn neighbor_count(&self) -> usize {
        self.neighbors.iter().filter(|n| n.is_some()).count()
    }

    /// True when every heading slot is occupied
    pub fn is_fully_connected(&self) -> bool {
        self.neighbors.iter().all(Option::is_some)
    }

    /// Point-containment test against the node's SW..NE footprint rectangle
    pub fn contains_xz(&self, point: Vec3) -> bool {
        point.x >= self.south_west.x
            && point.x <= self.north_east.x
            && point.z >= self.south_west.z
            && point.z <= self.north_east.z
    }
}
