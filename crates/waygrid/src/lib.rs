//! Waygrid component for walkable-surface grid generation
//!
//! Waygrid turns arbitrary 3D triangle geometry into a lattice of connected
//! quad nodes suitable for pathfinding. Vertical raycasts sample the geometry
//! per lattice column (supporting multi-layer surfaces such as bridges over
//! floors), 2x2 column neighborhoods are promoted to quad nodes, and shared
//! quad corners wire up 8-directional adjacency.

mod builder;
mod context;
mod grid;
mod node;
mod sampler;
mod settings;

pub mod io;


pub use builder::{geometry_hash, GridBuilder};
pub use context::{BuildContext, LogEntry, LogLevel, TimerCategory};
pub use grid::Grid;
pub use node::{GridNode, Heading, NodeRef, NodeState};
pub use settings::GridSettings;
