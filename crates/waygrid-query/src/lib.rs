//! Waygrid query component: heuristic search over built grids
//!
//! Pathfinding reads a grid's read-only structure, so any number of engines
//! and threads may query the same grid concurrently; each engine owns its
//! bounded FIFO path cache behind a lock.

mod astar;
mod heuristic;
mod path_cache;
mod priority_queue;


pub use astar::{PathEngine, SearchStats, DEFAULT_HEURISTIC_WEIGHT};
pub use heuristic::Heuristic;
pub use path_cache::{PathCache, PathCacheEntry, PATH_CACHE_CAPACITY};
pub use priority_queue::MinQueue;
