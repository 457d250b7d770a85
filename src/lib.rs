//! Decision core for an arcade maze chase: a collector agent routes itself
//! to pellets with grid search (BFS, uniform-cost, A*) while evading a pack
//! of pursuers that alternate between chase, scatter, and frightened modes.
//!
//! Rendering, audio, input, and layout parsing live outside this crate; the
//! core reads the maze through the [`grid::Grid`] trait and emits one
//! direction per agent per tick. All randomized choices take a caller
//! supplied [`rand::Rng`] so behavior is reproducible under a seeded
//! generator.

pub mod collector;
pub mod grid;
pub mod pursuer;
pub mod search;
pub mod sim;

pub use collector::Collector;
pub use grid::{Cell, Dir, Grid, GridMaze, Tile};
pub use pursuer::Pursuer;
pub use search::Strategy;
pub use sim::Simulation;
