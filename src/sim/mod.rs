//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (sharks by id, cells row-major)
//! - No rendering or platform dependencies

pub mod collision;
pub mod lifecycle;
pub mod maze;
pub mod player;
pub mod scaling;
pub mod shark;
pub mod state;
pub mod tick;
pub mod weighted;

pub use collision::{Rect, boxes_overlap, can_step, fits};
pub use maze::{Cell, CellKind, Maze, MazeError, MazeRules, REFERENCE_LAYOUT};
pub use scaling::{Scaling, ScalingProfile};
pub use state::{
    Direction, Eaten, EntityView, GameEvent, GamePhase, GameState, PelletGrid, Player, Rules,
    Shark, Snapshot,
};
pub use tick::{TickInput, tick};
pub use weighted::WeightedChoice;
