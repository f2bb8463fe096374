//! Shark Maze - an underwater maze chase
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze, movement, collisions, game state)
//! - `session`: Fixed-step runner and command surface for a host
//! - `input`: Keyboard and swipe adapters
//! - `settings`: Tunable rules loaded from JSON

pub mod input;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Session;
pub use settings::{Difficulty, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (one tick per display refresh at 60 Hz)
    pub const SIM_HZ: f32 = 60.0;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Base profile: every derived value scales linearly from this tile size
    pub const BASE_TILE: f32 = 60.0;
    /// Player speed at the base tile size (pixels per tick)
    pub const BASE_PLAYER_SPEED: f32 = 2.8;
    /// Shark speed at the base tile size (pixels per tick)
    pub const BASE_SHARK_SPEED: f32 = 2.8;
    /// Player hitbox edge at the base tile size (inset from the 60px sprite)
    pub const BASE_PLAYER_HITBOX: f32 = 46.0;
    /// Shark hitbox edge at the base tile size (full tile)
    pub const BASE_SHARK_HITBOX: f32 = 60.0;
    /// Water displacement filter strength at the base tile size
    pub const BASE_DISPLACEMENT_SCALE: f32 = 30.0;

    /// Tile size clamp
    pub const MIN_TILE: f32 = 8.0;
    pub const MAX_TILE: f32 = 90.0;

    /// Score per pellet
    pub const PELLET_REWARD: u32 = 10;
    /// Default win threshold (score must be strictly greater)
    pub const WIN_SCORE: u32 = 1740;

    /// Shark steering weights
    pub const STRAIGHT_WEIGHT: u32 = 6;
    pub const TURN_WEIGHT: u32 = 2;

    /// Swipe classification
    pub const SWIPE_MIN_PX: f32 = 24.0;
    pub const SWIPE_MAX_MS: f64 = 600.0;
}
