//! Fixed timestep simulation tick
//!
//! Advances the game by exactly one step in a fixed order: input, player,
//! win check, sharks, then the catch check against the committed positions.

use rand::Rng;

use super::lifecycle;
use super::maze::Maze;
use super::player;
use super::scaling::Scaling;
use super::shark;
use super::state::{Direction, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest direction request (keyboard or swipe)
    pub turn: Option<Direction>,
    /// Start or resume (space, start button, first tap)
    pub start: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick<R: Rng + ?Sized>(
    state: &mut GameState,
    maze: &Maze,
    scaling: &Scaling,
    input: &TickInput,
    rng: &mut R,
) {
    if let Some(dir) = input.turn {
        player::request_turn(state, dir);
    }

    // Handle pause toggle
    if input.pause {
        match state.phase() {
            GamePhase::Running => lifecycle::pause(state),
            GamePhase::Paused => lifecycle::start(state),
            _ => {}
        }
    }
    if input.start {
        lifecycle::start(state);
    }

    // Don't tick if paused or game over
    if !state.is_active() {
        return;
    }
    state.advance_clock();

    player::step(state, maze, scaling);
    if lifecycle::check_win(state) {
        return;
    }

    shark::step_all(state, maze, scaling, rng);

    // Both sides have committed; compare the final boxes
    if lifecycle::player_caught(state, scaling) {
        lifecycle::declare_loss(state);
    }
}
