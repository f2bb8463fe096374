//! Session lifecycle: initialize, start, pause, reset, win and loss
//!
//! NotStarted -> Running <-> Paused, Running -> {Won | Lost}, and reset from
//! anywhere back to a fresh NotStarted state.

use super::collision::{Rect, cell_origin, fits, nearest_cell};
use super::maze::Maze;
use super::scaling::Scaling;
use super::state::{GameEvent, GameState, Rules};

/// Fresh state for a session: entities on spawns, every pellet present
pub fn initialize(maze: &Maze, scaling: &Scaling, rules: Rules) -> GameState {
    let state = GameState::new(maze, scaling, rules);

    log::info!(
        "Maze {}x{}: {} pellets, {} sharks, tile {:.1}px",
        maze.cols(),
        maze.rows(),
        state.pellets().len(),
        state.sharks().len(),
        scaling.tile_size
    );

    let best = state.pellets().initial() as u64 * u64::from(rules.pellet_reward);
    if u64::from(rules.win_score) >= best {
        log::warn!(
            "Win score {} is unreachable: clearing the maze only scores {}",
            rules.win_score,
            best
        );
    }

    state
}

/// Begin or resume play. No effect once the game is over.
pub fn start(state: &mut GameState) {
    if state.is_game_over() || state.is_running() {
        return;
    }
    state.set_running(true);
    state.push_event(GameEvent::Started);
    log::info!("Game started (tick {})", state.time_ticks());
}

/// Halt play without ending the game
pub fn pause(state: &mut GameState) {
    if !state.is_active() {
        return;
    }
    state.set_running(false);
    state.push_event(GameEvent::Paused);
    log::info!("Game paused (tick {})", state.time_ticks());
}

/// Rebuild the session from the maze, keeping the rules
pub fn reset(state: &mut GameState, maze: &Maze, scaling: &Scaling) {
    let rules = *state.rules();
    // Undrained notifications survive the reset
    let pending = state.take_events();

    *state = GameState::new(maze, scaling, rules);
    state.clear_player_turn();

    for event in pending {
        state.push_event(event);
    }
    state.push_event(GameEvent::Reset);
    log::info!("Game reset");
}

/// Start a fresh game if the last one finished, otherwise just start
pub fn start_or_reset(state: &mut GameState, maze: &Maze, scaling: &Scaling) {
    if state.is_game_over() {
        reset(state, maze, scaling);
    }
    start(state);
}

/// Flip to the won state when the score is past the threshold
pub fn check_win(state: &mut GameState) -> bool {
    if state.is_game_over() || state.score() <= state.rules().win_score {
        return false;
    }
    state.set_win(true);
    state.set_game_over(true);
    state.set_running(false);
    state.push_event(GameEvent::Won {
        score: state.score(),
    });
    log::info!(
        "Won with {} points after {} ticks",
        state.score(),
        state.time_ticks()
    );
    true
}

/// True when the player's hitbox overlaps any shark's hitbox
pub fn player_caught(state: &GameState, scaling: &Scaling) -> bool {
    let tile = scaling.tile_size;
    let player = Rect::hitbox(state.player().pos, tile, scaling.player_hitbox);
    state
        .sharks()
        .iter()
        .any(|shark| player.overlaps(&Rect::hitbox(shark.pos, tile, scaling.shark_hitbox)))
}

/// End the game as a loss
pub fn declare_loss(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }
    state.set_game_over(true);
    state.set_running(false);
    state.push_event(GameEvent::Lost {
        score: state.score(),
    });
    log::info!(
        "Caught by a shark with {} points after {} ticks",
        state.score(),
        state.time_ticks()
    );
}

/// Carry entity positions over to a new tile size.
///
/// Positions scale with the tile ratio. Whole-pixel hitbox rounding can leave
/// a scaled box touching a wall; such entities settle onto their nearest cell.
pub fn rescale(state: &mut GameState, maze: &Maze, old: &Scaling, new: &Scaling) {
    if old.tile_size == new.tile_size {
        return;
    }
    let ratio = new.tile_size / old.tile_size;
    state.rescale_positions(ratio);

    let tile = new.tile_size;
    let settle = |pos, hitbox| {
        if fits(maze, &Rect::hitbox(pos, tile, hitbox), tile) {
            pos
        } else {
            cell_origin(nearest_cell(pos, tile), tile)
        }
    };

    let player = settle(state.player().pos, new.player_hitbox);
    state.set_player_position(player);

    let sharks: Vec<_> = state
        .sharks()
        .iter()
        .map(|s| settle(s.pos, new.shark_hitbox))
        .collect();
    state.set_shark_positions(&sharks);

    log::info!(
        "Rescaled tile {:.2}px -> {:.2}px",
        old.tile_size,
        new.tile_size
    );
}
