//! Player controller
//!
//! Each tick the pending turn (if any) is resolved, the player advances along
//! its active direction, and the pellet in a newly entered cell is eaten.
//!
//! Turn rules:
//! - Reversal is always legal and applies immediately.
//! - Any other turn waits until the player is close enough to a cell centre
//!   on the axis perpendicular to the turn, then snaps onto that centre line.
//! - A turn that is still blocked stays queued; only a newer request replaces it.

use glam::Vec2;

use super::collision::{can_step, nearest_cell, occupied_cell};
use super::maze::Maze;
use super::scaling::Scaling;
use super::state::{Direction, Eaten, GameState};

/// Outcome of one player tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStep {
    pub moved: bool,
    pub turned: bool,
    pub eaten: Eaten,
}

/// Record a direction request in the single-slot queue
pub fn request_turn(state: &mut GameState, dir: Direction) {
    if state.is_game_over() {
        return;
    }
    if dir == state.player().dir {
        // Already heading that way; the newest request wins
        state.clear_player_turn();
    } else {
        state.queue_player_turn(dir);
    }
}

/// How far off a centre line the player may be and still turn onto it
pub fn turn_tolerance(scaling: &Scaling) -> f32 {
    scaling.player_pad().max(scaling.player_speed * 0.5)
}

/// Snap the coordinate perpendicular to `dir` onto the nearest centre line,
/// or `None` when it is further away than `tolerance`
fn align_for_turn(pos: Vec2, dir: Direction, tile: f32, tolerance: f32) -> Option<Vec2> {
    let snap = |v: f32| {
        let center = (v / tile).round() * tile;
        ((v - center).abs() <= tolerance).then_some(center)
    };
    if dir.is_vertical() {
        snap(pos.x).map(|x| Vec2::new(x, pos.y))
    } else {
        snap(pos.y).map(|y| Vec2::new(pos.x, y))
    }
}

/// Advance the player by one tick
pub fn step(state: &mut GameState, maze: &Maze, scaling: &Scaling) -> PlayerStep {
    let tile = scaling.tile_size;
    let speed = scaling.player_speed;
    let hitbox = scaling.player_hitbox;

    let mut pos = state.player().pos;
    let mut dir = state.player().dir;
    let mut turned = false;

    if let Some(queued) = state.player().queued_turn {
        if queued == dir.opposite() {
            dir = queued;
            turned = true;
            state.clear_player_turn();
        } else if queued == dir {
            state.clear_player_turn();
        } else if let Some(aligned) = align_for_turn(pos, queued, tile, turn_tolerance(scaling))
        {
            // The hitbox slack allows a short nudge toward any wall, so also
            // require an open cell beyond the centre line. The snap is only
            // committed when the turn actually goes through.
            let opens = maze.is_walkable(nearest_cell(aligned, tile).neighbor(queued));
            if opens && can_step(maze, tile, hitbox, aligned, queued, speed).is_some() {
                pos = aligned;
                dir = queued;
                turned = true;
                state.clear_player_turn();
            }
        }
    }

    if turned {
        state.set_player_direction(dir);
    }

    // Blocked: stay put this tick
    let next = can_step(maze, tile, hitbox, pos, dir, speed);
    let moved = next.is_some();
    if let Some(next) = next {
        pos = next;
    }
    if moved || turned {
        state.set_player_position(pos);
    }

    let cell = occupied_cell(state.player().pos, tile);
    let eaten = if state.enter_cell(cell) {
        state.consume_pellet(cell)
    } else {
        Eaten::Empty
    };

    PlayerStep {
        moved,
        turned,
        eaten,
    }
}
