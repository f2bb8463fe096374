//! Keyboard and touch adapters
//!
//! Both sources resolve to the same handful of commands; direction requests
//! end up in the player's single turn slot.

use glam::Vec2;

use crate::consts::{SWIPE_MAX_MS, SWIPE_MIN_PX};
use crate::sim::Direction;

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Turn(Direction),
    Start,
    Pause,
}

/// Map a `KeyboardEvent.code` to an action
pub fn key_action(code: &str) -> Option<KeyAction> {
    let action = match code {
        "ArrowUp" | "KeyW" => KeyAction::Turn(Direction::Up),
        "ArrowDown" | "KeyS" => KeyAction::Turn(Direction::Down),
        "ArrowLeft" | "KeyA" => KeyAction::Turn(Direction::Left),
        "ArrowRight" | "KeyD" => KeyAction::Turn(Direction::Right),
        "Space" => KeyAction::Start,
        "Escape" | "KeyP" => KeyAction::Pause,
        _ => return None,
    };
    Some(action)
}

/// How a finished touch was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    Swipe(Direction),
    /// Barely moved
    Tap,
    /// Too slow, or no matching touch start
    Ignored,
}

/// Pairs touch starts with touch ends
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    min_px: f32,
    max_ms: f64,
    /// Start point and timestamp (ms) of the touch in progress
    origin: Option<(Vec2, f64)>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(SWIPE_MIN_PX, SWIPE_MAX_MS)
    }
}

impl SwipeTracker {
    pub fn new(min_px: f32, max_ms: f64) -> Self {
        Self {
            min_px,
            max_ms,
            origin: None,
        }
    }

    pub fn touch_start(&mut self, pos: Vec2, time_ms: f64) {
        self.origin = Some((pos, time_ms));
    }

    pub fn touch_end(&mut self, pos: Vec2, time_ms: f64) -> SwipeOutcome {
        let Some((start, started_at)) = self.origin.take() else {
            return SwipeOutcome::Ignored;
        };
        if time_ms - started_at > self.max_ms {
            return SwipeOutcome::Ignored;
        }

        let delta = pos - start;
        let (dx, dy) = (delta.x.abs(), delta.y.abs());
        if dx.max(dy) < self.min_px {
            return SwipeOutcome::Tap;
        }

        // Dominant axis wins; exact diagonals read as horizontal
        let dir = if dx >= dy {
            if delta.x > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if delta.y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        SwipeOutcome::Swipe(dir)
    }
}
