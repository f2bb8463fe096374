//! Session runner
//!
//! Owns everything one game needs (maze, settings, scaling, state, RNG) and
//! drives the simulation from host frames with a fixed-step accumulator.
//! Hosts talk to it through the command methods below and poll `snapshot()`
//! once per frame.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::input::{KeyAction, SwipeOutcome, SwipeTracker, key_action};
use crate::settings::Settings;
use crate::sim::{
    Direction, GameEvent, GameState, Maze, Scaling, ScalingProfile, Snapshot, TickInput,
    lifecycle, tick,
};

/// Longest frame the accumulator will absorb (seconds)
const MAX_FRAME_DT: f32 = 0.1;

pub struct Session {
    maze: Maze,
    settings: Settings,
    profile: ScalingProfile,
    scaling: Scaling,
    state: GameState,
    rng: Pcg32,
    seed: u64,
    accumulator: f32,
    /// Pending one-shot inputs for the next tick
    input: TickInput,
    swipe: SwipeTracker,
}

impl Session {
    /// Build a session sized for a `width` x `height` viewport. `fallback_seed`
    /// is used unless the settings pin one.
    pub fn new(maze: Maze, settings: Settings, width: f32, height: f32, fallback_seed: u64) -> Self {
        let seed = settings.seed.unwrap_or(fallback_seed);
        let profile = settings.profile();
        let scaling = Scaling::from_viewport(&profile, width, height, maze.cols(), maze.rows());
        let state = lifecycle::initialize(&maze, &scaling, settings.rules());
        let swipe = SwipeTracker::new(settings.swipe_min_px, settings.swipe_max_ms);

        log::info!(
            "Session ready: {} difficulty, seed {}",
            settings.difficulty.as_str(),
            seed
        );

        Self {
            maze,
            settings,
            profile,
            scaling,
            state,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            accumulator: 0.0,
            input: TickInput::default(),
            swipe,
        }
    }

    // === Reads ===

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn scaling(&self) -> &Scaling {
        &self.scaling
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(&self.maze, &self.scaling)
    }

    /// Drain notifications for sound and dialog collaborators
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.state.take_events()
    }

    // === Commands ===

    /// Direction request; replaces any request not yet applied
    pub fn request_turn(&mut self, dir: Direction) {
        self.input.turn = Some(dir);
    }

    /// Keyboard entry point. Returns true when the key was handled.
    pub fn key_down(&mut self, code: &str) -> bool {
        match key_action(code) {
            Some(KeyAction::Turn(dir)) => self.request_turn(dir),
            Some(KeyAction::Start) => {
                if self.state.is_game_over() {
                    self.reset();
                }
                self.input.start = true;
            }
            Some(KeyAction::Pause) => self.input.pause = true,
            None => return false,
        }
        true
    }

    /// Begin a touch; the first touch also starts a game that isn't running
    pub fn touch_start(&mut self, pos: Vec2, time_ms: f64) {
        self.swipe.touch_start(pos, time_ms);
        if !self.state.is_running() && !self.state.is_game_over() {
            self.input.start = true;
        }
    }

    pub fn touch_end(&mut self, pos: Vec2, time_ms: f64) -> SwipeOutcome {
        let outcome = self.swipe.touch_end(pos, time_ms);
        if let SwipeOutcome::Swipe(dir) = outcome {
            self.request_turn(dir);
        }
        outcome
    }

    pub fn start(&mut self) {
        lifecycle::start(&mut self.state);
    }

    pub fn pause(&mut self) {
        lifecycle::pause(&mut self.state);
    }

    pub fn reset(&mut self) {
        lifecycle::reset(&mut self.state, &self.maze, &self.scaling);
        self.accumulator = 0.0;
        self.input = TickInput::default();
    }

    /// Restart a finished game, or start the current one
    pub fn start_or_reset(&mut self) {
        if self.state.is_game_over() {
            self.reset();
        }
        self.start();
    }

    /// New viewport size: recompute scaling and carry positions over
    pub fn resize(&mut self, width: f32, height: f32) {
        let next = Scaling::from_viewport(
            &self.profile,
            width,
            height,
            self.maze.cols(),
            self.maze.rows(),
        );
        lifecycle::rescale(&mut self.state, &self.maze, &self.scaling, &next);
        self.scaling = next;
    }

    /// Run exactly one simulation tick with the pending input
    pub fn step(&mut self) {
        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &self.maze, &self.scaling, &input, &mut self.rng);
    }

    /// Advance by a frame's worth of wall time. Returns the ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            // One-shot inputs are consumed by the first substep
            self.step();
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{Rect, fits};
    use crate::sim::{GamePhase, MazeRules};

    fn session(w: f32, h: f32) -> Session {
        let settings = Settings {
            seed: Some(1234),
            ..Settings::default()
        };
        Session::new(Maze::reference().unwrap(), settings, w, h, 0)
    }

    fn assert_in_bounds(s: &Session) {
        let t = s.scaling().tile_size;
        let player = Rect::hitbox(s.state().player().pos, t, s.scaling().player_hitbox);
        assert!(fits(s.maze(), &player, t), "player {:?}", s.state().player().pos);
        for shark in s.state().sharks() {
            let hb = Rect::hitbox(shark.pos, t, s.scaling().shark_hitbox);
            assert!(fits(s.maze(), &hb, t), "shark {} {:?}", shark.id, shark.pos);
        }
    }

    #[test]
    fn test_viewport_sets_tile() {
        let s = session(840.0, 930.0);
        assert!((s.scaling().tile_size - 30.0).abs() < 1e-4);
        assert_eq!(s.seed(), 1234);
        assert_eq!(s.state().phase(), GamePhase::NotStarted);
    }

    #[test]
    fn test_update_clamps_long_frames() {
        let mut s = session(840.0, 930.0);
        s.start();
        let ran = s.update(5.0);
        assert!((5..=6).contains(&ran), "{ran}");
        assert!(s.update(f32::NAN) <= 1);
        assert_eq!(s.update(-1.0), 0);
    }

    #[test]
    fn test_space_starts_and_restarts() {
        let mut s = session(840.0, 930.0);
        assert!(s.key_down("Space"));
        s.step();
        assert_eq!(s.state().phase(), GamePhase::Running);

        lifecycle::declare_loss(&mut s.state);
        s.key_down("Space");
        s.step();
        assert_eq!(s.state().phase(), GamePhase::Running);
        assert_eq!(s.state().time_ticks(), 1);
        let events = s.take_events();
        assert!(events.contains(&GameEvent::Reset));
    }

    #[test]
    fn test_pause_key_toggles() {
        let mut s = session(840.0, 930.0);
        s.start();
        s.step();
        s.key_down("Escape");
        s.step();
        assert_eq!(s.state().phase(), GamePhase::Paused);
        s.key_down("KeyP");
        s.step();
        assert_eq!(s.state().phase(), GamePhase::Running);
        assert!(!s.key_down("F5"));
    }

    #[test]
    fn test_first_tap_starts_and_swipe_turns() {
        let maze = Maze::parse(
            &["#######", "#P....#", "#######"],
            &MazeRules::without_sharks(),
        )
        .unwrap();
        let mut s = Session::new(maze, Settings::default(), 420.0, 180.0, 5);
        s.touch_start(Vec2::new(100.0, 100.0), 0.0);
        let outcome = s.touch_end(Vec2::new(200.0, 110.0), 120.0);
        assert_eq!(outcome, SwipeOutcome::Swipe(Direction::Right));
        s.step();
        assert!(s.state().is_running());
        assert_eq!(s.state().player().dir, Direction::Right);
    }

    #[test]
    fn test_resize_mid_session_keeps_positions_valid() {
        let mut s = session(800.0, 600.0);
        s.start();
        s.request_turn(Direction::Left);
        for _ in 0..50 {
            s.step();
        }
        let before = s.scaling().tile_size;
        let player_before = s.state().player().pos;

        s.resize(400.0, 300.0);
        assert!((s.scaling().tile_size * 2.0 - before).abs() < 1e-3);
        assert_in_bounds(&s);
        let moved = s.state().player().pos - player_before * 0.5;
        assert!(moved.length() <= s.scaling().tile_size);

        // Play continues without anyone ending up inside a wall
        for _ in 0..300 {
            s.step();
            assert_in_bounds(&s);
        }

        s.resize(1600.0, 1200.0);
        assert_in_bounds(&s);
    }

    #[test]
    fn test_same_seed_same_game() {
        let script = |s: &mut Session| {
            s.start();
            for i in 0..600u32 {
                if i % 50 == 0 {
                    s.request_turn(Direction::ALL[(i / 50) as usize % 4]);
                }
                s.update(SIM_DT);
            }
            s.snapshot()
        };
        let mut a = session(840.0, 930.0);
        let mut b = session(840.0, 930.0);
        assert_eq!(script(&mut a), script(&mut b));
    }

    #[test]
    fn test_snapshot_serializes() {
        let s = session(840.0, 930.0);
        let json = serde_json::to_string(&s.snapshot()).unwrap();
        assert!(json.contains("\"isRunning\":false"));
        assert!(json.contains("\"cols\":28"));
    }
}
