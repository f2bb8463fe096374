//! Game state and core simulation types
//!
//! `GameState` is the single source of truth for everything that changes
//! during a session. Fields are private; controllers mutate through the named
//! setters below and the host reads through getters or a `Snapshot`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::cell_origin;
use super::maze::{Cell, CellKind, Maze};
use super::scaling::Scaling;
use crate::consts::*;

/// Cardinal movement direction (screen space, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// The two directions at right angles to this one
    pub fn perpendicular(self) -> [Direction; 2] {
        if self.is_vertical() {
            [Direction::Left, Direction::Right]
        } else {
            [Direction::Up, Direction::Down]
        }
    }

    /// (column, row) delta of one grid step
    pub fn grid_offset(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Unit vector in pixel space
    pub fn unit(self) -> Vec2 {
        let (dx, dy) = self.grid_offset();
        Vec2::new(dx as f32, dy as f32)
    }
}

/// Derived lifecycle phase (from the status flags)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Freshly initialized, waiting for start
    NotStarted,
    /// Simulation advancing
    Running,
    /// Started once, currently halted without an outcome
    Paused,
    Won,
    Lost,
}

/// Result of trying to eat the pellet in a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Eaten {
    Pellet,
    Empty,
}

/// Notifications for sound/dialog collaborators, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Paused,
    PelletEaten { cell: Cell },
    Won { score: u32 },
    Lost { score: u32 },
    Reset,
}

/// Scoring and steering rules fixed for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    pub pellet_reward: u32,
    /// Win once the score is strictly greater than this
    pub win_score: u32,
    pub straight_weight: u32,
    pub turn_weight: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            pellet_reward: PELLET_REWARD,
            win_score: WIN_SCORE,
            straight_weight: STRAIGHT_WEIGHT,
            turn_weight: TURN_WEIGHT,
        }
    }
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Top-left of the tile-sized sprite box
    pub pos: Vec2,
    pub dir: Direction,
    /// At most one pending turn; newer requests overwrite it
    pub queued_turn: Option<Direction>,
    /// Cell occupied at the last pellet check
    pub last_cell: Option<Cell>,
}

/// A shark agent
#[derive(Debug, Clone, PartialEq)]
pub struct Shark {
    pub id: u32,
    /// Top-left of the tile-sized sprite box
    pub pos: Vec2,
    pub dir: Direction,
}

/// Uncollected pellets, indexed `row * cols + col`
#[derive(Debug, Clone, PartialEq)]
pub struct PelletGrid {
    cols: usize,
    rows: usize,
    present: Vec<bool>,
    remaining: usize,
    initial: usize,
}

impl PelletGrid {
    pub fn from_maze(maze: &Maze) -> Self {
        let mut present = vec![false; maze.cols() * maze.rows()];
        for cell in maze.cells_matching(CellKind::Pellet) {
            if let Some(i) = maze.index(cell) {
                present[i] = true;
            }
        }
        let initial = present.iter().filter(|p| **p).count();
        Self {
            cols: maze.cols(),
            rows: maze.rows(),
            present,
            remaining: initial,
            initial,
        }
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.col < 0 || cell.row < 0 {
            return None;
        }
        let (col, row) = (cell.col as usize, cell.row as usize);
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.present[i])
    }

    /// Remove the pellet at `cell`; false when there was none
    fn take(&mut self, cell: Cell) -> bool {
        match self.index(cell) {
            Some(i) if self.present[i] => {
                self.present[i] = false;
                self.remaining -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Pellet count when the session was initialized
    pub fn initial(&self) -> usize {
        self.initial
    }

    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        self.present
            .iter()
            .enumerate()
            .filter(|(_, p)| **p)
            .map(|(i, _)| Cell::new((i % self.cols) as i32, (i / self.cols) as i32))
    }
}

/// Complete mutable game state
#[derive(Debug, Clone)]
pub struct GameState {
    rules: Rules,
    player: Player,
    sharks: Vec<Shark>,
    pellets: PelletGrid,
    score: u32,
    running: bool,
    game_over: bool,
    win: bool,
    time_ticks: u64,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh state from the maze: entities on their spawns, all pellets present
    pub fn new(maze: &Maze, scaling: &Scaling, rules: Rules) -> Self {
        let tile = scaling.tile_size;
        let sharks = maze
            .cells_matching(CellKind::SharkSpawn)
            .into_iter()
            .enumerate()
            .map(|(i, cell)| Shark {
                id: i as u32 + 1,
                pos: cell_origin(cell, tile),
                dir: Direction::Left,
            })
            .collect();

        Self {
            rules,
            player: Player {
                pos: cell_origin(maze.player_spawn(), tile),
                dir: Direction::Up,
                queued_turn: None,
                last_cell: None,
            },
            sharks,
            pellets: PelletGrid::from_maze(maze),
            score: 0,
            running: false,
            game_over: false,
            win: false,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    // === Reads ===

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn sharks(&self) -> &[Shark] {
        &self.sharks
    }

    pub fn pellets(&self) -> &PelletGrid {
        &self.pellets
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_win(&self) -> bool {
        self.win
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// True when the simulation should advance this tick
    pub fn is_active(&self) -> bool {
        self.running && !self.game_over
    }

    pub fn phase(&self) -> GamePhase {
        if self.win {
            GamePhase::Won
        } else if self.game_over {
            GamePhase::Lost
        } else if self.running {
            GamePhase::Running
        } else if self.time_ticks > 0 {
            GamePhase::Paused
        } else {
            GamePhase::NotStarted
        }
    }

    // === Player ===

    pub fn set_player_position(&mut self, pos: Vec2) {
        self.player.pos = pos;
    }

    pub fn set_player_direction(&mut self, dir: Direction) {
        self.player.dir = dir;
    }

    /// Overwrite the single pending-turn slot
    pub fn queue_player_turn(&mut self, dir: Direction) {
        self.player.queued_turn = Some(dir);
    }

    pub fn clear_player_turn(&mut self) {
        self.player.queued_turn = None;
    }

    /// Record the occupied cell; true when it differs from the last one
    pub fn enter_cell(&mut self, cell: Cell) -> bool {
        if self.player.last_cell == Some(cell) {
            return false;
        }
        self.player.last_cell = Some(cell);
        true
    }

    // === Sharks ===

    /// Commit one (position, direction) per shark, in shark order
    pub fn set_shark_motion(&mut self, moves: &[(Vec2, Direction)]) {
        if moves.len() != self.sharks.len() {
            log::error!(
                "Ignoring shark update: {} moves for {} sharks",
                moves.len(),
                self.sharks.len()
            );
            return;
        }
        for (shark, &(pos, dir)) in self.sharks.iter_mut().zip(moves) {
            shark.pos = pos;
            shark.dir = dir;
        }
    }

    /// Place sharks without changing their headings
    pub fn set_shark_positions(&mut self, positions: &[Vec2]) {
        let moves: Vec<_> = self
            .sharks
            .iter()
            .zip(positions)
            .map(|(s, &p)| (p, s.dir))
            .collect();
        if positions.len() == self.sharks.len() {
            self.set_shark_motion(&moves);
        } else {
            log::error!(
                "Ignoring shark placement: {} positions for {} sharks",
                positions.len(),
                self.sharks.len()
            );
        }
    }

    // === Pellets and score ===

    /// Eat the pellet in `cell` if there is one. Repeat calls are no-ops.
    pub fn consume_pellet(&mut self, cell: Cell) -> Eaten {
        if self.pellets.take(cell) {
            self.score = self.score.saturating_add(self.rules.pellet_reward);
            self.events.push(GameEvent::PelletEaten { cell });
            Eaten::Pellet
        } else {
            Eaten::Empty
        }
    }

    /// Overwrite the score (scenario setup, debug tools)
    pub fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    // === Status ===

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn set_game_over(&mut self, game_over: bool) {
        self.game_over = game_over;
    }

    pub fn set_win(&mut self, win: bool) {
        self.win = win;
    }

    pub fn advance_clock(&mut self) {
        self.time_ticks += 1;
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drain pending events (oldest first)
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Scale every entity position (tile size changed)
    pub fn rescale_positions(&mut self, ratio: f32) {
        self.player.pos *= ratio;
        for shark in &mut self.sharks {
            shark.pos *= ratio;
        }
    }

    /// Read-only view for the renderer
    pub fn snapshot(&self, maze: &Maze, scaling: &Scaling) -> Snapshot {
        Snapshot {
            tile_size: scaling.tile_size,
            cols: maze.cols(),
            rows: maze.rows(),
            displacement_scale: scaling.displacement_scale,
            player: EntityView {
                id: 0,
                x: self.player.pos.x,
                y: self.player.pos.y,
                dir: self.player.dir,
            },
            sharks: self
                .sharks
                .iter()
                .map(|s| EntityView {
                    id: s.id,
                    x: s.pos.x,
                    y: s.pos.y,
                    dir: s.dir,
                })
                .collect(),
            pellets: self.pellets.iter().collect(),
            score: self.score,
            is_running: self.running,
            is_game_over: self.game_over,
            is_win: self.win,
            phase: self.phase(),
        }
    }
}

/// Position and heading of one entity, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
}

/// Everything a renderer or HUD polls once per frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub tile_size: f32,
    pub cols: usize,
    pub rows: usize,
    pub displacement_scale: f32,
    pub player: EntityView,
    pub sharks: Vec<EntityView>,
    pub pellets: Vec<Cell>,
    pub score: u32,
    pub is_running: bool,
    pub is_game_over: bool,
    pub is_win: bool,
    pub phase: GamePhase,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::MazeRules;

    fn small_maze() -> Maze {
        Maze::parse(&["#######", "#P..o.#", "#######"], &MazeRules::default()).unwrap()
    }

    #[test]
    fn test_new_state_from_maze() {
        let maze = small_maze();
        let state = GameState::new(&maze, &Scaling::default(), Rules::default());
        assert_eq!(state.player().pos, Vec2::new(60.0, 60.0));
        assert_eq!(state.player().dir, Direction::Up);
        assert_eq!(state.sharks().len(), 1);
        assert_eq!(state.sharks()[0].id, 1);
        assert_eq!(state.sharks()[0].pos, Vec2::new(240.0, 60.0));
        assert_eq!(state.pellets().len(), 3);
        assert_eq!(state.score(), 0);
        assert_eq!(state.phase(), GamePhase::NotStarted);
    }

    #[test]
    fn test_consume_pellet_is_idempotent() {
        let maze = small_maze();
        let mut state = GameState::new(&maze, &Scaling::default(), Rules::default());

        assert_eq!(state.consume_pellet(Cell::new(2, 1)), Eaten::Pellet);
        assert_eq!(state.score(), 10);
        assert_eq!(state.pellets().len(), 2);

        assert_eq!(state.consume_pellet(Cell::new(2, 1)), Eaten::Empty);
        assert_eq!(state.consume_pellet(Cell::new(2, 1)), Eaten::Empty);
        assert_eq!(state.score(), 10);
        assert_eq!(state.pellets().len(), 2);

        // Walls, spawns and out-of-bounds cells never hold pellets
        assert_eq!(state.consume_pellet(Cell::new(0, 0)), Eaten::Empty);
        assert_eq!(state.consume_pellet(Cell::new(1, 1)), Eaten::Empty);
        assert_eq!(state.consume_pellet(Cell::new(-3, 40)), Eaten::Empty);
        assert_eq!(state.score(), 10);
    }

    #[test]
    fn test_turn_slot_holds_latest_request() {
        let maze = small_maze();
        let mut state = GameState::new(&maze, &Scaling::default(), Rules::default());
        state.queue_player_turn(Direction::Left);
        state.queue_player_turn(Direction::Right);
        assert_eq!(state.player().queued_turn, Some(Direction::Right));
        state.clear_player_turn();
        assert_eq!(state.player().queued_turn, None);
    }

    #[test]
    fn test_enter_cell_only_reports_changes() {
        let maze = small_maze();
        let mut state = GameState::new(&maze, &Scaling::default(), Rules::default());
        assert!(state.enter_cell(Cell::new(1, 1)));
        assert!(!state.enter_cell(Cell::new(1, 1)));
        assert!(state.enter_cell(Cell::new(2, 1)));
        assert!(state.enter_cell(Cell::new(1, 1)));
    }

    #[test]
    fn test_shark_update_requires_full_set() {
        let maze = small_maze();
        let mut state = GameState::new(&maze, &Scaling::default(), Rules::default());
        state.set_shark_motion(&[]);
        assert_eq!(state.sharks()[0].pos, Vec2::new(240.0, 60.0));

        state.set_shark_motion(&[(Vec2::new(200.0, 60.0), Direction::Right)]);
        assert_eq!(state.sharks()[0].pos, Vec2::new(200.0, 60.0));
        assert_eq!(state.sharks()[0].dir, Direction::Right);
    }

    #[test]
    fn test_phase_from_flags() {
        let maze = small_maze();
        let mut state = GameState::new(&maze, &Scaling::default(), Rules::default());
        state.set_running(true);
        assert_eq!(state.phase(), GamePhase::Running);
        state.advance_clock();
        state.set_running(false);
        assert_eq!(state.phase(), GamePhase::Paused);
        state.set_game_over(true);
        assert_eq!(state.phase(), GamePhase::Lost);
        state.set_win(true);
        assert_eq!(state.phase(), GamePhase::Won);
    }

    #[test]
    fn test_snapshot_lists_remaining_pellets() {
        let maze = small_maze();
        let mut state = GameState::new(&maze, &Scaling::default(), Rules::default());
        state.consume_pellet(Cell::new(3, 1));
        let snap = state.snapshot(&maze, &Scaling::default());
        assert_eq!(snap.pellets, vec![Cell::new(2, 1), Cell::new(5, 1)]);
        assert_eq!(snap.score, 10);
        assert_eq!(snap.sharks.len(), 1);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"tileSize\":60.0"));
        assert!(json.contains("\"dir\":\"up\""));
    }
}
