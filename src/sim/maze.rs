//! Static maze layout
//!
//! Parsed once from text rows and never mutated afterwards. Every query is
//! bounds-checked: anything outside the grid reads as wall.

use serde::{Deserialize, Serialize};

use super::state::Direction;

/// What occupies a grid cell at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellKind {
    Wall,
    Pellet,
    SharkSpawn,
    PlayerSpawn,
    Empty,
}

impl CellKind {
    fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(CellKind::Wall),
            '.' => Some(CellKind::Pellet),
            'o' => Some(CellKind::SharkSpawn),
            'P' => Some(CellKind::PlayerSpawn),
            ' ' => Some(CellKind::Empty),
            _ => None,
        }
    }

    pub fn is_wall(self) -> bool {
        self == CellKind::Wall
    }
}

/// Grid address (column, row). Signed so neighbours of edge cells are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// The adjacent cell one step in `dir`
    pub fn neighbor(self, dir: Direction) -> Self {
        let (dc, dr) = dir.grid_offset();
        Self::new(self.col + dc, self.row + dr)
    }
}

/// Load-time requirements beyond basic well-formedness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MazeRules {
    pub min_shark_spawns: usize,
}

impl Default for MazeRules {
    fn default() -> Self {
        Self { min_shark_spawns: 1 }
    }
}

impl MazeRules {
    /// Accept mazes without sharks (test corridors, tutorials)
    pub fn without_sharks() -> Self {
        Self { min_shark_spawns: 0 }
    }
}

/// Reasons a layout is rejected at load time
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MazeError {
    #[error("layout has no rows")]
    Empty,

    #[error("row {row} is {found} cells wide, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown glyph {glyph:?} at column {col}, row {row}")]
    UnknownGlyph { glyph: char, col: usize, row: usize },

    #[error("layout has no player spawn")]
    MissingPlayerSpawn,

    #[error("layout has {0} player spawns, expected exactly one")]
    MultiplePlayerSpawns(usize),

    #[error("layout has {found} shark spawns, at least {required} required")]
    NotEnoughSharkSpawns { found: usize, required: usize },

    #[error("cell ({}, {}) cannot be reached from the player spawn", .0.col, .0.row)]
    Unreachable(Cell),
}

/// Immutable tile grid
#[derive(Debug, Clone)]
pub struct Maze {
    cols: usize,
    rows: usize,
    cells: Vec<CellKind>,
    player_spawn: Cell,
}

impl Maze {
    /// Parse and validate a text layout
    pub fn parse<S: AsRef<str>>(layout: &[S], rules: &MazeRules) -> Result<Self, MazeError> {
        let rows = layout.len();
        if rows == 0 {
            return Err(MazeError::Empty);
        }
        let cols = layout[0].as_ref().chars().count();
        if cols == 0 {
            return Err(MazeError::Empty);
        }

        let mut cells = Vec::with_capacity(cols * rows);
        for (row, line) in layout.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != cols {
                return Err(MazeError::RaggedRow {
                    row,
                    expected: cols,
                    found,
                });
            }
            for (col, glyph) in line.chars().enumerate() {
                let kind = CellKind::from_glyph(glyph)
                    .ok_or(MazeError::UnknownGlyph { glyph, col, row })?;
                cells.push(kind);
            }
        }

        let mut maze = Self {
            cols,
            rows,
            cells,
            player_spawn: Cell::new(0, 0),
        };

        let spawns = maze.cells_matching(CellKind::PlayerSpawn);
        maze.player_spawn = match spawns.as_slice() {
            [] => return Err(MazeError::MissingPlayerSpawn),
            [only] => *only,
            many => return Err(MazeError::MultiplePlayerSpawns(many.len())),
        };

        let sharks = maze.cells_matching(CellKind::SharkSpawn).len();
        if sharks < rules.min_shark_spawns {
            return Err(MazeError::NotEnoughSharkSpawns {
                found: sharks,
                required: rules.min_shark_spawns,
            });
        }

        maze.check_reachability()?;
        Ok(maze)
    }

    /// The built-in 28x31 layout
    pub fn reference() -> Result<Self, MazeError> {
        Self::parse(&REFERENCE_LAYOUT, &MazeRules::default())
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn player_spawn(&self) -> Cell {
        self.player_spawn
    }

    /// Flattened index, `None` outside the grid
    pub fn index(&self, cell: Cell) -> Option<usize> {
        if cell.col < 0 || cell.row < 0 {
            return None;
        }
        let (col, row) = (cell.col as usize, cell.row as usize);
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    /// Cell kind, `None` outside the grid
    pub fn kind(&self, cell: Cell) -> Option<CellKind> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// True for wall cells and for anything out of bounds
    pub fn is_wall(&self, col: i32, row: i32) -> bool {
        self.kind(Cell::new(col, row)).is_none_or(CellKind::is_wall)
    }

    pub fn is_walkable(&self, cell: Cell) -> bool {
        !self.is_wall(cell.col, cell.row)
    }

    /// All cells of a kind in row-major order
    pub fn cells_matching(&self, kind: CellKind) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == kind)
            .map(|(i, _)| Cell::new((i % self.cols) as i32, (i / self.cols) as i32))
            .collect()
    }

    pub fn pellet_count(&self) -> usize {
        self.cells.iter().filter(|k| **k == CellKind::Pellet).count()
    }

    /// Every pellet and shark spawn must be 4-connected to the player spawn
    fn check_reachability(&self) -> Result<(), MazeError> {
        let mut seen = vec![false; self.cells.len()];
        let mut stack = vec![self.player_spawn];
        if let Some(i) = self.index(self.player_spawn) {
            seen[i] = true;
        }

        while let Some(cell) = stack.pop() {
            for dir in Direction::ALL {
                let next = cell.neighbor(dir);
                if !self.is_walkable(next) {
                    continue;
                }
                if let Some(i) = self.index(next) {
                    if !seen[i] {
                        seen[i] = true;
                        stack.push(next);
                    }
                }
            }
        }

        for kind in [CellKind::Pellet, CellKind::SharkSpawn] {
            for cell in self.cells_matching(kind) {
                if self.index(cell).is_some_and(|i| !seen[i]) {
                    return Err(MazeError::Unreachable(cell));
                }
            }
        }
        Ok(())
    }
}

/// Reference maze: `#` wall, `.` pellet, `o` shark spawn, `P` player spawn
pub const REFERENCE_LAYOUT: [&str; 31] = [
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.#####.##.#####.######",
    "######.#####.##.#####.######",
    "######.##..........##.######",
    "######.##.###  ###.##.######",
    "######.##.#o    o#.##.######",
    "#.........#      #.........#",
    "######.##.#  oo  #.##.######",
    "######.##.########.##.######",
    "######.##..........##.######",
    "######.##.########.##.######",
    "######.##.########.##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#...##.......P........##...#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
];
