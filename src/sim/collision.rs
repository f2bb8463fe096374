//! Axis-aligned collision against the tile grid
//!
//! Entities are positioned by the top-left of their tile-sized sprite box.
//! Collision uses a square hitbox centred inside that box, which may be
//! smaller than a tile (forgiving corridors) or larger (spans more cells).

use glam::Vec2;

use super::maze::{Cell, Maze};
use super::state::Direction;

/// Right/bottom edges are exclusive: a box ending exactly on a tile boundary
/// does not touch the next tile.
const EDGE_EPSILON: f32 = 1e-3;

/// An axis-aligned rectangle in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Square hitbox of edge `hitbox` centred in the sprite box at `sprite_pos`
    pub fn hitbox(sprite_pos: Vec2, tile: f32, hitbox: f32) -> Self {
        let pad = (tile - hitbox) / 2.0;
        Self {
            min: sprite_pos + Vec2::splat(pad),
            size: Vec2::splat(hitbox),
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        boxes_overlap(self, other)
    }
}

/// Standard strict AABB intersection; touching edges do not overlap
#[inline]
pub fn boxes_overlap(a: &Rect, b: &Rect) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    a.min.x < b_max.x && a_max.x > b.min.x && a.min.y < b_max.y && a_max.y > b.min.y
}

/// Top-left pixel of a cell
#[inline]
pub fn cell_origin(cell: Cell, tile: f32) -> Vec2 {
    Vec2::new(cell.col as f32, cell.row as f32) * tile
}

/// Cell containing a pixel
#[inline]
pub fn cell_at(point: Vec2, tile: f32) -> Cell {
    Cell::new((point.x / tile).floor() as i32, (point.y / tile).floor() as i32)
}

/// Cell containing the centre of the sprite box at `pos`
#[inline]
pub fn occupied_cell(pos: Vec2, tile: f32) -> Cell {
    cell_at(pos + Vec2::splat(tile / 2.0), tile)
}

/// Cell whose aligned position is closest to `pos`
#[inline]
pub fn nearest_cell(pos: Vec2, tile: f32) -> Cell {
    Cell::new((pos.x / tile).round() as i32, (pos.y / tile).round() as i32)
}

/// Inclusive range of cells a rectangle touches: (top-left, bottom-right)
pub fn cell_span(rect: &Rect, tile: f32) -> (Cell, Cell) {
    let first = cell_at(rect.min, tile);
    let last_edge = (rect.max() - Vec2::splat(EDGE_EPSILON)).max(rect.min);
    (first, cell_at(last_edge, tile))
}

/// True when the rectangle lies inside the board and touches no wall cell
pub fn fits(maze: &Maze, rect: &Rect, tile: f32) -> bool {
    let max = rect.max();
    let board_w = maze.cols() as f32 * tile;
    let board_h = maze.rows() as f32 * tile;
    if rect.min.x < 0.0 || rect.min.y < 0.0 || max.x > board_w || max.y > board_h {
        return false;
    }

    // A hitbox on a tile boundary spans two columns and/or rows
    let (first, last) = cell_span(rect, tile);
    for row in first.row..=last.row {
        for col in first.col..=last.col {
            if maze.is_wall(col, row) {
                return false;
            }
        }
    }
    true
}

/// Try to advance `speed` pixels along `dir`. `None` when the hitbox at the
/// candidate position would leave the board or touch a wall.
pub fn can_step(
    maze: &Maze,
    tile: f32,
    hitbox: f32,
    from: Vec2,
    dir: Direction,
    speed: f32,
) -> Option<Vec2> {
    let candidate = from + dir.unit() * speed;
    fits(maze, &Rect::hitbox(candidate, tile, hitbox), tile).then_some(candidate)
}
