//! Shark steering
//!
//! Sharks only pick a new heading when they cross a cell centre. There the
//! walkable neighbours are weighted (straight ahead favoured, turns less so)
//! and one is drawn at random. Reversing is only allowed out of a dead end.

use glam::Vec2;
use rand::Rng;

use super::collision::{Rect, can_step, cell_origin, fits, nearest_cell};
use super::maze::{Cell, Maze};
use super::scaling::Scaling;
use super::state::{Direction, GameState, Rules, Shark};
use super::weighted::WeightedChoice;

/// Directions whose neighbouring cell is walkable, in `Direction::ALL` order
pub fn open_directions(maze: &Maze, cell: Cell) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|d| maze.is_walkable(cell.neighbor(*d)))
        .collect()
}

/// Weighted draw over `open`. `None` only when `open` is empty.
pub fn choose_direction<R: Rng + ?Sized>(
    current: Direction,
    open: &[Direction],
    rules: &Rules,
    rng: &mut R,
) -> Option<Direction> {
    let mut choice = WeightedChoice::with_capacity(open.len());
    for &dir in open {
        if dir == current {
            choice.push(dir, rules.straight_weight.max(1));
        } else if dir != current.opposite() {
            choice.push(dir, rules.turn_weight.max(1));
        }
    }

    if choice.is_empty() {
        // Dead end: turning back is forced
        let back = current.opposite();
        return open.contains(&back).then_some(back);
    }
    choice.sample(rng)
}

/// Headings to try when the chosen one is blocked
fn fallback_order(dir: Direction) -> [Direction; 4] {
    let [a, b] = dir.perpendicular();
    [a, b, dir, dir.opposite()]
}

/// Pull the coordinate across `dir` toward `center`, by at most `max_shift`
fn snap_toward(pos: Vec2, dir: Direction, center: Vec2, max_shift: f32) -> Vec2 {
    let pull = |v: f32, c: f32| v + (c - v).clamp(-max_shift, max_shift);
    if dir.is_vertical() {
        Vec2::new(pull(pos.x, center.x), pos.y)
    } else {
        Vec2::new(pos.x, pull(pos.y, center.y))
    }
}

/// Compute one shark's next position and heading
pub fn steer<R: Rng + ?Sized>(
    shark: &Shark,
    maze: &Maze,
    scaling: &Scaling,
    rules: &Rules,
    rng: &mut R,
) -> (Vec2, Direction) {
    let tile = scaling.tile_size;
    let speed = scaling.shark_speed;
    let hitbox = scaling.shark_hitbox;

    let mut pos = shark.pos;
    let mut dir = shark.dir;

    let cell = nearest_cell(pos, tile);
    let center = cell_origin(cell, tile);

    // One decision per centre crossing
    let tolerance = speed * 0.5;
    if (pos - center).abs().max_element() <= tolerance {
        if fits(maze, &Rect::hitbox(center, tile, hitbox), tile) {
            pos = center;
        }
        if let Some(choice) = choose_direction(dir, &open_directions(maze, cell), rules, rng) {
            dir = choice;
        }
    }

    if let Some(next) = can_step(maze, tile, hitbox, pos, dir, speed) {
        return (next, dir);
    }

    for alt in fallback_order(dir) {
        let base = snap_toward(pos, alt, center, speed);
        if !fits(maze, &Rect::hitbox(base, tile, hitbox), tile) {
            continue;
        }
        if let Some(next) = can_step(maze, tile, hitbox, base, alt, speed) {
            return (next, alt);
        }
    }

    // Boxed in this tick; try again next tick
    (pos, dir)
}

/// Steer every shark and commit the results in id order
pub fn step_all<R: Rng + ?Sized>(
    state: &mut GameState,
    maze: &Maze,
    scaling: &Scaling,
    rng: &mut R,
) {
    let rules = *state.rules();
    let moves: Vec<(Vec2, Direction)> = state
        .sharks()
        .iter()
        .map(|shark| steer(shark, maze, scaling, &rules, rng))
        .collect();
    state.set_shark_motion(&moves);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::maze::MazeRules;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn shark_at(col: i32, row: i32, dir: Direction) -> Shark {
        Shark {
            id: 1,
            pos: cell_origin(Cell::new(col, row), 60.0),
            dir,
        }
    }

    #[test]
    fn test_dead_end_forces_reversal() {
        let maze = Maze::parse(&["#####", "#P.o#", "#####"], &MazeRules::default()).unwrap();
        let shark = shark_at(3, 1, Direction::Right);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..20 {
            let (pos, dir) = steer(&shark, &maze, &Scaling::default(), &Rules::default(), &mut rng);
            assert_eq!(dir, Direction::Left);
            assert!((pos.x - (180.0 - 2.8)).abs() < 1e-4);
            assert_eq!(pos.y, 60.0);
        }
    }

    #[test]
    fn test_never_reverses_with_other_options() {
        let open = Direction::ALL;
        let mut rng = Pcg32::seed_from_u64(11);
        let mut counts = [0u32; 4];
        for _ in 0..2000 {
            let dir = choose_direction(Direction::Right, &open, &Rules::default(), &mut rng)
                .expect("four open directions");
            assert_ne!(dir, Direction::Left);
            counts[dir as usize] += 1;
        }
        // Straight (6) against two turns (2 each): ~1200 / ~400 / ~400
        let [up, down, _, right] = counts;
        assert!(right > up + down / 2, "{counts:?}");
        assert!(up > 250 && down > 250, "{counts:?}");
    }

    #[test]
    fn test_choose_with_nothing_open() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert_eq!(
            choose_direction(Direction::Up, &[], &Rules::default(), &mut rng),
            None
        );
    }

    #[test]
    fn test_turns_at_corner() {
        // Corridor bends down at (3,1)
        let maze = Maze::parse(
            &["#####", "#P.o#", "###.#", "###.#", "#####"],
            &MazeRules::default(),
        )
        .unwrap();
        let shark = shark_at(3, 1, Direction::Right);
        let mut rng = Pcg32::seed_from_u64(5);
        // Left would be a reversal, so down is the only choice
        let (pos, dir) = steer(&shark, &maze, &Scaling::default(), &Rules::default(), &mut rng);
        assert_eq!(dir, Direction::Down);
        assert_eq!(pos.x, 180.0);
        assert!(pos.y > 60.0);
    }

    #[test]
    fn test_fallback_when_heading_blocked() {
        // Shark mid-corridor heading into a wall it never decided on
        let maze = Maze::parse(&["#####", "#P.o#", "#####"], &MazeRules::default()).unwrap();
        let shark = Shark {
            id: 1,
            pos: Vec2::new(150.0, 60.0),
            dir: Direction::Up,
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let (pos, dir) = steer(&shark, &maze, &Scaling::default(), &Rules::default(), &mut rng);
        // Perpendicular options come first; left is the first that moves
        assert_eq!(dir, Direction::Left);
        assert!((pos.x - 147.2).abs() < 1e-4);
        assert_eq!(pos.y, 60.0);
    }

    #[test]
    fn test_fully_blocked_shark_holds() {
        let maze = Maze::parse(&["#####", "#P.o#", "#####"], &MazeRules::default()).unwrap();
        // A hitbox wider than the corridor fits nowhere
        let scaling = Scaling {
            shark_hitbox: 150.0,
            ..Scaling::default()
        };
        let shark = Shark {
            id: 1,
            pos: Vec2::new(150.0, 60.0),
            dir: Direction::Left,
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let (pos, dir) = steer(&shark, &maze, &scaling, &Rules::default(), &mut rng);
        assert_eq!(pos, shark.pos);
        assert_eq!(dir, Direction::Left);
    }

    #[test]
    fn test_sharks_stay_out_of_walls() {
        let maze = Maze::reference().unwrap();
        let scaling = Scaling::default();
        let mut state = GameState::new(&maze, &scaling, Rules::default());
        let mut rng = Pcg32::seed_from_u64(2024);
        let start: Vec<Vec2> = state.sharks().iter().map(|s| s.pos).collect();

        for _ in 0..3000 {
            step_all(&mut state, &maze, &scaling, &mut rng);
            for shark in state.sharks() {
                let hb = Rect::hitbox(shark.pos, scaling.tile_size, scaling.shark_hitbox);
                assert!(fits(&maze, &hb, scaling.tile_size), "shark {} at {:?}", shark.id, shark.pos);
            }
        }
        // Everyone got somewhere
        for (shark, from) in state.sharks().iter().zip(start) {
            assert_ne!(shark.pos, from);
        }
    }

    #[test]
    fn test_same_seed_same_paths() {
        let maze = Maze::reference().unwrap();
        let scaling = Scaling::default();
        let mut a = GameState::new(&maze, &scaling, Rules::default());
        let mut b = GameState::new(&maze, &scaling, Rules::default());
        let mut rng_a = Pcg32::seed_from_u64(77);
        let mut rng_b = Pcg32::seed_from_u64(77);
        for _ in 0..500 {
            step_all(&mut a, &maze, &scaling, &mut rng_a);
            step_all(&mut b, &maze, &scaling, &mut rng_b);
        }
        assert_eq!(a.sharks(), b.sharks());
    }
}
