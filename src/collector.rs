use std::collections::VecDeque;

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Dir, Grid, Tile};
use crate::search::Strategy;

pub const POWER_TICKS: u32 = 600;
const SPEED: f32 = 0.20;
const DANGER_RADIUS: i32 = 3;
const SAFE_RADIUS: i32 = 2;
const CONTACT_RADIUS: i32 = 2;
const NEAR: f32 = 0.3;
const PELLET_SCORE: u32 = 10;
const POWER_SCORE: u32 = 50;

/// Escape and fallback enumeration order; ties go to the earliest entry.
const ESCAPE_ORDER: [Dir; 4] = [Dir::Right, Dir::Left, Dir::Up, Dir::Down];

/// The pellet-seeking agent. Composes the search engine with a local threat
/// model: escape when a pursuer is close, otherwise route to the pellet
/// farthest from the pack.
pub struct Collector {
    pub x: f32,
    pub y: f32,
    pub direction: Dir,
    pub powered_up: bool,
    pub power_timer: u32,
    pub score: u32,
    pub strategy: Strategy,
    path: VecDeque<Cell>,
}

impl Collector {
    pub fn new(start: Cell) -> Self {
        Self {
            x: start.x as f32,
            y: start.y as f32,
            direction: Dir::Right,
            powered_up: false,
            power_timer: 0,
            score: 0,
            strategy: Strategy::AStar,
            path: VecDeque::new(),
        }
    }

    pub fn cell(&self) -> Cell {
        Cell::new(self.x.round() as i32, self.y.round() as i32)
    }

    /// Planned route to the current target pellet, head first. Read-only;
    /// exposed for path visualization.
    pub fn path(&self) -> impl Iterator<Item = Cell> + '_ {
        self.path.iter().copied()
    }

    /// One decision tick. Picks a direction, validates the resulting cell,
    /// suppresses the move if it would land next to a pursuer, and consumes
    /// any pellet reached. Returns the chosen direction either way.
    pub fn update<G: Grid>(&mut self, maze: &mut G, pursuers: &[Cell], rng: &mut impl Rng) -> Dir {
        let next_dir = self.decide(maze, pursuers, rng);

        let (dx, dy) = next_dir.delta();
        let nx = self.x + dx as f32 * SPEED;
        let ny = self.y + dy as f32 * SPEED;
        let landing = Cell::new(nx.round() as i32, ny.round() as i32);

        if maze.is_walkable(landing.x, landing.y) {
            let contact = !self.powered_up
                && pursuers.iter().any(|&g| landing.manhattan(g) < CONTACT_RADIUS);
            if !contact {
                self.x = nx;
                self.y = ny;
                self.direction = next_dir;

                if self.near_head() {
                    self.path.pop_front();
                }
                self.consume(maze);
            }
        }

        if self.powered_up {
            self.power_timer = self.power_timer.saturating_sub(1);
            if self.power_timer == 0 {
                self.powered_up = false;
            }
        }
        next_dir
    }

    fn decide<G: Grid>(&mut self, maze: &G, pursuers: &[Cell], rng: &mut impl Rng) -> Dir {
        let here = self.cell();

        let in_danger = pursuers.iter().any(|&g| here.manhattan(g) < DANGER_RADIUS);
        if in_danger && !self.powered_up {
            self.path.clear();
            return self.escape(maze, here, pursuers);
        }

        if self.near_head() {
            self.retarget(maze, here, pursuers);
        }

        if let Some(&head) = self.path.front() {
            // Close the larger axis gap first.
            let dx = head.x as f32 - self.x;
            let dy = head.y as f32 - self.y;
            return if dx.abs() > dy.abs() {
                if dx > 0.0 {
                    Dir::Right
                } else {
                    Dir::Left
                }
            } else if dy > 0.0 {
                Dir::Down
            } else {
                Dir::Up
            };
        }

        self.fallback(maze, here, pursuers, rng)
    }

    /// Minimax escape: of the walkable neighbors, take the one whose worst
    /// case (nearest pursuer) is best.
    fn escape<G: Grid>(&self, maze: &G, here: Cell, pursuers: &[Cell]) -> Dir {
        let mut best = self.direction;
        let mut best_clearance = -1;
        for dir in ESCAPE_ORDER {
            let next = here.step(dir);
            if !maze.is_walkable(next.x, next.y) {
                continue;
            }
            let clearance = nearest_distance(next, pursuers);
            if clearance > best_clearance {
                best_clearance = clearance;
                best = dir;
            }
        }
        best
    }

    /// Replace the path with a route to the pellet farthest from any
    /// pursuer. Keeps the old (empty) path when no pellet remains.
    fn retarget<G: Grid>(&mut self, maze: &G, here: Cell, pursuers: &[Cell]) {
        let pellets = maze.pellets();
        let mut target: Option<(Cell, i32)> = None;
        for &pellet in &pellets {
            let clearance = nearest_distance(pellet, pursuers);
            if target.map_or(true, |(_, best)| clearance > best) {
                target = Some((pellet, clearance));
            }
        }
        if let Some((pellet, _)) = target {
            debug!("retargeting pellet at ({}, {})", pellet.x, pellet.y);
            self.path = self.strategy.find_path(here, &[pellet], maze).into();
        }
    }

    /// No path and no immediate danger: random walkable direction with a
    /// comfortable clearance, then the current heading, then anything open.
    fn fallback<G: Grid>(&self, maze: &G, here: Cell, pursuers: &[Cell], rng: &mut impl Rng) -> Dir {
        let mut safe = Vec::new();
        for dir in ESCAPE_ORDER {
            let next = here.step(dir);
            if maze.is_walkable(next.x, next.y) && nearest_distance(next, pursuers) >= SAFE_RADIUS {
                safe.push(dir);
            }
        }
        if let Some(&dir) = safe.choose(rng) {
            return dir;
        }
        let ahead = here.step(self.direction);
        if maze.is_walkable(ahead.x, ahead.y) {
            return self.direction;
        }
        ESCAPE_ORDER
            .into_iter()
            .find(|&dir| {
                let next = here.step(dir);
                maze.is_walkable(next.x, next.y)
            })
            .unwrap_or(self.direction)
    }

    fn near_head(&self) -> bool {
        match self.path.front() {
            Some(head) => {
                let dx = self.x - head.x as f32;
                let dy = self.y - head.y as f32;
                dx * dx + dy * dy < NEAR * NEAR
            }
            None => true,
        }
    }

    fn consume<G: Grid>(&mut self, maze: &mut G) {
        // Only consume once settled onto the cell, not while crossing it.
        if (self.x - self.x.round()).abs() >= NEAR || (self.y - self.y.round()).abs() >= NEAR {
            return;
        }
        let here = self.cell();
        match maze.tile(here.x, here.y) {
            Tile::Pellet | Tile::Power => {
                if maze.eat_pellet(here.x, here.y) {
                    self.powered_up = true;
                    self.power_timer = POWER_TICKS;
                    self.score += POWER_SCORE;
                    debug!("power pellet at ({}, {}), score {}", here.x, here.y, self.score);
                } else {
                    self.score += PELLET_SCORE;
                }
            }
            _ => {}
        }
    }
}

fn nearest_distance(cell: Cell, pursuers: &[Cell]) -> i32 {
    pursuers.iter().map(|&g| cell.manhattan(g)).min().unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridMaze;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    #[test]
    fn danger_triggers_minimax_escape_and_clears_path() {
        let mut maze = GridMaze::open(9, 9);
        maze.set(8, 8, Tile::Pellet);
        let mut collector = Collector::new(Cell::new(4, 4));
        let mut rng = rng();
        // Populate a path first, from a safe position.
        collector.update(&mut maze, &[Cell::new(0, 0)], &mut rng);
        assert!(collector.path().count() > 0);

        // A pursuer two cells to the right: best clearance is Left.
        let dir = collector.decide(&maze, &[Cell::new(6, 4)], &mut rng);
        assert_eq!(dir, Dir::Left);
        assert_eq!(collector.path().count(), 0);
    }

    #[test]
    fn powered_up_ignores_adjacent_pursuer() {
        let mut maze = GridMaze::open(9, 9);
        maze.set(8, 4, Tile::Pellet);
        let mut collector = Collector::new(Cell::new(4, 4));
        collector.powered_up = true;
        collector.power_timer = POWER_TICKS;
        let before = collector.x;
        collector.update(&mut maze, &[Cell::new(5, 4)], &mut rng());
        // Pellet seeking, not escape: a path exists and the move commits.
        assert!(collector.path().count() > 0);
        assert!(collector.x > before);
    }

    #[test]
    fn committed_move_near_pursuer_is_suppressed() {
        // Dead-end corridor: the only escape direction still lands next to
        // the pursuer, so the tick's move must be suppressed outright.
        let mut maze = GridMaze::open(5, 3);
        for x in 0..5 {
            maze.set(x, 0, Tile::Wall);
            maze.set(x, 2, Tile::Wall);
        }
        maze.set(0, 1, Tile::Wall);
        let mut collector = Collector::new(Cell::new(1, 1));
        collector.update(&mut maze, &[Cell::new(2, 1)], &mut rng());
        assert_eq!(collector.x, 1.0);
        assert_eq!(collector.y, 1.0);
    }

    #[test]
    fn follows_path_along_larger_axis_gap() {
        let mut maze = GridMaze::open(9, 9);
        maze.set(7, 4, Tile::Pellet);
        let mut collector = Collector::new(Cell::new(4, 4));
        let dir = collector.update(&mut maze, &[], &mut rng());
        assert_eq!(dir, Dir::Right);
        assert!(collector.x > 4.0);
    }

    #[test]
    fn retargets_safest_pellet() {
        let mut maze = GridMaze::open(9, 9);
        maze.set(1, 4, Tile::Pellet); // close to the pursuer
        maze.set(7, 4, Tile::Pellet); // far from the pursuer
        let mut collector = Collector::new(Cell::new(4, 4));
        collector.update(&mut maze, &[Cell::new(0, 4)], &mut rng());
        let path: Vec<Cell> = collector.path().collect();
        assert_eq!(path.last(), Some(&Cell::new(7, 4)));
    }

    #[test]
    fn consumes_pellets_and_power_state() {
        let mut maze = GridMaze::open(5, 5);
        maze.set(2, 2, Tile::Power);
        let mut collector = Collector::new(Cell::new(2, 2));
        collector.update(&mut maze, &[], &mut rng());
        assert!(collector.powered_up);
        assert_eq!(collector.score, POWER_SCORE);
        assert!(maze.pellets().is_empty());

        maze.set(3, 3, Tile::Pellet);
        let mut other = Collector::new(Cell::new(3, 3));
        other.update(&mut maze, &[], &mut rng());
        assert!(!other.powered_up);
        assert_eq!(other.score, PELLET_SCORE);
    }

    #[test]
    fn power_timer_expires() {
        let mut maze = GridMaze::open(5, 5);
        let mut collector = Collector::new(Cell::new(2, 2));
        collector.powered_up = true;
        collector.power_timer = 1;
        collector.update(&mut maze, &[], &mut rng());
        assert!(!collector.powered_up);
    }

    #[test]
    fn fallback_picks_open_direction_when_no_pellets_remain() {
        let mut maze = GridMaze::open(9, 9);
        maze.set(4, 3, Tile::Wall);
        maze.set(4, 5, Tile::Wall);
        let mut collector = Collector::new(Cell::new(4, 4));
        let dir = collector.decide(&maze, &[], &mut rng());
        assert!(matches!(dir, Dir::Right | Dir::Left));
    }
}
