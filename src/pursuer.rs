use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::{Cell, Dir, Grid, DIRS};

pub const FRIGHTENED_TICKS: u32 = 600;
pub const SCATTER_TICKS: u32 = 420;
const BASE_SPEED: f32 = 0.08;
const FLEE_RADIUS: i32 = 3;
const COMMIT_TICKS: u32 = 2;
const STUCK_LIMIT: u32 = 5;

/// One adversary agent. Exactly one of {normal, scatter, frightened} drives
/// targeting each tick; frightened wins when both flags are set, and the
/// scatter timer keeps counting down underneath it.
pub struct Pursuer {
    pub x: f32,
    pub y: f32,
    pub direction: Dir,
    pub frightened: bool,
    pub frightened_timer: u32,
    pub scatter: bool,
    pub scatter_timer: u32,
    pub home_corner: Cell,
    pub speed: f32,
    commit_cooldown: u32,
    last_committed: Option<Dir>,
    stuck_count: u32,
    last_cell: Cell,
}

impl Pursuer {
    pub fn new(spawn: Cell, home_corner: Cell) -> Self {
        Self {
            x: spawn.x as f32,
            y: spawn.y as f32,
            direction: Dir::Right,
            frightened: false,
            frightened_timer: 0,
            scatter: false,
            scatter_timer: 0,
            home_corner,
            speed: BASE_SPEED,
            commit_cooldown: 0,
            last_committed: None,
            stuck_count: 0,
            last_cell: spawn,
        }
    }

    /// Nearest grid cell; all decision reasoning rounds to this.
    pub fn cell(&self) -> Cell {
        Cell::new(self.x.round() as i32, self.y.round() as i32)
    }

    pub fn make_frightened(&mut self) {
        self.frightened = true;
        self.frightened_timer = FRIGHTENED_TICKS;
        self.speed = BASE_SPEED * 0.5;
    }

    pub fn enter_scatter(&mut self) {
        self.scatter = true;
        self.scatter_timer = SCATTER_TICKS;
    }

    pub fn respawn(&mut self, spawn: Cell) {
        self.x = spawn.x as f32;
        self.y = spawn.y as f32;
        self.last_cell = spawn;
    }

    /// One decision tick: timers, stall detection, direction selection, then
    /// the validated sub-cell step. Returns the chosen direction.
    pub fn update<G: Grid>(&mut self, maze: &G, collector: Cell, rng: &mut impl Rng) -> Dir {
        self.tick_timers();

        let here = self.cell();
        if here == self.last_cell {
            self.stuck_count += 1;
            if self.stuck_count > STUCK_LIMIT {
                // Force a fresh direction, reversal allowed.
                let moves = self.valid_moves(maze, false);
                if let Some(&dir) = moves.choose(rng) {
                    self.direction = dir;
                }
                self.stuck_count = 0;
            }
        } else {
            self.stuck_count = 0;
        }
        self.last_cell = here;

        self.direction = self.choose_direction(maze, collector, rng);

        let (dx, dy) = self.direction.delta();
        let nx = self.x + dx as f32 * self.speed;
        let ny = self.y + dy as f32 * self.speed;
        if maze.is_walkable(nx.round() as i32, ny.round() as i32) {
            self.x = nx;
            self.y = ny;
        }
        self.direction
    }

    fn tick_timers(&mut self) {
        if self.frightened {
            self.frightened_timer = self.frightened_timer.saturating_sub(1);
            if self.frightened_timer == 0 {
                self.frightened = false;
                self.speed = BASE_SPEED;
            }
        }
        if self.scatter {
            self.scatter_timer = self.scatter_timer.saturating_sub(1);
            if self.scatter_timer == 0 {
                self.scatter = false;
            }
        }
    }

    /// Walkable neighbor directions. The reverse of the current direction is
    /// excluded unless that would leave no options at all.
    fn valid_moves<G: Grid>(&self, maze: &G, exclude_reverse: bool) -> Vec<Dir> {
        let here = self.cell();
        let mut moves = Vec::new();
        for dir in DIRS {
            if exclude_reverse && dir == self.direction.opposite() {
                continue;
            }
            let next = here.step(dir);
            if maze.is_walkable(next.x, next.y) {
                moves.push(dir);
            }
        }
        if moves.is_empty() && exclude_reverse {
            return self.valid_moves(maze, false);
        }
        moves
    }

    fn choose_direction<G: Grid>(&mut self, maze: &G, collector: Cell, rng: &mut impl Rng) -> Dir {
        let here = self.cell();

        // Commit window: keep the current direction while it stays valid.
        if self.commit_cooldown > 0 {
            self.commit_cooldown -= 1;
            let ahead = here.step(self.direction);
            if maze.is_walkable(ahead.x, ahead.y) {
                return self.direction;
            }
        }

        let moves = self.valid_moves(maze, true);
        if moves.is_empty() {
            return self.direction;
        }

        if self.frightened {
            // Flee: prefer moves that end up well clear of the collector.
            let safe: Vec<Dir> = moves
                .iter()
                .copied()
                .filter(|&dir| here.step(dir).manhattan(collector) > FLEE_RADIUS)
                .collect();
            let pool = if safe.is_empty() { &moves } else { &safe };
            let dir = *pool.choose(rng).unwrap();
            self.commit_cooldown = COMMIT_TICKS;
            return dir;
        }

        let target = if self.scatter { self.home_corner } else { collector };
        let mut best = moves[0];
        let mut best_score = f32::NEG_INFINITY;
        for &dir in &moves {
            let next = here.step(dir);
            let mut score = -(next.manhattan(target) as f32);
            if dir == self.direction {
                score += 0.5;
            }
            if self.last_committed == Some(dir.opposite()) {
                score -= 1.0;
            }
            if score > best_score {
                best_score = score;
                best = dir;
            }
        }
        self.last_committed = Some(best);
        self.commit_cooldown = COMMIT_TICKS;
        best
    }
}
