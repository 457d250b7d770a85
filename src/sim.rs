use log::{debug, info};
use rand::Rng;

use crate::collector::Collector;
use crate::grid::{Cell, Grid, GridMaze};
use crate::pursuer::Pursuer;

const CATCH_RADIUS: f32 = 0.7;
const PURSUER_BOUNTY: u32 = 200;
const SCATTER_INTERVAL: u32 = 1200;

/// Tick driver for one round. Owns the maze and the agents; every tick runs
/// the collector first, then each pursuer in creation order, against the
/// pursuer positions snapshotted before the pass.
pub struct Simulation {
    pub maze: GridMaze,
    pub collector: Collector,
    pub pursuers: Vec<Pursuer>,
    spawns: Vec<Cell>,
    mode_timer: u32,
    over: bool,
    won: bool,
}

impl Simulation {
    /// `pursuers` pairs each spawn cell with its scatter home corner.
    pub fn new(maze: GridMaze, collector_start: Cell, pursuers: &[(Cell, Cell)]) -> Self {
        Self {
            maze,
            collector: Collector::new(collector_start),
            pursuers: pursuers
                .iter()
                .map(|&(spawn, corner)| Pursuer::new(spawn, corner))
                .collect(),
            spawns: pursuers.iter().map(|&(spawn, _)| spawn).collect(),
            mode_timer: 0,
            over: false,
            won: false,
        }
    }

    pub fn tick(&mut self, rng: &mut impl Rng) {
        if self.over {
            return;
        }

        let pursuer_cells: Vec<Cell> = self.pursuers.iter().map(|p| p.cell()).collect();
        self.collector.update(&mut self.maze, &pursuer_cells, rng);
        let collector_cell = self.collector.cell();

        for i in 0..self.pursuers.len() {
            self.pursuers[i].update(&self.maze, collector_cell, rng);
            if self.caught(i) {
                if self.pursuers[i].frightened {
                    let spawn = self.spawns[i];
                    self.pursuers[i].respawn(spawn);
                    self.collector.score += PURSUER_BOUNTY;
                    debug!("pursuer {i} eaten, returned to ({}, {})", spawn.x, spawn.y);
                } else {
                    self.over = true;
                    self.won = false;
                    info!("collector caught, final score {}", self.collector.score);
                    return;
                }
            }
        }

        if self.maze.pellets().is_empty() {
            self.over = true;
            self.won = true;
            info!("maze cleared, final score {}", self.collector.score);
            return;
        }

        // A powered-up collector keeps the whole pack frightened; anyone
        // whose timer ran out is frightened again while the power lasts.
        if self.collector.powered_up {
            for pursuer in &mut self.pursuers {
                if !pursuer.frightened {
                    pursuer.make_frightened();
                }
            }
        }

        self.mode_timer += 1;
        if self.mode_timer >= SCATTER_INTERVAL {
            self.mode_timer = 0;
            debug!("scatter cadence: pack retreats to home corners");
            for pursuer in &mut self.pursuers {
                pursuer.enter_scatter();
            }
        }
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn score(&self) -> u32 {
        self.collector.score
    }

    fn caught(&self, i: usize) -> bool {
        let pursuer = &self.pursuers[i];
        let dx = pursuer.x - self.collector.x;
        let dy = pursuer.y - self.collector.y;
        dx * dx + dy * dy < CATCH_RADIUS * CATCH_RADIUS
    }
}
