use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use crate::grid::{Cell, Grid, DIRS};

/// The three interchangeable pathfinding strategies. All share the same
/// contract: shortest route of 4-connected walkable cells from `start` to
/// the nearest reachable goal, excluding `start` itself. An empty goal set
/// or an unreachable goal set yields an empty path, never an error.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Strategy {
    BreadthFirst,
    UniformCost,
    #[default]
    AStar,
}

impl Strategy {
    pub fn find_path<G: Grid>(self, start: Cell, goals: &[Cell], grid: &G) -> Vec<Cell> {
        if goals.is_empty() {
            return Vec::new();
        }
        match self {
            Strategy::BreadthFirst => breadth_first(start, goals, grid),
            Strategy::UniformCost => uniform_cost(start, goals, grid),
            Strategy::AStar => a_star(start, goals, grid),
        }
    }
}

/// Multi-goal BFS: the first goal cell dequeued ends the search, so the
/// result reaches the nearest goal by hop count.
fn breadth_first<G: Grid>(start: Cell, goals: &[Cell], grid: &G) -> Vec<Cell> {
    let goal_set: HashSet<Cell> = goals.iter().copied().collect();
    let mut frontier = VecDeque::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut seen: HashSet<Cell> = HashSet::new();
    seen.insert(start);
    frontier.push_back(start);

    while let Some(cell) = frontier.pop_front() {
        if goal_set.contains(&cell) {
            return rebuild(start, cell, &came_from);
        }
        for dir in DIRS {
            let next = cell.step(dir);
            if !seen.contains(&next) && grid.is_walkable(next.x, next.y) {
                seen.insert(next);
                came_from.insert(next, cell);
                frontier.push_back(next);
            }
        }
    }
    Vec::new()
}

/// Dijkstra with unit edge costs. Equivalent to BFS on this grid; kept as a
/// separate frontier discipline so weighted variants slot in later.
fn uniform_cost<G: Grid>(start: Cell, goals: &[Cell], grid: &G) -> Vec<Cell> {
    let goal_set: HashSet<Cell> = goals.iter().copied().collect();
    let mut frontier = BinaryHeap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut best: HashMap<Cell, u32> = HashMap::new();
    // Insertion sequence keeps equal-cost pops in a stable order.
    let mut seq = 0u64;
    best.insert(start, 0);
    frontier.push(Reverse((0u32, seq, start)));

    while let Some(Reverse((cost, _, cell))) = frontier.pop() {
        if goal_set.contains(&cell) {
            return rebuild(start, cell, &came_from);
        }
        if cost > best.get(&cell).copied().unwrap_or(u32::MAX) {
            continue;
        }
        for dir in DIRS {
            let next = cell.step(dir);
            if !grid.is_walkable(next.x, next.y) {
                continue;
            }
            let next_cost = cost + 1;
            if next_cost < best.get(&next).copied().unwrap_or(u32::MAX) {
                best.insert(next, next_cost);
                came_from.insert(next, cell);
                seq += 1;
                frontier.push(Reverse((next_cost, seq, next)));
            }
        }
    }
    Vec::new()
}

/// A*: reduces the multi-goal query to the single goal nearest by Manhattan
/// distance (first in input order on a tie), then runs best-first on
/// accumulated cost plus the Manhattan heuristic, re-opening a node whenever
/// a strictly cheaper cost is found.
fn a_star<G: Grid>(start: Cell, goals: &[Cell], grid: &G) -> Vec<Cell> {
    let mut goal = goals[0];
    for &candidate in &goals[1..] {
        if start.manhattan(candidate) < start.manhattan(goal) {
            goal = candidate;
        }
    }

    let mut frontier = BinaryHeap::new();
    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut best: HashMap<Cell, u32> = HashMap::new();
    let mut seq = 0u64;
    best.insert(start, 0);
    frontier.push(Reverse((start.manhattan(goal) as u32, seq, start)));

    while let Some(Reverse((_, _, cell))) = frontier.pop() {
        if cell == goal {
            return rebuild(start, cell, &came_from);
        }
        let cost = best[&cell];
        for dir in DIRS {
            let next = cell.step(dir);
            if !grid.is_walkable(next.x, next.y) {
                continue;
            }
            let tentative = cost + 1;
            if tentative < best.get(&next).copied().unwrap_or(u32::MAX) {
                best.insert(next, tentative);
                came_from.insert(next, cell);
                seq += 1;
                frontier.push(Reverse((tentative + next.manhattan(goal) as u32, seq, next)));
            }
        }
    }
    Vec::new()
}

fn rebuild(start: Cell, goal: Cell, came_from: &HashMap<Cell, Cell>) -> Vec<Cell> {
    let mut path = Vec::new();
    let mut cell = goal;
    while cell != start {
        path.push(cell);
        cell = came_from[&cell];
    }
    path.reverse();
    path
}
