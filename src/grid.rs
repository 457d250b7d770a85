#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Dir {
    Up,
    Down,
    Left,
    Right,
}

impl Dir {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Dir::Up => (0, -1),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
            Dir::Right => (1, 0),
        }
    }

    pub fn opposite(self) -> Dir {
        match self {
            Dir::Up => Dir::Down,
            Dir::Down => Dir::Up,
            Dir::Left => Dir::Right,
            Dir::Right => Dir::Left,
        }
    }
}

/// Neighbor enumeration order shared by the search strategies and the
/// pursuer move scoring. Fixed so tie-breaks are reproducible.
pub const DIRS: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, dir: Dir) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    pub fn manhattan(self, other: Cell) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Wall,
    Path,
    Pellet,
    Power,
    Empty,
}

/// Query surface of the externally owned maze. Decision logic only ever
/// reads through it; `eat_pellet` is the single mutation and belongs to the
/// collector's consumption step.
pub trait Grid {
    /// True iff (x, y) is in bounds and not a wall.
    fn is_walkable(&self, x: i32, y: i32) -> bool;
    /// Tile at (x, y); out-of-bounds reads as `Wall`.
    fn tile(&self, x: i32, y: i32) -> Tile;
    /// Every cell still holding a pellet or power pellet, row-major.
    fn pellets(&self) -> Vec<Cell>;
    /// Consume a pellet at exactly (x, y); returns true iff it was a power
    /// pellet. A miss is not an error, just false.
    fn eat_pellet(&mut self, x: i32, y: i32) -> bool;
}

/// In-memory maze backing the simulation driver and the tests. Built
/// programmatically; text-layout parsing lives outside this crate.
pub struct GridMaze {
    width: i32,
    height: i32,
    grid: Vec<Vec<Tile>>,
}

impl GridMaze {
    /// A fully open maze of the given size, every cell walkable.
    pub fn open(width: usize, height: usize) -> Self {
        Self {
            width: width as i32,
            height: height as i32,
            grid: vec![vec![Tile::Path; width]; height],
        }
    }

    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            self.grid[y as usize][x as usize] = tile;
        }
    }

    /// Wall off every cell adjacent to (x, y), leaving the cell enclosed.
    pub fn enclose(&mut self, x: i32, y: i32) {
        for dir in DIRS {
            let next = Cell::new(x, y).step(dir);
            self.set(next.x, next.y, Tile::Wall);
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }
}

impl Grid for GridMaze {
    fn is_walkable(&self, x: i32, y: i32) -> bool {
        self.in_bounds(x, y) && self.grid[y as usize][x as usize] != Tile::Wall
    }

    fn tile(&self, x: i32, y: i32) -> Tile {
        if self.in_bounds(x, y) {
            self.grid[y as usize][x as usize]
        } else {
            Tile::Wall
        }
    }

    fn pellets(&self) -> Vec<Cell> {
        let mut cells = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if matches!(self.grid[y as usize][x as usize], Tile::Pellet | Tile::Power) {
                    cells.push(Cell::new(x, y));
                }
            }
        }
        cells
    }

    fn eat_pellet(&mut self, x: i32, y: i32) -> bool {
        match self.tile(x, y) {
            Tile::Pellet => {
                self.set(x, y, Tile::Path);
                false
            }
            Tile::Power => {
                self.set(x, y, Tile::Path);
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposites_pair_up() {
        for dir in DIRS {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dy) = dir.delta();
            let (ox, oy) = dir.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
        }
    }

    #[test]
    fn walkable_respects_bounds_and_walls() {
        let mut maze = GridMaze::open(4, 3);
        maze.set(2, 1, Tile::Wall);
        assert!(maze.is_walkable(0, 0));
        assert!(!maze.is_walkable(2, 1));
        assert!(!maze.is_walkable(-1, 0));
        assert!(!maze.is_walkable(4, 0));
        assert!(!maze.is_walkable(0, 3));
        assert_eq!(maze.tile(-5, -5), Tile::Wall);
    }

    #[test]
    fn pellets_enumerate_row_major() {
        let mut maze = GridMaze::open(3, 3);
        maze.set(2, 0, Tile::Pellet);
        maze.set(0, 2, Tile::Power);
        assert_eq!(maze.pellets(), vec![Cell::new(2, 0), Cell::new(0, 2)]);
    }

    #[test]
    fn eat_pellet_reports_power_and_clears() {
        let mut maze = GridMaze::open(3, 3);
        maze.set(1, 1, Tile::Power);
        maze.set(2, 2, Tile::Pellet);
        assert!(maze.eat_pellet(1, 1));
        assert!(!maze.eat_pellet(1, 1));
        assert!(!maze.eat_pellet(2, 2));
        assert_eq!(maze.tile(1, 1), Tile::Path);
        assert_eq!(maze.tile(2, 2), Tile::Path);
        assert!(maze.pellets().is_empty());
    }
}
