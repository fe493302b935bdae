pub mod cell;

pub use cell::{Cell, CellKind, Direction, Walls};

use crate::render::RenderSurface;

/// Index of a cell in the grid arena. Cells refer to each other by id and
/// pure index arithmetic instead of stored pointers.
pub type CellId = usize;

/// The single behavioral fork between the two grid flavors: a generated
/// maze blocks traversal with edge walls, the editable open grid blocks it
/// with the cells themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMode {
    /// Edge-wall maze, carved by the generator.
    Maze,
    /// Fully-open grid with user-toggleable wall cells; no generation.
    Open,
}

impl std::fmt::Display for GridMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridMode::Maze => write!(f, "Generated maze"),
            GridMode::Open => write!(f, "Open grid (paint walls with the mouse)"),
        }
    }
}

/// A fixed `N x N` arena of cells, stored column-major: the cell at
/// `(col, row)` lives at `col * N + row`.
pub struct Grid {
    cells: Box<[Cell]>,
    dimensions: u16,
    mode: GridMode,
}

impl Grid {
    /// Builds the arena with every wall standing and every cell open, then
    /// forces the entrance (top-left, north side) and exit (bottom-right,
    /// south side) open. Generation never closes them again.
    pub fn new(dimensions: u16, mode: GridMode) -> Self {
        let dimensions = dimensions.max(1);
        let mut cells = Vec::with_capacity(dimensions as usize * dimensions as usize);
        for col in 0..dimensions {
            for row in 0..dimensions {
                cells.push(Cell::new(col, row, mode));
            }
        }
        let mut grid = Grid {
            cells: cells.into_boxed_slice(),
            dimensions,
            mode,
        };
        let start = grid.start();
        let end = grid.end();
        grid.cells[start].walls.north = false;
        grid.cells[end].walls.south = false;
        grid
    }

    pub fn dimensions(&self) -> u16 {
        self.dimensions
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Entrance cell, top-left.
    pub fn start(&self) -> CellId {
        0
    }

    /// Exit cell, bottom-right.
    pub fn end(&self) -> CellId {
        self.cells.len() - 1
    }

    pub fn is_in_bounds(&self, col: u16, row: u16) -> bool {
        col < self.dimensions && row < self.dimensions
    }

    pub fn cell_index(&self, col: u16, row: u16) -> CellId {
        debug_assert!(self.is_in_bounds(col, row));
        col as usize * self.dimensions as usize + row as usize
    }

    pub fn cell_coords(&self, id: CellId) -> (u16, u16) {
        (
            (id / self.dimensions as usize) as u16,
            (id % self.dimensions as usize) as u16,
        )
    }

    /// All in-bounds neighbors of a cell with the direction that reaches
    /// them. Wrapping arithmetic keeps `col - 1` underflow out of bounds
    /// instead of panicking, the comparison filters it away.
    pub fn neighbors(&self, id: CellId) -> impl Iterator<Item = (CellId, Direction)> + '_ {
        let (col, row) = self.cell_coords(id);
        [
            (col, row.saturating_add(1), Direction::South),
            (col.saturating_add(1), row, Direction::East),
            (col.wrapping_sub(1), row, Direction::West),
            (col, row.wrapping_sub(1), Direction::North),
        ]
        .into_iter()
        .filter(move |&(c, r, _)| self.is_in_bounds(c, r) && (c, r) != (col, row))
        .map(move |(c, r, direction)| (self.cell_index(c, r), direction))
    }

    /// Neighbors the generator has not reached yet.
    pub fn unvisited_neighbors(&self, id: CellId) -> Vec<(CellId, Direction)> {
        self.neighbors(id)
            .filter(|&(neighbor, _)| !self.cells[neighbor].generation_visited)
            .collect()
    }

    /// Neighbors a search may step into: no wall on the shared edge in maze
    /// mode, a non-wall neighbor cell in open mode.
    pub fn traversable_neighbors(&self, id: CellId) -> Vec<CellId> {
        self.neighbors(id)
            .filter(|&(neighbor, direction)| match self.mode {
                GridMode::Maze => !self.cells[id].walls.has(direction),
                GridMode::Open => self.cells[neighbor].kind != CellKind::Wall,
            })
            .map(|(neighbor, _)| neighbor)
            .collect()
    }

    /// Knocks down the wall between a cell and its neighbor in `direction`.
    /// Symmetric: both sides of the shared edge are cleared.
    pub fn carve(&mut self, id: CellId, neighbor: CellId, direction: Direction) {
        self.cells[id].walls.set(direction, false);
        self.cells[neighbor].walls.set(direction.opposite(), false);
    }

    pub fn draw_cell(&self, id: CellId, surface: &mut dyn RenderSurface) {
        let cell = &self.cells[id];
        surface.fill_cell(cell.col, cell.row, cell.fill_color);
        surface.stroke_walls(cell.col, cell.row, cell.walls, cell.wall_color);
    }

    pub fn draw_all(&self, surface: &mut dyn RenderSurface) {
        for id in 0..self.cells.len() {
            self.draw_cell(id, surface);
        }
    }
}

impl std::ops::Index<(u16, u16)> for Grid {
    type Output = Cell;

    fn index(&self, index: (u16, u16)) -> &Self::Output {
        &self.cells[self.cell_index(index.0, index.1)]
    }
}

impl std::ops::IndexMut<(u16, u16)> for Grid {
    fn index_mut(&mut self, index: (u16, u16)) -> &mut Self::Output {
        let id = self.cell_index(index.0, index.1);
        &mut self.cells[id]
    }
}
