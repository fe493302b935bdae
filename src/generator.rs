use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::grid::{CellId, Grid};

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Randomized depth-first carver ("recursive backtracker"), driven a
/// bounded number of iterations at a time so large grids stay interactive.
///
/// The stack holds the current carving path; the top is re-examined every
/// iteration. A cell with unvisited neighbors stays on the stack and pushes
/// one random neighbor after knocking down the shared wall; a dead end pops.
/// The stack emptying means every reachable cell has been visited and the
/// carved walls form a spanning tree over the grid graph: a perfect maze.
pub struct Generator {
    stack: Vec<CellId>,
    rng: StdRng,
}

impl Generator {
    /// Seeds the carve stack with a random start cell and marks it visited.
    /// A fixed `seed` makes the whole carve deterministic.
    pub fn new(grid: &mut Grid, seed: Option<u64>) -> Self {
        let mut rng = get_rng(seed);
        let col = rng.random_range(0..grid.dimensions());
        let row = rng.random_range(0..grid.dimensions());
        let first = grid.cell_index(col, row);
        grid.cells_mut()[first].generation_visited = true;
        Generator {
            stack: vec![first],
            rng,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.stack.is_empty()
    }

    /// Performs up to `budget` carve-or-backtrack iterations. Each carved
    /// pair `(current, neighbor)` is appended to `carved` so the caller can
    /// redraw and animate exactly the cells that changed. Returns true once
    /// the stack has emptied.
    pub fn carve(&mut self, grid: &mut Grid, budget: u32, carved: &mut Vec<CellId>) -> bool {
        for _ in 0..budget {
            let Some(current) = self.stack.pop() else {
                return true;
            };
            let unvisited = grid.unvisited_neighbors(current);
            if unvisited.is_empty() {
                // Dead end: leave the cell popped and backtrack.
                continue;
            }
            // Keep the current cell around so its remaining neighbors get
            // their turn after we come back.
            self.stack.push(current);

            let (neighbor, direction) = unvisited[self.rng.random_range(0..unvisited.len())];
            grid.carve(current, neighbor, direction);
            grid.cells_mut()[neighbor].generation_visited = true;
            self.stack.push(neighbor);

            carved.push(current);
            carved.push(neighbor);
        }
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridMode;

    /// Drive a carve to completion in one call per tick, unbounded ticks.
    fn generate_fully(grid: &mut Grid, seed: u64) {
        let mut generator = Generator::new(grid, Some(seed));
        let mut carved = Vec::new();
        while !generator.carve(grid, 64, &mut carved) {}
    }

    fn open_interior_edges(grid: &Grid) -> usize {
        // Each carved edge clears two wall flags, one per side. Count the
        // east/south sides only so every interior opening counts once.
        let n = grid.dimensions();
        let mut open = 0;
        for col in 0..n {
            for row in 0..n {
                let cell = &grid[(col, row)];
                if col + 1 < n && !cell.walls.east {
                    open += 1;
                }
                if row + 1 < n && !cell.walls.south {
                    open += 1;
                }
            }
        }
        open
    }

    fn reachable_cells(grid: &Grid) -> usize {
        let mut visited = vec![false; grid.cells().len()];
        let mut stack = vec![grid.start()];
        visited[grid.start()] = true;
        let mut count = 1;
        while let Some(id) = stack.pop() {
            for neighbor in grid.traversable_neighbors(id) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    count += 1;
                    stack.push(neighbor);
                }
            }
        }
        count
    }

    #[test]
    fn generation_produces_a_spanning_tree() {
        for n in [1u16, 2, 3, 5, 10] {
            let mut grid = Grid::new(n, GridMode::Maze);
            generate_fully(&mut grid, 7);
            let cells = n as usize * n as usize;
            // Spanning tree: exactly N^2 - 1 carved edges, all cells reachable.
            assert_eq!(open_interior_edges(&grid), cells - 1, "n = {n}");
            assert_eq!(reachable_cells(&grid), cells, "n = {n}");
            assert!(grid.cells().iter().all(|c| c.generation_visited));
        }
    }

    #[test]
    fn entrance_and_exit_stay_open_after_generation() {
        let mut grid = Grid::new(6, GridMode::Maze);
        generate_fully(&mut grid, 21);
        assert!(!grid[(0, 0)].walls.north);
        assert!(!grid[(5, 5)].walls.south);
    }

    #[test]
    fn fixed_seed_reproduces_the_same_maze() {
        let mut first = Grid::new(8, GridMode::Maze);
        generate_fully(&mut first, 42);
        let mut second = Grid::new(8, GridMode::Maze);
        generate_fully(&mut second, 42);
        for (a, b) in first.cells().iter().zip(second.cells()) {
            assert_eq!(a.walls, b.walls);
        }
    }

    #[test]
    fn carve_respects_the_per_tick_budget() {
        let mut grid = Grid::new(50, GridMode::Maze);
        let mut generator = Generator::new(&mut grid, Some(3));
        let mut carved = Vec::new();
        let done = generator.carve(&mut grid, 5, &mut carved);
        assert!(!done);
        // Each iteration visits at most one new cell, plus the seeded start.
        let visited = grid.cells().iter().filter(|c| c.generation_visited).count();
        assert!(visited <= 6, "visited {visited} cells in a 5-iteration tick");
        assert!(carved.len() <= 10);
    }

    #[test]
    fn carve_after_exhaustion_is_a_no_op() {
        let mut grid = Grid::new(3, GridMode::Maze);
        let mut generator = Generator::new(&mut grid, Some(1));
        let mut carved = Vec::new();
        while !generator.carve(&mut grid, 16, &mut carved) {}
        carved.clear();
        assert!(generator.carve(&mut grid, 16, &mut carved));
        assert!(carved.is_empty());
        assert!(generator.is_exhausted());
    }
}
