mod bfs;
mod bi_bfs;
mod dfs;

use std::collections::VecDeque;

use crate::grid::{CellId, Grid};

use bfs::search_bfs;
use bi_bfs::search_bi_bfs;
use dfs::search_dfs;

/// The pluggable graph-search strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Bfs,
    Dfs,
    BiBfs,
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchKind::Bfs => write!(f, "Breadth-First Search (BFS)"),
            SearchKind::Dfs => write!(f, "Depth-First Search (DFS)"),
            SearchKind::BiBfs => write!(f, "Bidirectional Breadth-First Search"),
        }
    }
}

/// Outcome of one budgeted slice of searching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// Budget spent, frontier still live.
    InProgress,
    /// Path from start to end, inclusive, in walk order.
    Found(Vec<CellId>),
    /// Every frontier emptied without reaching the end. A legitimate
    /// terminal outcome on user-edited grids, not an error.
    NoSolution,
}

/// The frontier structures for one search run. A single double-ended queue
/// serves both disciplines: BFS dequeues from the front, DFS from the back.
/// The second frontier exists only for the bidirectional strategy, seeded
/// at the end cell.
pub struct SearchState {
    pub frontier: VecDeque<CellId>,
    pub frontier_rev: VecDeque<CellId>,
    pub start: CellId,
    pub end: CellId,
}

impl SearchState {
    pub fn seed(kind: SearchKind, grid: &Grid) -> Self {
        let start = grid.start();
        let end = grid.end();
        let mut frontier_rev = VecDeque::new();
        if kind == SearchKind::BiBfs {
            frontier_rev.push_back(end);
        }
        SearchState {
            frontier: VecDeque::from([start]),
            frontier_rev,
            start,
            end,
        }
    }
}

/// Runs up to `budget` frontier expansions of the chosen strategy. Cells
/// marked visited this slice are appended to `marked` so the caller can
/// animate them.
pub fn step(
    kind: SearchKind,
    grid: &mut Grid,
    state: &mut SearchState,
    marked: &mut Vec<CellId>,
    budget: u32,
) -> SearchStatus {
    match kind {
        SearchKind::Bfs => search_bfs(grid, state, marked, budget),
        SearchKind::Dfs => search_dfs(grid, state, marked, budget),
        SearchKind::BiBfs => search_bi_bfs(grid, state, marked, budget),
    }
}

/// Walks the forward-parent chain from `from` back to the search origin and
/// returns the cells in origin-to-`from` order.
pub(crate) fn trace_path(grid: &Grid, from: CellId) -> Vec<CellId> {
    let mut path = vec![from];
    let mut current = from;
    while let Some(parent) = grid.cells()[current].solve_parent {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    path
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::grid::{CellKind, Direction, GridMode};

    /// Hand-carved serpentine 3x3 maze. The only path from (0,0) to (2,2)
    /// snakes through all nine cells:
    ///
    ///   (0,0)-(1,0)-(2,0)
    ///                 |
    ///   (0,1)-(1,1)-(2,1)
    ///     |
    ///   (0,2)-(1,2)-(2,2)
    pub(crate) fn serpentine_3x3() -> Grid {
        let mut grid = Grid::new(3, GridMode::Maze);
        let carves = [
            ((0, 0), (1, 0), Direction::East),
            ((1, 0), (2, 0), Direction::East),
            ((2, 0), (2, 1), Direction::South),
            ((2, 1), (1, 1), Direction::West),
            ((1, 1), (0, 1), Direction::West),
            ((0, 1), (0, 2), Direction::South),
            ((0, 2), (1, 2), Direction::East),
            ((1, 2), (2, 2), Direction::East),
        ];
        for (a, b, direction) in carves {
            let a = grid.cell_index(a.0, a.1);
            let b = grid.cell_index(b.0, b.1);
            grid.carve(a, b, direction);
        }
        grid
    }

    pub(crate) fn run_to_completion(kind: SearchKind, grid: &mut Grid) -> SearchStatus {
        let mut state = SearchState::seed(kind, grid);
        let mut marked = Vec::new();
        let cells = grid.cells().len() as u32;
        // Frontier exhaustion is bounded by grid size; cap the tick count
        // so a regression shows up as a panic instead of a hang.
        for _ in 0..=cells * 4 {
            match step(kind, grid, &mut state, &mut marked, 2) {
                SearchStatus::InProgress => continue,
                outcome => return outcome,
            }
        }
        panic!("search did not terminate within the tick bound");
    }

    pub(crate) fn assert_valid_path(grid: &Grid, path: &[CellId]) {
        assert_eq!(path.first(), Some(&grid.start()));
        assert_eq!(path.last(), Some(&grid.end()));
        for pair in path.windows(2) {
            assert!(
                grid.traversable_neighbors(pair[0]).contains(&pair[1]),
                "path step {:?} -> {:?} is not traversable",
                grid.cell_coords(pair[0]),
                grid.cell_coords(pair[1]),
            );
        }
    }

    fn reset_search_marks(grid: &mut Grid) {
        for cell in grid.cells_mut() {
            cell.search_visited = false;
            cell.search_visited_rev = false;
            cell.solve_parent = None;
            cell.solve_parent_rev = None;
        }
    }

    #[test]
    fn bfs_on_serpentine_fixture_finds_the_full_snake() {
        let mut grid = serpentine_3x3();
        let SearchStatus::Found(path) = run_to_completion(SearchKind::Bfs, &mut grid) else {
            panic!("expected a path");
        };
        assert_valid_path(&grid, &path);
        // Unique path through all nine cells.
        assert_eq!(path.len(), 9);
    }

    #[test]
    fn dfs_finds_a_valid_path_on_the_fixture() {
        let mut grid = serpentine_3x3();
        let SearchStatus::Found(path) = run_to_completion(SearchKind::Dfs, &mut grid) else {
            panic!("expected a path");
        };
        assert_valid_path(&grid, &path);
    }

    #[test]
    fn bfs_path_is_never_longer_than_dfs_path() {
        let mut grid = Grid::new(4, GridMode::Open);
        let SearchStatus::Found(bfs_path) = run_to_completion(SearchKind::Bfs, &mut grid) else {
            panic!("expected a path");
        };
        reset_search_marks(&mut grid);
        let SearchStatus::Found(dfs_path) = run_to_completion(SearchKind::Dfs, &mut grid) else {
            panic!("expected a path");
        };
        assert_valid_path(&grid, &bfs_path);
        assert_valid_path(&grid, &dfs_path);
        // Fully open 4x4 grid: BFS shortest path is 7 cells corner to corner.
        assert_eq!(bfs_path.len(), 7);
        assert!(bfs_path.len() <= dfs_path.len());
    }

    #[test]
    fn bidirectional_path_is_valid_on_connected_grids() {
        let mut grid = serpentine_3x3();
        let SearchStatus::Found(path) = run_to_completion(SearchKind::BiBfs, &mut grid) else {
            panic!("expected a path");
        };
        assert_valid_path(&grid, &path);
        assert_eq!(path.len(), 9);

        let mut open = Grid::new(5, GridMode::Open);
        let SearchStatus::Found(path) = run_to_completion(SearchKind::BiBfs, &mut open) else {
            panic!("expected a path");
        };
        assert_valid_path(&open, &path);
    }

    #[test]
    fn walled_off_open_grid_reports_no_solution_for_every_strategy() {
        for kind in [SearchKind::Bfs, SearchKind::Dfs, SearchKind::BiBfs] {
            let mut grid = Grid::new(5, GridMode::Open);
            // A full wall column separates start from end.
            for row in 0..5 {
                grid[(2, row)].kind = CellKind::Wall;
            }
            assert_eq!(
                run_to_completion(kind, &mut grid),
                SearchStatus::NoSolution,
                "{kind}"
            );
        }
    }

    #[test]
    fn uncarved_maze_reports_no_solution() {
        // All interior walls standing: only the forced-open entrance/exit
        // edges exist, and those lead off-grid.
        let mut grid = Grid::new(3, GridMode::Maze);
        assert_eq!(
            run_to_completion(SearchKind::Bfs, &mut grid),
            SearchStatus::NoSolution
        );
    }

    #[test]
    fn single_cell_grid_solves_trivially() {
        for kind in [SearchKind::Bfs, SearchKind::Dfs, SearchKind::BiBfs] {
            let mut grid = Grid::new(1, GridMode::Maze);
            let SearchStatus::Found(path) = run_to_completion(kind, &mut grid) else {
                panic!("expected a path for {kind}");
            };
            assert_eq!(path, vec![grid.start()]);
        }
    }

    #[test]
    fn parents_attach_once_and_are_never_overwritten() {
        let mut grid = Grid::new(4, GridMode::Open);
        let mut state = SearchState::seed(SearchKind::Bfs, &grid);
        let mut marked = Vec::new();
        let mut parents: Vec<Option<CellId>> = vec![None; grid.cells().len()];
        loop {
            let status = step(SearchKind::Bfs, &mut grid, &mut state, &mut marked, 1);
            for (id, cell) in grid.cells().iter().enumerate() {
                match (parents[id], cell.solve_parent) {
                    (None, new) => parents[id] = new,
                    (Some(old), Some(new)) => assert_eq!(old, new, "parent rewritten"),
                    (Some(_), None) => panic!("parent cleared mid-search"),
                }
            }
            if status != SearchStatus::InProgress {
                break;
            }
        }
    }
}
