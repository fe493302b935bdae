use super::{SearchState, SearchStatus, trace_path};
use crate::grid::cell::ELECTRIC_BLUE;
use crate::grid::{CellId, Grid};

/// Same shape as BFS with a LIFO frontier: expansions follow the most
/// recently discovered cell. The path found reflects exploration order
/// only; no shortest-path guarantee, but visited-marking still bounds the
/// walk and guarantees termination.
pub(super) fn search_dfs(
    grid: &mut Grid,
    state: &mut SearchState,
    marked: &mut Vec<CellId>,
    budget: u32,
) -> SearchStatus {
    for _ in 0..budget {
        let Some(id) = state.frontier.pop_back() else {
            tracing::debug!("dfs frontier exhausted without reaching the end cell");
            return SearchStatus::NoSolution;
        };
        if grid.cells()[id].search_visited {
            continue;
        }
        grid.cells_mut()[id].search_visited = true;
        marked.push(id);

        if id == state.end {
            return SearchStatus::Found(trace_path(grid, id));
        }

        for neighbor in grid.traversable_neighbors(id) {
            let cell = &grid.cells()[neighbor];
            if cell.search_visited || cell.solve_parent.is_some() || neighbor == state.start {
                continue;
            }
            let cell = &mut grid.cells_mut()[neighbor];
            cell.solve_parent = Some(id);
            cell.fill_color = ELECTRIC_BLUE;
            state.frontier.push_back(neighbor);
        }
    }
    SearchStatus::InProgress
}
