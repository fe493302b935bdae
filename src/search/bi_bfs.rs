use super::{SearchState, SearchStatus, trace_path};
use crate::grid::cell::ELECTRIC_BLUE;
use crate::grid::{CellId, Grid};

/// Two independent FIFO frontiers stepped in lockstep: one rooted at the
/// start growing forward-parent links, one rooted at the end growing
/// backward-parent links. The run ends as soon as one tree touches a cell
/// the other tree has already discovered.
///
/// Meetings are detected at enqueue time (and again on dequeue, which also
/// covers the degenerate start == end grid): checking only dequeued cells
/// can miss a meeting that happened through a neighbor enqueue.
pub(super) fn search_bi_bfs(
    grid: &mut Grid,
    state: &mut SearchState,
    marked: &mut Vec<CellId>,
    budget: u32,
) -> SearchStatus {
    for _ in 0..budget {
        if state.frontier.is_empty() && state.frontier_rev.is_empty() {
            tracing::debug!("both bidirectional frontiers exhausted, no meeting");
            return SearchStatus::NoSolution;
        }

        // One expansion of the forward tree.
        if let Some(id) = state.frontier.pop_front() {
            if !grid.cells()[id].search_visited {
                grid.cells_mut()[id].search_visited = true;
                marked.push(id);
                if discovered_backward(grid, state, id) {
                    return SearchStatus::Found(trace_meeting(grid, id));
                }
                for neighbor in grid.traversable_neighbors(id) {
                    let cell = &grid.cells()[neighbor];
                    if cell.search_visited
                        || cell.solve_parent.is_some()
                        || neighbor == state.start
                    {
                        continue;
                    }
                    let cell = &mut grid.cells_mut()[neighbor];
                    cell.solve_parent = Some(id);
                    cell.fill_color = ELECTRIC_BLUE;
                    if discovered_backward(grid, state, neighbor) {
                        return SearchStatus::Found(trace_meeting(grid, neighbor));
                    }
                    state.frontier.push_back(neighbor);
                }
            }
        }

        // One expansion of the backward tree.
        if let Some(id) = state.frontier_rev.pop_front() {
            if !grid.cells()[id].search_visited_rev {
                grid.cells_mut()[id].search_visited_rev = true;
                marked.push(id);
                if discovered_forward(grid, state, id) {
                    return SearchStatus::Found(trace_meeting(grid, id));
                }
                for neighbor in grid.traversable_neighbors(id) {
                    let cell = &grid.cells()[neighbor];
                    if cell.search_visited_rev
                        || cell.solve_parent_rev.is_some()
                        || neighbor == state.end
                    {
                        continue;
                    }
                    let cell = &mut grid.cells_mut()[neighbor];
                    cell.solve_parent_rev = Some(id);
                    cell.fill_color = ELECTRIC_BLUE;
                    if discovered_forward(grid, state, neighbor) {
                        return SearchStatus::Found(trace_meeting(grid, neighbor));
                    }
                    state.frontier_rev.push_back(neighbor);
                }
            }
        }
    }
    SearchStatus::InProgress
}

/// Has the backward tree (rooted at the end) already reached this cell?
fn discovered_backward(grid: &Grid, state: &SearchState, id: CellId) -> bool {
    let cell = &grid.cells()[id];
    cell.search_visited_rev || cell.solve_parent_rev.is_some() || id == state.end
}

/// Has the forward tree (rooted at the start) already reached this cell?
fn discovered_forward(grid: &Grid, state: &SearchState, id: CellId) -> bool {
    let cell = &grid.cells()[id];
    cell.search_visited || cell.solve_parent.is_some() || id == state.start
}

/// The meeting cell belongs to both trees: its forward-parent chain runs
/// back to the start, its backward-parent chain runs forward to the end.
/// Concatenating the two gives a connected start-to-end path.
fn trace_meeting(grid: &Grid, meeting: CellId) -> Vec<CellId> {
    let mut path = trace_path(grid, meeting);
    let mut current = meeting;
    while let Some(parent) = grid.cells()[current].solve_parent_rev {
        path.push(parent);
        current = parent;
    }
    path
}
