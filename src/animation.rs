use std::collections::VecDeque;

use crate::grid::{CellId, Grid};
use crate::render::RenderSurface;

/// An RGB color buffer. Cells carry one for their fill and one for their
/// wall lines; animations step these toward a target a little each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Move each channel `step` units toward `target`, snapping a channel
    /// directly onto the target once the remaining distance is smaller than
    /// the step (prevents oscillating around the target forever).
    /// Returns true when all channels have arrived.
    pub fn ease_toward(&mut self, target: Rgb, step: u8) -> bool {
        let step = step.max(1);
        let mut done = true;
        for (current, target) in [
            (&mut self.0, target.0),
            (&mut self.1, target.1),
            (&mut self.2, target.2),
        ] {
            if *current == target {
                continue;
            }
            if current.abs_diff(target) < step {
                *current = target;
            } else if target > *current {
                done = false;
                *current += step;
            } else {
                done = false;
                *current -= step;
            }
        }
        done
    }
}

/// Which visual transition a queued animation is driving. A cell is owned
/// by at most one kind at a time; a newer kind silently retires any queued
/// steps of the older one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// Freshly carved cell decaying from the highlight color back to its
    /// resting fill and wall colors.
    Generation,
    /// Expanded frontier cell fading to the settled search color.
    Search,
    /// Solve-path cell fading to the solved color.
    Solve,
}

/// One pending color transition, inspectable as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Animation {
    pub cell: CellId,
    pub kind: AnimationKind,
    pub fill_target: Rgb,
    /// Generation decay also settles the wall color; the other kinds leave
    /// walls alone.
    pub wall_target: Option<Rgb>,
    pub step: u8,
}

/// FIFO of pending color transitions, drained exactly once per tick.
/// A step that hasn't reached its target re-enqueues itself, so a long fade
/// is spread over many frames without ever blocking one.
#[derive(Debug, Default)]
pub struct AnimationQueue {
    queue: VecDeque<Animation>,
}

impl AnimationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, animation: Animation) {
        self.queue.push_back(animation);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Run every animation currently queued, once. Steps pushed back in
    /// (unfinished fades) are not run again until the next tick. Steps whose
    /// cell has since been claimed by a different animation kind are dropped.
    pub fn run(&mut self, grid: &mut Grid, surface: &mut dyn RenderSurface) {
        let pending = self.queue.len();
        for _ in 0..pending {
            let Some(animation) = self.queue.pop_front() else {
                return;
            };
            let Some(cell) = grid.cells_mut().get_mut(animation.cell) else {
                continue;
            };
            // A competing animation has taken over this cell; let this
            // step die so the two don't flicker against each other.
            if cell.animating != Some(animation.kind) {
                continue;
            }

            let mut done = cell.fill_color.ease_toward(animation.fill_target, animation.step);
            if let Some(wall_target) = animation.wall_target {
                done &= cell.wall_color.ease_toward(wall_target, animation.step);
            }

            grid.draw_cell(animation.cell, surface);

            if done {
                grid.cells_mut()[animation.cell].animating = None;
            } else {
                self.queue.push_back(animation);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NullSurface;

    #[test]
    fn ease_converges_and_snaps_final_increment() {
        let mut color = Rgb(0, 250, 100);
        let target = Rgb(30, 0, 100);
        let mut steps = 0;
        while !color.ease_toward(target, 25) {
            steps += 1;
            assert!(steps < 100, "easing must terminate");
        }
        assert_eq!(color, target);
    }

    #[test]
    fn zero_step_is_treated_as_one() {
        let mut color = Rgb(0, 0, 0);
        assert!(!color.ease_toward(Rgb(2, 0, 0), 0));
        assert_eq!(color, Rgb(1, 0, 0));
    }

    #[test]
    fn queue_runs_each_step_once_per_tick() {
        let mut grid = Grid::new(3, crate::grid::GridMode::Open);
        let id = grid.cell_index(1, 1);
        grid.cells_mut()[id].fill_color = Rgb(0, 0, 0);
        grid.cells_mut()[id].animating = Some(AnimationKind::Search);

        let mut queue = AnimationQueue::new();
        queue.push(Animation {
            cell: id,
            kind: AnimationKind::Search,
            fill_target: Rgb(100, 0, 0),
            wall_target: None,
            step: 10,
        });

        let mut surface = NullSurface;
        queue.run(&mut grid, &mut surface);
        // One tick advances exactly one increment, then re-enqueues.
        assert_eq!(grid.cells()[id].fill_color, Rgb(10, 0, 0));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn superseded_kind_is_dropped() {
        let mut grid = Grid::new(3, crate::grid::GridMode::Open);
        let id = grid.cell_index(0, 0);
        grid.cells_mut()[id].fill_color = Rgb(0, 0, 0);
        grid.cells_mut()[id].animating = Some(AnimationKind::Solve);

        let mut queue = AnimationQueue::new();
        queue.push(Animation {
            cell: id,
            kind: AnimationKind::Search,
            fill_target: Rgb(200, 0, 0),
            wall_target: None,
            step: 10,
        });

        let mut surface = NullSurface;
        queue.run(&mut grid, &mut surface);
        assert!(queue.is_empty());
        assert_eq!(grid.cells()[id].fill_color, Rgb(0, 0, 0));
    }

    #[test]
    fn finished_animation_releases_the_cell() {
        let mut grid = Grid::new(2, crate::grid::GridMode::Open);
        let id = grid.cell_index(1, 0);
        grid.cells_mut()[id].fill_color = Rgb(95, 0, 0);
        grid.cells_mut()[id].animating = Some(AnimationKind::Search);

        let mut queue = AnimationQueue::new();
        queue.push(Animation {
            cell: id,
            kind: AnimationKind::Search,
            fill_target: Rgb(100, 0, 0),
            wall_target: None,
            step: 10,
        });

        let mut surface = NullSurface;
        queue.run(&mut grid, &mut surface);
        assert!(queue.is_empty());
        assert_eq!(grid.cells()[id].fill_color, Rgb(100, 0, 0));
        assert_eq!(grid.cells()[id].animating, None);
    }
}
