use crate::animation::{Animation, AnimationKind, AnimationQueue};
use crate::config::{ConfigError, EngineConfig};
use crate::generator::Generator;
use crate::grid::cell::{Cell, CellKind, ELECTRIC_BLUE, LIGHT_YELLOW, WHITE};
use crate::grid::{CellId, Grid, GridMode};
use crate::render::RenderSurface;
use crate::search::{self, SearchKind, SearchState, SearchStatus};

/// Color-easing increment for search and solve fades.
const SEARCH_STEP: u8 = 10;
const SOLVE_STEP: u8 = 10;

/// Mutually exclusive scheduler states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Idle, accepting wall edits; leaves on `on_solve`.
    Waiting,
    /// The carver is running.
    Generating,
    /// The active strategy is expanding frontiers.
    Searching,
    /// Playing the found path back, one budgeted slice per tick.
    Solving,
    /// Terminal for the run; the animation queue still drains.
    Complete,
}

/// How the last solve run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved,
    /// Start and end are disconnected. A legitimate outcome on user-edited
    /// grids; the engine returns to `Waiting` so walls can be edited and
    /// the solve retried.
    NoSolution,
}

/// The cooperative per-frame scheduler: owns the grid, the generation and
/// search structures, and the animation queue. One `tick` performs a
/// bounded amount of phase work plus one animation-queue drain and returns;
/// it never blocks, whatever the grid size.
pub struct Engine {
    config: EngineConfig,
    grid: Grid,
    generator: Option<Generator>,
    search_kind: SearchKind,
    search: Option<SearchState>,
    phase: Phase,
    /// Set when a phase finishes so its decay animations settle before the
    /// next phase paints over them; cleared once the queue drains.
    waiting_for_animation: bool,
    animations: AnimationQueue,
    /// Found path in start-to-end order; playback pops from the back so the
    /// solve traces from the exit back to the entrance.
    solve_path: Vec<CellId>,
    outcome: Option<SolveOutcome>,
    /// Cells edited since the last tick, redrawn at the next tick.
    dirty: Vec<CellId>,
    mouse: (u16, u16),
    mouse_down: bool,
    generations_per_frame: u32,
    searches_per_frame: u32,
    solve_paths_per_frame: u32,
    generation_step: u8,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let dimensions = config.clamped_dimensions();
        let mut grid = Grid::new(dimensions, config.mode);

        let (generator, phase) = match config.mode {
            GridMode::Maze => (Some(Generator::new(&mut grid, config.seed)), Phase::Generating),
            GridMode::Open => (None, Phase::Waiting),
        };

        let generations_per_frame = config.calls_per_frame(config.generations_per_frame, 3.0);
        let searches_per_frame = config.calls_per_frame(config.searches_per_frame, 1.0);
        let solve_paths_per_frame = config.calls_per_frame(config.solve_paths_per_frame, 0.5);
        // Bigger grids decay faster so the highlight wave keeps up.
        let generation_step = (dimensions.div_ceil(10)).min(u8::MAX as u16) as u8;

        tracing::info!(
            dimensions,
            ?config.mode,
            generations_per_frame,
            searches_per_frame,
            solve_paths_per_frame,
            "engine constructed"
        );

        Ok(Engine {
            search_kind: config.search_kind,
            config,
            grid,
            generator,
            search: None,
            phase,
            waiting_for_animation: false,
            animations: AnimationQueue::new(),
            solve_path: Vec::new(),
            outcome: None,
            dirty: Vec::new(),
            mouse: (0, 0),
            mouse_down: false,
            generations_per_frame,
            searches_per_frame,
            solve_paths_per_frame,
            generation_step,
        })
    }

    /// Rebuild from scratch with (possibly updated) options. Collapses to
    /// the same invariants as construction; calling it twice with the same
    /// options is idempotent up to the randomized maze itself.
    pub fn reset(&mut self, config: EngineConfig) -> Result<(), ConfigError> {
        *self = Engine::new(config)?;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<SolveOutcome> {
        self.outcome
    }

    pub fn search_kind(&self) -> SearchKind {
        self.search_kind
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn waiting_for_animation(&self) -> bool {
        self.waiting_for_animation
    }

    pub fn pending_animations(&self) -> usize {
        self.animations.len()
    }

    /// Paint every cell. Called once after construction or reset; ticks
    /// only repaint cells that changed.
    pub fn draw_all(&self, surface: &mut dyn RenderSurface) {
        self.grid.draw_all(surface);
    }

    /// Advance one frame: repaint user edits, run the active phase under
    /// its budget (unless the previous phase's animations are still
    /// settling), then drain the animation queue exactly once.
    pub fn tick(&mut self, surface: &mut dyn RenderSurface) {
        for id in std::mem::take(&mut self.dirty) {
            self.grid.draw_cell(id, surface);
        }

        if !self.waiting_for_animation {
            match self.phase {
                Phase::Generating => self.generate_tick(surface),
                Phase::Searching => self.search_tick(),
                Phase::Solving => self.solve_tick(),
                Phase::Waiting | Phase::Complete => {}
            }
        }

        self.animations.run(&mut self.grid, surface);
        if self.waiting_for_animation && self.animations.is_empty() {
            self.waiting_for_animation = false;
        }
    }

    fn generate_tick(&mut self, surface: &mut dyn RenderSurface) {
        let Some(generator) = self.generator.as_mut() else {
            return;
        };
        let mut carved = Vec::new();
        let exhausted = generator.carve(&mut self.grid, self.generations_per_frame, &mut carved);

        for id in carved {
            let cell = &mut self.grid.cells_mut()[id];
            cell.fill_color = ELECTRIC_BLUE;
            cell.wall_color = ELECTRIC_BLUE;
            cell.animating = Some(AnimationKind::Generation);
            self.grid.draw_cell(id, surface);
            self.animations.push(Animation {
                cell: id,
                kind: AnimationKind::Generation,
                fill_target: WHITE,
                wall_target: Some(Cell::resting_wall_color(self.grid.mode())),
                step: self.generation_step,
            });
        }

        if exhausted {
            tracing::info!("generation complete, handing off to {}", self.search_kind);
            self.generator = None;
            self.arm_search();
            self.phase = Phase::Searching;
            self.waiting_for_animation = true;
        }
    }

    /// Clears the marks of any previous search pass and seeds fresh
    /// frontiers for the active strategy.
    fn arm_search(&mut self) {
        for cell in self.grid.cells_mut() {
            cell.search_visited = false;
            cell.search_visited_rev = false;
            cell.solve_parent = None;
            cell.solve_parent_rev = None;
        }
        self.solve_path.clear();
        self.search = Some(SearchState::seed(self.search_kind, &self.grid));
    }

    fn search_tick(&mut self) {
        let Some(state) = self.search.as_mut() else {
            return;
        };
        let mut marked = Vec::new();
        let status = search::step(
            self.search_kind,
            &mut self.grid,
            state,
            &mut marked,
            self.searches_per_frame,
        );

        for id in marked {
            self.grid.cells_mut()[id].animating = Some(AnimationKind::Search);
            self.animations.push(Animation {
                cell: id,
                kind: AnimationKind::Search,
                fill_target: LIGHT_YELLOW,
                wall_target: None,
                step: SEARCH_STEP,
            });
        }

        match status {
            SearchStatus::InProgress => {}
            SearchStatus::Found(path) => {
                tracing::info!(path_len = path.len(), "search reached the end cell");
                self.solve_path = path;
                self.search = None;
                self.phase = Phase::Solving;
                self.waiting_for_animation = true;
            }
            SearchStatus::NoSolution => {
                tracing::info!("no solution: start and end are disconnected");
                self.outcome = Some(SolveOutcome::NoSolution);
                self.search = None;
                self.phase = Phase::Waiting;
            }
        }
    }

    fn solve_tick(&mut self) {
        for _ in 0..self.solve_paths_per_frame {
            let Some(id) = self.solve_path.pop() else {
                tracing::info!("solve playback finished");
                self.outcome = Some(SolveOutcome::Solved);
                self.phase = Phase::Complete;
                return;
            };
            self.grid.cells_mut()[id].animating = Some(AnimationKind::Solve);
            self.animations.push(Animation {
                cell: id,
                kind: AnimationKind::Solve,
                fill_target: ELECTRIC_BLUE,
                wall_target: None,
                step: SOLVE_STEP,
            });
            // Stop the budget loop on the last cell: the empty-pop above may
            // only declare the run complete on a later tick, once the fade
            // just enqueued has drained.
            if self.solve_path.is_empty() {
                self.waiting_for_animation = true;
                return;
            }
        }
    }

    /// Transition out of `Waiting` and start the configured strategy. After
    /// a no-solution outcome (or a completed run on an editable grid) this
    /// re-arms a fresh search, so edit-and-retry always works.
    pub fn on_solve(&mut self) {
        let can_solve = match self.phase {
            Phase::Waiting => true,
            Phase::Complete => self.grid.mode() == GridMode::Open,
            _ => false,
        };
        if !can_solve {
            return;
        }
        tracing::info!("starting {} solve", self.search_kind);
        self.arm_search();
        self.outcome = None;
        self.phase = Phase::Searching;
    }

    /// Swap the active strategy. Only honored before solving starts.
    pub fn on_search_selection(&mut self, kind: SearchKind) {
        match self.phase {
            Phase::Searching | Phase::Solving => {
                tracing::debug!("ignoring strategy swap mid-solve");
            }
            _ => self.search_kind = kind,
        }
    }

    /// Track the pointer in canvas pixel coordinates; while the button is
    /// held, dragging paints walls.
    pub fn on_mouse_move(&mut self, x: f64, y: f64) {
        let canvas = self.config.canvas_size as f64;
        if !(0.0..canvas).contains(&x) || !(0.0..canvas).contains(&y) {
            return;
        }
        let dimensions = self.grid.dimensions() as f64;
        self.mouse = (
            ((x / canvas) * dimensions) as u16,
            ((y / canvas) * dimensions) as u16,
        );
        if self.mouse_down {
            self.toggle_at(self.mouse);
        }
    }

    pub fn on_mouse_down(&mut self, down: bool) {
        self.mouse_down = down;
        if down {
            self.toggle_at(self.mouse);
        } else {
            // Release the drag latch: every cell becomes toggleable again.
            for cell in self.grid.cells_mut() {
                cell.is_newly_placed = false;
            }
        }
    }

    /// Toggle a cell between open and wall. Editable-grid flavor only, and
    /// only while the scheduler is idle; the start and end cells are never
    /// toggleable. A cell toggles at most once per mouse hold.
    fn toggle_at(&mut self, (col, row): (u16, u16)) {
        if self.grid.mode() != GridMode::Open
            || !matches!(self.phase, Phase::Waiting | Phase::Complete)
            || !self.grid.is_in_bounds(col, row)
        {
            return;
        }
        let id = self.grid.cell_index(col, row);
        if id == self.grid.start() || id == self.grid.end() {
            tracing::debug!(col, row, "refusing to toggle a start/end cell");
            return;
        }
        let cell = &mut self.grid.cells_mut()[id];
        if cell.is_newly_placed {
            return;
        }
        cell.kind = match cell.kind {
            CellKind::Open => CellKind::Wall,
            CellKind::Wall => CellKind::Open,
        };
        cell.is_newly_placed = true;
        cell.fill_color = cell.resting_fill_color();
        cell.animating = None;
        self.dirty.push(id);
    }
}
