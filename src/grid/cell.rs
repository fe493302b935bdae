use crate::animation::{AnimationKind, Rgb};
use crate::grid::{CellId, GridMode};

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const LIGHT_GRAY: Rgb = Rgb(220, 220, 220);
pub const ELECTRIC_BLUE: Rgb = Rgb(25, 178, 255);
pub const LIGHT_YELLOW: Rgb = Rgb(255, 251, 189);

/// The four cardinal directions, in the order neighbors are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

/// Boundary wall flags of a single cell. `true` means the wall is present.
/// Carving always clears both sides of a shared edge, so these stay
/// symmetric between neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Walls {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl Walls {
    pub const ALL: Walls = Walls {
        north: true,
        east: true,
        south: true,
        west: true,
    };

    pub fn has(&self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    pub fn set(&mut self, direction: Direction, present: bool) {
        match direction {
            Direction::North => self.north = present,
            Direction::East => self.east = present,
            Direction::South => self.south = present,
            Direction::West => self.west = present,
        }
    }
}

/// Whether the cell itself blocks traversal. Only consulted in
/// [`GridMode::Open`], where walls are painted onto cells by the user
/// instead of living on edges.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    #[default]
    Open,
    Wall,
}

/// One grid unit. Identified by `(col, row)`, immutable after creation;
/// everything else is mutated in place by generation, search, user edits,
/// and the animation queue.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub col: u16,
    pub row: u16,

    pub walls: Walls,
    pub kind: CellKind,

    /// Set once when the generator first reaches the cell; never unset.
    pub generation_visited: bool,
    /// Set once per search pass (forward frontier).
    pub search_visited: bool,
    /// Independent visited flag for the backward frontier of a
    /// bidirectional search.
    pub search_visited_rev: bool,
    /// Cell that discovered this one (forward search tree). Attached on
    /// first discovery, never overwritten.
    pub solve_parent: Option<CellId>,
    /// Same, for the backward search tree.
    pub solve_parent_rev: Option<CellId>,

    /// Latch for mouse-drag wall painting: while the button is held a cell
    /// toggles at most once. Cleared on mouse-up.
    pub is_newly_placed: bool,

    // Presentation state, not structural state.
    pub fill_color: Rgb,
    pub wall_color: Rgb,
    /// Which animation kind currently owns this cell's colors, if any.
    pub animating: Option<AnimationKind>,
}

impl Cell {
    pub fn new(col: u16, row: u16, mode: GridMode) -> Self {
        Cell {
            col,
            row,
            walls: Walls::ALL,
            kind: CellKind::Open,
            generation_visited: false,
            search_visited: false,
            search_visited_rev: false,
            solve_parent: None,
            solve_parent_rev: None,
            is_newly_placed: false,
            fill_color: WHITE,
            wall_color: Cell::resting_wall_color(mode),
            animating: None,
        }
    }

    /// Resting color of the wall lines: heavy black walls for a generated
    /// maze, faint grid lines for the editable open grid.
    pub fn resting_wall_color(mode: GridMode) -> Rgb {
        match mode {
            GridMode::Maze => BLACK,
            GridMode::Open => LIGHT_GRAY,
        }
    }

    /// Resting fill for the cell's current kind.
    pub fn resting_fill_color(&self) -> Rgb {
        match self.kind {
            CellKind::Open => WHITE,
            CellKind::Wall => BLACK,
        }
    }
}
