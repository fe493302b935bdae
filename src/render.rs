use crate::animation::Rgb;
use crate::grid::Walls;

/// The drawing collaborator the engine paints through. Coordinates are grid
/// cell coordinates; a surface decides where cell `(col, row)` lives on
/// screen, the engine only promises each cell a known, non-overlapping
/// region.
pub trait RenderSurface {
    /// Fill the interior of a cell with a solid color.
    fn fill_cell(&mut self, col: u16, row: u16, color: Rgb);

    /// Stroke the cell's standing boundary walls.
    fn stroke_walls(&mut self, col: u16, row: u16, walls: Walls, color: Rgb);
}

/// Surface that draws nothing. Used by tests and headless ticking.
pub struct NullSurface;

impl RenderSurface for NullSurface {
    fn fill_cell(&mut self, _col: u16, _row: u16, _color: Rgb) {}

    fn stroke_walls(&mut self, _col: u16, _row: u16, _walls: Walls, _color: Rgb) {}
}
