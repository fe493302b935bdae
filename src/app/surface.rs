use std::io::{Stdout, Write};

use crossterm::{
    cursor, queue,
    style::{self, Color, Stylize},
};

use crate::animation::Rgb;
use crate::grid::cell::WHITE;
use crate::grid::Walls;
use crate::render::RenderSurface;

/// Terminal surface on a character lattice. A grid of `n x n` cells maps to
/// `(2n + 1)` rows: odd lattice coordinates are cell interiors, even ones
/// are wall lines and corner posts shared between neighbors. Each lattice
/// unit is [`TermSurface::CELL_WIDTH`] characters wide so cells come out
/// roughly square.
pub struct TermSurface {
    stdout: Stdout,
    /// Terminal position of the lattice's top-left corner.
    origin: (u16, u16),
    /// First queueing error, surfaced by the next `flush`. Draw calls after
    /// an error are dropped.
    error: Option<std::io::Error>,
}

impl TermSurface {
    /// The width of each lattice unit when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;

    pub fn new(origin: (u16, u16)) -> Self {
        Self {
            stdout: std::io::stdout(),
            origin,
            error: None,
        }
    }

    /// Lattice footprint of an `n x n` grid: `(columns, rows)` in terminal
    /// characters.
    pub fn extent(dimensions: u16) -> (u16, u16) {
        let lattice = 2 * dimensions + 1;
        (lattice * TermSurface::CELL_WIDTH, lattice)
    }

    /// Paint one lattice unit with a solid background color.
    fn paint(&mut self, x: u16, y: u16, color: Rgb) {
        if self.error.is_some() {
            return;
        }
        let Rgb(r, g, b) = color;
        let block = "  ".on(Color::Rgb { r, g, b });

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                block.content().width(),
                TermSurface::CELL_WIDTH as usize,
                "Each lattice unit must occupy exactly two character widths."
            );
        }

        if let Err(e) = queue!(
            self.stdout,
            cursor::MoveTo(
                self.origin.0 + x * TermSurface::CELL_WIDTH,
                self.origin.1 + y
            ),
            style::PrintStyledContent(block)
        ) {
            self.error = Some(e);
        }
    }

    /// Push queued draws to the terminal, reporting any error a draw call
    /// hit since the last flush.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(e) = self.error.take() {
            return Err(e);
        }
        self.stdout.flush()
    }
}

impl RenderSurface for TermSurface {
    fn fill_cell(&mut self, col: u16, row: u16, color: Rgb) {
        self.paint(2 * col + 1, 2 * row + 1, color);
    }

    fn stroke_walls(&mut self, col: u16, row: u16, walls: Walls, color: Rgb) {
        let (cx, cy) = (2 * col + 1, 2 * row + 1);
        // Corner posts are shared between up to four cells and always stand.
        for (x, y) in [
            (cx - 1, cy - 1),
            (cx + 1, cy - 1),
            (cx - 1, cy + 1),
            (cx + 1, cy + 1),
        ] {
            self.paint(x, y, color);
        }
        // Edge midpoints; a carved opening renders as open floor.
        let edges = [
            (walls.north, cx, cy - 1),
            (walls.south, cx, cy + 1),
            (walls.west, cx - 1, cy),
            (walls.east, cx + 1, cy),
        ];
        for (standing, x, y) in edges {
            self.paint(x, y, if standing { color } else { WHITE });
        }
    }
}
