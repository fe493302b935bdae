use thiserror::Error;

use crate::grid::GridMode;
use crate::search::SearchKind;

/// Configuration errors are caught at construction, before any grid state
/// exists. Destructive inputs fail fast instead of being clamped.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("canvas size must be at least 1 pixel, got {0}")]
    EmptyCanvas(u32),
    #[error("line width must be at least 1 pixel, got 0")]
    ZeroLineWidth,
    #[error("padding ({padding}px) must leave room inside the canvas ({canvas_size}px)")]
    PaddingTooLarge { padding: u32, canvas_size: u32 },
}

/// Strongly-typed engine options with the defaulting rules enumerated once.
/// `dimensions` below 1 is the only input that gets defaulted (clamped up
/// to 1); everything else destructive is a [`ConfigError`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Grid is `dimensions x dimensions` cells. Default 10, minimum 1.
    pub dimensions: u16,
    /// Square canvas extent in pixels.
    pub canvas_size: u32,
    /// Offset so wall lines at the canvas edge aren't cut off.
    pub padding: u32,
    /// Width of the wall strokes.
    pub line_width: u32,
    /// Carve iterations per tick. Defaults scale with `dimensions^2` so
    /// larger grids don't visibly slow down.
    pub generations_per_frame: Option<u32>,
    /// Frontier expansions per tick.
    pub searches_per_frame: Option<u32>,
    /// Solve-path cells played back per tick.
    pub solve_paths_per_frame: Option<u32>,
    pub search_kind: SearchKind,
    pub mode: GridMode,
    /// Fixed PRNG seed for reproducible generation; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            dimensions: 10,
            canvas_size: 800,
            padding: 4,
            line_width: 2,
            generations_per_frame: None,
            searches_per_frame: None,
            solve_paths_per_frame: None,
            search_kind: SearchKind::Bfs,
            mode: GridMode::Maze,
            seed: None,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_size == 0 {
            return Err(ConfigError::EmptyCanvas(self.canvas_size));
        }
        if self.line_width == 0 {
            return Err(ConfigError::ZeroLineWidth);
        }
        if self.padding >= self.canvas_size {
            return Err(ConfigError::PaddingTooLarge {
                padding: self.padding,
                canvas_size: self.canvas_size,
            });
        }
        Ok(())
    }

    /// Size >= 1 is the only defaulting permitted for destructive inputs.
    pub fn clamped_dimensions(&self) -> u16 {
        self.dimensions.max(1)
    }

    /// Ideal number of calls per frame for one phase: the explicit option
    /// if given, otherwise proportional to the cell count so bigger grids
    /// run faster by default. Never less than one.
    pub fn calls_per_frame(&self, explicit: Option<u32>, gain: f64) -> u32 {
        match explicit {
            Some(n) => n.max(1),
            None => {
                let cells = self.clamped_dimensions() as f64 * self.clamped_dimensions() as f64;
                ((cells / 1000.0 * gain).ceil() as u32).max(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.dimensions, 10);
    }

    #[test]
    fn destructive_inputs_fail_fast() {
        let mut config = EngineConfig {
            canvas_size: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyCanvas(0)));

        config.canvas_size = 100;
        config.line_width = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroLineWidth));

        config.line_width = 1;
        config.padding = 100;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PaddingTooLarge { .. })
        ));
    }

    #[test]
    fn dimensions_clamp_to_one() {
        let config = EngineConfig {
            dimensions: 0,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.clamped_dimensions(), 1);
    }

    #[test]
    fn per_frame_budgets_scale_with_cell_count() {
        let config = EngineConfig {
            dimensions: 100,
            ..EngineConfig::default()
        };
        // ceil(100^2 / 1000 * gain)
        assert_eq!(config.calls_per_frame(None, 3.0), 30);
        assert_eq!(config.calls_per_frame(None, 1.0), 10);
        assert_eq!(config.calls_per_frame(None, 0.5), 5);
        // Small grids floor at one call per frame.
        let small = EngineConfig::default();
        assert_eq!(small.calls_per_frame(None, 0.5), 1);
        // Explicit options win, but never drop below one.
        assert_eq!(config.calls_per_frame(Some(7), 3.0), 7);
        assert_eq!(config.calls_per_frame(Some(0), 3.0), 1);
    }
}
