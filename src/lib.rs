pub mod animation;
pub mod app;
pub mod config;
pub mod engine;
pub mod generator;
pub mod grid;
pub mod render;
pub mod search;

pub use config::{ConfigError, EngineConfig};
pub use engine::{Engine, Phase, SolveOutcome};
pub use grid::{CellId, Grid, GridMode};
pub use search::SearchKind;
