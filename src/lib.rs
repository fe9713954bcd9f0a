//! Grid-based falling sand: sand, water and walls on a cellular automaton.

pub mod brush;
pub mod config;
pub mod grid;
pub mod material;
pub mod sand_simulator;
pub mod stepper;
pub mod vec;

pub use brush::Stroke;
pub use config::{BrushConfig, ConfigError, SimulationConfig, VelocityOverflow};
pub use grid::GridState;
pub use material::Material;
pub use sand_simulator::{MaterialRenderer, PointerState, Simulator};
pub use stepper::{CellularStepper, FixedScan, RandomScan, ScanDirection, ScanSource};
pub use vec::Vec2;
