use std::env;
use std::str::FromStr;

use lazy_static::lazy_static;
use thiserror::Error;

use super::vec::Vec2;

pub const DEFAULT_CELL_SIZE: u32 = 4;
pub const DEFAULT_BRUSH_RADIUS: i32 = 3;
pub const DEFAULT_LINE_SAMPLES: usize = 20;
pub const MAX_BRUSH_RADIUS: i32 = 256;

lazy_static! {
    pub static ref WINDOW_SIZE: Vec2<u32> = Vec2::<u32>::new(800, 600);
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("cell size must be at least 1 pixel")]
    ZeroCellSize,
    #[error("brush radius must not be negative (got {0})")]
    NegativeRadius(i32),
    #[error("brush radius {0} exceeds the maximum of {max}", max = MAX_BRUSH_RADIUS)]
    RadiusTooLarge(i32),
    #[error("a stroke needs at least one line sample")]
    ZeroLineSamples,
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// What happens when gravity pushes a cell's velocity past `u8::MAX`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum VelocityOverflow {
    /// Velocity sticks at 255.
    #[default]
    Saturate,
    /// Velocity wraps back to 0, like a one-byte counter.
    Wrap,
}

impl VelocityOverflow {
    pub fn accrue(self, velocity: u8) -> u8 {
        match self {
            VelocityOverflow::Saturate => velocity.saturating_add(1),
            VelocityOverflow::Wrap => velocity.wrapping_add(1),
        }
    }
}

impl FromStr for VelocityOverflow {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "saturate" => Ok(VelocityOverflow::Saturate),
            "wrap" => Ok(VelocityOverflow::Wrap),
            _ => Err(ConfigError::InvalidValue {
                key: "SAND_VELOCITY_OVERFLOW",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BrushConfig {
    /// Stamp radius in cells.
    pub radius: i32,
    /// Upper bound on the discs stamped along one stroke.
    pub max_line_samples: usize,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_BRUSH_RADIUS,
            max_line_samples: DEFAULT_LINE_SAMPLES,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Edge length of one cell in display pixels.
    pub cell_size: u32,
    pub brush: BrushConfig,
    pub velocity_overflow: VelocityOverflow,
    /// Seed for the row scan direction; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            brush: BrushConfig::default(),
            velocity_overflow: VelocityOverflow::default(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    /// Defaults overlaid with any `SAND_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = parse_var(&lookup, "SAND_CELL_SIZE")? {
            config.cell_size = v;
        }
        if let Some(v) = parse_var(&lookup, "SAND_BRUSH_RADIUS")? {
            config.brush.radius = v;
        }
        if let Some(v) = parse_var(&lookup, "SAND_LINE_SAMPLES")? {
            config.brush.max_line_samples = v;
        }
        if let Some(v) = parse_var(&lookup, "SAND_SEED")? {
            config.seed = Some(v);
        }
        if let Some(v) = lookup("SAND_VELOCITY_OVERFLOW") {
            config.velocity_overflow = v.parse()?;
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.brush.radius < 0 {
            return Err(ConfigError::NegativeRadius(self.brush.radius));
        }
        if self.brush.radius > MAX_BRUSH_RADIUS {
            return Err(ConfigError::RadiusTooLarge(self.brush.radius));
        }
        if self.brush.max_line_samples == 0 {
            return Err(ConfigError::ZeroLineSamples);
        }
        Ok(())
    }

    /// Grid dimensions covering a viewport of the given pixel size.
    pub fn grid_size_for(&self, viewport: Vec2<u32>) -> Vec2<usize> {
        let cell = self.cell_size.max(1);
        Vec2::new((viewport.x / cell) as usize, (viewport.y / cell) as usize)
    }
}

fn parse_var<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key, value }),
    }
}
