//! Viewer configuration with documented defaults
//!
//! Everything tunable lives here. The whole structure deserializes from a
//! TOML file; any field left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, ViewerError};

/// Top-level configuration for the viewer binaries
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub viewport: ViewportConfig,
    pub entities: EntityConfig,
    pub engine: EngineConfig,
}

/// Size of the drawing surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Logical width in points (window size before pixel density)
    pub logical_width: f32,

    /// Logical height in points
    pub logical_height: f32,

    /// Device pixels per logical point
    ///
    /// When unset the window binary asks the host for its scale factor and
    /// the headless runner uses 1.0.
    pub pixel_ratio: Option<f32>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            logical_width: 800.0,
            logical_height: 800.0,
            pixel_ratio: None,
        }
    }
}

/// Entity marker sizes, as fractions of the device width
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityConfig {
    /// Radius of a food marker
    ///
    /// At the default (0.005) an 800px wide surface draws 4px food dots.
    pub food_radius: f32,

    /// Base size of an agent triangle (the nose sits at 1.5x this)
    pub agent_size: f32,
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            food_radius: 0.01 / 2.0,
            agent_size: 0.01,
        }
    }
}

/// Parameters of the stand-in drift engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of agents per generation
    pub animals: usize,

    /// Number of food items on the field
    pub foods: usize,

    /// Ticks per generation before the boundary is crossed
    ///
    /// At 60 frames per second the default of 2500 ticks is roughly
    /// 42 seconds of wall-clock time per generation.
    pub generation_length: u64,

    /// Distance travelled per tick, in normalized units
    pub speed: f32,

    /// Largest heading change per tick, in radians
    pub max_turn: f32,

    /// Agent-to-food distance at which food is eaten
    pub eat_distance: f32,

    /// RNG seed; a random seed is drawn when unset
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            animals: 20,
            foods: 40,
            generation_length: 2500,
            speed: 0.002,
            max_turn: 0.1,
            eat_distance: 0.01,
            seed: None,
        }
    }
}

impl ViewerConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ViewerConfig = toml::from_str(content)?;
        config
            .validate()
            .map_err(ViewerError::InvalidConfig)?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let viewport = &self.viewport;
        if !(viewport.logical_width > 0.0 && viewport.logical_height > 0.0) {
            return Err(format!(
                "viewport must have a positive size, got {}x{}",
                viewport.logical_width, viewport.logical_height
            ));
        }

        if let Some(ratio) = viewport.pixel_ratio {
            if !(ratio > 0.0) {
                return Err(format!("pixel_ratio must be positive, got {}", ratio));
            }
        }

        if self.entities.food_radius < 0.0 || self.entities.agent_size < 0.0 {
            return Err("entity sizes must not be negative".into());
        }

        if self.engine.max_turn < 0.0 {
            return Err(format!("max_turn must not be negative, got {}", self.engine.max_turn));
        }

        if self.engine.generation_length == 0 {
            return Err("generation_length must be at least one tick".into());
        }

        Ok(())
    }
}
