//! Read-only world views handed out by an engine.

use serde::{Deserialize, Serialize};

/// A food item in normalized world coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Food {
    pub x: f32,
    pub y: f32,
}

impl Food {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An agent in normalized world coordinates, heading in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Animal {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
}

impl Animal {
    pub const fn new(x: f32, y: f32, rotation: f32) -> Self {
        Self { x, y, rotation }
    }
}

/// Everything the viewer needs to draw one frame.
///
/// Positions live on the unit square and carry no notion of pixels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub foods: Vec<Food>,
    pub animals: Vec<Animal>,
}

impl WorldSnapshot {
    pub fn new(foods: Vec<Food>, animals: Vec<Animal>) -> Self {
        Self { foods, animals }
    }

    /// Total number of drawable entities.
    pub fn len(&self) -> usize {
        self.foods.len() + self.animals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.foods.is_empty() && self.animals.is_empty()
    }
}
