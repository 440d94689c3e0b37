//! Entity markers: food dots and agent arrowheads.

use std::f32::consts::{PI, TAU};

use glam::Vec2;

use super::camera::CoordinateMapper;
use super::colors::{AGENT, FOOD};
use super::surface::DrawingContext;
use crate::core::config::EntityConfig;
use crate::engine::WorldSnapshot;

/// Distance of the nose vertex from the center, in multiples of `size`
pub const NOSE_LENGTH: f32 = 1.5;

/// Marker sizes as fractions of the device width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySizes {
    pub food_radius: f32,
    pub agent_size: f32,
}

impl Default for EntitySizes {
    fn default() -> Self {
        Self::from(&EntityConfig::default())
    }
}

impl From<&EntityConfig> for EntitySizes {
    fn from(config: &EntityConfig) -> Self {
        Self {
            food_radius: config.food_radius,
            agent_size: config.agent_size,
        }
    }
}

/// Vertices of an agent triangle: nose first, then the two base corners.
pub fn agent_vertices(px: f32, py: f32, size: f32, rotation: f32) -> [Vec2; 3] {
    let at = |angle: f32, distance: f32| {
        Vec2::new(px + angle.cos() * distance, py + angle.sin() * distance)
    };
    [
        at(rotation, size * NOSE_LENGTH),
        at(rotation + 2.0 / 3.0 * PI, size),
        at(rotation + 4.0 / 3.0 * PI, size),
    ]
}

/// Draws entity markers onto a borrowed drawing context.
pub struct EntityRenderer<'a, C: DrawingContext + ?Sized> {
    ctx: &'a mut C,
}

impl<'a, C: DrawingContext + ?Sized> EntityRenderer<'a, C> {
    pub fn new(ctx: &'a mut C) -> Self {
        Self { ctx }
    }

    /// Filled circle marker for a food item.
    pub fn draw_food(&mut self, px: f32, py: f32, radius: f32) {
        self.ctx.begin_path();
        self.ctx.arc(px, py, radius, 0.0, TAU);
        self.ctx.fill(FOOD);
    }

    /// Filled triangle pointing along `rotation`.
    pub fn draw_agent(&mut self, px: f32, py: f32, size: f32, rotation: f32) {
        let [nose, left, right] = agent_vertices(px, py, size, rotation);

        self.ctx.begin_path();
        self.ctx.move_to(nose.x, nose.y);
        self.ctx.line_to(left.x, left.y);
        self.ctx.line_to(right.x, right.y);
        self.ctx.line_to(nose.x, nose.y);
        self.ctx.stroke();
        self.ctx.fill(AGENT);
    }

    /// Draw every food, then every agent, of one snapshot.
    pub fn draw_world(&mut self, world: &WorldSnapshot, mapper: &CoordinateMapper, sizes: EntitySizes) {
        let food_radius = mapper.to_device_size(sizes.food_radius);
        for food in &world.foods {
            let at = mapper.to_device(food.x, food.y);
            self.draw_food(at.x, at.y, food_radius);
        }

        let agent_size = mapper.to_device_size(sizes.agent_size);
        for animal in &world.animals {
            let at = mapper.to_device(animal.x, animal.y);
            self.draw_agent(at.x, at.y, agent_size, animal.rotation);
        }
    }
}
