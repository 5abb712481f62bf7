use glam::{Mat4, Quat, Vec3};

use crate::core::scene::DrawHandle;
use crate::util::is_colliding;

/// Any placed object: ship, planet or asteroid. Created at level start and
/// dropped (its drawable deregistered) when the level resets.
#[derive(Debug, Clone)]
pub struct Body {
    pub name: String,
    pub pos: Vec3,
    pub orient: Quat,
    pub scale: f32,
    /// Collision radius in world units; 0.0 means the body takes no part in
    /// collision tests.
    pub radius: f32,
    pub drawable: Option<DrawHandle>,
}

impl Body {
    pub fn new(name: impl Into<String>, pos: Vec3) -> Self {
        Self {
            name: name.into(),
            pos,
            orient: Quat::IDENTITY,
            scale: 1.0,
            radius: 0.0,
            drawable: None,
        }
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_drawable(mut self, handle: DrawHandle) -> Self {
        self.drawable = Some(handle);
        self
    }

    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.orient, self.pos)
    }

    pub fn is_colliding(&self, other: &Body) -> bool {
        is_colliding(self.pos, self.radius, other.pos, other.radius)
    }
}
