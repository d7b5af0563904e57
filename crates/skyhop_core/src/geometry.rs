//! Shared 2D geometry: axis-aligned boxes for gameplay collision and a small
//! affine transform builder for placing unit primitives in world space.
//!
//! All gameplay collision in the game crate goes through [`aabb_overlap`].
//! Boxes are stored center + half extents, the same shape the character
//! controller and the draw list both want, so no corner conversion leaks
//! into callers.

use glam::{Mat4, Quat, Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center_x: f32,
    pub center_y: f32,
    pub half_w: f32,
    pub half_h: f32,
}

impl Aabb {
    /// Build from a center and a full width/height.
    pub fn from_center_size(center_x: f32, center_y: f32, width: f32, height: f32) -> Self {
        Self {
            center_x,
            center_y,
            half_w: width * 0.5,
            half_h: height * 0.5,
        }
    }

    pub fn min_x(&self) -> f32 {
        self.center_x - self.half_w
    }

    pub fn max_x(&self) -> f32 {
        self.center_x + self.half_w
    }

    pub fn min_y(&self) -> f32 {
        self.center_y - self.half_h
    }

    pub fn max_y(&self) -> f32 {
        self.center_y + self.half_h
    }

    pub fn width(&self) -> f32 {
        self.half_w * 2.0
    }

    pub fn height(&self) -> f32 {
        self.half_h * 2.0
    }
}

/// Strict open-interval overlap on both axes. Boxes that only share an edge
/// do not overlap.
pub fn aabb_overlap(a: &Aabb, b: &Aabb) -> bool {
    a.min_x() < b.max_x() && a.max_x() > b.min_x() && a.min_y() < b.max_y() && a.max_y() > b.min_y()
}

/// Composed affine transform for a unit primitive.
///
/// Starts as identity. Every call applies *after* the ones before it, so the
/// usual placement order is `scale` -> `rotate_z` -> `translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub matrix: Mat4,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            matrix: Mat4::IDENTITY,
        }
    }

    pub fn scale(mut self, x: f32, y: f32) -> Self {
        self.matrix = Mat4::from_scale(Vec3::new(x, y, 1.0)) * self.matrix;
        self
    }

    /// Counter-clockwise rotation about the local origin, in radians.
    pub fn rotate_z(mut self, radians: f32) -> Self {
        self.matrix = Mat4::from_quat(Quat::from_rotation_z(radians)) * self.matrix;
        self
    }

    pub fn translate(mut self, x: f32, y: f32) -> Self {
        self.matrix = Mat4::from_translation(Vec3::new(x, y, 0.0)) * self.matrix;
        self
    }

    pub fn transform_point(&self, point: Vec2) -> Vec2 {
        self.matrix.transform_point3(point.extend(0.0)).truncate()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}
