//! Draw submissions and their CPU tessellation.
//!
//! Callers describe what to draw as a flat list of [`DrawCommand`]s: a unit
//! primitive, the transform that places it in world space and a flat RGBA
//! color. Every frame the list is expanded into one indexed triangle mesh
//! which is streamed to the GPU and drawn with a single `draw_indexed`.
//!
//! Unit primitives are centered on the origin and span [-0.5, 0.5] on both
//! axes, so `Transform::scale(w, h)` gives a shape of exactly `w` x `h`.

use glam::Vec2;
use skyhop_core::Transform;

use crate::vertex::ShapeVertex;

pub const CIRCLE_SEGMENTS: u32 = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Quad,
    /// 32-segment triangle fan.
    Circle,
    /// Apex up.
    Triangle,
    /// 4-point fan.
    Diamond,
}

impl ShapeKind {
    /// Number of indices one instance of this shape contributes.
    pub fn index_count(self) -> u32 {
        match self {
            Self::Quad => 6,
            Self::Circle => CIRCLE_SEGMENTS * 3,
            Self::Triangle => 3,
            Self::Diamond => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub shape: ShapeKind,
    pub transform: Transform,
    pub color: [f32; 4],
}

impl DrawCommand {
    pub fn new(shape: ShapeKind, transform: Transform, color: [f32; 4]) -> Self {
        Self {
            shape,
            transform,
            color,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ShapeMesh {
    pub vertices: Vec<ShapeVertex>,
    pub indices: Vec<u32>,
}

impl ShapeMesh {
    pub fn with_capacity(commands: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(commands * 4),
            indices: Vec::with_capacity(commands * 6),
        }
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    pub fn push(&mut self, command: &DrawCommand) {
        let base = self.vertices.len() as u32;
        self.indices.reserve(command.shape.index_count() as usize);
        let vertices = &mut self.vertices;

        match command.shape {
            ShapeKind::Quad => {
                push_vertex(vertices, command, Vec2::new(-0.5, -0.5));
                push_vertex(vertices, command, Vec2::new(0.5, -0.5));
                push_vertex(vertices, command, Vec2::new(0.5, 0.5));
                push_vertex(vertices, command, Vec2::new(-0.5, 0.5));
                self.indices
                    .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
            }
            ShapeKind::Triangle => {
                push_vertex(vertices, command, Vec2::new(-0.5, -0.5));
                push_vertex(vertices, command, Vec2::new(0.5, -0.5));
                push_vertex(vertices, command, Vec2::new(0.0, 0.5));
                self.indices.extend_from_slice(&[base, base + 1, base + 2]);
            }
            ShapeKind::Diamond => {
                push_vertex(vertices, command, Vec2::new(0.0, 0.5));
                push_vertex(vertices, command, Vec2::new(-0.5, 0.0));
                push_vertex(vertices, command, Vec2::new(0.0, -0.5));
                push_vertex(vertices, command, Vec2::new(0.5, 0.0));
                self.indices
                    .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
            }
            ShapeKind::Circle => {
                push_vertex(vertices, command, Vec2::ZERO);
                for i in 0..CIRCLE_SEGMENTS {
                    let angle = i as f32 / CIRCLE_SEGMENTS as f32 * std::f32::consts::TAU;
                    push_vertex(vertices, command, Vec2::new(angle.cos() * 0.5, angle.sin() * 0.5));
                }
                for i in 0..CIRCLE_SEGMENTS {
                    let rim = base + 1 + i;
                    let next = base + 1 + (i + 1) % CIRCLE_SEGMENTS;
                    self.indices.extend_from_slice(&[base, rim, next]);
                }
            }
        }
    }

    pub fn extend_from_commands(&mut self, commands: &[DrawCommand]) {
        for command in commands {
            self.push(command);
        }
    }
}

fn push_vertex(vertices: &mut Vec<ShapeVertex>, command: &DrawCommand, local: Vec2) {
    let world = command.transform.transform_point(local);
    vertices.push(ShapeVertex {
        position: [world.x, world.y],
        color: command.color,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    fn mesh_for(shape: ShapeKind, transform: Transform) -> ShapeMesh {
        let mut mesh = ShapeMesh::default();
        mesh.push(&DrawCommand::new(shape, transform, WHITE));
        mesh
    }

    #[test]
    fn index_counts_match_tessellation() {
        for shape in [
            ShapeKind::Quad,
            ShapeKind::Circle,
            ShapeKind::Triangle,
            ShapeKind::Diamond,
        ] {
            let mesh = mesh_for(shape, Transform::identity());
            assert_eq!(mesh.indices.len() as u32, shape.index_count(), "{shape:?}");
            let max = *mesh.indices.iter().max().expect("indices");
            assert!((max as usize) < mesh.vertices.len());
        }
    }

    #[test]
    fn mixed_mesh_index_total_matches_shape_counts() {
        let commands: Vec<DrawCommand> = [ShapeKind::Circle, ShapeKind::Quad, ShapeKind::Diamond]
            .into_iter()
            .map(|shape| DrawCommand::new(shape, Transform::identity(), [1.0; 4]))
            .collect();
        let mut mesh = ShapeMesh::default();
        mesh.extend_from_commands(&commands);
        let expected: u32 = commands.iter().map(|c| c.shape.index_count()).sum();
        assert_eq!(mesh.indices.len() as u32, expected);
    }

    #[test]
    fn quad_is_placed_by_transform() {
        let transform = Transform::identity().scale(0.5, 0.1).translate(-1.0, -0.5);
        let mesh = mesh_for(ShapeKind::Quad, transform);
        let xs: Vec<f32> = mesh.vertices.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = mesh.vertices.iter().map(|v| v.position[1]).collect();
        let min_x = xs.iter().cloned().fold(f32::MAX, f32::min);
        let max_x = xs.iter().cloned().fold(f32::MIN, f32::max);
        let min_y = ys.iter().cloned().fold(f32::MAX, f32::min);
        let max_y = ys.iter().cloned().fold(f32::MIN, f32::max);
        assert!((min_x + 1.25).abs() < 1e-5);
        assert!((max_x + 0.75).abs() < 1e-5);
        assert!((min_y + 0.55).abs() < 1e-5);
        assert!((max_y + 0.45).abs() < 1e-5);
    }

    #[test]
    fn circle_rim_stays_on_radius() {
        let mesh = mesh_for(ShapeKind::Circle, Transform::identity().scale(0.2, 0.2));
        assert_eq!(mesh.vertices.len() as u32, CIRCLE_SEGMENTS + 1);
        for v in &mesh.vertices[1..] {
            let r = Vec2::from(v.position).length();
            assert!((r - 0.1).abs() < 1e-5);
        }
    }

    #[test]
    fn indices_are_offset_per_command() {
        let mut mesh = ShapeMesh::with_capacity(2);
        mesh.extend_from_commands(&[
            DrawCommand::new(ShapeKind::Triangle, Transform::identity(), WHITE),
            DrawCommand::new(ShapeKind::Quad, Transform::identity(), WHITE),
        ]);
        assert_eq!(mesh.vertices.len(), 7);
        assert_eq!(&mesh.indices[3..], &[3, 4, 5, 3, 5, 6]);
        mesh.clear();
        assert!(mesh.vertices.is_empty() && mesh.indices.is_empty());
    }

    #[test]
    fn vertices_carry_command_color() {
        let red = [1.0, 0.0, 0.0, 1.0];
        let mut mesh = ShapeMesh::default();
        mesh.push(&DrawCommand::new(ShapeKind::Diamond, Transform::identity(), red));
        assert!(mesh.vertices.iter().all(|v| v.color == red));
    }
}
