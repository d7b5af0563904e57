use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Side-scrolling orthographic camera. `half_extents` is how much world is
/// visible either side of `position`; the game world is authored so that
/// (1, 1) shows the classic [-1, 1] screen-space range, stretched to the
/// window.
pub struct Camera2D {
    pub position: Vec2,
    pub half_extents: Vec2,
}

impl Camera2D {
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            half_extents: Vec2::ONE,
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        Mat4::orthographic_rh(
            self.position.x - self.half_extents.x,
            self.position.x + self.half_extents.x,
            self.position.y - self.half_extents.y,
            self.position.y + self.half_extents.y,
            -1.0,
            1.0,
        )
    }

    pub fn build_uniform(&self) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_proj().to_cols_array_2d(),
        }
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::new()
    }
}
