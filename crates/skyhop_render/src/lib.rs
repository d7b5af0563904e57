pub mod camera;
pub mod gpu_context;
pub mod shape_pipeline;
pub mod shapes;
pub mod vertex;

pub use camera::{Camera2D, CameraUniform};
pub use gpu_context::GpuContext;
pub use shape_pipeline::ShapePipeline;
pub use shapes::{DrawCommand, ShapeKind, ShapeMesh};
pub use vertex::ShapeVertex;
