pub mod geometry;
pub mod input;
pub mod time;

pub use geometry::{aabb_overlap, Aabb, Transform};
