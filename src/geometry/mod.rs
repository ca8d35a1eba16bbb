//! Rays and the axis-aligned bounding volumes the BVH is built from.

mod bounding_box;
mod bounding_box4;
mod ray;

pub use bounding_box::BoundingBox;
pub use bounding_box4::BoundingBox4;
pub use ray::{Hit, Ray};
