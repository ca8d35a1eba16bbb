//! The closed set of primitives the acceleration structure traverses.
//!
//! spec.md §9 calls for a tagged sum type rather than open trait-object
//! polymorphism: the primitive set is small and closed, so a `Shape` enum
//! lets the BVH leaf dispatch monomorphically instead of through a vtable,
//! and keeps leaves SIMD-friendly to batch.

mod instance;
mod mesh_triangle;
mod quad;
mod sphere;
mod triangle;

pub use instance::Instance;
pub use mesh_triangle::{MeshTriangle, MeshVertex};
pub use quad::Quad;
pub use sphere::Sphere;
pub use triangle::Triangle;

use crate::geometry::{BoundingBox, Hit, Ray};
use crate::material::Material;
use crate::math::{Pcg32, Vector3};

/// A group of primitives that are intersected linearly; the BVH packs the
/// trailing remainder of a split into a `Leaf` once a subset's size drops to
/// `BVH4::MAX_LEAF_SIZE` or below.
#[derive(Debug, Clone)]
pub struct Leaf {
    pub shapes: Vec<Shape>,
}

impl Leaf {
    pub fn new(shapes: Vec<Shape>) -> Leaf {
        Leaf { shapes }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.shapes
            .iter()
            .map(Shape::bounding_box)
            .fold(BoundingBox::EMPTY, |acc, b| acc.merge(&b))
    }

    pub fn hit<'a>(&'a self, ray: &Ray, t_max: f32) -> Option<Hit<'a>> {
        let mut closest = t_max;
        let mut best = None;
        for shape in &self.shapes {
            if let Some(hit) = shape.hit(ray, closest) {
                closest = hit.distance;
                best = Some(hit);
            }
        }
        best
    }

    /// Picks one of the grouped shapes uniformly and samples it. `Leaf` is a
    /// BVH-internal grouping, not normally placed in a scene's light list, so
    /// this exists for interface completeness rather than a case the
    /// integrator exercises on the hot path.
    pub fn sample_area(&self, rng: &mut Pcg32) -> (Vector3, Vector3, f32) {
        let idx = (rng.next_f32() * self.shapes.len() as f32) as usize;
        let idx = idx.min(self.shapes.len() - 1);
        let (pos, normal, pdf) = self.shapes[idx].sample_area(rng);
        (pos, normal, pdf / self.shapes.len() as f32)
    }
}

#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
    Quad(Quad),
    MeshTriangle(MeshTriangle),
    Instance(Box<Instance>),
    Leaf(Box<Leaf>),
}

impl Shape {
    pub fn bounding_box(&self) -> BoundingBox {
        match self {
            Shape::Sphere(s) => s.bounding_box(),
            Shape::Triangle(t) => t.bounding_box(),
            Shape::Quad(q) => q.bounding_box(),
            Shape::MeshTriangle(m) => m.bounding_box(),
            Shape::Instance(i) => i.bounding_box(),
            Shape::Leaf(l) => l.bounding_box(),
        }
    }

    pub fn center(&self) -> Vector3 {
        self.bounding_box().center()
    }

    pub fn hit<'a>(&'a self, ray: &Ray, t_max: f32) -> Option<Hit<'a>> {
        match self {
            Shape::Sphere(s) => s.hit(ray, t_max),
            Shape::Triangle(t) => t.hit(ray, t_max),
            Shape::Quad(q) => q.hit(ray, t_max),
            Shape::MeshTriangle(m) => m.hit(ray, t_max),
            Shape::Instance(i) => i.hit(ray, t_max),
            Shape::Leaf(l) => l.hit(ray, t_max),
        }
    }

    pub fn material(&self) -> Option<&Material> {
        match self {
            Shape::Sphere(s) => Some(&s.material),
            Shape::Triangle(t) => Some(&t.material),
            Shape::Quad(q) => Some(&q.material),
            Shape::MeshTriangle(m) => Some(&m.material),
            Shape::Instance(i) => i.child.material(),
            Shape::Leaf(_) => None,
        }
    }

    pub fn is_emissive(&self) -> bool {
        self.material().map(|m| m.is_emissive()).unwrap_or(false)
    }

    /// Samples a point on the shape's surface for next-event estimation.
    /// Returns `(position, outward normal, pdf with respect to area)`.
    pub fn sample_area(&self, rng: &mut Pcg32) -> (Vector3, Vector3, f32) {
        match self {
            Shape::Sphere(s) => s.sample_area(rng),
            Shape::Triangle(t) => t.sample_area(rng),
            Shape::Quad(q) => q.sample_area(rng),
            Shape::MeshTriangle(m) => m.sample_area(rng),
            Shape::Instance(i) => i.sample_area(rng),
            Shape::Leaf(l) => l.sample_area(rng),
        }
    }
}
