use crate::color::Color3;
use crate::material::Material;
use crate::math::Vector3;

/// A half-line in 3-dimensional space: origin plus a unit direction.
///
/// `inv_dir` and `sign` are precomputed once at construction (the only
/// mutation point, per the invariant that a `Ray`'s direction never changes
/// after it is built) so the slab test in `BoundingBox::hit` and the packed
/// `BoundingBox4::hit` never recompute a division per box.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vector3,
    pub dir: Vector3,
    pub inv_dir: Vector3,
    /// `sign[axis] == 1` when `inv_dir`'s component on that axis is negative,
    /// used by slab tests to pick which corner is "near" without a branch.
    pub sign: [usize; 3],
}

impl Ray {
    /// Constructs a new `Ray`. `dir` must already be unit length; callers
    /// that derive a direction from an unnormalized vector should go through
    /// `Vector3::normalize_safe` first.
    pub fn new(origin: Vector3, dir: Vector3) -> Ray {
        let inv_dir = Vector3::new(1.0 / dir.x, 1.0 / dir.y, 1.0 / dir.z);
        let sign = [
            (inv_dir.x < 0.0) as usize,
            (inv_dir.y < 0.0) as usize,
            (inv_dir.z < 0.0) as usize,
        ];
        Ray { origin, dir, inv_dir, sign }
    }

    /// Evaluates the ray at the given distance from its origin.
    pub fn at(&self, distance: f32) -> Vector3 {
        self.origin + self.dir * distance
    }

    /// Offsets a surface point along its normal to avoid immediate
    /// self-intersection on the next bounce (shadow-acne avoidance).
    pub fn offset_origin(point: Vector3, normal: Vector3) -> Vector3 {
        point + normal * 1e-4
    }
}

/// The result of intersecting a ray with a shape: distance, surface normal,
/// UV coordinates, and the material bound at the hit point.
#[derive(Clone, Copy, Debug)]
pub struct Hit<'a> {
    pub distance: f32,
    pub point: Vector3,
    pub normal: Vector3,
    pub uv: (f32, f32),
    pub material: &'a Material,
    /// True when the ray approaches the surface from its outward side;
    /// shapes that distinguish inside/outside (e.g. `Glass`) use this to
    /// decide whether they are entering or leaving the medium.
    pub is_entering: bool,
}

impl<'a> Hit<'a> {
    pub fn emission(&self) -> Color3 {
        self.material.emission()
    }
}
