//! Vector/matrix types, the SIMD facade used by the BVH, and the RNG kernel.

mod matrix4;
mod rng;
mod simd4;
mod vector3;

pub use matrix4::Matrix4;
pub use rng::Pcg32;
pub use simd4::Simd4;
pub use vector3::{Vector2, Vector3};

/// Clamps `v` to the inclusive range `[lo, hi]`.
pub fn clamp(v: f32, lo: f32, hi: f32) -> f32 {
    v.max(lo).min(hi)
}

/// Builds an orthonormal basis (tangent, bitangent) around a unit vector `n`,
/// using the Duff et al. branchless construction.
pub fn tangent_space(n: Vector3) -> (Vector3, Vector3) {
    let sign = if n.z >= 0.0 { 1.0_f32 } else { -1.0_f32 };
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;
    let t = Vector3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
    let bt = Vector3::new(b, sign + n.y * n.y * a, -n.y);
    (t, bt)
}
