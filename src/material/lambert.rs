use std::f32::consts::PI;

use super::{threshold, ShadeResult, ShadingArg};
use crate::color::Color3;
use crate::math::tangent_space;

/// Cosine-weighted hemisphere sampling about the surface normal. The
/// `cos(theta)/pi` PDF cancels exactly against the Lambertian BRDF's
/// `albedo/pi` and the `cos(theta)` projection term, leaving the returned
/// weight as plain `albedo` (spec.md §4.5).
pub fn shade(diffuse: Color3, arg: &mut ShadingArg) -> ShadeResult {
    let (t, b) = tangent_space(arg.normal);

    let phi = 2.0 * PI * arg.rng.next_f32();
    let r = arg.rng.next_f32().max(0.0).sqrt();
    let x = r * phi.cos();
    let y = r * phi.sin();
    let z = (1.0 - x * x - y * y).max(0.0).sqrt();

    let out_dir = (t * x + b * y + arg.normal * z).normalize_safe();

    ShadeResult { out_dir, weight: diffuse, rr_threshold: threshold(diffuse) }
}

/// The Lambertian BRDF value, `albedo / pi`, constant over the hemisphere.
pub fn eval(diffuse: Color3) -> Color3 {
    diffuse / PI
}
