use std::f32::consts::PI;

use super::{threshold, ShadeResult, ShadingArg};
use crate::color::Color3;
use crate::math::{tangent_space, Vector3};

/// Samples a direction about the perfect-reflection vector with density
/// proportional to `cos^power(alpha)`. The importance sampling cancels the
/// PDF against the Phong lobe and the `cos(theta)` term, leaving
/// `specular * cos(theta_out)` as the returned weight (spec.md §4.5).
pub fn shade(specular: Color3, power: f32, arg: &mut ShadingArg) -> ShadeResult {
    // Face the normal toward the incoming ray's origin side so the
    // reflection vector is well-defined regardless of which face was hit.
    let n = if arg.incoming.dot(arg.normal) < 0.0 { arg.normal } else { -arg.normal };
    let reflected = arg.incoming.reflect(n).normalize_safe();

    let phi = 2.0 * PI * arg.rng.next_f32();
    let cos_theta = (1.0 - arg.rng.next_f32()).max(0.0).powf(1.0 / (power + 1.0));
    let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
    let x = phi.cos() * sin_theta;
    let y = phi.sin() * sin_theta;
    let z = cos_theta;

    let (t, b) = tangent_space(reflected);
    let out_dir = (t * x + b * y + reflected * z).normalize_safe();
    let cosine = out_dir.dot(n).abs();

    ShadeResult { out_dir, weight: specular * cosine, rr_threshold: threshold(specular) }
}

/// The normalized Phong BRDF value at an arbitrary `(incoming, out_dir)`
/// pair, needed by next-event estimation since the light direction it
/// connects to is almost never the direction this material would itself
/// have sampled: `specular * (power + 2) / (2*pi) * cos(alpha)^power`,
/// where `alpha` is the angle to the mirror-reflection direction.
pub fn eval(specular: Color3, power: f32, incoming: Vector3, out_dir: Vector3, normal: Vector3) -> Color3 {
    let n = if incoming.dot(normal) < 0.0 { normal } else { -normal };
    let reflected = incoming.reflect(n).normalize_safe();
    let cos_alpha = reflected.dot(out_dir).max(0.0);
    let norm_factor = (power + 2.0) / (2.0 * PI);
    specular * (norm_factor * cos_alpha.powf(power))
}
