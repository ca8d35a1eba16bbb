use std::f32::consts::PI;

use super::{threshold, ShadeResult, ShadingArg};
use crate::color::Color3;
use crate::math::{tangent_space, Vector3};

/// Schlick's approximation with `R0 = 0.5`, matching the source's fixed
/// plastic base reflectance rather than deriving `R0` from an IOR.
fn schlick_r0_half(cosine: f32) -> f32 {
    let m = 1.0 - cosine;
    0.5 + 0.5 * m * m * m * m * m
}

/// A diffuse base coat under a Phong specular lobe, chosen stochastically
/// per sample by Fresnel weight. Each branch divides its throughput by the
/// probability of having chosen that branch, and reports *its own*
/// Russian-roulette threshold — the source's known bug reused the diffuse
/// threshold for the specular branch too (spec.md §9); this keeps them
/// distinct.
pub fn shade(diffuse: Color3, specular: Color3, power: f32, arg: &mut ShadingArg) -> ShadeResult {
    let mut cosine = arg.normal.dot(arg.incoming);
    let n = if cosine < 0.0 { arg.normal } else { -arg.normal };
    if cosine < 0.0 {
        cosine = -cosine;
    }

    let r = schlick_r0_half(cosine);
    let p_specular = (r + 0.5) / 2.0;

    if arg.rng.next_f32() <= p_specular {
        let (t, b) = tangent_space(n);
        let phi = 2.0 * PI * arg.rng.next_f32();
        let radius = arg.rng.next_f32().max(0.0).sqrt();
        let x = radius * phi.cos();
        let y = radius * phi.sin();
        let z = (1.0 - x * x - y * y).max(0.0).sqrt();
        let out_dir = (t * x + b * y + n * z).normalize_safe();

        let weight = diffuse * (r / p_specular);
        ShadeResult { out_dir, weight, rr_threshold: threshold(diffuse) }
    } else {
        let p_diffuse = 1.0 - p_specular;
        let reflected = arg.incoming.reflect(n).normalize_safe();

        let phi = 2.0 * PI * arg.rng.next_f32();
        let cos_theta = (1.0 - arg.rng.next_f32()).max(0.0).powf(1.0 / (power + 1.0));
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();
        let x = phi.cos() * sin_theta;
        let y = phi.sin() * sin_theta;
        let z = cos_theta;

        let (t, b) = tangent_space(reflected);
        let out_dir = (t * x + b * y + reflected * z).normalize_safe();
        let cosine_out = out_dir.dot(n).abs();

        let weight = specular * (cosine_out * (1.0 - r) / p_diffuse);
        ShadeResult { out_dir, weight, rr_threshold: threshold(specular) }
    }
}

/// The BRDF value for next-event estimation: the same Fresnel-weighted mix
/// of a diffuse coat and a Phong specular lobe that `shade` samples from,
/// evaluated at an arbitrary `(incoming, out_dir)` pair rather than one
/// drawn by this material's own importance sampling.
pub fn eval(diffuse: Color3, specular: Color3, power: f32, incoming: Vector3, out_dir: Vector3, normal: Vector3) -> Color3 {
    let mut cosine = normal.dot(incoming);
    let n = if cosine < 0.0 { normal } else { -normal };
    if cosine < 0.0 {
        cosine = -cosine;
    }
    let r = schlick_r0_half(cosine);
    diffuse / PI * (1.0 - r) + super::phong::eval(specular, power, incoming, out_dir, n) * r
}
