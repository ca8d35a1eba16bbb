use super::{threshold, ShadeResult, ShadingArg};
use crate::color::Color3;
use crate::math::Vector3;

/// Schlick's approximation to the Fresnel reflectance at normal-incidence
/// reflectance `r0`, interpolated by `(1 - cos)^5`.
fn schlick(cos_theta: f32, eta_i: f32, eta_t: f32) -> f32 {
    let r0 = ((eta_i - eta_t) / (eta_i + eta_t)).powi(2);
    let m = 1.0 - cos_theta;
    r0 + (1.0 - r0) * m * m * m * m * m
}

/// A smooth dielectric: reflect with Fresnel-Schlick probability `F`,
/// otherwise refract via Snell's law (spec.md §4.5). Total internal
/// reflection forces the reflect branch. `n`/the IOR ratio are flipped when
/// `incoming . normal > 0`, i.e. the ray is leaving the medium rather than
/// entering it.
pub fn shade(transmittance: Color3, ior: f32, arg: &mut ShadingArg) -> ShadeResult {
    let mut n = arg.normal;
    let mut cos_i = arg.incoming.dot(n).clamp(-1.0, 1.0);

    let (eta_i, eta_t) = if cos_i > 0.0 {
        n = -n;
        cos_i = -cos_i;
        (ior, 1.0)
    } else {
        (1.0, ior)
    };
    let cos_i_abs = -cos_i;

    let eta = eta_i / eta_t;
    let sin2_t = eta * eta * (1.0 - cos_i_abs * cos_i_abs).max(0.0);
    let total_internal_reflection = sin2_t >= 1.0;
    let reflectance = if total_internal_reflection { 1.0 } else { schlick(cos_i_abs, eta_i, eta_t) };

    let out_dir = if total_internal_reflection || arg.rng.next_f32() < reflectance {
        arg.incoming.reflect(n)
    } else {
        let cos_t = (1.0 - sin2_t).max(0.0).sqrt();
        refract(arg.incoming, n, eta, cos_i_abs, cos_t)
    };

    ShadeResult { out_dir, weight: transmittance, rr_threshold: threshold(transmittance) }
}

fn refract(incoming: Vector3, n: Vector3, eta: f32, cos_i: f32, cos_t: f32) -> Vector3 {
    (incoming * eta + n * (eta * cos_i - cos_t)).normalize_safe()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Pcg32;

    #[test]
    fn grazing_incidence_is_forced_to_reflect() {
        let mut rng = Pcg32::new(5, 0);
        let normal = Vector3::new(0.0, 1.0, 0.0);
        let grazing = Vector3::new(0.999, -0.001, 0.0).normalize();
        let mut arg = ShadingArg { normal, incoming: grazing, uv: (0.0, 0.0), rng: &mut rng };
        let result = shade(Color3::WHITE, 1.5, &mut arg);
        assert!(result.out_dir.dot(normal) > 0.0);
    }

    #[test]
    fn weight_matches_transmittance_color() {
        let mut rng = Pcg32::new(1, 0);
        let mut arg = ShadingArg {
            normal: Vector3::new(0.0, 1.0, 0.0),
            incoming: Vector3::new(0.0, -1.0, 0.0),
            uv: (0.0, 0.0),
            rng: &mut rng,
        };
        let result = shade(Color3::new(0.9, 0.8, 0.7), 1.5, &mut arg);
        assert_eq!(result.weight, Color3::new(0.9, 0.8, 0.7));
    }
}
