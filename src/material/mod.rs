//! The closed set of BSDFs, mirroring spec.md §9's sum-type design over the
//! source's reference-counted `IMaterial` inheritance hierarchy.

mod glass;
mod lambert;
mod mirror;
mod phong;
mod plastic;

use std::sync::Arc;

use crate::color::Color3;
use crate::math::{Pcg32, Vector3};
use crate::texture::Texture2D;

/// Per-sample shading inputs: the surface normal and incoming (view)
/// direction in world space, the shading UV, and the thread-local RNG used
/// to draw the outgoing direction.
pub struct ShadingArg<'a> {
    pub normal: Vector3,
    pub incoming: Vector3,
    pub uv: (f32, f32),
    pub rng: &'a mut Pcg32,
}

/// The result of sampling a material at a point: the outgoing direction,
/// the throughput weight along that direction, and the Russian-roulette
/// survival probability for *this* sample. Most materials return a fixed
/// threshold; `Plastic` picks between its diffuse and specular thresholds
/// depending on which lobe this particular sample took (see `plastic.rs`).
pub struct ShadeResult {
    pub out_dir: Vector3,
    pub weight: Color3,
    pub rr_threshold: f32,
}

/// Floor under any material's Russian-roulette survival probability. The
/// source clamps `Threshold = max(color components, 0.01)`; without this
/// floor a near-black surface drives the survival probability to zero and
/// the next bounce's weight division blows up the estimator's variance.
pub const RR_THRESHOLD_FLOOR: f32 = 0.01;

#[derive(Debug, Clone)]
pub enum Material {
    Lambert { diffuse: Color3, emissive: Color3 },
    Phong { specular: Color3, power: f32, emissive: Color3 },
    Mirror { specular: Color3, emissive: Color3 },
    Glass { transmittance: Color3, ior: f32, emissive: Color3 },
    Plastic { diffuse: Color3, specular: Color3, power: f32, emissive: Color3 },
    /// Decorates any non-textured variant, replacing its primary color with
    /// a bilinear sample of `texture` at the shading UV.
    Textured { base: Box<Material>, texture: Arc<Texture2D> },
}

impl Material {
    pub fn lambert(diffuse: Color3) -> Material {
        Material::Lambert { diffuse, emissive: Color3::BLACK }
    }

    pub fn lambert_emissive(diffuse: Color3, emissive: Color3) -> Material {
        Material::Lambert { diffuse, emissive }
    }

    pub fn phong(specular: Color3, power: f32) -> Material {
        Material::Phong { specular, power, emissive: Color3::BLACK }
    }

    pub fn mirror(specular: Color3) -> Material {
        Material::Mirror { specular, emissive: Color3::BLACK }
    }

    pub fn glass(transmittance: Color3, ior: f32) -> Material {
        Material::Glass { transmittance, ior, emissive: Color3::BLACK }
    }

    pub fn plastic(diffuse: Color3, specular: Color3, power: f32) -> Material {
        Material::Plastic { diffuse, specular, power, emissive: Color3::BLACK }
    }

    pub fn textured(base: Material, texture: Arc<Texture2D>) -> Material {
        Material::Textured { base: Box::new(base), texture }
    }

    /// Replaces this variant's primary surface color, used by `Textured` to
    /// splice in a texture sample before delegating to the base variant.
    fn with_primary_color(&self, color: Color3) -> Material {
        match self {
            Material::Lambert { emissive, .. } => Material::Lambert { diffuse: color, emissive: *emissive },
            Material::Phong { power, emissive, .. } => {
                Material::Phong { specular: color, power: *power, emissive: *emissive }
            }
            Material::Mirror { emissive, .. } => Material::Mirror { specular: color, emissive: *emissive },
            Material::Glass { ior, emissive, .. } => {
                Material::Glass { transmittance: color, ior: *ior, emissive: *emissive }
            }
            Material::Plastic { specular, power, emissive, .. } => {
                Material::Plastic { diffuse: color, specular: *specular, power: *power, emissive: *emissive }
            }
            Material::Textured { base, texture } => {
                Material::Textured { base: Box::new(base.with_primary_color(color)), texture: texture.clone() }
            }
        }
    }

    pub fn emission(&self) -> Color3 {
        match self {
            Material::Lambert { emissive, .. }
            | Material::Phong { emissive, .. }
            | Material::Mirror { emissive, .. }
            | Material::Glass { emissive, .. }
            | Material::Plastic { emissive, .. } => *emissive,
            Material::Textured { base, .. } => base.emission(),
        }
    }

    pub fn is_emissive(&self) -> bool {
        let e = self.emission();
        e.r > 0.0 || e.g > 0.0 || e.b > 0.0
    }

    /// True for materials whose BSDF is a Dirac delta distribution. NEE
    /// cannot connect through these (spec.md §4.6): a shadow ray toward a
    /// light has probability zero of landing on the single reflected or
    /// refracted direction.
    pub fn has_delta(&self) -> bool {
        match self {
            Material::Mirror { .. } | Material::Glass { .. } => true,
            Material::Textured { base, .. } => base.has_delta(),
            _ => false,
        }
    }

    /// The BSDF's value at an arbitrary `(incoming, out_dir)` pair, used by
    /// next-event estimation to weight a light sample this material did not
    /// itself draw. Delta materials (`Mirror`, `Glass`) have zero
    /// probability of matching any given direction exactly, so they
    /// contribute nothing here; NEE never calls this for them anyway, since
    /// `has_delta` short-circuits it first.
    pub fn eval(&self, incoming: Vector3, out_dir: Vector3, normal: Vector3, uv: (f32, f32)) -> Color3 {
        match self {
            Material::Lambert { diffuse, .. } => lambert::eval(*diffuse),
            Material::Phong { specular, power, .. } => phong::eval(*specular, *power, incoming, out_dir, normal),
            Material::Plastic { diffuse, specular, power, .. } => {
                plastic::eval(*diffuse, *specular, *power, incoming, out_dir, normal)
            }
            Material::Mirror { .. } | Material::Glass { .. } => Color3::BLACK,
            Material::Textured { base, texture } => {
                let color = texture.sample(uv.0, uv.1);
                base.with_primary_color(color).eval(incoming, out_dir, normal, uv)
            }
        }
    }

    pub fn shade(&self, arg: &mut ShadingArg) -> ShadeResult {
        match self {
            Material::Lambert { diffuse, .. } => lambert::shade(*diffuse, arg),
            Material::Phong { specular, power, .. } => phong::shade(*specular, *power, arg),
            Material::Mirror { specular, .. } => mirror::shade(*specular, arg),
            Material::Glass { transmittance, ior, .. } => glass::shade(*transmittance, *ior, arg),
            Material::Plastic { diffuse, specular, power, .. } => {
                plastic::shade(*diffuse, *specular, *power, arg)
            }
            Material::Textured { base, texture } => {
                let color = texture.sample(arg.uv.0, arg.uv.1);
                base.with_primary_color(color).shade(arg)
            }
        }
    }
}

/// `max(color components, floor)`, shared by every material's threshold
/// computation (spec.md §9).
pub(crate) fn threshold(color: Color3) -> f32 {
    color.max_component_floored(RR_THRESHOLD_FLOOR)
}

/// Construction helpers mirroring the source's `MaterialFactory`
/// (`s3d_materialfactory.cpp`), which wraps any of the five materials in a
/// textured decorator when a texture is supplied rather than making callers
/// build the `Textured` wrapper by hand.
pub mod build {
    use super::Material;
    use crate::color::Color3;
    use crate::texture::Texture2D;
    use std::sync::Arc;

    fn decorate(material: Material, texture: Option<Arc<Texture2D>>) -> Material {
        match texture {
            Some(tex) => Material::textured(material, tex),
            None => material,
        }
    }

    pub fn lambert(diffuse: Color3, texture: Option<Arc<Texture2D>>) -> Material {
        decorate(Material::lambert(diffuse), texture)
    }

    pub fn phong(specular: Color3, power: f32, texture: Option<Arc<Texture2D>>) -> Material {
        decorate(Material::phong(specular, power), texture)
    }

    pub fn mirror(specular: Color3, texture: Option<Arc<Texture2D>>) -> Material {
        decorate(Material::mirror(specular), texture)
    }

    pub fn glass(transmittance: Color3, ior: f32, texture: Option<Arc<Texture2D>>) -> Material {
        decorate(Material::glass(transmittance, ior), texture)
    }

    pub fn plastic(diffuse: Color3, specular: Color3, power: f32, texture: Option<Arc<Texture2D>>) -> Material {
        decorate(Material::plastic(diffuse, specular, power), texture)
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textured_lambert_delegates_to_base_shape() {
        let texture = Arc::new(Texture2D::solid(Color3::new(0.2, 0.4, 0.6)));
        let mat = Material::textured(Material::lambert(Color3::WHITE), texture);
        let mut rng = Pcg32::new(1, 0);
        let mut arg = ShadingArg {
            normal: Vector3::new(0.0, 1.0, 0.0),
            incoming: Vector3::new(0.0, -1.0, 0.0),
            uv: (0.5, 0.5),
            rng: &mut rng,
        };
        let result = mat.shade(&mut arg);
        assert!((result.weight.r - 0.2).abs() < 1e-5);
        assert!((result.weight.g - 0.4).abs() < 1e-5);
        assert!((result.weight.b - 0.6).abs() < 1e-5);
    }

    #[test]
    fn delta_materials_are_flagged() {
        assert!(Material::mirror(Color3::WHITE).has_delta());
        assert!(Material::glass(Color3::WHITE, 1.5).has_delta());
        assert!(!Material::lambert(Color3::WHITE).has_delta());
    }
}
