use std::f32::consts::PI;

use crate::color::Color3;
use crate::math::Vector3;
use crate::texture::Texture2D;

/// Image-based lighting: radiance sampled from an equirectangular HDR
/// texture by world-space direction, or a constant color when no texture is
/// loaded. The axis convention (`theta = acos(dir.y)`, `phi = atan2(dir.z,
/// dir.x)`) is ported exactly from the source's `IBL::Sample` so scenes
/// authored against that convention light correctly.
#[derive(Debug, Clone)]
pub enum Environment {
    Constant(Color3),
    Equirectangular(Texture2D),
}

impl Environment {
    pub fn sample(&self, dir: Vector3) -> Color3 {
        match self {
            Environment::Constant(c) => *c,
            Environment::Equirectangular(tex) => {
                let dir = dir.normalize_safe();
                let theta = dir.y.clamp(-1.0, 1.0).acos();
                let v = theta / PI;

                let u = if dir.x.abs() < 1e-8 && dir.z.abs() < 1e-8 {
                    0.0
                } else {
                    let phi = dir.z.atan2(dir.x);
                    let phi = if phi < 0.0 { phi + 2.0 * PI } else { phi };
                    phi / (2.0 * PI)
                };

                tex.sample(u, v)
            }
        }
    }
}
