use super::{threshold, ShadeResult, ShadingArg};
use crate::color::Color3;

/// Perfect specular reflection. A delta BSDF: the single outgoing direction
/// carries all the energy, so no cosine factor or PDF division is needed —
/// the canceling Monte Carlo estimator already accounts for it (spec.md
/// §4.5).
pub fn shade(specular: Color3, arg: &mut ShadingArg) -> ShadeResult {
    let out_dir = arg.incoming.reflect(arg.normal);
    ShadeResult { out_dir, weight: specular, rr_threshold: threshold(specular) }
}
