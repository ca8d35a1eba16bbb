use std::f32::consts::PI;

use crate::geometry::{BoundingBox, Hit, Ray};
use crate::material::Material;
use crate::math::{Pcg32, Vector3};

/// A sphere, intersected algebraically. Self-intersection is guarded by
/// `EPSILON` rather than `t > 0`, since a ray that just left this same
/// sphere's surface would otherwise re-hit at `t ≈ 0`.
pub const EPSILON: f32 = 1e-3;

#[derive(Debug, Clone)]
pub struct Sphere {
    pub center: Vector3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    pub fn new(center: Vector3, radius: f32, material: Material) -> Sphere {
        Sphere { center, radius, material }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let r = Vector3::splat(self.radius);
        BoundingBox::new(self.center - r, self.center + r)
    }

    /// Spherical UV: `(phi / 2pi, (pi - theta) / pi)`, following the
    /// standard equirectangular parameterization also used by
    /// `environment.rs` for IBL sampling.
    fn uv_at(&self, normal: Vector3) -> (f32, f32) {
        let theta = normal.y.clamp(-1.0, 1.0).acos();
        let phi = normal.z.atan2(normal.x);
        let phi = if phi < 0.0 { phi + 2.0 * PI } else { phi };
        (phi / (2.0 * PI), (PI - theta) / PI)
    }

    pub fn hit<'a>(&'a self, ray: &Ray, t_max: f32) -> Option<Hit<'a>> {
        let oc = ray.origin - self.center;
        let a = 1.0; // ray.dir is unit length
        let b = 2.0 * ray.dir.dot(oc);
        let c = oc.dot(oc) - self.radius * self.radius;
        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrt_d = discriminant.sqrt();
        let t0 = (-b - sqrt_d) / (2.0 * a);
        let t1 = (-b + sqrt_d) / (2.0 * a);

        let (t, is_entering) = if t0 >= EPSILON {
            (t0, true)
        } else if t1 >= EPSILON {
            (t1, false)
        } else {
            return None;
        };
        if t > t_max {
            return None;
        }

        let point = ray.at(t);
        let mut normal = (point - self.center) / self.radius;
        if !is_entering {
            normal = -normal;
        }
        let uv = self.uv_at((point - self.center) / self.radius);

        Some(Hit { distance: t, point, normal, uv, material: &self.material, is_entering })
    }

    /// Uniformly samples a point over the full sphere surface for next-event
    /// estimation, ported from `Sphere::Sample` (spherical coordinate form,
    /// `r2` uniform in cosine-of-polar-angle so the sample is area-uniform).
    /// Returns `(position, outward normal, pdf with respect to area)`.
    pub fn sample_area(&self, rng: &mut Pcg32) -> (Vector3, Vector3, f32) {
        let r1 = 2.0 * PI * rng.next_f32();
        let r2 = 1.0 - 2.0 * rng.next_f32();
        let r3 = (1.0 - r2 * r2).max(0.0).sqrt();
        let normal = Vector3::new(r3 * r1.cos(), r3 * r1.sin(), r2).normalize_safe();
        let position = self.center + normal * self.radius;
        let area = 4.0 * PI * self.radius * self.radius;
        (position, normal, 1.0 / area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_through_center_hits_near_side_first() {
        let s = Sphere::new(Vector3::ZERO, 1.0, Material::lambert(crate::color::Color3::WHITE));
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = s.hit(&ray, f32::INFINITY).expect("should hit");
        assert!((hit.distance - 4.0).abs() < 1e-4);
        assert!(hit.is_entering);
    }

    #[test]
    fn ray_from_inside_hits_far_side() {
        let s = Sphere::new(Vector3::ZERO, 1.0, Material::lambert(crate::color::Color3::WHITE));
        let ray = Ray::new(Vector3::ZERO, Vector3::new(0.0, 0.0, 1.0));
        let hit = s.hit(&ray, f32::INFINITY).expect("should hit");
        assert!((hit.distance - 1.0).abs() < 1e-4);
        assert!(!hit.is_entering);
    }

    #[test]
    fn miss_outside_silhouette() {
        let s = Sphere::new(Vector3::ZERO, 1.0, Material::lambert(crate::color::Color3::WHITE));
        let ray = Ray::new(Vector3::new(5.0, 5.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(s.hit(&ray, f32::INFINITY).is_none());
    }

    #[test]
    fn sampled_points_lie_on_the_surface() {
        let s = Sphere::new(Vector3::new(1.0, 2.0, 3.0), 2.5, Material::lambert(crate::color::Color3::WHITE));
        let mut rng = Pcg32::new(99, 0);
        for _ in 0..64 {
            let (pos, normal, pdf) = s.sample_area(&mut rng);
            assert!(((pos - s.center).length() - s.radius).abs() < 1e-3);
            assert!((normal.length() - 1.0).abs() < 1e-4);
            assert!(pdf > 0.0);
        }
    }
}
