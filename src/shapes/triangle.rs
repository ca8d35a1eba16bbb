use crate::geometry::{BoundingBox, Hit, Ray};
use crate::material::Material;
use crate::math::{Pcg32, Vector3};

/// Grazing/parallel-ray guard distances, per spec.md §4.2: `det == 0` is a
/// miss, and hits closer than `EPSILON` are treated as a miss to avoid
/// self-intersection with the originating surface.
const EPSILON: f32 = 1e-5;

/// A triangle with per-vertex normals and UVs, interpolated by barycentric
/// weight at the hit point. Flat-shaded triangles simply repeat the face
/// normal in all three `normals` slots.
#[derive(Debug, Clone)]
pub struct Triangle {
    pub v0: Vector3,
    pub v1: Vector3,
    pub v2: Vector3,
    pub normals: [Vector3; 3],
    pub uvs: [(f32, f32); 3],
    pub material: Material,
}

impl Triangle {
    pub fn new(v0: Vector3, v1: Vector3, v2: Vector3, material: Material) -> Triangle {
        let face_normal = (v1 - v0).cross(v2 - v0).normalize_safe();
        Triangle {
            v0,
            v1,
            v2,
            normals: [face_normal; 3],
            uvs: [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)],
            material,
        }
    }

    pub fn with_vertex_attributes(
        v0: Vector3,
        v1: Vector3,
        v2: Vector3,
        normals: [Vector3; 3],
        uvs: [(f32, f32); 3],
        material: Material,
    ) -> Triangle {
        Triangle { v0, v1, v2, normals, uvs, material }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::new(self.v0, self.v0)
            .include_point(self.v1)
            .include_point(self.v2)
    }

    /// Möller-Trumbore intersection. Rejects degenerate/parallel rays
    /// (`det == 0`), barycentrics outside `(0, 1)`, and `b1 + b2 > 1`.
    pub fn hit<'a>(&'a self, ray: &Ray, t_max: f32) -> Option<Hit<'a>> {
        let edge1 = self.v1 - self.v0;
        let edge2 = self.v2 - self.v0;
        let p = ray.dir.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let t_vec = ray.origin - self.v0;
        let b1 = t_vec.dot(p) * inv_det;
        if b1 <= 0.0 || b1 >= 1.0 {
            return None;
        }

        let q = t_vec.cross(edge1);
        let b2 = ray.dir.dot(q) * inv_det;
        if b2 <= 0.0 || b1 + b2 >= 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        if t <= EPSILON || t > t_max || t.is_nan() {
            return None;
        }

        let b0 = 1.0 - b1 - b2;
        let point = ray.at(t);
        let mut normal =
            (self.normals[0] * b0 + self.normals[1] * b1 + self.normals[2] * b2).normalize_safe();
        let is_entering = normal.dot(ray.dir) < 0.0;
        if !is_entering {
            normal = -normal;
        }
        let uv = (
            self.uvs[0].0 * b0 + self.uvs[1].0 * b1 + self.uvs[2].0 * b2,
            self.uvs[0].1 * b0 + self.uvs[1].1 * b1 + self.uvs[2].1 * b2,
        );

        Some(Hit { distance: t, point, normal, uv, material: &self.material, is_entering })
    }

    /// The flat-face area, used both as a light-sampling pdf term and as a
    /// `Quad`'s weight when choosing which of its two triangles to sample.
    pub fn area(&self) -> f32 {
        0.5 * (self.v1 - self.v0).cross(self.v2 - self.v0).length()
    }

    /// Uniform barycentric area sampling: folding the unit square into the
    /// unit triangle by reflecting the point across the diagonal whenever
    /// `r1 + r2 > 1` (the standard two-uniforms triangle sampling trick).
    pub fn sample_area(&self, rng: &mut Pcg32) -> (Vector3, Vector3, f32) {
        let (mut r1, mut r2) = rng.next_f32_pair();
        if r1 + r2 > 1.0 {
            r1 = 1.0 - r1;
            r2 = 1.0 - r2;
        }
        let b0 = 1.0 - r1 - r2;
        let position = self.v0 * b0 + self.v1 * r1 + self.v2 * r2;
        let normal = (self.normals[0] * b0 + self.normals[1] * r1 + self.normals[2] * r2).normalize_safe();
        let area = self.area();
        (position, normal, 1.0 / area.max(1e-12))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color3;

    #[test]
    fn ray_through_centroid_hits() {
        let tri = Triangle::new(
            Vector3::new(-1.0, -1.0, 0.0),
            Vector3::new(1.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Material::lambert(Color3::WHITE),
        );
        let ray = Ray::new(Vector3::new(0.0, -0.3, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = tri.hit(&ray, f32::INFINITY).expect("should hit");
        assert!((hit.distance - 5.0).abs() < 1e-4);
    }

    #[test]
    fn ray_outside_edge_misses() {
        let tri = Triangle::new(
            Vector3::new(-1.0, -1.0, 0.0),
            Vector3::new(1.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Material::lambert(Color3::WHITE),
        );
        let ray = Ray::new(Vector3::new(5.0, 5.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        assert!(tri.hit(&ray, f32::INFINITY).is_none());
    }

    #[test]
    fn sampled_points_lie_in_the_triangle_plane() {
        let tri = Triangle::new(
            Vector3::new(-1.0, -1.0, 0.0),
            Vector3::new(1.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Material::lambert(Color3::WHITE),
        );
        let mut rng = crate::math::Pcg32::new(5, 0);
        for _ in 0..32 {
            let (pos, normal, pdf) = tri.sample_area(&mut rng);
            assert!(pos.z.abs() < 1e-5);
            assert!((normal.z.abs() - 1.0).abs() < 1e-4);
            assert!(pdf > 0.0);
        }
    }

    #[test]
    fn parallel_ray_misses() {
        let tri = Triangle::new(
            Vector3::new(-1.0, -1.0, 0.0),
            Vector3::new(1.0, -1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Material::lambert(Color3::WHITE),
        );
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 1.0, 0.0));
        assert!(tri.hit(&ray, f32::INFINITY).is_none());
    }
}
