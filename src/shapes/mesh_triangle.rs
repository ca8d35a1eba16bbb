use std::sync::Arc;

use crate::geometry::{BoundingBox, Hit, Ray};
use crate::material::Material;
use crate::math::{Pcg32, Vector3};

const EPSILON: f32 = 1e-5;

/// One vertex of an imported mesh: position, shading normal, UV, and a
/// tangent (xyz direction plus a `w` handedness sign), matching the packed
/// vertex record `{ position x3, normal x3, uv x2, tangent x4 }` the binary
/// mesh stream importer produces (spec.md §6). The tangent is carried
/// through even though the core's material set has no normal-mapping yet,
/// so a future tangent-space material can consume it without a format
/// change.
#[derive(Debug, Clone, Copy)]
pub struct MeshVertex {
    pub position: Vector3,
    pub normal: Vector3,
    pub uv: (f32, f32),
    pub tangent: Vector3,
    pub tangent_sign: f32,
}

/// A triangle referencing three indices into a mesh's shared vertex buffer.
/// The buffer is `Arc`-shared across every triangle of the same mesh so
/// importing a large mesh allocates its vertex data once.
#[derive(Debug, Clone)]
pub struct MeshTriangle {
    pub vertices: Arc<Vec<MeshVertex>>,
    pub indices: [u32; 3],
    pub material: Material,
}

impl MeshTriangle {
    pub fn new(vertices: Arc<Vec<MeshVertex>>, indices: [u32; 3], material: Material) -> MeshTriangle {
        MeshTriangle { vertices, indices, material }
    }

    fn vertex(&self, i: usize) -> &MeshVertex {
        &self.vertices[self.indices[i] as usize]
    }

    pub fn bounding_box(&self) -> BoundingBox {
        let v0 = self.vertex(0).position;
        let v1 = self.vertex(1).position;
        let v2 = self.vertex(2).position;
        BoundingBox::new(v0, v0).include_point(v1).include_point(v2)
    }

    pub fn hit<'a>(&'a self, ray: &Ray, t_max: f32) -> Option<Hit<'a>> {
        let a = self.vertex(0);
        let b = self.vertex(1);
        let c = self.vertex(2);

        let edge1 = b.position - a.position;
        let edge2 = c.position - a.position;
        let p = ray.dir.cross(edge2);
        let det = edge1.dot(p);
        if det.abs() < EPSILON {
            return None;
        }
        let inv_det = 1.0 / det;

        let t_vec = ray.origin - a.position;
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
        let mut normal = (a.normal * b0 + b.normal * b1 + c.normal * b2).normalize_safe();
        let is_entering = normal.dot(ray.dir) < 0.0;
        if !is_entering {
            normal = -normal;
        }
        let uv = (
            a.uv.0 * b0 + b.uv.0 * b1 + c.uv.0 * b2,
            a.uv.1 * b0 + b.uv.1 * b1 + c.uv.1 * b2,
        );

        Some(Hit { distance: t, point, normal, uv, material: &self.material, is_entering })
    }

    /// Uniform barycentric area sampling, same construction as
    /// `Triangle::sample_area` but indexing into the shared vertex buffer.
    pub fn sample_area(&self, rng: &mut Pcg32) -> (Vector3, Vector3, f32) {
        let a = self.vertex(0);
        let b = self.vertex(1);
        let c = self.vertex(2);

        let (mut r1, mut r2) = rng.next_f32_pair();
        if r1 + r2 > 1.0 {
            r1 = 1.0 - r1;
            r2 = 1.0 - r2;
        }
        let b0 = 1.0 - r1 - r2;
        let position = a.position * b0 + b.position * r1 + c.position * r2;
        let normal = (a.normal * b0 + b.normal * r1 + c.normal * r2).normalize_safe();
        let area = 0.5 * (b.position - a.position).cross(c.position - a.position).length();
        (position, normal, 1.0 / area.max(1e-12))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color3;
    use crate::material::Material;
    use std::sync::Arc;

    fn make_triangle() -> MeshTriangle {
        let verts = vec![
            MeshVertex {
                position: Vector3::new(-1.0, -1.0, 0.0),
                normal: Vector3::new(0.0, 0.0, 1.0),
                uv: (0.0, 0.0),
                tangent: Vector3::new(1.0, 0.0, 0.0),
                tangent_sign: 1.0,
            },
            MeshVertex {
                position: Vector3::new(1.0, -1.0, 0.0),
                normal: Vector3::new(0.0, 0.0, 1.0),
                uv: (1.0, 0.0),
                tangent: Vector3::new(1.0, 0.0, 0.0),
                tangent_sign: 1.0,
            },
            MeshVertex {
                position: Vector3::new(0.0, 1.0, 0.0),
                normal: Vector3::new(0.0, 0.0, 1.0),
                uv: (0.5, 1.0),
                tangent: Vector3::new(1.0, 0.0, 0.0),
                tangent_sign: 1.0,
            },
        ];
        MeshTriangle::new(Arc::new(verts), [0, 1, 2], Material::lambert(Color3::WHITE))
    }

    #[test]
    fn ray_through_centroid_hits() {
        let tri = make_triangle();
        let ray = Ray::new(Vector3::new(0.0, -0.3, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = tri.hit(&ray, f32::INFINITY).expect("should hit");
        assert!((hit.distance - 5.0).abs() < 1e-4);
    }

    #[test]
    fn sampled_points_lie_in_the_triangle_plane() {
        let tri = make_triangle();
        let mut rng = Pcg32::new(11, 0);
        for _ in 0..32 {
            let (pos, normal, pdf) = tri.sample_area(&mut rng);
            assert!(pos.z.abs() < 1e-5);
            assert!((normal.z - 1.0).abs() < 1e-4);
            assert!(pdf > 0.0);
        }
    }
}
