use crate::geometry::{BoundingBox, Hit, Ray};
use crate::material::Material;
use crate::math::{Pcg32, Vector3};
use crate::shapes::Triangle;

/// A planar quad built from two triangles. The shared diagonal is whichever
/// of the two choices gives better-aligned triangle normals (spec.md §4.2),
/// which avoids a visible crease on non-planar (slightly warped) quads.
#[derive(Debug, Clone)]
pub struct Quad {
    tri_a: Triangle,
    tri_b: Triangle,
}

impl Quad {
    /// Corners given in order around the quad's perimeter.
    pub fn new(v0: Vector3, v1: Vector3, v2: Vector3, v3: Vector3, material: Material) -> Quad {
        let n_diag02_a = (v1 - v0).cross(v2 - v0).normalize_safe();
        let n_diag02_b = (v2 - v0).cross(v3 - v0).normalize_safe();
        let diag02_alignment = n_diag02_a.dot(n_diag02_b);

        let n_diag13_a = (v1 - v0).cross(v3 - v0).normalize_safe();
        let n_diag13_b = (v2 - v1).cross(v3 - v1).normalize_safe();
        let diag13_alignment = n_diag13_a.dot(n_diag13_b);

        let (tri_a, tri_b) = if diag02_alignment >= diag13_alignment {
            (
                Triangle::new(v0, v1, v2, material.clone()),
                Triangle::new(v0, v2, v3, material),
            )
        } else {
            (
                Triangle::new(v0, v1, v3, material.clone()),
                Triangle::new(v1, v2, v3, material),
            )
        };
        Quad { tri_a, tri_b }
    }

    pub fn bounding_box(&self) -> BoundingBox {
        self.tri_a.bounding_box().merge(&self.tri_b.bounding_box())
    }

    pub fn hit<'a>(&'a self, ray: &Ray, t_max: f32) -> Option<Hit<'a>> {
        match self.tri_a.hit(ray, t_max) {
            Some(hit) => self.tri_b.hit(ray, hit.distance).or(Some(hit)),
            None => self.tri_b.hit(ray, t_max),
        }
    }

    /// Samples uniformly over the whole quad's area by first choosing one of
    /// its two triangles weighted by area, then sampling within it; the
    /// returned pdf is with respect to the quad's total area rather than
    /// either triangle's own.
    pub fn sample_area(&self, rng: &mut Pcg32) -> (Vector3, Vector3, f32) {
        let area_a = self.tri_a.area();
        let area_b = self.tri_b.area();
        let total = (area_a + area_b).max(1e-12);

        let (position, normal, _) = if rng.next_f32() * total < area_a {
            self.tri_a.sample_area(rng)
        } else {
            self.tri_b.sample_area(rng)
        };
        (position, normal, 1.0 / total)
    }
}
