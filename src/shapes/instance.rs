use crate::geometry::{BoundingBox, Hit, Ray};
use crate::math::{Matrix4, Pcg32, Vector3};
use crate::shapes::Shape;

/// Wraps a child shape with a world transform, so one piece of geometry can
/// be placed, scaled, and rotated multiple times in a scene without
/// duplicating its primitive data.
#[derive(Debug, Clone)]
pub struct Instance {
    pub child: Shape,
    world: Matrix4,
    inverse: Matrix4,
}

impl Instance {
    pub fn new(child: Shape, world: Matrix4) -> Instance {
        let inverse = world.inverse();
        Instance { child, world, inverse }
    }

    /// The child's local AABB transformed to world space via its 8 corners,
    /// since an axis-aligned box under a rotation is no longer
    /// axis-aligned in the child's frame but must still be one here.
    pub fn bounding_box(&self) -> BoundingBox {
        let local = self.child.bounding_box();
        let corners = [
            Vector3::new(local.min.x, local.min.y, local.min.z),
            Vector3::new(local.max.x, local.min.y, local.min.z),
            Vector3::new(local.min.x, local.max.y, local.min.z),
            Vector3::new(local.max.x, local.max.y, local.min.z),
            Vector3::new(local.min.x, local.min.y, local.max.z),
            Vector3::new(local.max.x, local.min.y, local.max.z),
            Vector3::new(local.min.x, local.max.y, local.max.z),
            Vector3::new(local.max.x, local.max.y, local.max.z),
        ];
        let first = self.world.transform_point(corners[0]);
        corners[1..].iter().fold(BoundingBox::new(first, first), |acc, &c| {
            acc.include_point(self.world.transform_point(c))
        })
    }

    /// Transforms the ray into the child's local space, intersects there,
    /// and maps the result back to world space. The local direction is kept
    /// un-normalized (so the parametric `t` stays affine-consistent with the
    /// world ray) and only normalized for the recursive call, which expects
    /// a unit direction; the scale factor undoes that normalization on the
    /// returned distance.
    pub fn hit<'a>(&'a self, ray: &Ray, t_max: f32) -> Option<Hit<'a>> {
        let local_origin = self.inverse.transform_point(ray.origin);
        let local_dir_raw = self.inverse.transform_dir(ray.dir);
        let scale = local_dir_raw.length();
        if scale <= 1e-8 {
            return None;
        }
        let local_dir = local_dir_raw / scale;
        let local_ray = Ray::new(local_origin, local_dir);

        let local_hit = self.child.hit(&local_ray, t_max * scale)?;
        let world_distance = local_hit.distance / scale;
        let world_point = ray.at(world_distance);
        let world_normal = self.inverse.transform_normal(local_hit.normal).normalize_safe();

        Some(Hit {
            distance: world_distance,
            point: world_point,
            normal: world_normal,
            uv: local_hit.uv,
            material: local_hit.material,
            is_entering: local_hit.is_entering,
        })
    }

    /// Samples the child in local space and maps the result to world space.
    /// The area-measure pdf is rescaled by the transform's area-scale factor
    /// derived from the linear part's determinant — exact under uniform
    /// scaling, approximate otherwise (instanced area lights under
    /// non-uniform scale are a corner case this build does not chase
    /// further).
    pub fn sample_area(&self, rng: &mut Pcg32) -> (Vector3, Vector3, f32) {
        let (local_pos, local_normal, local_pdf) = self.child.sample_area(rng);
        let world_pos = self.world.transform_point(local_pos);
        let world_normal = self.inverse.transform_normal(local_normal).normalize_safe();

        let r = &self.world.rows;
        let det = r[0][0] * (r[1][1] * r[2][2] - r[1][2] * r[2][1])
            - r[0][1] * (r[1][0] * r[2][2] - r[1][2] * r[2][0])
            + r[0][2] * (r[1][0] * r[2][1] - r[1][1] * r[2][0]);
        let area_scale = det.abs().powf(2.0 / 3.0).max(1e-12);

        (world_pos, world_normal, local_pdf / area_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color3;
    use crate::material::Material;
    use crate::shapes::Sphere;

    #[test]
    fn translated_sphere_hits_at_new_location() {
        let sphere = Shape::Sphere(Sphere::new(Vector3::ZERO, 1.0, Material::lambert(Color3::WHITE)));
        let instance = Instance::new(sphere, Matrix4::translation(Vector3::new(5.0, 0.0, 0.0)));
        let ray = Ray::new(Vector3::new(5.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = instance.hit(&ray, f32::INFINITY).expect("should hit translated sphere");
        assert!((hit.distance - 4.0).abs() < 1e-4);
    }

    #[test]
    fn scaled_sphere_hit_distance_matches_world_radius() {
        let sphere = Shape::Sphere(Sphere::new(Vector3::ZERO, 1.0, Material::lambert(Color3::WHITE)));
        let instance = Instance::new(sphere, Matrix4::scale(Vector3::splat(2.0)));
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = instance.hit(&ray, f32::INFINITY).expect("should hit scaled sphere");
        assert!((hit.distance - 3.0).abs() < 1e-3);
    }
}
