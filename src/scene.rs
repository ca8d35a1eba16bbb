//! The `Scene` composite: the root BVH, the camera, the environment, and
//! the flat light list next-event estimation samples from (spec.md §3,
//! §4.6). Grounded on the teacher's `scene.rs::Scene` (which owns a light
//! list plus the full shape list for the same reason), generalized from a
//! point-light list to an area-light list over emissive shapes.

use crate::bvh::Bvh4;
use crate::camera::Camera;
use crate::color::Color3;
use crate::environment::Environment;
use crate::geometry::{Hit, Ray};
use crate::math::{Pcg32, Vector3};
use crate::shapes::Shape;

/// One entry of the light list: an independent copy of an emissive shape.
/// `Shape` is a value type (spec.md §9's closed tagged union, not the
/// source's reference-counted `IShape*`), so the light list clones the
/// shapes it needs to sample rather than sharing the BVH's owned copies —
/// cheap for every variant except `MeshTriangle`, whose vertex buffer is
/// itself `Arc`-shared.
pub struct Scene {
    bvh: Bvh4,
    camera: Camera,
    environment: Environment,
    lights: Vec<Shape>,
}

/// A sampled point on a light, ready for next-event estimation.
pub struct LightSample {
    pub position: Vector3,
    pub normal: Vector3,
    pub emission: Color3,
    /// Probability density with respect to solid angle at the shading
    /// point, already folded in the `1 / num_lights` discrete pick
    /// probability (spec.md §4.6 step c).
    pub pdf_solid_angle: f32,
    pub distance: f32,
    pub direction: Vector3,
}

impl Scene {
    /// Builds a scene from its flat shape list. Emissive shapes are cloned
    /// into the light list before the list is consumed by the BVH builder.
    pub fn new(shapes: Vec<Shape>, camera: Camera, environment: Environment) -> Scene {
        let lights: Vec<Shape> = shapes.iter().filter(|s| s.is_emissive()).cloned().collect();
        let bvh = Bvh4::build(shapes);
        Scene { bvh, camera, environment, lights }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn intersect<'a>(&'a self, ray: &Ray, t_max: f32) -> Option<Hit<'a>> {
        self.bvh.hit(ray, t_max)
    }

    /// True when nothing between `ray.origin` and `max_distance` blocks it —
    /// used for NEE's shadow-ray test, where only occlusion matters and not
    /// which surface is nearest.
    pub fn is_occluded(&self, ray: &Ray, max_distance: f32) -> bool {
        self.bvh.hit(ray, max_distance - 1e-3).is_some()
    }

    pub fn has_lights(&self) -> bool {
        !self.lights.is_empty()
    }

    /// Picks a light uniformly from the light list, samples a point on it,
    /// and converts its area-measure pdf to solid angle at `shading_point`
    /// (spec.md §4.6 step c: `pdf_solid_angle = pdf_area * distance^2 /
    /// cos(theta_light)`, folding in the `1/N` discrete-choice probability).
    pub fn sample_light(&self, shading_point: Vector3, rng: &mut Pcg32) -> Option<LightSample> {
        if self.lights.is_empty() {
            return None;
        }
        let idx = ((rng.next_f32() * self.lights.len() as f32) as usize).min(self.lights.len() - 1);
        let light = &self.lights[idx];
        let (light_pos, light_normal, pdf_area) = light.sample_area(rng);

        let to_light = light_pos - shading_point;
        let distance = to_light.length();
        if distance <= 1e-8 {
            return None;
        }
        let direction = to_light / distance;
        let cos_light = light_normal.dot(-direction).max(0.0);
        if cos_light <= 1e-8 {
            return None;
        }

        let pdf_choose = 1.0 / self.lights.len() as f32;
        let pdf_solid_angle = pdf_choose * pdf_area * distance * distance / cos_light;

        Some(LightSample {
            position: light_pos,
            normal: light_normal,
            emission: light.material().map(|m| m.emission()).unwrap_or(Color3::BLACK),
            pdf_solid_angle,
            distance,
            direction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::shapes::Sphere;

    fn test_scene() -> Scene {
        let emitter = Shape::Sphere(Sphere::new(
            Vector3::new(0.0, 5.0, 0.0),
            1.0,
            Material::lambert_emissive(Color3::BLACK, Color3::new(10.0, 10.0, 10.0)),
        ));
        let floor = Shape::Sphere(Sphere::new(Vector3::ZERO, 1.0, Material::lambert(Color3::WHITE)));
        let camera = Camera::look_at(
            Vector3::new(0.0, 0.0, -5.0),
            Vector3::ZERO,
            Vector3::new(0.0, 1.0, 0.0),
            60.0,
            32,
            32,
        );
        Scene::new(vec![emitter, floor], camera, Environment::Constant(Color3::BLACK))
    }

    #[test]
    fn scene_collects_only_emissive_shapes_as_lights() {
        let scene = test_scene();
        assert!(scene.has_lights());
        assert_eq!(scene.lights.len(), 1);
    }

    #[test]
    fn sampled_light_points_toward_the_emitter() {
        let scene = test_scene();
        let mut rng = Pcg32::new(0xBEEF, 0);
        let sample = scene.sample_light(Vector3::new(0.0, -2.0, 0.0), &mut rng).expect("a light exists");
        assert!(sample.direction.y > 0.0);
        assert!(sample.pdf_solid_angle > 0.0);
        assert!(sample.emission.r > 0.0);
    }

    #[test]
    fn intersect_finds_the_non_emissive_sphere() {
        let scene = test_scene();
        let ray = Ray::new(Vector3::new(0.0, 0.0, -5.0), Vector3::new(0.0, 0.0, 1.0));
        let hit = scene.intersect(&ray, f32::INFINITY).expect("should hit the floor sphere");
        assert!((hit.distance - 4.0).abs() < 1e-3);
    }
}
