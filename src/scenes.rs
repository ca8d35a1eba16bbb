//! Named scene presets, one `setup_scene_*` function per test scenario
//! (spec.md §8's six concrete end-to-end scenarios). Grounded on the
//! teacher's `scenes.rs`, which takes the same shape: a flat list of
//! `pub fn setup_scene_*() -> Scene` builders pushing hand-placed
//! primitives, selected by name from `main.rs`.

use crate::camera::Camera;
use crate::color::Color3;
use crate::environment::Environment;
use crate::material::Material;
use crate::math::{Matrix4, Vector3};
use crate::scene::Scene;
use crate::shapes::{Instance, Quad, Shape, Sphere};

fn camera(width: usize, height: usize, origin: Vector3, target: Vector3) -> Camera {
    Camera::look_at(origin, target, Vector3::new(0.0, 1.0, 0.0), 50.0, width, height)
}

/// Scenario 1: an empty scene with a constant environment. Every pixel
/// should equal the environment color.
pub fn setup_scene_empty(width: usize, height: usize) -> Scene {
    let cam = camera(width, height, Vector3::new(0.0, 0.0, -5.0), Vector3::ZERO);
    Scene::new(Vec::new(), cam, Environment::Constant(Color3::new(0.5, 0.7, 1.0)))
}

/// Scenario 2: a single Lambertian sphere lit by one distant area light.
pub fn setup_scene_ball(width: usize, height: usize) -> Scene {
    let cam = camera(width, height, Vector3::new(0.0, 0.0, 3.0), Vector3::ZERO);
    let sphere = Shape::Sphere(Sphere::new(Vector3::ZERO, 1.0, Material::lambert(Color3::new(0.8, 0.8, 0.8))));
    let light_dir = Vector3::new(-1.0, -1.0, -1.0).normalize_safe();
    let light_center = -light_dir * 20.0;
    let light = Shape::Sphere(Sphere::new(
        light_center,
        3.0,
        Material::lambert_emissive(Color3::BLACK, Color3::splat(40.0)),
    ));
    Scene::new(vec![sphere, light], cam, Environment::Constant(Color3::BLACK))
}

/// Scenario 3: a mirror sphere between two checkerboard walls.
pub fn setup_scene_mirror_checker(width: usize, height: usize) -> Scene {
    let cam = camera(width, height, Vector3::new(0.0, 0.0, -6.0), Vector3::ZERO);
    let mirror = Shape::Sphere(Sphere::new(Vector3::ZERO, 1.5, Material::mirror(Color3::splat(0.95))));

    let wall = |center: Vector3, color: Color3| {
        Shape::Instance(Box::new(Instance::new(
            Shape::Quad(Quad::new(
                Vector3::new(-4.0, -4.0, 0.0),
                Vector3::new(4.0, -4.0, 0.0),
                Vector3::new(4.0, 4.0, 0.0),
                Vector3::new(-4.0, 4.0, 0.0),
                Material::lambert(color),
            )),
            Matrix4::translation(center),
        )))
    };
    let left_wall = wall(Vector3::new(-6.0, 0.0, 4.0), Color3::new(0.9, 0.2, 0.2));
    let right_wall = wall(Vector3::new(6.0, 0.0, 4.0), Color3::new(0.2, 0.2, 0.9));
    let light = Shape::Sphere(Sphere::new(
        Vector3::new(0.0, 8.0, -2.0),
        1.0,
        Material::lambert_emissive(Color3::BLACK, Color3::splat(20.0)),
    ));
    Scene::new(vec![mirror, left_wall, right_wall, light], cam, Environment::Constant(Color3::splat(0.05)))
}

/// Scenario 4: a Cornell box (white walls, red left, green right, area
/// light on the ceiling) for the color-bleeding test.
pub fn setup_scene_cornell_box(width: usize, height: usize) -> Scene {
    let cam = camera(width, height, Vector3::new(0.0, 0.0, -6.0), Vector3::new(0.0, 0.0, 1.0));
    let white = Material::lambert(Color3::splat(0.75));
    let red = Material::lambert(Color3::new(0.75, 0.1, 0.1));
    let green = Material::lambert(Color3::new(0.1, 0.75, 0.1));

    let floor = Shape::Quad(Quad::new(
        Vector3::new(-4.0, -3.0, -4.0),
        Vector3::new(4.0, -3.0, -4.0),
        Vector3::new(4.0, -3.0, 8.0),
        Vector3::new(-4.0, -3.0, 8.0),
        white.clone(),
    ));
    let ceiling = Shape::Quad(Quad::new(
        Vector3::new(-4.0, 3.0, 8.0),
        Vector3::new(4.0, 3.0, 8.0),
        Vector3::new(4.0, 3.0, -4.0),
        Vector3::new(-4.0, 3.0, -4.0),
        white.clone(),
    ));
    let back = Shape::Quad(Quad::new(
        Vector3::new(-4.0, -3.0, 8.0),
        Vector3::new(4.0, -3.0, 8.0),
        Vector3::new(4.0, 3.0, 8.0),
        Vector3::new(-4.0, 3.0, 8.0),
        white,
    ));
    let left = Shape::Quad(Quad::new(
        Vector3::new(-4.0, -3.0, 8.0),
        Vector3::new(-4.0, -3.0, -4.0),
        Vector3::new(-4.0, 3.0, -4.0),
        Vector3::new(-4.0, 3.0, 8.0),
        red,
    ));
    let right = Shape::Quad(Quad::new(
        Vector3::new(4.0, -3.0, -4.0),
        Vector3::new(4.0, -3.0, 8.0),
        Vector3::new(4.0, 3.0, 8.0),
        Vector3::new(4.0, 3.0, -4.0),
        green,
    ));
    let light = Shape::Quad(Quad::new(
        Vector3::new(-1.0, 2.99, 2.0),
        Vector3::new(1.0, 2.99, 2.0),
        Vector3::new(1.0, 2.99, 4.0),
        Vector3::new(-1.0, 2.99, 4.0),
        Material::lambert_emissive(Color3::BLACK, Color3::splat(8.0)),
    ));

    Scene::new(vec![floor, ceiling, back, left, right, light], cam, Environment::Constant(Color3::BLACK))
}

/// Scenario 5: a diffuse sphere lit purely by a constant-white environment
/// (image-based lighting with a trivial, uniform "image").
pub fn setup_scene_ibl_sphere(width: usize, height: usize) -> Scene {
    let cam = camera(width, height, Vector3::new(0.0, 0.0, 3.0), Vector3::ZERO);
    let sphere = Shape::Sphere(Sphere::new(Vector3::ZERO, 1.0, Material::lambert(Color3::WHITE)));
    Scene::new(vec![sphere], cam, Environment::Constant(Color3::WHITE))
}

/// Scenario 6: a glass sphere between a point-like area light and a white
/// plane, producing a focused caustic.
pub fn setup_scene_glass_caustic(width: usize, height: usize) -> Scene {
    let cam = camera(width, height, Vector3::new(0.0, 2.0, -6.0), Vector3::new(0.0, -0.5, 0.0));
    let glass = Shape::Sphere(Sphere::new(Vector3::new(0.0, 0.0, 0.0), 1.0, Material::glass(Color3::WHITE, 1.5)));
    let plane = Shape::Quad(Quad::new(
        Vector3::new(-6.0, -1.5, -6.0),
        Vector3::new(6.0, -1.5, -6.0),
        Vector3::new(6.0, -1.5, 6.0),
        Vector3::new(-6.0, -1.5, 6.0),
        Material::lambert(Color3::splat(0.8)),
    ));
    let light = Shape::Sphere(Sphere::new(
        Vector3::new(0.0, 4.0, -2.0),
        0.3,
        Material::lambert_emissive(Color3::BLACK, Color3::splat(120.0)),
    ));
    Scene::new(vec![glass, plane, light], cam, Environment::Constant(Color3::BLACK))
}

/// Resolves a `sceneName` configuration value (spec.md §6) to one of the
/// presets above.
pub fn build(name: &str, width: usize, height: usize) -> Option<Scene> {
    match name {
        "empty" => Some(setup_scene_empty(width, height)),
        "ball" => Some(setup_scene_ball(width, height)),
        "mirror_checker" => Some(setup_scene_mirror_checker(width, height)),
        "cornell_box" => Some(setup_scene_cornell_box(width, height)),
        "ibl_sphere" => Some(setup_scene_ibl_sphere(width, height)),
        "glass_caustic" => Some(setup_scene_glass_caustic(width, height)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_named_preset_resolves() {
        for name in ["empty", "ball", "mirror_checker", "cornell_box", "ibl_sphere", "glass_caustic"] {
            assert!(build(name, 16, 16).is_some(), "preset '{name}' should resolve");
        }
    }

    #[test]
    fn unknown_scene_name_resolves_to_none() {
        assert!(build("not_a_scene", 16, 16).is_none());
    }

    #[test]
    fn empty_scene_has_no_lights() {
        let scene = setup_scene_empty(8, 8);
        assert!(!scene.has_lights());
    }
}
