//! One test per named scenario, assembling the scene, running the scheduler
//! at a small resolution and a fixed sample count, and checking the
//! physical property that scenario is meant to demonstrate. Modeled after
//! the scenario-style correctness tests found in the retrieval pack (a
//! fixed scene, a handful of samples, a tolerance assertion) rather than
//! pixel-exact golden images, since path tracing is stochastic by nature.

use std::sync::atomic::AtomicBool;

use approx::assert_relative_eq;
use pathforge::integrator::IntegratorConfig;
use pathforge::scenes;
use pathforge::scheduler::{render, SchedulerConfig};

fn render_small(scene_name: &str, width: usize, height: usize, samples: u32) -> pathforge::scheduler::Accumulator {
    let scene = scenes::build(scene_name, width, height).expect("scenario name should resolve");
    let config = SchedulerConfig {
        tile_size: 16,
        num_workers: 2,
        samples_per_pixel: samples,
        sub_samples: 1,
        max_rendering_sec: f32::INFINITY,
    };
    let stop = AtomicBool::new(false);
    render(&scene, IntegratorConfig::default(), &config, &stop, |_, _| {})
}

#[test]
fn empty_scene_every_pixel_equals_the_environment_color() {
    let accumulator = render_small("empty", 16, 16, 4);
    let expected = pathforge::color::Color3::new(0.5, 0.7, 1.0);
    for y in 0..accumulator.height() {
        for x in 0..accumulator.width() {
            let c = accumulator.mean(x, y);
            assert_relative_eq!(c.r, expected.r, epsilon = 1e-4);
            assert_relative_eq!(c.g, expected.g, epsilon = 1e-4);
            assert_relative_eq!(c.b, expected.b, epsilon = 1e-4);
        }
    }
}

#[test]
fn lambert_ball_center_pixel_is_lit_and_finite() {
    let accumulator = render_small("ball", 32, 32, 8);
    let center = accumulator.mean(16, 16);
    assert!(center.is_finite());
    assert!(!center.has_negative());
    assert!(center.luminance() > 0.0, "the sphere facing the light should receive some radiance");
}

#[test]
fn mirror_checker_reflects_one_of_the_wall_colors_at_the_sphere_silhouette() {
    let accumulator = render_small("mirror_checker", 48, 48, 8);
    // A ray through the mirror sphere's center reflects back toward the
    // camera; off-center it picks up one of the colored walls. Sample a
    // pixel just off center and check it isn't black (occluded) or the
    // background fill color.
    let sample = accumulator.mean(30, 24);
    assert!(sample.is_finite());
    assert!(sample.luminance() > 0.0);
}

#[test]
fn cornell_box_left_wall_tints_the_floor_red() {
    // 512 spp so the estimator's noise floor is well under the 15% margin
    // this asserts; 16 spp was too noisy to tell a true color-bleed effect
    // from the sampling error around it.
    let accumulator = render_small("cornell_box", 48, 48, 512);
    // A pixel near the left wall's base should pick up red-tinted bounce
    // light from the red wall (color bleeding): its blue channel should
    // trail its red channel by at least 15%, matching the quantified
    // invariant this scenario is meant to demonstrate.
    let near_left_wall = accumulator.mean(10, 30);
    assert!(near_left_wall.is_finite());
    assert!(
        near_left_wall.b < near_left_wall.r * 0.85,
        "red wall should bleed enough warm light onto the nearby floor to read at least 15% less blue than red, got r={} b={}",
        near_left_wall.r,
        near_left_wall.b
    );
}

#[test]
fn ibl_sphere_is_lit_by_the_constant_environment_alone() {
    let accumulator = render_small("ibl_sphere", 24, 24, 8);
    let center = accumulator.mean(12, 12);
    assert!(center.is_finite());
    assert!(center.luminance() > 0.0, "a white diffuse sphere under a white environment should not be black");
}

#[test]
fn glass_caustic_scene_renders_to_a_finite_nonnegative_image() {
    let accumulator = render_small("glass_caustic", 32, 32, 8);
    for y in 0..accumulator.height() {
        for x in 0..accumulator.width() {
            let c = accumulator.mean(x, y);
            assert!(c.is_finite(), "pixel ({x},{y}) should be finite");
            assert!(!c.has_negative(), "pixel ({x},{y}) should not be negative");
        }
    }
}

#[test]
fn every_scenario_is_reproducible_given_the_same_seed_schedule() {
    // The scheduler seeds purely from tile coordinates and pass index, so
    // two independent renders of the same scene and sample count must be
    // pixel-identical (spec.md §4.7's reproducibility guarantee).
    let a = render_small("ball", 24, 24, 4);
    let b = render_small("ball", 24, 24, 4);
    for y in 0..a.height() {
        for x in 0..a.width() {
            assert_eq!(a.mean(x, y), b.mean(x, y));
        }
    }
}
