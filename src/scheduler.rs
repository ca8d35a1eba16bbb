//! Tile partitioning and the parallel render loop (spec.md §4.7). A worker
//! pool of `CpuCoreCount` threads pulls tiles from a FIFO queue, each worker
//! seeding its own PCG from the tile's coordinates and the current pass so
//! the image is reproducible regardless of which thread happens to pick up
//! which tile. Workers write straight into the shared accumulator's
//! disjoint per-tile regions rather than merging through a lock, since two
//! tiles never touch the same pixel.
//!
//! The teacher renders single-threaded into a WASM canvas (`wasm_interface.rs`)
//! and has no worker pool to generalize, so this module's concurrency shape
//! is grounded on the `std::thread::spawn` / channel producer-consumer idiom
//! read from the closest available corpus precedent for a progressive CPU
//! path tracer (see DESIGN.md), adapted from one background render thread to
//! a `CpuCoreCount`-sized pool pulling off a `crossbeam-channel` tile queue,
//! per spec.md §4.7's explicit description.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crossbeam_channel::unbounded;

use crate::camera::Camera;
use crate::color::Color3;
use crate::integrator::{estimate_radiance, IntegratorConfig};
use crate::math::Pcg32;
use crate::scene::Scene;

/// One `T x T` (or smaller, at the image's right/bottom edge) rectangle of
/// pixels — the unit of work a worker pulls off the queue (spec.md §4.7).
#[derive(Debug, Clone, Copy)]
pub struct Tile {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Tile {
    /// Splits a `width x height` image into row-major tiles of at most
    /// `tile_size` pixels on a side. The default is 32 (spec.md §4.7).
    pub fn partition(width: usize, height: usize, tile_size: usize) -> Vec<Tile> {
        let tile_size = tile_size.max(1);
        let mut tiles = Vec::new();
        let mut y = 0;
        while y < height {
            let h = tile_size.min(height - y);
            let mut x = 0;
            while x < width {
                let w = tile_size.min(width - x);
                tiles.push(Tile { x, y, width: w, height: h });
                x += tile_size;
            }
            y += tile_size;
        }
        tiles
    }
}

/// The running per-pixel sum and sample count. Tone-mapping and the NLM
/// filter read `mean()`; neither lives in this module.
pub struct Accumulator {
    width: usize,
    height: usize,
    sum: Vec<Color3>,
    count: Vec<u32>,
}

impl Accumulator {
    pub fn new(width: usize, height: usize) -> Accumulator {
        Accumulator {
            width,
            height,
            sum: vec![Color3::BLACK; width * height],
            count: vec![0; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn mean(&self, x: usize, y: usize) -> Color3 {
        let i = y * self.width + x;
        let n = self.count[i].max(1) as f32;
        self.sum[i] / n
    }

    pub fn sample_count(&self, x: usize, y: usize) -> u32 {
        self.count[y * self.width + x]
    }

    /// Raw pointer views into this accumulator's tiles, one per entry of
    /// `tiles`. Safe to move into separate worker threads: `tiles` is a
    /// partition of the image (non-overlapping rectangles, see
    /// `Tile::partition`), so distinct views never address the same pixel,
    /// and this call's `&mut self` borrow ensures no other code touches the
    /// buffers while the views are outstanding.
    fn tile_views(&mut self, tiles: &[Tile]) -> Vec<TileView> {
        let sum_ptr = self.sum.as_mut_ptr();
        let count_ptr = self.count.as_mut_ptr();
        let image_width = self.width;
        tiles
            .iter()
            .map(|&tile| TileView { sum_ptr, count_ptr, image_width, tile })
            .collect()
    }
}

struct TileView {
    sum_ptr: *mut Color3,
    count_ptr: *mut u32,
    image_width: usize,
    tile: Tile,
}

// Safety: each `TileView` only ever touches the pixels inside its own
// `tile`, and `Accumulator::tile_views` only ever hands out views whose
// tiles are pairwise disjoint, so moving one to a worker thread never
// races with another.
unsafe impl Send for TileView {}

impl TileView {
    fn add(&mut self, local_x: usize, local_y: usize, radiance: Color3) {
        let x = self.tile.x + local_x;
        let y = self.tile.y + local_y;
        let index = y * self.image_width + x;
        unsafe {
            *self.sum_ptr.add(index) += radiance;
            *self.count_ptr.add(index) += 1;
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    pub tile_size: usize,
    pub num_workers: usize,
    pub samples_per_pixel: u32,
    pub sub_samples: u32,
    pub max_rendering_sec: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            tile_size: 32,
            num_workers: num_cpus::get().max(1),
            samples_per_pixel: 16,
            sub_samples: 1,
            max_rendering_sec: f32::INFINITY,
        }
    }
}

/// Hashes a tile's coordinates and the current pass index into a PCG seed,
/// so the same tile always draws the same samples on the same pass no
/// matter which worker thread ends up processing it (spec.md §4.7: "each
/// worker owns its PCG seeded from tile coordinates so runs are
/// reproducible").
fn seed_for_tile(tile: Tile, pass: u32) -> u64 {
    const K1: u64 = 0x9E37_79B9_7F4A_7C15;
    const K2: u64 = 0xC2B2_AE3D_27D4_EB4F;
    const K3: u64 = 0x1656_67B1_9E37_79F9;
    (tile.x as u64).wrapping_mul(K1) ^ (tile.y as u64).wrapping_mul(K2) ^ (pass as u64).wrapping_mul(K3)
}

/// Runs the tile-scheduled render loop to completion: `samples_per_pixel`
/// passes over the whole image, each pass fanning its tiles out across
/// `num_workers` threads, unless `stop_requested` is set or
/// `max_rendering_sec` elapses first (spec.md §4.7). `on_snapshot` is
/// called after every completed pass with the accumulator so far and the
/// number of passes done; callers decide how often to actually tone-map and
/// write a file from it.
pub fn render(
    scene: &Scene,
    integrator_config: IntegratorConfig,
    scheduler_config: &SchedulerConfig,
    stop_requested: &AtomicBool,
    mut on_snapshot: impl FnMut(&Accumulator, u32),
) -> Accumulator {
    let width = scene.camera().width();
    let height = scene.camera().height();
    let tiles = Tile::partition(width, height, scheduler_config.tile_size);
    let mut accumulator = Accumulator::new(width, height);
    let sub_samples = scheduler_config.sub_samples.max(1);
    let start = Instant::now();

    for pass in 0..scheduler_config.samples_per_pixel {
        if stop_requested.load(Ordering::Relaxed) {
            break;
        }
        if start.elapsed().as_secs_f32() >= scheduler_config.max_rendering_sec {
            stop_requested.store(true, Ordering::Relaxed);
            break;
        }

        let views = accumulator.tile_views(&tiles);
        let (tile_tx, tile_rx) = unbounded::<(Tile, TileView)>();
        for (tile, view) in tiles.iter().copied().zip(views.into_iter()) {
            tile_tx.send((tile, view)).expect("receiver outlives this pass's senders");
        }
        drop(tile_tx);

        std::thread::scope(|scope| {
            for _ in 0..scheduler_config.num_workers {
                let rx = tile_rx.clone();
                let stop_requested = &*stop_requested;
                scope.spawn(move || {
                    while let Ok((tile, mut view)) = rx.recv() {
                        if stop_requested.load(Ordering::Relaxed) {
                            continue;
                        }
                        render_tile(scene, &integrator_config, tile, pass, sub_samples, &mut view);
                    }
                });
            }
        });

        on_snapshot(&accumulator, pass + 1);
    }

    accumulator
}

fn render_tile(
    scene: &Scene,
    integrator_config: &IntegratorConfig,
    tile: Tile,
    pass: u32,
    sub_samples: u32,
    view: &mut TileView,
) {
    let mut rng = Pcg32::new(seed_for_tile(tile, pass), 0);
    let cell = pass % (sub_samples * sub_samples).max(1);
    let sub_x = cell % sub_samples;
    let sub_y = cell / sub_samples;

    for local_y in 0..tile.height {
        for local_x in 0..tile.width {
            let x = tile.x + local_x;
            let y = tile.y + local_y;
            let (jitter_x, jitter_y) = Camera::stratified_jitter(&mut rng, sub_x, sub_y, sub_samples);
            let ray = scene.camera().ray_at(x, y, jitter_x, jitter_y);
            let radiance = estimate_radiance(scene, ray, integrator_config, &mut rng);
            view.add(local_x, local_y, radiance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::color::Color3;
    use crate::environment::Environment;
    use crate::material::Material;
    use crate::math::Vector3;
    use crate::shapes::{Shape, Sphere};

    fn small_scene(width: usize, height: usize) -> Scene {
        let sphere = Shape::Sphere(Sphere::new(Vector3::ZERO, 1.0, Material::lambert(Color3::new(0.8, 0.2, 0.2))));
        let camera = Camera::look_at(
            Vector3::new(0.0, 0.0, -4.0),
            Vector3::ZERO,
            Vector3::new(0.0, 1.0, 0.0),
            50.0,
            width,
            height,
        );
        Scene::new(vec![sphere], camera, Environment::Constant(Color3::new(0.1, 0.1, 0.2)))
    }

    #[test]
    fn tile_partition_covers_every_pixel_exactly_once() {
        let tiles = Tile::partition(70, 50, 32);
        let mut covered = vec![0u32; 70 * 50];
        for tile in &tiles {
            for y in tile.y..tile.y + tile.height {
                for x in tile.x..tile.x + tile.width {
                    covered[y * 70 + x] += 1;
                }
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
    }

    #[test]
    fn render_produces_finite_nonnegative_image_after_requested_passes() {
        let scene = small_scene(24, 24);
        let config = SchedulerConfig {
            tile_size: 8,
            num_workers: 2,
            samples_per_pixel: 4,
            sub_samples: 2,
            max_rendering_sec: f32::INFINITY,
        };
        let stop = AtomicBool::new(false);
        let mut passes_seen = 0u32;
        let accumulator = render(&scene, IntegratorConfig::default(), &config, &stop, |_, pass| {
            passes_seen = pass;
        });
        assert_eq!(passes_seen, 4);
        for y in 0..accumulator.height() {
            for x in 0..accumulator.width() {
                assert_eq!(accumulator.sample_count(x, y), 4);
                let color = accumulator.mean(x, y);
                assert!(color.is_finite());
                assert!(!color.has_negative());
            }
        }
    }

    #[test]
    fn stop_requested_before_first_pass_yields_an_empty_accumulator() {
        let scene = small_scene(16, 16);
        let config = SchedulerConfig { tile_size: 8, num_workers: 2, samples_per_pixel: 4, sub_samples: 1, ..SchedulerConfig::default() };
        let stop = AtomicBool::new(true);
        let accumulator = render(&scene, IntegratorConfig::default(), &config, &stop, |_, _| {});
        assert_eq!(accumulator.sample_count(0, 0), 0);
    }

    #[test]
    fn same_tile_and_pass_always_draws_the_same_seed() {
        let tile = Tile { x: 64, y: 96, width: 32, height: 32 };
        assert_eq!(seed_for_tile(tile, 3), seed_for_tile(tile, 3));
        assert_ne!(seed_for_tile(tile, 3), seed_for_tile(tile, 4));
    }
}
