//! CLI entry point: argument parsing, logging setup, scene assembly, and
//! wiring the library's scheduler into a `Run` that writes snapshots and a
//! final image (spec.md §6's CLI surface, sketched only for completeness).

use std::fs::File;
use std::io::BufWriter;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use log::{error, info};

use pathforge::config::Config;
use pathforge::error::ConfigError;
use pathforge::io::bmp;
use pathforge::io::pfm;
use pathforge::scenes;
use pathforge::scheduler::{self, Accumulator, SchedulerConfig};
use pathforge::tonemap::ToneMapper;

#[derive(Debug, Parser)]
#[command(name = "pathforge", about = "An offline physically-based path tracer")]
struct Args {
    #[arg(long, default_value_t = 512)]
    width: u32,
    #[arg(long, default_value_t = 512)]
    height: u32,
    #[arg(long, default_value_t = 64)]
    samples: u32,
    #[arg(long, default_value_t = 2)]
    subsamples: u32,
    #[arg(long, default_value_t = 16)]
    bounces: u32,
    #[arg(long, default_value_t = f32::INFINITY)]
    time: f32,
    #[arg(long, default_value = "ball")]
    scene: String,
    #[arg(long, default_value = "output")]
    out: String,
}

impl From<&Args> for Config {
    fn from(args: &Args) -> Config {
        Config {
            width: args.width,
            height: args.height,
            num_samples: args.samples,
            num_sub_samples: args.subsamples,
            max_bounce_count: args.bounces,
            max_rendering_sec: args.time,
            cpu_core_count: num_cpus::get() as u32,
            scene_name: args.scene.clone(),
        }
    }
}

fn write_snapshot(path: &str, accumulator: &Accumulator, tone_mapper: ToneMapper) -> std::io::Result<()> {
    let pixels: Vec<_> = (0..accumulator.height())
        .flat_map(|y| (0..accumulator.width()).map(move |x| (x, y)))
        .map(|(x, y)| tone_mapper.apply(accumulator.mean(x, y)))
        .collect();
    let mut writer = BufWriter::new(File::create(path)?);
    bmp::write(&mut writer, accumulator.width() as u32, accumulator.height() as u32, &pixels)
}

fn write_linear(path: &str, accumulator: &Accumulator) -> std::io::Result<()> {
    let pixels: Vec<_> = (0..accumulator.height())
        .flat_map(|y| (0..accumulator.width()).map(move |x| (x, y)))
        .map(|(x, y)| accumulator.mean(x, y))
        .collect();
    let mut writer = BufWriter::new(File::create(path)?);
    pfm::write(&mut writer, accumulator.width() as u32, accumulator.height() as u32, &pixels)
}

fn run(args: Args) -> Result<(), ConfigError> {
    let config = Config::from(&args);
    config.validate()?;

    let scene = scenes::build(&config.scene_name, config.width as usize, config.height as usize)
        .ok_or_else(|| ConfigError::UnknownScene(config.scene_name.clone()))?;

    let scheduler_config = SchedulerConfig {
        tile_size: 32,
        num_workers: (config.cpu_core_count as usize).max(1),
        samples_per_pixel: config.num_samples,
        sub_samples: config.num_sub_samples,
        max_rendering_sec: config.max_rendering_sec,
    };
    let integrator_config = pathforge::integrator::IntegratorConfig {
        min_bounces: 5,
        max_bounce_count: config.max_bounce_count,
    };

    info!(
        "rendering '{}' at {}x{}, {} spp across {} workers",
        config.scene_name, config.width, config.height, config.num_samples, scheduler_config.num_workers
    );

    let stop_requested = AtomicBool::new(false);
    let tone_mapper = ToneMapper::Reinhard;
    let accumulator = scheduler::render(&scene, integrator_config, &scheduler_config, &stop_requested, |acc, pass| {
        let path = format!("{}_{}.bmp", args.out, pass);
        match write_snapshot(&path, acc, tone_mapper) {
            Ok(()) => info!("pass {pass} snapshot written to {path}"),
            Err(e) => error!("failed to write snapshot {path}: {e}"),
        }
    });

    write_snapshot(&format!("{}.bmp", args.out), &accumulator, tone_mapper)
        .map_err(|e| ConfigError::UnknownScene(format!("failed to write final image: {e}")))?;
    write_linear(&format!("{}.pfm", args.out), &accumulator)
        .map_err(|e| ConfigError::UnknownScene(format!("failed to write linear output: {e}")))?;

    info!("render complete, wrote {}.bmp and {}.pfm", args.out, args.out);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
