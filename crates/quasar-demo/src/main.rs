//! Headless demo binary for the Quasar scene kernel.
//!
//! Assembles the full portfolio scene from `config.ron`, advances it through a
//! fixed number of simulation ticks, bakes planet surface maps, and can write
//! a top-down preview image of the particle buffers.
//! Run with `cargo run -p quasar-demo` for the default scene.
//! Run with `cargo run -p quasar-demo -- --seed 7 --preview scene.png` to
//! render a different universe to disk.

mod preview;

use std::path::{Path, PathBuf};

use clap::Parser;
use glam::Vec3;
use preview::ScenePreview;
use quasar_config::{CliArgs, SceneConfig};
use quasar_space::{
    PlanetKind, PlanetSpec, Scene, SceneSpec, StructureSpec, bake_cloud_map,
    bake_displacement_map, bake_water_map,
};
use tracing::{info, warn};

/// Fixed simulation timestep matching a 60 Hz frame rate.
const FIXED_DT: f32 = 1.0 / 60.0;

fn main() {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(|| PathBuf::from("."));

    // Load or create config, then apply CLI overrides
    let mut config = SceneConfig::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        SceneConfig::default()
    });
    config.apply_cli_overrides(&args);

    // Initialize logging with config and debug settings
    let log_dir = config_dir.join("logs");
    quasar_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let spec = build_scene_spec(&config).unwrap_or_else(|e| {
        eprintln!("Invalid scene configuration: {e}");
        std::process::exit(1);
    });

    let mut scene = Scene::from_spec(&spec).unwrap_or_else(|e| {
        eprintln!("Failed to assemble scene: {e}");
        std::process::exit(1);
    });

    // Demonstrate what the generators produced
    demonstrate_scene_contents(&scene);

    // Demonstrate the fixed-step simulation loop
    demonstrate_simulation(&mut scene, &config);

    // Demonstrate planet surface baking
    demonstrate_surface_baking(&scene, &config);

    if let Some(ref path) = args.preview {
        match write_scene_preview(&scene, &config, path) {
            Ok(()) => info!("Wrote preview image to {}", path.display()),
            Err(e) => warn!("Failed to write preview image: {e}"),
        }
    }

    info!(
        "Demo complete: {} ticks simulated, {} disk particles recycled",
        config.demo.frames,
        scene.disk().recycled()
    );
}

/// Translates the on-disk config into the kernel's parameter structs.
///
/// Hex color strings and planet kind names are validated here, so a typo in
/// `config.ron` fails before any generation runs.
fn build_scene_spec(config: &SceneConfig) -> Result<SceneSpec, Box<dyn std::error::Error>> {
    let galaxy = quasar_space::GalaxyConfig {
        particle_count: config.galaxy.particle_count,
        branches: config.galaxy.branches,
        radius: config.galaxy.radius,
        spin: config.galaxy.spin,
        randomness: config.galaxy.randomness,
        randomness_power: config.galaxy.randomness_power,
        inner_color: quasar_config::parse_hex_color(&config.galaxy.inner_color)?,
        outer_color: quasar_config::parse_hex_color(&config.galaxy.outer_color)?,
    };

    let structures = config
        .structures
        .iter()
        .map(|s| StructureSpec {
            center: Vec3::from_array(s.center),
            radius: s.radius,
            particle_count: s.particle_count,
        })
        .collect();

    let starfield = quasar_space::StarfieldConfig {
        star_count: config.starfield.star_count,
        min_radius: config.starfield.min_radius,
        max_radius: config.starfield.max_radius,
        flattening: config.starfield.flattening,
        drift: config.starfield.drift,
        drift_rate: config.starfield.drift_rate,
    };

    let disk = quasar_space::DiskConfig {
        particle_count: config.disk.particle_count,
        inner_radius: config.disk.inner_radius,
        outer_radius: config.disk.outer_radius,
    };

    let mut planets = Vec::with_capacity(config.planets.len());
    for p in &config.planets {
        planets.push(PlanetSpec {
            kind: p.kind.parse::<PlanetKind>()?,
            name: p.name.clone(),
            position: Vec3::from_array(p.position),
            size: p.size,
            rotation_speed: p.rotation_speed,
            clouds: p.clouds,
            atmosphere: p.atmosphere,
            water: p.water,
        });
    }

    Ok(SceneSpec {
        seed: config.seed,
        galaxy,
        structures,
        starfield,
        disk,
        planets,
    })
}

/// Demonstrates scene assembly by logging what each generator produced.
fn demonstrate_scene_contents(scene: &Scene) {
    info!("Starting scene assembly demonstration");

    info!(
        "Galaxy: {} particles, starfield: {} stars, disk: {} particles",
        scene.galaxy().len(),
        scene.starfield().buffer().len(),
        scene.disk().buffer().len()
    );
    for planet in scene.planets() {
        let spec = planet.spec();
        info!(
            "Planet '{}' ({:?}) at {:?}, size {}",
            spec.name, spec.kind, spec.position, spec.size
        );
    }

    info!("Scene assembly demonstration completed successfully");
}

/// Demonstrates the fixed-step simulation loop, logging disk statistics at
/// the configured interval.
fn demonstrate_simulation(scene: &mut Scene, config: &SceneConfig) {
    info!(
        "Starting simulation demonstration: {} ticks at {:.0} Hz",
        config.demo.frames,
        1.0 / FIXED_DT
    );

    let interval = config.debug.stats_interval;
    for frame in 0..config.demo.frames {
        scene.advance(FIXED_DT);
        if interval > 0 && (frame + 1) % interval == 0 {
            log_frame_stats(scene, frame + 1);
        }
    }

    info!(
        "Simulation demonstration completed successfully: {:.1} s simulated",
        scene.elapsed()
    );
}

/// Logs the disk's radial envelope and the animated point/pulse state.
fn log_frame_stats(scene: &Scene, frame: u64) {
    let mut nearest = f32::MAX;
    let mut farthest: f32 = 0.0;
    for position in scene.disk().buffer().positions() {
        let planar = (position.x * position.x + position.z * position.z).sqrt();
        nearest = nearest.min(planar);
        farthest = farthest.max(planar);
    }

    info!(
        "frame {frame}: disk radius [{nearest:.2}, {farthest:.2}], {} recycled, \
         star point size {:.4}, hole scale {:.3}",
        scene.disk().recycled(),
        scene.starfield().point_size(),
        scene.black_hole_scale()
    );
}

/// Demonstrates surface baking by generating each planet's texture maps and
/// reporting coverage statistics.
fn demonstrate_surface_baking(scene: &Scene, config: &SceneConfig) {
    info!("Starting surface baking demonstration");

    let size = config.demo.surface_map_size;
    for (index, planet) in scene.planets().iter().enumerate() {
        let spec = planet.spec();
        // One seed lane per planet so maps differ between worlds
        let seed = config.seed.wrapping_add(100 + index as u64 * 3);

        let displacement = bake_displacement_map(spec.kind, size, seed);
        info!(
            "'{}' displacement: {}x{} px, mean level {:.1}",
            spec.name,
            displacement.size(),
            displacement.size(),
            mean_level(displacement.data())
        );

        if spec.clouds {
            let clouds = bake_cloud_map(size, seed.wrapping_add(1));
            let coverage = coverage_fraction(clouds.data());
            info!("'{}' clouds: {:.0}% coverage", spec.name, coverage * 100.0);
        }

        if spec.water {
            let water = bake_water_map(size, seed.wrapping_add(2));
            let base_red = water.iter().map(|texel| texel[0]).min().unwrap_or(0);
            let rippled = water.iter().filter(|texel| texel[0] > base_red).count();
            info!(
                "'{}' water: {} of {} texels rippled",
                spec.name,
                rippled,
                water.len()
            );
        }
    }

    info!("Surface baking demonstration completed successfully");
}

/// Mean byte level of an intensity map.
fn mean_level(data: &[u8]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: u64 = data.iter().map(|&v| v as u64).sum();
    sum as f32 / data.len() as f32
}

/// Fraction of texels touched by at least one splat.
fn coverage_fraction(data: &[u8]) -> f32 {
    if data.is_empty() {
        return 0.0;
    }
    let lit = data.iter().filter(|&&v| v > 0).count();
    lit as f32 / data.len() as f32
}

/// Splats the galaxy, starfield, and disk snapshots into a top-down PNG.
fn write_scene_preview(
    scene: &Scene,
    config: &SceneConfig,
    path: &Path,
) -> Result<(), png::EncodingError> {
    let mut canvas = ScenePreview::new(config.demo.preview_size, config.demo.preview_extent);

    // Boost factors lift typical point sizes into the visible range
    canvas.splat(&scene.starfield().buffer().instances(), 4.0);
    canvas.splat(&scene.galaxy().instances(), 3.0);
    canvas.splat(&scene.disk().buffer().instances(), 8.0);

    canvas.write_png(path)
}
