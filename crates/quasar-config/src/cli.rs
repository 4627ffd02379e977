//! Command-line argument parsing for the Quasar scene demo.

use std::path::PathBuf;

use clap::Parser;

use crate::SceneConfig;

/// Quasar demo command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "quasar", about = "Procedural cosmic scene kernel demo")]
pub struct CliArgs {
    /// Master scene seed.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of fixed ticks to simulate.
    #[arg(long)]
    pub frames: Option<u64>,

    /// Galaxy particle count.
    #[arg(long)]
    pub particles: Option<usize>,

    /// Background star count.
    #[arg(long)]
    pub stars: Option<usize>,

    /// Write a top-down preview image to this path after the run.
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl SceneConfig {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(seed) = args.seed {
            self.seed = seed;
        }
        if let Some(frames) = args.frames {
            self.demo.frames = frames;
        }
        if let Some(particles) = args.particles {
            self.galaxy.particle_count = particles;
        }
        if let Some(stars) = args.stars {
            self.starfield.star_count = stars;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            seed: None,
            frames: None,
            particles: None,
            stars: None,
            preview: None,
            log_level: None,
            config: None,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = SceneConfig::default();
        let args = CliArgs {
            seed: Some(99),
            particles: Some(30_000),
            log_level: Some("debug".to_string()),
            ..empty_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.seed, 99);
        assert_eq!(config.galaxy.particle_count, 30_000);
        assert_eq!(config.debug.log_level, "debug");
        // Non-overridden fields retain defaults
        assert_eq!(config.starfield.star_count, 2000);
        assert_eq!(config.demo.frames, 600);
    }

    #[test]
    fn test_cli_no_override() {
        let original = SceneConfig::default();
        let mut config = SceneConfig::default();
        config.apply_cli_overrides(&empty_args());
        assert_eq!(config, original);
    }
}
