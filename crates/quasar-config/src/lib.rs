//! Configuration system for the Quasar cosmic scene.
//!
//! Provides runtime-configurable settings that persist to disk as RON files.
//! Supports CLI overrides via clap, hot-reload detection, and forward/backward
//! compatible serialization.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    DebugConfig, DemoConfig, DiskConfig, GalaxyConfig, PlanetConfig, SceneConfig, StarfieldConfig,
    StructureConfig, parse_hex_color,
};
pub use error::ConfigError;
