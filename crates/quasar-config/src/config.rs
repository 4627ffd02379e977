//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level scene configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    /// Master seed; every subsystem derives its draws from this.
    pub seed: u64,
    /// Spiral galaxy settings.
    pub galaxy: GalaxyConfig,
    /// Decorative clusters carved out of the galaxy particle budget.
    pub structures: Vec<StructureConfig>,
    /// Background star field settings.
    pub starfield: StarfieldConfig,
    /// Accretion disk settings.
    pub disk: DiskConfig,
    /// Navigation planets.
    pub planets: Vec<PlanetConfig>,
    /// Headless demo run settings.
    pub demo: DemoConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Spiral galaxy configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GalaxyConfig {
    /// Total particle budget, structures included.
    pub particle_count: usize,
    /// Number of spiral arms.
    pub branches: u32,
    /// Outer dust radius in world units.
    pub radius: f32,
    /// Angular offset per unit radius.
    pub spin: f32,
    /// Positional noise amplitude.
    pub randomness: f32,
    /// Noise shaping exponent.
    pub randomness_power: f32,
    /// Hex color at the galactic center, e.g. "#9b4dca".
    pub inner_color: String,
    /// Hex color at the outer rim.
    pub outer_color: String,
}

/// One decorative structure cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StructureConfig {
    /// Center offset in galaxy-local coordinates.
    pub center: [f32; 3],
    /// Radius the cluster spiral grows to.
    pub radius: f32,
    /// Slots claimed from the galaxy budget.
    pub particle_count: usize,
}

/// Background star field configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Number of stars.
    pub star_count: usize,
    /// Inner radius of the sampling shell.
    pub min_radius: f32,
    /// Outer radius of the sampling shell.
    pub max_radius: f32,
    /// Vertical squash factor.
    pub flattening: f32,
    /// Enable per-star differential drift.
    pub drift: bool,
    /// Drift rate scale.
    pub drift_rate: f32,
}

/// Accretion disk configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DiskConfig {
    /// Number of disk particles.
    pub particle_count: usize,
    /// Inner spawn radius.
    pub inner_radius: f32,
    /// Outer spawn radius; also the recycle rim.
    pub outer_radius: f32,
}

/// One navigation planet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Surface archetype: "earth", "gas", "desert", "ice", or "lava".
    pub kind: String,
    /// Display label.
    pub name: String,
    /// Fixed world position.
    pub position: [f32; 3],
    /// Body radius in world units.
    pub size: f32,
    /// Spin rate in radians per second.
    pub rotation_speed: f32,
    /// Add a cloud shell.
    pub clouds: bool,
    /// Add an atmosphere halo.
    pub atmosphere: bool,
    /// Composite the water overlay.
    pub water: bool,
}

/// Headless demo run configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DemoConfig {
    /// Number of fixed ticks to simulate.
    pub frames: u64,
    /// Edge length of the preview image in pixels.
    pub preview_size: u32,
    /// Half-extent of the world slice the preview projects, in world units.
    pub preview_extent: f32,
    /// Edge length of baked planet surface maps in pixels.
    pub surface_map_size: u32,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log simulation statistics every N frames (0 disables).
    pub stats_interval: u64,
}

// --- Default implementations ---

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            galaxy: GalaxyConfig::default(),
            structures: Vec::new(),
            starfield: StarfieldConfig::default(),
            disk: DiskConfig::default(),
            planets: default_planets(),
            demo: DemoConfig::default(),
            debug: DebugConfig::default(),
        }
    }
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            particle_count: 15_000,
            branches: 5,
            radius: 15.0,
            spin: 1.5,
            randomness: 0.6,
            randomness_power: 3.0,
            inner_color: "#9b4dca".to_string(),
            outer_color: "#2196f3".to_string(),
        }
    }
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            center: [0.0; 3],
            radius: 1.0,
            particle_count: 100,
        }
    }
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            star_count: 2000,
            min_radius: 20.0,
            max_radius: 30.0,
            flattening: 0.5,
            drift: true,
            drift_rate: 0.05,
        }
    }
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            particle_count: 4000,
            inner_radius: 1.5,
            outer_radius: 3.5,
        }
    }
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            kind: "earth".to_string(),
            name: String::new(),
            position: [0.0; 3],
            size: 1.0,
            rotation_speed: 0.005,
            clouds: false,
            atmosphere: true,
            water: false,
        }
    }
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            frames: 600,
            preview_size: 512,
            preview_extent: 20.0,
            surface_map_size: 256,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            stats_interval: 120,
        }
    }
}

/// The portfolio scene's four navigation planets.
fn default_planets() -> Vec<PlanetConfig> {
    vec![
        PlanetConfig {
            kind: "earth".to_string(),
            name: "About".to_string(),
            position: [8.0, 0.0, -5.0],
            size: 1.5,
            clouds: true,
            water: true,
            ..PlanetConfig::default()
        },
        PlanetConfig {
            kind: "ice".to_string(),
            name: "Skills".to_string(),
            position: [0.0, -8.0, -10.0],
            size: 1.8,
            ..PlanetConfig::default()
        },
        PlanetConfig {
            kind: "gas".to_string(),
            name: "Projects".to_string(),
            position: [-10.0, 0.0, -5.0],
            size: 2.0,
            ..PlanetConfig::default()
        },
        PlanetConfig {
            kind: "desert".to_string(),
            name: "Contact".to_string(),
            position: [0.0, 10.0, -15.0],
            size: 1.2,
            ..PlanetConfig::default()
        },
    ]
}

/// Parse a `#rrggbb` hex color into RGB channels in [0, 1].
pub fn parse_hex_color(hex: &str) -> Result<[f32; 3], ConfigError> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ConfigError::InvalidColor(hex.to_string()));
    }
    let channel = |slice: &str| u8::from_str_radix(slice, 16).unwrap_or(0) as f32 / 255.0;
    Ok([
        channel(&digits[0..2]),
        channel(&digits[2..4]),
        channel(&digits[4..6]),
    ])
}

// --- Load / Save / Reload ---

impl SceneConfig {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: SceneConfig = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = SceneConfig::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: SceneConfig = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
