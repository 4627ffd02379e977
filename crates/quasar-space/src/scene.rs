//! Scene assembly: owns every particle system in the cosmic scene and
//! advances them in a fixed order each tick.

use glam::Vec3;

use crate::buffer::ParticleBuffer;
use crate::disk::{AccretionDisk, DiskConfig};
use crate::error::SceneError;
use crate::galaxy::{GalaxyConfig, GalaxyGenerator, StructureSpec, black_hole_pulse, galaxy_step};
use crate::planet::{Planet, PlanetKind, PlanetSpec};
use crate::starfield::{StarField, StarfieldConfig};

/// Everything needed to assemble a scene from one master seed.
///
/// Subsystem seeds are derived from the master seed, so a spec pins down the
/// entire scene and every trajectory in it.
#[derive(Clone, Debug)]
pub struct SceneSpec {
    /// Master seed; subsystems draw from offsets of it.
    pub seed: u64,
    /// Spiral dust parameters.
    pub galaxy: GalaxyConfig,
    /// Decorative clusters carved out of the galaxy budget.
    pub structures: Vec<StructureSpec>,
    /// Background star shell parameters.
    pub starfield: StarfieldConfig,
    /// Black-hole accretion disk parameters.
    pub disk: DiskConfig,
    /// Navigation planets.
    pub planets: Vec<PlanetSpec>,
}

impl Default for SceneSpec {
    fn default() -> Self {
        Self {
            seed: 0,
            galaxy: GalaxyConfig::default(),
            structures: Vec::new(),
            starfield: StarfieldConfig::default(),
            disk: DiskConfig::default(),
            planets: default_planets(),
        }
    }
}

/// The four navigation planets of the portfolio scene.
fn default_planets() -> Vec<PlanetSpec> {
    vec![
        PlanetSpec {
            kind: PlanetKind::Earth,
            name: "About".to_string(),
            position: Vec3::new(8.0, 0.0, -5.0),
            size: 1.5,
            rotation_speed: 0.005,
            clouds: true,
            atmosphere: true,
            water: true,
        },
        PlanetSpec {
            kind: PlanetKind::Ice,
            name: "Skills".to_string(),
            position: Vec3::new(0.0, -8.0, -10.0),
            size: 1.8,
            rotation_speed: 0.005,
            clouds: false,
            atmosphere: true,
            water: false,
        },
        PlanetSpec {
            kind: PlanetKind::Gas,
            name: "Projects".to_string(),
            position: Vec3::new(-10.0, 0.0, -5.0),
            size: 2.0,
            rotation_speed: 0.005,
            clouds: false,
            atmosphere: true,
            water: false,
        },
        PlanetSpec {
            kind: PlanetKind::Desert,
            name: "Contact".to_string(),
            position: Vec3::new(0.0, 10.0, -15.0),
            size: 1.2,
            rotation_speed: 0.005,
            clouds: false,
            atmosphere: true,
            water: false,
        },
    ]
}

/// The assembled cosmic scene.
///
/// Single-writer contract: buffers mutate only inside [`Scene::advance`], and
/// each one is fully updated before the call returns. A renderer reads the
/// buffers (or takes instance snapshots) strictly between ticks.
pub struct Scene {
    galaxy: ParticleBuffer,
    starfield: StarField,
    disk: AccretionDisk,
    planets: Vec<Planet>,
    elapsed: f32,
}

impl Scene {
    /// Assemble all subsystems. Deterministic for a given spec.
    pub fn from_spec(spec: &SceneSpec) -> Result<Self, SceneError> {
        let galaxy =
            GalaxyGenerator::new(spec.galaxy.clone(), spec.structures.clone(), spec.seed)
                .generate()?;
        let starfield = StarField::generate(spec.starfield.clone(), spec.seed.wrapping_add(1))?;
        let disk = AccretionDisk::new(spec.disk.clone(), spec.seed.wrapping_add(2))?;
        let planets: Vec<Planet> = spec.planets.iter().cloned().map(Planet::new).collect();

        log::info!(
            "assembled scene from seed {}: {} dust, {} stars, {} disk particles, {} planets",
            spec.seed,
            galaxy.len(),
            starfield.buffer().len(),
            disk.buffer().len(),
            planets.len()
        );
        Ok(Self {
            galaxy,
            starfield,
            disk,
            planets,
            elapsed: 0.0,
        })
    }

    /// Advance every subsystem by `delta` seconds.
    ///
    /// Order is fixed: galaxy rotation, star field, accretion disk, planet
    /// spins.
    pub fn advance(&mut self, delta: f32) {
        self.elapsed += delta;
        galaxy_step(&mut self.galaxy, delta);
        self.starfield.step(delta, self.elapsed);
        self.disk.step(delta, self.elapsed);
        for planet in &mut self.planets {
            planet.update(delta);
        }
    }

    /// Seconds of simulated time accumulated so far.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Galaxy dust buffer.
    pub fn galaxy(&self) -> &ParticleBuffer {
        &self.galaxy
    }

    /// Background star field with its twinkle state.
    pub fn starfield(&self) -> &StarField {
        &self.starfield
    }

    /// Accretion disk simulation.
    pub fn disk(&self) -> &AccretionDisk {
        &self.disk
    }

    /// Planet spin states, in spec order.
    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    /// Current scale factor of the black-hole centerpiece.
    pub fn black_hole_scale(&self) -> f32 {
        black_hole_pulse(self.elapsed)
    }
}
