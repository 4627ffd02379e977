//! Spiral galaxy generation: branch-and-spin dust distribution, optional
//! decorative structure clusters, and the per-frame rigid rotation step.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::buffer::{ParticleBuffer, rotate_about_y};
use crate::color::{hsl_to_rgb, lerp_rgb, rgb_to_hsl};
use crate::error::SceneError;

/// Rotation rate of the whole galaxy about the +Y axis, radians per second.
pub const GALAXY_SPIN_RATE: f32 = 0.03;

/// Immutable parameters for the dust distribution.
///
/// The config fully determines the distribution; the per-particle draws come
/// from the seed passed to [`GalaxyGenerator::new`].
#[derive(Clone, Debug)]
pub struct GalaxyConfig {
    /// Total particle budget, structures included.
    pub particle_count: usize,
    /// Number of spiral arms.
    pub branches: u32,
    /// Outer radius of the dust disk in world units.
    pub radius: f32,
    /// Angular offset per unit radius, winding the arms.
    pub spin: f32,
    /// Positional noise amplitude as a fraction of each particle's radius.
    pub randomness: f32,
    /// Exponent shaping the noise distribution; higher concentrates dust on the arms.
    pub randomness_power: f32,
    /// Color at the galactic center.
    pub inner_color: [f32; 3],
    /// Color at the outer rim.
    pub outer_color: [f32; 3],
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
            inner_color: [0.608, 0.302, 0.792], // #9b4dca
            outer_color: [0.129, 0.588, 0.953], // #2196f3
        }
    }
}

/// A decorative particle cluster embedded in the spiral.
///
/// Each structure winds a small rising spiral around its own center and is
/// carved out of the leading slots of the galaxy particle budget.
#[derive(Clone, Debug)]
pub struct StructureSpec {
    /// Center offset in galaxy-local coordinates.
    pub center: Vec3,
    /// Radius the spiral grows to.
    pub radius: f32,
    /// Slots this structure claims from the budget.
    pub particle_count: usize,
}

/// Deterministic spiral galaxy generator.
pub struct GalaxyGenerator {
    config: GalaxyConfig,
    structures: Vec<StructureSpec>,
    seed: u64,
}

impl GalaxyGenerator {
    /// Create a generator for the given config, structures, and seed.
    pub fn new(config: GalaxyConfig, structures: Vec<StructureSpec>, seed: u64) -> Self {
        Self {
            config,
            structures,
            seed,
        }
    }

    /// Generate the particle buffer. Deterministic for a given seed.
    ///
    /// Structure particles occupy the leading slots, dust fills the rest; the
    /// buffer length always equals `config.particle_count`.
    pub fn generate(&self) -> Result<ParticleBuffer, SceneError> {
        self.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut buffer = ParticleBuffer::zeroed(self.config.particle_count);

        let mut slot = 0;
        for structure in &self.structures {
            for i in 0..structure.particle_count {
                self.place_structure_particle(&mut buffer, slot, structure, i, &mut rng);
                slot += 1;
            }
        }

        let structure_count = slot;
        for i in slot..self.config.particle_count {
            self.place_dust_particle(&mut buffer, i, &mut rng);
        }

        log::debug!(
            "generated galaxy: {} dust + {} structure particles across {} branches",
            self.config.particle_count - structure_count,
            structure_count,
            self.config.branches
        );
        Ok(buffer)
    }

    fn validate(&self) -> Result<(), SceneError> {
        let config = &self.config;
        if config.particle_count == 0 {
            return Err(SceneError::InvalidParticleCount(config.particle_count));
        }
        if config.branches == 0 {
            return Err(SceneError::InvalidBranchCount);
        }
        if config.radius <= 0.0 {
            return Err(SceneError::NonPositiveParameter {
                name: "galaxy radius",
                value: config.radius,
            });
        }
        if config.randomness < 0.0 {
            return Err(SceneError::NegativeParameter {
                name: "randomness",
                value: config.randomness,
            });
        }
        if config.randomness_power < 0.0 {
            return Err(SceneError::NegativeParameter {
                name: "randomness power",
                value: config.randomness_power,
            });
        }
        for structure in &self.structures {
            if structure.radius <= 0.0 {
                return Err(SceneError::NonPositiveParameter {
                    name: "structure radius",
                    value: structure.radius,
                });
            }
        }
        let requested: usize = self.structures.iter().map(|s| s.particle_count).sum();
        if requested > config.particle_count {
            return Err(SceneError::StructureBudgetExceeded {
                requested,
                budget: config.particle_count,
            });
        }
        Ok(())
    }

    /// Place one particle of a structure's rising spiral.
    fn place_structure_particle(
        &self,
        buffer: &mut ParticleBuffer,
        slot: usize,
        structure: &StructureSpec,
        index: usize,
        rng: &mut ChaCha8Rng,
    ) {
        let t = index as f32 / structure.particle_count as f32;
        let angle = t * 8.0 * std::f32::consts::PI;
        let r = t * structure.radius;
        let height = (2.0 * angle).sin() * r * 0.2;
        let position = structure.center + Vec3::new(angle.cos() * r, height, angle.sin() * r);

        // Hue stays in a narrow blue-purple band, swaying with the spiral angle.
        let hue = 0.72 + angle.sin() * 0.05;
        let color = hsl_to_rgb(hue, 0.8, 0.6);

        let size = (1.0 - 0.5 * t) * (rng.random::<f32>() * 0.2 + 0.05);
        buffer.write(slot, position, color, size);
    }

    /// Place one dust particle on a spiral arm.
    fn place_dust_particle(&self, buffer: &mut ParticleBuffer, slot: usize, rng: &mut ChaCha8Rng) {
        let config = &self.config;

        // 80% of dust is squeezed into the inner 80% of the disk.
        let bias = if rng.random::<f32>() < 0.8 { 0.8 } else { 1.0 };
        let r = rng.random::<f32>() * config.radius * bias;

        let branch = (slot as u32 % config.branches) as f32 / config.branches as f32;
        let angle = branch * std::f32::consts::TAU + r * config.spin;

        let amplitude = config.randomness * r;
        let noise_x = axis_noise(rng, config.randomness_power, amplitude);
        let noise_y = axis_noise(rng, config.randomness_power, amplitude) * 0.3;
        let noise_z = axis_noise(rng, config.randomness_power, amplitude);

        let position = Vec3::new(
            angle.cos() * r + noise_x,
            noise_y,
            angle.sin() * r + noise_z,
        );

        let ratio = r / config.radius;
        let color = jitter_color(
            lerp_rgb(config.inner_color, config.outer_color, ratio),
            rng,
        );
        let size = (1.0 - 0.5 * ratio) * (rng.random::<f32>() * 0.2 + 0.05);
        buffer.write(slot, position, color, size);
    }
}

/// One axis of positional noise: power-law magnitude with a random sign.
fn axis_noise(rng: &mut ChaCha8Rng, power: f32, amplitude: f32) -> f32 {
    let magnitude = rng.random::<f32>().powf(power) * amplitude;
    if rng.random::<f32>() < 0.5 {
        magnitude
    } else {
        -magnitude
    }
}

/// Jitter saturation and lightness by up to 0.1 each, leaving hue alone.
fn jitter_color(rgb: [f32; 3], rng: &mut ChaCha8Rng) -> [f32; 3] {
    let (h, s, l) = rgb_to_hsl(rgb);
    let s = (s + rng.random::<f32>() * 0.2 - 0.1).clamp(0.0, 1.0);
    let l = (l + rng.random::<f32>() * 0.2 - 0.1).clamp(0.0, 1.0);
    hsl_to_rgb(h, s, l)
}

/// Advance the galaxy by one tick: rigid rotation about the +Y axis.
pub fn galaxy_step(buffer: &mut ParticleBuffer, delta: f32) {
    rotate_about_y(buffer.positions_mut(), GALAXY_SPIN_RATE * delta);
}

/// Scale factor for the black-hole centerpiece, pulsing slowly around 1.
pub fn black_hole_pulse(elapsed: f32) -> f32 {
    1.0 + (elapsed * 0.5).sin() * 0.05
}
