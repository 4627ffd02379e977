//! Dispersed star field generation: uniform spherical-shell sampling flattened
//! toward the galactic plane, weighted color buckets, and the slow rotation
//! and twinkle step.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::buffer::{ParticleBuffer, rotate_about_x, rotate_about_y};
use crate::color::hsl_to_rgb;
use crate::error::SceneError;

/// Whole-field rotation rates about the X and Y axes, radians per second.
const FIELD_RATE_X: f32 = -0.003;
const FIELD_RATE_Y: f32 = -0.005;

/// Planar distance beyond which per-star differential drift applies.
const DRIFT_MIN_DISTANCE: f32 = 2.0;

/// Baseline global point size the twinkle oscillates around.
const BASE_POINT_SIZE: f32 = 0.05;

/// Immutable parameters for the star distribution.
#[derive(Clone, Debug)]
pub struct StarfieldConfig {
    /// Number of stars.
    pub star_count: usize,
    /// Inner radius of the spherical shell stars sample from.
    pub min_radius: f32,
    /// Outer radius of the shell.
    pub max_radius: f32,
    /// Vertical squash factor approximating the galactic plane.
    pub flattening: f32,
    /// Enable per-star differential drift about the vertical axis.
    pub drift: bool,
    /// Drift scale; each star turns at `drift_rate / sqrt(planar distance)`.
    pub drift_rate: f32,
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

/// A generated star field and its twinkle state.
///
/// The buffer is fixed after generation apart from the rotation/drift applied
/// by [`StarField::step`]; twinkle is a single global size multiplier rather
/// than per-star mutation.
pub struct StarField {
    buffer: ParticleBuffer,
    config: StarfieldConfig,
    point_size: f32,
}

impl StarField {
    /// Generate a star field. Deterministic for a given seed.
    pub fn generate(config: StarfieldConfig, seed: u64) -> Result<Self, SceneError> {
        if config.star_count == 0 {
            return Err(SceneError::InvalidParticleCount(config.star_count));
        }
        if config.min_radius <= 0.0 || config.min_radius >= config.max_radius {
            return Err(SceneError::InvalidRadialRange {
                name: "shell radii",
                inner: config.min_radius,
                outer: config.max_radius,
            });
        }
        if config.flattening <= 0.0 {
            return Err(SceneError::NonPositiveParameter {
                name: "flattening",
                value: config.flattening,
            });
        }
        if config.drift_rate < 0.0 {
            return Err(SceneError::NegativeParameter {
                name: "drift rate",
                value: config.drift_rate,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut buffer = ParticleBuffer::zeroed(config.star_count);

        for i in 0..config.star_count {
            let radius = rng.random_range(config.min_radius..config.max_radius);
            let theta = rng.random_range(0.0..TAU);
            // acos of a uniform draw in [-1, 1] gives uniform density on the sphere.
            let phi = (2.0 * rng.random::<f32>() - 1.0).acos();

            let position = Vec3::new(
                radius * phi.sin() * theta.cos(),
                radius * phi.cos() * config.flattening,
                radius * phi.sin() * theta.sin(),
            );
            let color = star_color(&mut rng);
            let size = rng.random::<f32>() * 0.15 + 0.03;
            buffer.write(i, position, color, size);
        }

        log::debug!(
            "generated star field: {} stars in shell r {}..{}",
            config.star_count,
            config.min_radius,
            config.max_radius
        );
        Ok(Self {
            buffer,
            config,
            point_size: BASE_POINT_SIZE,
        })
    }

    /// Star buffer, read-only for rendering.
    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    /// Parameters the field was generated with.
    pub fn config(&self) -> &StarfieldConfig {
        &self.config
    }

    /// Current global point-size multiplier driven by the twinkle oscillation.
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    /// Advance the field by one tick.
    ///
    /// Applies the whole-field rotation about both axes, then an inverse
    /// square-root angular drift to stars outside [`DRIFT_MIN_DISTANCE`], then
    /// updates the twinkle size.
    pub fn step(&mut self, delta: f32, elapsed: f32) {
        rotate_about_x(self.buffer.positions_mut(), FIELD_RATE_X * delta);
        rotate_about_y(self.buffer.positions_mut(), FIELD_RATE_Y * delta);

        if self.config.drift {
            let rate = self.config.drift_rate;
            for position in self.buffer.positions_mut() {
                let planar = (position.x * position.x + position.z * position.z).sqrt();
                if planar > DRIFT_MIN_DISTANCE {
                    let rotation = glam::Mat3::from_rotation_y(rate / planar.sqrt() * delta);
                    *position = rotation * *position;
                }
            }
        }

        self.point_size = (BASE_POINT_SIZE + (elapsed * 0.5).sin() * 0.01).max(BASE_POINT_SIZE);
    }
}

/// Weighted color buckets: 70% blue-white, 20% yellow-white, 10% red.
fn star_color(rng: &mut ChaCha8Rng) -> [f32; 3] {
    let roll: f32 = rng.random();
    if roll < 0.7 {
        hsl_to_rgb(
            0.6,
            rng.random::<f32>() * 0.2,
            0.9 + rng.random::<f32>() * 0.1,
        )
    } else if roll < 0.9 {
        hsl_to_rgb(0.1, 0.3, 0.9)
    } else {
        hsl_to_rgb(0.05, 0.9, 0.9)
    }
}
