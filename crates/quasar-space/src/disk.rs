//! Accretion disk simulation: seeded orbital initialization, per-tick Euler
//! integration with tangential acceleration and damping, and in-place
//! recycling of particles that cross the event-horizon threshold.

use std::f32::consts::TAU;

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::buffer::ParticleBuffer;
use crate::color::hsl_to_rgb;
use crate::error::SceneError;

/// Gravitational constant of the simplified orbital model.
pub const GRAVITY: f32 = 0.8;

/// Planar distance at or below which a particle is recycled to the outer rim.
///
/// Configs whose inner radius dips below this will recycle particles on the
/// very first tick.
pub const RECYCLE_THRESHOLD: f32 = 0.35;

/// Velocity damping per tick at the reference rate; rescaled by the actual
/// delta so long frames do not damp less than short ones.
const DAMPING: f32 = 0.999;
const DAMPING_REFERENCE_HZ: f32 = 60.0;

/// Distances are clamped here before any division. The recycle check keeps
/// particles away from the center, but one large integration step can still
/// land a particle arbitrarily close to it.
const MIN_DISTANCE: f32 = 1e-4;

/// Immutable sizing parameters for the disk population.
#[derive(Clone, Debug)]
pub struct DiskConfig {
    /// Number of disk particles.
    pub particle_count: usize,
    /// Inner annulus radius particles spawn down to.
    pub inner_radius: f32,
    /// Outer annulus radius; recycled particles reappear exactly here.
    pub outer_radius: f32,
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

/// Temperature band of disk material, keyed by current speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemperatureBand {
    /// Fastest material: blue-white.
    Hot,
    /// Intermediate speeds: yellow-white.
    Warm,
    /// Slow outer material: orange-red.
    Cool,
}

impl TemperatureBand {
    /// Classify a speed in world units per second.
    pub fn from_speed(speed: f32) -> Self {
        if speed >= 0.9 {
            TemperatureBand::Hot
        } else if speed >= 0.6 {
            TemperatureBand::Warm
        } else {
            TemperatureBand::Cool
        }
    }

    /// Band color as linear RGB.
    pub fn color(&self) -> [f32; 3] {
        match self {
            TemperatureBand::Hot => hsl_to_rgb(0.6, 0.5, 0.88),
            TemperatureBand::Warm => hsl_to_rgb(0.12, 0.5, 0.82),
            TemperatureBand::Cool => hsl_to_rgb(0.04, 0.85, 0.55),
        }
    }
}

/// Orbiting particle population around the central black hole.
///
/// Positions and velocities live in parallel arrays and are mutated strictly
/// in place; a particle that falls inside [`RECYCLE_THRESHOLD`] has its slot
/// reset to the outer rim rather than being removed.
pub struct AccretionDisk {
    buffer: ParticleBuffer,
    velocities: Vec<Vec3>,
    config: DiskConfig,
    rng: ChaCha8Rng,
    recycled: u64,
}

impl AccretionDisk {
    /// Build and populate a disk. Deterministic for a given seed.
    pub fn new(config: DiskConfig, seed: u64) -> Result<Self, SceneError> {
        if config.particle_count == 0 {
            return Err(SceneError::InvalidParticleCount(config.particle_count));
        }
        if config.inner_radius <= 0.0 || config.inner_radius >= config.outer_radius {
            return Err(SceneError::InvalidRadialRange {
                name: "disk radii",
                inner: config.inner_radius,
                outer: config.outer_radius,
            });
        }

        let mut disk = Self {
            buffer: ParticleBuffer::zeroed(config.particle_count),
            velocities: vec![Vec3::ZERO; config.particle_count],
            config,
            rng: ChaCha8Rng::seed_from_u64(seed),
            recycled: 0,
        };
        for slot in 0..disk.buffer.len() {
            disk.spawn(slot);
        }
        log::debug!(
            "initialized accretion disk: {} particles between r {} and {}",
            disk.buffer.len(),
            disk.config.inner_radius,
            disk.config.outer_radius
        );
        Ok(disk)
    }

    /// Particle buffer, read-only for rendering.
    pub fn buffer(&self) -> &ParticleBuffer {
        &self.buffer
    }

    /// Per-particle velocities, parallel to the buffer.
    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    /// Sizing parameters the disk was built with.
    pub fn config(&self) -> &DiskConfig {
        &self.config
    }

    /// Total number of recycle events since initialization.
    pub fn recycled(&self) -> u64 {
        self.recycled
    }

    /// Advance the disk by one tick.
    ///
    /// With `delta = 0` the disk is left bit-for-bit unchanged. Euler
    /// integration is order-consistent: two steps of `dt` track one step of
    /// `2 * dt` to within O(dt^2).
    pub fn step(&mut self, delta: f32, elapsed: f32) {
        let damping = DAMPING.powf(DAMPING_REFERENCE_HZ * delta);
        let mut recycled_now = 0u32;

        for i in 0..self.buffer.len() {
            let current = self.buffer.positions()[i];
            let planar = (current.x * current.x + current.z * current.z).sqrt();
            if planar <= RECYCLE_THRESHOLD {
                self.respawn(i);
                recycled_now += 1;
                continue;
            }

            let mut position = current + self.velocities[i] * delta;
            let d = (position.x * position.x + position.z * position.z)
                .sqrt()
                .max(MIN_DISTANCE);
            let theta = position.z.atan2(position.x);
            let tangent = Vec3::new(-theta.sin(), 0.0, theta.cos());

            let mut velocity = self.velocities[i] + tangent * (GRAVITY / (d * d)) * delta;
            velocity *= damping;

            // Cosmetic vertical ripple, phase-shifted by orbital distance.
            position.y += (2.0 * elapsed + 3.0 * d).cos() * 0.05 * delta;

            self.buffer.positions_mut()[i] = position;
            self.buffer.colors_mut()[i] = TemperatureBand::from_speed(velocity.length()).color();
            self.velocities[i] = velocity;
        }

        if recycled_now > 0 {
            self.recycled += u64::from(recycled_now);
            log::trace!("recycled {recycled_now} disk particles to the outer rim");
        }
    }

    /// Fill a slot with a fresh particle on a biased-random orbit.
    fn spawn(&mut self, slot: usize) {
        let theta = self.rng.random_range(0.0..TAU);
        let u: f32 = self.rng.random();
        let r = self.config.inner_radius + u * u * (self.config.outer_radius - self.config.inner_radius);
        let y = (self.rng.random::<f32>() - 0.5) * 0.1;
        let size = self.rng.random::<f32>() * 0.08 + 0.02;

        let position = Vec3::new(theta.cos() * r, y, theta.sin() * r);
        let velocity = circular_velocity(theta, r);
        self.buffer
            .write(slot, position, TemperatureBand::from_speed(velocity.length()).color(), size);
        self.velocities[slot] = velocity;
    }

    /// Reset a slot to the outer rim with a fresh circular orbit, keeping its size.
    fn respawn(&mut self, slot: usize) {
        let theta = self.rng.random_range(0.0..TAU);
        let r = self.config.outer_radius;
        let position = Vec3::new(theta.cos() * r, 0.0, theta.sin() * r);
        let velocity = circular_velocity(theta, r);

        self.buffer.positions_mut()[slot] = position;
        self.buffer.colors_mut()[slot] = TemperatureBand::from_speed(velocity.length()).color();
        self.velocities[slot] = velocity;
    }
}

/// Tangential velocity for a stable circular orbit at radius `r`.
fn circular_velocity(theta: f32, r: f32) -> Vec3 {
    let speed = (GRAVITY / r).sqrt();
    Vec3::new(-theta.sin(), 0.0, theta.cos()) * speed
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn default_disk(seed: u64) -> AccretionDisk {
        AccretionDisk::new(DiskConfig::default(), seed).expect("default config must be valid")
    }

    fn planar_radius(position: Vec3) -> f32 {
        (position.x * position.x + position.z * position.z).sqrt()
    }

    #[test]
    fn test_initial_population_fills_annulus() {
        let disk = default_disk(42);
        assert_eq!(disk.buffer().len(), 4000);
        for (i, position) in disk.buffer().positions().iter().enumerate() {
            let r = planar_radius(*position);
            assert!(
                (1.4999..=3.5001).contains(&r),
                "particle {i} spawned at planar radius {r}, outside the annulus"
            );
            assert!(
                position.y.abs() <= 0.05,
                "particle {i} spawned with vertical offset {}",
                position.y
            );
        }
    }

    #[test]
    fn test_initial_velocities_are_circular_and_tangential() {
        let disk = default_disk(42);
        for i in 0..disk.buffer().len() {
            let position = disk.buffer().positions()[i];
            let velocity = disk.velocities()[i];
            let r = planar_radius(position);

            let expected = (GRAVITY / r).sqrt();
            assert!(
                (velocity.length() - expected).abs() < 1e-3,
                "particle {i} speed {} differs from circular speed {expected}",
                velocity.length()
            );

            let radial = Vec3::new(position.x, 0.0, position.z) / r;
            assert!(
                velocity.dot(radial).abs() < 1e-3,
                "particle {i} velocity has a radial component: {}",
                velocity.dot(radial)
            );
        }
    }

    #[test]
    fn test_zero_delta_step_changes_nothing() {
        let mut disk = default_disk(7);
        let positions: Vec<Vec3> = disk.buffer().positions().to_vec();
        let velocities: Vec<Vec3> = disk.velocities().to_vec();
        let colors: Vec<[f32; 3]> = disk.buffer().colors().to_vec();

        disk.step(0.0, 12.5);

        for i in 0..positions.len() {
            assert_eq!(
                disk.buffer().positions()[i],
                positions[i],
                "particle {i} position changed under delta = 0"
            );
            assert_eq!(
                disk.velocities()[i],
                velocities[i],
                "particle {i} velocity changed under delta = 0"
            );
            assert_eq!(disk.buffer().colors()[i], colors[i]);
        }
        assert_eq!(disk.recycled(), 0);
    }

    #[test]
    fn test_two_half_steps_track_one_full_step() {
        let mut halves = default_disk(99);
        let mut full = default_disk(99);
        let dt = 0.01;

        halves.step(dt, 0.0);
        halves.step(dt, dt);
        full.step(2.0 * dt, 0.0);

        for i in 0..full.buffer().len() {
            let position_gap =
                (halves.buffer().positions()[i] - full.buffer().positions()[i]).length();
            let velocity_gap = (halves.velocities()[i] - full.velocities()[i]).length();
            assert!(
                position_gap < 1e-2,
                "particle {i} position diverged by {position_gap} between step schedules"
            );
            assert!(
                velocity_gap < 1e-2,
                "particle {i} velocity diverged by {velocity_gap} between step schedules"
            );
        }
    }

    #[test]
    fn test_particle_inside_threshold_respawns_at_outer_rim() {
        let mut disk = default_disk(5);
        disk.buffer.positions_mut()[0] = Vec3::new(0.2, 0.3, 0.1);

        disk.step(DT, 0.0);

        let position = disk.buffer().positions()[0];
        let r = planar_radius(position);
        assert!(
            (r - 3.5).abs() < 1e-4,
            "recycled particle should reappear at the outer radius, got {r}"
        );
        assert_eq!(position.y, 0.0, "recycled particle should rejoin the disk plane");
        assert_eq!(disk.recycled(), 1);

        let speed = disk.velocities()[0].length();
        let expected = (GRAVITY / 3.5).sqrt();
        assert!(
            (speed - expected).abs() < 1e-4,
            "recycled particle speed {speed} is not circular ({expected})"
        );
    }

    #[test]
    fn test_center_crossing_step_stays_finite() {
        let mut disk = default_disk(13);
        // Aim a particle straight through the center in a single step.
        disk.buffer.positions_mut()[0] = Vec3::new(0.36, 0.0, 0.0);
        disk.velocities[0] = Vec3::new(-36.0, 0.0, 0.0);

        disk.step(0.01, 0.0);

        assert!(
            disk.velocities()[0].is_finite(),
            "clamped distance must keep velocity finite, got {:?}",
            disk.velocities()[0]
        );
        assert!(disk.buffer().positions()[0].is_finite());
    }

    #[test]
    fn test_long_run_stays_finite_and_damped() {
        let mut disk = AccretionDisk::new(
            DiskConfig {
                particle_count: 500,
                ..DiskConfig::default()
            },
            21,
        )
        .unwrap();

        let mut elapsed = 0.0;
        for _ in 0..600 {
            disk.step(DT, elapsed);
            elapsed += DT;
        }

        for (i, velocity) in disk.velocities().iter().enumerate() {
            assert!(velocity.is_finite(), "particle {i} velocity went non-finite");
            assert!(
                velocity.length() < 20.0,
                "particle {i} reached speed {}, damping failed to bound growth",
                velocity.length()
            );
        }
        for (i, position) in disk.buffer().positions().iter().enumerate() {
            assert!(position.is_finite(), "particle {i} position went non-finite");
        }
    }

    #[test]
    fn test_same_seed_same_trajectories() {
        let mut a = default_disk(1234);
        let mut b = default_disk(1234);
        for tick in 0..30 {
            let elapsed = tick as f32 * DT;
            a.step(DT, elapsed);
            b.step(DT, elapsed);
        }
        for i in 0..a.buffer().len() {
            assert_eq!(
                a.buffer().positions()[i],
                b.buffer().positions()[i],
                "particle {i} diverged between identical seeds"
            );
        }
    }

    #[test]
    fn test_temperature_bands_order_by_speed() {
        assert_eq!(TemperatureBand::from_speed(1.5), TemperatureBand::Hot);
        assert_eq!(TemperatureBand::from_speed(0.7), TemperatureBand::Warm);
        assert_eq!(TemperatureBand::from_speed(0.2), TemperatureBand::Cool);

        let hot = TemperatureBand::Hot.color();
        let cool = TemperatureBand::Cool.color();
        assert!(
            hot[2] > cool[2],
            "hot material should be bluer than cool: {} vs {}",
            hot[2],
            cool[2]
        );
        assert!(
            cool[0] > cool[2],
            "cool material should be red-dominant, got {cool:?}"
        );
    }

    #[test]
    fn test_invalid_configs_rejected() {
        let zero_count = DiskConfig {
            particle_count: 0,
            ..DiskConfig::default()
        };
        assert!(matches!(
            AccretionDisk::new(zero_count, 0),
            Err(SceneError::InvalidParticleCount(0))
        ));

        let inverted = DiskConfig {
            inner_radius: 3.5,
            outer_radius: 1.5,
            ..DiskConfig::default()
        };
        assert!(matches!(
            AccretionDisk::new(inverted, 0),
            Err(SceneError::InvalidRadialRange { .. })
        ));

        let zero_inner = DiskConfig {
            inner_radius: 0.0,
            ..DiskConfig::default()
        };
        assert!(matches!(
            AccretionDisk::new(zero_inner, 0),
            Err(SceneError::InvalidRadialRange { .. })
        ));
    }
}
