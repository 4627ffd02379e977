//! Procedural cosmic scene kernel: spiral galaxy, accretion disk, star field,
//! and planet surface generation with deterministic seeded output.
//!
//! Generation is pure and CPU-side; every system writes into a
//! [`ParticleBuffer`] it owns and mutates in place once per tick. The
//! rendering layer consumes read-only views or [`PointInstance`] snapshots.

pub mod buffer;
pub mod color;
pub mod disk;
mod error;
pub mod galaxy;
pub mod planet;
pub mod scene;
pub mod starfield;

pub use buffer::{ParticleBuffer, PointInstance};
pub use disk::{AccretionDisk, DiskConfig, GRAVITY, RECYCLE_THRESHOLD, TemperatureBand};
pub use error::SceneError;
pub use galaxy::{
    GALAXY_SPIN_RATE, GalaxyConfig, GalaxyGenerator, StructureSpec, black_hole_pulse, galaxy_step,
};
pub use planet::{
    Planet, PlanetKind, PlanetSpec, SurfaceMap, bake_cloud_map, bake_displacement_map,
    bake_water_map,
};
pub use scene::{Scene, SceneSpec};
pub use starfield::{StarField, StarfieldConfig};
