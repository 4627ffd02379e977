//! Shared particle storage: parallel position/color/size arrays plus the
//! packed per-point instance format handed to the renderer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Packed per-particle data for GPU point-sprite instancing.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct PointInstance {
    /// World-space position.
    pub position: [f32; 3],
    /// Point size in world units.
    pub size: f32,
    /// Linear RGB color.
    pub color: [f32; 3],
    /// Padding for 16-byte alignment.
    pub _padding: f32,
}

/// CPU-side particle storage as parallel arrays.
///
/// A buffer is allocated once with a fixed length and mutated in place by the
/// system that generated it; slots are recycled, never inserted or removed.
/// The rendering layer only ever sees read-only views or packed snapshots via
/// [`ParticleBuffer::instances`].
#[derive(Clone, Debug)]
pub struct ParticleBuffer {
    positions: Vec<Vec3>,
    colors: Vec<[f32; 3]>,
    sizes: Vec<f32>,
}

impl ParticleBuffer {
    /// Allocate a zero-filled buffer of `len` particles.
    pub(crate) fn zeroed(len: usize) -> Self {
        Self {
            positions: vec![Vec3::ZERO; len],
            colors: vec![[0.0; 3]; len],
            sizes: vec![0.0; len],
        }
    }

    /// Number of particles in the buffer, fixed at creation.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the buffer holds no particles.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Read-only view of particle positions.
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Read-only view of particle colors.
    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    /// Read-only view of particle sizes.
    pub fn sizes(&self) -> &[f32] {
        &self.sizes
    }

    pub(crate) fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    pub(crate) fn colors_mut(&mut self) -> &mut [[f32; 3]] {
        &mut self.colors
    }

    /// Overwrite one slot in place.
    pub(crate) fn write(&mut self, index: usize, position: Vec3, color: [f32; 3], size: f32) {
        self.positions[index] = position;
        self.colors[index] = color;
        self.sizes[index] = size;
    }

    /// Snapshot the buffer into packed instances for upload.
    pub fn instances(&self) -> Vec<PointInstance> {
        let mut out = Vec::with_capacity(self.len());
        self.write_instances(&mut out);
        out
    }

    /// Write packed instances into `out`, reusing its allocation.
    ///
    /// This is the handoff point between the simulation (single writer) and
    /// the renderer: the snapshot is taken after a tick fully completes, so a
    /// renderer on another thread never observes a partially stepped buffer.
    pub fn write_instances(&self, out: &mut Vec<PointInstance>) {
        out.clear();
        out.reserve(self.len());
        for i in 0..self.len() {
            out.push(PointInstance {
                position: self.positions[i].to_array(),
                size: self.sizes[i],
                color: self.colors[i],
                _padding: 0.0,
            });
        }
    }
}

/// Rotate every position in place about the +Y axis.
pub(crate) fn rotate_about_y(positions: &mut [Vec3], angle: f32) {
    let rotation = glam::Mat3::from_rotation_y(angle);
    for position in positions.iter_mut() {
        *position = rotation * *position;
    }
}

/// Rotate every position in place about the +X axis.
pub(crate) fn rotate_about_x(positions: &mut [Vec3], angle: f32) {
    let rotation = glam::Mat3::from_rotation_x(angle);
    for position in positions.iter_mut() {
        *position = rotation * *position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_instance_layout() {
        assert_eq!(std::mem::size_of::<PointInstance>(), 32);
        assert_eq!(
            std::mem::size_of::<PointInstance>() % 16,
            0,
            "instance stride must be a multiple of 16 bytes"
        );
    }

    #[test]
    fn test_instances_pack_parallel_arrays() {
        let mut buffer = ParticleBuffer::zeroed(3);
        buffer.write(0, Vec3::new(1.0, 2.0, 3.0), [0.1, 0.2, 0.3], 0.5);
        buffer.write(2, Vec3::new(-1.0, 0.0, 4.0), [1.0, 1.0, 1.0], 0.25);

        let instances = buffer.instances();
        assert_eq!(instances.len(), 3);
        assert_eq!(instances[0].position, [1.0, 2.0, 3.0]);
        assert_eq!(instances[0].size, 0.5);
        assert_eq!(instances[2].color, [1.0, 1.0, 1.0]);
        assert_eq!(instances[1].position, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_instances_cast_to_bytes() {
        let buffer = ParticleBuffer::zeroed(4);
        let instances = buffer.instances();
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), 4 * 32);
    }

    #[test]
    fn test_write_instances_reuses_allocation() {
        let buffer = ParticleBuffer::zeroed(8);
        let mut out = Vec::new();
        buffer.write_instances(&mut out);
        assert_eq!(out.len(), 8);

        let capacity = out.capacity();
        buffer.write_instances(&mut out);
        assert_eq!(out.capacity(), capacity, "second snapshot should not reallocate");
    }

    #[test]
    fn test_rotation_preserves_distance_from_axis() {
        let mut positions = vec![Vec3::new(3.0, 1.0, 4.0), Vec3::new(-2.0, 5.0, 0.5)];
        let radii: Vec<f32> = positions
            .iter()
            .map(|p| (p.x * p.x + p.z * p.z).sqrt())
            .collect();

        rotate_about_y(&mut positions, 1.3);

        for (i, position) in positions.iter().enumerate() {
            let r = (position.x * position.x + position.z * position.z).sqrt();
            assert!(
                (r - radii[i]).abs() < 1e-5,
                "particle {i} changed planar radius from {} to {r}",
                radii[i]
            );
            assert_eq!(position.y, if i == 0 { 1.0 } else { 5.0 });
        }
    }

    #[test]
    fn test_full_turn_returns_to_start() {
        let start = Vec3::new(1.0, 2.0, 3.0);
        let mut positions = vec![start];
        rotate_about_x(&mut positions, std::f32::consts::TAU);
        assert!(
            (positions[0] - start).length() < 1e-5,
            "full rotation should be the identity, got {:?}",
            positions[0]
        );
    }
}
