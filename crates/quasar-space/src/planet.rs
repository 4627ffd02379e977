//! Procedural planet surfaces: seeded displacement, cloud, and water maps
//! built from radial-gradient splats, plus the per-frame spin state.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::SceneError;

/// Gas-band displacement levels, cycled top to bottom.
const GAS_BAND_LEVELS: [u8; 4] = [62, 85, 100, 115];

/// Base color of the water overlay, #1a67bd.
const WATER_BASE: [u8; 4] = [26, 103, 189, 255];

/// Surface archetype selecting both base color and displacement style.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanetKind {
    /// Continents and mountain ridges.
    Earth,
    /// Banded gas giant with storm swirls.
    Gas,
    /// Fine speckled regolith.
    Desert,
    /// Fine speckled ice crust.
    Ice,
    /// Fine speckled volcanic crust.
    Lava,
}

impl PlanetKind {
    /// Base albedo as linear RGB.
    pub fn base_color(&self) -> [f32; 3] {
        match self {
            PlanetKind::Earth => [0.133, 0.651, 0.427],  // #22a66d
            PlanetKind::Gas => [0.290, 0.565, 0.886],    // #4a90e2
            PlanetKind::Desert => [0.886, 0.655, 0.290], // #e2a74a
            PlanetKind::Ice => [0.643, 0.847, 0.906],    // #a4d8e7
            PlanetKind::Lava => [0.886, 0.290, 0.290],   // #e24a4a
        }
    }
}

impl std::str::FromStr for PlanetKind {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "earth" => Ok(PlanetKind::Earth),
            "gas" => Ok(PlanetKind::Gas),
            "desert" => Ok(PlanetKind::Desert),
            "ice" => Ok(PlanetKind::Ice),
            "lava" => Ok(PlanetKind::Lava),
            other => Err(SceneError::UnknownPlanetKind(other.to_string())),
        }
    }
}

/// Description of one planet in the scene.
#[derive(Clone, Debug)]
pub struct PlanetSpec {
    /// Surface archetype.
    pub kind: PlanetKind,
    /// Display label used by the presentation layer.
    pub name: String,
    /// Fixed position in world space.
    pub position: Vec3,
    /// Body radius in world units.
    pub size: f32,
    /// Spin rate in radians per second.
    pub rotation_speed: f32,
    /// Whether a cloud shell orbits the body.
    pub clouds: bool,
    /// Whether an atmosphere halo is drawn.
    pub atmosphere: bool,
    /// Whether the water overlay is composited onto the surface.
    pub water: bool,
}

/// A planet's spin state. Positions are fixed; only rotation accumulates.
#[derive(Clone, Debug)]
pub struct Planet {
    spec: PlanetSpec,
    rotation: f32,
    cloud_rotation: f32,
}

impl Planet {
    /// Wrap a spec with zeroed spin state.
    pub fn new(spec: PlanetSpec) -> Self {
        Self {
            spec,
            rotation: 0.0,
            cloud_rotation: 0.0,
        }
    }

    /// The immutable spec this planet was built from.
    pub fn spec(&self) -> &PlanetSpec {
        &self.spec
    }

    /// Accumulated body rotation in radians.
    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    /// Accumulated cloud-shell rotation; clouds lag at 0.7x the body rate.
    pub fn cloud_rotation(&self) -> f32 {
        self.cloud_rotation
    }

    /// Advance the spin state by one tick.
    pub fn update(&mut self, delta: f32) {
        self.rotation += self.spec.rotation_speed * delta;
        self.cloud_rotation += self.spec.rotation_speed * 0.7 * delta;
    }
}

/// Square single-channel intensity map, row-major.
#[derive(Clone, Debug)]
pub struct SurfaceMap {
    size: u32,
    data: Vec<u8>,
}

impl SurfaceMap {
    fn new(size: u32) -> Self {
        Self {
            size,
            data: vec![0; (size * size) as usize],
        }
    }

    /// Edge length in pixels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Raw intensity data, `size * size` bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn add(&mut self, x: u32, y: u32, value: u8) {
        let idx = (y * self.size + x) as usize;
        self.data[idx] = self.data[idx].saturating_add(value);
    }

    fn set(&mut self, x: u32, y: u32, value: u8) {
        self.data[(y * self.size + x) as usize] = value;
    }
}

/// Bake the displacement map for a planet kind. Deterministic for a given seed.
///
/// Feature radii are expressed against a 512 pixel reference canvas and scale
/// with `size`.
pub fn bake_displacement_map(kind: PlanetKind, size: u32, seed: u64) -> SurfaceMap {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut map = SurfaceMap::new(size);
    let scale = size as f32 / 512.0;

    match kind {
        PlanetKind::Earth => {
            for _ in 0..100 {
                let cx = rng.random::<f32>() * size as f32;
                let cy = rng.random::<f32>() * size as f32;
                let radius = (rng.random::<f32>() * 50.0 + 20.0) * scale;
                splat_blob(&mut map, cx, cy, radius, 0.7);
            }
            for _ in 0..15 {
                let cx = rng.random::<f32>() * size as f32;
                let cy = rng.random::<f32>() * size as f32;
                let width = (rng.random::<f32>() * 100.0 + 50.0) * scale;
                let height = (rng.random::<f32>() * 20.0 + 10.0) * scale;
                let angle = rng.random::<f32>() * std::f32::consts::PI;
                splat_ridge(&mut map, cx, cy, width, height, angle, 0.5);
            }
        }
        PlanetKind::Gas => {
            let band_height = size.div_ceil(8);
            for y in 0..size {
                let band = (y / band_height) as usize;
                let level = GAS_BAND_LEVELS[band % GAS_BAND_LEVELS.len()];
                for x in 0..size {
                    map.set(x, y, level);
                }
            }
            for _ in 0..15 {
                let cx = rng.random::<f32>() * size as f32;
                let cy = rng.random::<f32>() * size as f32;
                let radius = (rng.random::<f32>() * 40.0 + 20.0) * scale;
                let peak = rng.random::<f32>() * 0.2;
                splat_blob(&mut map, cx, cy, radius, peak);
            }
        }
        PlanetKind::Desert | PlanetKind::Ice | PlanetKind::Lava => {
            for _ in 0..1000 {
                let cx = rng.random::<f32>() * size as f32;
                let cy = rng.random::<f32>() * size as f32;
                let radius = (rng.random::<f32>() * 5.0 + 1.0) * scale;
                let peak = rng.random::<f32>() * 0.5;
                splat_blob(&mut map, cx, cy, radius, peak);
            }
        }
    }
    map
}

/// Bake the cloud coverage map: sparse soft blobs on a transparent base.
pub fn bake_cloud_map(size: u32, seed: u64) -> SurfaceMap {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut map = SurfaceMap::new(size);
    let scale = size as f32 / 512.0;

    for _ in 0..50 {
        let cx = rng.random::<f32>() * size as f32;
        let cy = rng.random::<f32>() * size as f32;
        let radius = (rng.random::<f32>() * 80.0 + 20.0) * scale;
        splat_blob(&mut map, cx, cy, radius, 0.8);
    }
    map
}

/// Bake the RGBA water overlay: a deep-blue base with faint white ripples.
pub fn bake_water_map(size: u32, seed: u64) -> Vec<[u8; 4]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pixels = vec![WATER_BASE; (size * size) as usize];
    let scale = size as f32 / 512.0;

    for _ in 0..100 {
        let cx = rng.random::<f32>() * size as f32;
        let cy = rng.random::<f32>() * size as f32;
        let radius = (rng.random::<f32>() * 5.0 + 1.0) * scale;
        let alpha = rng.random::<f32>();

        let x0 = ((cx - radius).floor() as i32).max(0);
        let x1 = ((cx + radius).ceil() as i32).min(size as i32 - 1);
        let y0 = ((cy - radius).floor() as i32).max(0);
        let y1 = ((cy + radius).ceil() as i32).min(size as i32 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= radius * radius {
                    let pixel = &mut pixels[(y as u32 * size + x as u32) as usize];
                    for channel in &mut pixel[..3] {
                        let lift = (255.0 - *channel as f32) * alpha * 0.1;
                        *channel = (*channel as f32 + lift) as u8;
                    }
                }
            }
        }
    }
    pixels
}

/// Additively splat a radial-gradient blob with linear falloff to zero.
fn splat_blob(map: &mut SurfaceMap, cx: f32, cy: f32, radius: f32, peak: f32) {
    let size = map.size as i32;
    let x0 = ((cx - radius).floor() as i32).max(0);
    let x1 = ((cx + radius).ceil() as i32).min(size - 1);
    let y0 = ((cy - radius).floor() as i32).max(0);
    let y1 = ((cy + radius).ceil() as i32).min(size - 1);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist <= radius {
                let value = peak * (1.0 - dist / radius) * 255.0;
                map.add(x as u32, y as u32, value as u8);
            }
        }
    }
}

/// Additively splat a rotated rectangle of constant intensity.
fn splat_ridge(map: &mut SurfaceMap, cx: f32, cy: f32, width: f32, height: f32, angle: f32, intensity: f32) {
    let size = map.size as i32;
    let (sin, cos) = angle.sin_cos();
    let extent_x = (width * cos.abs() + height * sin.abs()) * 0.5;
    let extent_y = (width * sin.abs() + height * cos.abs()) * 0.5;

    let x0 = ((cx - extent_x).floor() as i32).max(0);
    let x1 = ((cx + extent_x).ceil() as i32).min(size - 1);
    let y0 = ((cy - extent_y).floor() as i32).max(0);
    let y1 = ((cy + extent_y).ceil() as i32).min(size - 1);
    let value = (intensity * 255.0) as u8;

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            // Inverse-rotate into the rectangle's frame.
            let local_x = dx * cos + dy * sin;
            let local_y = -dx * sin + dy * cos;
            if local_x.abs() <= width * 0.5 && local_y.abs() <= height * 0.5 {
                map.add(x as u32, y as u32, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_dimensions_match_requested_size() {
        let map = bake_displacement_map(PlanetKind::Earth, 64, 1);
        assert_eq!(map.size(), 64);
        assert_eq!(map.data().len(), 64 * 64);
    }

    #[test]
    fn test_same_seed_same_map() {
        let a = bake_displacement_map(PlanetKind::Desert, 64, 42);
        let b = bake_displacement_map(PlanetKind::Desert, 64, 42);
        assert_eq!(a.data(), b.data());

        let c = bake_displacement_map(PlanetKind::Desert, 64, 43);
        let differing = a
            .data()
            .iter()
            .zip(c.data())
            .filter(|(x, y)| x != y)
            .count();
        assert!(
            differing > 100,
            "different seeds should bake different maps, only {differing} pixels differ"
        );
    }

    #[test]
    fn test_earth_map_has_land_and_sea() {
        let map = bake_displacement_map(PlanetKind::Earth, 128, 7);
        let lit = map.data().iter().filter(|&&v| v > 0).count();
        let total = map.data().len();
        assert!(
            lit > total / 20 && lit < total * 49 / 50,
            "earth map should be a mix of raised and flat pixels, got {lit}/{total} raised"
        );
    }

    #[test]
    fn test_gas_map_bands_rise_in_level() {
        let map = bake_displacement_map(PlanetKind::Gas, 64, 3);
        let band_mean = |band: u32| -> f32 {
            let mut sum = 0u32;
            for y in band * 8..(band + 1) * 8 {
                for x in 0..64 {
                    sum += map.data()[(y * 64 + x) as usize] as u32;
                }
            }
            sum as f32 / (8.0 * 64.0)
        };
        let low = band_mean(0);
        let high = band_mean(3);
        assert!(
            high > low + 20.0,
            "band 3 (level {}) should be brighter than band 0 (level {}), got {high} vs {low}",
            GAS_BAND_LEVELS[3],
            GAS_BAND_LEVELS[0]
        );
    }

    #[test]
    fn test_cloud_map_is_sparse() {
        let map = bake_cloud_map(128, 11);
        let clear = map.data().iter().filter(|&&v| v == 0).count();
        let dense = map.data().iter().filter(|&&v| v > 100).count();
        assert!(clear > 0, "cloud map should leave clear sky somewhere");
        assert!(dense > 0, "cloud map should have dense cores");
    }

    #[test]
    fn test_water_map_keeps_opaque_blue_base() {
        let size = 64u32;
        let pixels = bake_water_map(size, 9);
        assert_eq!(pixels.len(), (size * size) as usize);

        let mut touched = 0usize;
        for (i, pixel) in pixels.iter().enumerate() {
            assert_eq!(pixel[3], 255, "pixel {i} lost opacity");
            assert!(
                pixel[0] >= WATER_BASE[0] && pixel[1] >= WATER_BASE[1] && pixel[2] >= WATER_BASE[2],
                "ripples may only lighten the base color, pixel {i} = {pixel:?}"
            );
            if pixel[..3] != WATER_BASE[..3] {
                touched += 1;
            }
        }
        assert!(touched > 0, "expected at least one ripple to land");
        assert!(
            touched < pixels.len() / 2,
            "ripples should be sparse, {touched} pixels touched"
        );
    }

    #[test]
    fn test_planet_spin_accumulates_with_cloud_lag() {
        let spec = PlanetSpec {
            kind: PlanetKind::Gas,
            name: "Projects".to_string(),
            position: Vec3::new(-10.0, 0.0, -5.0),
            size: 2.0,
            rotation_speed: 0.02,
            clouds: true,
            atmosphere: true,
            water: false,
        };
        let mut planet = Planet::new(spec);

        planet.update(1.0);
        planet.update(1.0);

        assert!((planet.rotation() - 0.04).abs() < 1e-6);
        assert!(
            (planet.cloud_rotation() - 0.028).abs() < 1e-6,
            "clouds should turn at 0.7x the body rate, got {}",
            planet.cloud_rotation()
        );
    }

    #[test]
    fn test_kind_parses_from_config_strings() {
        assert_eq!("earth".parse::<PlanetKind>().unwrap(), PlanetKind::Earth);
        assert_eq!("Ice".parse::<PlanetKind>().unwrap(), PlanetKind::Ice);
        assert!(matches!(
            "asteroid".parse::<PlanetKind>(),
            Err(SceneError::UnknownPlanetKind(s)) if s == "asteroid"
        ));
    }

    #[test]
    fn test_base_colors_are_distinct() {
        let kinds = [
            PlanetKind::Earth,
            PlanetKind::Gas,
            PlanetKind::Desert,
            PlanetKind::Ice,
            PlanetKind::Lava,
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(
                    a.base_color(),
                    b.base_color(),
                    "{a:?} and {b:?} share a base color"
                );
            }
        }
    }
}
