//! Top-down preview rendering of particle snapshots.
//!
//! Splats [`PointInstance`] data onto a flat RGBA canvas with additive
//! blending, standing in for the GPU point-sprite pass. Useful for eyeballing
//! a generated scene without opening a window.

use std::path::Path;

use quasar_space::PointInstance;

/// A square RGBA f32 canvas looking down the Y axis onto the galactic plane.
pub struct ScenePreview {
    /// Width/height of the canvas in pixels.
    pub size: u32,
    /// World-space half extent: the canvas spans `[-half_extent, half_extent]`
    /// along both the X and Z axes.
    pub half_extent: f32,
    /// `size * size` pixels stored as RGBA f32.
    pub pixels: Vec<[f32; 4]>,
}

impl ScenePreview {
    /// Create a black, opaque canvas.
    pub fn new(size: u32, half_extent: f32) -> Self {
        let pixel_count = (size * size) as usize;
        Self {
            size,
            half_extent,
            pixels: vec![[0.0, 0.0, 0.0, 1.0]; pixel_count],
        }
    }

    /// Splat instance snapshots onto the canvas.
    ///
    /// `boost` scales each instance's point size into pixel brightness.
    /// Instances outside the canvas extent are skipped.
    pub fn splat(&mut self, instances: &[PointInstance], boost: f32) {
        let span = 2.0 * self.half_extent;
        for instance in instances {
            let [x, _, z] = instance.position;
            let u = x / span + 0.5;
            let v = z / span + 0.5;
            if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                continue;
            }

            let px = (u * self.size as f32).min(self.size as f32 - 1.0) as u32;
            let py = (v * self.size as f32).min(self.size as f32 - 1.0) as u32;
            let idx = (py * self.size + px) as usize;

            // Additive blend: overlapping dust accumulates toward white.
            let b = (instance.size * boost).min(1.0);
            let pixel = &mut self.pixels[idx];
            pixel[0] = (pixel[0] + instance.color[0] * b).min(1.0);
            pixel[1] = (pixel[1] + instance.color[1] * b).min(1.0);
            pixel[2] = (pixel[2] + instance.color[2] * b).min(1.0);

            // Bright points bleed into neighboring pixels for a glow effect.
            if b > 0.5 {
                let offsets: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
                for (dx, dy) in offsets {
                    let nx = px as i32 + dx;
                    let ny = py as i32 + dy;
                    if nx >= 0 && nx < self.size as i32 && ny >= 0 && ny < self.size as i32 {
                        let ni = (ny as u32 * self.size + nx as u32) as usize;
                        let np = &mut self.pixels[ni];
                        np[0] = (np[0] + instance.color[0] * b * 0.3).min(1.0);
                        np[1] = (np[1] + instance.color[1] * b * 0.3).min(1.0);
                        np[2] = (np[2] + instance.color[2] * b * 0.3).min(1.0);
                    }
                }
            }
        }
    }

    /// Convert the canvas to RGBA8 bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            bytes.push((pixel[0].clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((pixel[1].clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((pixel[2].clamp(0.0, 1.0) * 255.0) as u8);
            bytes.push((pixel[3].clamp(0.0, 1.0) * 255.0) as u8);
        }
        bytes
    }

    /// Encode the canvas as a PNG file at `path`.
    pub fn write_png(&self, path: &Path) -> Result<(), png::EncodingError> {
        let mut png_buf = Vec::new();
        {
            let mut encoder =
                png::Encoder::new(std::io::Cursor::new(&mut png_buf), self.size, self.size);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.to_rgba8())?;
        }
        std::fs::write(path, &png_buf)?;
        Ok(())
    }
}
