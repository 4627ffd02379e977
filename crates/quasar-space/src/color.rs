//! HSL color conversion and interpolation helpers shared by the generators.
//!
//! All channels are `f32` in [0, 1]. Hue wraps around 1.0; saturation and
//! lightness are clamped.

/// Convert an HSL color to RGB.
///
/// Standard hexcone conversion. Hue outside [0, 1) wraps, so jittered hues
/// never produce out-of-range channels.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let sector = h * 6.0;
    let x = c * (1.0 - (sector % 2.0 - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = l - c * 0.5;
    [r + m, g + m, b + m]
}

/// Convert an RGB color to HSL, the inverse of [`hsl_to_rgb`].
///
/// Achromatic colors (r == g == b) report hue and saturation of 0.
pub fn rgb_to_hsl(rgb: [f32; 3]) -> (f32, f32, f32) {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = d / (1.0 - (2.0 * l - 1.0).abs());
    let sector = if max == r {
        ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    (sector / 6.0, s.clamp(0.0, 1.0), l)
}

/// Linearly interpolate between two RGB colors.
pub fn lerp_rgb(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        a[0] + (b[0] - a[0]) * t,
        a[1] + (b[1] - a[1]) * t,
        a[2] + (b[2] - a[2]) * t,
    ]
}
