//! Pure per-pixel filter math.
//!
//! All functions here operate on normalized `[r, g, b]` channels in
//! `0.0..=1.0` and are testable without decoding a single image. Semantics
//! match the CSS filter functions of the same names, so a raster rendered
//! here is interchangeable with one rendered by a browser canvas:
//! each step clamps its result to the displayable range before the next
//! step runs, and the stack order is fixed:
//! brightness → contrast → grayscale → sepia.

use super::params::EditParams;

/// Rec. 709 luma coefficients, as used by the CSS `grayscale()` matrix.
const LUMA: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// Full-strength sepia matrix from the SVG/CSS filter spec, row-major.
const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

fn clamp01(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(|v| v.clamp(0.0, 1.0))
}

/// Scale all channels. 100 is identity, 0 is black, 200 doubles (clamped).
pub fn brightness(rgb: [f32; 3], percent: u32) -> [f32; 3] {
    let k = percent as f32 / 100.0;
    clamp01(rgb.map(|v| v * k))
}

/// Spread channels around mid-gray. 100 is identity, 0 collapses
/// everything to 50% gray.
pub fn contrast(rgb: [f32; 3], percent: u32) -> [f32; 3] {
    let k = percent as f32 / 100.0;
    clamp01(rgb.map(|v| (v - 0.5) * k + 0.5))
}

/// Interpolate toward the pixel's luma. 0 is identity, 100 is fully gray.
pub fn grayscale(rgb: [f32; 3], percent: u32) -> [f32; 3] {
    let t = percent as f32 / 100.0;
    let luma = LUMA[0] * rgb[0] + LUMA[1] * rgb[1] + LUMA[2] * rgb[2];
    clamp01([
        rgb[0] + (luma - rgb[0]) * t,
        rgb[1] + (luma - rgb[1]) * t,
        rgb[2] + (luma - rgb[2]) * t,
    ])
}

/// Interpolate toward the full sepia matrix. 0 is identity.
pub fn sepia(rgb: [f32; 3], percent: u32) -> [f32; 3] {
    let t = percent as f32 / 100.0;
    let toned = [
        SEPIA[0][0] * rgb[0] + SEPIA[0][1] * rgb[1] + SEPIA[0][2] * rgb[2],
        SEPIA[1][0] * rgb[0] + SEPIA[1][1] * rgb[1] + SEPIA[1][2] * rgb[2],
        SEPIA[2][0] * rgb[0] + SEPIA[2][1] * rgb[1] + SEPIA[2][2] * rgb[2],
    ];
    clamp01([
        rgb[0] + (toned[0] - rgb[0]) * t,
        rgb[1] + (toned[1] - rgb[1]) * t,
        rgb[2] + (toned[2] - rgb[2]) * t,
    ])
}

/// The whole filter stack in its fixed order. Alpha is untouched by design
/// (none of the four filters affect it), so callers pass RGB only.
pub fn filter_stack(rgb: [f32; 3], params: &EditParams) -> [f32; 3] {
    let rgb = brightness(rgb, params.brightness());
    let rgb = contrast(rgb, params.contrast());
    let rgb = grayscale(rgb, params.grayscale());
    sepia(rgb, params.sepia())
}
