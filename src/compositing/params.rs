//! Parameter types for the edit pipeline.
//!
//! [`EditParams`] describes *what* to render, not *how* — the
//! [`Compositor`](super::backend::Compositor) backend does the pixel work.
//! Params are transient: they exist for one editing session and reset to
//! defaults on save or cancel. They are deliberately not serializable;
//! only the rendered raster is persisted.
//!
//! All percentage fields clamp on write, so a params value is valid by
//! construction.

/// Rotation in quarter turns. The only rotations the pipeline supports
/// are multiples of 90°, which keeps the output canvas lossless — rotated
/// content is never cropped, the canvas swaps dimensions instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Interpret a degree count, taken mod 360. Negative values count
    /// counter-clockwise. Returns `None` unless the value is a multiple
    /// of 90.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::R0),
            90 => Some(Self::R90),
            180 => Some(Self::R180),
            270 => Some(Self::R270),
            _ => None,
        }
    }

    pub fn degrees(self) -> u32 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }

    /// Whether output width and height swap relative to the source
    /// (true for 90° and 270°).
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Self::R90 | Self::R270)
    }

    /// One additional clockwise quarter turn.
    pub fn turned_cw(self) -> Self {
        match self {
            Self::R0 => Self::R90,
            Self::R90 => Self::R180,
            Self::R180 => Self::R270,
            Self::R270 => Self::R0,
        }
    }
}

/// Transient edit settings: a four-filter stack plus rotation.
///
/// Filter amounts are CSS-filter-style percentages. Brightness and
/// contrast run 0–200 with 100 meaning "unchanged"; grayscale and sepia
/// run 0–100 with 0 meaning "unchanged".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditParams {
    brightness: u32,
    contrast: u32,
    grayscale: u32,
    sepia: u32,
    pub rotation: Rotation,
}

impl Default for EditParams {
    fn default() -> Self {
        Self {
            brightness: 100,
            contrast: 100,
            grayscale: 0,
            sepia: 0,
            rotation: Rotation::R0,
        }
    }
}

impl EditParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn brightness(&self) -> u32 {
        self.brightness
    }

    pub fn set_brightness(&mut self, percent: u32) {
        self.brightness = percent.min(200);
    }

    pub fn contrast(&self) -> u32 {
        self.contrast
    }

    pub fn set_contrast(&mut self, percent: u32) {
        self.contrast = percent.min(200);
    }

    pub fn grayscale(&self) -> u32 {
        self.grayscale
    }

    pub fn set_grayscale(&mut self, percent: u32) {
        self.grayscale = percent.min(100);
    }

    pub fn sepia(&self) -> u32 {
        self.sepia
    }

    pub fn set_sepia(&mut self, percent: u32) {
        self.sepia = percent.min(100);
    }

    /// True when rendering with these params is a pixel-exact identity.
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}
