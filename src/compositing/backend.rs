//! Compositor trait and shared types.
//!
//! The [`Compositor`] trait is the seam between the session state machine
//! and the pixel work. The production implementation is
//! [`RasterCompositor`](super::raster::RasterCompositor) — a software
//! rasterizer on the `image` crate. Nothing mandates that backend: a
//! GPU-backed compositor would implement the same two operations.

use super::params::EditParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompositingError {
    #[error("failed to decode source image: {0}")]
    Decode(String),
    #[error("failed to encode rendered image: {0}")]
    Encode(String),
}

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A deterministic renderer from a source raster and [`EditParams`] to a
/// new raster. Both sides of the contract are data URIs.
///
/// Guarantees every implementation must uphold:
/// - default params render a pixel-exact copy of the input;
/// - a 90° or 270° rotation swaps output dimensions (content is never
///   cropped);
/// - an undecodable source fails with [`CompositingError::Decode`] and
///   produces nothing.
pub trait Compositor {
    /// Read the source dimensions without rendering.
    fn identify(&self, image_data: &str) -> Result<Dimensions, CompositingError>;

    /// Render a new raster. The input is left untouched.
    fn apply(&self, image_data: &str, params: &EditParams) -> Result<String, CompositingError>;
}
