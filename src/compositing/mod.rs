//! The edit pipeline: deterministic raster transforms.
//!
//! Renders a new raster from a source raster and a set of
//! [`EditParams`] — a fixed filter stack (brightness → contrast →
//! grayscale → sepia) followed by a quarter-turn rotation. With default
//! params the pipeline is a pixel-exact identity.
//!
//! The module is split like a backend-agnostic pipeline:
//! - **Params**: [`EditParams`] and [`Rotation`], clamped on construction
//! - **Filters**: pure per-pixel math, unit testable without images
//! - **Backend**: the [`Compositor`] trait
//! - **Raster**: [`RasterCompositor`], the software implementation

pub mod backend;
pub mod filters;
pub mod params;
pub mod raster;

pub use backend::{Compositor, CompositingError, Dimensions};
pub use params::{EditParams, Rotation};
pub use raster::RasterCompositor;
