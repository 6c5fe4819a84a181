//! Software compositor on the `image` crate.
//!
//! | Step | Crate / function |
//! |---|---|
//! | Decode | `image::load_from_memory` (PNG decoder compiled in) |
//! | Filter stack | [`filters`](super::filters) per-pixel math, single pass |
//! | Rotate | `image::imageops::rotate90/180/270` |
//! | Encode | `image::codecs::png` via `DynamicImage::write_to` |
//!
//! Filters run once over the RGBA buffer in f32, rounding back to u8 at
//! the end of the stack. Alpha passes through unchanged. Rotation happens
//! after filtering, about the canvas center, and swaps the canvas for
//! quarter turns so content is never cropped.

use super::backend::{Compositor, CompositingError, Dimensions};
use super::filters::filter_stack;
use super::params::{EditParams, Rotation};
use crate::asset::{decode_data_uri, encode_png_data_uri};
use image::{DynamicImage, ImageFormat, imageops};
use std::io::Cursor;

/// Production compositor. Stateless; construct freely.
#[derive(Debug, Default)]
pub struct RasterCompositor;

impl RasterCompositor {
    pub fn new() -> Self {
        Self
    }
}

fn decode(image_data: &str) -> Result<DynamicImage, CompositingError> {
    let bytes =
        decode_data_uri(image_data).map_err(|e| CompositingError::Decode(e.to_string()))?;
    image::load_from_memory(&bytes).map_err(|e| CompositingError::Decode(e.to_string()))
}

impl Compositor for RasterCompositor {
    fn identify(&self, image_data: &str) -> Result<Dimensions, CompositingError> {
        let img = decode(image_data)?;
        Ok(Dimensions {
            width: img.width(),
            height: img.height(),
        })
    }

    fn apply(&self, image_data: &str, params: &EditParams) -> Result<String, CompositingError> {
        let mut canvas = decode(image_data)?.to_rgba8();

        if !params.is_identity() {
            for pixel in canvas.pixels_mut() {
                let [r, g, b, a] = pixel.0;
                let rgb = filter_stack(
                    [
                        r as f32 / 255.0,
                        g as f32 / 255.0,
                        b as f32 / 255.0,
                    ],
                    params,
                );
                pixel.0 = [
                    (rgb[0] * 255.0).round() as u8,
                    (rgb[1] * 255.0).round() as u8,
                    (rgb[2] * 255.0).round() as u8,
                    a,
                ];
            }
        }

        let rotated = match params.rotation {
            Rotation::R0 => canvas,
            Rotation::R90 => imageops::rotate90(&canvas),
            Rotation::R180 => imageops::rotate180(&canvas),
            Rotation::R270 => imageops::rotate270(&canvas),
        };

        let mut bytes = Vec::new();
        DynamicImage::ImageRgba8(rotated)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| CompositingError::Encode(e.to_string()))?;
        Ok(encode_png_data_uri(&bytes))
    }
}
