//! Shared test fixtures for the nft-forge test suite.
//!
//! Tiny in-memory PNGs as data URIs, pixel extraction for asserting on
//! rendered output, and asset builders. Everything here is `cfg(test)`;
//! nothing ships.

use crate::asset::{Asset, AssetId, AspectRatio, decode_data_uri, encode_png_data_uri};
use image::{Rgba, RgbaImage};

/// Encode explicit RGBA pixels (row-major, `w * h` entries) as a PNG
/// data URI.
pub fn png_data_uri(width: u32, height: u32, pixels: &[[u8; 4]]) -> String {
    assert_eq!(pixels.len() as u32, width * height, "pixel count mismatch");
    let mut img = RgbaImage::new(width, height);
    for (i, px) in pixels.iter().enumerate() {
        let x = i as u32 % width;
        let y = i as u32 / width;
        img.put_pixel(x, y, Rgba(*px));
    }
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
    encode_png_data_uri(&bytes)
}

/// A solid-color PNG data URI.
pub fn solid_png_data_uri(width: u32, height: u32, rgba: [u8; 4]) -> String {
    let pixels = vec![rgba; (width * height) as usize];
    png_data_uri(width, height, &pixels)
}

/// Decode a PNG data URI back to `(width, height, row-major pixels)`.
pub fn decode_png_pixels(data_uri: &str) -> (u32, u32, Vec<[u8; 4]>) {
    let bytes = decode_data_uri(data_uri).unwrap();
    let img = image::load_from_memory(&bytes).unwrap().to_rgba8();
    let (w, h) = img.dimensions();
    let pixels = img.pixels().map(|p| p.0).collect();
    (w, h, pixels)
}

/// An asset with a real (1×1 white) raster and a fresh id.
pub fn sample_asset(prompt: &str) -> Asset {
    Asset {
        id: AssetId::generate(),
        image_data: solid_png_data_uri(1, 1, [255, 255, 255, 255]),
        prompt: prompt.to_string(),
        created_at: chrono::Utc::now(),
        aspect_ratio: AspectRatio::Square,
    }
}
