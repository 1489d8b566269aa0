//! Frame capture: convert read-back pixels to RGB and write a PNG.
//!
//! Read-back pixels are BGRA, matching the off-screen target format. Rows are
//! `bytes_per_row` apart (wgpu pads them to
//! [`wgpu::COPY_BYTES_PER_ROW_ALIGNMENT`]). Source row `r`, column `c` becomes
//! output pixel `(c, r)`; no flip in either direction.

use engine_core::{Error, Result};
use image::{Rgb, RgbImage};
use std::path::Path;

pub const BYTES_PER_PIXEL: u32 = 4;

/// Default capture file name.
pub const DEFAULT_CAPTURE_PATH: &str = "test.png";

/// Row stride wgpu requires for a texture-to-buffer copy of `width` pixels.
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// BGRA pixels as read back from an off-screen target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub bytes_per_row: u32,
}

/// Convert a read-back frame to RGB, honouring its row stride.
pub fn to_rgb_image(frame: &RawFrame) -> Result<RgbImage> {
    convert(&frame.data, frame.width, frame.height, frame.bytes_per_row as usize)
}

/// Tightly packed BGRA to RGB, alpha dropped.
pub fn bgra_to_rgb(raw: &[u8], width: u32, height: u32) -> Result<RgbImage> {
    convert(raw, width, height, width as usize * BYTES_PER_PIXEL as usize)
}

fn convert(data: &[u8], width: u32, height: u32, stride: usize) -> Result<RgbImage> {
    let row_bytes = width as usize * BYTES_PER_PIXEL as usize;
    if stride < row_bytes {
        return Err(Error::invalid_argument(format!(
            "row stride {stride} is smaller than {row_bytes} bytes of pixels"
        )));
    }
    let needed = match height as usize {
        0 => 0,
        h => stride * (h - 1) + row_bytes,
    };
    if data.len() < needed {
        return Err(Error::invalid_argument(format!(
            "pixel buffer holds {} bytes, {width}x{height} needs {needed}",
            data.len()
        )));
    }

    let mut image = RgbImage::new(width, height);
    for row in 0..height {
        let start = row as usize * stride;
        let line = &data[start..start + row_bytes];
        for (column, px) in line.chunks_exact(BYTES_PER_PIXEL as usize).enumerate() {
            image.put_pixel(column as u32, row, Rgb([px[2], px[1], px[0]]));
        }
    }
    Ok(image)
}

/// Write `image` as a PNG at `path`.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| Error::Io {
            path: path.to_path_buf(),
            source: match e {
                image::ImageError::IoError(io) => io,
                other => std::io::Error::other(other),
            },
        })
}
