use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, Rgba, RgbaImage};

use crate::color::Hex;

/// Edge length of a color square, in pixels.
pub const ICON_SIZE: u32 = 24;

/// Encode an opaque `ICON_SIZE`×`ICON_SIZE` square of `color` as PNG.
pub fn png_bytes(color: &Hex) -> Result<Vec<u8>, image::ImageError> {
    let [r, g, b] = color.rgb().channels();
    let img = RgbaImage::from_pixel(ICON_SIZE, ICON_SIZE, Rgba([r, g, b, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// The color square as a `data:image/png;base64,...` URI.
pub fn png_data_uri(color: &Hex) -> Result<String, image::ImageError> {
    let png = png_bytes(color)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
