use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};

use crate::encoder::Symbol;
use crate::error::{QrGenError, Result};
use crate::types::ColorValue;

pub const MAX_DIMENSION: u32 = 10_000;

/// Side length in pixels: `(modules + 2 * border) * box_size`.
pub fn pixel_size(module_count: u32, border: u32, box_size: u32) -> Result<u32> {
    let overflow = || QrGenError::DimensionOverflow {
        modules: module_count,
        border,
        box_size,
    };
    let side = border
        .checked_mul(2)
        .and_then(|quiet| quiet.checked_add(module_count))
        .and_then(|modules| modules.checked_mul(box_size))
        .ok_or_else(overflow)?;

    if side > MAX_DIMENSION {
        return Err(QrGenError::DimensionsTooLarge {
            width: side,
            height: side,
            max_dimension: MAX_DIMENSION,
        });
    }
    Ok(side)
}

/// Paint `symbol` with `box_size` pixels per module and `border` light
/// modules around it.
pub fn rasterize(
    symbol: &Symbol,
    box_size: u32,
    border: u32,
    fill: &ColorValue,
    back: &ColorValue,
) -> Result<RgbImage> {
    let side = pixel_size(symbol.module_count(), border, box_size)?;
    let mut img = RgbImage::from_pixel(side, side, Rgb(back.rgb()));
    let dark = Rgb(fill.rgb());

    for y in 0..symbol.module_count() {
        for x in 0..symbol.module_count() {
            if !symbol.is_dark(x, y) {
                continue;
            }
            let left = (x + border) * box_size;
            let top = (y + border) * box_size;
            for py in top..top + box_size {
                for px in left..left + box_size {
                    img.put_pixel(px, py, dark);
                }
            }
        }
    }

    Ok(img)
}

pub fn encode_png(img: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    PngEncoder::new_with_quality(&mut buf, CompressionType::Best, FilterType::Adaptive)
        .write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgb8)
        .map_err(|e| QrGenError::PngEncode(e.to_string()))?;
    Ok(buf)
}

pub fn png_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
