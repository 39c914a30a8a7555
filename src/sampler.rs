//! Turning encoded or decoded images into color samples.
//!
//! The clustering cost grows with the number of pixels, so images are first resized to a small
//! fixed working resolution. The resized image is then viewed as a flat
//! [`ColorSlice`](crate::ColorSlice), which drops the position of each pixel.

use crate::PaletteError;
use image::{imageops::FilterType, DynamicImage, RgbImage};
use log::debug;

/// Decodes an image from its encoded bytes, guessing the format from the content.
///
/// # Errors
/// Returns [`PaletteError::Decode`] if the format is unknown, unsupported,
/// or the data is malformed.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, PaletteError> {
    let image = image::load_from_memory(bytes)?;
    debug!(
        "decoded {}x{} image with color type {:?}",
        image.width(),
        image.height(),
        image.color()
    );
    Ok(image)
}

/// Converts any decoded image to 8-bit sRGB.
///
/// Alpha channels are dropped, grayscale is expanded to three equal channels,
/// and higher bit depths are reduced to 8 bits.
#[must_use]
pub fn normalize(image: &DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(rgb) => rgb.clone(),
        image => image.to_rgb8(),
    }
}

/// Resizes `image` to exactly `width` by `height` pixels, ignoring the aspect ratio.
///
/// An empty source or target gives an empty image.
#[must_use]
pub fn resize(image: &RgbImage, width: u32, height: u32, filter: FilterType) -> RgbImage {
    if image.width() == 0 || image.height() == 0 || width == 0 || height == 0 {
        return RgbImage::new(0, 0);
    }

    if image.dimensions() == (width, height) {
        return image.clone();
    }

    debug!(
        "resizing {}x{} image to {width}x{height} with {filter:?}",
        image.width(),
        image.height()
    );
    image::imageops::resize(image, width, height, filter)
}

/// Decodes, normalizes, and resizes `bytes` in one go.
///
/// # Errors
/// Returns [`PaletteError::Decode`] if `bytes` cannot be decoded.
pub fn load(
    bytes: &[u8],
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RgbImage, PaletteError> {
    let image = decode(bytes)?;
    Ok(resize(&normalize(&image), width, height, filter))
}
