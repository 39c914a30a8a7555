//! Contains the types and functions for the high level pipeline builder API.

mod palette_pipeline;

pub use palette_pipeline::{PaletteOutput, PalettePipeline};

use crate::kmeans::KmeansOptions;
use std::num::NonZeroU32;
#[cfg(feature = "image")]
use image::imageops::FilterType;

/// The default column interval between sampled hex codes.
const DEFAULT_STRIDE: NonZeroU32 = match NonZeroU32::new(60) {
    Some(stride) => stride,
    None => NonZeroU32::MIN,
};

/// The fixed configuration of a [`PalettePipeline`].
///
/// The defaults give 5 colors, a 200×200 working resolution, a 300×50 strip,
/// and one hex code every 60 columns (so one per band).
///
/// # Examples
/// ```
/// # use swatchify::{kmeans::KmeansOptions, PaletteOptions};
/// let options = PaletteOptions::new()
///     .palette_size(8)
///     .working_size(128, 128)
///     .strip_size(400, 40)
///     .kmeans(KmeansOptions::new().seed(Some(42)));
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteOptions {
    /// The number of palette colors, `k`.
    pub(crate) palette_size: usize,
    /// The width and height the input image is resized to before clustering.
    pub(crate) working_size: (u32, u32),
    /// The filter used when resizing.
    #[cfg(feature = "image")]
    pub(crate) filter: FilterType,
    /// The width and height of the rendered strip.
    pub(crate) strip_size: (u32, u32),
    /// The column interval between sampled hex codes.
    pub(crate) stride: NonZeroU32,
    /// The options for the clustering engine.
    pub(crate) kmeans: KmeansOptions,
}

impl Default for PaletteOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteOptions {
    /// Creates a new [`PaletteOptions`] with default values.
    pub const fn new() -> Self {
        Self {
            palette_size: 5,
            working_size: (200, 200),
            #[cfg(feature = "image")]
            filter: FilterType::Triangle,
            strip_size: (300, 50),
            stride: DEFAULT_STRIDE,
            kmeans: KmeansOptions::new(),
        }
    }

    /// Sets the number of colors in the palette.
    ///
    /// The default is `5`.
    pub const fn palette_size(self, palette_size: usize) -> Self {
        Self { palette_size, ..self }
    }

    /// Sets the resolution images are resized to before clustering.
    /// This bounds the clustering cost and ignores the aspect ratio.
    ///
    /// The default is `200` by `200`.
    pub const fn working_size(self, width: u32, height: u32) -> Self {
        Self { working_size: (width, height), ..self }
    }

    /// Sets the filter used to resize images.
    ///
    /// The default is [`FilterType::Triangle`].
    #[cfg(feature = "image")]
    pub const fn filter(self, filter: FilterType) -> Self {
        Self { filter, ..self }
    }

    /// Sets the size of the rendered palette strip.
    ///
    /// The width should be at least the palette size, otherwise some colors will not appear.
    /// The default is `300` by `50`.
    pub const fn strip_size(self, width: u32, height: u32) -> Self {
        Self { strip_size: (width, height), ..self }
    }

    /// Sets the column interval between sampled hex codes.
    ///
    /// The default is `60`.
    pub const fn stride(self, stride: NonZeroU32) -> Self {
        Self { stride, ..self }
    }

    /// Sets the options for k-means clustering.
    ///
    /// The default is [`KmeansOptions::new`].
    pub const fn kmeans(self, kmeans: KmeansOptions) -> Self {
        Self { kmeans, ..self }
    }

    /// Returns the current palette size.
    #[must_use]
    pub const fn get_palette_size(&self) -> usize {
        self.palette_size
    }

    /// Returns the current working resolution.
    #[must_use]
    pub const fn get_working_size(&self) -> (u32, u32) {
        self.working_size
    }

    /// Returns the current strip size.
    #[must_use]
    pub const fn get_strip_size(&self) -> (u32, u32) {
        self.strip_size
    }

    /// Returns the current hex sampling stride.
    #[must_use]
    pub const fn get_stride(&self) -> NonZeroU32 {
        self.stride
    }

    /// Returns the current k-means options.
    pub const fn get_kmeans(&self) -> KmeansOptions {
        self.kmeans
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = PaletteOptions::default();
        assert_eq!(options.get_palette_size(), 5);
        assert_eq!(options.get_working_size(), (200, 200));
        assert_eq!(options.get_strip_size(), (300, 50));
        assert_eq!(options.get_stride().get(), 60);
        assert_eq!(options.get_kmeans(), KmeansOptions::new());
    }
}
