//! Rendering a [`Palette`] as a strip of vertical color bands.

use crate::{types::round_channel, Palette};
use log::warn;
use palette::Srgb;
#[cfg(feature = "image")]
use {image::RgbImage, palette::cast::IntoComponents};

/// A `width` by `height` image made of one vertical band per palette color.
///
/// Every row of the strip is identical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteStrip {
    /// The number of columns.
    width: u32,
    /// The number of rows.
    height: u32,
    /// The pixels in row-major order.
    pixels: Vec<Srgb<u8>>,
}

impl PaletteStrip {
    /// Returns the number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Srgb<u8>] {
        &self.pixels
    }

    /// Returns the pixel at column `x` and row `y`, or `None` if out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Srgb<u8>> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Returns row `y` of the strip, or `None` if out of bounds.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[Srgb<u8>]> {
        if y < self.height {
            let width = self.width as usize;
            let start = y as usize * width;
            Some(&self.pixels[start..(start + width)])
        } else {
            None
        }
    }

    /// Converts the strip into an [`RgbImage`] for encoding or display.
    #[cfg(feature = "image")]
    #[must_use]
    pub fn into_rgbimage(self) -> RgbImage {
        let Self { width, height, pixels } = self;

        #[allow(clippy::unwrap_used)]
        {
            // pixels.len() is width * height by construction,
            // so the buffer is always large enough
            RgbImage::from_vec(width, height, pixels.into_components()).unwrap()
        }
    }
}

#[cfg(feature = "image")]
impl From<PaletteStrip> for RgbImage {
    fn from(strip: PaletteStrip) -> Self {
        strip.into_rgbimage()
    }
}

/// Returns the column range `start..end` covered by each band.
///
/// Each band is `width / k` columns wide and the last band takes the remainder.
/// If there are more bands than columns, every column gets its own band
/// and the bands past the last column are left out.
fn band_bounds(k: usize, width: usize) -> Vec<(usize, usize)> {
    let band_width = (width / k).max(1);
    (0..k)
        .map(|i| {
            let start = (i * band_width).min(width);
            let end = if i + 1 == k { width } else { ((i + 1) * band_width).min(width) };
            (start, end.max(start))
        })
        .filter(|&(start, end)| start < end)
        .collect()
}

/// Renders `palette` as a `width` by `height` strip of contiguous vertical bands,
/// one per palette color in palette order.
///
/// Each band is filled with its centroid, rounded to the nearest integer and clamped to `0..=255`.
///
/// # Examples
/// ```
/// # use swatchify::{strip, Palette, PaletteError};
/// # use palette::Srgb;
/// # fn main() -> Result<(), PaletteError> {
/// let palette = Palette::try_from(vec![Srgb::new(255.0, 0.0, 0.0), Srgb::new(0.0, 0.0, 255.0)])?;
/// let strip = strip::render(&palette, 5, 2);
/// assert_eq!(strip.pixel(1, 1), Some(Srgb::new(255, 0, 0)));
/// assert_eq!(strip.pixel(4, 0), Some(Srgb::new(0, 0, 255)));
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn render(palette: &Palette, width: u32, height: u32) -> PaletteStrip {
    let colors = palette.to_srgb_u8();
    let w = width as usize;

    if colors.len() > w {
        warn!(
            "palette of {} colors is wider than the {w} column strip, dropping {} colors",
            colors.len(),
            colors.len() - w
        );
    }

    let mut row = vec![Srgb::new(0, 0, 0); w];
    for (&color, (start, end)) in colors.iter().zip(band_bounds(colors.len(), w)) {
        row[start..end].fill(color);
    }

    let mut pixels = Vec::with_capacity(w * height as usize);
    for _ in 0..height {
        pixels.extend_from_slice(&row);
    }

    PaletteStrip { width, height, pixels }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn palette_of(colors: &[(f64, f64, f64)]) -> Palette {
        Palette::try_from(
            colors
                .iter()
                .map(|&(r, g, b)| Srgb::new(r, g, b))
                .collect::<Vec<_>>(),
        )
        .unwrap()
    }

    #[test]
    fn bands_cover_every_column() {
        for k in 1..=32 {
            for width in [k, 7, 50, 300, 301] {
                if k > width {
                    continue;
                }
                let bounds = band_bounds(k, width);
                assert_eq!(bounds.len(), k);
                assert_eq!(bounds[0].0, 0);
                assert_eq!(bounds[k - 1].1, width);
                for pair in bounds.windows(2) {
                    assert_eq!(pair[0].1, pair[1].0);
                }
            }
        }
    }

    #[test]
    fn last_band_takes_remainder() {
        assert_eq!(band_bounds(3, 10), vec![(0, 3), (3, 6), (6, 10)]);
        assert_eq!(
            band_bounds(5, 300),
            vec![(0, 60), (60, 120), (120, 180), (180, 240), (240, 300)]
        );
    }

    #[test]
    fn more_bands_than_columns() {
        assert_eq!(band_bounds(5, 3), vec![(0, 1), (1, 2), (2, 3)]);

        let palette = palette_of(&[(1.0, 1.0, 1.0), (2.0, 2.0, 2.0), (3.0, 3.0, 3.0)]);
        let strip = render(&palette, 2, 1);
        assert_eq!(strip.pixels(), &[Srgb::new(1, 1, 1), Srgb::new(2, 2, 2)]);
    }

    #[test]
    fn dimensions_match_request() {
        let palette = palette_of(&[(0.0, 0.0, 0.0), (9.0, 9.0, 9.0), (200.0, 1.0, 3.0)]);
        let strip = render(&palette, 301, 50);
        assert_eq!(strip.width(), 301);
        assert_eq!(strip.height(), 50);
        assert_eq!(strip.pixels().len(), 301 * 50);
        assert_eq!(strip.pixel(300, 49), Some(Srgb::new(200, 1, 3)));
        assert_eq!(strip.pixel(301, 0), None);
        assert_eq!(strip.pixel(0, 50), None);
    }

    #[test]
    fn rows_are_identical() {
        let palette = palette_of(&[(10.4, 20.5, 30.6), (255.7, -1.0, 128.0)]);
        let strip = render(&palette, 9, 4);
        let first = strip.row(0).unwrap().to_vec();
        for y in 1..4 {
            assert_eq!(strip.row(y).unwrap(), first.as_slice());
        }
        assert_eq!(first[0], Srgb::new(10, 21, 31));
        assert_eq!(first[8], Srgb::new(255, 0, 128));
        assert!(strip.row(4).is_none());
    }

    #[test]
    fn single_red_band() {
        let palette = palette_of(&[(255.0, 0.0, 0.0)]);
        let strip = render(&palette, 300, 50);
        assert!(strip.pixels().iter().all(|&c| c == Srgb::new(255, 0, 0)));
    }

    #[test]
    fn zero_sized_strip() {
        let palette = palette_of(&[(1.0, 2.0, 3.0)]);
        assert!(render(&palette, 0, 10).pixels().is_empty());
        assert!(render(&palette, 10, 0).pixels().is_empty());
    }

    #[cfg(feature = "image")]
    #[test]
    fn converts_to_rgbimage() {
        let palette = palette_of(&[(10.0, 20.0, 30.0), (40.0, 50.0, 60.0)]);
        let image = render(&palette, 4, 2).into_rgbimage();
        assert_eq!(image.dimensions(), (4, 2));
        assert_eq!(image.get_pixel(0, 1).0, [10, 20, 30]);
        assert_eq!(image.get_pixel(3, 0).0, [40, 50, 60]);
    }
}
