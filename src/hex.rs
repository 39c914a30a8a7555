//! Sampling hex color codes from a [`PaletteStrip`].

use crate::PaletteStrip;
use palette::Srgb;
use std::num::NonZeroU32;

/// Formats a color as a lowercase `#rrggbb` hex code.
///
/// # Examples
/// ```
/// # use swatchify::hex::to_hex;
/// # use palette::Srgb;
/// assert_eq!(to_hex(Srgb::new(10, 20, 30)), "#0a141e");
/// ```
#[must_use]
pub fn to_hex(color: Srgb<u8>) -> String {
    let (r, g, b) = color.into_components();
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Reads row `0` of `strip` at columns `0, stride, 2 * stride, ...` below the strip width
/// and returns the hex code of each color read.
///
/// An empty strip gives an empty list.
///
/// # Examples
/// ```
/// # use swatchify::{hex, strip, Palette, PaletteError};
/// # use palette::Srgb;
/// # use std::num::NonZeroU32;
/// # fn main() -> Result<(), PaletteError> {
/// let palette = Palette::try_from(vec![Srgb::new(255.0, 0.0, 0.0)])?;
/// let strip = strip::render(&palette, 300, 50);
/// let stride = NonZeroU32::new(60).unwrap_or(NonZeroU32::MIN);
/// assert_eq!(hex::sample(&strip, stride), vec!["#ff0000"; 5]);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn sample(strip: &PaletteStrip, stride: NonZeroU32) -> Vec<String> {
    strip.row(0).map_or_else(Vec::new, |row| {
        row.iter()
            .step_by(stride.get() as usize)
            .map(|&color| to_hex(color))
            .collect()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{strip::render, Palette};

    fn stride(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn strip_of(colors: &[Srgb<f64>], width: u32) -> PaletteStrip {
        render(&Palette::try_from(colors.to_vec()).unwrap(), width, 50)
    }

    #[test]
    fn zero_padded_lowercase() {
        assert_eq!(to_hex(Srgb::new(0, 0, 0)), "#000000");
        assert_eq!(to_hex(Srgb::new(255, 171, 1)), "#ffab01");
    }

    #[test]
    fn sample_count_bounded_by_width() {
        let strip = strip_of(&[Srgb::new(1.0, 2.0, 3.0)], 300);
        assert_eq!(sample(&strip, stride(60)).len(), 5);
        assert_eq!(sample(&strip, stride(61)).len(), 5);
        assert_eq!(sample(&strip, stride(299)).len(), 2);
        assert_eq!(sample(&strip, stride(300)).len(), 1);
        assert_eq!(sample(&strip, stride(1)).len(), 300);
    }

    #[test]
    fn one_code_per_band() {
        let colors = [
            Srgb::new(255.0, 0.0, 0.0),
            Srgb::new(0.0, 255.0, 0.0),
            Srgb::new(0.0, 0.0, 255.0),
            Srgb::new(10.0, 20.0, 30.0),
            Srgb::new(254.6, 254.4, 0.2),
        ];
        let strip = strip_of(&colors, 300);
        assert_eq!(
            sample(&strip, stride(60)),
            vec!["#ff0000", "#00ff00", "#0000ff", "#0a141e", "#fffe00"]
        );
    }

    #[test]
    fn empty_strip() {
        let strip = strip_of(&[Srgb::new(1.0, 2.0, 3.0)], 0);
        assert!(sample(&strip, stride(60)).is_empty());

        let flat = render(&Palette::try_from(vec![Srgb::new(1.0, 2.0, 3.0)]).unwrap(), 300, 0);
        assert!(sample(&flat, stride(60)).is_empty());
    }
}
