//! Contains various types needed across the crate.

use crate::{PaletteError, MAX_PIXELS};
use palette::Srgb;
use std::ops::Deref;
#[cfg(feature = "image")]
use {image::RgbImage, palette::cast::ComponentsAs};

/// A simple new type wrapper around `&'a [Srgb<u8>]` with the invariant that the length of the
/// inner slice must not be greater than [`MAX_PIXELS`].
///
/// Each color in the slice is one color sample. The order of the samples does not matter to
/// the clustering engine.
///
/// # Examples
/// From a raw color slice:
/// ```
/// # use swatchify::{ColorSlice, PaletteError};
/// # use palette::Srgb;
/// # fn main() -> Result<(), PaletteError> {
/// let srgb = vec![Srgb::new(0, 0, 0)];
/// let samples = ColorSlice::try_from(srgb.as_slice())?;
/// # Ok(())
/// # }
/// ```
///
/// From an image (needs the `image` feature to be enabled):
/// ```no_run
/// # use swatchify::ColorSlice;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?.into_rgb8();
/// let samples = ColorSlice::try_from(&img)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct ColorSlice<'a>(&'a [Srgb<u8>]);

impl<'a> Clone for ColorSlice<'a> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a> Copy for ColorSlice<'a> {}

impl<'a> ColorSlice<'a> {
    /// Creates a new [`ColorSlice`] by truncating the input slice to a max length of [`MAX_PIXELS`].
    #[must_use]
    pub fn from_truncated(colors: &'a [Srgb<u8>]) -> Self {
        Self(&colors[..colors.len().min(MAX_PIXELS as usize)])
    }

    /// Returns the length of the slice as a `u32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn num_samples(&self) -> u32 {
        self.0.len() as u32
    }
}

impl<'a> Deref for ColorSlice<'a> {
    type Target = [Srgb<u8>];

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl<'a> From<ColorSlice<'a>> for &'a [Srgb<u8>] {
    fn from(val: ColorSlice<'a>) -> Self {
        val.0
    }
}

impl<'a> TryFrom<&'a [Srgb<u8>]> for ColorSlice<'a> {
    type Error = PaletteError;

    fn try_from(slice: &'a [Srgb<u8>]) -> Result<Self, Self::Error> {
        if slice.len() <= MAX_PIXELS as usize {
            Ok(Self(slice))
        } else {
            Err(PaletteError::AboveMaxLen { len: slice.len(), max: MAX_PIXELS })
        }
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for ColorSlice<'a> {
    type Error = PaletteError;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        let pixels = image.pixels().len();
        let buf = &image.as_raw()[..(pixels * 3)];
        let colors: &[Srgb<u8>] = buf.components_as();
        ColorSlice::try_from(colors)
    }
}

/// Rounds a floating point channel to the nearest integer and clamps it to `0..=255`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn round_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// An ordered, non-empty list of cluster centroids.
///
/// The centroids are kept as unrounded floating point colors, and every channel is finite.
/// Their order is the cluster index order of the clustering run that produced them.
///
/// # Examples
/// ```
/// # use swatchify::{Palette, PaletteError};
/// # use palette::Srgb;
/// # fn main() -> Result<(), PaletteError> {
/// let palette = Palette::try_from(vec![Srgb::new(255.0, 0.0, 0.0)])?;
/// assert_eq!(palette.to_srgb_u8(), vec![Srgb::new(255, 0, 0)]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq)]
#[repr(transparent)]
pub struct Palette(Vec<Srgb<f64>>);

impl Palette {
    /// Creates a [`Palette`] without checking that `centroids` is non-empty and finite.
    pub(crate) fn new_unchecked(centroids: Vec<Srgb<f64>>) -> Self {
        Self(centroids)
    }

    /// Gets the inner list of centroids.
    #[must_use]
    pub fn into_inner(self) -> Vec<Srgb<f64>> {
        self.0
    }

    /// Returns the centroids rounded to the nearest integer and clamped to `0..=255`.
    #[must_use]
    pub fn to_srgb_u8(&self) -> Vec<Srgb<u8>> {
        self.0
            .iter()
            .map(|c| {
                Srgb::new(
                    round_channel(c.red),
                    round_channel(c.green),
                    round_channel(c.blue),
                )
            })
            .collect()
    }
}

impl Deref for Palette {
    type Target = [Srgb<f64>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Palette> for Vec<Srgb<f64>> {
    fn from(value: Palette) -> Self {
        value.into_inner()
    }
}

impl TryFrom<Vec<Srgb<f64>>> for Palette {
    type Error = PaletteError;

    fn try_from(centroids: Vec<Srgb<f64>>) -> Result<Self, Self::Error> {
        if centroids.is_empty() {
            return Err(PaletteError::EmptyInput);
        }
        let non_finite = centroids
            .iter()
            .position(|c| !(c.red.is_finite() && c.green.is_finite() && c.blue.is_finite()));
        match non_finite {
            Some(index) => Err(PaletteError::NonFiniteColor { index }),
            None => Ok(Self(centroids)),
        }
    }
}
