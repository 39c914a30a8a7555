//! Contains the error type shared by every stage of the palette pipeline.

use std::{
    error::Error,
    fmt::{self, Display},
};

/// The error returned when a palette cannot be extracted from the given input.
///
/// None of these errors are transient: retrying with the same input and configuration
/// will fail in the same way.
#[derive(Debug)]
#[non_exhaustive]
pub enum PaletteError {
    /// The input bytes could not be decoded as an image.
    #[cfg(feature = "image")]
    Decode(image::ImageError),
    /// There were no color samples to cluster.
    EmptyInput,
    /// The requested number of clusters cannot be produced from the input.
    InvalidClusterCount {
        /// The requested number of clusters.
        k: usize,
        /// The number of color samples that were provided.
        num_samples: usize,
    },
    /// The input has more color samples than the maximum supported amount.
    AboveMaxLen {
        /// The length of the provided input.
        len: usize,
        /// The maximum supported length.
        max: u32,
    },
    /// A palette color has a channel that is NaN or infinite.
    NonFiniteColor {
        /// The index of the offending color in the palette.
        index: usize,
    },
}

impl Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "image")]
            Self::Decode(err) => write!(f, "failed to decode the input image: {err}"),
            Self::EmptyInput => write!(f, "the input has no color samples"),
            Self::InvalidClusterCount { k: 0, .. } => {
                write!(f, "the number of clusters must be at least 1")
            }
            Self::InvalidClusterCount { k, num_samples } => write!(
                f,
                "cannot form {k} clusters from {num_samples} samples without padding"
            ),
            Self::AboveMaxLen { len, max } => {
                write!(f, "got {len} color samples which is above the maximum of {max}")
            }
            Self::NonFiniteColor { index } => {
                write!(f, "palette color {index} has a non-finite channel")
            }
        }
    }
}

impl Error for PaletteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            #[cfg(feature = "image")]
            Self::Decode(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(feature = "image")]
impl From<image::ImageError> for PaletteError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err)
    }
}
