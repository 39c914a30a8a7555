//! Contains the [`PalettePipeline`] builder struct for the high level API.

use crate::{
    hex,
    kmeans::{self, KmeansOptions, KmeansOutput},
    strip, ColorSlice, Palette, PaletteError, PaletteOptions, PaletteStrip,
};
use log::debug;
#[cfg(feature = "image")]
use {
    crate::sampler,
    image::{DynamicImage, RgbImage},
};

/// Everything produced by one run of a [`PalettePipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteOutput {
    /// The cluster centroids in cluster index order.
    pub palette: Palette,
    /// The number of samples assigned to each palette color.
    pub counts: Vec<u32>,
    /// The palette rendered as vertical color bands.
    pub strip: PaletteStrip,
    /// The hex codes sampled from the strip.
    pub hex_codes: Vec<String>,
}

/// A builder struct to extract a palette, palette strip, and hex codes from an image.
///
/// Each run owns all of its intermediate state, so one pipeline can be shared
/// between threads and run on many inputs concurrently.
///
/// # Examples
/// ```no_run
/// # use swatchify::{PalettePipeline, PaletteOptions};
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let bytes = std::fs::read("some image")?;
/// let pipeline = PalettePipeline::new(PaletteOptions::new().palette_size(6));
/// let (resized, output) = pipeline.run_bytes(&bytes)?;
/// for code in &output.hex_codes {
///     println!("{code}");
/// }
/// # Ok(())
/// # }
/// ```
///
/// Or, from raw color samples without the `image` feature:
/// ```
/// # use swatchify::{PalettePipeline, ColorSlice, PaletteError};
/// # use palette::Srgb;
/// # fn main() -> Result<(), PaletteError> {
/// let colors = vec![Srgb::new(10, 20, 30); 100];
/// let output = PalettePipeline::default().run_samples(ColorSlice::try_from(colors.as_slice())?)?;
/// assert_eq!(output.hex_codes, vec!["#0a141e"; 5]);
/// # Ok(())
/// # }
/// ```
#[must_use]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PalettePipeline {
    /// The fixed configuration for every run.
    options: PaletteOptions,
}

impl PalettePipeline {
    /// Creates a new [`PalettePipeline`] with the given options.
    pub const fn new(options: PaletteOptions) -> Self {
        Self { options }
    }

    /// Returns the options of this pipeline.
    pub const fn options(&self) -> PaletteOptions {
        self.options
    }

    /// Renders the strip and samples the hex codes for a finished clustering run.
    fn finish(&self, output: KmeansOutput) -> PaletteOutput {
        let KmeansOutput { palette, counts, iterations, .. } = output;
        let (width, height) = self.options.strip_size;

        let strip = strip::render(&palette, width, height);
        let hex_codes = hex::sample(&strip, self.options.stride);

        debug!(
            "extracted {} colors in {iterations} iterations: {}",
            palette.len(),
            hex_codes.join(" ")
        );

        PaletteOutput { palette, counts, strip, hex_codes }
    }

    fn run_samples_with(
        &self,
        samples: ColorSlice,
        cluster: impl Fn(ColorSlice, usize, KmeansOptions) -> Result<KmeansOutput, PaletteError>,
    ) -> Result<PaletteOutput, PaletteError> {
        let output = cluster(samples, self.options.palette_size, self.options.kmeans)?;
        Ok(self.finish(output))
    }

    /// Runs the pipeline on color samples that were already extracted from an image.
    ///
    /// # Errors
    /// Returns [`PaletteError::EmptyInput`] if there are no samples or
    /// [`PaletteError::InvalidClusterCount`] if the palette size is invalid for the samples.
    pub fn run_samples(&self, samples: ColorSlice) -> Result<PaletteOutput, PaletteError> {
        self.run_samples_with(samples, kmeans::cluster)
    }

    /// Runs the pipeline on color samples, clustering in parallel.
    ///
    /// # Errors
    /// See [`run_samples`](Self::run_samples).
    #[cfg(feature = "threads")]
    pub fn run_samples_par(&self, samples: ColorSlice) -> Result<PaletteOutput, PaletteError> {
        self.run_samples_with(samples, kmeans::cluster_par)
    }

    #[cfg(feature = "image")]
    fn run_with(
        &self,
        image: &DynamicImage,
        cluster: impl Fn(ColorSlice, usize, KmeansOptions) -> Result<KmeansOutput, PaletteError>,
    ) -> Result<(RgbImage, PaletteOutput), PaletteError> {
        let (width, height) = self.options.working_size;
        let resized = sampler::resize(
            &sampler::normalize(image),
            width,
            height,
            self.options.filter,
        );
        let output = self.run_samples_with(ColorSlice::try_from(&resized)?, cluster)?;
        Ok((resized, output))
    }

    /// Runs the pipeline on a decoded image.
    ///
    /// Returns the image resized to the working resolution alongside the palette output.
    ///
    /// # Errors
    /// See [`run_samples`](Self::run_samples). An empty image gives [`PaletteError::EmptyInput`].
    #[cfg(feature = "image")]
    pub fn run(&self, image: &DynamicImage) -> Result<(RgbImage, PaletteOutput), PaletteError> {
        self.run_with(image, kmeans::cluster)
    }

    /// Runs the pipeline on a decoded image, clustering in parallel.
    ///
    /// # Errors
    /// See [`run`](Self::run).
    #[cfg(all(feature = "image", feature = "threads"))]
    pub fn run_par(&self, image: &DynamicImage) -> Result<(RgbImage, PaletteOutput), PaletteError> {
        self.run_with(image, kmeans::cluster_par)
    }

    /// Decodes `bytes` and runs the pipeline on the decoded image.
    ///
    /// # Errors
    /// Returns [`PaletteError::Decode`] if `bytes` cannot be decoded,
    /// otherwise see [`run`](Self::run).
    #[cfg(feature = "image")]
    pub fn run_bytes(&self, bytes: &[u8]) -> Result<(RgbImage, PaletteOutput), PaletteError> {
        self.run(&sampler::decode(bytes)?)
    }

    /// Decodes `bytes` and runs the pipeline on the decoded image, clustering in parallel.
    ///
    /// # Errors
    /// See [`run_bytes`](Self::run_bytes).
    #[cfg(all(feature = "image", feature = "threads"))]
    pub fn run_bytes_par(&self, bytes: &[u8]) -> Result<(RgbImage, PaletteOutput), PaletteError> {
        self.run_par(&sampler::decode(bytes)?)
    }
}
