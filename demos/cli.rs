#![deny(unsafe_code)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

use std::{fmt::Display, num::NonZeroU32, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use image::imageops::FilterType;
use log::info;
use swatchify::{kmeans::KmeansOptions, PaletteOptions, PalettePipeline};

#[derive(Copy, Clone, ValueEnum)]
enum CliFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<CliFilter> for FilterType {
    fn from(value: CliFilter) -> Self {
        match value {
            CliFilter::Nearest => FilterType::Nearest,
            CliFilter::Triangle => FilterType::Triangle,
            CliFilter::CatmullRom => FilterType::CatmullRom,
            CliFilter::Gaussian => FilterType::Gaussian,
            CliFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl Display for CliFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CliFilter::Nearest => "nearest",
                CliFilter::Triangle => "triangle",
                CliFilter::CatmullRom => "catmull-rom",
                CliFilter::Gaussian => "gaussian",
                CliFilter::Lanczos3 => "lanczos3",
            }
        )
    }
}

/// Extract a dominant color palette from an image.
#[derive(Parser)]
#[command(author, version, about)]
struct Options {
    /// Number of palette colors
    #[arg(short, long, default_value_t = 5)]
    k: usize,

    /// Working resolution (width and height) used for clustering
    #[arg(long, default_value_t = 200)]
    working_size: u32,

    /// Filter used to resize the image to the working resolution
    #[arg(long, default_value_t = CliFilter::Triangle)]
    filter: CliFilter,

    /// Width of the palette strip in pixels
    #[arg(long, default_value_t = 300)]
    strip_width: u32,

    /// Height of the palette strip in pixels
    #[arg(long, default_value_t = 50)]
    strip_height: u32,

    /// Column interval between sampled hex codes
    #[arg(long, default_value_t = NonZeroU32::MIN.saturating_add(59))]
    stride: NonZeroU32,

    /// Maximum number of k-means iterations
    #[arg(long, default_value_t = 300)]
    max_iterations: u32,

    /// Seed for reproducible palettes
    #[arg(long)]
    seed: Option<u64>,

    /// Cluster on a single thread
    #[arg(long)]
    single_threaded: bool,

    /// Where to write the palette strip
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Where to write the resized input image
    #[arg(long)]
    resized: Option<PathBuf>,

    /// The image to extract a palette from
    input: PathBuf,
}

fn main() -> Result<()> {
    pretty_env_logger::init_timed();

    let Options {
        k,
        working_size,
        filter,
        strip_width,
        strip_height,
        stride,
        max_iterations,
        seed,
        single_threaded,
        output,
        resized,
        input,
    } = Options::parse();

    let options = PaletteOptions::new()
        .palette_size(k)
        .working_size(working_size, working_size)
        .filter(filter.into())
        .strip_size(strip_width, strip_height)
        .stride(stride)
        .kmeans(
            KmeansOptions::new()
                .max_iterations(max_iterations)
                .seed(seed),
        );
    let pipeline = PalettePipeline::new(options);

    let bytes = std::fs::read(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let time = std::time::Instant::now();
    let result = if single_threaded {
        pipeline.run_bytes(&bytes)
    } else {
        pipeline.run_bytes_par(&bytes)
    };
    let (image, palette) = result
        .with_context(|| format!("failed to extract a palette from {}", input.display()))?;
    info!("palette extraction took {}ms", time.elapsed().as_millis());

    for code in &palette.hex_codes {
        println!("{code}");
    }

    if let Some(path) = resized {
        image
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote resized image to {}", path.display());
    }

    if let Some(path) = output {
        palette
            .strip
            .into_rgbimage()
            .save(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote palette strip to {}", path.display());
    }

    Ok(())
}
