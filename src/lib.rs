//! A library to extract a small dominant color palette from a photograph.
//!
//! `swatchify` reduces the pixels of an image to a fixed number of colors using k-means
//! clustering, renders those colors as a strip of vertical bands, and samples the strip
//! for a list of hex color codes.
//!
//! The stages run strictly in order:
//! 1. [`sampler`]: decode the image, normalize it to 8-bit sRGB, and resize it to a small working
//!    resolution. The pixels are then used as color samples via [`ColorSlice`].
//! 2. [`kmeans`]: cluster the color samples into a [`Palette`].
//! 3. [`strip`]: render the palette as a [`PaletteStrip`].
//! 4. [`hex`]: sample the strip at a fixed column stride for hex codes.
//!
//! # Features
//! To reduce dependencies and compile times, `swatchify` has several `cargo` features
//! that can be turned off or on:
//! - `threads`: exposes parallel versions of the clustering functions via [`rayon`].
//! - `image`: enables decoding and resizing through the [`image`] crate.
//!
//! # High-Level API
//! To get started with the high-level API, see [`PalettePipeline`].
//! ```no_run
//! # use swatchify::{kmeans::KmeansOptions, PaletteOptions, PalettePipeline};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?;
//!
//! let pipeline = PalettePipeline::new(
//!     PaletteOptions::new()
//!         .palette_size(5)
//!         .kmeans(KmeansOptions::new().seed(Some(42))),
//! );
//!
//! let (resized, output) = pipeline.run_par(&img)?;
//! println!("{}", output.hex_codes.join(", "));
//! output.strip.into_rgbimage().save("palette.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! Note that some of the options and functions above require certain features to be enabled.

#![deny(unsafe_code)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod error;
mod types;

pub mod hex;
pub mod kmeans;
pub mod strip;

#[cfg(feature = "image")]
pub mod sampler;

pub use api::*;
pub use error::PaletteError;
pub use strip::PaletteStrip;
pub use types::*;

/// The maximum supported number of color samples is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;
