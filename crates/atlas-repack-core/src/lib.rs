//! Core library for repacking sprite atlas regions.
//!
//! - Parses the line-oriented sidecar format into a Page/Region model
//! - Extracts region pixels (with stored-rotation handling) from loaded pages
//! - Repacks a chosen subset into one composite via guillotine bin packing
//! - Serializes the new layout back to sidecar text, untouched regions intact
//!
//! Quick example:
//! ```ignore
//! use atlas_repack_core::prelude::*;
//! # fn main() -> anyhow::Result<()> {
//! let diag = TracingDiag;
//! let atlas = parse_file("sprites.atlas", &diag)?;
//! let images = load_pages_somehow(&atlas)?; // HashMap<String, RgbaImage>
//! let names = atlas.region_names();
//! let cfg = RepackConfig::default();
//! let out = repack_atlas(&atlas, &images, &names, "combined.png", &cfg, &diag)?;
//! out.image.save("combined.png")?;
//! std::fs::write("combined.atlas", out.atlas_text)?;
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod diag;
pub mod error;
pub mod export;
pub mod extract;
pub mod model;
pub mod packer;
pub mod parse;
pub mod pipeline;
pub mod serialize;

pub use config::*;
pub use diag::*;
pub use error::*;
pub use export::*;
pub use extract::*;
pub use model::*;
pub use packer::*;
pub use parse::{parse_atlas, parse_file, AtlasParser};
pub use pipeline::*;
pub use serialize::*;

/// Convenience prelude for common types and functions.
pub mod prelude {
    pub use crate::config::{RepackConfig, RepackConfigBuilder};
    pub use crate::diag::{Diagnostics, NullDiag, TracingDiag};
    pub use crate::error::{RepackError, Result};
    pub use crate::extract::{extract_region, ExtractedSprite, SpriteMeta};
    pub use crate::model::{Atlas, PackedRegion, Page, Region};
    pub use crate::packer::{pack_sprites, PackResult};
    pub use crate::parse::{parse_atlas, parse_file};
    pub use crate::pipeline::{repack_atlas, RepackOutput};
    pub use crate::serialize::{combined_page, serialize_atlas, serialize_combined};
}
