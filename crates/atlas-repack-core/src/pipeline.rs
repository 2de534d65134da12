use std::collections::{HashMap, HashSet};

use image::RgbaImage;
use tracing::instrument;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::RepackConfig;
use crate::diag::Diagnostics;
use crate::error::{RepackError, Result};
use crate::extract::{extract_region, ExtractedSprite};
use crate::model::{Atlas, PackedRegion};
use crate::packer::pack_sprites;
use crate::serialize::serialize_combined;

/// Output of a repacking run: the composite bitmap, its placements, and the
/// new sidecar text describing them (untouched regions included).
#[derive(Debug)]
pub struct RepackOutput {
    pub image: RgbaImage,
    pub placed: Vec<PackedRegion>,
    /// Requested names that ended up outside the composite: unknown regions
    /// plus sprites no free node could hold.
    pub skipped: Vec<String>,
    pub atlas_text: String,
}

/// Repack the named regions of `atlas` into one composite page.
///
/// Extraction is read-only per region and runs in parallel when the
/// `parallel` feature is enabled; placement stays sequential because each
/// placement mutates the shared free-space tree. An unknown region name is
/// skipped with a diagnostic; a missing page bitmap aborts this unit of work.
/// `page_name` becomes the bitmap filename in the emitted sidecar.
#[instrument(skip_all, fields(requested = names.len()))]
pub fn repack_atlas(
    atlas: &Atlas,
    images: &HashMap<String, RgbaImage>,
    names: &[String],
    page_name: &str,
    cfg: &RepackConfig,
    diag: &dyn Diagnostics,
) -> Result<RepackOutput> {
    cfg.validate()?;

    // First occurrence wins for duplicate requests, mirroring region lookup.
    let mut seen: HashSet<&str> = HashSet::new();
    let unique: Vec<&String> = names.iter().filter(|n| seen.insert(n.as_str())).collect();

    #[cfg(feature = "parallel")]
    let results: Vec<Result<ExtractedSprite>> = unique
        .par_iter()
        .map(|name| extract_region(atlas, images, name.as_str(), diag))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<Result<ExtractedSprite>> = unique
        .iter()
        .map(|name| extract_region(atlas, images, name.as_str(), diag))
        .collect();

    let mut sprites: Vec<ExtractedSprite> = Vec::with_capacity(results.len());
    let mut skipped: Vec<String> = Vec::new();
    for res in results {
        match res {
            Ok(sprite) => sprites.push(sprite),
            Err(RepackError::RegionNotFound(name)) => {
                diag.lookup_failed(&name);
                skipped.push(name);
            }
            Err(e) => return Err(e),
        }
    }
    if sprites.is_empty() {
        return Err(RepackError::Empty);
    }

    let result = pack_sprites(sprites, cfg, diag)?;
    skipped.extend(result.skipped);

    let atlas_text = serialize_combined(atlas, page_name, result.image.dimensions(), &result.placed);
    Ok(RepackOutput {
        image: result.image,
        placed: result.placed,
        skipped,
        atlas_text,
    })
}
