//! Region extraction.
//!
//! Pure and read-only over the parsed model and the caller-provided page
//! bitmaps: each call crops one region out of its page, un-rotates it when
//! the sidecar stored it sideways, and returns the pixels with an immutable
//! metadata snapshot. Bad coordinates degrade (clamp, then placeholder)
//! instead of aborting, so one broken region never sinks a batch.

use std::collections::HashMap;

use image::{imageops, Rgba, RgbaImage};

use crate::compositing::rotate_ccw;
use crate::diag::Diagnostics;
use crate::error::{RepackError, Result};
use crate::model::Atlas;

/// Edge length of the placeholder sprite substituted for failed extractions.
pub const PLACEHOLDER_SIZE: u32 = 10;

/// Trim/sequence metadata carried alongside an extracted sprite, byte-for-byte
/// from the source region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteMeta {
    pub name: String,
    pub orig: (u32, u32),
    pub offset: (i32, i32),
    /// The source region's stored-rotation flag. Extraction already undid the
    /// rotation; this records what the sidecar said.
    pub rotate: bool,
    pub index: i32,
}

/// A cropped (and, if stored rotated, un-rotated) region ready for packing.
#[derive(Debug, Clone)]
pub struct ExtractedSprite {
    pub image: RgbaImage,
    pub meta: SpriteMeta,
}

fn placeholder() -> RgbaImage {
    // Half-transparent red so a surviving placeholder is visible in output.
    RgbaImage::from_pixel(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, Rgba([255, 0, 0, 128]))
}

/// Extract one region's pixels from its page bitmap.
///
/// Fails only when the name is unknown ([`RepackError::RegionNotFound`]) or
/// the page bitmap was never loaded ([`RepackError::MissingPageImage`]); a
/// rectangle outside the page bounds is clamped, and an unrecoverable crop
/// yields a placeholder sprite instead of an error.
pub fn extract_region(
    atlas: &Atlas,
    images: &HashMap<String, RgbaImage>,
    name: &str,
    diag: &dyn Diagnostics,
) -> Result<ExtractedSprite> {
    let (page, region) = atlas
        .find_region(name)
        .ok_or_else(|| RepackError::RegionNotFound(name.to_string()))?;
    let src = images
        .get(&page.name)
        .ok_or_else(|| RepackError::MissingPageImage(page.name.clone()))?;

    let meta = SpriteMeta {
        name: region.name.clone(),
        orig: region.orig,
        offset: region.offset,
        rotate: region.rotate,
        index: region.index,
    };

    let (iw, ih) = src.dimensions();
    let (mut x, mut y) = region.xy;
    let (mut w, mut h) = region.size;
    let out_of_bounds = x < 0
        || y < 0
        || x as i64 + w as i64 > iw as i64
        || y as i64 + h as i64 > ih as i64;
    if out_of_bounds {
        if iw == 0 || ih == 0 {
            diag.extract_fallback(name);
            return Ok(ExtractedSprite {
                image: placeholder(),
                meta,
            });
        }
        let cx = x.clamp(0, iw as i32 - 1);
        let cy = y.clamp(0, ih as i32 - 1);
        w = w.min(iw - cx as u32);
        h = h.min(ih - cy as u32);
        diag.bounds_clamped(
            name,
            (x, y, region.size.0, region.size.1),
            (cx as u32, cy as u32, w, h),
        );
        x = cx;
        y = cy;
    }
    if w == 0 || h == 0 {
        diag.extract_fallback(name);
        return Ok(ExtractedSprite {
            image: placeholder(),
            meta,
        });
    }

    let mut image = imageops::crop_imm(src, x as u32, y as u32, w, h).to_image();
    if region.rotate {
        image = rotate_ccw(&image);
    }
    Ok(ExtractedSprite { image, meta })
}
