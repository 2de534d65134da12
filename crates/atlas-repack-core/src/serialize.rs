//! Sidecar text writer.
//!
//! Emits the same grammar `parse` consumes: page name line, the page
//! properties that are actually set, then each region as a name line plus an
//! indented property block. `index` is written only when it is a real
//! sequence number (>= 0). Parsing serializer output reproduces the model
//! field for field.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::model::{Atlas, Page, PackedRegion, Region};

/// Serialize the whole model back to sidecar text.
pub fn serialize_atlas(atlas: &Atlas) -> String {
    let mut out = String::new();
    for page in &atlas.pages {
        let _ = writeln!(out, "{}", page.name);
        if let Some((w, h)) = page.size {
            let _ = writeln!(out, "size: {}, {}", w, h);
        }
        if !page.format.is_empty() {
            let _ = writeln!(out, "format: {}", page.format);
        }
        if !page.filter.0.is_empty() && !page.filter.1.is_empty() {
            let _ = writeln!(out, "filter: {}, {}", page.filter.0, page.filter.1);
        }
        if !page.repeat.is_empty() {
            let _ = writeln!(out, "repeat: {}", page.repeat);
        }
        for region in &page.regions {
            out.push('\n');
            write_region(&mut out, region);
        }
        out.push('\n');
    }
    out
}

fn write_region(out: &mut String, region: &Region) {
    let _ = writeln!(out, "{}", region.name);
    let _ = writeln!(out, "  rotate: {}", region.rotate);
    let _ = writeln!(out, "  xy: {}, {}", region.xy.0, region.xy.1);
    let _ = writeln!(out, "  size: {}, {}", region.size.0, region.size.1);
    let _ = writeln!(out, "  orig: {}, {}", region.orig.0, region.orig.1);
    let _ = writeln!(out, "  offset: {}, {}", region.offset.0, region.offset.1);
    if region.index >= 0 {
        let _ = writeln!(out, "  index: {}", region.index);
    }
}

/// Build the single page describing a repacked composite.
///
/// Regions present in `placements` get their new coordinates, size and
/// rotation; every other region from the source model is carried over
/// unchanged, in original file order, so a partially repacked atlas still
/// describes all of its regions.
pub fn combined_page(
    source: &Atlas,
    page_name: &str,
    page_size: (u32, u32),
    placements: &[PackedRegion],
) -> Page {
    let by_name: HashMap<&str, &PackedRegion> =
        placements.iter().map(|p| (p.name.as_str(), p)).collect();

    let mut page = Page::new(page_name);
    page.size = Some(page_size);
    page.format = "RGBA8888".to_string();
    page.filter = ("Linear".to_string(), "Linear".to_string());
    page.repeat = "none".to_string();

    for src_page in &source.pages {
        for region in &src_page.regions {
            let region = match by_name.get(region.name.as_str()) {
                Some(p) => Region {
                    name: p.name.clone(),
                    xy: (p.x as i32, p.y as i32),
                    size: (p.width, p.height),
                    orig: p.orig,
                    offset: p.offset,
                    rotate: p.rotate,
                    index: p.index,
                },
                None => region.clone(),
            };
            page.regions.push(region);
        }
    }
    page
}

/// Serialize a repacked composite as sidecar text (see [`combined_page`]).
pub fn serialize_combined(
    source: &Atlas,
    page_name: &str,
    page_size: (u32, u32),
    placements: &[PackedRegion],
) -> String {
    let page = combined_page(source, page_name, page_size, placements);
    serialize_atlas(&Atlas { pages: vec![page] })
}
