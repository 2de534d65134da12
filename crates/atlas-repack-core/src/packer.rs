//! Guillotine packing of extracted sprites into one composite canvas.
//!
//! Free space is modelled as a binary tree: a leaf is a placeable free
//! rectangle, an internal node is a placed rectangle whose `right` and `down`
//! children partition the remaining space minus the padding margin. Lookup is
//! first-fit (right subtree probed before down), which trades packing density
//! for simplicity and strict determinism.

use image::RgbaImage;

use crate::compositing::{blit_rgba, rotate_ccw};
use crate::config::RepackConfig;
use crate::diag::Diagnostics;
use crate::error::{RepackError, Result};
use crate::extract::ExtractedSprite;
use crate::model::PackedRegion;

/// Edge length of the fallback canvas emitted when nothing could be placed.
pub const FALLBACK_CANVAS_SIZE: u32 = 64;

#[derive(Debug, Clone)]
struct Node {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
    used: bool,
    right: Option<usize>,
    down: Option<usize>,
}

/// Free-rectangle binary tree over the canvas, stored as an index arena.
struct PackTree {
    nodes: Vec<Node>,
    padding: u32,
}

impl PackTree {
    fn new(w: u32, h: u32, padding: u32) -> Self {
        Self {
            nodes: vec![Node {
                x: 0,
                y: 0,
                w,
                h,
                used: false,
                right: None,
                down: None,
            }],
            padding,
        }
    }

    /// First free node that holds a w x h rectangle, probing `right` before
    /// `down`. First match wins; no fit scoring.
    fn find(&self, idx: usize, w: u32, h: u32) -> Option<usize> {
        let n = &self.nodes[idx];
        if n.used {
            if let Some(found) = n.right.and_then(|r| self.find(r, w, h)) {
                return Some(found);
            }
            return n.down.and_then(|d| self.find(d, w, h));
        }
        if w <= n.w && h <= n.h {
            Some(idx)
        } else {
            None
        }
    }

    /// Mark the node used by a w x h placement and carve the leftover space
    /// into a full-width `down` strip and a placement-height `right` strip,
    /// both shifted past the padding margin. Returns the placement origin.
    fn split(&mut self, idx: usize, w: u32, h: u32) -> (u32, u32) {
        let pad = self.padding;
        let (x, y, nw, nh) = {
            let n = &self.nodes[idx];
            (n.x, n.y, n.w, n.h)
        };
        let down = Node {
            x,
            y: y + h + pad,
            w: nw,
            h: nh.saturating_sub(h.saturating_add(pad)),
            used: false,
            right: None,
            down: None,
        };
        let right = Node {
            x: x + w + pad,
            y,
            w: nw.saturating_sub(w.saturating_add(pad)),
            h,
            used: false,
            right: None,
            down: None,
        };
        let di = self.nodes.len();
        self.nodes.push(down);
        let ri = self.nodes.len();
        self.nodes.push(right);
        let n = &mut self.nodes[idx];
        n.used = true;
        n.down = Some(di);
        n.right = Some(ri);
        (x, y)
    }
}

/// Result of one packing run.
pub struct PackResult {
    /// The composite canvas, trimmed to the placement bounding box plus one
    /// padding unit on each axis.
    pub image: RgbaImage,
    /// Placements in placement order.
    pub placed: Vec<PackedRegion>,
    /// Names of sprites no free node could hold.
    pub skipped: Vec<String>,
}

/// Pack extracted sprites into a single composite canvas.
///
/// Input order does not matter: sprites are re-sorted by area (desc), then by
/// longest side (desc), then by name, so identical input sets always produce
/// identical placements. Sprites that fit neither orientation are skipped and
/// reported; an entirely empty placement recovers with a minimal fallback
/// canvas instead of failing the batch.
pub fn pack_sprites(
    mut sprites: Vec<ExtractedSprite>,
    cfg: &RepackConfig,
    diag: &dyn Diagnostics,
) -> Result<PackResult> {
    cfg.validate()?;
    if sprites.is_empty() {
        return Err(RepackError::Empty);
    }
    let pad = cfg.padding;

    sprites.sort_by(|a, b| {
        let (aw, ah) = a.image.dimensions();
        let (bw, bh) = b.image.dimensions();
        (bw as u64 * bh as u64)
            .cmp(&(aw as u64 * ah as u64))
            .then_with(|| bw.max(bh).cmp(&aw.max(ah)))
            .then_with(|| a.meta.name.cmp(&b.meta.name))
    });

    let mut total_area = 0u64;
    let mut max_w = 0u32;
    let mut max_h = 0u32;
    for s in &sprites {
        let (w, h) = s.image.dimensions();
        total_area += ((w + pad) as u64) * ((h + pad) as u64);
        max_w = max_w.max(w);
        max_h = max_h.max(h);
    }
    let initial = (total_area as f64 * cfg.slack).sqrt() as u32;
    let mut canvas_w = initial.max(max_w + pad);
    let mut canvas_h = initial.max(max_h + pad);
    if let Some(cap) = cfg.max_dim {
        canvas_w = canvas_w.min(cap);
        canvas_h = canvas_h.min(cap);
    }

    let mut canvas = RgbaImage::new(canvas_w, canvas_h);
    let mut tree = PackTree::new(canvas_w, canvas_h, pad);
    let mut placed: Vec<PackedRegion> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();

    for sprite in sprites {
        let (w, h) = sprite.image.dimensions();
        let direct = tree.find(0, w, h);
        let (idx, image, rotated) = match direct {
            Some(idx) => (idx, sprite.image, false),
            None => {
                let swapped = if cfg.allow_rotation {
                    tree.find(0, h, w)
                } else {
                    None
                };
                match swapped {
                    Some(idx) => (idx, rotate_ccw(&sprite.image), true),
                    None => {
                        diag.unplaced(&sprite.meta.name, w, h);
                        skipped.push(sprite.meta.name);
                        continue;
                    }
                }
            }
        };
        let (pw, ph) = image.dimensions();
        let (x, y) = tree.split(idx, pw, ph);
        blit_rgba(&image, &mut canvas, x, y);
        placed.push(PackedRegion {
            name: sprite.meta.name,
            x,
            y,
            width: pw,
            height: ph,
            rotate: rotated,
            orig: sprite.meta.orig,
            offset: sprite.meta.offset,
            index: sprite.meta.index,
        });
    }

    if placed.is_empty() {
        diag.composite_fallback();
        return Ok(PackResult {
            image: RgbaImage::new(FALLBACK_CANVAS_SIZE, FALLBACK_CANVAS_SIZE),
            placed,
            skipped,
        });
    }

    // Trim to the placement bounding box plus one padding unit. The trimmed
    // extent can poke past the allocated canvas by up to `pad`; the overhang
    // stays transparent.
    let max_x = placed.iter().map(|p| p.x + p.width).max().unwrap_or(0);
    let max_y = placed.iter().map(|p| p.y + p.height).max().unwrap_or(0);
    let mut trimmed = RgbaImage::new(max_x + pad, max_y + pad);
    blit_rgba(&canvas, &mut trimmed, 0, 0);

    Ok(PackResult {
        image: trimmed,
        placed,
        skipped,
    })
}
