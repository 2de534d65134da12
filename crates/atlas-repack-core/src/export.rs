use serde_json::{json, Value};

use crate::pipeline::RepackOutput;

/// Flatten a repack result as JSON, frames keyed by region name.
/// Shape: `{ frames: { name: { frame, rotated, orig, offset, index } }, meta }`.
pub fn to_json_hash(out: &RepackOutput, page_name: &str) -> Value {
    let mut frames = serde_json::Map::new();
    for p in &out.placed {
        let frame = json!({"x": p.x, "y": p.y, "w": p.width, "h": p.height});
        frames.insert(
            p.name.clone(),
            json!({
                "frame": frame,
                "rotated": p.rotate,
                "orig": {"w": p.orig.0, "h": p.orig.1},
                "offset": {"x": p.offset.0, "y": p.offset.1},
                "index": p.index,
            }),
        );
    }
    let (w, h) = out.image.dimensions();
    json!({
        "frames": frames,
        "meta": {
            "app": "atlas-repack",
            "version": env!("CARGO_PKG_VERSION"),
            "page": page_name,
            "pageSize": {"w": w, "h": h},
            "skipped": out.skipped,
        }
    })
}
