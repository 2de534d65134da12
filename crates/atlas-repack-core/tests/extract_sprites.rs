use std::collections::HashMap;
use std::sync::Mutex;

use atlas_repack_core::diag::{Diagnostics, NullDiag};
use atlas_repack_core::error::RepackError;
use atlas_repack_core::extract::{extract_region, PLACEHOLDER_SIZE};
use atlas_repack_core::parse::parse_atlas;
use image::{Rgba, RgbaImage};

/// 100x100 gradient page: pixel (x, y) = (x, y, 0, 255).
fn gradient_page() -> RgbaImage {
    RgbaImage::from_fn(100, 100, |x, y| Rgba([x as u8, y as u8, 0, 255]))
}

fn images() -> HashMap<String, RgbaImage> {
    HashMap::from([("a.png".to_string(), gradient_page())])
}

const ATLAS: &str = "\
a.png
size: 100,100
r1
  rotate: false
  xy: 0, 0
  size: 10, 20
  orig: 10, 20
  offset: 0, 0
rot
  rotate: true
  xy: 10, 0
  size: 4, 2
oob
  xy: 95, 95
  size: 10, 10
degenerate
  xy: 0, 0
  size: 0, 0
";

#[derive(Default)]
struct CollectingDiag(Mutex<Vec<String>>);

impl Diagnostics for CollectingDiag {
    fn bounds_clamped(&self, name: &str, _requested: (i32, i32, u32, u32), _clamped: (u32, u32, u32, u32)) {
        self.0.lock().unwrap().push(format!("clamped:{name}"));
    }
    fn extract_fallback(&self, name: &str) {
        self.0.lock().unwrap().push(format!("fallback:{name}"));
    }
}

#[test]
fn unrotated_region_yields_exact_size_crop() {
    let atlas = parse_atlas(ATLAS, &NullDiag);
    let sprite = extract_region(&atlas, &images(), "r1", &NullDiag).unwrap();
    assert_eq!(sprite.image.dimensions(), (10, 20));
    assert_eq!(*sprite.image.get_pixel(3, 5), Rgba([3, 5, 0, 255]));
    assert_eq!(sprite.meta.orig, (10, 20));
    assert_eq!(sprite.meta.offset, (0, 0));
    assert!(!sprite.meta.rotate);
    assert_eq!(sprite.meta.index, -1);
}

#[test]
fn stored_rotation_swaps_dimensions_and_unrotates_ccw() {
    let atlas = parse_atlas(ATLAS, &NullDiag);
    let sprite = extract_region(&atlas, &images(), "rot", &NullDiag).unwrap();
    // Stored 4x2 at (10, 0); rotated 90 degrees CCW the crop becomes 2x4.
    assert_eq!(sprite.image.dimensions(), (2, 4));
    assert!(sprite.meta.rotate);
    // CCW mapping: out(x, y) = crop(w - 1 - y, x), crop(x, y) = page(10+x, y).
    assert_eq!(*sprite.image.get_pixel(0, 0), Rgba([13, 0, 0, 255]));
    assert_eq!(*sprite.image.get_pixel(1, 3), Rgba([10, 1, 0, 255]));
}

#[test]
fn out_of_bounds_rectangle_is_clamped() {
    let atlas = parse_atlas(ATLAS, &NullDiag);
    let diag = CollectingDiag::default();
    let sprite = extract_region(&atlas, &images(), "oob", &diag).unwrap();
    assert_eq!(sprite.image.dimensions(), (5, 5));
    assert_eq!(*sprite.image.get_pixel(0, 0), Rgba([95, 95, 0, 255]));
    assert!(diag.0.lock().unwrap().contains(&"clamped:oob".to_string()));
}

#[test]
fn degenerate_rectangle_becomes_placeholder() {
    let atlas = parse_atlas(ATLAS, &NullDiag);
    let diag = CollectingDiag::default();
    let sprite = extract_region(&atlas, &images(), "degenerate", &diag).unwrap();
    assert_eq!(
        sprite.image.dimensions(),
        (PLACEHOLDER_SIZE, PLACEHOLDER_SIZE)
    );
    assert_eq!(*sprite.image.get_pixel(0, 0), Rgba([255, 0, 0, 128]));
    assert!(diag
        .0
        .lock()
        .unwrap()
        .contains(&"fallback:degenerate".to_string()));
}

#[test]
fn unknown_region_is_a_lookup_error() {
    let atlas = parse_atlas(ATLAS, &NullDiag);
    let err = extract_region(&atlas, &images(), "missing", &NullDiag).unwrap_err();
    assert!(matches!(err, RepackError::RegionNotFound(name) if name == "missing"));
}

#[test]
fn missing_page_bitmap_is_an_error() {
    let atlas = parse_atlas(ATLAS, &NullDiag);
    let empty: HashMap<String, RgbaImage> = HashMap::new();
    let err = extract_region(&atlas, &empty, "r1", &NullDiag).unwrap_err();
    assert!(matches!(err, RepackError::MissingPageImage(page) if page == "a.png"));
}
