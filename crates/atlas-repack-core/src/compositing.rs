use image::{imageops, RgbaImage};

/// Copy all of `src` into `canvas` with its top-left at (dx, dy).
/// Pixels that would land outside the canvas are dropped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    for yy in 0..sh {
        if dy + yy >= ch {
            break;
        }
        for xx in 0..sw {
            if dx + xx >= cw {
                break;
            }
            canvas.put_pixel(dx + xx, dy + yy, *src.get_pixel(xx, yy));
        }
    }
}

/// Rotate a sprite 90 degrees counter-clockwise.
///
/// This is the one rotation direction the sidecar format uses, both to
/// restore a stored-rotated region to its logical orientation and to turn a
/// sprite that only fits the canvas sideways.
pub fn rotate_ccw(src: &RgbaImage) -> RgbaImage {
    imageops::rotate270(src)
}
