use crate::error::{PackerError, Result};
use crate::packer::RectanglePacker;
use image::RgbaImage;
use std::borrow::Borrow;

/// Blit `src` into `canvas` with its top-left at (dx, dy), optionally rotated
/// 90° clockwise. Pixels falling outside the canvas are dropped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32, rotated: bool) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    // destination size swaps when rotated
    let (rw, rh) = if rotated { (sh, sw) } else { (sw, sh) };

    for yy in 0..rh {
        for xx in 0..rw {
            if dx + xx >= cw || dy + yy >= ch {
                continue;
            }
            let (ix, iy) = if rotated {
                (yy, sh - 1 - xx)
            } else {
                (xx, yy)
            };
            canvas.put_pixel(dx + xx, dy + yy, *src.get_pixel(ix, iy));
        }
    }
}

/// Renders every packed image (taken from its user tag) into one transparent
/// canvas of the packed size.
///
/// Fails with `NotPacked` before a successful pack, and with `InvalidInput`
/// if a tag's pixel size differs from the size it was registered with.
pub fn compose_rgba<T: Borrow<RgbaImage>>(packer: &RectanglePacker<T>) -> Result<RgbaImage> {
    if !packer.is_packed() {
        return Err(PackerError::NotPacked);
    }
    let (w, h) = packer.packed_size();
    let mut canvas = RgbaImage::new(w, h);
    for img in packer.iter_packed() {
        let src: &RgbaImage = img.user_tag.borrow();
        if src.dimensions() != (img.width, img.height) {
            return Err(PackerError::InvalidInput(format!(
                "image '{}' is {}x{} but was registered as {}x{}",
                img.name,
                src.width(),
                src.height(),
                img.width,
                img.height
            )));
        }
        blit_rgba(src, &mut canvas, img.x, img.y, img.rotated);
    }
    Ok(canvas)
}
