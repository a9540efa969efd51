use crate::error::AnalysisError;
use crate::image_source::frame::Frame;
use image::{imageops, DynamicImage};

/// Decodes uploaded bytes into a `width`x`height` frame.
///
/// The largest window with the target aspect ratio is cut from the center of
/// the source, then resized exactly to the target with a triangle filter.
/// Anything that is not a recognised image format is rejected.
pub fn decode(bytes: &[u8], width: u32, height: u32) -> Result<Frame, AnalysisError> {
    let format = image::guess_format(bytes)
        .map_err(|_| AnalysisError::UnsupportedImage("not an image file".to_string()))?;

    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| AnalysisError::UnsupportedImage(e.to_string()))?;

    Ok(fit(&image, width, height))
}

pub fn fit(image: &DynamicImage, width: u32, height: u32) -> Frame {
    let (x, y, crop_w, crop_h) = center_crop(image.width(), image.height(), width, height);
    let cropped = image.crop_imm(x, y, crop_w, crop_h);
    let resized = cropped.resize_exact(width, height, imageops::FilterType::Triangle);
    Frame::new(resized.to_rgb8())
}

/// Returns `(x, y, width, height)` of the centered crop window.
pub fn center_crop(src_w: u32, src_h: u32, dst_w: u32, dst_h: u32) -> (u32, u32, u32, u32) {
    if src_w == 0 || src_h == 0 || dst_w == 0 || dst_h == 0 {
        return (0, 0, src_w, src_h);
    }

    // compare src_w/src_h against dst_w/dst_h without floats
    let src_wide = src_w as u64 * dst_h as u64;
    let dst_wide = dst_w as u64 * src_h as u64;

    if src_wide > dst_wide {
        let crop_w = ((src_h as u64 * dst_w as u64) / dst_h as u64).max(1) as u32;
        ((src_w - crop_w) / 2, 0, crop_w, src_h)
    } else if src_wide < dst_wide {
        let crop_h = ((src_w as u64 * dst_h as u64) / dst_w as u64).max(1) as u32;
        (0, (src_h - crop_h) / 2, src_w, crop_h)
    } else {
        (0, 0, src_w, src_h)
    }
}
