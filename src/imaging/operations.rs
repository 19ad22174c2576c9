//! High-level image operations.
//!
//! These functions combine calculations with backend execution: they take a
//! record's transform state, compute parameters, call the backend, and do the
//! in-memory composition onto the output frame.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{calculate_paste_origin, calculate_render_size};
use super::params::{FrameParams, RenderParams};
use crate::record::ImageRecord;
use image::{DynamicImage, Rgb, RgbImage, imageops};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Plan the render of a record without executing it.
pub fn plan_render(record: &ImageRecord) -> RenderParams {
    let (width, height) = calculate_render_size(record.frame_size(), record.scale());
    RenderParams {
        source: record.source_path().to_path_buf(),
        width,
        height,
        rotation: record.rotation(),
    }
}

/// Produce the adapted image for a record: resized by fit × scale, then rotated.
pub fn adapt_image(backend: &impl ImageBackend, record: &ImageRecord) -> Result<DynamicImage> {
    backend.render(&plan_render(record))
}

/// Drop any alpha channel by compositing over `background`.
///
/// Images without alpha are converted to RGB8 unchanged.
pub fn flatten(img: DynamicImage, background: [u8; 3]) -> RgbImage {
    if !img.color().has_alpha() {
        return img.into_rgb8();
    }
    let rgba = img.into_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let a = a as u32;
        let mix = |c: u8, bg: u8| ((c as u32 * a + bg as u32 * (255 - a) + 127) / 255) as u8;
        Rgb([
            mix(r, background[0]),
            mix(g, background[1]),
            mix(b, background[2]),
        ])
    })
}

/// Compose an adapted image into the fixed frame.
///
/// The image is placed at `(-offset_x, -offset_y)` on a canvas of the frame
/// colour; whatever falls outside the frame is clipped, uncovered areas keep
/// the background.
pub fn compose_frame(adapted: DynamicImage, offset: (f64, f64), frame: &FrameParams) -> RgbImage {
    let flat = flatten(adapted, frame.background);
    let mut canvas = RgbImage::from_pixel(frame.width, frame.height, Rgb(frame.background));
    let (x, y) = calculate_paste_origin(offset);
    imageops::replace(&mut canvas, &flat, x, y);
    canvas
}

/// Render a record exactly as it will appear on the frame.
///
/// Used for previews and by the export writer.
pub fn render_frame(
    backend: &impl ImageBackend,
    record: &ImageRecord,
    frame: &FrameParams,
) -> Result<RgbImage> {
    let adapted = adapt_image(backend, record)?;
    Ok(compose_frame(adapted, record.offset(), frame))
}
