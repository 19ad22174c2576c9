//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, BMP) | `image` crate (pure Rust decoders) |
//! | Identify | `image::image_dimensions` (header only) |
//! | Resize | `DynamicImage::resize_exact` with `CatmullRom` (bicubic) |
//! | Quarter-turn rotation | `DynamicImage::rotate90/180/270` (lossless) |
//! | Free-angle rotation | `imageproc::geometric_transformations::rotate_about_center` |
//! | Encode → BMP | `image::codecs::bmp` via `ImageBuffer::write_to` (24-bit, uncompressed) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{calculate_rotated_bounds, normalize_rotation};
use super::params::RenderParams;
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbImage, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use std::io::BufWriter;
use std::path::Path;

/// Input extensions and the formats their decoders are compiled in for.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("bmp", ImageFormat::Bmp),
];

/// Returns the image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> Vec<&'static str> {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Turn an image counter-clockwise by `degrees`, growing the canvas to fit.
///
/// Quarter turns move pixels exactly. Any other angle is drawn onto a
/// transparent canvas of the rotated bounds and resampled bilinearly, so the
/// uncovered corners stay transparent for the caller to flatten.
fn rotate_expanded(img: DynamicImage, degrees: i32) -> DynamicImage {
    match normalize_rotation(degrees) {
        0 => img,
        90 => img.rotate270(),
        180 => img.rotate180(),
        270 => img.rotate90(),
        d => {
            let rgba = img.to_rgba8();
            let (bw, bh) = calculate_rotated_bounds((rgba.width(), rgba.height()), d);
            let mut canvas = RgbaImage::from_pixel(bw, bh, Rgba([0, 0, 0, 0]));
            let x = (bw as i64 - rgba.width() as i64) / 2;
            let y = (bh as i64 - rgba.height() as i64) / 2;
            imageops::replace(&mut canvas, &rgba, x, y);

            // rotate_about_center turns clockwise
            let theta = -(d as f32).to_radians();
            DynamicImage::ImageRgba8(rotate_about_center(
                &canvas,
                theta,
                Interpolation::Bilinear,
                Rgba([0, 0, 0, 0]),
            ))
        }
    }
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| {
            BackendError::ProcessingFailed(format!(
                "Failed to read dimensions of {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Dimensions { width, height })
    }

    fn render(&self, params: &RenderParams) -> Result<DynamicImage, BackendError> {
        let img = load_image(&params.source)?;
        tracing::debug!(
            "Rendering {} {}x{} -> {}x{} rotated {}°",
            params.source.display(),
            img.width(),
            img.height(),
            params.width,
            params.height,
            params.rotation
        );
        let resized = img.resize_exact(params.width, params.height, FilterType::CatmullRom);
        Ok(rotate_expanded(resized, params.rotation))
    }

    fn write_bmp(&self, image: &RgbImage, path: &Path) -> Result<(), BackendError> {
        let file = std::fs::File::create(path).map_err(BackendError::Io)?;
        let mut writer = BufWriter::new(file);
        image
            .write_to(&mut writer, ImageFormat::Bmp)
            .map_err(|e| {
                BackendError::ProcessingFailed(format!(
                    "BMP encode failed for {}: {}",
                    path.display(),
                    e
                ))
            })
    }
}
