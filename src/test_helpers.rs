//! Shared test utilities for the epaper-frame test suite.
//!
//! Synthetic source images and small filesystem helpers. Images are
//! generated with the `image` crate so tests never depend on fixture files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = tempfile::TempDir::new().unwrap();
//! let photo = tmp.path().join("dawn.jpg");
//! create_test_jpeg(&photo, 400, 300);
//! ```

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

// =========================================================================
// Synthetic images
// =========================================================================

/// Write a `width`×`height` JPEG with a horizontal gradient.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, _| {
        let v = (x * 255 / width.max(1)) as u8;
        Rgb([v, 128, 255 - v])
    });
    img.save(path).unwrap();
}

/// Write a solid-colour image in whatever format the extension names.
pub fn create_solid_image(path: &Path, width: u32, height: u32, colour: [u8; 3]) {
    RgbImage::from_pixel(width, height, Rgb(colour))
        .save(path)
        .unwrap();
}

/// Write an RGBA PNG filled with mid grey at the given `alpha`.
pub fn create_test_png_rgba(path: &Path, width: u32, height: u32, alpha: u8) {
    RgbaImage::from_pixel(width, height, Rgba([100, 100, 100, alpha]))
        .save(path)
        .unwrap();
}

// =========================================================================
// Filesystem
// =========================================================================

/// Write `contents` to `path`, creating parent directories.
pub fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}
