//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the tool needs
//! from an image library: identify, render, and write_bmp.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate with `imageproc` for free-angle rotation.

use super::params::RenderParams;
use image::{DynamicImage, RgbImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Trait for image processing backends.
///
/// Everything above this trait (records, session, export) is
/// backend-agnostic.
pub trait ImageBackend {
    /// Get native image dimensions without a full decode where possible.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode, resize, and rotate a source into its adapted image.
    fn render(&self, params: &RenderParams) -> Result<DynamicImage, BackendError>;

    /// Write a composed frame as an uncompressed BMP.
    fn write_bmp(&self, image: &RgbImage, path: &Path) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::calculations::calculate_rotated_bounds;
    use image::{Rgba, RgbaImage};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Mock backend that records operations instead of touching pixels on disk.
    ///
    /// `identify` answers from a per-path table (falling back to
    /// `default_dimensions`); `render` returns an opaque grey image of the
    /// rotated size; `write_bmp` only records.
    pub struct MockBackend {
        pub dimensions: HashMap<PathBuf, Dimensions>,
        pub default_dimensions: Option<Dimensions>,
        pub operations: RefCell<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Identify(String),
        Render {
            source: String,
            width: u32,
            height: u32,
            rotation: i32,
        },
        WriteBmp {
            output: String,
            width: u32,
            height: u32,
        },
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self {
                dimensions: HashMap::new(),
                default_dimensions: None,
                operations: RefCell::new(Vec::new()),
            }
        }

        /// Every path identifies as `width`×`height`.
        pub fn uniform(width: u32, height: u32) -> Self {
            Self {
                default_dimensions: Some(Dimensions { width, height }),
                ..Self::new()
            }
        }

        pub fn with_dimensions(mut self, path: impl Into<PathBuf>, width: u32, height: u32) -> Self {
            self.dimensions.insert(path.into(), Dimensions { width, height });
            self
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.borrow().clone()
        }

        pub fn written_files(&self) -> Vec<String> {
            self.operations
                .borrow()
                .iter()
                .filter_map(|op| match op {
                    RecordedOp::WriteBmp { output, .. } => Some(output.clone()),
                    _ => None,
                })
                .collect()
        }
    }

    impl ImageBackend for MockBackend {
        fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
            self.operations
                .borrow_mut()
                .push(RecordedOp::Identify(path.to_string_lossy().to_string()));

            self.dimensions
                .get(path)
                .copied()
                .or(self.default_dimensions)
                .ok_or_else(|| BackendError::ProcessingFailed("No mock dimensions".to_string()))
        }

        fn render(&self, params: &RenderParams) -> Result<DynamicImage, BackendError> {
            self.operations.borrow_mut().push(RecordedOp::Render {
                source: params.source.to_string_lossy().to_string(),
                width: params.width,
                height: params.height,
                rotation: params.rotation,
            });
            let (w, h) = calculate_rotated_bounds((params.width, params.height), params.rotation);
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                w,
                h,
                Rgba([128, 128, 128, 255]),
            )))
        }

        fn write_bmp(&self, image: &RgbImage, path: &Path) -> Result<(), BackendError> {
            self.operations.borrow_mut().push(RecordedOp::WriteBmp {
                output: path.to_string_lossy().to_string(),
                width: image.width(),
                height: image.height(),
            });
            Ok(())
        }
    }

    #[test]
    fn mock_identify_prefers_per_path_table() {
        let backend = MockBackend::uniform(800, 600).with_dimensions("/a.jpg", 100, 200);

        let a = backend.identify(Path::new("/a.jpg")).unwrap();
        let b = backend.identify(Path::new("/b.jpg")).unwrap();
        assert_eq!(a.as_tuple(), (100, 200));
        assert_eq!(b.as_tuple(), (800, 600));

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], RecordedOp::Identify(p) if p == "/a.jpg"));
    }

    #[test]
    fn mock_identify_without_dimensions_errors() {
        let backend = MockBackend::new();
        assert!(backend.identify(Path::new("/x.jpg")).is_err());
    }

    #[test]
    fn mock_render_swaps_axes_for_quarter_turn() {
        let backend = MockBackend::new();
        let img = backend
            .render(&RenderParams {
                source: "/a.jpg".into(),
                width: 600,
                height: 800,
                rotation: 90,
            })
            .unwrap();
        assert_eq!((img.width(), img.height()), (800, 600));
        assert!(matches!(
            &backend.get_operations()[0],
            RecordedOp::Render {
                width: 600,
                height: 800,
                rotation: 90,
                ..
            }
        ));
    }

    #[test]
    fn mock_records_write() {
        let backend = MockBackend::new();
        backend
            .write_bmp(&RgbImage::new(800, 480), Path::new("/out/000_x.bmp"))
            .unwrap();
        assert_eq!(backend.written_files(), vec!["/out/000_x.bmp".to_string()]);
    }
}
