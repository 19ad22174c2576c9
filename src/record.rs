//! Per-image edit state.
//!
//! An [`ImageRecord`] is everything the tool remembers about one loaded
//! photo: where it lives, how it is fitted, panned, zoomed, and turned, and
//! which day (if any) it is pinned to. Its serde shape is the `backup.json`
//! schema, field for field:
//!
//! ```json
//! {"x": 800, "y": 600, "x_offset": 0.0, "y_offset": 60.0, "rotate": 0,
//!  "scale": 1.0, "date": "05.06.2024", "filename": "dawn.jpg",
//!  "original_filepath": "/photos/dawn.jpg"}
//! ```
//!
//! Geometry mutators keep the cover-fit invariant: whenever the rotation
//! changes the fit is recomputed from the native dimensions. Dates are only
//! changed through the [`RecordStore`](crate::store::RecordStore), which owns
//! the uniqueness rule.

use crate::imaging::{CoverFit, Dimensions, FrameParams, calculate_cover_fit};
use crate::types::FrameDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(rename = "x")]
    frame_width: u32,
    #[serde(rename = "y")]
    frame_height: u32,
    #[serde(rename = "x_offset")]
    offset_x: f64,
    #[serde(rename = "y_offset")]
    offset_y: f64,
    #[serde(rename = "rotate")]
    rotation: i32,
    scale: f64,
    #[serde(rename = "date")]
    assigned_date: Option<FrameDate>,
    #[serde(rename = "filename")]
    file_name: String,
    #[serde(rename = "original_filepath")]
    source_path: PathBuf,
}

/// Base name of a path, used as the record identity.
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

impl ImageRecord {
    /// Fresh record: upright, unzoomed, undated, centred cover fit.
    pub fn new(source_path: &Path, native: Dimensions, frame: &FrameParams) -> Self {
        let mut record = Self {
            frame_width: 0,
            frame_height: 0,
            offset_x: 0.0,
            offset_y: 0.0,
            rotation: 0,
            scale: 1.0,
            assigned_date: None,
            file_name: file_name_of(source_path),
            source_path: source_path.to_path_buf(),
        };
        record.refit(native, frame);
        record
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Cover-fit size before zoom, in source orientation.
    pub fn frame_size(&self) -> (u32, u32) {
        (self.frame_width, self.frame_height)
    }

    pub fn offset(&self) -> (f64, f64) {
        (self.offset_x, self.offset_y)
    }

    pub fn rotation(&self) -> i32 {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn assigned_date(&self) -> Option<FrameDate> {
        self.assigned_date
    }

    /// Point the record at a new location of the same file.
    pub fn relink(&mut self, source_path: &Path) {
        self.source_path = source_path.to_path_buf();
    }

    /// Pan. No clamping: panning past an edge shows background.
    pub fn change_offset(&mut self, dx: f64, dy: f64) {
        self.offset_x += dx;
        self.offset_y += dy;
    }

    /// Zoom by `delta`, anchored at the frame centre.
    ///
    /// Returns `false` and leaves the record untouched when the new scale
    /// would not stay above `floor`.
    pub fn change_scale(&mut self, delta: f64, floor: f64) -> bool {
        let scale = self.scale + delta;
        if !scale.is_finite() || scale <= floor {
            return false;
        }
        self.scale = scale;
        self.offset_x += self.frame_width as f64 / 2.0 * delta;
        self.offset_y += self.frame_height as f64 / 2.0 * delta;
        true
    }

    /// Turn by `delta` degrees (positive is counter-clockwise).
    ///
    /// Zoom and pan are discarded: the fit is recomputed for the new
    /// orientation.
    pub fn rotate(&mut self, delta: i32, native: Dimensions, frame: &FrameParams) {
        self.rotation = self.rotation.wrapping_add(delta);
        self.scale = 1.0;
        self.refit(native, frame);
    }

    /// Back to upright, unzoomed, centred. The date is kept.
    pub fn reset(&mut self, native: Dimensions, frame: &FrameParams) {
        self.rotation = 0;
        self.scale = 1.0;
        self.refit(native, frame);
    }

    pub(crate) fn set_assigned_date(&mut self, date: Option<FrameDate>) {
        self.assigned_date = date;
    }

    fn refit(&mut self, native: Dimensions, frame: &FrameParams) {
        let CoverFit {
            width,
            height,
            offset_x,
            offset_y,
        } = calculate_cover_fit(native.as_tuple(), self.rotation, frame.size());
        self.frame_width = width;
        self.frame_height = height;
        self.offset_x = offset_x;
        self.offset_y = offset_y;
    }
}
