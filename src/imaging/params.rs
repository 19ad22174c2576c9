//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what to render) and the [`backend`](super::backend) (which
//! does the pixel work), so tests can swap in a recording mock.
//!
//! ## Types
//!
//! - [`FrameParams`]: Output frame size and canvas colour.
//! - [`RenderParams`]: Source file, resize target, and rotation for one adapted image.

use std::path::PathBuf;

/// The fixed-size output window every exported picture is composed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameParams {
    pub width: u32,
    pub height: u32,
    /// RGB canvas colour, also used to flatten transparency.
    pub background: [u8; 3],
}

impl FrameParams {
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            background: [255, 255, 255],
        }
    }
}

/// Parameters for producing one adapted image.
///
/// The source is resized to exactly `width`×`height` (no aspect
/// preservation, the cover fit already chose the ratio), then turned
/// counter-clockwise by `rotation` degrees on an expanded canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderParams {
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
    pub rotation: i32,
}
