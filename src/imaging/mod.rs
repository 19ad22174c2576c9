//! Image geometry and rendering.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **Adapt** (resize + rotate) | `resize_exact` + quarter turns or `imageproc` rotation |
//! | **Compose** | alpha flatten + `imageops::replace` onto the frame canvas |
//! | **Write** | BMP encoder |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for cover-fit and frame math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    CoverFit, calculate_cover_fit, calculate_paste_origin, calculate_render_size,
    calculate_rotated_bounds, is_sideways, normalize_rotation,
};
pub use operations::{adapt_image, compose_frame, flatten, plan_render, render_frame};
pub use params::{FrameParams, RenderParams};
pub use rust_backend::{RustBackend, supported_input_extensions};
