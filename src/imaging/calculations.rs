//! Pure calculation functions for frame geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Result of fitting a source image over the output frame.
///
/// `width`/`height` are the size the *unrotated* source is resized to. The
/// offsets are the crop origin that centres the overflowing axis inside the
/// frame, measured in the displayed (rotated) orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoverFit {
    pub width: u32,
    pub height: u32,
    pub offset_x: f64,
    pub offset_y: f64,
}

/// Whether a rotation turns the picture on its side.
///
/// Any angle that is not a multiple of 180 counts, so 45° fits like 90°.
pub fn is_sideways(rotation: i32) -> bool {
    rotation % 180 != 0
}

/// Normalize a running rotation sum into `0..360`.
pub fn normalize_rotation(rotation: i32) -> i32 {
    rotation.rem_euclid(360)
}

/// Calculate the smallest resize of `source` that covers `frame` at `rotation`.
///
/// The frame's wide axis is filled first; if the other axis falls short it is
/// grown to the frame instead, and the overflow on the wide axis is centred.
/// Rounding is half-to-even.
///
/// # Arguments
/// * `source` - Native image dimensions (width, height)
/// * `rotation` - Rotation in degrees (running sum, any sign)
/// * `frame` - Output frame dimensions (width, height)
///
/// # Examples
/// ```
/// # use epaper_frame::imaging::calculate_cover_fit;
/// // 4:3 landscape → 800x600, cropped 60px top and bottom
/// let fit = calculate_cover_fit((4000, 3000), 0, (800, 480));
/// assert_eq!((fit.width, fit.height), (800, 600));
/// assert_eq!((fit.offset_x, fit.offset_y), (0.0, 60.0));
/// ```
pub fn calculate_cover_fit(source: (u32, u32), rotation: i32, frame: (u32, u32)) -> CoverFit {
    let (src_w, src_h) = source;
    let (frame_w, frame_h) = (frame.0 as f64, frame.1 as f64);
    let aspect = src_w as f64 / src_h.max(1) as f64;

    let mut offset_x = 0.0;
    let mut offset_y = 0.0;

    let (width, height) = if is_sideways(rotation) {
        // Source height becomes the displayed width
        let mut h = frame_w;
        let mut w = (h * aspect).round_ties_even();
        if w < frame_h {
            w = frame_h;
            h = (w / aspect).round_ties_even();
            offset_x = (h - frame_w) / 2.0;
        } else {
            offset_y = (w - frame_h) / 2.0;
        }
        (w, h)
    } else {
        let mut w = frame_w;
        let mut h = (w / aspect).round_ties_even();
        if h < frame_h {
            h = frame_h;
            w = (h * aspect).round_ties_even();
            offset_x = (w - frame_w) / 2.0;
        } else {
            offset_y = (h - frame_h) / 2.0;
        }
        (w, h)
    };

    CoverFit {
        width: width as u32,
        height: height as u32,
        offset_x,
        offset_y,
    }
}

/// Calculate the pixel size for a fitted image at a zoom `scale`.
///
/// Truncates toward zero; never returns a zero dimension.
pub fn calculate_render_size(fit: (u32, u32), scale: f64) -> (u32, u32) {
    let w = (fit.0 as f64 * scale) as u32;
    let h = (fit.1 as f64 * scale) as u32;
    (w.max(1), h.max(1))
}

/// Calculate the canvas needed to hold `size` rotated by `degrees`.
///
/// Quarter turns swap the axes exactly; other angles take the bounding box of
/// the rotated rectangle, rounded up.
pub fn calculate_rotated_bounds(size: (u32, u32), degrees: i32) -> (u32, u32) {
    let (w, h) = size;
    match normalize_rotation(degrees) {
        0 | 180 => (w, h),
        90 | 270 => (h, w),
        d => {
            let theta = (d as f64).to_radians();
            let (sin, cos) = (theta.sin().abs(), theta.cos().abs());
            let bw = w as f64 * cos + h as f64 * sin;
            let bh = w as f64 * sin + h as f64 * cos;
            // Tolerate float noise so an exact fit does not grow a pixel
            ((bw - 1e-9).ceil() as u32, (bh - 1e-9).ceil() as u32)
        }
    }
}

/// Where the adapted image's top-left corner lands inside the frame.
///
/// The pan offset is the crop origin, so the image moves the opposite way.
/// Fractional offsets truncate toward zero.
pub fn calculate_paste_origin(offset: (f64, f64)) -> (i64, i64) {
    ((-offset.0).trunc() as i64, (-offset.1).trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: (u32, u32) = (800, 480);

    // =========================================================================
    // calculate_cover_fit tests
    // =========================================================================

    #[test]
    fn cover_landscape_taller_than_frame() {
        // 4:3 → width matches, height overflows by 120
        let fit = calculate_cover_fit((1600, 1200), 0, FRAME);
        assert_eq!((fit.width, fit.height), (800, 600));
        assert_eq!(fit.offset_x, 0.0);
        assert_eq!(fit.offset_y, 60.0);
    }

    #[test]
    fn cover_panorama_wider_than_frame() {
        // 2:1 → height matches, width overflows by 160
        let fit = calculate_cover_fit((2000, 1000), 0, FRAME);
        assert_eq!((fit.width, fit.height), (960, 480));
        assert_eq!(fit.offset_x, 80.0);
        assert_eq!(fit.offset_y, 0.0);
    }

    #[test]
    fn cover_exact_frame_aspect() {
        let fit = calculate_cover_fit((1600, 960), 0, FRAME);
        assert_eq!((fit.width, fit.height), (800, 480));
        assert_eq!((fit.offset_x, fit.offset_y), (0.0, 0.0));
    }

    #[test]
    fn cover_portrait_upright() {
        // 3:4 portrait shown upright → 800x1067, lots of vertical crop
        let fit = calculate_cover_fit((600, 800), 0, FRAME);
        assert_eq!((fit.width, fit.height), (800, 1067));
        assert_eq!(fit.offset_y, (1067.0 - 480.0) / 2.0);
    }

    #[test]
    fn cover_portrait_on_its_side() {
        // 3:4 portrait rotated 90 → source height maps to the 800 frame width
        let fit = calculate_cover_fit((600, 800), 90, FRAME);
        assert_eq!((fit.width, fit.height), (600, 800));
        assert_eq!(fit.offset_x, 0.0);
        assert_eq!(fit.offset_y, 60.0);
    }

    #[test]
    fn cover_tall_strip_on_its_side() {
        // 1:2 rotated → 800*0.5 = 400 < 480, grow width to 480, height 960
        let fit = calculate_cover_fit((500, 1000), 90, FRAME);
        assert_eq!((fit.width, fit.height), (480, 960));
        assert_eq!(fit.offset_x, 80.0);
        assert_eq!(fit.offset_y, 0.0);
    }

    #[test]
    fn cover_rounds_half_to_even() {
        // 5 / 2.0 = 2.5 → 2, which already covers a 2px-high frame
        let fit = calculate_cover_fit((2, 1), 0, (5, 2));
        assert_eq!((fit.width, fit.height), (5, 2));
        assert_eq!(fit.offset_y, 0.0);
    }

    #[test]
    fn cover_negative_rotation_is_sideways() {
        let a = calculate_cover_fit((600, 800), -90, FRAME);
        let b = calculate_cover_fit((600, 800), 270, FRAME);
        assert_eq!(a, b);
    }

    #[test]
    fn cover_half_turn_is_not_sideways() {
        let a = calculate_cover_fit((1600, 1200), 180, FRAME);
        let b = calculate_cover_fit((1600, 1200), 0, FRAME);
        assert_eq!(a, b);
    }

    #[test]
    fn cover_always_covers_and_touches_one_edge() {
        let sources = [
            (1, 1),
            (4000, 3000),
            (3000, 4000),
            (1920, 1080),
            (1080, 1920),
            (5000, 1000),
            (1000, 5000),
            (801, 479),
            (1667, 1000),
            (1669, 1000),
            (599, 1000),
            (600, 1000),
        ];
        for &src in &sources {
            for rotation in [0, 90, 180, 270, -90, 45] {
                let fit = calculate_cover_fit(src, rotation, FRAME);
                // Displayed orientation: sideways swaps the fitted axes
                let (shown_w, shown_h) = if is_sideways(rotation) {
                    (fit.height, fit.width)
                } else {
                    (fit.width, fit.height)
                };
                assert!(
                    shown_w >= 800 && shown_h >= 480,
                    "{src:?}@{rotation}: {shown_w}x{shown_h} does not cover"
                );
                assert!(
                    shown_w == 800 || shown_h == 480,
                    "{src:?}@{rotation}: {shown_w}x{shown_h} over-covers both axes"
                );
            }
        }
    }

    #[test]
    fn cover_offsets_centre_the_overflow() {
        let fit = calculate_cover_fit((3000, 4000), 0, FRAME);
        assert_eq!(fit.offset_y * 2.0, fit.height as f64 - 480.0);
        let fit = calculate_cover_fit((5000, 1000), 0, FRAME);
        assert_eq!(fit.offset_x * 2.0, fit.width as f64 - 800.0);
    }

    // =========================================================================
    // calculate_render_size tests
    // =========================================================================

    #[test]
    fn render_size_identity_at_unit_scale() {
        assert_eq!(calculate_render_size((800, 600), 1.0), (800, 600));
    }

    #[test]
    fn render_size_truncates() {
        // 801 * 1.1 = 881.1 → 881, 600 * 1.1 = 660.0000000000001 → 660
        assert_eq!(calculate_render_size((801, 600), 1.1), (881, 660));
    }

    #[test]
    fn render_size_never_zero() {
        assert_eq!(calculate_render_size((1, 1), 0.1), (1, 1));
    }

    // =========================================================================
    // calculate_rotated_bounds tests
    // =========================================================================

    #[test]
    fn rotated_bounds_quarter_turns() {
        assert_eq!(calculate_rotated_bounds((800, 600), 0), (800, 600));
        assert_eq!(calculate_rotated_bounds((800, 600), 90), (600, 800));
        assert_eq!(calculate_rotated_bounds((800, 600), -90), (600, 800));
        assert_eq!(calculate_rotated_bounds((800, 600), 180), (800, 600));
        assert_eq!(calculate_rotated_bounds((800, 600), 450), (600, 800));
    }

    #[test]
    fn rotated_bounds_diagonal() {
        // 100x100 at 45° → 100·√2 ≈ 141.42 → 142
        assert_eq!(calculate_rotated_bounds((100, 100), 45), (142, 142));
    }

    // =========================================================================
    // misc
    // =========================================================================

    #[test]
    fn normalize_rotation_wraps_negative() {
        assert_eq!(normalize_rotation(-90), 270);
        assert_eq!(normalize_rotation(720), 0);
        assert_eq!(normalize_rotation(450), 90);
    }

    #[test]
    fn paste_origin_inverts_and_truncates() {
        assert_eq!(calculate_paste_origin((60.0, 0.0)), (-60, 0));
        assert_eq!(calculate_paste_origin((12.7, -3.5)), (-12, 3));
    }
}
