//! Export filename construction.
//!
//! Every exported frame is named `NNN_dd.mm.yyyy_stem.bmp`:
//! - `NNN` is the zero-padded position in the export run
//! - `dd.mm.yyyy` is the day the frame is shown
//! - `stem` is the source file name without its extension
//!
//! Photos are often re-exported from a previous run's output, so the stem is
//! cleaned first: every earlier `NNN_dd.mm.yyyy_` prefix is removed, then any
//! non-ASCII character is dropped (the frame's firmware only reads ASCII
//! names).
//!
//! - `Strand.jpg` on 05.06.2024 at 1 → `001_05.06.2024_Strand.bmp`
//! - `002_01.01.2023_Strand.jpg` → `001_05.06.2024_Strand.bmp`
//! - `Müll Café.png` → `001_05.06.2024_Mll Caf.bmp`

use crate::types::FrameDate;

/// Shape of a legacy export prefix: `d` is an ASCII digit, anything else
/// must match literally.
const LEGACY_PREFIX: &[u8] = b"ddd_dd.dd.dddd_";

fn legacy_prefix_at(bytes: &[u8], start: usize) -> bool {
    bytes.len() - start >= LEGACY_PREFIX.len()
        && LEGACY_PREFIX
            .iter()
            .zip(&bytes[start..])
            .all(|(&want, &got)| match want {
                b'd' => got.is_ascii_digit(),
                lit => got == lit,
            })
}

/// Remove every `NNN_dd.mm.yyyy_` occurrence, scanning left to right.
///
/// Removal is a single pass: text that only forms a prefix once another one
/// has been cut out stays.
pub fn strip_legacy_prefixes(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if legacy_prefix_at(bytes, i) {
            i += LEGACY_PREFIX.len();
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    // The pattern is pure ASCII, so cuts land on char boundaries
    String::from_utf8_lossy(&out).into_owned()
}

/// Drop every non-ASCII character.
pub fn ascii_only(s: &str) -> String {
    s.chars().filter(char::is_ascii).collect()
}

/// Clean stem for an export name: file name up to its last `.`, legacy
/// prefixes removed, ASCII only.
pub fn export_stem(file_name: &str) -> String {
    let stem = match file_name.rfind('.') {
        Some(dot) => &file_name[..dot],
        None => file_name,
    };
    ascii_only(&strip_legacy_prefixes(stem))
}

/// Build the name of the `index`-th exported frame.
pub fn export_file_name(index: usize, date: FrameDate, file_name: &str) -> String {
    format!("{:03}_{}_{}.bmp", index, date, export_stem(file_name))
}
