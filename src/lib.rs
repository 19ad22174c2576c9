//! # epaper-frame
//!
//! Prepare photos for an 800×480 e-paper picture frame. Each photo is fitted
//! to cover the frame and can then be panned, zoomed, and turned. It can also
//! be pinned to the day it should appear. Export writes one uncompressed BMP
//! per day, named so the frame shows them in date order.
//!
//! # Data Flow
//!
//! ```text
//! load      photos/*.jpg       →  records (+ photos/backup.json)
//! edit      pan/zoom/rotate    →  records (+ backup.json rewritten)
//! export    records + start    →  dest/NNN_dd.mm.yyyy_name.bmp + dest/info.txt
//! ```
//!
//! All edit state lives in `backup.json` next to the photos, so every CLI
//! invocation starts by reopening it and ends by writing it back.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Record store + selection; the one entry point for edits, persisted after each |
//! | [`store`] | Ordered records: merge on load, unique dates, removal |
//! | [`record`] | `ImageRecord`: per-photo transform state, serialized as the backup schema |
//! | [`imaging`] | Cover-fit math, `ImageBackend` trait, pure-Rust backend, frame composition |
//! | [`schedule`] | Which photo shows on which day |
//! | [`export`] | Renders the schedule into BMP files and the marker file |
//! | [`naming`] | Export file names and legacy-prefix cleanup |
//! | [`backup`] | `backup.json` load/save |
//! | [`config`] | Optional `epaper-frame.toml`, merged over stock defaults |
//! | [`types`] | `FrameDate`, the `dd.mm.yyyy` calendar date |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Cover Fit, Then Crop
//!
//! A photo is resized just enough to cover the whole frame in its displayed
//! orientation, never letterboxed. The pan offset chooses which part of the
//! overflow is visible. Zoom multiplies the fitted size and keeps the frame
//! centre still. Rotating recomputes the fit, so a turned photo always covers
//! the frame again.
//!
//! ## Write-Through Backup
//!
//! Every successful edit rewrites the complete `backup.json`. The file is
//! small (one object per photo) and rewriting it wholesale keeps the format a
//! plain JSON array that older and newer versions both read. Photos are
//! matched to their saved state by file name, so a folder that moved keeps
//! its edits.
//!
//! ## Seeded Scheduling
//!
//! Undated photos fill the days between pinned ones in random order. The RNG
//! is injected, so `export --seed N` reproduces a run exactly.

pub mod backup;
pub mod config;
pub mod export;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod record;
pub mod schedule;
pub mod session;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
