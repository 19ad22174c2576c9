//! Export writer: schedule the records and write one BMP per day.
//!
//! The run is a single synchronous pass:
//!
//! 1. Check there is something to export and somewhere to put it. Either
//!    failure aborts before any file is touched.
//! 2. [`schedule`](crate::schedule::schedule) the records from the start
//!    date.
//! 3. For each entry, render the record's frame (resize, rotate, flatten,
//!    crop onto the background canvas) and write it as
//!    `NNN_dd.mm.yyyy_stem.bmp`.
//! 4. Write the marker file (`info.txt`) with the local completion time.
//!
//! There is no rollback: if a write fails midway, the frames already
//! written stay in the destination and no marker is written.

use crate::config::FrameConfig;
use crate::imaging::{BackendError, ImageBackend, render_frame};
use crate::naming::export_file_name;
use crate::record::ImageRecord;
use crate::schedule::schedule;
use crate::types::FrameDate;
use chrono::Local;
use rand::Rng;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Timestamp notation written to the marker file.
pub const MARKER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No images loaded, nothing to export")]
    NoRecords,
    /// Carries the rejected path, `None` when no destination was given.
    #[error("Export destination missing or not a directory")]
    NoDestination(Option<PathBuf>),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
}

/// One written frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub path: PathBuf,
    /// File name of the record the frame was rendered from.
    pub source: String,
    /// Day the frame is shown.
    pub date: FrameDate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportReport {
    pub files: Vec<ExportedFile>,
    /// File names of pinned records left out of the schedule.
    pub unreached: Vec<String>,
    pub marker: PathBuf,
    pub finished_at: String,
}

/// Export `records` into `destination`, one frame per day from `start`.
///
/// `destination` must be an existing directory.
pub fn export<R: Rng + ?Sized>(
    backend: &impl ImageBackend,
    records: &[ImageRecord],
    destination: Option<&Path>,
    start: FrameDate,
    rng: &mut R,
    config: &FrameConfig,
) -> Result<ExportReport, ExportError> {
    if records.is_empty() {
        return Err(ExportError::NoRecords);
    }
    let destination = match destination {
        Some(dir) if dir.is_dir() => dir,
        other => return Err(ExportError::NoDestination(other.map(Path::to_path_buf))),
    };

    let frame = config.frame_params();
    let plan = schedule(records, start, rng);
    tracing::info!(
        "Exporting {} frame(s) from {} to {}",
        plan.entries.len(),
        start,
        destination.display()
    );

    let mut files = Vec::with_capacity(plan.entries.len());
    for (index, entry) in plan.entries.iter().enumerate() {
        let name = export_file_name(index, entry.date, entry.record.file_name());
        let path = destination.join(&name);
        let composed = render_frame(backend, entry.record, &frame)?;
        backend.write_bmp(&composed, &path)?;
        tracing::debug!("Wrote {}", path.display());
        files.push(ExportedFile {
            path,
            source: entry.record.file_name().to_string(),
            date: entry.date,
        });
    }

    let finished_at = Local::now().format(MARKER_TIMESTAMP_FORMAT).to_string();
    let marker = destination.join(&config.files.marker_file);
    std::fs::write(&marker, &finished_at)?;
    tracing::info!("Export finished at {}", finished_at);

    Ok(ExportReport {
        files,
        unreached: plan
            .unreached
            .iter()
            .map(|r| r.file_name().to_string())
            .collect(),
        marker,
        finished_at,
    })
}
