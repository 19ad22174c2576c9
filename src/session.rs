//! Editing session: the record store plus a selection cursor.
//!
//! Every edit the user can make goes through [`Session`]. It applies the
//! edit to the selected record and then writes the whole collection back to
//! `backup.json` in the source folder, so no edit is ever held only in
//! memory.
//!
//! Edits that need a selection (pan, zoom, rotate, reset, dates, delete) are
//! ignored with a warning when nothing is selected. Edits that break a rule
//! (a date already taken, an index past the end) fail without changing
//! anything, including the backup.
//!
//! ## Selection after deletion
//!
//! | Situation | New selection |
//! |---|---|
//! | collection now empty | none |
//! | removed the last record | new last index |
//! | anything else | 0 |

use crate::backup::{BackupError, backup_path, load_backup, save_backup};
use crate::config::FrameConfig;
use crate::export::{ExportError, ExportReport, export};
use crate::imaging::{BackendError, ImageBackend, RustBackend, render_frame};
use crate::record::ImageRecord;
use crate::store::{LoadSummary, RecordStore, StoreError};
use crate::types::FrameDate;
use image::RgbImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Backup error: {0}")]
    Backup(#[from] BackupError),
    #[error("Image processing failed: {0}")]
    Imaging(#[from] BackendError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Expand command-line inputs into image paths.
///
/// Directories contribute their accepted files (not recursing), sorted by
/// name. Plain files are kept in the order given if their extension is
/// accepted. Every returned path is absolute.
pub fn collect_image_paths(
    inputs: &[PathBuf],
    config: &FrameConfig,
) -> Result<Vec<PathBuf>, SessionError> {
    let mut paths = Vec::new();
    for input in inputs {
        let input = std::path::absolute(input)?;
        if input.is_dir() {
            for entry in WalkDir::new(&input)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
            {
                if entry.file_type().is_file() && config.accepts(entry.path()) {
                    paths.push(entry.into_path());
                }
            }
        } else if config.accepts(&input) {
            paths.push(input);
        } else {
            tracing::warn!("Skipping {}: unsupported file type", input.display());
        }
    }
    Ok(paths)
}

pub struct Session<B: ImageBackend = RustBackend> {
    backend: B,
    config: FrameConfig,
    /// Folder holding `backup.json`; set by the first load.
    folder: Option<PathBuf>,
    store: RecordStore,
    selected: Option<usize>,
}

impl<B: ImageBackend> Session<B> {
    /// Empty session with no source folder yet.
    pub fn new(backend: B, config: FrameConfig) -> Self {
        Self {
            backend,
            config,
            folder: None,
            store: RecordStore::new(),
            selected: None,
        }
    }

    /// Resume the session saved in `folder`'s backup, if any.
    ///
    /// The first record is selected when the backup is not empty.
    pub fn open(backend: B, config: FrameConfig, folder: &Path) -> Result<Self, SessionError> {
        let path = backup_path(folder, &config.files.backup_file);
        let records = load_backup(&path)?.unwrap_or_default();
        let mut session = Self::new(backend, config);
        session.folder = Some(folder.to_path_buf());
        session.store = RecordStore::from_records(records);
        session.selected = (!session.store.is_empty()).then_some(0);
        Ok(session)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &FrameConfig {
        &self.config
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn records(&self) -> &[ImageRecord] {
        self.store.records()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&ImageRecord> {
        self.selected.and_then(|i| self.store.get(i))
    }

    /// Move the cursor to `index`.
    pub fn select(&mut self, index: usize) -> Result<(), SessionError> {
        if index >= self.store.len() {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.store.len(),
            }
            .into());
        }
        self.selected = Some(index);
        Ok(())
    }

    /// Add images to the session.
    ///
    /// Loading into an empty session makes the directory of the first path
    /// the session folder and consults that folder's backup, so images seen
    /// before come back with their edits. A session that already holds
    /// records keeps its folder, wherever the new images live. The first
    /// record is selected afterwards.
    pub fn load(&mut self, paths: &[PathBuf]) -> Result<LoadSummary, SessionError> {
        let Some(first) = paths.first() else {
            return Ok(LoadSummary::default());
        };
        let fresh = self.store.is_empty();
        let folder = first
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let prior = if fresh {
            load_backup(&backup_path(&folder, &self.config.files.backup_file))?
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let frame = self.config.frame_params();
        let summary = self.store.load(paths, prior, &self.backend, &frame)?;
        if fresh {
            self.folder = Some(folder);
        }
        self.selected = (!self.store.is_empty()).then_some(0);
        self.persist()?;
        Ok(summary)
    }

    /// Pan the selected image.
    pub fn pan(&mut self, dx: f64, dy: f64) -> Result<(), SessionError> {
        let Some(index) = self.selection_for("pan") else {
            return Ok(());
        };
        self.store.get_mut(index)?.change_offset(dx, dy);
        self.persist()
    }

    /// Zoom the selected image. `Ok(false)` if the zoom floor stopped it or
    /// nothing is selected.
    pub fn zoom(&mut self, delta: f64) -> Result<bool, SessionError> {
        let Some(index) = self.selection_for("zoom") else {
            return Ok(false);
        };
        let floor = self.config.editing.min_scale;
        if !self.store.get_mut(index)?.change_scale(delta, floor) {
            tracing::debug!("Zoom by {delta} would reach the floor {floor}, ignored");
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Rotate the selected image counter-clockwise by `degrees`.
    pub fn rotate(&mut self, degrees: i32) -> Result<(), SessionError> {
        let Some(index) = self.selection_for("rotate") else {
            return Ok(());
        };
        let frame = self.config.frame_params();
        let record = self.store.get_mut(index)?;
        let native = self.backend.identify(record.source_path())?;
        record.rotate(degrees, native, &frame);
        self.persist()
    }

    /// Undo pan, zoom, and rotation of the selected image.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let Some(index) = self.selection_for("reset") else {
            return Ok(());
        };
        let frame = self.config.frame_params();
        let record = self.store.get_mut(index)?;
        let native = self.backend.identify(record.source_path())?;
        record.reset(native, &frame);
        self.persist()
    }

    pub fn set_date(&mut self, date: FrameDate) -> Result<(), SessionError> {
        let Some(index) = self.selection_for("set date") else {
            return Ok(());
        };
        self.store.set_date(index, date)?;
        self.persist()
    }

    pub fn clear_date(&mut self) -> Result<(), SessionError> {
        let Some(index) = self.selection_for("clear date") else {
            return Ok(());
        };
        self.store.clear_date(index)?;
        self.persist()
    }

    /// Remove the selected record and move the cursor.
    pub fn delete_selected(&mut self) -> Result<Option<ImageRecord>, SessionError> {
        let Some(index) = self.selection_for("delete") else {
            return Ok(None);
        };
        let removed = self.store.remove(index)?;
        let len = self.store.len();
        self.selected = match len {
            0 => None,
            _ if index >= len => Some(len - 1),
            _ => Some(0),
        };
        self.persist()?;
        Ok(Some(removed))
    }

    pub fn delete_all(&mut self) -> Result<(), SessionError> {
        self.store.clear();
        self.selected = None;
        self.persist()
    }

    /// Write the collection to the session folder's backup.
    pub fn persist(&self) -> Result<(), SessionError> {
        match &self.folder {
            Some(folder) => {
                let path = backup_path(folder, &self.config.files.backup_file);
                save_backup(&path, self.store.records())?;
            }
            None => tracing::debug!("No source folder yet, backup not written"),
        }
        Ok(())
    }

    /// The selected image exactly as it will appear on the frame.
    pub fn preview(&self) -> Result<Option<RgbImage>, SessionError> {
        let Some(record) = self.selected_record() else {
            return Ok(None);
        };
        let frame = self.config.frame_params();
        Ok(Some(render_frame(&self.backend, record, &frame)?))
    }

    /// Export every record into `destination`, first frame on `start`.
    ///
    /// With a `seed` the order of undated images is reproducible.
    pub fn export(
        &self,
        destination: Option<&Path>,
        start: FrameDate,
        seed: Option<u64>,
    ) -> Result<ExportReport, ExportError> {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        export(
            &self.backend,
            self.store.records(),
            destination,
            start,
            &mut rng,
            &self.config,
        )
    }

    fn selection_for(&self, action: &str) -> Option<usize> {
        if self.selected.is_none() {
            tracing::warn!("No image selected, ignoring {action}");
        }
        self.selected
    }
}
