//! Ordered collection of image records.
//!
//! The store owns the two collection-wide rules: a file name appears at most
//! once, and a date is assigned to at most one record. Order is load order
//! and never changes except by removal.
//!
//! ## Merge on load
//!
//! [`RecordStore::load`] takes the records of a prior session (read from
//! `backup.json`) and reuses one whenever a loaded path has the same file
//! name, re-pointing it at the new path. The restored record keeps every
//! stored value, fit included. Paths without a prior record are identified
//! through the backend and start from a fresh cover fit.

use crate::imaging::{BackendError, FrameParams, ImageBackend};
use crate::record::{ImageRecord, file_name_of};
use crate::types::FrameDate;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Date {0} is already assigned to another image")]
    DuplicateDate(FrameDate),
    #[error("No image at index {index} (have {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Imaging error: {0}")]
    Imaging(#[from] BackendError),
}

/// What a load did, per path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Paths matched to a prior record by file name.
    pub restored: Vec<PathBuf>,
    /// Paths that got a fresh record.
    pub created: Vec<PathBuf>,
    /// Paths whose file name was already loaded.
    pub skipped: Vec<PathBuf>,
}

impl LoadSummary {
    pub fn added(&self) -> usize {
        self.restored.len() + self.created.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<ImageRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap records restored verbatim from a backup.
    pub fn from_records(records: Vec<ImageRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ImageRecord> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut ImageRecord, StoreError> {
        let len = self.records.len();
        self.records
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfRange { index, len })
    }

    /// Index of the record with this file name.
    pub fn position_of(&self, file_name: &str) -> Option<usize> {
        self.records.iter().position(|r| r.file_name() == file_name)
    }

    /// Append records for `paths`, merging with `prior` by file name.
    ///
    /// All paths are resolved before the store changes: if any fresh path
    /// cannot be identified, nothing is added.
    pub fn load(
        &mut self,
        paths: &[PathBuf],
        prior: Vec<ImageRecord>,
        backend: &impl ImageBackend,
        frame: &FrameParams,
    ) -> Result<LoadSummary, StoreError> {
        let mut prior_by_name: HashMap<String, ImageRecord> = HashMap::new();
        for record in prior {
            prior_by_name
                .entry(record.file_name().to_string())
                .or_insert(record);
        }

        let mut seen: HashSet<String> = self
            .records
            .iter()
            .map(|r| r.file_name().to_string())
            .collect();
        let mut summary = LoadSummary::default();
        let mut incoming = Vec::with_capacity(paths.len());

        for path in paths {
            let name = file_name_of(path);
            if !seen.insert(name.clone()) {
                tracing::warn!("Skipping {}: {} is already loaded", path.display(), name);
                summary.skipped.push(path.clone());
                continue;
            }
            match prior_by_name.remove(&name) {
                Some(mut record) => {
                    record.relink(path);
                    summary.restored.push(path.clone());
                    incoming.push(record);
                }
                None => {
                    let native = backend.identify(path)?;
                    summary.created.push(path.clone());
                    incoming.push(ImageRecord::new(path, native, frame));
                }
            }
        }

        self.records.extend(incoming);
        tracing::info!(
            "Loaded {} image(s): {} restored, {} new, {} skipped",
            summary.added(),
            summary.restored.len(),
            summary.created.len(),
            summary.skipped.len()
        );
        Ok(summary)
    }

    /// Pin a record to `date`. Fails without change if another record has it.
    pub fn set_date(&mut self, index: usize, date: FrameDate) -> Result<(), StoreError> {
        self.check_index(index)?;
        let taken = self
            .records
            .iter()
            .enumerate()
            .any(|(i, r)| i != index && r.assigned_date() == Some(date));
        if taken {
            return Err(StoreError::DuplicateDate(date));
        }
        self.records[index].set_assigned_date(Some(date));
        Ok(())
    }

    pub fn clear_date(&mut self, index: usize) -> Result<(), StoreError> {
        self.get_mut(index)?.set_assigned_date(None);
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<ImageRecord, StoreError> {
        self.check_index(index)?;
        Ok(self.records.remove(index))
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    fn check_index(&self, index: usize) -> Result<(), StoreError> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(StoreError::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }
}
