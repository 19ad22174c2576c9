//! `backup.json`: the persisted edit state of a photo folder.
//!
//! The file is a JSON array of [`ImageRecord`]s in session order. It lives in
//! the folder the photos were loaded from and is rewritten after every change,
//! so the last edit survives a crash or a restart.
//!
//! A missing file is not an error: it means the folder was never edited. A
//! file that exists but does not parse is reported, because silently starting
//! from scratch would throw away the user's pans, zooms, and dates on the
//! next save.

use crate::record::ImageRecord;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackupError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed backup {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Location of the backup file for a folder.
pub fn backup_path(folder: &Path, file_name: &str) -> PathBuf {
    folder.join(file_name)
}

/// Read a backup. `Ok(None)` if the file does not exist.
pub fn load_backup(path: &Path) -> Result<Option<Vec<ImageRecord>>, BackupError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let records = serde_json::from_str(&content).map_err(|source| BackupError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(records))
}

/// Overwrite the backup with `records`, pretty-printed.
pub fn save_backup(path: &Path, records: &[ImageRecord]) -> Result<(), BackupError> {
    let json = serde_json::to_string_pretty(records).map_err(io::Error::from)?;
    std::fs::write(path, json)?;
    tracing::debug!("Saved {} record(s) to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{Dimensions, FrameParams};
    use crate::types::FrameDate;
    use tempfile::TempDir;

    fn record(name: &str) -> ImageRecord {
        ImageRecord::new(
            &Path::new("/photos").join(name),
            Dimensions {
                width: 1600,
                height: 1200,
            },
            &FrameParams::default(),
        )
    }

    #[test]
    fn missing_backup_is_none() {
        let tmp = TempDir::new().unwrap();
        let path = backup_path(tmp.path(), "backup.json");
        assert!(load_backup(&path).unwrap().is_none());
    }

    #[test]
    fn save_then_load_keeps_order_and_edits() {
        let tmp = TempDir::new().unwrap();
        let path = backup_path(tmp.path(), "backup.json");

        let mut a = record("a.jpg");
        a.change_offset(12.0, -4.0);
        a.set_assigned_date(FrameDate::from_dmy(3, 3, 2025));
        let b = record("b.jpg");

        save_backup(&path, &[a.clone(), b.clone()]).unwrap();
        let loaded = load_backup(&path).unwrap().unwrap();
        assert_eq!(loaded, vec![a, b]);
    }

    #[test]
    fn save_overwrites_previous_content() {
        let tmp = TempDir::new().unwrap();
        let path = backup_path(tmp.path(), "backup.json");

        save_backup(&path, &[record("a.jpg"), record("b.jpg")]).unwrap();
        save_backup(&path, &[]).unwrap();
        assert_eq!(load_backup(&path).unwrap().unwrap(), vec![]);
    }

    #[test]
    fn saved_file_is_pretty_json_array() {
        let tmp = TempDir::new().unwrap();
        let path = backup_path(tmp.path(), "backup.json");
        save_backup(&path, &[record("a.jpg")]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with('['));
        assert!(text.contains("\n"));
        assert!(text.contains("\"original_filepath\""));
    }

    #[test]
    fn malformed_backup_is_reported() {
        let tmp = TempDir::new().unwrap();
        let path = backup_path(tmp.path(), "backup.json");
        std::fs::write(&path, "{ not json").unwrap();

        match load_backup(&path) {
            Err(BackupError::Malformed { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = backup_path(tmp.path(), "backup.json");
        std::fs::write(&path, r#"[{"filename": "a.jpg"}]"#).unwrap();
        assert!(matches!(
            load_backup(&path),
            Err(BackupError::Malformed { .. })
        ));
    }
}
