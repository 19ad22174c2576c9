//! Tool configuration module.
//!
//! Handles loading, validating, and merging `epaper-frame.toml`. The file is
//! optional and lives next to the photos (and `backup.json`) in the source
//! folder; anything it does not mention keeps the stock default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [frame]
//! width = 800                    # Output frame width in pixels
//! height = 480                   # Output frame height in pixels
//! background = [255, 255, 255]   # Canvas colour behind the picture
//!
//! [editing]
//! min_scale = 0.05               # Zoom floor; a zoom reaching it is ignored
//!
//! [files]
//! backup_file = "backup.json"    # Edit state, rewritten after every change
//! marker_file = "info.txt"       # Written last into the export directory
//! extensions = ["jpg", "jpeg", "png", "bmp"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{FrameParams, supported_input_extensions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the optional config file inside the source folder.
pub const CONFIG_FILENAME: &str = "epaper-frame.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Tool configuration loaded from `epaper-frame.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameConfig {
    /// Output frame geometry and canvas colour.
    pub frame: FrameSection,
    /// Interactive editing limits.
    pub editing: EditingConfig,
    /// File names and accepted input types.
    pub files: FilesConfig,
}

impl FrameConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame.width == 0 || self.frame.height == 0 {
            return Err(ConfigError::Validation(
                "frame.width and frame.height must be non-zero".into(),
            ));
        }
        let floor = self.editing.min_scale;
        if !floor.is_finite() || floor <= 0.0 || floor >= 1.0 {
            return Err(ConfigError::Validation(
                "editing.min_scale must be between 0 and 1 (exclusive)".into(),
            ));
        }
        if self.files.backup_file.trim().is_empty() || self.files.marker_file.trim().is_empty() {
            return Err(ConfigError::Validation(
                "files.backup_file and files.marker_file must not be empty".into(),
            ));
        }
        if self.files.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "files.extensions must not be empty".into(),
            ));
        }
        let decodable = supported_input_extensions();
        if let Some(ext) = self
            .files
            .extensions
            .iter()
            .find(|ext| !decodable.iter().any(|d| d.eq_ignore_ascii_case(ext)))
        {
            return Err(ConfigError::Validation(format!(
                "files.extensions: no decoder for '{ext}' (supported: {})",
                decodable.join(", ")
            )));
        }
        Ok(())
    }

    /// Frame parameters consumed by the imaging operations.
    pub fn frame_params(&self) -> FrameParams {
        FrameParams {
            width: self.frame.width,
            height: self.frame.height,
            background: self.frame.background,
        }
    }

    /// Whether `path` carries one of the accepted extensions (case-insensitive).
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.files
                    .extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }
}

/// Output frame settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FrameSection {
    pub width: u32,
    pub height: u32,
    /// RGB colour of the canvas and of flattened transparency.
    pub background: [u8; 3],
}

impl Default for FrameSection {
    fn default() -> Self {
        Self {
            width: 800,
            height: 480,
            background: [255, 255, 255],
        }
    }
}

/// Editing limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditingConfig {
    /// Exclusive lower bound for the zoom multiplier.
    pub min_scale: f64,
}

impl Default for EditingConfig {
    fn default() -> Self {
        Self { min_scale: 0.05 }
    }
}

/// File names and accepted input types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    pub backup_file: String,
    pub marker_file: String,
    pub extensions: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            backup_file: "backup.json".to_string(),
            marker_file: "info.txt".to_string(),
            extensions: ["jpg", "jpeg", "png", "bmp"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }
}

// ----------------------------------------------------------------------------
// Loading
// ----------------------------------------------------------------------------

/// Stock defaults as a TOML table, the base every override lands on.
fn defaults_table() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(FrameConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Lay `overrides` over `base`. Nested tables combine key by key; any other
/// value in `overrides` wins outright.
pub fn apply_overrides(base: toml::Value, overrides: toml::Value) -> toml::Value {
    let toml::Value::Table(changes) = overrides else {
        return overrides;
    };
    let toml::Value::Table(mut table) = base else {
        return toml::Value::Table(changes);
    };
    for (key, change) in changes {
        let value = match table.remove(&key) {
            Some(current) => apply_overrides(current, change),
            None => change,
        };
        table.insert(key, value);
    }
    toml::Value::Table(table)
}

/// Parse the folder's `epaper-frame.toml`, or `None` when there is none.
fn read_config_file(folder: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let text = match fs::read_to_string(folder.join(CONFIG_FILENAME)) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&text)?))
}

/// Load the config for a photo folder. A missing file means stock defaults.
pub fn load_config(folder: &Path) -> Result<FrameConfig, ConfigError> {
    let mut table = defaults_table()?;
    if let Some(overrides) = read_config_file(folder)? {
        table = apply_overrides(table, overrides);
    }
    let config: FrameConfig = table.try_into()?;
    config.validate()?;
    tracing::debug!("Config for {}: {:?}", folder.display(), config);
    Ok(config)
}

/// Returns a fully-commented stock `epaper-frame.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# epaper-frame.toml
# Place this file as epaper-frame.toml in the folder holding your photos.
# All settings are optional; values shown are the defaults.
# Misspelled keys are reported instead of silently ignored.

## Output frame
[frame]
# Pixel size of every exported BMP. Match your panel.
width = 800
height = 480

# RGB colour shown wherever the picture does not cover the frame,
# and behind transparent pixels.
background = [255, 255, 255]

## Editing
[editing]
# Zooming out stops before the scale reaches this value.
min_scale = 0.05

## Files
[files]
# Edit state for the folder, rewritten after every change.
backup_file = "backup.json"

# Written into the export directory once all pictures are out.
marker_file = "info.txt"

# Input extensions accepted by `load` (case-insensitive).
extensions = ["jpg", "jpeg", "png", "bmp"]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_panel() {
        let config = FrameConfig::default();
        assert_eq!(config.frame.width, 800);
        assert_eq!(config.frame.height, 480);
        assert_eq!(config.frame.background, [255, 255, 255]);
        assert_eq!(config.editing.min_scale, 0.05);
        assert_eq!(config.files.backup_file, "backup.json");
        assert_eq!(config.files.marker_file, "info.txt");
    }

    #[test]
    fn default_config_is_valid() {
        assert!(FrameConfig::default().validate().is_ok());
    }

    #[test]
    fn stock_toml_parses_to_defaults() {
        let config: FrameConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.frame.width, 800);
        assert_eq!(config.files.extensions, vec!["jpg", "jpeg", "png", "bmp"]);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[frame]\nwidth = 600\n").unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.frame.width, 600);
        assert_eq!(config.frame.height, 480);
        assert_eq!(config.editing.min_scale, 0.05);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "[frame]\ndepth = 3\n").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn zero_width_fails_validation() {
        let mut config = FrameConfig::default();
        config.frame.width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn min_scale_out_of_range_fails_validation() {
        let mut config = FrameConfig::default();
        config.editing.min_scale = 0.0;
        assert!(config.validate().is_err());
        config.editing.min_scale = 1.5;
        assert!(config.validate().is_err());
        config.editing.min_scale = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_extension_list_fails_validation() {
        let mut config = FrameConfig::default();
        config.files.extensions.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn undecodable_extension_fails_validation() {
        let mut config = FrameConfig::default();
        config.files.extensions.push("gif".into());
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.files.extensions = vec!["JPG".into()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn accepts_extensions_case_insensitively() {
        let config = FrameConfig::default();
        assert!(config.accepts(Path::new("/photos/a.JPG")));
        assert!(config.accepts(Path::new("/photos/b.bmp")));
        assert!(!config.accepts(Path::new("/photos/c.gif")));
        assert!(!config.accepts(Path::new("/photos/noext")));
    }

    #[test]
    fn merge_replaces_scalars_and_keeps_siblings() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = apply_overrides(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.frame.width, 800);
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILENAME),
            "[frame]\nbackground = [0, 0, 0]\n\n[files]\nmarker_file = \"done.txt\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.frame.background, [0, 0, 0]);
        assert_eq!(config.files.marker_file, "done.txt");
        assert_eq!(config.files.backup_file, "backup.json");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn frame_params_follow_config() {
        let mut config = FrameConfig::default();
        config.frame.width = 640;
        config.frame.height = 400;
        let params = config.frame_params();
        assert_eq!((params.width, params.height), (640, 400));
        assert_eq!(params.background, [255, 255, 255]);
    }
}
