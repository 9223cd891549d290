//! Catalog configuration.
//!
//! Handles loading, validating, and merging `catalog.toml`. Stock defaults
//! are serialized to a TOML table and the user's file is merged on top, so a
//! config file only needs the keys it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! albums_dir = "albums"          # Catalog root, relative to the site root
//! thumbnails_dir = "thumbnails"  # Thumbnail cache directory
//! remote_base = ""               # host/base/path prefixed to every URL
//!
//! [output]
//! html = false
//! xml = false
//! json = false
//! html_file = "index.htm"
//! xml_file = "index.xml"
//! json_file = "index.json"
//!
//! [thumbnails]
//! height = 96                    # Thumbnail height in pixels
//!
//! [processing]
//! max_processes = 4              # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::imaging::DEFAULT_THUMBNAIL_HEIGHT;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "catalog.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Catalog configuration loaded from `catalog.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Directory holding the comic archives.
    pub albums_dir: PathBuf,
    /// Directory thumbnails are cached in.
    pub thumbnails_dir: PathBuf,
    /// `host/base/path` used to build absolute URLs.
    pub remote_base: String,
    pub output: OutputConfig,
    pub thumbnails: ThumbnailsConfig,
    pub processing: ProcessingConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            albums_dir: PathBuf::from("albums"),
            thumbnails_dir: PathBuf::from("thumbnails"),
            remote_base: String::new(),
            output: OutputConfig::default(),
            thumbnails: ThumbnailsConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl CatalogConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnails.height == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.height must be non-zero".into(),
            ));
        }
        if self.albums_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "albums_dir must not be empty".into(),
            ));
        }
        if self.thumbnails_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "thumbnails_dir must not be empty".into(),
            ));
        }
        for (name, file) in [
            ("output.html_file", &self.output.html_file),
            ("output.xml_file", &self.output.xml_file),
            ("output.json_file", &self.output.json_file),
        ] {
            if file.file_name().is_none() {
                return Err(ConfigError::Validation(format!(
                    "{name} must name a file"
                )));
            }
        }
        // Embedded in URLs: must be relative to the site root.
        for (name, path) in [
            ("albums_dir", &self.albums_dir),
            ("thumbnails_dir", &self.thumbnails_dir),
            ("output.html_file", &self.output.html_file),
            ("output.xml_file", &self.output.xml_file),
            ("output.json_file", &self.output.json_file),
        ] {
            if path.has_root() {
                return Err(ConfigError::Validation(format!(
                    "{name} must be relative to the site root: {}",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Which documents to write, and where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub html: bool,
    pub xml: bool,
    pub json: bool,
    pub html_file: PathBuf,
    pub xml_file: PathBuf,
    pub json_file: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            html: false,
            xml: false,
            json: false,
            html_file: PathBuf::from("index.htm"),
            xml_file: PathBuf::from("index.xml"),
            json_file: PathBuf::from("index.json"),
        }
    }
}

impl OutputConfig {
    pub fn any_enabled(&self) -> bool {
        self.html || self.xml || self.json
    }
}

/// Thumbnail generation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    /// Fixed thumbnail height in pixels; width follows the cover's aspect ratio.
    pub height: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_THUMBNAIL_HEIGHT,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel thumbnail workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, at least 1
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(CatalogConfig::default())?)
}

/// Deep-merge `overlay` into `base`.
///
/// Tables merge key by key; any other overlay value replaces what `base` had.
pub fn merge_into(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(target), toml::Value::Table(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => merge_into(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// Load `catalog.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    match fs::read_to_string(&config_path) {
        Ok(text) => Ok(Some(toml::from_str(&text)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Apply an optional user table over the stock defaults, then deserialize and validate.
pub fn resolve_config(
    mut base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<CatalogConfig, ConfigError> {
    if let Some(user) = overlay {
        merge_into(&mut base, user);
    }
    let config: CatalogConfig = base.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Stock defaults overlaid with `dir/catalog.toml`, if present.
pub fn load_config(dir: &Path) -> Result<CatalogConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(dir)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `catalog.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Comics Catalog Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
#
# Paths are relative to the site root (the directory the tool runs in).

# Directory holding the comic archives (.cbz / .cbr).
albums_dir = "albums"

# Directory cover thumbnails are cached in, named <sha256>.png.
thumbnails_dir = "thumbnails"

# Prefix for every absolute URL in XML and JSON output, e.g.
# "example.com/comics". Leave empty for site-relative URLs.
remote_base = ""

# ---------------------------------------------------------------------------
# Output documents
# ---------------------------------------------------------------------------
[output]
# Which formats to write. Each format writes one root document plus one
# document per folder, next to the root document.
html = false
xml = false
json = false

html_file = "index.htm"
xml_file = "index.xml"
json_file = "index.json"

# ---------------------------------------------------------------------------
# Thumbnails
# ---------------------------------------------------------------------------
[thumbnails]
# Thumbnail height in pixels. Width follows the cover's aspect ratio.
height = 96

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel thumbnail workers. Omit to use all CPU cores.
# Values above the core count are clamped down.
# max_processes = 4
"##
}
