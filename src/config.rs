//! TOML-backed configuration store.
//!
//! The file is a set of tables, one per panel, keyed by panel name:
//!
//! ```toml
//! [OverlayRay]
//! font_size = 15
//! border_size = 12
//! warn_col = [1.0, 0.3, 0.0, 1.0]
//! ```
//!
//! Lookups never fail. A missing table, a missing key or a value of the wrong
//! type all yield the caller's default, so a partial file is always usable.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use ray_common::{ConfigSource, Rgba};
use serde::Deserialize;
use thiserror::Error;
use toml::{Table, Value};
use tracing::{info, warn};

/// Errors raised while loading the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file exists but could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML, or a top-level entry is not a table
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk layout: every top-level key is a panel table.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(flatten)]
    panels: BTreeMap<String, Table>,
}

/// Configuration store loaded from a TOML file.
#[derive(Debug, Clone)]
pub struct TomlConfig {
    path: PathBuf,
    panels: BTreeMap<String, Table>,
}

impl TomlConfig {
    /// A store with no entries. Every lookup yields its default.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            panels: BTreeMap::new(),
        }
    }

    /// Parse a store from TOML text. `path` is kept for reloads and errors.
    pub fn parse(
        path: impl Into<PathBuf>,
        text: &str,
    ) -> Result<Self, ConfigError> {
        let path = path.into();
        let file: ConfigFile = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            panels: file.panels,
        })
    }

    /// Load from `path`. A missing file is not an error: the store starts
    /// empty and a warning is logged.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        match std::fs::read_to_string(&path) {
            Ok(text) => {
                let cfg = Self::parse(path, &text)?;
                info!(path = %cfg.path.display(), panels = cfg.panels.len(), "loaded config");
                Ok(cfg)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(path = %path.display(), "config file not found, using defaults");
                Ok(Self::empty(path))
            }
            Err(source) => Err(ConfigError::Io { path, source }),
        }
    }

    /// Re-read the file this store was loaded from.
    ///
    /// On error the current entries are kept.
    pub fn reload(&mut self) -> Result<(), ConfigError> {
        let fresh = Self::load(self.path.clone())?;
        self.panels = fresh.panels;
        Ok(())
    }

    pub fn path(&self) -> &Path { &self.path }

    /// Set one entry, creating the panel table if needed.
    #[cfg(test)]
    pub fn set(
        &mut self,
        panel: &str,
        key: &str,
        value: impl Into<Value>,
    ) {
        self.panels.entry(panel.to_string()).or_default().insert(key.to_string(), value.into());
    }

    fn value(
        &self,
        panel: &str,
        key: &str,
    ) -> Option<&Value> {
        self.panels.get(panel)?.get(key)
    }
}

/// Numeric TOML value as `f32`. Integers are accepted wherever floats are.
fn as_f32(v: &Value) -> Option<f32> {
    match v {
        Value::Float(f) => Some(*f as f32),
        Value::Integer(i) => Some(*i as f32),
        _ => None,
    }
}

/// Colour from a 3- or 4-element numeric array. Three elements mean opaque.
fn as_color(v: &Value) -> Option<Rgba> {
    let arr = v.as_array()?;
    let mut ch = [1.0f32; 4];
    if !(3..=4).contains(&arr.len()) {
        return None;
    }
    for (slot, item) in ch.iter_mut().zip(arr) {
        *slot = as_f32(item)?;
    }
    Some(Rgba::new(ch[0], ch[1], ch[2], ch[3]))
}

impl ConfigSource for TomlConfig {
    fn get_string<'a>(
        &'a self,
        panel: &str,
        key: &str,
        default: &'a str,
    ) -> &'a str {
        self.value(panel, key).and_then(Value::as_str).unwrap_or(default)
    }

    fn get_float(
        &self,
        panel: &str,
        key: &str,
        default: f32,
    ) -> f32 {
        self.value(panel, key).and_then(as_f32).unwrap_or(default)
    }

    fn get_int(
        &self,
        panel: &str,
        key: &str,
        default: i32,
    ) -> i32 {
        self.value(panel, key)
            .and_then(Value::as_integer)
            .and_then(|i| i32::try_from(i).ok())
            .unwrap_or(default)
    }

    fn get_color(
        &self,
        panel: &str,
        key: &str,
        default: Rgba,
    ) -> Rgba {
        self.value(panel, key).and_then(as_color).unwrap_or(default)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
