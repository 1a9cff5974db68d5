//! The configuration file: named targets persisted as YAML.
//!
//! # Format
//!
//! ```yaml
//! targets:
//!   default:
//!     type: localDisk
//!   backup:
//!     bucket: archive
//!     type: s3
//! ```
//!
//! Target names and keys inside a target are written in sorted order. Unknown
//! top-level keys are ignored when loading.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::ConfigError;
use crate::target::ConfigTarget;

/// Name of the target seeded by [`ConfigFile::new`].
pub const DEFAULT_TARGET: &str = "default";

/// Key written by [`ConfigFile::create`] to record a target's store type.
pub const TYPE_KEY: &str = "type";

/// Configuration data for a set of named targets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Targets by name.
    #[serde(default)]
    pub targets: BTreeMap<String, ConfigTarget>,
}

// Loading shape: tolerates `targets:` and `name:` entries with null values.
#[derive(Deserialize)]
struct Document {
    #[serde(default)]
    targets: Option<BTreeMap<String, Option<ConfigTarget>>>,
}

impl ConfigFile {
    /// Creates a config seeded with a `default` target, then loads `reader` over it.
    ///
    /// A `default` target in the document replaces the seeded one.
    pub fn new<R: Read>(reader: R, default_target: ConfigTarget) -> Result<Self, ConfigError> {
        let mut config = Self::with_default(default_target);
        config.load(reader)?;
        Ok(config)
    }

    /// Creates a config holding only a `default` target.
    pub fn with_default(default_target: ConfigTarget) -> Self {
        let mut targets = BTreeMap::new();
        targets.insert(DEFAULT_TARGET.to_string(), default_target);
        Self { targets }
    }

    /// Opens the config file at `path`, seeded with a `default` target.
    ///
    /// A missing file is not an error; the seeded config is returned as-is.
    pub fn open(path: impl AsRef<Path>, default_target: ConfigTarget) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::new(file, default_target)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "config file missing, using defaults");
                Ok(Self::with_default(default_target))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reads a YAML document from `reader` and merges its targets in.
    ///
    /// Targets in the document replace existing targets of the same name; other
    /// existing targets are kept. An empty document changes nothing.
    pub fn load<R: Read>(&mut self, mut reader: R) -> Result<(), ConfigError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(());
        }

        let document: Document = serde_yaml::from_slice(&bytes)?;
        let loaded = document.targets.unwrap_or_default();
        tracing::debug!(targets = loaded.len(), "loaded config document");
        self.targets.extend(
            loaded
                .into_iter()
                .map(|(name, target)| (name, target.unwrap_or_default())),
        );
        Ok(())
    }

    /// Writes the YAML rendering to `dest`.
    pub fn save<W: Write>(&self, mut dest: W) -> Result<(), ConfigError> {
        let rendered = serde_yaml::to_string(self)?;
        dest.write_all(rendered.as_bytes())?;
        dest.flush()?;
        tracing::debug!(bytes = rendered.len(), "saved config document");
        Ok(())
    }

    /// Writes the YAML rendering to `path`, creating parent directories.
    ///
    /// The document goes to a temporary file in the same directory, which is
    /// then renamed over `path`. On failure the previous file is left intact.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        self.save(io::BufWriter::new(tmp.as_file_mut()))?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        tracing::debug!(path = %path.display(), "persisted config file");
        Ok(())
    }

    /// Inserts a target with the given store type, unless one already exists.
    pub fn create(&mut self, name: impl Into<String>, store_type: impl Into<String>) -> &mut Self {
        self.targets.entry(name.into()).or_insert_with(|| {
            let mut target = ConfigTarget::new();
            target.set(TYPE_KEY, store_type);
            target
        });
        self
    }

    /// Finds a target by name.
    pub fn target(&self, name: &str) -> Result<&ConfigTarget, ConfigError> {
        self.targets
            .get(name)
            .ok_or_else(|| ConfigError::target_not_found(name))
    }

    /// Finds a target by name for modification.
    pub fn target_mut(&mut self, name: &str) -> Result<&mut ConfigTarget, ConfigError> {
        self.targets
            .get_mut(name)
            .ok_or_else(|| ConfigError::target_not_found(name))
    }

    /// Removes a target. Missing names are ignored.
    pub fn delete(&mut self, name: &str) -> &mut Self {
        self.targets.remove(name);
        self
    }

    /// Target names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.targets.keys().map(String::as_str).collect()
    }
}

impl fmt::Display for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = serde_yaml::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&rendered)
    }
}
