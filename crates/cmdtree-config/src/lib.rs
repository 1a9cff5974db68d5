//! Configuration files of named targets.
//!
//! A *target* is a flat key/value profile, for example the settings for one
//! storage backend. `cmdtree-config` keeps a set of targets in a YAML document
//! with a top-level `targets` key and offers create/find/delete on them.
//!
//! ```rust
//! use cmdtree_config::{ConfigFile, ConfigTarget};
//!
//! let yaml = "targets:\n  backup:\n    type: s3\n";
//! let mut config = ConfigFile::new(yaml.as_bytes(), ConfigTarget::new())?;
//!
//! config.create("local", "localDisk");
//! config.target_mut("backup")?.set("bucket", "archive");
//!
//! assert_eq!(config.names(), vec!["backup", "default", "local"]);
//! assert_eq!(config.target("backup")?.get("bucket"), Some("archive"));
//! # Ok::<(), cmdtree_config::ConfigError>(())
//! ```

mod error;
mod file;
mod target;

pub use error::ConfigError;
pub use file::{ConfigFile, DEFAULT_TARGET, TYPE_KEY};
pub use target::ConfigTarget;
