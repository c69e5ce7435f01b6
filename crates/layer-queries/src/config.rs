//! Configuration for layer-queries.
//!
//! Everything lives in the tool directory: the saved query file, the project
//! file used by the file-backed host, and an optional `config.yaml`:
//!
//! ```yaml
//! store-file: saved_queries.json
//! project-file: project.json
//! ```
//!
//! Relative paths resolve against the tool directory.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

/// Name of the configuration file inside the tool directory
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default name of the saved query file
pub const DEFAULT_STORE_FILE: &str = "saved_queries.json";

/// Default name of the project file
pub const DEFAULT_PROJECT_FILE: &str = "project.json";

/// Environment variable overriding the tool directory
pub const TOOL_DIR_ENV: &str = "LAYER_QUERIES_DIR";

/// Contents of `config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct Config {
    /// Saved query file
    pub store_file: PathBuf,

    /// Project file read by the file-backed host
    pub project_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_file: PathBuf::from(DEFAULT_STORE_FILE),
            project_file: PathBuf::from(DEFAULT_PROJECT_FILE),
        }
    }
}

impl Config {
    /// Load configuration from a file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or is not valid YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(Error::Config(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Load `config.yaml` from the tool directory.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_from_dir(tool_dir: &Path) -> Result<Self> {
        Self::load(&tool_dir.join(CONFIG_FILE_NAME))
    }

    /// Absolute location of the saved query file.
    pub fn store_path(&self, tool_dir: &Path) -> PathBuf {
        tool_dir.join(&self.store_file)
    }

    /// Absolute location of the project file.
    pub fn project_path(&self, tool_dir: &Path) -> PathBuf {
        tool_dir.join(&self.project_file)
    }
}

/// Directory containing the running executable, the default tool directory.
///
/// # Errors
///
/// Returns [`Error::Config`] if the executable path cannot be determined.
pub fn installation_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe()
        .map_err(|e| Error::Config(format!("cannot locate executable: {e}")))?;
    exe.parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| Error::Config(format!("{} has no parent directory", exe.display())))
}
