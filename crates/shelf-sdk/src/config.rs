use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LibraryError, LibraryResult};

/// Settings for opening a [`Library`](crate::Library).
///
/// Every key is optional in a config file; missing keys take the defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LibraryConfig {
    /// Display name stored alongside the books.
    pub library_name: String,
    /// JSON document holding the collection.
    pub data_path: PathBuf,
    /// Upper bound on any single store call, in milliseconds.
    pub write_timeout_ms: u64,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            library_name: "My Library".into(),
            data_path: PathBuf::from("library.json"),
            write_timeout_ms: 5_000,
        }
    }
}

impl LibraryConfig {
    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_ms)
    }

    pub fn from_toml_str(s: &str) -> LibraryResult<Self> {
        toml::from_str(s).map_err(|e| LibraryError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> LibraryResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| LibraryError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }
}
