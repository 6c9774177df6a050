use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use shelf_sdk::LibraryConfig;
use shelf_server::ServerConfig;

use crate::cli::Cli;

/// Contents of a `shelf.toml` file.
///
/// ```toml
/// library_name = "Home"
/// data_path = "library.json"
/// write_timeout_ms = 5000
///
/// [server]
/// bind_addr = "127.0.0.1:5000"
/// allow_any_origin = true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    #[serde(flatten)]
    pub library: LibraryConfig,
    pub server: ServerConfig,
}

impl ShelfConfig {
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        toml::from_str(s).context("invalid config")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Config file (if any) with command-line overrides applied.
    pub fn resolve(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(path) = &cli.library {
            config.library.data_path = path.clone();
        }
        Ok(config)
    }
}
