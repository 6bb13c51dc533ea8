//! OpenMW configuration: where the load order and data directories live.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

/// Name of the OpenMW configuration file.
pub const CONFIG_FILE: &str = "openmw.cfg";

/// The parts of `openmw.cfg` needed to find the load order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OpenMwConfig {
    /// `data=` directories, in order.
    pub data_dirs: Vec<PathBuf>,
    /// `content=` plugin names, in load order.
    pub content: Vec<String>,
}

impl OpenMwConfig {
    /// Parse the text of a configuration file.
    ///
    /// Lines without `=` and unknown keys are ignored.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();

        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches(|c| c == '"' || c == '\'');

            match key.trim() {
                "data" => config.data_dirs.push(PathBuf::from(value)),
                "content" => config.content.push(value.to_string()),
                _ => {}
            }
        }

        config
    }

    /// Read and parse a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    /// Full paths of the content files, in load order.
    ///
    /// Each name resolves to the first data directory that has it; names
    /// found nowhere are skipped.
    pub fn resolve(&self) -> Vec<PathBuf> {
        self.content
            .iter()
            .filter_map(|name| {
                let found = self
                    .data_dirs
                    .iter()
                    .map(|dir| dir.join(name))
                    .find(|path| path.exists());
                if found.is_none() {
                    warn!("content file {} not found in any data directory", name);
                }
                found
            })
            .collect()
    }
}

/// The OpenMW user directory on platforms with a known layout.
fn openmw_user_dir() -> Option<PathBuf> {
    if cfg!(windows) {
        dirs::document_dir().map(|d| d.join("My Games").join("OpenMW"))
    } else {
        None
    }
}

/// Default location of `openmw.cfg`.
pub fn default_config_path() -> Option<PathBuf> {
    if cfg!(target_os = "macos") {
        dirs::preference_dir().map(|d| d.join("openmw").join(CONFIG_FILE))
    } else if cfg!(any(target_os = "linux", target_os = "freebsd")) {
        dirs::config_dir().map(|d| d.join("openmw").join(CONFIG_FILE))
    } else {
        openmw_user_dir().map(|d| d.join(CONFIG_FILE))
    }
}

/// Default output directory, the OpenMW-CS data directory.
pub fn default_mod_dir() -> Option<PathBuf> {
    if cfg!(any(target_os = "macos", target_os = "linux", target_os = "freebsd")) {
        dirs::data_dir().map(|d| d.join("openmw").join("data"))
    } else {
        openmw_user_dir().map(|d| d.join("data"))
    }
}
