//! Configuration from the glance rc file
//!
//! The rc file is JSON:
//! - `dataColors`: style tokens for values
//! - `fieldColors`: style tokens for labels
//! - `fields`: report order when none is given on the command line
//! - `ignoreInterfaces`: regex of interface names to leave out of IP lines
//! - `timeout`: seconds to wait for any single external command
//!
//! A missing file is created with the defaults. Missing keys take defaults.

use crate::error::{GlanceError, Result};
use crate::netcache::DEFAULT_EXCLUDE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub data_colors: Vec<String>,
    pub field_colors: Vec<String>,
    pub fields: Vec<String>,
    pub ignore_interfaces: String,
    /// Seconds
    pub timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_colors: vec!["green".to_string()],
            field_colors: vec!["blue".to_string()],
            fields: Vec::new(),
            ignore_interfaces: DEFAULT_EXCLUDE.to_string(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// `<config dir>/glance/rc`, or `./glance/rc` with no config dir
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("glance")
            .join("rc")
    }

    /// Load `path`, writing the defaults there first if it does not exist.
    ///
    /// Failing to write the defaults is not an error; they are still used.
    pub fn load_or_init(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content).map_err(|source| GlanceError::Config {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let config = Self::default();
                if let Err(e) = config.save(path) {
                    tracing::debug!(
                        path = %path.display(),
                        error = %e,
                        "could not write default config"
                    );
                }
                Ok(config)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        // An empty rc is treated like an empty object
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(content)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| GlanceError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json + "\n")?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
