use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const APP_NAME: &str = "packset";
const CONFIG_FILE: &str = "config.json";

const ENV_CASE_SENSITIVE: &str = "PACKSET_CASE_SENSITIVE";
const ENV_PARALLEL_BUILD: &str = "PACKSET_PARALLEL_BUILD";
const ENV_BUILD_THREADS: &str = "PACKSET_BUILD_THREADS";
const ENV_MAX_FILE_SIZE: &str = "PACKSET_MAX_FILE_SIZE";

/// Catalog configuration stored in the app data directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Match characters exactly; when false ASCII letters are folded
    #[serde(default = "default_case_sensitive")]
    pub case_sensitive: bool,

    /// Build per-item indexes on the rayon pool
    #[serde(default = "default_parallel_build")]
    pub parallel_build: bool,

    /// Threads for a dedicated build pool
    /// If 0, the global rayon pool is used (one thread per CPU)
    #[serde(default)]
    pub build_threads: usize,

    /// Files larger than this are skipped by the directory walker
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_case_sensitive() -> bool {
    true
}

fn default_parallel_build() -> bool {
    true
}

fn default_max_file_size() -> u64 {
    16 * 1024 * 1024
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            case_sensitive: default_case_sensitive(),
            parallel_build: default_parallel_build(),
            build_threads: 0,
            max_file_size: default_max_file_size(),
        }
    }
}

impl CatalogConfig {
    /// Load config: defaults, then the config file if present, then the environment
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        let config = if config_path.exists() {
            debug!(path = %config_path.display(), "loading config file");
            let content = fs::read_to_string(&config_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        config.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` (normally the process environment)
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_CASE_SENSITIVE) {
            self.case_sensitive = parse_bool(ENV_CASE_SENSITIVE, &value)?;
        }
        if let Some(value) = lookup(ENV_PARALLEL_BUILD) {
            self.parallel_build = parse_bool(ENV_PARALLEL_BUILD, &value)?;
        }
        if let Some(value) = lookup(ENV_BUILD_THREADS) {
            self.build_threads = parse_number(ENV_BUILD_THREADS, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_FILE_SIZE) {
            self.max_file_size = parse_number(ENV_MAX_FILE_SIZE, &value)?;
        }
        Ok(self)
    }

    /// Save config to the app data directory
    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Get the effective build thread count (resolves 0 to CPU count)
    pub fn effective_build_threads(&self) -> usize {
        if self.build_threads == 0 {
            num_cpus()
        } else {
            self.build_threads
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::Config(format!("{key}: expected a boolean, got {other:?}"))),
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{key}: expected a number, got {value:?}")))
}

/// Get the number of CPUs available
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

/// Get the path to the config file
pub fn get_config_path() -> Result<PathBuf> {
    let app_dir = get_app_data_dir()?;
    Ok(app_dir.join(CONFIG_FILE))
}

/// Get the application data directory
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = dirs::data_local_dir()
        .ok_or_else(|| Error::Config("could not determine app data directory".into()))?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}
