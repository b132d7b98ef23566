use crate::error::{Error, Result};
use config::{Config, Environment, File as ConfigFile};
use serde::Deserialize;
use std::path::PathBuf;

const DEFAULT_INTERVAL_SECS: u64 = 60 * 60;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1000;
/// Longest accepted run interval: one year.
pub const MAX_INTERVAL_SECS: u64 = 366 * 24 * 60 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Absolute path of the folder that gets cleaned.
    pub watch_folder: PathBuf,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_run_on_start")]
    pub run_on_start: bool,
    #[serde(default)]
    pub lowercase_extensions: bool,
}

fn default_interval_secs() -> u64 {
    DEFAULT_INTERVAL_SECS
}

fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_run_on_start() -> bool {
    true
}

impl AppConfig {
    pub fn new(watch_folder: impl Into<PathBuf>) -> Self {
        Self {
            watch_folder: watch_folder.into(),
            interval_secs: DEFAULT_INTERVAL_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            run_on_start: true,
            lowercase_extensions: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.watch_folder.as_os_str().is_empty() {
            return Err(Error::InvalidConfig("watch_folder is empty".to_string()));
        }
        if !self.watch_folder.is_absolute() {
            return Err(Error::InvalidConfig(format!(
                "watch_folder must be an absolute path, got {}",
                self.watch_folder.display()
            )));
        }
        if self.interval_secs == 0 {
            return Err(Error::InvalidConfig(
                "interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.interval_secs > MAX_INTERVAL_SECS {
            return Err(Error::InvalidConfig(format!(
                "interval_secs must be at most {}, got {}",
                MAX_INTERVAL_SECS, self.interval_secs
            )));
        }
        Ok(())
    }
}

/// Loads `Config.toml` (optional) and `CLEANER_*` environment variables.
/// `folder_override` wins over both when given.
pub fn load_configuration(folder_override: Option<PathBuf>) -> Result<AppConfig> {
    let mut builder = Config::builder()
        .set_default("interval_secs", DEFAULT_INTERVAL_SECS as i64)?
        .set_default("poll_interval_ms", DEFAULT_POLL_INTERVAL_MS as i64)?
        .set_default("run_on_start", true)?
        .set_default("lowercase_extensions", false)?
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("CLEANER"));

    if let Some(folder) = folder_override {
        builder = builder.set_override("watch_folder", folder.to_string_lossy().into_owned())?;
    }

    Ok(builder.build()?.try_deserialize::<AppConfig>()?)
}
