use std::path::Path;
use std::sync::{Arc, LazyLock, RwLock};

use log::debug;
use thiserror::Error;

use super::pref_file::PrefFile;
use crate::generator::{GenerateOptions, SsPasswordEncoding};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read preference file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid preference: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Settings structure to hold global configuration
#[derive(Debug, Clone)]
pub struct Settings {
    pub pref_path: String,

    // Server
    pub listen_address: String,
    pub listen_port: u16,
    pub max_concur_threads: usize,

    // Fetching
    pub fetch_user_agent: String,
    pub fetch_timeout: u64,
    pub proxy_subscription: String,
    pub max_allowed_download_size: usize,

    // Common
    pub ss_password_encoding: SsPasswordEncoding,
    pub max_allowed_upload_size: usize,

    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from(PrefFile::default())
    }
}

impl From<PrefFile> for Settings {
    fn from(pref: PrefFile) -> Self {
        let mut listen_address = pref.server.listen;
        if listen_address.trim().is_empty() {
            listen_address = "127.0.0.1".to_string();
        }

        Settings {
            pref_path: String::new(),
            listen_address,
            listen_port: pref.server.port,
            max_concur_threads: pref.server.threads.max(1),
            fetch_user_agent: pref.fetch.user_agent,
            fetch_timeout: pref.fetch.timeout,
            proxy_subscription: pref.fetch.proxy,
            max_allowed_download_size: pref.fetch.max_download_size,
            ss_password_encoding: pref.common.ss_password_encoding,
            max_allowed_upload_size: pref.common.max_upload_size,
            log_level: pref.advanced.log_level,
        }
    }
}

impl From<&Settings> for GenerateOptions {
    fn from(settings: &Settings) -> Self {
        GenerateOptions {
            ss_password_encoding: settings.ss_password_encoding,
        }
    }
}

impl Settings {
    /// Create a new settings instance with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current() -> Arc<Settings> {
        GLOBAL
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Parse a preference document. TOML is tried first, YAML second.
    pub fn load_from_content(content: &str) -> Result<Self, SettingsError> {
        match toml::from_str::<PrefFile>(content) {
            Ok(pref) => {
                debug!("Preference parsed as TOML");
                Ok(Settings::from(pref))
            }
            Err(toml_err) => {
                debug!("Preference is not TOML ({}), trying YAML", toml_err);
                let pref: PrefFile = serde_yaml::from_str(content)?;
                debug!("Preference parsed as YAML");
                Ok(Settings::from(pref))
            }
        }
    }

    pub fn load_from_file(path: &str) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_string(),
            source,
        })?;
        let mut settings = Self::load_from_content(&content)?;
        settings.pref_path = path.to_string();
        Ok(settings)
    }
}

pub static GLOBAL: LazyLock<RwLock<Arc<Settings>>> =
    LazyLock::new(|| RwLock::new(Arc::new(Settings::new())));

fn replace_global(settings: Settings) {
    *GLOBAL
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner()) = Arc::new(settings);
}

/// Load the preference file at `path` into the global settings.
///
/// Returns `false` when the file does not exist, in which case the defaults
/// stay in place. Runs before the logger is set up, so callers report the
/// outcome themselves.
pub fn init_settings(path: &str) -> Result<bool, SettingsError> {
    if !Path::new(path).exists() {
        return Ok(false);
    }
    let settings = Settings::load_from_file(path)?;
    replace_global(settings);
    Ok(true)
}

pub fn update_settings_from_content(content: &str) -> Result<(), SettingsError> {
    let settings = Settings::load_from_content(content)?;
    replace_global(settings);
    Ok(())
}
