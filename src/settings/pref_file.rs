use serde::Deserialize;

use crate::generator::SsPasswordEncoding;

fn default_listen_address() -> String {
    "127.0.0.1".to_string()
}

fn default_listen_port() -> u16 {
    25500
}

fn default_max_concurrent_threads() -> usize {
    4
}

fn default_user_agent() -> String {
    // many providers only serve full configs to known clients
    "ClashForAndroid/2.5.12".to_string()
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_none() -> String {
    "NONE".to_string()
}

fn default_max_download_size() -> usize {
    32 * 1024 * 1024 // 32MB
}

fn default_max_upload_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

fn default_info_log_level() -> String {
    "info".to_string()
}

/// Server section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    #[serde(default = "default_listen_address")]
    pub listen: String,
    #[serde(default = "default_listen_port")]
    pub port: u16,
    #[serde(default = "default_max_concurrent_threads")]
    pub threads: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            listen: default_listen_address(),
            port: default_listen_port(),
            threads: default_max_concurrent_threads(),
        }
    }
}

/// Subscription fetch section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout: u64,
    /// `NONE`, `SYSTEM` or a proxy URL
    #[serde(default = "default_none")]
    pub proxy: String,
    #[serde(default = "default_max_download_size")]
    pub max_download_size: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout: default_fetch_timeout(),
            proxy: default_none(),
            max_download_size: default_max_download_size(),
        }
    }
}

/// Common section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommonSettings {
    pub ss_password_encoding: SsPasswordEncoding,
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size: usize,
}

impl Default for CommonSettings {
    fn default() -> Self {
        Self {
            ss_password_encoding: SsPasswordEncoding::default(),
            max_upload_size: default_max_upload_size(),
        }
    }
}

/// Advanced section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdvancedSettings {
    #[serde(default = "default_info_log_level")]
    pub log_level: String,
}

impl Default for AdvancedSettings {
    fn default() -> Self {
        Self {
            log_level: default_info_log_level(),
        }
    }
}

/// On-disk preference file, identical in its TOML and YAML spellings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PrefFile {
    pub server: ServerSettings,
    pub fetch: FetchSettings,
    pub common: CommonSettings,
    pub advanced: AdvancedSettings,
}
