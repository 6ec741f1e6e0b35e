use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConsoleConfig {
    pub api: ApiConfig,
    pub app: AppConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
    pub rtc: RtcConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Gateway base URL; every module path is joined onto it
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_version")]
    pub version: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// File holding the persisted session and UI preferences
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RtcConfig {
    #[serde(default = "default_stun_urls")]
    pub stun_urls: Vec<String>,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_title() -> String {
    "AV Stream Space".to_string()
}

fn default_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".admin-console.json")
}

fn default_chunk_size() -> u64 {
    5 * 1024 * 1024
}

fn default_stun_urls() -> Vec<String> {
    vec!["stun:stun.l.google.com:19302".to_string()]
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            version: default_version(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

impl Default for RtcConfig {
    fn default() -> Self {
        Self {
            stun_urls: default_stun_urls(),
        }
    }
}

impl ConsoleConfig {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("CONSOLE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("rtc.stun_urls")
                    .try_parsing(true),
            )
            .set_default("api.base_url", default_base_url())?
            .set_default("api.timeout_secs", default_timeout_secs())?
            .set_default("app.title", default_title())?
            .set_default("app.version", default_version())?
            .set_default("storage.path", ".admin-console.json")?
            .set_default("upload.chunk_size", default_chunk_size())?
            .set_default("rtc.stun_urls", default_stun_urls())?
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_console_conventions() {
        let config = ConsoleConfig::default();
        assert_eq!(config.api.timeout(), Duration::from_secs(30));
        assert_eq!(config.upload.chunk_size, 5 * 1024 * 1024);
        assert_eq!(config.rtc.stun_urls, vec!["stun:stun.l.google.com:19302"]);
        assert_eq!(config.app.title, "AV Stream Space");
    }
}
