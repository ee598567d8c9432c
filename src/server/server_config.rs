use std::{fs, net::SocketAddr, path::{Path, PathBuf}};
use serde::{Serialize, Deserialize};
use toml;
use anyhow::{self, Context};

#[derive(Debug, Serialize, Deserialize)]
pub struct ListenConfig {
    pub bind: SocketAddr
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Accounts file; relative paths are taken from the config file's directory.
    pub path: PathBuf
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ListenConfig,
    pub storage: StorageConfig
}

impl AppConfig {
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let filepath = filepath.as_ref();
        let file_content = fs::read_to_string(filepath)
            .with_context(|| format!("failed to read config file {}", filepath.display()))?;
        let mut config: AppConfig = toml::from_str(&file_content)
            .with_context(|| "failed to parse config file")?;

        if config.storage.path.is_relative() {
            let base = filepath.parent().unwrap_or(Path::new(""));
            config.storage.path = base.join(&config.storage.path);
        }
        return Ok(config);
    }
}
