use crate::config::types::ConfigFile;
use crate::utils::validation::is_empty_or_whitespace;
use anyhow::{Context, Result, anyhow, bail};
use log::{debug, trace};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "devproxy.json";

impl ConfigFile {
    /// Resolve the config path from the working directory and an optional file override.
    /// A relative override is taken relative to the working directory.
    pub fn resolve_config_path(dir: Option<PathBuf>, file: Option<String>) -> PathBuf {
        let dir = dir.unwrap_or_else(|| PathBuf::from("."));
        #[allow(clippy::collapsible_if)]
        if let Some(file) = file {
            if !is_empty_or_whitespace(&file) {
                return dir.join(file);
            }
        }
        dir.join(CONFIG_FILE_NAME)
    }

    /// Directory that relative paths inside the configuration are resolved against.
    pub fn base_dir(path: impl AsRef<Path>) -> PathBuf {
        match path.as_ref().parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// Load configuration from a file
    pub async fn try_load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());
        if !path.exists() {
            bail!("Config file not found: {} (run `devproxy init` to create one)", path.display());
        }
        let content = tokio::fs::read_to_string(path).await.with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = serde_json::from_str::<ConfigFile>(&content).with_context(|| format!("Failed to parse config file {}", path.display()))?;
        trace!("Loaded config: {:#?}", config);
        Ok(config)
    }

    /// Save the configuration to `path`
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        debug!("Saving config to: {}", path.display());
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Save the template configuration to the specified path, refusing to overwrite an existing file
    pub async fn save_default(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if path.exists() {
            return Err(anyhow!("Config file already exists: {}", path.display()));
        }
        debug!("Saving default config to: {}", path.display());
        Self::template().save(path).await
    }
}
