use crate::config::address::ServerAddress;
use crate::config::error::ConfigError;
use crate::config::types::{ConfigFile, LocalEntry, LocalMode, LocalStaticConfig, ProxyEntry, RouteConfig};
use crate::utils::validation::{is_empty_or_whitespace, validate_port_range};
use anyhow::{Result, bail};
use log::{error, info};
use regex::Regex;
use std::path::Path;

impl ProxyEntry {
    /// Validate the entry and build its runtime configuration.
    /// Relative static roots are resolved against `base_dir` (the directory holding the config file).
    pub fn resolve(&self, base_dir: &Path) -> Result<RouteConfig, ConfigError> {
        validate_port_range(self.port).map_err(ConfigError::InvalidPort)?;

        let remote = ServerAddress::parse(&self.remote)?;

        let local = match &self.local {
            LocalEntry::Proxy(address) => LocalMode::Proxy(ServerAddress::parse(address)?),
            LocalEntry::Static(entry) => {
                LocalMode::Static(LocalStaticConfig::new(entry.prefix.clone(), base_dir.join(&entry.root), entry.index.clone()))
            }
        };

        let forward_rule = match self.rule.as_deref() {
            Some(pattern) if !is_empty_or_whitespace(pattern) => {
                Some(Regex::new(pattern).map_err(|source| ConfigError::InvalidRule { pattern: pattern.to_string(), source })?)
            }
            _ => None,
        };

        Ok(RouteConfig::new(self.port, remote, local, forward_rule))
    }
}

impl ConfigFile {
    /// Returns (valid_routes, invalid_entries) where each invalid entry carries its position in the file.
    pub fn resolve_routes(&self, base_dir: &Path) -> (Vec<RouteConfig>, Vec<(usize, ConfigError)>) {
        let mut valid = Vec::new();
        let mut invalid = Vec::new();
        for (index, entry) in self.entries().iter().enumerate() {
            match entry.resolve(base_dir) {
                Ok(route) => valid.push(route),
                Err(e) => invalid.push((index, e)),
            }
        }
        (valid, invalid)
    }

    /// Resolve every entry, logging and skipping the invalid ones.
    /// Fails only when no entry is usable.
    pub fn load_routes(&self, base_dir: &Path) -> Result<Vec<RouteConfig>> {
        let (valid, invalid) = self.resolve_routes(base_dir);
        for (index, e) in &invalid {
            error!("Proxy entry #{} will not be started: {}", index, e);
        }
        if valid.is_empty() {
            bail!("No valid proxy entries in configuration ({} invalid)", invalid.len());
        }
        for route in &valid {
            info!("Configured proxy {}", route);
        }
        Ok(valid)
    }
}
