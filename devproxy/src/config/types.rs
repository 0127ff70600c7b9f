use crate::config::address::ServerAddress;
use log::warn;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};

/// Contents of `devproxy.json`: a single proxy entry or a list of independent entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigFile {
    Many(Vec<ProxyEntry>),
    Single(ProxyEntry),
}

/// One listener as written in the configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyEntry {
    // Requests whose URL matches this pattern always go to the remote server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) rule: Option<String>,
    // Remote server owning the application, e.g. https://www.example.com/prefix
    pub(crate) remote: String,
    // Static directory or the address of another local server
    pub(crate) local: LocalEntry,
    // Port to listen on
    pub(crate) port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LocalEntry {
    Proxy(String),
    Static(StaticEntry),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticEntry {
    #[serde(deserialize_with = "string_or_default", default = "default_prefix")]
    pub(crate) prefix: String,

    #[serde(deserialize_with = "string_or_default", default = "default_root")]
    pub(crate) root: String,

    #[serde(deserialize_with = "string_or_default", default = "default_index")]
    pub(crate) index: String,
}

/// A fully validated proxy instance, immutable once built.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    listen_port: u16,
    remote: ServerAddress,
    local: LocalMode,
    forward_rule: Option<Regex>,
}

/// Where requests that are not forced to the remote server are answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalMode {
    Static(LocalStaticConfig),
    Proxy(ServerAddress),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalStaticConfig {
    url_prefix: String,
    root_directory: PathBuf,
    index_file: String,
}

impl ConfigFile {
    pub fn entries(&self) -> &[ProxyEntry] {
        match self {
            ConfigFile::Many(entries) => entries,
            ConfigFile::Single(entry) => std::slice::from_ref(entry),
        }
    }

    /// Configuration written by `devproxy init`.
    pub fn template() -> Self {
        ConfigFile::Single(ProxyEntry {
            rule: Some("^/api/".to_string()),
            remote: "https://www.example.com".to_string(),
            local: LocalEntry::Static(StaticEntry { prefix: default_prefix(), root: default_root(), index: default_index() }),
            port: 1990,
        })
    }
}

impl ProxyEntry {
    pub fn new(rule: Option<String>, remote: impl Into<String>, local: LocalEntry, port: u16) -> Self {
        Self { rule, remote: remote.into(), local, port }
    }

    pub fn get_rule(&self) -> Option<&str> {
        self.rule.as_deref()
    }

    pub fn get_remote(&self) -> &str {
        &self.remote
    }

    pub fn get_local(&self) -> &LocalEntry {
        &self.local
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }
}

impl StaticEntry {
    pub fn new(prefix: impl Into<String>, root: impl Into<String>, index: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), root: root.into(), index: index.into() }
    }
}

impl RouteConfig {
    pub fn new(listen_port: u16, remote: ServerAddress, local: LocalMode, forward_rule: Option<Regex>) -> Self {
        Self { listen_port, remote, local, forward_rule }
    }

    pub fn get_listen_port(&self) -> u16 {
        self.listen_port
    }

    pub fn get_remote(&self) -> &ServerAddress {
        &self.remote
    }

    pub fn get_local(&self) -> &LocalMode {
        &self.local
    }

    pub fn get_forward_rule(&self) -> Option<&Regex> {
        self.forward_rule.as_ref()
    }
}

impl LocalStaticConfig {
    /// An empty prefix means the whole site is mapped onto `root_directory`.
    pub fn new(url_prefix: impl Into<String>, root_directory: impl AsRef<Path>, index_file: impl Into<String>) -> Self {
        let url_prefix = url_prefix.into();
        let url_prefix = if url_prefix.is_empty() { default_prefix() } else { url_prefix };
        Self { url_prefix, root_directory: root_directory.as_ref().to_path_buf(), index_file: index_file.into() }
    }

    pub fn get_url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn get_root_directory(&self) -> &Path {
        &self.root_directory
    }

    pub fn get_index_file(&self) -> &str {
        &self.index_file
    }

    pub fn has_default_prefix(&self) -> bool {
        self.url_prefix == "/"
    }
}

impl Display for ConfigFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| std::fmt::Error)?;
        writeln!(f, "{}", json)
    }
}

impl Display for RouteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, ":{} -> ", self.listen_port)?;
        match &self.local {
            LocalMode::Static(local) => write!(
                f,
                "static {} => {} (index {})",
                local.url_prefix,
                local.root_directory.display(),
                local.index_file
            )?,
            LocalMode::Proxy(target) => write!(f, "proxy {}", target)?,
        }
        write!(f, ", remote {}", self.remote)?;
        if let Some(rule) = &self.forward_rule {
            write!(f, ", rule /{}/", rule.as_str())?;
        }
        Ok(())
    }
}

// Forgiving string: null or non-string values fall back to the field default handling.
fn string_or_default<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match String::deserialize(deserializer) {
        Ok(s) => Ok(s),
        Err(e) => {
            warn!("Failed to deserialize string value: {}, using default", e);
            Ok(String::default())
        }
    }
}

fn default_prefix() -> String {
    "/".to_string()
}

fn default_root() -> String {
    "./".to_string()
}

fn default_index() -> String {
    "/index.html".to_string()
}
