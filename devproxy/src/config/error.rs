use thiserror::Error;

/// Reasons a configuration entry cannot be turned into a running proxy instance.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid address format: '{0}' (expected http(s)://host[:port][/path])")]
    InvalidAddressFormat(String),

    #[error("Invalid forward rule '{pattern}': {source}")]
    InvalidRule {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid listen port: {0}")]
    InvalidPort(String),
}
