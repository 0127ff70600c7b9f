//! Upstream server addresses.
//!
//! Addresses come from the configuration file as `http(s)://host[:port][/path]` and are parsed
//! once at startup. The optional path becomes a prefix that is prepended to every forwarded URL.

use crate::config::error::ConfigError;
use crate::utils::path::trim_trailing_slash;
use crate::utils::validation::validate_hostname_chars;
use regex::Regex;
use std::fmt::Display;
use hyper::Uri;
use once_cell::sync::Lazy;
use std::str::FromStr;

static ADDRESS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^http(s?)://([^/:]+)(?::(\d+))?(/.*)?$").expect("address pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    scheme: Scheme,
    host: String,
    port: u16,
    path_prefix: String,
}

impl ServerAddress {
    /// Parse `http(s)://host[:port][/path]`.
    ///
    /// Trailing slashes on the path are dropped, so `https://h/prefix/` forwards `/mweb/x` to
    /// `/prefix/mweb/x` rather than `/prefix//mweb/x`, and `https://h/` is accepted with an empty
    /// prefix. The result must form a valid URI once a request path is appended.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let invalid = || ConfigError::InvalidAddressFormat(input.to_string());
        let captures = ADDRESS_PATTERN.captures(input.trim()).ok_or_else(invalid)?;

        let scheme = if captures.get(1).is_some_and(|s| !s.as_str().is_empty()) { Scheme::Https } else { Scheme::Http };

        let host = captures[2].to_string();
        if !validate_hostname_chars(&host) {
            return Err(invalid());
        }

        let port = match captures.get(3) {
            Some(port) => match port.as_str().parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => return Err(invalid()),
            },
            None => scheme.default_port(),
        };

        // A bare "/" or a trailing slash would double up with the request path.
        let path_prefix = captures.get(4).map(|p| trim_trailing_slash(p.as_str().to_string())).unwrap_or_default();

        let address = Self { scheme, host, port, path_prefix };
        if format!("{}/", address).parse::<Uri>().is_err() {
            return Err(invalid());
        }
        Ok(address)
    }

    pub fn get_scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn get_host(&self) -> &str {
        &self.host
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_path_prefix(&self) -> &str {
        &self.path_prefix
    }

    pub fn is_default_port(&self) -> bool {
        self.port == self.scheme.default_port()
    }

    /// `scheme://host[:port]`, the port only when it differs from the scheme default.
    pub fn origin(&self) -> String {
        if self.is_default_port() {
            format!("{}://{}", self.scheme.as_str(), self.host)
        } else {
            format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port)
        }
    }
}

impl FromStr for ServerAddress {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for ServerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.origin(), self.path_prefix)
    }
}
