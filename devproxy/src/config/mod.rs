// Configuration module
//
// This module contains all configuration-related functionality split into focused submodules:
// - address: Upstream server address parsing
// - error: Typed configuration errors
// - types: File format and validated runtime structures
// - loader: Configuration file loading and saving
// - validator: Turning file entries into runtime route configurations

pub mod address;
pub mod error;
pub mod loader;
pub mod types;
pub mod validator;

pub use address::{Scheme, ServerAddress};
pub use error::ConfigError;
pub use loader::CONFIG_FILE_NAME;
pub use types::{ConfigFile, LocalEntry, LocalMode, LocalStaticConfig, ProxyEntry, RouteConfig, StaticEntry};
