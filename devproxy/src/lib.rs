//! Local development reverse proxy.
//!
//! Each configured instance listens on its own port, answers requests from files on disk where
//! it can and relays everything else to a remote origin, rewriting headers and cookies so the
//! browser treats the proxy as the site.

pub mod config;
pub mod proxy;
pub mod utils;
