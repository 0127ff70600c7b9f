//! Static Site Example
//!
//! Serves `./public` under `/mweb` on port 1990 and sends everything else, including anything
//! under `/api/`, to the remote origin. No configuration file is needed.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example static_site -- https://www.example.com
//! ```

use anyhow::Result;
use devproxy::config::{LocalEntry, ProxyEntry, StaticEntry};
use devproxy::proxy;
use log::info;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::env_logger::builder().format_timestamp(None).filter_level(log::LevelFilter::Info).init();

    let remote = std::env::args().nth(1).unwrap_or_else(|| "https://www.example.com".to_string());
    let entry = ProxyEntry::new(Some("^/api/".to_string()), remote, LocalEntry::Static(StaticEntry::new("/mweb", "./public", "/index.html")), 1990);
    let route = entry.resolve(Path::new("."))?;

    info!("Serving {}", route);
    proxy::start_rp_server(route).await
}
