// Proxy module
//
// This module contains the request path of a proxy instance:
// - router: Decides whether a request goes to disk, the local target or the remote server
// - static_files: Maps URLs to files under the static root and streams them
// - forwarder: Relays requests to an upstream server
// - headers: Request header filtering and response cookie/CORS rewriting
// - request_handler: Per-request entry point combining the above
// - http_server: Listeners, one per configured instance

pub mod forwarder;
pub mod headers;
pub mod http_server;
pub mod request_handler;
pub mod router;
pub mod static_files;

pub use http_server::{start_all, start_rp_server};
