use crate::config::{LocalMode, LocalStaticConfig, RouteConfig, ServerAddress};
use hyper::Method;

/// Where a single request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch<'a> {
    /// Relay to an upstream server.
    Forward(&'a ServerAddress),
    /// Try the local files first, falling back to the remote server.
    Static(&'a LocalStaticConfig),
}

/// Decide where `url` (path and query) goes. The rules are checked in order:
///
/// 1. `POST` is API traffic and always goes to the remote server.
/// 2. URLs matching the forward rule go to the remote server.
/// 3. With a non-root prefix, URLs other than `/` that do not contain the prefix go to the remote
///    server without touching the disk.
/// 4. In proxy mode everything else goes to the local proxy target.
/// 5. Otherwise the static files are consulted.
pub fn dispatch<'a>(route: &'a RouteConfig, method: &Method, url: &str) -> Dispatch<'a> {
    let remote = Dispatch::Forward(route.get_remote());

    if *method == Method::POST {
        return remote;
    }

    if route.get_forward_rule().is_some_and(|rule| rule.is_match(url)) {
        return remote;
    }

    match route.get_local() {
        LocalMode::Static(local) if !local.has_default_prefix() && url != "/" && !url.contains(local.get_url_prefix()) => remote,
        LocalMode::Proxy(target) => Dispatch::Forward(target),
        LocalMode::Static(local) => Dispatch::Static(local),
    }
}
