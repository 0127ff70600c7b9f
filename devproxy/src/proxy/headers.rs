//! Header rewriting between the browser and the upstream servers.
//!
//! Outbound requests lose the headers that pin them to the proxy's own origin so the upstream sees
//! its natural values. Inbound responses lose cookie domain scoping and CORS origin grants so the
//! browser keeps the session on the proxy's host.

use hyper::header::{self, HeaderMap, HeaderName, HeaderValue};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

/// Request headers never copied to an upstream.
pub const EXCLUDED_REQUEST_HEADERS: [HeaderName; 3] = [header::HOST, header::ORIGIN, header::REFERER];

static COOKIE_DOMAIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i); domain=[^;]+").expect("cookie domain pattern is valid"));

/// Remove every `; domain=...` attribute from a `Set-Cookie` value.
pub fn strip_cookie_domain(cookie: &str) -> Cow<'_, str> {
    COOKIE_DOMAIN.replace_all(cookie, "")
}

/// Copy of the inbound headers minus `host`, `origin` and `referer`.
/// Repeated headers keep all of their values in their original order.
pub fn forwardable_request_headers(inbound: &HeaderMap) -> HeaderMap {
    let mut outbound = HeaderMap::with_capacity(inbound.len());
    for (name, value) in inbound.iter() {
        if !EXCLUDED_REQUEST_HEADERS.contains(name) {
            outbound.append(name.clone(), value.clone());
        }
    }
    outbound
}

/// Rewrite an upstream response's headers in place before they reach the browser.
pub fn rewrite_response_headers(headers: &mut HeaderMap) {
    let cookies: Vec<HeaderValue> = headers.get_all(header::SET_COOKIE).iter().map(rewrite_cookie).collect();
    if !cookies.is_empty() {
        headers.remove(header::SET_COOKIE);
        for cookie in cookies {
            headers.append(header::SET_COOKIE, cookie);
        }
    }
    headers.remove(header::ACCESS_CONTROL_ALLOW_ORIGIN);
}

// Non UTF-8 cookies are passed through untouched.
fn rewrite_cookie(value: &HeaderValue) -> HeaderValue {
    match value.to_str() {
        Ok(cookie) => match strip_cookie_domain(cookie) {
            Cow::Borrowed(_) => value.clone(),
            Cow::Owned(stripped) => HeaderValue::from_str(&stripped).unwrap_or_else(|_| value.clone()),
        },
        Err(_) => value.clone(),
    }
}
