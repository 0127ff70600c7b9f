use log::warn;

/// Trim trailing slashes from a path and warn if any were removed
pub fn trim_trailing_slash(path: String) -> String {
    if path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        warn!("Path should not end with '/', will be stripped: {}", trimmed);
        trimmed
    } else {
        path
    }
}

/// Drop everything from the first '?' onwards
pub fn strip_query(url: &str) -> &str {
    match url.find('?') {
        Some(index) => &url[..index],
        None => url,
    }
}
