//! Content types for locally served files.
//!
//! The lookup is an exact, case-sensitive match on the extension as it appears on disk:
//! `app.JS` is served as `application/octet-stream`, not `text/javascript`.

use std::path::Path;

/// Content type for extensions missing from the table (and for files without one).
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Resolve the content type of an extension given without its leading dot.
pub fn content_type(extension: &str) -> &'static str {
    match extension {
        "html" => "text/html",
        "js" => "text/javascript",
        "css" => "text/css",
        "jpg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => DEFAULT_CONTENT_TYPE,
    }
}

/// Resolve the content type of a file from its extension.
pub fn content_type_for_path(path: &Path) -> &'static str {
    content_type(path.extension().and_then(|ext| ext.to_str()).unwrap_or(""))
}
