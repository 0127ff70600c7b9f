use crate::config::LocalStaticConfig;
use crate::utils::mime::content_type_for_path;
use crate::utils::path::strip_query;
use anyhow::Result;
use chrono::{DateTime, Utc};
use hyper::{Body, Response, StatusCode, header};
use log::{debug, warn};
use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio_util::io::ReaderStream;

/// A local file that will answer the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticFile {
    pub path: PathBuf,
    pub content_type: &'static str,
    pub size: u64,
    pub modified: Option<SystemTime>,
}

/// Result of looking a request up on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticLookup {
    Serve(StaticFile),
    /// Nothing servable locally; the request belongs to the remote server.
    NotFound,
}

/// Map a request URL onto a path under the static root.
///
/// - The query string is ignored.
/// - `/` is served as `url_prefix + index_file`.
/// - The first occurrence of `url_prefix` anywhere in the path marks where the local part starts;
///   without one there is no local path.
/// - Paths that would climb out of the root (`..`) have no local path either.
pub fn local_path(request_url: &str, config: &LocalStaticConfig) -> Option<PathBuf> {
    let path = strip_query(request_url);
    let path: Cow<str> =
        if path == "/" { Cow::Owned(format!("{}{}", config.get_url_prefix(), config.get_index_file())) } else { Cow::Borrowed(path) };

    let prefix = config.get_url_prefix();
    let start = path.find(prefix)?;
    let relative = Path::new(path[start + prefix.len()..].trim_start_matches('/'));

    if !relative.components().all(|c| matches!(c, Component::Normal(_) | Component::CurDir)) {
        warn!("Refusing to serve {} outside of {}", request_url, config.get_root_directory().display());
        return None;
    }
    Some(config.get_root_directory().join(relative))
}

/// Find the file answering `request_url`. Missing files, directories and files that cannot be
/// inspected are all reported as [`StaticLookup::NotFound`].
pub async fn resolve(request_url: &str, config: &LocalStaticConfig) -> StaticLookup {
    let Some(path) = local_path(request_url, config) else {
        return StaticLookup::NotFound;
    };

    match tokio::fs::metadata(&path).await {
        Ok(metadata) if metadata.is_dir() => {
            debug!("{} is a directory, not served locally", path.display());
            StaticLookup::NotFound
        }
        Ok(metadata) => StaticLookup::Serve(StaticFile {
            content_type: content_type_for_path(&path),
            size: metadata.len(),
            modified: metadata.modified().ok(),
            path,
        }),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("{} not found locally", path.display());
            StaticLookup::NotFound
        }
        Err(e) => {
            warn!("Unable to inspect {}: {}", path.display(), e);
            StaticLookup::NotFound
        }
    }
}

/// Stream a resolved file to the client with status 200.
pub async fn serve(file: &StaticFile) -> Result<Response<Body>> {
    let handle = tokio::fs::File::open(&file.path).await?;
    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, file.content_type)
        .header(header::CONTENT_LENGTH, file.size);
    if let Some(modified) = file.modified {
        builder = builder.header(header::LAST_MODIFIED, http_date(modified));
    }
    Ok(builder.body(Body::wrap_stream(ReaderStream::new(handle)))?)
}

/// Format a timestamp as an IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`).
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn mweb(root: &Path) -> LocalStaticConfig {
        LocalStaticConfig::new("/mweb", root, "/index.html")
    }

    #[test]
    fn test_local_path_strips_prefix_and_query() {
        let config = mweb(Path::new("/srv/public"));
        assert_eq!(local_path("/mweb/app.js", &config), Some(PathBuf::from("/srv/public/app.js")));
        assert_eq!(local_path("/mweb/js/app.js?v=2", &config), Some(PathBuf::from("/srv/public/js/app.js")));
    }

    #[test]
    fn test_local_path_root_is_index() {
        let config = mweb(Path::new("/srv/public"));
        assert_eq!(local_path("/", &config), local_path("/mweb/index.html", &config));
        assert_eq!(local_path("/?from=home", &config), Some(PathBuf::from("/srv/public/index.html")));
    }

    #[test]
    fn test_local_path_prefix_anywhere_in_path() {
        let config = mweb(Path::new("/srv/public"));
        assert_eq!(local_path("/m/mweb/app.js", &config), Some(PathBuf::from("/srv/public/app.js")));
        assert_eq!(local_path("/other/app.js", &config), None);
    }

    #[test]
    fn test_local_path_default_prefix() {
        let config = LocalStaticConfig::new("/", "/srv/public", "/index.html");
        assert_eq!(local_path("/", &config), Some(PathBuf::from("/srv/public/index.html")));
        assert_eq!(local_path("/css/site.css", &config), Some(PathBuf::from("/srv/public/css/site.css")));
    }

    #[test]
    fn test_local_path_rejects_traversal() {
        let config = mweb(Path::new("/srv/public"));
        assert_eq!(local_path("/mweb/../secret.txt", &config), None);
        assert_eq!(local_path("/mweb/js/../../etc/passwd", &config), None);
        assert_eq!(local_path("/mweb/./app.js", &config), Some(PathBuf::from("/srv/public/./app.js")));
    }

    #[tokio::test]
    async fn test_resolve_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('hi');").unwrap();

        match resolve("/mweb/app.js", &mweb(dir.path())).await {
            StaticLookup::Serve(file) => {
                assert_eq!(file.path, dir.path().join("app.js"));
                assert_eq!(file.content_type, "text/javascript");
                assert_eq!(file.size, 18);
                assert!(file.modified.is_some());
            }
            StaticLookup::NotFound => panic!("app.js should be served"),
        }
    }

    #[tokio::test]
    async fn test_resolve_root_serves_index() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();

        let root = resolve("/", &mweb(dir.path())).await;
        let explicit = resolve("/mweb/index.html", &mweb(dir.path())).await;
        assert_eq!(root, explicit);
        assert!(matches!(root, StaticLookup::Serve(ref f) if f.content_type == "text/html"));
    }

    #[tokio::test]
    async fn test_resolve_missing_file_and_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("js")).unwrap();

        assert_eq!(resolve("/mweb/missing.js", &mweb(dir.path())).await, StaticLookup::NotFound);
        assert_eq!(resolve("/mweb/js", &mweb(dir.path())).await, StaticLookup::NotFound);
        assert_eq!(resolve("/mweb", &mweb(dir.path())).await, StaticLookup::NotFound);
        assert_eq!(resolve("/elsewhere/app.js", &mweb(dir.path())).await, StaticLookup::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_stat_error_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.js"), "console.log('hi');").unwrap();

        // app.js is a file, so stat on app.js/x fails with something other than "not found"
        let err = std::fs::metadata(dir.path().join("app.js").join("x")).unwrap_err();
        assert_ne!(err.kind(), ErrorKind::NotFound);
        assert_eq!(resolve("/mweb/app.js/x", &mweb(dir.path())).await, StaticLookup::NotFound);
    }

    #[tokio::test]
    async fn test_serve_streams_file_with_headers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("site.css"), "body { color: red; }").unwrap();

        let StaticLookup::Serve(file) = resolve("/mweb/site.css", &mweb(dir.path())).await else {
            panic!("site.css should be served");
        };
        let response = serve(&file).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(header::CONTENT_TYPE).unwrap(), "text/css");
        assert_eq!(response.headers().get(header::CONTENT_LENGTH).unwrap(), "20");
        assert!(response.headers().get(header::LAST_MODIFIED).unwrap().to_str().unwrap().ends_with(" GMT"));

        let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&body[..], b"body { color: red; }");
    }

    #[tokio::test]
    async fn test_serve_missing_file_fails() {
        let file = StaticFile { path: PathBuf::from("/definitely/not/here.js"), content_type: "text/javascript", size: 0, modified: None };
        assert!(serve(&file).await.is_err());
    }

    #[test]
    fn test_http_date() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(784111777);
        assert_eq!(http_date(time), "Sun, 06 Nov 1994 08:49:37 GMT");
    }
}
