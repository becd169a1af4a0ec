//! Static-asset stage.
//!
//! Files are streamed straight from disk, bypassing the route groups. A
//! mount that has no file for the path lets the request continue down the
//! pipeline.

use std::path::{Path, PathBuf};

use axum::body::Body;
use axum::http::{request::Parts, Method, Request, StatusCode, Uri};
use axum::response::Response;
use tower::ServiceExt;
use tower_http::services::ServeDir;

use crate::routing::MountMatcher;

/// One directory served under one mount point.
#[derive(Debug, Clone)]
pub struct StaticMount {
    matcher: MountMatcher,
    dir: PathBuf,
    service: ServeDir,
}

impl StaticMount {
    pub fn new(mount: &str, dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref().to_path_buf();
        Self {
            matcher: MountMatcher::new(mount),
            service: ServeDir::new(&dir).append_index_html_on_directories(false),
            dir,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Serve the file for `parts`, or `None` to fall through.
    ///
    /// Only GET and HEAD are served. Directory paths never are, so an index
    /// file can not shadow a route.
    pub async fn serve(&self, parts: &Parts) -> Option<Response> {
        if parts.method != Method::GET && parts.method != Method::HEAD {
            return None;
        }
        let relative = self.matcher.strip(parts.uri.path())?;
        if relative.ends_with('/') {
            return None;
        }

        let uri: Uri = match parts.uri.query() {
            Some(query) => format!("{relative}?{query}"),
            None => relative.to_string(),
        }
        .parse()
        .ok()?;

        let mut request = Request::new(Body::empty());
        *request.method_mut() = parts.method.clone();
        *request.uri_mut() = uri;
        *request.headers_mut() = parts.headers.clone();

        let response = match self.service.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };

        if response.status() == StatusCode::NOT_FOUND {
            return None;
        }
        Some(response.map(Body::new))
    }
}
