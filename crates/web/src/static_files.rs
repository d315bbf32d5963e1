//! Static file serving
//!
//! The page, its script and stylesheet are compiled into the binary so the
//! server has no runtime dependency on a working directory.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::server::ApiError;

/// Calculator page served at `/`
pub const INDEX_HTML: &str = include_str!("../static/index.html");

/// Browser side of the request/response cycle
pub const SCRIPT_JS: &str = include_str!("../static/script.js");

pub const STYLE_CSS: &str = include_str!("../static/style.css");

/// Static file handler
pub struct StaticFiles {
    files: &'static [(&'static str, &'static str)],
}

impl StaticFiles {
    pub fn new() -> Self {
        Self {
            files: &[("script.js", SCRIPT_JS), ("style.css", STYLE_CSS)],
        }
    }

    /// Look up an embedded file by its path under `/static/`
    pub fn get(&self, path: &str) -> Option<&'static str> {
        self.files
            .iter()
            .find(|(name, _)| *name == path)
            .map(|(_, content)| *content)
    }

    /// Serve a static file; unknown names get the same 404 body as any other path
    pub fn serve(&self, path: &str) -> Result<Response, ApiError> {
        self.get(path)
            .map(|content| serve_embedded(content, content_type(path)))
            .ok_or(ApiError::NotFound)
    }
}

impl Default for StaticFiles {
    fn default() -> Self {
        Self::new()
    }
}

fn content_type(path: &str) -> String {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    match mime.type_() {
        mime_guess::mime::TEXT => format!("{}; charset=utf-8", mime.essence_str()),
        _ => mime.essence_str().to_string(),
    }
}

fn serve_embedded(content: &'static str, content_type: String) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], content).into_response()
}

/// Serve the calculator page
pub fn serve_index() -> Response {
    serve_embedded(INDEX_HTML, content_type("index.html"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_carries_dom_contract() {
        for id in [
            "id=\"a\"",
            "id=\"b\"",
            "id=\"result\"",
            "id=\"btn-add\"",
            "id=\"btn-subtract\"",
            "id=\"btn-multiply\"",
            "id=\"btn-divide\"",
        ] {
            assert!(INDEX_HTML.contains(id), "page is missing {}", id);
        }
        assert!(INDEX_HTML.contains("/static/script.js"));
    }

    #[test]
    fn test_script_binds_all_buttons() {
        for endpoint in ["add", "subtract", "multiply", "divide"] {
            assert!(SCRIPT_JS.contains(&format!("'{}'", endpoint)), "script does not bind {}", endpoint);
        }
        assert!(SCRIPT_JS.contains("Unknown error"));
    }

    #[test]
    fn test_lookup() {
        let files = StaticFiles::new();
        assert!(files.get("script.js").is_some());
        assert!(files.get("../Cargo.toml").is_none());
        assert!(files.get("missing.js").is_none());
    }

    #[test]
    fn test_unknown_file_is_not_found() {
        let err = StaticFiles::new().serve("missing.js").unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_content_types() {
        assert!(content_type("script.js").contains("javascript"));
        assert_eq!(content_type("style.css"), "text/css; charset=utf-8");
        assert_eq!(content_type("index.html"), "text/html; charset=utf-8");
        assert_eq!(content_type("blob.bin"), "application/octet-stream");
    }
}
