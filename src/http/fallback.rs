//! Fallback documents for route requests.
//!
//! # Responsibilities
//! - Locate the fallback (single SPA document, or per-directory in static mode)
//! - Apply module wrapping, base href, inject snippet and reload bootstrap
//! - Hand over to the directory listing when no fallback exists
//!
//! # Design Decisions
//! - Non-root routes outside static mode answer `301` without a `Location`
//!   header; browsers render the body. Kept for compatibility with existing
//!   dev setups.

use std::path::PathBuf;

use axum::{http::StatusCode, response::Response};

use crate::config::ServerConfig;
use crate::http::document::base_document;
use crate::http::listing::serve_listing;
use crate::http::response::{encode, ServeError, TEXT_HTML};
use crate::http::static_file::read_file;
use crate::live_reload::script;
use crate::routing::NormalizedPathname;

/// Where the fallback document for `pathname` lives.
pub fn fallback_path(config: &ServerConfig, pathname: &NormalizedPathname) -> PathBuf {
    if config.static_mode {
        pathname.resolve(&config.root).join(&config.fallback_name)
    } else {
        config.root.join(&config.fallback_name)
    }
}

/// Status for a served fallback document.
pub fn fallback_status(config: &ServerConfig, pathname: &NormalizedPathname) -> StatusCode {
    if pathname.is_root() || config.static_mode {
        StatusCode::OK
    } else {
        StatusCode::MOVED_PERMANENTLY
    }
}

/// Serve the fallback document for a route, or a directory listing.
pub async fn serve_route(
    config: &ServerConfig,
    pathname: &NormalizedPathname,
) -> Result<Response, ServeError> {
    let path = fallback_path(config, pathname);

    let exists = tokio::fs::metadata(&path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !exists {
        tracing::debug!(path = %pathname, "No fallback document, listing directory");
        return serve_listing(config, pathname).await;
    }

    let bytes = read_file(&path).await?;
    let document = render_document(config, pathname, &String::from_utf8_lossy(&bytes));

    encode(
        fallback_status(config, pathname),
        TEXT_HTML,
        "html",
        document.into_bytes(),
    )
}

/// Build the final document from the fallback file contents.
pub fn render_document(config: &ServerConfig, pathname: &NormalizedPathname, content: &str) -> String {
    let mut document = if config.module_mode {
        format!(r#"<script type="module">{content}</script>"#)
    } else {
        content.to_string()
    };

    if config.static_mode {
        document.insert_str(0, &base_document(&pathname.directory()));
    }

    document.push_str(&config.inject_snippet);
    document.push_str(script::bootstrap(config.reload_enabled));
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServeOptions;
    use crate::live_reload::script::RELOAD_BOOTSTRAP;

    fn config(dir: &std::path::Path, edit: impl FnOnce(&mut ServeOptions)) -> ServerConfig {
        let mut options = ServeOptions {
            root: Some(dir.to_path_buf()),
            ..ServeOptions::default()
        };
        edit(&mut options);
        options.resolve_with_port_env(None).unwrap()
    }

    #[test]
    fn spa_fallback_lives_at_root() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), |_| {});
        let path = fallback_path(&cfg, &NormalizedPathname::from_raw("/deep/route"));
        assert_eq!(path, cfg.root.join("index.html"));
    }

    #[test]
    fn static_fallback_lives_in_request_directory() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), |o| o.static_mode = true);
        let path = fallback_path(&cfg, &NormalizedPathname::from_raw("/guide/intro"));
        assert_eq!(path, cfg.root.join("guide").join("intro").join("index.html"));
    }

    #[test]
    fn status_quirk() {
        let dir = tempfile::tempdir().unwrap();
        let spa = config(dir.path(), |_| {});
        let stat = config(dir.path(), |o| o.static_mode = true);
        let root = NormalizedPathname::root();
        let nested = NormalizedPathname::from_raw("/users/42");

        assert_eq!(fallback_status(&spa, &root), StatusCode::OK);
        assert_eq!(fallback_status(&spa, &nested), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(fallback_status(&stat, &nested), StatusCode::OK);
    }

    #[test]
    fn transformations_apply_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), |o| {
            o.module = true;
            o.static_mode = true;
            o.reload = true;
            o.inject = "<!-- injected -->".into();
        });

        let doc = render_document(&cfg, &NormalizedPathname::from_raw("/app"), "import './main.js'");
        let expected = format!(
            r#"<!doctype html><meta charset="utf-8"/><base href="/app/"/><script type="module">import './main.js'</script><!-- injected -->{RELOAD_BOOTSTRAP}"#
        );
        assert_eq!(doc, expected);
    }

    #[test]
    fn plain_document_untouched_without_options() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(dir.path(), |_| {});
        let doc = render_document(&cfg, &NormalizedPathname::root(), "<h1>hi</h1>");
        assert_eq!(doc, "<h1>hi</h1>");
    }

    #[tokio::test]
    async fn missing_fallback_lists_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/readme.txt"), "x").unwrap();
        let cfg = config(dir.path(), |_| {});

        let response = serve_route(&cfg, &NormalizedPathname::from_raw("/docs/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let err = serve_route(&cfg, &NormalizedPathname::from_raw("/nothing/")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }
}
