//! Directory listings for routes without a fallback document.

use std::path::Path;

use axum::{http::StatusCode, response::Response};

use crate::config::ServerConfig;
use crate::http::document::{base_document, encode_segment, escape_html};
use crate::http::response::{html, ServeError};
use crate::live_reload::script;
use crate::routing::NormalizedPathname;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Entry {
    // Directories sort first.
    is_file: bool,
    name: String,
}

/// Serve a listing of `root/pathname`, or 404 when it is not a directory.
pub async fn serve_listing(
    config: &ServerConfig,
    pathname: &NormalizedPathname,
) -> Result<Response, ServeError> {
    let directory = pathname.resolve(&config.root);

    let is_dir = tokio::fs::metadata(&directory)
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(ServeError::NotFound(directory));
    }

    let entries = read_entries(&directory).await?;
    let document = format!(
        "{}{}{}",
        base_document(&pathname.directory()),
        render_listing(&pathname.directory(), &entries),
        script::bootstrap(config.reload_enabled),
    );

    Ok(html(StatusCode::OK, document))
}

async fn read_entries(directory: &Path) -> Result<Vec<Entry>, ServeError> {
    let read_err = |e| ServeError::from_read(directory.to_path_buf(), e);

    let mut dir = tokio::fs::read_dir(directory).await.map_err(read_err)?;
    let mut entries = Vec::new();
    while let Some(entry) = dir.next_entry().await.map_err(read_err)? {
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        entries.push(Entry {
            is_file: !is_dir,
            name: entry.file_name().to_string_lossy().into_owned(),
        });
    }
    entries.sort();
    Ok(entries)
}

fn render_listing(directory: &str, entries: &[Entry]) -> String {
    let title = escape_html(directory);
    let mut markup = format!("<title>Index of {title}</title><h1>Index of {title}</h1><ul>");

    if directory != "/" {
        markup.push_str(r#"<li><a href="../">../</a></li>"#);
    }
    for entry in entries {
        let slash = if entry.is_file { "" } else { "/" };
        markup.push_str(&format!(
            r#"<li><a href="{}{slash}">{}{slash}</a></li>"#,
            encode_segment(&entry.name),
            escape_html(&entry.name),
        ));
    }
    markup.push_str("</ul>");
    markup
}
