//! Serving files found by exact path.

use std::path::Path;

use axum::{http::StatusCode, response::Response};

use crate::http::response::{encode, ServeError};
use crate::routing::path::extension_of;

/// Read a file, classifying failures as 404 or 500.
pub async fn read_file(path: &Path) -> Result<Vec<u8>, ServeError> {
    tokio::fs::read(path)
        .await
        .map_err(|e| ServeError::from_read(path.to_path_buf(), e))
}

/// Serve `path` with its MIME type, compressed per the extension policy.
pub async fn serve_file(path: &Path) -> Result<Response, ServeError> {
    let bytes = read_file(path).await?;

    let path_str = path.to_string_lossy();
    let extension = extension_of(&path_str);
    let mime = mime_guess::from_ext(extension).first_or_octet_stream();

    encode(StatusCode::OK, mime.essence_str(), extension, bytes)
}
