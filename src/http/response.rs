//! Response synthesis.
//!
//! # Responsibilities
//! - Apply the per-extension compression policy (ResponseEncoder)
//! - Map serving failures to status responses
//!
//! # Design Decisions
//! - Compression is a fixed allow-list by extension, never content sniffing
//!   and independent of `Accept-Encoding`
//! - Error bodies are just the status code

use std::io::Write;
use std::path::PathBuf;

use axum::{
    body::Body,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use flate2::{write::GzEncoder, Compression};
use thiserror::Error;

/// Extensions whose bodies are gzip-compressed.
pub const COMPRESSED_EXTENSIONS: [&str; 6] = ["js", "css", "html", "json", "xml", "svg"];

pub const TEXT_HTML: &str = "text/html";

/// Failure while producing a response.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode response: {0}")]
    Encode(#[source] std::io::Error),
}

impl ServeError {
    /// Classify an IO error raised while reading `path`.
    ///
    /// Names the OS cannot represent (e.g. an embedded NUL) cannot exist,
    /// so they count as missing.
    pub fn from_read(path: PathBuf, source: std::io::Error) -> Self {
        use std::io::ErrorKind;

        if matches!(source.kind(), ErrorKind::NotFound | ErrorKind::InvalidInput) {
            ServeError::NotFound(path)
        } else {
            ServeError::Read { path, source }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::NotFound(_) => StatusCode::NOT_FOUND,
            ServeError::Read { .. } | ServeError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Failed to serve request");
        } else {
            tracing::debug!(error = %self, "Not found");
        }
        status_response(status)
    }
}

/// A bare response whose body is the numeric status code.
pub fn status_response(status: StatusCode) -> Response {
    (status, status.as_u16().to_string()).into_response()
}

/// Whether bodies for `extension` are gzip-compressed.
pub fn should_compress(extension: &str) -> bool {
    COMPRESSED_EXTENSIONS.contains(&extension)
}

/// Build a response, compressing the body when `extension` is in the allow-list.
pub fn encode(
    status: StatusCode,
    content_type: &str,
    extension: &str,
    body: Vec<u8>,
) -> Result<Response, ServeError> {
    let mut builder = Response::builder().status(status);

    let body = if should_compress(extension) {
        builder = builder.header(header::CONTENT_ENCODING, "gzip");
        gzip(&body).map_err(ServeError::Encode)?
    } else {
        body
    };

    let content_type = HeaderValue::from_str(content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    builder
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from(body))
        .map_err(|e| ServeError::Encode(std::io::Error::other(e)))
}

/// Build an uncompressed HTML response.
pub fn html(status: StatusCode, document: String) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_HTML))],
        document,
    )
        .into_response()
}

fn gzip(bytes: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::with_capacity(bytes.len() / 2), Compression::default());
    encoder.write_all(bytes)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn allow_listed_extensions_are_gzipped() {
        let original = b"function hello() { return 'world'; }".repeat(10);
        for ext in COMPRESSED_EXTENSIONS {
            let response = encode(StatusCode::OK, "text/plain", ext, original.clone()).unwrap();
            assert_eq!(response.headers()[header::CONTENT_ENCODING], "gzip");

            let compressed = body_bytes(response).await;
            let mut decoded = Vec::new();
            GzDecoder::new(compressed.as_slice())
                .read_to_end(&mut decoded)
                .unwrap();
            assert_eq!(decoded, original, "extension {ext}");
        }
    }

    #[tokio::test]
    async fn other_extensions_are_raw() {
        let original = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3];
        for ext in ["png", "woff2", "txt", "JS", "map", "wasm"] {
            let response = encode(StatusCode::OK, "image/png", ext, original.clone()).unwrap();
            assert!(response.headers().get(header::CONTENT_ENCODING).is_none());
            assert_eq!(body_bytes(response).await, original);
        }
    }

    #[test]
    fn unrepresentable_names_are_not_found() {
        let path = PathBuf::from("/srv/a\0b.js");
        let invalid = std::io::Error::new(std::io::ErrorKind::InvalidInput, "nul byte");
        assert_eq!(ServeError::from_read(path.clone(), invalid).status(), StatusCode::NOT_FOUND);

        let denied = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert_eq!(
            ServeError::from_read(path, denied).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn error_body_is_status_code() {
        let response = ServeError::NotFound(PathBuf::from("/x")).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_bytes(response).await, b"404");

        let err = ServeError::from_read(
            PathBuf::from("/x"),
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_bytes(response).await, b"500");
    }
}
