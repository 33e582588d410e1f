//! Request path decoding and normalization.
//!
//! # Responsibilities
//! - Percent-decode the raw request path
//! - Collapse `.` and `..` segments so the result never escapes `/`
//! - Answer the questions routing asks (extension? root? directory?)
//!
//! # Design Decisions
//! - A path that fails to decode becomes `/`; the request never fails
//! - Normalization is lexical; it is the only traversal defense, so every
//!   filesystem path is derived through [`NormalizedPathname::resolve`]
//! - A trailing `/` survives normalization (listings and base hrefs rely on it)

use std::fmt;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// A decoded, traversal-free request path. Always starts with `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPathname(String);

impl NormalizedPathname {
    /// The root path `/`.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Decode and normalize a raw (still percent-encoded) request path.
    pub fn from_raw(raw: &str) -> Self {
        match percent_decode_str(raw).decode_utf8() {
            Ok(decoded) => Self::normalize(&decoded),
            Err(e) => {
                tracing::warn!(path = %raw, error = %e, "Failed to decode request path, serving /");
                Self::root()
            }
        }
    }

    fn normalize(decoded: &str) -> Self {
        let unified = decoded.replace('\\', "/");
        let trailing_slash = unified.ends_with('/');

        let cleaned = path_clean::clean(format!("/{unified}"));
        let mut normalized = cleaned.to_string_lossy().into_owned();
        if !normalized.starts_with('/') {
            normalized.insert(0, '/');
        }
        if trailing_slash && !normalized.ends_with('/') {
            normalized.push('/');
        }
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Text after the last `/` (empty for directory paths).
    pub fn last_segment(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or_default()
    }

    /// Whether the final segment looks like a file name.
    pub fn has_extension(&self) -> bool {
        self.last_segment().contains('.')
    }

    /// The path as a directory, i.e. with a trailing `/`.
    pub fn directory(&self) -> String {
        if self.0.ends_with('/') {
            self.0.clone()
        } else {
            format!("{}/", self.0)
        }
    }

    /// Join onto `root`. The result is always inside `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        let relative = self.0.trim_start_matches('/');
        if relative.is_empty() {
            root.to_path_buf()
        } else {
            root.join(relative)
        }
    }
}

impl fmt::Display for NormalizedPathname {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// File extension as the substring after the last `.` or `/`.
pub fn extension_of(path: &str) -> &str {
    path.rsplit(['.', '/']).next().unwrap_or_default()
}
