//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, response::Response};
use flate2::read::GzDecoder;
use spa_devserver::lifecycle::{self, Shutdown};
use spa_devserver::{HttpServer, LiveReloadHub, ServeOptions};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tower::ServiceExt;

pub const INDEX_HTML: &str = "<!doctype html><title>app</title><div id=\"root\"></div>";
pub const APP_JS: &str = "console.log('app');";

/// A served directory with a typical SPA layout.
///
/// ```text
/// index.html
/// app.js
/// style.css
/// logo.png
/// docs/guide.txt
/// docs/api/
/// ```
pub fn spa_fixture() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "index.html", INDEX_HTML);
    write(dir.path(), "app.js", APP_JS);
    write(dir.path(), "style.css", "body { margin: 0; }");
    fs::write(dir.path().join("logo.png"), [0x89, b'P', b'N', b'G']).unwrap();
    write(dir.path(), "docs/guide.txt", "read me");
    fs::create_dir_all(dir.path().join("docs/api")).unwrap();
    dir
}

pub fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Options serving `root` on an OS-assigned loopback port.
pub fn options(root: &Path) -> ServeOptions {
    ServeOptions {
        root: Some(root.to_path_buf()),
        port: Some(0),
        host: "127.0.0.1".to_string(),
        debounce_ms: 50,
        ..ServeOptions::default()
    }
}

/// Send one request through the full middleware stack without a socket.
pub async fn request(options: ServeOptions, path: &str) -> Response {
    let config = Arc::new(options.resolve().unwrap());
    let hub = LiveReloadHub::spawn(Duration::from_secs(60));
    let server = HttpServer::new(config, hub);

    server
        .router()
        .oneshot(Request::get(path).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn gunzip(bytes: &[u8]) -> String {
    let mut decoded = String::new();
    GzDecoder::new(bytes).read_to_string(&mut decoded).unwrap();
    decoded
}

/// A server listening on a real socket.
pub struct RunningServer {
    pub url: String,
    pub hub: LiveReloadHub,
    pub shutdown: Shutdown,
    pub task: JoinHandle<std::io::Result<()>>,
}

pub async fn spawn_server(options: ServeOptions) -> RunningServer {
    let server = lifecycle::start(options).await.unwrap();
    let url = format!("http://127.0.0.1:{}", server.descriptor().port);
    let hub = server.hub();
    let shutdown = Shutdown::new();
    let task = tokio::spawn(server.run(shutdown.subscribe()));

    RunningServer {
        url,
        hub,
        shutdown,
        task,
    }
}

/// HTTP client that talks to loopback directly, ignoring proxy settings.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// Poll until the hub reports `expected` subscribers.
pub async fn wait_for_subscribers(hub: &LiveReloadHub, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            if hub.subscriber_count().await.unwrap() == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("subscriber count never reached");
}
