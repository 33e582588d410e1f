//! Live reload over real connections: event stream, file changes, shutdown.

mod common;

use std::time::Duration;

use spa_devserver::lifecycle::signals::close_and_shutdown;

use common::*;

const CONNECTED: &str = "event: connected\nid: 0\ndata: ready\n\n";
const RELOAD: &str = "event: message\nid: 0\ndata: reload\n\n";

/// Read from the stream until `needle` shows up.
async fn read_until(response: &mut reqwest::Response, needle: &str) -> String {
    let mut received = String::new();
    tokio::time::timeout(Duration::from_secs(5), async {
        while !received.contains(needle) {
            let chunk = response.chunk().await.unwrap().expect("stream ended early");
            received.push_str(&String::from_utf8_lossy(&chunk));
        }
    })
    .await
    .unwrap_or_else(|_| panic!("never received {needle:?}, got {received:?}"));
    received
}

/// Wait until the server closes the stream.
async fn read_to_end(response: &mut reqwest::Response) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while response.chunk().await.unwrap_or(None).is_some() {}
    })
    .await
    .expect("stream was not closed");
}

async fn subscribe(client: &reqwest::Client, url: &str) -> reqwest::Response {
    let response = client
        .get(format!("{url}/livereload"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    response
}

#[tokio::test]
async fn stream_starts_with_connected_event() {
    let dir = spa_fixture();
    let mut opts = options(dir.path());
    opts.reload = true;
    let server = spawn_server(opts).await;

    let client = client();
    let mut response = subscribe(&client, &server.url).await;

    let headers = response.headers();
    assert_eq!(headers["content-type"], "text/event-stream");
    assert_eq!(headers["cache-control"], "no-cache");
    assert_eq!(headers["connection"], "keep-alive");
    assert_eq!(headers["access-control-allow-origin"], "*");

    let received = read_until(&mut response, CONNECTED).await;
    assert!(received.starts_with(CONNECTED));

    server.shutdown.trigger();
}

#[tokio::test]
async fn file_change_reloads_every_subscriber() {
    let dir = spa_fixture();
    let mut opts = options(dir.path());
    opts.reload = true;
    let server = spawn_server(opts).await;

    let client = client();
    let mut first = subscribe(&client, &server.url).await;
    let mut second = subscribe(&client, &server.url).await;
    read_until(&mut first, CONNECTED).await;
    read_until(&mut second, CONNECTED).await;
    wait_for_subscribers(&server.hub, 2).await;

    write(dir.path(), "app.js", "console.log('changed');");

    read_until(&mut first, RELOAD).await;
    read_until(&mut second, RELOAD).await;

    // Reloaded subscribers are dropped and their streams end.
    read_to_end(&mut first).await;
    read_to_end(&mut second).await;
    wait_for_subscribers(&server.hub, 0).await;

    server.shutdown.trigger();
}

#[tokio::test]
async fn disconnected_client_is_deregistered() {
    let dir = spa_fixture();
    let mut opts = options(dir.path());
    opts.reload = true;
    // The failed ping write surfaces the disconnect.
    opts.heartbeat_secs = 1;
    let server = spawn_server(opts).await;

    let client = client();
    let mut response = subscribe(&client, &server.url).await;
    read_until(&mut response, CONNECTED).await;
    wait_for_subscribers(&server.hub, 1).await;

    drop(response);
    drop(client);
    wait_for_subscribers(&server.hub, 0).await;

    server.shutdown.trigger();
}

#[tokio::test]
async fn interrupt_closes_streams_and_stops_server() {
    let dir = spa_fixture();
    let mut opts = options(dir.path());
    opts.reload = true;
    let server = spawn_server(opts).await;

    let client = client();
    let mut first = subscribe(&client, &server.url).await;
    let mut second = subscribe(&client, &server.url).await;
    read_until(&mut first, CONNECTED).await;
    read_until(&mut second, CONNECTED).await;
    wait_for_subscribers(&server.hub, 2).await;

    close_and_shutdown(&server.hub, &server.shutdown).await;

    read_to_end(&mut first).await;
    read_to_end(&mut second).await;
    drop(client);

    let result = tokio::time::timeout(Duration::from_secs(10), server.task)
        .await
        .expect("server did not stop")
        .unwrap();
    assert!(result.is_ok());
}

#[tokio::test]
async fn no_event_stream_without_reload() {
    let dir = spa_fixture();
    let server = spawn_server(options(dir.path())).await;

    let response = client()
        .get(format!("{}/livereload", server.url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["content-type"], "text/html");

    server.shutdown.trigger();
}
