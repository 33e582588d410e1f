//! Best-effort client geolocation for access logs.
//!
//! Lookups are bounded by a timeout and never fail: any error is logged and
//! replaced by [`UNKNOWN_LOCATION`]. Local addresses are never looked up.

use std::net::IpAddr;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const UNKNOWN_LOCATION: &str = "unknown location";
pub const LOCAL_LOCATION: &str = "local network";

const DEFAULT_ENDPOINT: &str = "http://ip-api.com/json/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("lookup request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("lookup timed out")]
    Timeout,

    #[error("lookup rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
}

/// Resolves client IPs to a printable location.
#[derive(Debug, Clone)]
pub struct GeoLocator {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl GeoLocator {
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// Use a different lookup service. The IP is appended to `endpoint`.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .no_proxy()
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bound each lookup to `timeout`.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Location of `ip`, or a placeholder.
    pub async fn locate(&self, ip: IpAddr) -> String {
        if is_local(ip) {
            return LOCAL_LOCATION.to_string();
        }

        let lookup = tokio::time::timeout(self.timeout, self.lookup(ip));
        match lookup.await.unwrap_or(Err(EnrichmentError::Timeout)) {
            Ok(location) => location,
            Err(e) => {
                tracing::debug!(ip = %ip, error = %e, "Geolocation lookup failed");
                UNKNOWN_LOCATION.to_string()
            }
        }
    }

    async fn lookup(&self, ip: IpAddr) -> Result<String, EnrichmentError> {
        let response: LookupResponse = self
            .client
            .get(format!("{}{}", self.endpoint, ip))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "success" {
            return Err(EnrichmentError::Rejected(
                response.message.unwrap_or(response.status),
            ));
        }

        let parts: Vec<String> = [response.city, response.country]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            Ok(UNKNOWN_LOCATION.to_string())
        } else {
            Ok(parts.join(", "))
        }
    }
}

impl Default for GeoLocator {
    fn default() -> Self {
        Self::new()
    }
}

fn is_local(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            let unique_local = (v6.segments()[0] & 0xfe00) == 0xfc00;
            let link_local = (v6.segments()[0] & 0xffc0) == 0xfe80;
            v6.is_loopback() || v6.is_unspecified() || unique_local || link_local
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, routing::get, Json, Router};

    #[test]
    fn local_addresses_detected() {
        assert!(is_local("127.0.0.1".parse().unwrap()));
        assert!(is_local("192.168.1.20".parse().unwrap()));
        assert!(is_local("10.0.0.1".parse().unwrap()));
        assert!(is_local("::1".parse().unwrap()));
        assert!(is_local("fd00::1".parse().unwrap()));
        assert!(!is_local("8.8.8.8".parse().unwrap()));
    }

    #[tokio::test]
    async fn local_ip_skips_lookup() {
        let locator = GeoLocator::with_endpoint("http://127.0.0.1:1/");
        assert_eq!(locator.locate("127.0.0.1".parse().unwrap()).await, LOCAL_LOCATION);
    }

    #[tokio::test]
    async fn unreachable_service_gives_placeholder() {
        let locator = GeoLocator::with_endpoint("http://127.0.0.1:1/").timeout(Duration::from_millis(500));
        assert_eq!(locator.locate("8.8.8.8".parse().unwrap()).await, UNKNOWN_LOCATION);
    }

    #[tokio::test]
    async fn successful_lookup_formats_location() {
        let app = Router::new().route(
            "/json/{ip}",
            get(|Path(ip): Path<String>| async move {
                if ip == "1.1.1.1" {
                    Json(serde_json::json!({ "status": "success", "city": "Sydney", "country": "Australia" }))
                } else {
                    Json(serde_json::json!({ "status": "fail", "message": "reserved range" }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let locator = GeoLocator::with_endpoint(format!("http://{addr}/json/"));
        assert_eq!(locator.locate("1.1.1.1".parse().unwrap()).await, "Sydney, Australia");
        assert_eq!(locator.locate("9.9.9.9".parse().unwrap()).await, UNKNOWN_LOCATION);
    }
}
