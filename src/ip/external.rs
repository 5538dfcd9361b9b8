use std::net::IpAddr;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::IpLookup;
use crate::error::{Error, Result};

pub const DEFAULT_IP_SERVICE: &str = "http://httpbin.org/ip";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize)]
struct EchoResponse {
    origin: String,
}

/// Looks up the public address through an httpbin-style echo endpoint.
pub struct IpResolver {
    client: Client,
    endpoint: String,
}

impl IpResolver {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::with_timeout(endpoint, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn fetch_origin(&self) -> Result<String> {
        let response: EchoResponse = self
            .client
            .get(&self.endpoint)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response.origin)
    }
}

#[async_trait]
impl IpLookup for IpResolver {
    async fn resolve_external_ip(&self) -> Result<IpAddr> {
        let origin = self.fetch_origin().await.map_err(|e| {
            Error::network(format!("error getting external IP from {}: {}", self.endpoint(), e))
        })?;

        let ip = parse_origin(&origin)?;
        tracing::info!("Found external IP: {}", ip);
        Ok(ip)
    }
}

/// Extracts the canonical address from an `origin` field. Proxies append
/// their own addresses after the client's, so the first entry wins.
pub fn parse_origin(origin: &str) -> Result<IpAddr> {
    let first = origin.split(',').next().unwrap_or_default().trim();

    if first.is_empty() {
        return Err(Error::network("IP service returned an empty origin"));
    }

    first
        .parse()
        .map_err(|e| Error::network(format!("Invalid IP address '{}': {}", first, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_single_origin() {
        let test_cases = vec!["203.0.113.7", "  203.0.113.7\n", "2001:db8::1"];

        for case in test_cases {
            let ip = parse_origin(case).unwrap();
            assert_eq!(ip.to_string(), case.trim(), "Failed to parse: {}", case);
        }
    }

    #[test]
    fn test_parse_multiple_origins_takes_first() {
        let ip = parse_origin("203.0.113.7, 198.51.100.1").unwrap();
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());

        let ip = parse_origin(" 203.0.113.7 ,198.51.100.1,192.0.2.1").unwrap();
        assert_eq!(ip, "203.0.113.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_parse_invalid_origin() {
        assert!(matches!(parse_origin(""), Err(Error::Network(_))));
        assert!(matches!(parse_origin(", 198.51.100.1"), Err(Error::Network(_))));
        assert!(matches!(parse_origin("not-an-ip"), Err(Error::Network(_))));
    }

    #[tokio::test]
    async fn test_resolve_external_ip() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/ip"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "origin": "198.51.100.4, 10.1.2.3" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let resolver = IpResolver::new(format!("{}/ip", server.uri())).unwrap();
        let ip = resolver.resolve_external_ip().await.unwrap();

        assert_eq!(ip, "198.51.100.4".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_resolve_external_ip_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let resolver = IpResolver::new(format!("{}/ip", server.uri())).unwrap();
        let err = resolver.resolve_external_ip().await.unwrap_err();

        assert!(matches!(err, Error::Network(_)));
        assert!(err.to_string().contains(resolver.endpoint()));
    }

    #[tokio::test]
    async fn test_resolve_external_ip_missing_origin() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ip": "1.2.3.4" })),
            )
            .mount(&server)
            .await;

        let resolver = IpResolver::new(format!("{}/ip", server.uri())).unwrap();
        assert!(matches!(
            resolver.resolve_external_ip().await,
            Err(Error::Network(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_external_ip_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "origin": "198.51.100.4" }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let resolver =
            IpResolver::with_timeout(format!("{}/ip", server.uri()), Duration::from_millis(200))
                .unwrap();

        assert!(matches!(
            resolver.resolve_external_ip().await,
            Err(Error::Network(_))
        ));
    }
}
