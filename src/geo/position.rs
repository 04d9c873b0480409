//! Current-position capability
//!
//! One-shot "where am I" lookups. Failures are split into
//! `Error::PermissionDenied` (the user switched geolocation off) and
//! `Error::LocationUnavailable` (the lookup itself failed).

use crate::config::{LocationConfig, ProviderConfig};
use crate::coord::Coordinate;
use crate::error::{Error, Result};
use serde::Deserialize;
use tracing::debug;

/// Trait for current-position sources
pub trait PositionSource: Send + Sync {
    /// Resolve the current position once
    fn current_position(&self) -> impl std::future::Future<Output = Result<Coordinate>> + Send;
}

/// IP-based geolocation through ip-api.com
#[derive(Debug, Clone)]
pub struct IpLocator {
    client: reqwest::Client,
    url: String,
}

/// ip-api.com response
#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    lat: Option<f64>,
    lon: Option<f64>,
    #[serde(default)]
    message: Option<String>,
}

impl IpLocator {
    /// Create an IP locator querying `url`
    pub fn new(url: &str, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::LocationUnavailable(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

/// Turn an ip-api.com body into a coordinate
fn parse_ip_body(body: &str) -> Result<Coordinate> {
    let data: IpApiResponse = serde_json::from_str(body).map_err(|e| {
        Error::LocationUnavailable(format!("Failed to parse IP location response: {}", e))
    })?;

    if data.status != "success" {
        let reason = data.message.unwrap_or_else(|| "lookup failed".to_string());
        return Err(Error::LocationUnavailable(format!(
            "IP location lookup failed: {}",
            reason
        )));
    }

    match (data.lat, data.lon) {
        (Some(lat), Some(lon)) => {
            Coordinate::new(lat, lon).map_err(|e| Error::LocationUnavailable(e.to_string()))
        }
        _ => Err(Error::LocationUnavailable(
            "No coordinates in IP location response".to_string(),
        )),
    }
}

impl PositionSource for IpLocator {
    async fn current_position(&self) -> Result<Coordinate> {
        debug!(url = %self.url, "IP location request");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::LocationUnavailable(format!("IP location request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::LocationUnavailable(format!(
                "IP location API returned status: {}",
                response.status()
            )));
        }

        let body = response.text().await.map_err(|e| {
            Error::LocationUnavailable(format!("Failed to read IP location response: {}", e))
        })?;
        parse_ip_body(&body)
    }
}

/// Always answers with the same coordinate
#[derive(Debug, Clone, Copy)]
pub struct StaticPosition(pub Coordinate);

impl PositionSource for StaticPosition {
    async fn current_position(&self) -> Result<Coordinate> {
        Ok(self.0)
    }
}

/// Geolocation switched off; every request is denied
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledPosition;

impl PositionSource for DisabledPosition {
    async fn current_position(&self) -> Result<Coordinate> {
        Err(Error::PermissionDenied)
    }
}

/// The position source selected by `location.geolocation`
#[derive(Debug, Clone)]
pub enum ConfiguredPosition {
    Ip(IpLocator),
    Fixed(StaticPosition),
    Disabled(DisabledPosition),
}

impl ConfiguredPosition {
    /// Build the source named in the config ("ip", "fixed" or "off")
    pub fn from_config(location: &LocationConfig, providers: &ProviderConfig) -> Result<Self> {
        match location.geolocation.as_str() {
            "ip" => Ok(Self::Ip(IpLocator::new(
                &providers.ip_api_url,
                &providers.user_agent,
            )?)),
            "fixed" => Ok(Self::Fixed(StaticPosition(location.default_center()?))),
            "off" => Ok(Self::Disabled(DisabledPosition)),
            other => Err(Error::Config(format!(
                "Unknown geolocation source: {} (expected ip, fixed or off)",
                other
            ))),
        }
    }
}

impl PositionSource for ConfiguredPosition {
    async fn current_position(&self) -> Result<Coordinate> {
        match self {
            Self::Ip(source) => source.current_position().await,
            Self::Fixed(source) => source.current_position().await,
            Self::Disabled(source) => source.current_position().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_parse_success() {
        let body = r#"{"status":"success","country":"France","city":"Paris","lat":48.8566,"lon":2.3522}"#;
        let c = parse_ip_body(body).unwrap();
        assert_relative_eq!(c.latitude(), 48.8566);
        assert_relative_eq!(c.longitude(), 2.3522);
    }

    #[test]
    fn test_parse_failure_is_unavailable() {
        let body = r#"{"status":"fail","message":"private range"}"#;
        match parse_ip_body(body) {
            Err(Error::LocationUnavailable(msg)) => assert!(msg.contains("private range")),
            other => panic!("unexpected result: {:?}", other),
        }

        assert!(matches!(
            parse_ip_body(r#"{"status":"success"}"#),
            Err(Error::LocationUnavailable(_))
        ));
        assert!(matches!(
            parse_ip_body("not json"),
            Err(Error::LocationUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_disabled_is_permission_denied() {
        let result = DisabledPosition.current_position().await;
        assert!(matches!(result, Err(Error::PermissionDenied)));
    }

    #[tokio::test]
    async fn test_configured_sources() {
        let providers = ProviderConfig::default();
        let mut location = LocationConfig::default();

        location.geolocation = "fixed".to_string();
        let source = ConfiguredPosition::from_config(&location, &providers).unwrap();
        let here = source.current_position().await.unwrap();
        assert_relative_eq!(here.latitude(), location.default_lat);

        location.geolocation = "off".to_string();
        let source = ConfiguredPosition::from_config(&location, &providers).unwrap();
        assert!(matches!(
            source.current_position().await,
            Err(Error::PermissionDenied)
        ));

        location.geolocation = "gps".to_string();
        assert!(ConfiguredPosition::from_config(&location, &providers).is_err());
    }

    #[tokio::test]
    #[ignore = "Requires network access to ip-api.com"]
    async fn test_live_ip_lookup() {
        let providers = ProviderConfig::default();
        let locator = IpLocator::new(&providers.ip_api_url, &providers.user_agent).unwrap();
        assert!(locator.current_position().await.is_ok());
    }
}
