use async_trait::async_trait;
use reqwest::{Response, Url};
use serde::Deserialize;
use std::time::Duration;

use seawatch_core::config::LayeredConfig;
use seawatch_core::error::{Result, SeawatchError};
use seawatch_core::models::{ZoneFeature, ZoneId, ZoneOccupancy};
use seawatch_core::ports::{OccupancyApi, ZoneApi};
use seawatch_geo::codec::{decode_zones, encode_zones};

/// HTTP adapter for the SeaWatch backend
pub struct HttpBackend {
    /// Base URL of the API (e.g., "http://127.0.0.1:5000/api")
    base_url: Url,

    /// HTTP client with the request timeout applied
    client: reqwest::Client,
}

impl HttpBackend {
    /// Create a new backend client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| SeawatchError::ConfigInvalid {
            key: "api_url".to_string(),
            reason: format!("Invalid URL '{}': {}", base_url, e),
        })?;

        if base_url.cannot_be_a_base() {
            return Err(SeawatchError::ConfigInvalid {
                key: "api_url".to_string(),
                reason: format!("'{}' cannot be used as a base URL", base_url),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SeawatchError::network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    /// Create from the layered configuration
    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Self::new(&config.api_url.value, config.request_timeout())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_text(&self, url: Url) -> Result<String> {
        tracing::debug!(url = %url, "GET");
        let response = self.client.get(url.clone()).send().await.map_err(|e| transport(&url, e))?;
        let response = ensure_success(response).await?;
        response.text().await.map_err(|e| transport(&url, e))
    }
}

#[async_trait]
impl ZoneApi for HttpBackend {
    async fn list_zones(&self) -> Result<Vec<ZoneFeature>> {
        let body = self.get_text(self.endpoint(&["zones"])).await?;
        decode_zones(&body)
    }

    async fn create_zones(&self, zones: &[ZoneFeature]) -> Result<()> {
        let url = self.endpoint(&["zones"]);
        let unsaved: Vec<ZoneFeature> =
            zones.iter().map(|z| ZoneFeature::unsaved(z.name.clone(), z.vertices.clone())).collect();

        tracing::debug!(url = %url, zones = unsaved.len(), "POST");
        let response = self
            .client
            .post(url.clone())
            .json(&encode_zones(&unsaved))
            .send()
            .await
            .map_err(|e| transport(&url, e))?;

        ensure_success(response).await.map(|_| ())
    }

    async fn delete_zone(&self, id: &ZoneId) -> Result<()> {
        let url = self.endpoint(&["zones", id.as_str()]);

        tracing::debug!(url = %url, "DELETE");
        let response = self.client.delete(url.clone()).send().await.map_err(|e| transport(&url, e))?;

        ensure_success(response).await.map(|_| ())
    }
}

#[async_trait]
impl OccupancyApi for HttpBackend {
    async fn fetch_occupancy(&self) -> Result<ZoneOccupancy> {
        let body = self.get_text(self.endpoint(&["zone-occupancy"])).await?;
        parse_occupancy(&body)
    }
}

/// Envelope returned by the occupancy endpoint
#[derive(Debug, Deserialize)]
struct OccupancyEnvelope {
    status: String,
    #[serde(default)]
    data: Option<ZoneOccupancy>,
    #[serde(default)]
    message: Option<String>,
}

/// Parse an occupancy response body
///
/// Any status other than `success` is treated as a rejection, even when the
/// HTTP status was 2xx.
pub fn parse_occupancy(body: &str) -> Result<ZoneOccupancy> {
    let envelope: OccupancyEnvelope = serde_json::from_str(body).map_err(|e| {
        SeawatchError::Serialization(format!("Failed to parse occupancy response: {}", e))
    })?;

    if envelope.status != "success" {
        return Err(SeawatchError::ServerRejection {
            status: 200,
            body: envelope.message.unwrap_or_else(|| format!("status '{}'", envelope.status)),
        });
    }

    Ok(envelope.data.unwrap_or_default())
}

async fn ensure_success(response: Response) -> Result<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(SeawatchError::ServerRejection { status: status.as_u16(), body })
}

fn transport(url: &Url, error: reqwest::Error) -> SeawatchError {
    let reason = if error.is_timeout() {
        format!("Request to {} timed out", url)
    } else {
        format!("Request to {} failed: {}", url, error)
    };
    SeawatchError::Network { reason }
}
