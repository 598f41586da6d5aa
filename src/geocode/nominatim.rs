use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;

use super::{Address, PlaceResolver};

pub const DEFAULT_ENDPOINT: &str = "https://nominatim.openstreetmap.org/reverse";
pub const DEFAULT_USER_AGENT: &str = "metatagger";

/// OpenStreetMap Nominatim reverse geocoder.
pub struct NominatimResolver {
    endpoint: String,
    user_agent: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
    error: Option<String>,
}

impl NominatimResolver {
    pub fn new(endpoint: String, user_agent: String) -> Self {
        Self {
            endpoint,
            user_agent,
            client: Client::new(),
        }
    }
}

impl Default for NominatimResolver {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT.to_string(), DEFAULT_USER_AGENT.to_string())
    }
}

#[async_trait::async_trait]
impl PlaceResolver for NominatimResolver {
    fn name(&self) -> &str {
        "Nominatim"
    }

    async fn lookup(&self, latitude: f64, longitude: f64) -> Result<Address> {
        let resp = self
            .client
            .get(&self.endpoint)
            .header("User-Agent", &self.user_agent)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .send()
            .await
            .context("Nominatim request failed")?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .context("Failed to read Nominatim response")?;

        if !status.is_success() {
            anyhow::bail!("Nominatim API error ({}): {}", status, text);
        }

        parse_reverse_response(&text)
    }
}

/// Parse a `format=jsonv2` reverse response. "Unable to geocode" is an
/// empty address, not an error.
fn parse_reverse_response(text: &str) -> Result<Address> {
    let resp: ReverseResponse =
        serde_json::from_str(text).context("Failed to parse Nominatim response JSON")?;

    if let Some(err) = resp.error {
        log::debug!("Nominatim: {err}");
    }

    Ok(resp.address.unwrap_or_default())
}
