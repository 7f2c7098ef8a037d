//! Electricity Map API client.

use crate::forecast::ForecastSnapshot;
use reqwest::Client;
use std::time::Duration;

const FORECAST_URL: &str = "https://api.electricitymap.org/v3/carbon-intensity/forecast";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Failure of a single forecast request. Absorbed by
/// [`ElectricityMapClient::fetch_forecast`]; typed so the log line can
/// tell transport failures from server-side ones.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

/// Electricity Map API client
pub struct ElectricityMapClient {
    client: Client,
    api_token: String,
}

impl ElectricityMapClient {
    pub fn new(api_token: String) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, api_token }
    }

    /// Fetch the forecasted carbon intensity for `zone`.
    ///
    /// Every failure mode (transport, status, malformed body) collapses
    /// to an empty snapshot: the caller gets unusable-but-valid data,
    /// never an error. The empty snapshot evaluates to the unknown
    /// status, which re-triggers a refresh at the next hour boundary.
    pub async fn fetch_forecast(&self, zone: &str) -> ForecastSnapshot {
        match self.try_fetch(zone).await {
            Ok(snapshot) => snapshot.parse_timestamps(),
            Err(e) => {
                tracing::warn!("Forecast request for {} failed: {}", zone, e);
                ForecastSnapshot::default()
            }
        }
    }

    async fn try_fetch(&self, zone: &str) -> Result<ForecastSnapshot, FetchError> {
        let response = self
            .client
            .get(FORECAST_URL)
            .header("auth-token", self.api_token.as_str())
            .query(&[("zone", zone)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        Ok(response.json().await?)
    }
}
