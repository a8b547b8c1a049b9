//! City data API client
//!
//! Three read-only calls (cities, insights, weather predictions) plus the
//! submission call used once at startup. Every call is independent: no
//! retries, no caching.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::config::ApiConfig;
use crate::error::{Endpoint, UpstreamError};
use crate::models::{CityInsights, CitySummary, CityWeather};

pub type Result<T> = std::result::Result<T, UpstreamError>;

/// Read access to city data.
///
/// Implemented over HTTP by [`CityDataClient`]; tests plug in an in-memory source.
#[async_trait]
pub trait CityDataSource: Send + Sync {
    async fn list_cities(&self) -> Result<Vec<CitySummary>>;

    async fn city_insights(&self, city_id: &str) -> Result<CityInsights>;

    async fn weather_predictions(&self) -> Result<Vec<CityWeather>>;

    /// Whether the city appears in the city list
    async fn city_exists(&self, city_id: &str) -> Result<bool> {
        let cities = self.list_cities().await?;
        Ok(cities.iter().any(|c| c.id == city_id))
    }
}

/// Body of the submission call
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub api_url: String,
    pub git_repo: Option<String>,
}

/// HTTP client for the city data API
#[derive(Debug, Clone)]
pub struct CityDataClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl CityDataClient {
    pub fn new(config: &ApiConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("city-recipes/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
        })
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}{}?apiKey={}",
            self.base_url,
            path,
            urlencoding::encode(&self.api_key)
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint, path: &str) -> Result<T> {
        debug!(%endpoint, path, "Calling the city data API");
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { endpoint, source })?;

        let response = check_status(endpoint, response)?;
        response
            .json()
            .await
            .map_err(|source| UpstreamError::Decode { endpoint, source })
    }

    /// Reports this service's public URL for review.
    #[instrument(skip(self))]
    pub async fn submit(&self, submission: &Submission) -> Result<()> {
        let endpoint = Endpoint::Submissions;
        let response = self
            .client
            .post(self.url("/group/submissions"))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(submission)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport { endpoint, source })?;

        check_status(endpoint, response)?;
        Ok(())
    }
}

fn check_status(endpoint: Endpoint, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(UpstreamError::Status { endpoint, status })
    }
}

#[async_trait]
impl CityDataSource for CityDataClient {
    #[instrument(skip(self))]
    async fn list_cities(&self) -> Result<Vec<CitySummary>> {
        self.get_json(Endpoint::Cities, "/cities").await
    }

    #[instrument(skip(self))]
    async fn city_insights(&self, city_id: &str) -> Result<CityInsights> {
        let path = format!("/cities/{}/insights", urlencoding::encode(city_id));
        self.get_json(Endpoint::Insights, &path).await
    }

    #[instrument(skip(self))]
    async fn weather_predictions(&self) -> Result<Vec<CityWeather>> {
        self.get_json(Endpoint::WeatherPredictions, "/weather-predictions")
            .await
    }
}
