use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    config::Endpoints,
    error::{FetchError, truncate_body},
    geocode::GEOCODE_LIMIT,
    model::{Checked, Coordinates, CurrentWeather, ForecastResponse, LocationCandidate},
};

use super::WeatherSource;

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    endpoints: Endpoints,
    http: Client,
}

impl OpenWeatherClient {
    /// No explicit timeout or retry; reqwest defaults apply.
    pub fn new(endpoints: Endpoints) -> Self {
        Self {
            endpoints,
            http: Client::new(),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    async fn get_json<T>(
        &self,
        endpoint: &'static str,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Checked,
    {
        tracing::debug!(endpoint, %url, "sending request");

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Transport { endpoint, source })?;

        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let parsed: T = serde_json::from_str(&body)
            .map_err(|source| FetchError::Decode { endpoint, source })?;

        parsed
            .check()
            .map_err(|reason| FetchError::Schema { endpoint, reason })?;

        tracing::debug!(endpoint, bytes = body.len(), "response decoded");
        Ok(parsed)
    }

    async fn get_at<T>(&self, endpoint: &'static str, path: &str, at: Coordinates) -> Result<T, FetchError>
    where
        T: DeserializeOwned + Checked,
    {
        let url = format!("{}/{path}", self.endpoints.weather_base);
        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();

        self.get_json(
            endpoint,
            url,
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("units", "metric"),
                ("APPID", self.endpoints.api_key.as_str()),
            ],
        )
        .await
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn geocode(&self, city: &str) -> Result<Vec<LocationCandidate>, FetchError> {
        let url = format!("{}/direct", self.endpoints.geo_base);
        let limit = GEOCODE_LIMIT.to_string();

        self.get_json(
            "direct",
            url,
            &[
                ("q", city),
                ("limit", limit.as_str()),
                ("APPID", self.endpoints.api_key.as_str()),
            ],
        )
        .await
    }

    async fn current(&self, at: Coordinates) -> Result<CurrentWeather, FetchError> {
        self.get_at("weather", "weather/", at).await
    }

    async fn forecast(&self, at: Coordinates) -> Result<ForecastResponse, FetchError> {
        self.get_at("forecast", "forecast", at).await
    }
}
