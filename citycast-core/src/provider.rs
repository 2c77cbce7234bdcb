use crate::{
    Config, CurrentWeather, FetchError, ForecastResponse, LocationCandidate,
    model::Coordinates, provider::openweather::OpenWeatherClient,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The three collaborator calls the page depends on.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Up to five places matching `city`.
    async fn geocode(&self, city: &str) -> Result<Vec<LocationCandidate>, FetchError>;

    async fn current(&self, at: Coordinates) -> Result<CurrentWeather, FetchError>;

    /// 3-hour samples over the next five days, chronological.
    async fn forecast(&self, at: Coordinates) -> Result<ForecastResponse, FetchError>;
}

/// Construct the OpenWeather-backed source from config.
pub fn source_from_config(config: &Config) -> OpenWeatherClient {
    OpenWeatherClient::new(config.endpoints())
}
