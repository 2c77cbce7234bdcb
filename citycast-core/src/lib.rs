//! Core library for the `citycast` weather lookup.
//!
//! This crate defines:
//! - Configuration handling (file plus environment)
//! - Typed schemas of the OpenWeather geocoding, current-weather and forecast endpoints
//! - The location lookup and picker
//! - The current conditions and forecast panels, and the page that wires them to one
//!   shared coordinate pair
//!
//! It is used by `citycast-cli`, but has no terminal dependencies of its own.

pub mod condition;
pub mod config;
pub mod coords;
pub mod current;
pub mod error;
pub mod forecast;
pub mod geocode;
pub mod model;
pub mod page;
pub mod picker;
pub mod provider;
pub mod refresh;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{Config, Endpoints};
pub use current::{CurrentConditionsPanel, CurrentView};
pub use error::{ErrorKind, FetchError};
pub use forecast::{DayCard, DetailRow, ForecastPanel, ForecastView, Selection, TodayFilter, TrendChart};
pub use geocode::LookupOutcome;
pub use model::{Coordinates, CurrentWeather, ForecastResponse, ForecastSample, LocationCandidate};
pub use page::Page;
pub use picker::LocationPicker;
pub use provider::{WeatherSource, openweather::OpenWeatherClient};
pub use refresh::{RefreshPolicy, Settled};
