//! Response schemas of the three collaborator endpoints plus the small
//! value types shared by the panels.
//!
//! Fields are `Option` exactly where OpenWeather documents them as optional;
//! everything else is required and a payload missing it fails to decode.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair. Replaced, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// One geocoding match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationCandidate {
    pub name: String,
    #[serde(default)]
    pub local_names: Option<HashMap<String, String>>,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
}

impl LocationCandidate {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub pressure: f64,
    pub humidity: u8,
    pub sea_level: Option<f64>,
    pub grnd_level: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
    pub gust: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clouds {
    pub all: u8,
}

/// Rain or snow volume in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Precipitation {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSys {
    #[serde(rename = "type")]
    pub kind: Option<i64>,
    pub id: Option<i64>,
    pub country: String,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Payload of `GET {weatherBase}/weather/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub coord: Coord,
    pub weather: Vec<Condition>,
    pub base: Option<String>,
    pub main: CurrentMain,
    pub visibility: Option<u32>,
    pub wind: Wind,
    pub clouds: Clouds,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
    pub dt: i64,
    pub sys: CurrentSys,
    pub timezone: i64,
    pub id: i64,
    pub name: String,
    pub cod: Option<i64>,
}

impl CurrentWeather {
    /// The primary condition. Guaranteed by [`Checked`].
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub sea_level: Option<f64>,
    pub grnd_level: Option<f64>,
    pub humidity: u8,
    pub temp_kf: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSys {
    /// Part of day, `d` or `n`.
    pub pod: String,
}

/// One 3-hour forecast reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub dt: i64,
    pub main: ForecastMain,
    pub weather: Vec<Condition>,
    pub clouds: Clouds,
    pub wind: Wind,
    pub visibility: Option<u32>,
    /// Probability of precipitation, 0.0..=1.0.
    pub pop: f64,
    pub rain: Option<Precipitation>,
    pub snow: Option<Precipitation>,
    pub sys: SampleSys,
    pub dt_txt: String,
}

impl ForecastSample {
    pub fn condition(&self) -> Option<&Condition> {
        self.weather.first()
    }

    /// The literal calendar date portion of `dt_txt`, no timezone conversion.
    pub fn date_key(&self) -> &str {
        self.dt_txt.split(' ').next().unwrap_or_default()
    }

    /// `HH:MM` portion of `dt_txt`.
    pub fn time_of_day(&self) -> &str {
        let time = self.dt_txt.split(' ').nth(1).unwrap_or_default();
        time.get(..5).unwrap_or(time)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastCity {
    pub id: Option<i64>,
    pub name: String,
    pub coord: Option<Coord>,
    pub country: String,
    pub population: Option<u64>,
    pub timezone: Option<i64>,
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
}

/// Payload of `GET {weatherBase}/forecast`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub cnt: Option<u32>,
    pub list: Vec<ForecastSample>,
    pub city: Option<ForecastCity>,
}

/// Post-decode checks for invariants serde cannot express.
pub trait Checked {
    fn check(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Checked for Vec<LocationCandidate> {}

impl Checked for CurrentWeather {
    fn check(&self) -> Result<(), String> {
        if self.weather.is_empty() {
            return Err("empty weather array".to_string());
        }
        Ok(())
    }
}

impl Checked for ForecastResponse {
    fn check(&self) -> Result<(), String> {
        for (idx, sample) in self.list.iter().enumerate() {
            if sample.weather.is_empty() {
                return Err(format!("sample {idx} ({}) has an empty weather array", sample.dt_txt));
            }
            if sample.date_key().is_empty() {
                return Err(format!("sample {idx} has no date in dt_txt"));
            }
        }
        Ok(())
    }
}

/// Rounds to the nearest integer with halves going up, so `-2.5` becomes `-2`.
pub fn round_temp(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Human label for a rounded temperature, e.g. `16 °C`.
pub fn temp_label(value: f64) -> String {
    format!("{} °C", round_temp(value))
}
