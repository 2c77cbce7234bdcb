//! In-memory `WeatherSource` and payload builders for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::{
    FetchError,
    model::{
        Clouds, Condition, Coord, Coordinates, CurrentMain, CurrentSys, CurrentWeather,
        ForecastMain, ForecastResponse, ForecastSample, LocationCandidate, SampleSys, Wind,
    },
    provider::WeatherSource,
};

type Canned<T> = Mutex<Vec<(Coordinates, Result<T, FetchError>)>>;

#[derive(Debug, Default)]
pub struct FakeSource {
    geocode: Mutex<Option<Result<Vec<LocationCandidate>, FetchError>>>,
    current: Canned<CurrentWeather>,
    forecast: Canned<ForecastResponse>,
    geocode_calls: Mutex<Vec<String>>,
    current_calls: Mutex<Vec<Coordinates>>,
    forecast_calls: Mutex<Vec<Coordinates>>,
}

impl FakeSource {
    pub fn with_geocode(self, result: Result<Vec<LocationCandidate>, FetchError>) -> Self {
        *self.geocode.lock().unwrap() = Some(result);
        self
    }

    pub fn with_current(self, at: Coordinates, result: Result<CurrentWeather, FetchError>) -> Self {
        self.current.lock().unwrap().push((at, result));
        self
    }

    pub fn with_forecast(
        self,
        at: Coordinates,
        result: Result<ForecastResponse, FetchError>,
    ) -> Self {
        self.forecast.lock().unwrap().push((at, result));
        self
    }

    pub fn geocode_calls(&self) -> Vec<String> {
        self.geocode_calls.lock().unwrap().clone()
    }

    pub fn current_calls(&self) -> Vec<Coordinates> {
        self.current_calls.lock().unwrap().clone()
    }

    pub fn forecast_calls(&self) -> Vec<Coordinates> {
        self.forecast_calls.lock().unwrap().clone()
    }
}

fn take<T>(canned: &Canned<T>, at: Coordinates) -> Result<T, FetchError> {
    let mut canned = canned.lock().unwrap();
    match canned.iter().position(|(c, _)| *c == at) {
        Some(idx) => canned.remove(idx).1,
        None => Err(FetchError::Other(format!("no canned response for {at}"))),
    }
}

#[async_trait]
impl WeatherSource for FakeSource {
    async fn geocode(&self, city: &str) -> Result<Vec<LocationCandidate>, FetchError> {
        self.geocode_calls.lock().unwrap().push(city.to_string());
        self.geocode
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(FetchError::Other("no canned geocode".into())))
    }

    async fn current(&self, at: Coordinates) -> Result<CurrentWeather, FetchError> {
        self.current_calls.lock().unwrap().push(at);
        take(&self.current, at)
    }

    async fn forecast(&self, at: Coordinates) -> Result<ForecastResponse, FetchError> {
        self.forecast_calls.lock().unwrap().push(at);
        take(&self.forecast, at)
    }
}

pub fn candidate(name: &str, country: &str, state: Option<&str>, lat: f64, lon: f64) -> LocationCandidate {
    LocationCandidate {
        name: name.to_string(),
        local_names: None,
        lat,
        lon,
        country: country.to_string(),
        state: state.map(str::to_string),
    }
}

fn condition(description: &str, icon: &str) -> Condition {
    Condition {
        id: 800,
        main: "Clear".to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
    }
}

pub fn current_weather(name: &str, country: &str, temp: f64) -> CurrentWeather {
    CurrentWeather {
        coord: Coord { lon: 0.0, lat: 0.0 },
        weather: vec![condition("clear sky", "01d")],
        base: Some("stations".to_string()),
        main: CurrentMain {
            temp,
            feels_like: temp - 1.0,
            temp_min: None,
            temp_max: None,
            pressure: 1012.0,
            humidity: 60,
            sea_level: None,
            grnd_level: None,
        },
        visibility: Some(10_000),
        wind: Wind { speed: 3.1, deg: 200.0, gust: None },
        clouds: Clouds { all: 0 },
        rain: None,
        snow: None,
        dt: 1_700_000_000,
        sys: CurrentSys {
            kind: None,
            id: None,
            country: country.to_string(),
            sunrise: 1_699_990_000,
            sunset: 1_700_030_000,
        },
        timezone: 3600,
        id: 2_988_507,
        name: name.to_string(),
        cod: Some(200),
    }
}

pub fn sample(dt_txt: &str, temp: f64, description: &str) -> ForecastSample {
    ForecastSample {
        dt: 0,
        main: ForecastMain {
            temp,
            feels_like: temp - 2.0,
            temp_min: temp,
            temp_max: temp,
            pressure: 1010.0,
            sea_level: Some(1010.0),
            grnd_level: Some(1000.0),
            humidity: 70,
            temp_kf: None,
        },
        weather: vec![condition(description, "03d")],
        clouds: Clouds { all: 40 },
        wind: Wind { speed: 4.2, deg: 180.0, gust: Some(6.0) },
        visibility: Some(10_000),
        pop: 0.2,
        rain: None,
        snow: None,
        sys: SampleSys { pod: "d".to_string() },
        dt_txt: dt_txt.to_string(),
    }
}

pub fn forecast(list: Vec<ForecastSample>) -> ForecastResponse {
    ForecastResponse {
        cnt: Some(list.len() as u32),
        list,
        city: None,
    }
}

/// Eight 3-hour samples for each of `dates`, temperatures rising by one per slot.
pub fn five_day_forecast(dates: &[&str]) -> ForecastResponse {
    let mut list = Vec::new();
    for (d, date) in dates.iter().enumerate() {
        for slot in 0..8 {
            let txt = format!("{date} {:02}:00:00", slot * 3);
            list.push(sample(&txt, d as f64 * 10.0 + slot as f64, "scattered clouds"));
        }
    }
    forecast(list)
}
