//! Condition groups derived from OpenWeather condition ids and icon URLs.
//! See: https://openweathermap.org/weather-conditions

const ICON_BASE: &str = "https://openweathermap.org/img/wn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConditionGroup {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Atmosphere,
    #[default]
    Clear,
    Clouds,
}

impl ConditionGroup {
    pub fn from_id(id: u32) -> Self {
        match id {
            200..=299 => Self::Thunderstorm,
            300..=399 => Self::Drizzle,
            500..=599 => Self::Rain,
            600..=699 => Self::Snow,
            700..=799 => Self::Atmosphere,
            801..=899 => Self::Clouds,
            _ => Self::Clear,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            Self::Thunderstorm => "⛈",
            Self::Drizzle => "🌦",
            Self::Rain => "🌧",
            Self::Snow => "❄",
            Self::Atmosphere => "🌫",
            Self::Clear => "☀",
            Self::Clouds => "☁",
        }
    }
}

/// Small icon, as used on day cards and detail rows.
pub fn icon_url(code: &str) -> String {
    format!("{ICON_BASE}/{code}.png")
}

/// Double-size icon, as used on the current conditions card.
pub fn icon_url_large(code: &str) -> String {
    format!("{ICON_BASE}/{code}@2x.png")
}
