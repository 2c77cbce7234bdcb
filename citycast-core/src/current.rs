use crate::{
    FetchError,
    condition::{ConditionGroup, icon_url_large},
    coords::CoordinateReader,
    model::{Coordinates, CurrentWeather, round_temp, temp_label},
    provider::WeatherSource,
    refresh::{RefreshPolicy, Settled, Slot, Ticket},
};

/// What the current conditions card shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentView {
    /// `Name, CC`
    pub place: String,
    pub temperature: i64,
    pub temperature_label: String,
    pub description: String,
    pub icon: String,
    pub icon_url: String,
    pub condition: ConditionGroup,
}

impl CurrentView {
    pub fn from_weather(weather: &CurrentWeather) -> Option<Self> {
        let condition = weather.condition()?;
        Some(Self {
            place: format!("{}, {}", weather.name, weather.sys.country),
            temperature: round_temp(weather.main.temp),
            temperature_label: temp_label(weather.main.temp),
            description: condition.description.clone(),
            icon: condition.icon.clone(),
            icon_url: icon_url_large(&condition.icon),
            condition: ConditionGroup::from_id(condition.id),
        })
    }
}

#[derive(Debug)]
pub struct CurrentConditionsPanel {
    coords: CoordinateReader,
    slot: Slot<CurrentWeather>,
}

impl CurrentConditionsPanel {
    pub fn new(coords: CoordinateReader, policy: RefreshPolicy) -> Self {
        Self {
            coords,
            slot: Slot::new("current weather", policy),
        }
    }

    /// `None` while loading, before the first fetch and after a failure.
    pub fn view(&self) -> Option<CurrentView> {
        self.slot.value().and_then(CurrentView::from_weather)
    }

    pub fn weather(&self) -> Option<&CurrentWeather> {
        self.slot.value()
    }

    pub fn slot(&self) -> &Slot<CurrentWeather> {
        &self.slot
    }

    pub fn begin(&mut self, coords: Coordinates) -> Ticket {
        self.slot.begin(coords)
    }

    pub fn settle(&mut self, ticket: Ticket, result: Result<CurrentWeather, FetchError>) -> Settled {
        self.slot.settle(ticket, result)
    }

    pub async fn reload<S>(&mut self, source: &S, coords: Coordinates) -> Settled
    where
        S: WeatherSource + ?Sized,
    {
        let ticket = self.begin(coords);
        let result = source.current(coords).await;
        self.settle(ticket, result)
    }

    /// Reloads only when the shared pair was replaced since the last call.
    pub async fn reload_if_changed<S>(&mut self, source: &S) -> Option<Settled>
    where
        S: WeatherSource + ?Sized,
    {
        let coords = self.coords.take_change()?;
        Some(self.reload(source, coords).await)
    }
}
