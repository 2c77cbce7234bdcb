//! The page: owns the shared coordinate pair and composes the lookup, the
//! picker and both panels.

use std::sync::Arc;

use crate::{
    coords::CoordinateOwner,
    current::CurrentConditionsPanel,
    forecast::{ForecastPanel, TodayFilter},
    geocode::{self, LookupOutcome},
    model::{Coordinates, LocationCandidate},
    picker::LocationPicker,
    provider::WeatherSource,
    refresh::{RefreshPolicy, Settled},
};

/// How each panel settled during one [`Page::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Refreshed {
    pub current: Option<Settled>,
    pub forecast: Option<Settled>,
}

#[derive(Debug)]
pub struct Page {
    source: Arc<dyn WeatherSource>,
    coords: CoordinateOwner,
    chosen: Option<LocationCandidate>,
    picker: LocationPicker,
    current: CurrentConditionsPanel,
    forecast: ForecastPanel,
}

impl Page {
    pub fn new(source: Arc<dyn WeatherSource>, filter: TodayFilter, policy: RefreshPolicy) -> Self {
        let coords = CoordinateOwner::default();
        let current = CurrentConditionsPanel::new(coords.reader(), policy);
        let forecast = ForecastPanel::new(coords.reader(), filter, policy);

        Self {
            source,
            coords,
            chosen: None,
            picker: LocationPicker::default(),
            current,
            forecast,
        }
    }

    pub fn picker(&self) -> &LocationPicker {
        &self.picker
    }

    pub fn current(&self) -> &CurrentConditionsPanel {
        &self.current
    }

    pub fn forecast(&self) -> &ForecastPanel {
        &self.forecast
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coords.get()
    }

    pub fn chosen(&self) -> Option<&LocationCandidate> {
        self.chosen.as_ref()
    }

    /// Runs a lookup; a successful one replaces the candidate list.
    pub async fn search(&mut self, city: &str) -> LookupOutcome {
        let picker = &mut self.picker;
        geocode::lookup(self.source.as_ref(), city, |candidates| picker.replace(candidates)).await
    }

    /// Picks a candidate and replaces the shared pair. Panels refetch on the
    /// next [`Page::refresh`].
    pub fn choose(&mut self, index: usize) -> Option<Coordinates> {
        let mut picked = None;
        self.picker.choose(index, |candidate| picked = Some(candidate.clone()));

        let candidate = picked?;
        let coords = candidate.coordinates();
        tracing::info!(name = %candidate.name, country = %candidate.country, %coords, "location chosen");

        self.chosen = Some(candidate);
        self.coords.set(coords);
        Some(coords)
    }

    /// Sets the pair directly, bypassing the picker.
    pub fn locate(&mut self, coords: Coordinates) {
        self.chosen = None;
        self.coords.set(coords);
    }

    /// Both panels reload concurrently if the pair changed. They settle
    /// independently.
    pub async fn refresh(&mut self) -> Refreshed {
        let source = self.source.as_ref();
        let (current, forecast) = tokio::join!(
            self.current.reload_if_changed(source),
            self.forecast.reload_if_changed(source),
        );
        Refreshed { current, forecast }
    }

    /// A forecast day card click.
    pub fn click_day(&mut self, date: &str) -> bool {
        self.forecast.click(date)
    }
}
