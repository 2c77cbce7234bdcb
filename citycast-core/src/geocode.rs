//! Geocoding lookup: free-text city name to at most five candidate places.

use crate::{error::ErrorKind, model::LocationCandidate, provider::WeatherSource};

/// Fixed result limit sent with every geocoding request.
pub const GEOCODE_LIMIT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The callback ran with this many candidates (possibly zero).
    Emitted(usize),
    /// Blank input; nothing was sent.
    Blank,
    /// The request failed and was logged; the callback did not run.
    Failed(ErrorKind),
}

/// Issues a single geocoding request for `city` and hands the candidates to
/// `on_results`. Failures are logged and swallowed; there is no retry.
pub async fn lookup<S, F>(source: &S, city: &str, on_results: F) -> LookupOutcome
where
    S: WeatherSource + ?Sized,
    F: FnOnce(Vec<LocationCandidate>),
{
    let city = city.trim();
    if city.is_empty() {
        tracing::debug!("ignoring blank city");
        return LookupOutcome::Blank;
    }

    tracing::info!(city, "looking up location");

    match source.geocode(city).await {
        Ok(mut candidates) => {
            candidates.truncate(GEOCODE_LIMIT);
            let n = candidates.len();
            tracing::debug!(city, candidates = n, "geocoding returned");
            on_results(candidates);
            LookupOutcome::Emitted(n)
        }
        Err(err) => {
            err.report("geocoding lookup failed");
            LookupOutcome::Failed(err.kind())
        }
    }
}
