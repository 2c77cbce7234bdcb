use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use citycast_core::{
    Config, Coordinates, LookupOutcome, Page, RefreshPolicy, TodayFilter, WeatherSource,
    config::{DEFAULT_API_URL, DEFAULT_GEO_URL},
    provider::source_from_config,
};
use inquire::{Password, Text};

use crate::{interactive, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "citycast", version, about = "Look up current weather and a 5-day forecast by city")]
pub struct Cli {
    /// Log requests and responses to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `lookup` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args, Clone, Copy, Default)]
pub struct PanelOpts {
    /// Drop forecast samples whose day-of-month equals today's.
    #[arg(long)]
    pub exclude_today: bool,

    /// Ignore responses that resolve after a newer one was applied.
    #[arg(long)]
    pub discard_stale: bool,
}

impl PanelOpts {
    fn filter(&self) -> TodayFilter {
        if self.exclude_today { TodayFilter::today() } else { TodayFilter::Keep }
    }

    fn policy(&self) -> RefreshPolicy {
        if self.discard_stale { RefreshPolicy::DiscardOlder } else { RefreshPolicy::LastResolvedWins }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store API base URLs and key in the config file.
    Configure,

    /// Interactive search: pick a location, then browse its forecast by day.
    Lookup {
        /// City to search first; prompts when absent.
        city: Option<String>,

        #[command(flatten)]
        opts: PanelOpts,
    },

    /// Print up to five locations matching a city name.
    Search {
        city: String,
    },

    /// Print current conditions and forecast for a coordinate pair.
    Show {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,

        /// Day card clicks to replay, in order (YYYY-MM-DD). Repeatable.
        #[arg(long = "day")]
        days: Vec<NaiveDate>,

        #[command(flatten)]
        opts: PanelOpts,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Lookup { city: None, opts: PanelOpts::default() }) {
            Command::Configure => configure(),
            Command::Lookup { city, opts } => {
                let page = Page::new(load_source()?, opts.filter(), opts.policy());
                interactive::run(page, city).await
            }
            Command::Search { city } => search(&city).await,
            Command::Show { lat, lon, days, opts } => {
                show(Coordinates::new(lat, lon), &days, opts).await
            }
        }
    }
}

fn load_source() -> anyhow::Result<Arc<dyn WeatherSource>> {
    let cfg = Config::load()?.apply_env();

    let missing = cfg.missing();
    if !missing.is_empty() {
        tracing::warn!(
            "missing settings: {}. Hint: run `citycast configure` or set them in the environment.",
            missing.join(", ")
        );
    }

    Ok(Arc::new(source_from_config(&cfg)))
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_url = Text::new("Weather API base URL:")
        .with_default(cfg.api_url.as_deref().unwrap_or(DEFAULT_API_URL))
        .prompt()
        .context("Failed to read weather API base URL")?;

    let geo_url = Text::new("Geocoding API base URL:")
        .with_default(cfg.geo_url.as_deref().unwrap_or(DEFAULT_GEO_URL))
        .prompt()
        .context("Failed to read geocoding API base URL")?;

    let api_key = Password::new("API key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the stored key")
        .prompt()
        .context("Failed to read API key")?;

    cfg.api_url = Some(api_url.trim().to_string());
    cfg.geo_url = Some(geo_url.trim().to_string());
    if !api_key.trim().is_empty() {
        cfg.api_key = Some(api_key.trim().to_string());
    }

    let path = cfg.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

async fn search(city: &str) -> anyhow::Result<()> {
    let mut page = Page::new(load_source()?, TodayFilter::Keep, RefreshPolicy::default());

    if let LookupOutcome::Emitted(_) = page.search(city).await {
        let picker = page.picker();
        for (idx, (row, c)) in picker.rows().iter().zip(picker.candidates()).enumerate() {
            println!("{}. {row}  [{}, {}]", idx + 1, c.lat, c.lon);
        }
    }
    Ok(())
}

async fn show(coords: Coordinates, days: &[NaiveDate], opts: PanelOpts) -> anyhow::Result<()> {
    let mut page = Page::new(load_source()?, opts.filter(), opts.policy());
    page.locate(coords);
    page.refresh().await;

    if let Some(view) = page.current().view() {
        println!("{}", render::current_card(&view));
    }

    for day in days {
        let key = day.format("%Y-%m-%d").to_string();
        if !page.click_day(&key) {
            tracing::warn!(day = %key, "no forecast for this day");
        }
    }

    if let Some(view) = page.forecast().view() {
        print!("{}", render::forecast_view(&view));
    }
    Ok(())
}
