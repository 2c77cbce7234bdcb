//! The interactive page: city prompt, location list, then a day-card loop.

use std::fmt;

use anyhow::Context;
use citycast_core::{LookupOutcome, Page, picker::PickerRow};
use inquire::{CustomUserError, InquireError, Select, Text, validator::Validation};

use crate::render;

enum Prompted<T> {
    Value(T),
    /// Esc: go back one step.
    Back,
    /// Ctrl-C: leave.
    Quit,
}

fn prompted<T>(res: Result<Option<T>, InquireError>) -> anyhow::Result<Prompted<T>> {
    match res {
        Ok(Some(v)) => Ok(Prompted::Value(v)),
        Ok(None) => Ok(Prompted::Back),
        Err(InquireError::OperationInterrupted) => Ok(Prompted::Quit),
        Err(e) => Err(e).context("Prompt failed"),
    }
}

enum DayAction {
    Day { date: String, label: String },
    NewSearch,
    Quit,
}

impl fmt::Display for DayAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayAction::Day { label, .. } => f.write_str(label),
            DayAction::NewSearch => f.write_str("[new search]"),
            DayAction::Quit => f.write_str("[quit]"),
        }
    }
}

pub async fn run(mut page: Page, mut first_city: Option<String>) -> anyhow::Result<()> {
    loop {
        let city = match first_city.take() {
            Some(city) => city,
            None => match prompted(
                Text::new("City:")
                    .with_help_message("Look for your local weather.")
                    .with_validator(|input: &str| -> Result<Validation, CustomUserError> {
                        if input.trim().is_empty() {
                            Ok(Validation::Invalid("Please enter a city name.".into()))
                        } else {
                            Ok(Validation::Valid)
                        }
                    })
                    .prompt_skippable(),
            )? {
                Prompted::Value(city) => city,
                Prompted::Back | Prompted::Quit => return Ok(()),
            },
        };

        if let LookupOutcome::Failed(kind) = page.search(&city).await {
            tracing::debug!(%kind, "lookup produced no candidates");
        }
        if page.picker().rows().is_empty() {
            continue;
        }

        let rows: Vec<PickerRow> = page.picker().rows();
        let index = match prompted(
            Select::new("Location:", rows)
                .with_page_size(5)
                .raw_prompt()
                .map(Some)
                .or_else(|e| match e {
                    InquireError::OperationCanceled => Ok(None),
                    e => Err(e),
                }),
        )? {
            Prompted::Value(option) => option.index,
            Prompted::Back => continue,
            Prompted::Quit => return Ok(()),
        };

        if page.choose(index).is_none() {
            continue;
        }
        page.refresh().await;

        if let Some(view) = page.current().view() {
            println!("\n{}", render::current_card(&view));
        }

        if !browse_days(&mut page)? {
            return Ok(());
        }
    }
}

/// Returns `false` when the user asked to quit.
fn browse_days(page: &mut Page) -> anyhow::Result<bool> {
    loop {
        let Some(view) = page.forecast().view() else {
            return Ok(true);
        };
        println!("{}", render::forecast_view(&view));

        let mut actions: Vec<DayAction> = view
            .cards()
            .iter()
            .map(|card| DayAction::Day {
                date: card.date.clone(),
                label: render::day_card_label(card),
            })
            .collect();
        actions.push(DayAction::NewSearch);
        actions.push(DayAction::Quit);

        match prompted(
            Select::new("Day:", actions)
                .with_help_message("Select a day for details; select it again for the trend")
                .prompt_skippable(),
        )? {
            Prompted::Value(DayAction::Day { date, .. }) => {
                page.click_day(&date);
            }
            Prompted::Value(DayAction::NewSearch) | Prompted::Back => return Ok(true),
            Prompted::Value(DayAction::Quit) | Prompted::Quit => return Ok(false),
        }
    }
}
