//! Plain-text rendering of the panels.

use std::fmt::Write as _;

use citycast_core::{CurrentView, DayCard, DetailRow, ForecastView, TrendChart};

const CHART_ROWS: i64 = 8;
const COL: usize = 6;

pub fn current_card(view: &CurrentView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Current Weather");
    let _ = writeln!(out, "in {}", view.place);
    let _ = writeln!(out, "  {}  {}", view.condition.glyph(), view.temperature_label);
    let _ = writeln!(out, "  {}", view.description);
    out
}

pub fn day_card_label(card: &DayCard) -> String {
    format!(
        "{:<9} {} {:>4} °C  {}",
        card.weekday,
        card.condition.glyph(),
        card.temperature,
        card.description
    )
}

pub fn day_cards(cards: &[DayCard], chosen: Option<&str>) -> String {
    let mut out = String::new();
    for card in cards {
        let marker = if chosen == Some(card.date.as_str()) { '>' } else { ' ' };
        let _ = writeln!(out, "{marker} {}", day_card_label(card));
    }
    out
}

/// Vertical dot plot of one value per day.
pub fn trend_chart(chart: &TrendChart) -> String {
    let (Some(&max), Some(&min)) = (chart.series.iter().max(), chart.series.iter().min()) else {
        return String::new();
    };

    let span = max - min;
    let rows = (span + 1).min(CHART_ROWS);
    let row_of = |v: i64| -> i64 {
        if rows == 1 {
            0
        } else {
            ((max - v) as f64 * (rows - 1) as f64 / span as f64).round() as i64
        }
    };
    let label_of = |r: i64| -> i64 {
        if rows == 1 {
            max
        } else {
            max - (r as f64 * span as f64 / (rows - 1) as f64).round() as i64
        }
    };

    let mut out = String::new();
    for r in 0..rows {
        let _ = write!(out, "{:>4} ┤", label_of(r));
        for &v in &chart.series {
            let cell = if row_of(v) == r { "●" } else { " " };
            let _ = write!(out, "{cell:^COL$}");
        }
        out.push('\n');
    }

    out.push_str("      ");
    for v in &chart.series {
        let _ = write!(out, "{:^COL$}", format!("{v}°"));
    }
    out.push('\n');

    out.push_str("      ");
    for day in &chart.categories {
        let short: String = day.chars().take(3).collect();
        let _ = write!(out, "{short:^COL$}");
    }
    out.push('\n');
    out
}

pub fn detail_rows(weekday: &str, rows: &[DetailRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{weekday}");
    for row in rows {
        let _ = writeln!(
            out,
            "  {}  {} {:>4} °C  feels like {:>4} °C  wind {:.1} m/s  rain {:>3}%  {}",
            row.time,
            row.condition.glyph(),
            row.temperature,
            row.feels_like,
            row.wind_speed,
            row.precipitation_chance,
            row.description
        );
    }
    out
}

pub fn forecast_view(view: &ForecastView) -> String {
    match view {
        ForecastView::Collapsed { cards } => day_cards(cards, None),
        ForecastView::Trend { cards, chosen, chart } => {
            format!("{}\n{}", day_cards(cards, Some(chosen.as_str())), trend_chart(chart))
        }
        ForecastView::Detail { cards, chosen, weekday, rows } => {
            format!("{}\n{}", day_cards(cards, Some(chosen.as_str())), detail_rows(weekday, rows))
        }
    }
}
