//! Forecast panel: day grouping, day cards, the trend chart and the
//! per-sample detail rows, plus the card-click selection state machine.

use chrono::{Datelike, Local, NaiveDate};

use crate::{
    FetchError,
    condition::{ConditionGroup, icon_url},
    coords::CoordinateReader,
    model::{Coordinates, ForecastResponse, ForecastSample, round_temp},
    provider::WeatherSource,
    refresh::{RefreshPolicy, Settled, Slot, Ticket},
};

/// Whether samples falling on "today" are dropped before grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TodayFilter {
    #[default]
    Keep,
    /// Drops every sample whose day-of-month equals this number, whatever
    /// the month. A later month sharing the number is dropped too.
    ExcludeDayOfMonth(u32),
}

impl TodayFilter {
    /// Excludes today's day-of-month on the local clock.
    pub fn today() -> Self {
        Self::ExcludeDayOfMonth(Local::now().day())
    }

    fn keeps(&self, date_key: &str) -> bool {
        match self {
            Self::Keep => true,
            Self::ExcludeDayOfMonth(day) => day_of_month(date_key) != Some(*day),
        }
    }
}

fn day_of_month(date_key: &str) -> Option<u32> {
    date_key.rsplit('-').next()?.parse().ok()
}

/// All samples sharing one calendar date, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub struct DayGroup {
    pub date: String,
    pub samples: Vec<ForecastSample>,
}

impl DayGroup {
    /// Stand-in for the whole day on cards and the chart.
    pub fn first(&self) -> Option<&ForecastSample> {
        self.samples.first()
    }

    pub fn weekday(&self) -> String {
        weekday_name(&self.date)
    }
}

/// Day groups in first-seen date order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DayGroups {
    groups: Vec<DayGroup>,
}

impl DayGroups {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DayGroup> {
        self.groups.iter()
    }

    pub fn get(&self, date: &str) -> Option<&DayGroup> {
        self.groups.iter().find(|g| g.date == date)
    }

    pub fn dates(&self) -> Vec<&str> {
        self.groups.iter().map(|g| g.date.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a DayGroups {
    type Item = &'a DayGroup;
    type IntoIter = std::slice::Iter<'a, DayGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Partitions `samples` by the literal date part of `dt_txt`.
///
/// Dates keep first-seen order and samples keep arrival order; nothing is
/// sorted.
pub fn group_by_day(samples: &[ForecastSample], filter: TodayFilter) -> DayGroups {
    let mut groups: Vec<DayGroup> = Vec::new();

    for sample in samples {
        let date = sample.date_key();
        if !filter.keeps(date) {
            continue;
        }

        match groups.iter_mut().find(|g| g.date == date) {
            Some(group) => group.samples.push(sample.clone()),
            None => groups.push(DayGroup {
                date: date.to_string(),
                samples: vec![sample.clone()],
            }),
        }
    }

    DayGroups { groups }
}

/// English weekday name of a `YYYY-MM-DD` key, or the key itself if it
/// does not parse.
pub fn weekday_name(date_key: &str) -> String {
    match NaiveDate::parse_from_str(date_key, "%Y-%m-%d") {
        Ok(date) => date.format("%A").to_string(),
        Err(_) => date_key.to_string(),
    }
}

/// Summary card for one day, built from the day's first sample.
#[derive(Debug, Clone, PartialEq)]
pub struct DayCard {
    pub date: String,
    pub weekday: String,
    pub icon: String,
    pub icon_url: String,
    pub description: String,
    pub temperature: i64,
    pub condition: ConditionGroup,
}

impl DayCard {
    pub fn from_group(group: &DayGroup) -> Option<Self> {
        let first = group.first()?;
        let condition = first.condition()?;
        Some(Self {
            date: group.date.clone(),
            weekday: group.weekday(),
            icon: condition.icon.clone(),
            icon_url: icon_url(&condition.icon),
            description: condition.description.clone(),
            temperature: round_temp(first.main.temp),
            condition: ConditionGroup::from_id(condition.id),
        })
    }
}

/// One value per day: the first reading of the day, rounded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrendChart {
    pub categories: Vec<String>,
    pub series: Vec<i64>,
}

impl TrendChart {
    pub fn from_groups(groups: &DayGroups) -> Self {
        let mut chart = Self::default();
        for group in groups {
            if let Some(first) = group.first() {
                chart.categories.push(group.weekday());
                chart.series.push(round_temp(first.main.temp));
            }
        }
        chart
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailRow {
    /// `HH:MM`
    pub time: String,
    pub icon: String,
    pub icon_url: String,
    pub description: String,
    pub temperature: i64,
    pub feels_like: i64,
    pub wind_speed: f64,
    pub precipitation_chance: u8,
    pub condition: ConditionGroup,
}

impl DetailRow {
    pub fn from_sample(sample: &ForecastSample) -> Option<Self> {
        let condition = sample.condition()?;
        Some(Self {
            time: sample.time_of_day().to_string(),
            icon: condition.icon.clone(),
            icon_url: icon_url(&condition.icon),
            description: condition.description.clone(),
            temperature: round_temp(sample.main.temp),
            feels_like: round_temp(sample.main.feels_like),
            wind_speed: sample.wind.speed,
            precipitation_chance: (sample.pop.clamp(0.0, 1.0) * 100.0).round() as u8,
            condition: ConditionGroup::from_id(condition.id),
        })
    }
}

/// Which day is chosen and whether it shows its detail rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    chosen: Option<String>,
    detail: bool,
}

impl Selection {
    pub fn chosen(&self) -> Option<&str> {
        self.chosen.as_deref()
    }

    pub fn detail(&self) -> bool {
        self.detail
    }

    /// A card click.
    ///
    /// - nothing chosen yet: choose `date` with detail on
    /// - same day again: flip detail/trend
    /// - another day: choose it and keep the flag as it was
    pub fn click(&mut self, date: &str) {
        match self.chosen.as_deref() {
            None => self.detail = true,
            Some(current) if current == date => self.detail = !self.detail,
            Some(_) => {}
        }
        self.chosen = Some(date.to_string());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForecastView {
    /// Only the day cards.
    Collapsed { cards: Vec<DayCard> },
    Trend {
        cards: Vec<DayCard>,
        chosen: String,
        chart: TrendChart,
    },
    Detail {
        cards: Vec<DayCard>,
        chosen: String,
        weekday: String,
        rows: Vec<DetailRow>,
    },
}

impl ForecastView {
    pub fn cards(&self) -> &[DayCard] {
        match self {
            Self::Collapsed { cards } | Self::Trend { cards, .. } | Self::Detail { cards, .. } => {
                cards
            }
        }
    }
}

#[derive(Debug)]
pub struct ForecastPanel {
    coords: CoordinateReader,
    filter: TodayFilter,
    slot: Slot<ForecastResponse>,
    groups: DayGroups,
    selection: Selection,
}

impl ForecastPanel {
    pub fn new(coords: CoordinateReader, filter: TodayFilter, policy: RefreshPolicy) -> Self {
        Self {
            coords,
            filter,
            slot: Slot::new("forecast", policy),
            groups: DayGroups::default(),
            selection: Selection::default(),
        }
    }

    pub fn groups(&self) -> &DayGroups {
        &self.groups
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn slot(&self) -> &Slot<ForecastResponse> {
        &self.slot
    }

    /// Forwards a card click. Dates not in the current groups are ignored.
    pub fn click(&mut self, date: &str) -> bool {
        if self.groups.get(date).is_none() {
            tracing::debug!(date, "click on unknown day ignored");
            return false;
        }
        self.selection.click(date);
        true
    }

    /// `None` when there is nothing to show.
    pub fn view(&self) -> Option<ForecastView> {
        if self.groups.is_empty() {
            return None;
        }

        let cards: Vec<DayCard> = self.groups.iter().filter_map(DayCard::from_group).collect();

        let Some(chosen) = self.selection.chosen() else {
            return Some(ForecastView::Collapsed { cards });
        };
        let Some(group) = self.groups.get(chosen) else {
            return Some(ForecastView::Collapsed { cards });
        };

        if self.selection.detail() {
            Some(ForecastView::Detail {
                cards,
                chosen: chosen.to_string(),
                weekday: group.weekday(),
                rows: group.samples.iter().filter_map(DetailRow::from_sample).collect(),
            })
        } else {
            Some(ForecastView::Trend {
                cards,
                chosen: chosen.to_string(),
                chart: TrendChart::from_groups(&self.groups),
            })
        }
    }

    pub fn begin(&mut self, coords: Coordinates) -> Ticket {
        self.slot.begin(coords)
    }

    /// Applies a response; groups are recomputed and the selection reset
    /// whenever the slot changes.
    pub fn settle(&mut self, ticket: Ticket, result: Result<ForecastResponse, FetchError>) -> Settled {
        let settled = self.slot.settle(ticket, result);
        if settled != Settled::Stale {
            self.groups = match self.slot.value() {
                Some(forecast) => group_by_day(&forecast.list, self.filter),
                None => DayGroups::default(),
            };
            self.selection = Selection::default();
        }
        settled
    }

    pub async fn reload<S>(&mut self, source: &S, coords: Coordinates) -> Settled
    where
        S: WeatherSource + ?Sized,
    {
        let ticket = self.begin(coords);
        let result = source.forecast(coords).await;
        self.settle(ticket, result)
    }

    pub async fn reload_if_changed<S>(&mut self, source: &S) -> Option<Settled>
    where
        S: WeatherSource + ?Sized,
    {
        let coords = self.coords.take_change()?;
        Some(self.reload(source, coords).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::CoordinateOwner;
    use crate::testing::{FakeSource, five_day_forecast, forecast, sample};

    const DATES: [&str; 5] = ["2024-03-09", "2024-03-10", "2024-03-11", "2024-03-12", "2024-03-13"];
    const PARIS: Coordinates = Coordinates { latitude: 48.8566, longitude: 2.3522 };
    const LONDON: Coordinates = Coordinates { latitude: 51.5073, longitude: -0.1276 };

    #[test]
    fn forty_samples_over_five_dates_make_five_groups() {
        let fc = five_day_forecast(&DATES);
        assert_eq!(fc.list.len(), 40);

        let groups = group_by_day(&fc.list, TodayFilter::Keep);
        assert_eq!(groups.len(), 5);
        assert_eq!(groups.dates(), DATES.to_vec());
        assert!(groups.iter().all(|g| g.samples.len() == 8));
    }

    #[test]
    fn excluding_today_drops_its_group() {
        let fc = five_day_forecast(&DATES);
        let groups = group_by_day(&fc.list, TodayFilter::ExcludeDayOfMonth(9));
        assert_eq!(groups.len(), 4);
        assert_eq!(groups.dates()[0], "2024-03-10");
    }

    #[test]
    fn exclusion_compares_day_of_month_only() {
        let samples = vec![
            sample("2024-03-31 21:00:00", 5.0, "clear sky"),
            sample("2024-04-01 00:00:00", 4.0, "clear sky"),
            sample("2024-05-01 00:00:00", 4.0, "clear sky"),
        ];
        let groups = group_by_day(&samples, TodayFilter::ExcludeDayOfMonth(1));
        assert_eq!(groups.dates(), vec!["2024-03-31"]);
    }

    #[test]
    fn grouping_is_a_complete_partition_in_first_seen_order() {
        let samples = vec![
            sample("2024-03-10 21:00:00", 1.0, "a"),
            sample("2024-03-09 09:00:00", 2.0, "b"),
            sample("2024-03-10 00:00:00", 3.0, "c"),
            sample("2024-03-11 00:00:00", 4.0, "d"),
            sample("2024-03-09 12:00:00", 5.0, "e"),
        ];
        let groups = group_by_day(&samples, TodayFilter::Keep);

        assert_eq!(groups.dates(), vec!["2024-03-10", "2024-03-09", "2024-03-11"]);
        let total: usize = groups.iter().map(|g| g.samples.len()).sum();
        assert_eq!(total, samples.len());

        let tenth: Vec<f64> = groups.get("2024-03-10").unwrap().samples.iter().map(|s| s.main.temp).collect();
        assert_eq!(tenth, vec![1.0, 3.0]);
    }

    #[test]
    fn empty_input_gives_empty_groups() {
        assert!(group_by_day(&[], TodayFilter::Keep).is_empty());
    }

    #[test]
    fn weekday_names() {
        assert_eq!(weekday_name("2024-03-09"), "Saturday");
        assert_eq!(weekday_name("2024-03-11"), "Monday");
        assert_eq!(weekday_name("garbage"), "garbage");
    }

    #[test]
    fn cards_and_chart_use_first_sample() {
        let samples = vec![
            sample("2024-03-09 18:00:00", 7.5, "light rain"),
            sample("2024-03-09 21:00:00", 30.0, "clear sky"),
            sample("2024-03-10 00:00:00", -2.5, "snow"),
            sample("2024-03-10 03:00:00", -9.0, "snow"),
        ];
        let groups = group_by_day(&samples, TodayFilter::Keep);

        let cards: Vec<DayCard> = groups.iter().filter_map(DayCard::from_group).collect();
        assert_eq!(cards[0].temperature, 8);
        assert_eq!(cards[0].description, "light rain");
        assert_eq!(cards[0].icon_url, "https://openweathermap.org/img/wn/03d.png");
        assert_eq!(cards[1].temperature, -2);

        let chart = TrendChart::from_groups(&groups);
        assert_eq!(chart.categories, vec!["Saturday", "Sunday"]);
        assert_eq!(chart.series, vec![8, -2]);
    }

    #[test]
    fn detail_rows_cover_every_sample() {
        let fc = five_day_forecast(&DATES);
        let groups = group_by_day(&fc.list, TodayFilter::Keep);
        let rows: Vec<DetailRow> = groups.get("2024-03-10").unwrap().samples.iter().filter_map(DetailRow::from_sample).collect();

        assert_eq!(rows.len(), 8);
        assert_eq!(rows[0].time, "00:00");
        assert_eq!(rows[7].time, "21:00");
        assert_eq!(rows[1].temperature, 11);
        assert_eq!(rows[1].feels_like, 9);
        assert_eq!(rows[1].precipitation_chance, 20);
    }

    #[test]
    fn first_click_selects_with_detail() {
        let mut sel = Selection::default();
        sel.click("2024-03-09");
        assert_eq!(sel.chosen(), Some("2024-03-09"));
        assert!(sel.detail());
    }

    #[test]
    fn clicking_same_day_inverts_flag() {
        let mut sel = Selection::default();
        sel.click("2024-03-09");
        sel.click("2024-03-09");
        assert!(!sel.detail());
        sel.click("2024-03-09");
        assert!(sel.detail());
    }

    #[test]
    fn clicking_other_day_carries_flag_over() {
        let mut sel = Selection::default();
        sel.click("2024-03-09");
        assert!(sel.detail());
        sel.click("2024-03-10");
        assert_eq!(sel.chosen(), Some("2024-03-10"));
        assert!(sel.detail());

        sel.click("2024-03-10");
        assert!(!sel.detail());
        sel.click("2024-03-11");
        assert!(!sel.detail());
    }

    fn panel() -> (CoordinateOwner, ForecastPanel) {
        let owner = CoordinateOwner::default();
        let panel = ForecastPanel::new(owner.reader(), TodayFilter::Keep, RefreshPolicy::default());
        (owner, panel)
    }

    #[tokio::test]
    async fn view_follows_the_state_machine() {
        let (_owner, mut panel) = panel();
        let source = FakeSource::default().with_forecast(PARIS, Ok(five_day_forecast(&DATES)));

        assert_eq!(panel.view(), None);
        panel.reload(&source, PARIS).await;

        assert!(matches!(panel.view(), Some(ForecastView::Collapsed { ref cards }) if cards.len() == 5));

        assert!(panel.click("2024-03-10"));
        match panel.view() {
            Some(ForecastView::Detail { chosen, weekday, rows, .. }) => {
                assert_eq!(chosen, "2024-03-10");
                assert_eq!(weekday, "Sunday");
                assert_eq!(rows.len(), 8);
            }
            other => panic!("expected detail view, got {other:?}"),
        }

        panel.click("2024-03-10");
        match panel.view() {
            Some(ForecastView::Trend { chart, .. }) => {
                assert_eq!(chart.categories.len(), 5);
                assert_eq!(chart.series, vec![0, 10, 20, 30, 40]);
            }
            other => panic!("expected trend view, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_day_click_is_ignored() {
        let (_owner, mut panel) = panel();
        let source = FakeSource::default().with_forecast(PARIS, Ok(five_day_forecast(&DATES)));
        panel.reload(&source, PARIS).await;

        assert!(!panel.click("1999-01-01"));
        assert_eq!(panel.selection().chosen(), None);
    }

    #[tokio::test]
    async fn refetch_resets_selection() {
        let (owner, mut panel) = panel();
        let source = FakeSource::default()
            .with_forecast(PARIS, Ok(five_day_forecast(&DATES)))
            .with_forecast(PARIS, Ok(five_day_forecast(&DATES)));

        owner.set(PARIS);
        panel.reload_if_changed(&source).await;
        panel.click("2024-03-09");
        assert!(panel.selection().chosen().is_some());

        owner.set(PARIS);
        panel.reload_if_changed(&source).await;
        assert_eq!(panel.selection(), &Selection::default());
        assert_eq!(source.forecast_calls().len(), 2);
    }

    #[tokio::test]
    async fn failure_empties_groups() {
        let (_owner, mut panel) = panel();
        let source = FakeSource::default()
            .with_forecast(PARIS, Ok(five_day_forecast(&DATES)))
            .with_forecast(
                LONDON,
                Err(FetchError::Status { endpoint: "forecast", status: 502, body: String::new() }),
            );

        panel.reload(&source, PARIS).await;
        assert_eq!(panel.groups().len(), 5);

        let settled = panel.reload(&source, LONDON).await;
        assert_eq!(settled, Settled::Failed(crate::ErrorKind::Transport));
        assert!(panel.groups().is_empty());
        assert_eq!(panel.view(), None);
    }

    // Known defect: Paris resolves after London and its days are shown
    // while London is the requested location.
    #[tokio::test]
    async fn out_of_order_forecast_shows_stale_days() {
        let (_owner, mut panel) = panel();
        let paris_days = ["2024-03-09", "2024-03-10"];
        let london_days = ["2024-04-01", "2024-04-02"];
        let source = FakeSource::default()
            .with_forecast(PARIS, Ok(five_day_forecast(&paris_days)))
            .with_forecast(LONDON, Ok(five_day_forecast(&london_days)));

        let ta = panel.begin(PARIS);
        let tb = panel.begin(LONDON);
        let london = source.forecast(LONDON).await;
        let paris = source.forecast(PARIS).await;
        panel.settle(tb, london);
        panel.settle(ta, paris);

        assert_eq!(panel.slot().requested(), Some(LONDON));
        assert_eq!(panel.groups().dates(), paris_days.to_vec());
    }

    #[tokio::test]
    async fn stale_discard_leaves_selection_alone() {
        let owner = CoordinateOwner::default();
        let mut panel = ForecastPanel::new(owner.reader(), TodayFilter::Keep, RefreshPolicy::DiscardOlder);
        let source = FakeSource::default()
            .with_forecast(PARIS, Ok(five_day_forecast(&DATES)))
            .with_forecast(LONDON, Ok(forecast(vec![sample("2024-03-09 00:00:00", 1.0, "x")])));

        let ta = panel.begin(LONDON);
        let tb = panel.begin(PARIS);
        let paris = source.forecast(PARIS).await;
        panel.settle(tb, paris);
        panel.click("2024-03-11");

        let london = source.forecast(LONDON).await;
        assert_eq!(panel.settle(ta, london), Settled::Stale);
        assert_eq!(panel.selection().chosen(), Some("2024-03-11"));
        assert_eq!(panel.groups().len(), 5);
    }
}
