//! County time chart with brush-driven city drill-down.
//!
//! [`CountyTimeChart`] owns the series fetch, the chart's
//! [`BrushReconciler`] and the dependent city ranking that is shown while
//! a brushed range is applied.

use accident_map_api::{ApiClient, ApiError};
use accident_map_api_models::{LocationStats, TimeSeries};
use accident_map_filter::{
    FilterError, FilterModel, StateCode, TimeDimension,
    brush::{BrushReconciler, TimeRange},
};
use async_trait::async_trait;

use crate::{
    DataSource, ViewController, ViewStatus,
    views::street::{StreetAnalysisQuery, StreetDrillDown},
};

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Axis label for one value of `dimension`.
///
/// Days of week start at 0 (Sunday), months at 1 (January); hours render
/// as `HH:00`. Values outside the axis fall back to the bare number.
///
/// The county time-analysis backend numbers months from 0. Such a value
/// labels as `"0"`, and brushing it fails with
/// [`FilterError::OutOfRange`] instead of shifting the whole axis.
#[must_use]
pub fn axis_label(dimension: TimeDimension, value: u16) -> String {
    let named = match dimension {
        TimeDimension::Hour => return format!("{value:02}:00"),
        TimeDimension::Day => DAY_NAMES.get(usize::from(value)),
        TimeDimension::Month => usize::from(value)
            .checked_sub(1)
            .and_then(|i| MONTH_NAMES.get(i)),
    };
    named.map_or_else(|| value.to_string(), ToString::to_string)
}

/// Input of a county time series fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct CountyTimeQuery {
    /// County name.
    pub county: String,
    /// State the county is in.
    pub state: StateCode,
    /// Axis to break the series down by.
    pub dimension: TimeDimension,
    /// Time and feature constraints.
    pub filter: FilterModel,
}

/// `GET /county/time-analysis`.
#[derive(Debug, Clone)]
pub struct CountyTimeSource {
    client: ApiClient,
}

impl CountyTimeSource {
    /// Creates a source backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for CountyTimeSource {
    type Query = CountyTimeQuery;
    type Data = TimeSeries;

    fn name(&self) -> &str {
        "county-time"
    }

    async fn fetch(&self, query: &CountyTimeQuery) -> Result<TimeSeries, ApiError> {
        let response = self
            .client
            .county_time_analysis(&query.county, &query.state, query.dimension, &query.filter)
            .await?;
        Ok(response.data)
    }

    fn is_empty(data: &TimeSeries) -> bool {
        data.is_empty()
    }
}

/// Input of a city ranking fetch inside a brushed range.
#[derive(Debug, Clone, PartialEq)]
pub struct CityAnalysisQuery {
    /// County name.
    pub county: String,
    /// State the county is in.
    pub state: StateCode,
    /// Brushed range.
    pub range: TimeRange,
    /// Filter with the brushed range applied.
    pub filter: FilterModel,
}

/// `GET /analysis/cities`.
#[derive(Debug, Clone)]
pub struct CityAnalysisSource {
    client: ApiClient,
}

impl CityAnalysisSource {
    /// Creates a source backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for CityAnalysisSource {
    type Query = CityAnalysisQuery;
    type Data = Vec<LocationStats>;

    fn name(&self) -> &str {
        "city-analysis"
    }

    async fn fetch(&self, query: &CityAnalysisQuery) -> Result<Vec<LocationStats>, ApiError> {
        self.client
            .city_analysis(&query.county, &query.state, &query.range, &query.filter)
            .await
    }

    fn is_empty(data: &Vec<LocationStats>) -> bool {
        data.is_empty()
    }
}

/// Axis values of `series` once it has settled on a fetch for
/// `dimension`. While a refetch is pending, the previous axis is not
/// offered.
fn current_axis<T>(series: &ViewController<T>, dimension: TimeDimension) -> Option<&[u16]>
where
    T: DataSource<Query = CountyTimeQuery, Data = TimeSeries>,
{
    let settled = matches!(series.status(), ViewStatus::Ready | ViewStatus::Empty);
    if !settled || series.query().map(|q| q.dimension) != Some(dimension) {
        return None;
    }
    series.data().map(|data| data.time_values.as_slice())
}

/// Time chart of one county.
///
/// Opens broken down by month, like the dashboard.
pub struct CountyTimeChart<T = CountyTimeSource, C = CityAnalysisSource>
where
    T: DataSource<Query = CountyTimeQuery, Data = TimeSeries>,
    C: DataSource<Query = CityAnalysisQuery, Data = Vec<LocationStats>>,
{
    county: String,
    state: StateCode,
    filter: FilterModel,
    brush: BrushReconciler,
    series: ViewController<T>,
    cities: ViewController<C>,
}

impl<T, C> CountyTimeChart<T, C>
where
    T: DataSource<Query = CountyTimeQuery, Data = TimeSeries>,
    C: DataSource<Query = CityAnalysisQuery, Data = Vec<LocationStats>>,
{
    /// Opens the chart and starts fetching its series.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn open(
        series_source: T,
        city_source: C,
        county: &str,
        state: StateCode,
        filter: FilterModel,
    ) -> Self {
        log::info!("opening time chart for {county}, {state}");
        let mut chart = Self {
            county: county.to_string(),
            state,
            filter,
            brush: BrushReconciler::new(TimeDimension::Month),
            series: ViewController::new(series_source),
            cities: ViewController::new(city_source),
        };
        chart.refetch_series();
        chart
    }

    /// County name.
    #[must_use]
    pub fn county(&self) -> &str {
        &self.county
    }

    /// State code.
    #[must_use]
    pub const fn state(&self) -> &StateCode {
        &self.state
    }

    /// The chart's current filter snapshot (brushed range included once
    /// applied).
    #[must_use]
    pub const fn filter(&self) -> &FilterModel {
        &self.filter
    }

    /// Axis the chart is broken down by.
    #[must_use]
    pub const fn dimension(&self) -> TimeDimension {
        self.brush.dimension()
    }

    /// The brush state machine.
    #[must_use]
    pub const fn brush(&self) -> &BrushReconciler {
        &self.brush
    }

    /// The series view.
    #[must_use]
    pub const fn series(&self) -> &ViewController<T> {
        &self.series
    }

    /// Mutable access to the series view (retry, manual commits).
    pub fn series_mut(&mut self) -> &mut ViewController<T> {
        &mut self.series
    }

    /// The city ranking, shown only while a brushed range is applied.
    #[must_use]
    pub fn detail(&self) -> Option<&ViewController<C>> {
        self.brush.is_applied().then_some(&self.cities)
    }

    /// Mutable access to the city ranking while it is shown.
    pub fn detail_mut(&mut self) -> Option<&mut ViewController<C>> {
        if self.brush.is_applied() {
            Some(&mut self.cities)
        } else {
            None
        }
    }

    /// Axis labels of the loaded series. Empty until the series for the
    /// current dimension has loaded.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        let dimension = self.dimension();
        current_axis(&self.series, dimension).map_or_else(Vec::new, |values| {
            values
                .iter()
                .map(|&value| axis_label(dimension, value))
                .collect()
        })
    }

    fn refetch_series(&mut self) {
        self.series.replace(CountyTimeQuery {
            county: self.county.clone(),
            state: self.state.clone(),
            dimension: self.brush.dimension(),
            filter: self.filter.clone(),
        });
    }

    fn hide_detail(&mut self) {
        self.cities.clear();
    }

    /// Switches the chart axis. Resets any brush, hides the city ranking
    /// and refetches. Returns `false` if `dimension` is already shown.
    pub fn set_dimension(&mut self, dimension: TimeDimension) -> bool {
        if dimension == self.brush.dimension() {
            return false;
        }
        if let Some(cleared) = self.brush.set_dimension(dimension, &self.filter) {
            self.filter = cleared;
        }
        self.hide_detail();
        self.refetch_series();
        true
    }

    /// Replaces the chart's filter after the parent view changed it.
    pub fn set_filter(&mut self, filter: FilterModel) {
        self.brush.reset(&filter);
        self.filter = filter;
        self.hide_detail();
        self.refetch_series();
    }

    /// Starts a brush drag at axis `index`.
    pub fn begin_drag(&mut self, index: usize) -> bool {
        self.brush.begin_drag(index)
    }

    /// Finishes a brush drag at axis `index`. Returns whether a selection
    /// is pending. A drag ending before the current dimension's series
    /// has loaded is dropped.
    pub fn end_drag(&mut self, index: usize) -> bool {
        let values = current_axis(&self.series, self.brush.dimension()).unwrap_or_default();
        self.brush.end_drag(index, values).is_some()
    }

    /// Applies the pending selection and fetches the city ranking for it.
    /// Returns `Ok(false)` when nothing is pending.
    ///
    /// # Errors
    ///
    /// Returns a [`FilterError`] if the axis values are outside the
    /// dimension's domain.
    pub fn apply_selection(&mut self) -> Result<bool, FilterError> {
        let Some(applied) = self.brush.apply(&self.filter)? else {
            return Ok(false);
        };
        self.filter = applied.filter;
        self.cities.replace(CityAnalysisQuery {
            county: self.county.clone(),
            state: self.state.clone(),
            range: applied.range,
            filter: self.filter.clone(),
        });
        Ok(true)
    }

    /// Drops the brush ("Reset") and hides the city ranking.
    pub fn reset_selection(&mut self) {
        if let Some(cleared) = self.brush.reset(&self.filter) {
            self.filter = cleared;
        }
        self.hide_detail();
    }

    /// The range the city ranking is scoped to, while applied.
    #[must_use]
    pub fn applied_range(&self) -> Option<TimeRange> {
        if !self.brush.is_applied() {
            return None;
        }
        self.brush.selection().map(|selection| selection.range())
    }

    /// Street drill-down for the rows of the city ranking, scoped to the
    /// applied range. `None` while nothing is applied.
    #[must_use]
    pub fn street_drill_down<S>(&self, source: S) -> Option<StreetDrillDown<S>>
    where
        S: DataSource<Query = StreetAnalysisQuery, Data = Vec<LocationStats>>,
    {
        let range = self.applied_range()?;
        Some(StreetDrillDown::new(
            source,
            &self.county,
            self.state.clone(),
            range,
            self.filter.clone(),
        ))
    }

    /// Waits until both the series and any shown ranking have settled.
    pub async fn settle(&mut self) {
        self.series.settle().await;
        self.cities.settle().await;
    }

    /// Closes the chart, aborting outstanding fetches.
    pub fn close(&mut self) {
        if let Some(cleared) = self.brush.close(&self.filter) {
            self.filter = cleared;
        }
        self.series.close();
        self.cities.close();
    }
}

impl<T, C> std::fmt::Debug for CountyTimeChart<T, C>
where
    T: DataSource<Query = CountyTimeQuery, Data = TimeSeries>,
    C: DataSource<Query = CityAnalysisQuery, Data = Vec<LocationStats>>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountyTimeChart")
            .field("county", &self.county)
            .field("state", &self.state)
            .field("brush", self.brush.state())
            .field("series", &self.series)
            .field("cities", &self.cities)
            .finish_non_exhaustive()
    }
}
