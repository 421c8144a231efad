//! Street ranking of one city inside an applied brush range.

use accident_map_api::{ApiClient, ApiError};
use accident_map_api_models::LocationStats;
use accident_map_filter::{FilterModel, StateCode, brush::TimeRange};
use async_trait::async_trait;

use crate::{DataSource, ViewController};

/// Input of a street ranking fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct StreetAnalysisQuery {
    /// City whose streets are ranked.
    pub city: String,
    /// County name.
    pub county: String,
    /// State the county is in.
    pub state: StateCode,
    /// Applied brush range.
    pub range: TimeRange,
    /// Filter with the brush range applied.
    pub filter: FilterModel,
}

/// `GET /analysis/streets`.
#[derive(Debug, Clone)]
pub struct StreetAnalysisSource {
    client: ApiClient,
}

impl StreetAnalysisSource {
    /// Creates a source backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for StreetAnalysisSource {
    type Query = StreetAnalysisQuery;
    type Data = Vec<LocationStats>;

    fn name(&self) -> &str {
        "street-analysis"
    }

    async fn fetch(&self, query: &StreetAnalysisQuery) -> Result<Vec<LocationStats>, ApiError> {
        self.client
            .street_analysis(
                &query.city,
                &query.county,
                &query.state,
                &query.range,
                &query.filter,
            )
            .await
    }

    fn is_empty(data: &Vec<LocationStats>) -> bool {
        data.is_empty()
    }
}

/// Expand / collapse state of the city list's street rankings. At most one
/// city is expanded at a time.
pub struct StreetDrillDown<S = StreetAnalysisSource>
where
    S: DataSource<Query = StreetAnalysisQuery, Data = Vec<LocationStats>>,
{
    county: String,
    state: StateCode,
    range: TimeRange,
    filter: FilterModel,
    expanded: Option<String>,
    streets: ViewController<S>,
}

impl<S> StreetDrillDown<S>
where
    S: DataSource<Query = StreetAnalysisQuery, Data = Vec<LocationStats>>,
{
    /// Creates a collapsed drill-down scoped to an applied range.
    #[must_use]
    pub fn new(
        source: S,
        county: &str,
        state: StateCode,
        range: TimeRange,
        filter: FilterModel,
    ) -> Self {
        Self {
            county: county.to_string(),
            state,
            range,
            filter,
            expanded: None,
            streets: ViewController::new(source),
        }
    }

    /// The expanded city, if any.
    #[must_use]
    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    /// The street ranking of the expanded city.
    #[must_use]
    pub fn streets(&self) -> Option<&ViewController<S>> {
        self.expanded.as_ref().map(|_| &self.streets)
    }

    /// Clicks a city: expands it and fetches its streets, or collapses it
    /// if it is already expanded. Returns whether the city is now
    /// expanded.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    pub fn toggle_city(&mut self, city: &str) -> bool {
        if self.expanded.as_deref() == Some(city) {
            log::debug!("collapsing {city}");
            self.collapse();
            return false;
        }

        self.expanded = Some(city.to_string());
        self.streets.replace(StreetAnalysisQuery {
            city: city.to_string(),
            county: self.county.clone(),
            state: self.state.clone(),
            range: self.range,
            filter: self.filter.clone(),
        });
        true
    }

    /// Collapses the expanded city.
    pub fn collapse(&mut self) {
        self.expanded = None;
        self.streets.clear();
    }

    /// Waits for the expanded city's ranking to settle.
    pub async fn settle(&mut self) {
        self.streets.settle().await;
    }

    /// Closes the drill-down, aborting any fetch.
    pub fn close(&mut self) {
        self.expanded = None;
        self.streets.close();
    }
}

impl<S> std::fmt::Debug for StreetDrillDown<S>
where
    S: DataSource<Query = StreetAnalysisQuery, Data = Vec<LocationStats>>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreetDrillDown")
            .field("county", &self.county)
            .field("expanded", &self.expanded)
            .field("streets", &self.streets)
            .finish_non_exhaustive()
    }
}
