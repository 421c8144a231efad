//! Top-accidents ranking with state, county and city drill-down.

use accident_map_api::{ApiClient, ApiError};
use accident_map_api_models::{RankedLocation, RankingLevel};
use accident_map_filter::{FilterError, FilterModel, StateCode};
use async_trait::async_trait;

use crate::{DataSource, ViewController};

/// Input of a top-accidents fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct TopAccidentsQuery {
    /// Level being ranked.
    pub level: RankingLevel,
    /// Selected state.
    pub state: Option<StateCode>,
    /// Selected county.
    pub county: Option<String>,
    /// Time constraints.
    pub filter: FilterModel,
}

/// `GET /spatial/top-accidents`.
#[derive(Debug, Clone)]
pub struct TopAccidentsSource {
    client: ApiClient,
}

impl TopAccidentsSource {
    /// Creates a source backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for TopAccidentsSource {
    type Query = TopAccidentsQuery;
    type Data = Vec<RankedLocation>;

    fn name(&self) -> &str {
        "top-accidents"
    }

    async fn fetch(&self, query: &TopAccidentsQuery) -> Result<Vec<RankedLocation>, ApiError> {
        self.client
            .top_accidents(
                query.level,
                query.state.as_ref(),
                query.county.as_deref(),
                &query.filter,
            )
            .await
    }

    fn is_empty(data: &Vec<RankedLocation>) -> bool {
        data.is_empty()
    }
}

/// `GET /spatial/states`.
#[derive(Debug, Clone)]
pub struct StatesSource {
    client: ApiClient,
}

impl StatesSource {
    /// Creates a source backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for StatesSource {
    type Query = ();
    type Data = Vec<String>;

    fn name(&self) -> &str {
        "states"
    }

    async fn fetch(&self, _query: &()) -> Result<Vec<String>, ApiError> {
        self.client.states().await
    }

    fn is_empty(data: &Vec<String>) -> bool {
        data.is_empty()
    }
}

/// The top-accidents bar chart.
pub struct TopAccidentsView<S = TopAccidentsSource>
where
    S: DataSource<Query = TopAccidentsQuery, Data = Vec<RankedLocation>>,
{
    level: RankingLevel,
    state: Option<StateCode>,
    county: Option<String>,
    filter: FilterModel,
    ranking: ViewController<S>,
}

impl<S> TopAccidentsView<S>
where
    S: DataSource<Query = TopAccidentsQuery, Data = Vec<RankedLocation>>,
{
    /// Opens the chart at the state level and starts fetching.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime.
    #[must_use]
    pub fn open(source: S, filter: FilterModel) -> Self {
        let mut view = Self {
            level: RankingLevel::State,
            state: None,
            county: None,
            filter,
            ranking: ViewController::new(source),
        };
        view.refetch();
        view
    }

    /// Level currently ranked.
    #[must_use]
    pub const fn level(&self) -> RankingLevel {
        self.level
    }

    /// Selected state.
    #[must_use]
    pub const fn selected_state(&self) -> Option<&StateCode> {
        self.state.as_ref()
    }

    /// Selected county.
    #[must_use]
    pub fn selected_county(&self) -> Option<&str> {
        self.county.as_deref()
    }

    /// The ranking view.
    #[must_use]
    pub const fn ranking(&self) -> &ViewController<S> {
        &self.ranking
    }

    fn refetch(&mut self) {
        self.ranking.replace(TopAccidentsQuery {
            level: self.level,
            state: self.state.clone(),
            county: self.county.clone(),
            filter: self.filter.clone(),
        });
    }

    /// Clicks a bar: drills down one level into `name`. Returns `Ok(false)`
    /// at the city level, which has nothing below it.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidState`] if a state-level bar name is
    /// not a state code.
    pub fn select(&mut self, name: &str) -> Result<bool, FilterError> {
        let Some(next) = self.level.child() else {
            return Ok(false);
        };
        match self.level {
            RankingLevel::State => {
                self.state = Some(StateCode::new(name)?);
                self.county = None;
            }
            RankingLevel::County => self.county = Some(name.to_string()),
            RankingLevel::City => {}
        }
        self.level = next;
        log::debug!("top accidents drilled down to {}", self.level);
        self.refetch();
        Ok(true)
    }

    /// Switches the ranked level. Going back to the state level clears the
    /// selected state and county; the county level clears the county. A
    /// level that needs a missing selection is ignored. Returns whether
    /// the level changed.
    pub fn set_level(&mut self, level: RankingLevel) -> bool {
        if level == self.level {
            return false;
        }
        match level {
            RankingLevel::State => {
                self.state = None;
                self.county = None;
            }
            RankingLevel::County if self.state.is_some() => self.county = None,
            RankingLevel::City if self.county.is_some() => {}
            RankingLevel::County | RankingLevel::City => return false,
        }
        self.level = level;
        self.refetch();
        true
    }

    /// Replaces the time constraints and refetches at the current level.
    pub fn set_filter(&mut self, filter: FilterModel) {
        self.filter = filter;
        self.refetch();
    }

    /// Waits for the ranking to settle.
    pub async fn settle(&mut self) {
        self.ranking.settle().await;
    }

    /// Closes the chart.
    pub fn close(&mut self) {
        self.ranking.close();
    }
}

impl<S> std::fmt::Debug for TopAccidentsView<S>
where
    S: DataSource<Query = TopAccidentsQuery, Data = Vec<RankedLocation>>,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopAccidentsView")
            .field("level", &self.level)
            .field("state", &self.state)
            .field("county", &self.county)
            .field("ranking", &self.ranking)
            .finish_non_exhaustive()
    }
}
