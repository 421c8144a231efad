//! Endpoint methods of the aggregation API.

use std::time::Duration;

use accident_map_api_models::{
    LocationStats, MapDataResponse, RankedLocation, RankingLevel, StateDetailsResponse,
    TimeAnalysisResponse,
};
use accident_map_filter::{
    FilterModel, StateCode, TimeDimension,
    brush::TimeRange,
    query::{self, QueryParams},
};

use crate::{ApiConfig, ApiError, http};

/// Path of the national map aggregation.
pub const MAP_DATA_PATH: &str = "/spatial/map-data";
/// Path of the per-county time series.
pub const COUNTY_TIME_PATH: &str = "/county/time-analysis";
/// Path of the city ranking inside a time range.
pub const CITY_ANALYSIS_PATH: &str = "/analysis/cities";
/// Path of the street ranking inside a city.
pub const STREET_ANALYSIS_PATH: &str = "/analysis/streets";
/// Path of the state choropleth.
pub const STATE_DETAILS_PATH: &str = "/state/details";
/// Path of the top-N ranking.
pub const TOP_ACCIDENTS_PATH: &str = "/spatial/top-accidents";
/// Path of the available state list.
pub const STATES_PATH: &str = "/spatial/states";

/// Maximum number of entries kept from a top-accidents ranking.
pub const TOP_ACCIDENTS_LIMIT: usize = 10;

/// Client for the accident aggregation API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self::with_client(http, &config.base_url))
    }

    /// Wraps an existing [`reqwest::Client`].
    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, path: &str, params: &QueryParams) -> reqwest::RequestBuilder {
        log::debug!("GET {}{path}?{params}", self.base_url);
        self.http
            .get(format!("{}{path}", self.base_url))
            .header(reqwest::header::ACCEPT, "application/json")
            .query(params.pairs())
    }

    /// Fetches the national (or state-scoped, when the filter carries a
    /// state) accident points and summary.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the body has no
    /// `points` array.
    pub async fn map_data(&self, filter: &FilterModel) -> Result<MapDataResponse, ApiError> {
        let request = self.request(MAP_DATA_PATH, &map_data_params(filter));
        http::send_json(MAP_DATA_PATH, request).await
    }

    /// Fetches the accident count per hour, day of week or month for one
    /// county.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the series arrays
    /// have different lengths.
    pub async fn county_time_analysis(
        &self,
        county: &str,
        state: &StateCode,
        dimension: TimeDimension,
        filter: &FilterModel,
    ) -> Result<TimeAnalysisResponse, ApiError> {
        let params = county_time_params(county, state, dimension, filter);
        let request = self.request(COUNTY_TIME_PATH, &params);
        let response: TimeAnalysisResponse = http::send_json(COUNTY_TIME_PATH, request).await?;
        if !response.data.is_consistent() {
            return Err(ApiError::Shape {
                endpoint: COUNTY_TIME_PATH.to_string(),
                message: format!(
                    "{} time values but {} accident counts",
                    response.data.time_values.len(),
                    response.data.accident_counts.len()
                ),
            });
        }
        Ok(response)
    }

    /// Fetches the city ranking of a county inside a brushed time range.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the body is not a
    /// list of location statistics.
    pub async fn city_analysis(
        &self,
        county: &str,
        state: &StateCode,
        range: &TimeRange,
        filter: &FilterModel,
    ) -> Result<Vec<LocationStats>, ApiError> {
        let params = city_analysis_params(county, state, range, filter);
        let request = self.request(CITY_ANALYSIS_PATH, &params);
        http::send_json(CITY_ANALYSIS_PATH, request).await
    }

    /// Fetches the street ranking of one city inside a brushed time range.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the body is not a
    /// list of location statistics.
    pub async fn street_analysis(
        &self,
        city: &str,
        county: &str,
        state: &StateCode,
        range: &TimeRange,
        filter: &FilterModel,
    ) -> Result<Vec<LocationStats>, ApiError> {
        let params = street_analysis_params(city, county, state, range, filter);
        let request = self.request(STREET_ANALYSIS_PATH, &params);
        http::send_json(STREET_ANALYSIS_PATH, request).await
    }

    /// Fetches the county choropleth and summary of one state.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the body is not a
    /// state details document.
    pub async fn state_details(
        &self,
        state: &StateCode,
        filter: &FilterModel,
    ) -> Result<StateDetailsResponse, ApiError> {
        let params = state_details_params(state, filter);
        let request = self.request(STATE_DETAILS_PATH, &params);
        http::send_json(STATE_DETAILS_PATH, request).await
    }

    /// Fetches the top locations at `level`, keeping at most
    /// [`TOP_ACCIDENTS_LIMIT`] entries.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the body is not a
    /// ranking.
    pub async fn top_accidents(
        &self,
        level: RankingLevel,
        state: Option<&StateCode>,
        county: Option<&str>,
        filter: &FilterModel,
    ) -> Result<Vec<RankedLocation>, ApiError> {
        let params = top_accidents_params(level, state, county, filter);
        let request = self.request(TOP_ACCIDENTS_PATH, &params);
        let mut ranking: Vec<RankedLocation> =
            http::send_json(TOP_ACCIDENTS_PATH, request).await?;
        ranking.truncate(TOP_ACCIDENTS_LIMIT);
        Ok(ranking)
    }

    /// Lists the state codes that have data.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] if the request fails or the body is not a
    /// list of strings.
    pub async fn states(&self) -> Result<Vec<String>, ApiError> {
        let request = self.request(STATES_PATH, &QueryParams::new());
        http::send_json(STATES_PATH, request).await
    }
}

fn map_data_params(filter: &FilterModel) -> QueryParams {
    query::encode(filter)
}

fn county_time_params(
    county: &str,
    state: &StateCode,
    dimension: TimeDimension,
    filter: &FilterModel,
) -> QueryParams {
    let mut params = query::encode(filter);
    params
        .set(query::STATE_KEY, state)
        .push("county", county)
        .push("timeType", dimension);
    params
}

fn city_analysis_params(
    county: &str,
    state: &StateCode,
    range: &TimeRange,
    filter: &FilterModel,
) -> QueryParams {
    let mut params = query::encode(filter);
    params.set(query::STATE_KEY, state).push("county", county);
    push_range(&mut params, range);
    params
}

fn street_analysis_params(
    city: &str,
    county: &str,
    state: &StateCode,
    range: &TimeRange,
    filter: &FilterModel,
) -> QueryParams {
    let mut params = query::encode(filter);
    params
        .set(query::STATE_KEY, state)
        .push("county", county)
        .push("city", city);
    push_range(&mut params, range);
    params
}

fn state_details_params(state: &StateCode, filter: &FilterModel) -> QueryParams {
    let mut params = query::encode(filter);
    params.set(query::STATE_KEY, state);
    params
}

fn top_accidents_params(
    level: RankingLevel,
    state: Option<&StateCode>,
    county: Option<&str>,
    filter: &FilterModel,
) -> QueryParams {
    let mut params = query::encode(filter);
    params.push("view_type", level);
    // The ranking's own selection scopes it, never the filter's state.
    match state {
        Some(state) => params.set(query::STATE_KEY, state),
        None => params.remove(query::STATE_KEY),
    };
    if let Some(county) = county {
        params.push("county", county);
    }
    params
}

fn push_range(params: &mut QueryParams, range: &TimeRange) {
    params
        .push("timeType", range.dimension)
        .push("startTime", range.start)
        .push("endTime", range.end);
}
