//! State choropleth.

use accident_map_api::{ApiClient, ApiError};
use accident_map_api_models::{CountyProperties, StateDetailsResponse};
use accident_map_filter::{FilterModel, StateCode, VisualizationType};
use async_trait::async_trait;

use crate::DataSource;

/// Fill colors of the county classes, lightest first.
pub const SHADE_COLORS: [&str; 8] = [
    "#FFEDA0", "#FED976", "#FEB24C", "#FD8D3C", "#FC4E2A", "#E31A1C", "#BD0026", "#800026",
];

/// Input of a state details fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct StateMapQuery {
    /// State to show. Takes precedence over any state in `filter`.
    pub state: StateCode,
    /// Time and feature constraints.
    pub filter: FilterModel,
}

/// `GET /state/details` for one state's county choropleth.
#[derive(Debug, Clone)]
pub struct StateMapSource {
    client: ApiClient,
}

impl StateMapSource {
    /// Creates a source backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for StateMapSource {
    type Query = StateMapQuery;
    type Data = StateDetailsResponse;

    fn name(&self) -> &str {
        "state-map"
    }

    async fn fetch(&self, query: &StateMapQuery) -> Result<StateDetailsResponse, ApiError> {
        self.client.state_details(&query.state, &query.filter).await
    }

    fn is_empty(data: &StateDetailsResponse) -> bool {
        data.is_empty()
    }
}

/// The 0-100 value a county is shaded by.
///
/// Severity (1-4) is scaled by 25; every other visualization uses the
/// county's share of the state's accidents.
#[must_use]
pub fn county_shade(county: &CountyProperties, visualization: VisualizationType) -> f64 {
    let value = match visualization {
        VisualizationType::Severity => county.avg_severity * 25.0,
        _ => county.percentage_of_total,
    };
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

/// Quantizes a 0-100 shade value into one of the [`SHADE_COLORS`] classes.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn shade_bucket(value: f64) -> usize {
    if value.is_nan() {
        return 0;
    }
    let classes = SHADE_COLORS.len();
    let width = 100.0 / classes as f64;
    ((value.clamp(0.0, 100.0) / width).floor() as usize).min(classes - 1)
}

/// Fill color for a 0-100 shade value.
#[must_use]
pub fn shade_color(value: f64) -> &'static str {
    SHADE_COLORS[shade_bucket(value)]
}
