//! National map aggregation layers.

use accident_map_api::{ApiClient, ApiError};
use accident_map_api_models::MapDataResponse;
use accident_map_filter::FilterModel;
use async_trait::async_trait;

use crate::DataSource;

/// `GET /spatial/map-data` for the national map.
///
/// A filter carrying a state narrows the points to that state.
#[derive(Debug, Clone)]
pub struct NationalMapSource {
    client: ApiClient,
}

impl NationalMapSource {
    /// Creates a source backed by `client`.
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for NationalMapSource {
    type Query = FilterModel;
    type Data = MapDataResponse;

    fn name(&self) -> &str {
        "national-map"
    }

    async fn fetch(&self, query: &FilterModel) -> Result<MapDataResponse, ApiError> {
        self.client.map_data(query).await
    }

    fn is_empty(data: &MapDataResponse) -> bool {
        data.is_empty()
    }
}
