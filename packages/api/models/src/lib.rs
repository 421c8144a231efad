#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Response types for the accident aggregation API.
//!
//! These mirror the JSON the backend returns. Aggregated numerics that the
//! backend computes as SQL `numeric` may arrive either as JSON numbers or
//! as decimal strings, so those fields go through [`lenient_f64`].

use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A single accident location for the national aggregation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccidentPoint {
    /// Longitude.
    pub lng: f64,
    /// Latitude.
    pub lat: f64,
    /// Severity (1-4), used as the aggregation weight.
    #[serde(default = "default_severity", deserialize_with = "lenient_f64")]
    pub severity: f64,
    /// State abbreviation.
    #[serde(default)]
    pub state: Option<String>,
    /// Weather at the time of the accident.
    #[serde(default)]
    pub weather_condition: Option<String>,
}

const fn default_severity() -> f64 {
    1.0
}

/// Summary statistics for a map-data query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapSummary {
    /// Total accidents matching the filter.
    #[serde(default)]
    pub total_accidents: u64,
    /// Mean severity.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_severity: f64,
    /// Number of distinct states in the result.
    #[serde(default)]
    pub states_affected: Option<u64>,
    /// Most common weather condition.
    #[serde(default)]
    pub common_weather: Option<String>,
    /// Number of distinct years in the result.
    #[serde(default)]
    pub years_count: Option<u64>,
    /// Number of distinct months in the result.
    #[serde(default)]
    pub months_count: Option<u64>,
    /// Number of distinct days in the result.
    #[serde(default)]
    pub days_count: Option<u64>,
}

/// Accident count for one year/month bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBucket {
    /// Year.
    pub year: u16,
    /// Month (1-12).
    pub month: u8,
    /// Accidents in the bucket.
    pub count: u64,
    /// Mean severity in the bucket.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_severity: f64,
}

/// Response of `GET /api/spatial/map-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDataResponse {
    /// Accident points.
    pub points: Vec<AccidentPoint>,
    /// Summary statistics.
    #[serde(default)]
    pub summary: MapSummary,
    /// Year/month distribution of the result.
    #[serde(default)]
    pub time_distribution: Vec<TimeBucket>,
}

impl MapDataResponse {
    /// Returns `true` if no accident matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Parallel `timeValues` / `accidentCounts` arrays of a county time series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeries {
    /// X-axis values (hour, day of week or month).
    pub time_values: Vec<u16>,
    /// Accident count for each value.
    pub accident_counts: Vec<u64>,
}

impl TimeSeries {
    /// Returns `true` if the arrays have matching lengths.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.time_values.len() == self.accident_counts.len()
    }

    /// Returns `true` if there are no points or every count is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accident_counts.iter().all(|&count| count == 0)
    }

    /// `(value, count)` pairs in axis order.
    pub fn points(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.time_values
            .iter()
            .copied()
            .zip(self.accident_counts.iter().copied())
    }
}

/// Response of `GET /api/county/time-analysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAnalysisResponse {
    /// The time series.
    pub data: TimeSeries,
    /// Per-feature breakdown, when the backend provides one.
    #[serde(default)]
    pub traffic_features: Option<serde_json::Value>,
}

/// A city or street in a drill-down ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationStats {
    /// City or street name.
    pub name: String,
    /// Accidents at this location.
    pub accidents: u64,
    /// Mean severity.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_severity: f64,
}

/// A bar in the top-accidents chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedLocation {
    /// State code, county or city name depending on the level.
    pub name: String,
    /// Accidents at this location.
    pub accidents: u64,
    /// Mean severity, absent when the backend could not compute it.
    #[serde(default, deserialize_with = "lenient_opt_f64")]
    pub avg_severity: Option<f64>,
}

/// Hierarchy level of a top-accidents ranking (`view_type`).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RankingLevel {
    /// Rank states nationally.
    State,
    /// Rank counties within a state.
    County,
    /// Rank cities within a county.
    City,
}

impl RankingLevel {
    /// The next finer level, if there is one.
    #[must_use]
    pub const fn child(self) -> Option<Self> {
        match self {
            Self::State => Some(Self::County),
            Self::County => Some(Self::City),
            Self::City => None,
        }
    }
}

/// Properties of one county feature in a state choropleth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyProperties {
    /// County name.
    pub name: String,
    /// Accidents in the county.
    pub accident_count: u64,
    /// Mean severity (1-4).
    #[serde(deserialize_with = "lenient_f64")]
    pub avg_severity: f64,
    /// Share of the state's accidents, in percent.
    #[serde(deserialize_with = "lenient_f64")]
    pub percentage_of_total: f64,
    /// Cities with accidents in the county.
    #[serde(default)]
    pub cities: Vec<Option<String>>,
    /// Most common weather condition.
    #[serde(default)]
    pub common_weather: Option<String>,
}

/// Extent of a state's accidents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryBounds {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lng: f64,
    /// Eastern edge.
    pub max_lng: f64,
}

/// Summary block of a state-details response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateSummary {
    /// Total accidents in the state.
    #[serde(default)]
    pub total_accidents: u64,
    /// Mean severity.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub avg_severity: f64,
    /// Counties with at least one accident.
    #[serde(default)]
    pub counties_affected: u64,
    /// Most common weather condition.
    #[serde(default)]
    pub common_weather: Option<String>,
    /// Distinct weather conditions.
    #[serde(default)]
    pub weather_conditions: Vec<Option<String>>,
    /// Extent of the accidents.
    #[serde(default)]
    pub bounds: Option<SummaryBounds>,
}

/// Response of `GET /api/state/details`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDetailsResponse {
    /// County features with [`CountyProperties`].
    pub geojson: geojson::FeatureCollection,
    /// State-wide summary.
    #[serde(default)]
    pub summary: StateSummary,
}

impl StateDetailsResponse {
    /// Returns `true` if no county had accidents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.geojson.features.is_empty()
    }

    /// Decodes the properties of every county feature.
    ///
    /// # Errors
    ///
    /// Returns an error if a feature has no properties or they do not match
    /// [`CountyProperties`].
    pub fn counties(&self) -> Result<Vec<CountyProperties>, serde_json::Error> {
        self.geojson
            .features
            .iter()
            .map(|feature| {
                let properties = feature.properties.clone().unwrap_or_default();
                serde_json::from_value(serde_json::Value::Object(properties))
            })
            .collect()
    }
}

/// Error body returned by the backend on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Short error label (e.g. "Internal server error").
    #[serde(default)]
    pub error: Option<String>,
    /// Detailed message.
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// The most specific message available.
    #[must_use]
    pub fn best_message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

fn parse_number<E: serde::de::Error>(value: NumberOrString) -> Result<f64, E> {
    match value {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| E::custom(format!("expected a number, got {s:?}"))),
    }
}

/// Deserializes an `f64` sent either as a JSON number or a numeric string.
/// `null` becomes `0.0`.
///
/// # Errors
///
/// Fails if a string does not parse as a number.
pub fn lenient_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(lenient_opt_f64(deserializer)?.unwrap_or_default())
}

/// Like [`lenient_f64`] but keeps `null` as `None`.
///
/// # Errors
///
/// Fails if a string does not parse as a number.
pub fn lenient_opt_f64<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<f64>, D::Error> {
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(parse_number)
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_map_data() {
        let body = serde_json::json!({
            "points": [
                {"lat": 39.86, "lng": -84.06, "severity": 3.0, "state": "OH", "weather_condition": "Rain"},
                {"lat": 39.93, "lng": -82.83, "state": "OH"}
            ],
            "summary": {
                "total_accidents": 2,
                "avg_severity": "2.50",
                "states_affected": 1,
                "common_weather": "Rain",
                "years_count": 1,
                "months_count": 1,
                "days_count": 2
            },
            "timeDistribution": [{"year": 2016, "month": 2, "count": 2, "avg_severity": "2.50"}],
            "metadata": {"total_points": 2}
        });
        let response: MapDataResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.points.len(), 2);
        assert!((response.points[1].severity - 1.0).abs() < f64::EPSILON);
        assert!((response.summary.avg_severity - 2.5).abs() < f64::EPSILON);
        assert_eq!(response.time_distribution[0].count, 2);
        assert!(!response.is_empty());
    }

    #[test]
    fn map_data_requires_points() {
        let body = serde_json::json!({"summary": {"total_accidents": 0}});
        assert!(serde_json::from_value::<MapDataResponse>(body).is_err());
    }

    #[test]
    fn parses_time_analysis() {
        let body = serde_json::json!({
            "success": true,
            "data": {"timeValues": [0, 1, 2], "accidentCounts": [4, 0, 9]},
            "metadata": {"county": "Cook", "state": "IL", "timeType": "hour"}
        });
        let response: TimeAnalysisResponse = serde_json::from_value(body).unwrap();
        assert!(response.data.is_consistent());
        assert!(!response.data.is_empty());
        assert_eq!(response.data.points().nth(2), Some((2, 9)));
        assert!(response.traffic_features.is_none());
    }

    #[test]
    fn all_zero_series_is_empty() {
        let series = TimeSeries {
            time_values: vec![0, 1],
            accident_counts: vec![0, 0],
        };
        assert!(series.is_empty());
    }

    #[test]
    fn parses_state_details_counties() {
        let body = serde_json::json!({
            "geojson": {
                "type": "FeatureCollection",
                "features": [{
                    "type": "Feature",
                    "properties": {
                        "name": "Franklin",
                        "accident_count": 120,
                        "avg_severity": 2.31,
                        "cities": ["Columbus", null],
                        "common_weather": "Clear",
                        "percentage_of_total": 61.5
                    },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[-83.2, 39.8], [-83.2, 40.1], [-82.8, 40.1], [-82.8, 39.8], [-83.2, 39.8]]]
                    }
                }]
            },
            "summary": {
                "total_accidents": 195,
                "avg_severity": "2.40",
                "counties_affected": 2,
                "common_weather": "Clear",
                "weather_conditions": ["Clear", "Rain"],
                "bounds": {"min_lat": 38.4, "max_lat": 41.9, "min_lng": -84.8, "max_lng": -80.5}
            }
        });
        let response: StateDetailsResponse = serde_json::from_value(body).unwrap();
        let counties = response.counties().unwrap();
        assert_eq!(counties.len(), 1);
        assert_eq!(counties[0].name, "Franklin");
        assert_eq!(counties[0].cities, vec![Some("Columbus".to_string()), None]);
        assert_eq!(response.summary.counties_affected, 2);
    }

    #[test]
    fn parses_rankings() {
        let body = serde_json::json!([
            {"name": "CA", "accidents": 500, "avg_severity": 2.1},
            {"name": "TX", "accidents": 300, "avg_severity": null}
        ]);
        let ranked: Vec<RankedLocation> = serde_json::from_value(body).unwrap();
        assert_eq!(ranked[1].avg_severity, None);

        let cities: Vec<LocationStats> =
            serde_json::from_value(serde_json::json!([{"name": "Austin", "accidents": 3, "avgSeverity": 2.0}]))
                .unwrap();
        assert_eq!(cities[0].accidents, 3);
    }

    #[test]
    fn ranking_levels_drill_down() {
        assert_eq!(RankingLevel::State.child(), Some(RankingLevel::County));
        assert_eq!(RankingLevel::City.child(), None);
        assert_eq!(RankingLevel::County.as_ref(), "county");
    }

    #[test]
    fn error_body_prefers_message() {
        let body: ApiErrorBody = serde_json::from_value(serde_json::json!({
            "error": "Internal server error",
            "message": "relation \"accidents\" does not exist"
        }))
        .unwrap();
        assert_eq!(body.best_message(), Some("relation \"accidents\" does not exist"));
        let bare: ApiErrorBody =
            serde_json::from_value(serde_json::json!({"error": "State parameter is required"})).unwrap();
        assert_eq!(bare.best_message(), Some("State parameter is required"));
    }
}
