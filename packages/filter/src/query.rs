//! Filter model to wire query parameter encoding.
//!
//! Multi-select fields are sent as repeated `key[]=value` pairs in
//! ascending order, scalars as single pairs. Fields that are empty or
//! absent emit nothing, which is how "unconstrained" reaches the backend.

use std::fmt;

use accident_map_filter_models::FilterModel;

/// Key for the selected years.
pub const YEARS_KEY: &str = "years[]";
/// Key for the selected months.
pub const MONTHS_KEY: &str = "months[]";
/// Key for the selected calendar days of month.
pub const DAYS_KEY: &str = "days[]";
/// Key for the selected hours of day.
pub const HOURS_KEY: &str = "hours[]";
/// Key for the selected days of week.
pub const DAY_OF_WEEK_KEY: &str = "selectedDayOfWeek[]";
/// Key for the active traffic feature.
pub const FEATURE_KEY: &str = "feature";
/// Key for the state scope.
pub const STATE_KEY: &str = "state";
/// Keys for the area selection, in emission order.
pub const BOUNDS_KEYS: [&str; 4] = ["minLng", "maxLng", "minLat", "maxLat"];

/// An ordered list of query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Creates an empty parameter list.
    #[must_use]
    pub const fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Appends one `key=value` pair.
    pub fn push(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    /// Appends one pair per value, in iteration order.
    pub fn push_all<T: ToString>(
        &mut self,
        key: &str,
        values: impl IntoIterator<Item = T>,
    ) -> &mut Self {
        for value in values {
            self.push(key, value);
        }
        self
    }

    /// Replaces every pair for `key` with a single `key=value` pair.
    pub fn set(&mut self, key: &str, value: impl ToString) -> &mut Self {
        self.remove(key);
        self.push(key, value)
    }

    /// Drops every pair for `key`.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.pairs.retain(|(k, _)| k != key);
        self
    }

    /// Builder-style [`Self::push`].
    #[must_use]
    pub fn with(mut self, key: &str, value: impl ToString) -> Self {
        self.push(key, value);
        self
    }

    /// The encoded pairs, in emission order.
    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// All values emitted for `key`.
    #[must_use]
    pub fn values(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Returns `true` if any pair uses `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Number of pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Renders the raw `k=v&k=v` form for logs and diagnostics. The HTTP client
/// sends [`QueryParams::pairs`] and does its own percent-encoding.
impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.pairs.iter().enumerate() {
            if i > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

/// Encodes a filter snapshot as query parameters.
///
/// Calendar days are left out while a day-of-week selection is active.
#[must_use]
pub fn encode(model: &FilterModel) -> QueryParams {
    let mut params = QueryParams::new();

    params.push_all(YEARS_KEY, model.selected_years());
    params.push_all(MONTHS_KEY, model.selected_months());
    if model.selected_day_of_week().is_empty() {
        params.push_all(DAYS_KEY, model.selected_days());
    }
    params.push_all(HOURS_KEY, model.selected_hours());
    params.push_all(DAY_OF_WEEK_KEY, model.selected_day_of_week());

    if let Some(feature) = model.active_feature() {
        params.push(FEATURE_KEY, feature.query_value());
    }

    if let Some(bounds) = model.bounds() {
        let [min_lng, max_lng, min_lat, max_lat] = BOUNDS_KEYS;
        params
            .push(min_lng, bounds.min_lng())
            .push(max_lng, bounds.max_lng())
            .push(min_lat, bounds.min_lat())
            .push(max_lat, bounds.max_lat());
    }

    if let Some(state) = model.state() {
        params.push(STATE_KEY, state);
    }

    log::trace!("encoded filter: {params}");
    params
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use accident_map_filter_models::{FieldUpdate, Feature, LngLat, StateCode, ViewScope};

    use super::*;

    fn set<T: Ord + Copy>(values: &[T]) -> BTreeSet<T> {
        values.iter().copied().collect()
    }

    #[test]
    fn years_are_ascending() {
        let model = FilterModel::unconstrained(ViewScope::National)
            .set_field(FieldUpdate::Years(set(&[2020, 2018, 2019])))
            .unwrap();
        assert_eq!(
            encode(&model).to_string(),
            "years[]=2018&years[]=2019&years[]=2020"
        );
    }

    #[test]
    fn encoding_is_deterministic() {
        let model = FilterModel::with_year(ViewScope::National, 2021)
            .unwrap()
            .set_field(FieldUpdate::Hours(set(&[23, 0, 12])))
            .unwrap()
            .toggle_feature(Feature::Junction);
        assert_eq!(encode(&model), encode(&model));
        assert_eq!(encode(&model).values(HOURS_KEY), vec!["0", "12", "23"]);
    }

    #[test]
    fn unconstrained_filter_emits_nothing() {
        let model = FilterModel::unconstrained(ViewScope::National);
        assert!(encode(&model).is_empty());
    }

    #[test]
    fn empty_fields_emit_no_keys() {
        let model = FilterModel::with_year(ViewScope::National, 2017)
            .unwrap()
            .set_field(FieldUpdate::Months(BTreeSet::new()))
            .unwrap();
        let params = encode(&model);
        assert!(params.contains_key(YEARS_KEY));
        for key in [MONTHS_KEY, DAYS_KEY, HOURS_KEY, DAY_OF_WEEK_KEY, FEATURE_KEY, STATE_KEY] {
            assert!(!params.contains_key(key), "unexpected key {key}");
        }
        for key in BOUNDS_KEYS {
            assert!(!params.contains_key(key), "unexpected key {key}");
        }
    }

    #[test]
    fn day_and_night_features_are_renamed() {
        let base = FilterModel::unconstrained(ViewScope::National);
        assert_eq!(
            encode(&base.toggle_feature(Feature::DayTime)).values(FEATURE_KEY),
            vec!["Day"]
        );
        assert_eq!(
            encode(&base.toggle_feature(Feature::NightTime)).values(FEATURE_KEY),
            vec!["Night"]
        );
        assert_eq!(
            encode(&base.toggle_feature(Feature::TrafficSignal)).values(FEATURE_KEY),
            vec!["trafficSignal"]
        );
    }

    #[test]
    fn bounds_and_state_are_scalars() {
        let model = FilterModel::unconstrained(ViewScope::State)
            .set_bounds(LngLat::new(-80.5, 40.0), LngLat::new(-90.0, 30.25))
            .set_field(FieldUpdate::State(Some(StateCode::new("oh").unwrap())))
            .unwrap();
        assert_eq!(
            encode(&model).to_string(),
            "minLng=-90&maxLng=-80.5&minLat=30.25&maxLat=40&state=OH"
        );
    }

    #[test]
    fn calendar_days_suppressed_by_day_of_week() {
        let model = FilterModel::unconstrained(ViewScope::National)
            .set_field(FieldUpdate::DayOfWeek(set(&[1, 2])))
            .unwrap()
            .set_field(FieldUpdate::Days(set(&[15])))
            .unwrap();
        let params = encode(&model);
        assert!(!params.contains_key(DAYS_KEY));
        assert_eq!(params.values(DAY_OF_WEEK_KEY), vec!["1", "2"]);
    }

    #[test]
    fn key_order_is_fixed() {
        let model = FilterModel::with_year(ViewScope::National, 2016)
            .unwrap()
            .set_field(FieldUpdate::Months(set(&[2])))
            .unwrap()
            .set_field(FieldUpdate::Days(set(&[9])))
            .unwrap()
            .set_field(FieldUpdate::Hours(set(&[17])))
            .unwrap()
            .toggle_feature(Feature::Crossing);
        assert_eq!(
            encode(&model).to_string(),
            "years[]=2016&months[]=2&days[]=9&hours[]=17&feature=crossing"
        );
    }

    #[test]
    fn extra_scalars_append_after_filter() {
        let model = FilterModel::with_year(ViewScope::State, 2022).unwrap();
        let params = encode(&model).with("county", "Cook").with("timeType", "hour");
        assert_eq!(params.to_string(), "years[]=2022&county=Cook&timeType=hour");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn set_replaces_existing_scalar() {
        let model = FilterModel::unconstrained(ViewScope::State)
            .set_field(FieldUpdate::State(Some(StateCode::new("TX").unwrap())))
            .unwrap();
        let mut params = encode(&model);
        params.set(STATE_KEY, "CA");
        assert_eq!(params.values(STATE_KEY), vec!["CA"]);
    }

    #[test]
    fn remove_drops_every_pair_for_key() {
        let model = FilterModel::unconstrained(ViewScope::State)
            .set_field(FieldUpdate::Hours([1, 2].into_iter().collect()))
            .unwrap()
            .set_field(FieldUpdate::State(Some(StateCode::new("TX").unwrap())))
            .unwrap();
        let mut params = encode(&model);
        params.remove(HOURS_KEY).remove(STATE_KEY);
        assert!(params.is_empty());
    }
}
