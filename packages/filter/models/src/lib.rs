#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter model types for the accident map dashboard.
//!
//! A [`FilterModel`] is the normalized, immutable description of "what
//! accident data to show" for one view. Every user interaction produces a
//! brand-new snapshot through the operations defined here; the previous
//! snapshot is never mutated. Empty selection sets always mean
//! "unconstrained", never "select nothing".

use std::collections::BTreeSet;
use std::fmt;

use chrono::Datelike;
use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

/// First year covered by the accident dataset.
pub const MIN_YEAR: u16 = 2016;

/// Last year covered by the accident dataset.
pub const MAX_YEAR: u16 = 2023;

/// Errors produced when building or updating a [`FilterModel`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// A selection value fell outside the field's domain.
    #[error("{field} value {value} out of range: expected {min}-{max}")]
    OutOfRange {
        /// The field being updated.
        field: FilterField,
        /// The rejected value.
        value: u16,
        /// Smallest accepted value.
        min: u16,
        /// Largest accepted value.
        max: u16,
    },

    /// A region code was not two ASCII letters.
    #[error("invalid state code {code:?}: expected two ASCII letters")]
    InvalidState {
        /// The rejected input.
        code: String,
    },

    /// A visualization type was applied to a view of the other scope.
    #[error("visualization {visualization} belongs to the {expected} view, not the {actual} view")]
    VisualizationScope {
        /// The rejected visualization type.
        visualization: VisualizationType,
        /// Scope the visualization type belongs to.
        expected: ViewScope,
        /// Scope of the filter being updated.
        actual: ViewScope,
    },
}

/// The multi-select fields of a [`FilterModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
#[strum(serialize_all = "camelCase")]
pub enum FilterField {
    /// `selectedYears`
    SelectedYears,
    /// `selectedMonths`
    SelectedMonths,
    /// `selectedDays`
    SelectedDays,
    /// `selectedDayOfWeek`
    SelectedDayOfWeek,
    /// `selectedHours`
    SelectedHours,
}

impl FilterField {
    /// Returns the inclusive `(min, max)` domain of this field.
    #[must_use]
    pub const fn domain(self) -> (u16, u16) {
        match self {
            Self::SelectedYears => (MIN_YEAR, MAX_YEAR),
            Self::SelectedMonths => (1, 12),
            Self::SelectedDays => (1, 31),
            Self::SelectedDayOfWeek => (0, 6),
            Self::SelectedHours => (0, 23),
        }
    }

    /// Checks that `value` lies inside this field's domain.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::OutOfRange`] when it does not.
    pub const fn check(self, value: u16) -> Result<(), FilterError> {
        let (min, max) = self.domain();
        if value < min || value > max {
            return Err(FilterError::OutOfRange {
                field: self,
                value,
                min,
                max,
            });
        }
        Ok(())
    }
}

/// Time axis a county chart can be broken down by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TimeDimension {
    /// Hour of day (0-23).
    Hour,
    /// Day of week (0 = Sunday).
    Day,
    /// Month of year (1-12).
    Month,
}

impl TimeDimension {
    /// Returns all dimensions in selector order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Hour, Self::Day, Self::Month]
    }

    /// Returns the filter field a brush over this dimension writes to.
    ///
    /// Note that [`Self::Day`] maps to the day-of-week field, not the
    /// calendar day-of-month field.
    #[must_use]
    pub const fn field(self) -> FilterField {
        match self {
            Self::Hour => FilterField::SelectedHours,
            Self::Day => FilterField::SelectedDayOfWeek,
            Self::Month => FilterField::SelectedMonths,
        }
    }
}

/// Exclusive traffic-feature filter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum Feature {
    /// Pedestrian crossing nearby.
    Crossing,
    /// Road junction nearby.
    Junction,
    /// Station nearby.
    Station,
    /// Stop sign nearby.
    Stop,
    /// Traffic signal nearby.
    TrafficSignal,
    /// Accident happened during daylight.
    DayTime,
    /// Accident happened at night.
    NightTime,
}

impl Feature {
    /// Value sent as the `feature` query parameter.
    #[must_use]
    pub const fn query_value(self) -> &'static str {
        match self {
            Self::Crossing => "crossing",
            Self::Junction => "junction",
            Self::Station => "station",
            Self::Stop => "stop",
            Self::TrafficSignal => "trafficSignal",
            Self::DayTime => "Day",
            Self::NightTime => "Night",
        }
    }
}

/// Which kind of view a filter belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ViewScope {
    /// The national aggregation map.
    National,
    /// The per-state county choropleth.
    State,
}

impl ViewScope {
    /// Visualization type a freshly mounted view of this scope starts with.
    #[must_use]
    pub const fn default_visualization(self) -> VisualizationType {
        match self {
            Self::National => VisualizationType::Hexagon,
            Self::State => VisualizationType::Accidents,
        }
    }
}

/// How a view renders its data.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum VisualizationType {
    /// Extruded hexagon bins (national).
    Hexagon,
    /// Severity-weighted heatmap (national).
    Heatmap,
    /// Density contour lines (national).
    Contour,
    /// Counties shaded by share of accidents (state).
    Accidents,
    /// Counties shaded by average severity (state).
    Severity,
}

impl VisualizationType {
    /// Returns the view scope this visualization type is valid for.
    #[must_use]
    pub const fn scope(self) -> ViewScope {
        match self {
            Self::Hexagon | Self::Heatmap | Self::Contour => ViewScope::National,
            Self::Accidents | Self::Severity => ViewScope::State,
        }
    }
}

/// A longitude/latitude pair (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LngLat {
    /// Longitude.
    pub lng: f64,
    /// Latitude.
    pub lat: f64,
}

impl LngLat {
    /// Creates a new point.
    #[must_use]
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

/// An axis-aligned area selection.
///
/// Only constructible through [`Bounds::from_corners`], so the minimum
/// coordinates never exceed the maximum ones.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    min_lng: f64,
    max_lng: f64,
    min_lat: f64,
    max_lat: f64,
}

impl Bounds {
    /// Normalizes two arbitrary corner points into a rectangle.
    #[must_use]
    pub fn from_corners(a: LngLat, b: LngLat) -> Self {
        Self {
            min_lng: a.lng.min(b.lng),
            max_lng: a.lng.max(b.lng),
            min_lat: a.lat.min(b.lat),
            max_lat: a.lat.max(b.lat),
        }
    }

    /// Western edge.
    #[must_use]
    pub const fn min_lng(&self) -> f64 {
        self.min_lng
    }

    /// Eastern edge.
    #[must_use]
    pub const fn max_lng(&self) -> f64 {
        self.max_lng
    }

    /// Southern edge.
    #[must_use]
    pub const fn min_lat(&self) -> f64 {
        self.min_lat
    }

    /// Northern edge.
    #[must_use]
    pub const fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Returns `true` if `point` lies inside or on the edge of the rectangle.
    #[must_use]
    pub fn contains(&self, point: LngLat) -> bool {
        (self.min_lng..=self.max_lng).contains(&point.lng)
            && (self.min_lat..=self.max_lat).contains(&point.lat)
    }
}

/// A validated two-letter state code, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StateCode(String);

impl StateCode {
    /// Parses a state code, accepting either case.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidState`] unless the trimmed input is
    /// exactly two ASCII letters.
    pub fn new(code: &str) -> Result<Self, FilterError> {
        let trimmed = code.trim();
        if trimmed.len() != 2 || !trimmed.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(FilterError::InvalidState {
                code: code.to_string(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for StateCode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// A single-field replacement passed to [`FilterModel::set_field`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate {
    /// Replace `selectedYears`.
    Years(BTreeSet<u16>),
    /// Replace `selectedMonths`.
    Months(BTreeSet<u8>),
    /// Replace `selectedDays` (calendar day of month).
    Days(BTreeSet<u8>),
    /// Replace `selectedDayOfWeek`. A non-empty set clears `selectedDays`.
    DayOfWeek(BTreeSet<u8>),
    /// Replace `selectedHours`.
    Hours(BTreeSet<u8>),
    /// Replace the visualization type (must match the view scope).
    Visualization(VisualizationType),
    /// Replace the state scope.
    State(Option<StateCode>),
}

/// Returns the year a freshly mounted view selects by default: the current
/// calendar year, clamped into the dataset's coverage.
#[must_use]
pub fn default_year() -> u16 {
    let year = chrono::Utc::now().year();
    u16::try_from(year).map_or(MAX_YEAR, |y| y.clamp(MIN_YEAR, MAX_YEAR))
}

/// The normalized set of constraints one view fetches data for.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterModel {
    selected_years: BTreeSet<u16>,
    selected_months: BTreeSet<u8>,
    selected_days: BTreeSet<u8>,
    selected_day_of_week: BTreeSet<u8>,
    selected_hours: BTreeSet<u8>,
    visualization_type: VisualizationType,
    active_feature: Option<Feature>,
    bounds: Option<Bounds>,
    state: Option<StateCode>,
}

impl FilterModel {
    /// Creates the mount-time default for a view: [`default_year`]
    /// selected and every other dimension unconstrained.
    #[must_use]
    pub fn for_scope(scope: ViewScope) -> Self {
        let mut model = Self::unconstrained(scope);
        model.selected_years.insert(default_year());
        model
    }

    /// Creates a filter with the given year selected.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::OutOfRange`] if `year` is outside
    /// [`MIN_YEAR`]..=[`MAX_YEAR`].
    pub fn with_year(scope: ViewScope, year: u16) -> Result<Self, FilterError> {
        FilterField::SelectedYears.check(year)?;
        let mut model = Self::unconstrained(scope);
        model.selected_years.insert(year);
        Ok(model)
    }

    /// Creates a filter with no constraints at all.
    #[must_use]
    pub const fn unconstrained(scope: ViewScope) -> Self {
        Self {
            selected_years: BTreeSet::new(),
            selected_months: BTreeSet::new(),
            selected_days: BTreeSet::new(),
            selected_day_of_week: BTreeSet::new(),
            selected_hours: BTreeSet::new(),
            visualization_type: scope.default_visualization(),
            active_feature: None,
            bounds: None,
            state: None,
        }
    }

    /// Selected years (empty = all).
    #[must_use]
    pub const fn selected_years(&self) -> &BTreeSet<u16> {
        &self.selected_years
    }

    /// Selected months (empty = all).
    #[must_use]
    pub const fn selected_months(&self) -> &BTreeSet<u8> {
        &self.selected_months
    }

    /// Selected calendar days of month (empty = all).
    #[must_use]
    pub const fn selected_days(&self) -> &BTreeSet<u8> {
        &self.selected_days
    }

    /// Selected days of week (empty = all).
    #[must_use]
    pub const fn selected_day_of_week(&self) -> &BTreeSet<u8> {
        &self.selected_day_of_week
    }

    /// Selected hours of day (empty = all).
    #[must_use]
    pub const fn selected_hours(&self) -> &BTreeSet<u8> {
        &self.selected_hours
    }

    /// The view's visualization type.
    #[must_use]
    pub const fn visualization_type(&self) -> VisualizationType {
        self.visualization_type
    }

    /// The scope this filter is valid for.
    #[must_use]
    pub const fn scope(&self) -> ViewScope {
        self.visualization_type.scope()
    }

    /// The active traffic feature, if any.
    #[must_use]
    pub const fn active_feature(&self) -> Option<Feature> {
        self.active_feature
    }

    /// The area selection, if any.
    #[must_use]
    pub const fn bounds(&self) -> Option<&Bounds> {
        self.bounds.as_ref()
    }

    /// The state scope, if any.
    #[must_use]
    pub const fn state(&self) -> Option<&StateCode> {
        self.state.as_ref()
    }

    /// Returns a copy with one field replaced.
    ///
    /// Setting a non-empty day-of-week set clears the calendar days. The
    /// reverse is not enforced here; the query encoder suppresses calendar
    /// days while a day-of-week selection is active instead.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError`] when a value is outside its field's domain
    /// or a visualization type belongs to the other view scope.
    pub fn set_field(&self, update: FieldUpdate) -> Result<Self, FilterError> {
        let mut next = self.clone();
        match update {
            FieldUpdate::Years(years) => {
                check_all(FilterField::SelectedYears, years.iter().copied())?;
                next.selected_years = years;
            }
            FieldUpdate::Months(months) => {
                check_all(FilterField::SelectedMonths, months.iter().copied().map(u16::from))?;
                next.selected_months = months;
            }
            FieldUpdate::Days(days) => {
                check_all(FilterField::SelectedDays, days.iter().copied().map(u16::from))?;
                next.selected_days = days;
            }
            FieldUpdate::DayOfWeek(days) => {
                check_all(
                    FilterField::SelectedDayOfWeek,
                    days.iter().copied().map(u16::from),
                )?;
                if !days.is_empty() {
                    next.selected_days.clear();
                }
                next.selected_day_of_week = days;
            }
            FieldUpdate::Hours(hours) => {
                check_all(FilterField::SelectedHours, hours.iter().copied().map(u16::from))?;
                next.selected_hours = hours;
            }
            FieldUpdate::Visualization(visualization) => {
                if visualization.scope() != self.scope() {
                    return Err(FilterError::VisualizationScope {
                        visualization,
                        expected: visualization.scope(),
                        actual: self.scope(),
                    });
                }
                next.visualization_type = visualization;
            }
            FieldUpdate::State(state) => next.state = state,
        }
        Ok(next)
    }

    /// Returns a copy with `feature` toggled: cleared if it is the active
    /// feature, otherwise made the (only) active feature.
    #[must_use]
    pub fn toggle_feature(&self, feature: Feature) -> Self {
        let mut next = self.clone();
        next.active_feature = if self.active_feature == Some(feature) {
            None
        } else {
            Some(feature)
        };
        next
    }

    /// Returns a copy with no active feature.
    #[must_use]
    pub fn clear_feature(&self) -> Self {
        let mut next = self.clone();
        next.active_feature = None;
        next
    }

    /// Returns a copy scoped to the rectangle spanned by two corner points.
    #[must_use]
    pub fn set_bounds(&self, corner1: LngLat, corner2: LngLat) -> Self {
        let mut next = self.clone();
        next.bounds = Some(Bounds::from_corners(corner1, corner2));
        next
    }

    /// Returns a copy without an area selection.
    #[must_use]
    pub fn clear_bounds(&self) -> Self {
        let mut next = self.clone();
        next.bounds = None;
        next
    }

    /// Returns a copy with hours, days, months and days of week emptied.
    /// Years, feature, bounds and state are kept.
    #[must_use]
    pub fn clear_time_filters(&self) -> Self {
        let mut next = self.clone();
        next.selected_hours.clear();
        next.selected_days.clear();
        next.selected_months.clear();
        next.selected_day_of_week.clear();
        next
    }
}

fn check_all(field: FilterField, values: impl IntoIterator<Item = u16>) -> Result<(), FilterError> {
    values.into_iter().try_for_each(|v| field.check(v))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set<T: Ord + Copy>(values: &[T]) -> BTreeSet<T> {
        values.iter().copied().collect()
    }

    #[test]
    fn day_of_week_clears_calendar_days() {
        let model = FilterModel::unconstrained(ViewScope::National)
            .set_field(FieldUpdate::Days(set(&[5, 6])))
            .unwrap();
        let next = model.set_field(FieldUpdate::DayOfWeek(set(&[1]))).unwrap();
        assert!(next.selected_days().is_empty());
        assert_eq!(next.selected_day_of_week(), &set(&[1]));
        // The source snapshot is untouched.
        assert_eq!(model.selected_days(), &set(&[5, 6]));
    }

    #[test]
    fn calendar_days_do_not_clear_day_of_week() {
        let model = FilterModel::unconstrained(ViewScope::National)
            .set_field(FieldUpdate::DayOfWeek(set(&[2, 3])))
            .unwrap()
            .set_field(FieldUpdate::Days(set(&[10])))
            .unwrap();
        assert_eq!(model.selected_day_of_week(), &set(&[2, 3]));
        assert_eq!(model.selected_days(), &set(&[10]));
    }

    #[test]
    fn empty_day_of_week_keeps_calendar_days() {
        let model = FilterModel::unconstrained(ViewScope::National)
            .set_field(FieldUpdate::Days(set(&[1])))
            .unwrap()
            .set_field(FieldUpdate::DayOfWeek(BTreeSet::new()))
            .unwrap();
        assert_eq!(model.selected_days(), &set(&[1]));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let model = FilterModel::unconstrained(ViewScope::National);
        let err = model
            .set_field(FieldUpdate::Years(set(&[2015, 2018])))
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::OutOfRange {
                field: FilterField::SelectedYears,
                value: 2015,
                min: 2016,
                max: 2023,
            }
        );
        assert!(model.set_field(FieldUpdate::Hours(set(&[24]))).is_err());
        assert!(model.set_field(FieldUpdate::Months(set(&[0]))).is_err());
        assert!(model.set_field(FieldUpdate::DayOfWeek(set(&[7]))).is_err());
        assert!(model.set_field(FieldUpdate::Days(set(&[32]))).is_err());
    }

    #[test]
    fn feature_toggle_is_exclusive() {
        let model = FilterModel::unconstrained(ViewScope::National);
        let crossing = model.toggle_feature(Feature::Crossing);
        assert_eq!(crossing.active_feature(), Some(Feature::Crossing));

        let junction = crossing.toggle_feature(Feature::Junction);
        assert_eq!(junction.active_feature(), Some(Feature::Junction));

        // Crossing is no longer active, so toggling it activates it again.
        let again = junction.toggle_feature(Feature::Crossing);
        assert_eq!(again.active_feature(), Some(Feature::Crossing));

        let cleared = again.toggle_feature(Feature::Crossing);
        assert_eq!(cleared.active_feature(), None);
    }

    #[test]
    fn bounds_are_normalized() {
        let model = FilterModel::unconstrained(ViewScope::National)
            .set_bounds(LngLat::new(-80.0, 40.0), LngLat::new(-90.0, 30.0));
        let bounds = model.bounds().unwrap();
        assert!((bounds.min_lng() - -90.0).abs() < f64::EPSILON);
        assert!((bounds.max_lng() - -80.0).abs() < f64::EPSILON);
        assert!((bounds.min_lat() - 30.0).abs() < f64::EPSILON);
        assert!((bounds.max_lat() - 40.0).abs() < f64::EPSILON);
        assert!(bounds.contains(LngLat::new(-85.0, 35.0)));
        assert!(bounds.contains(LngLat::new(-90.0, 40.0)));
        assert!(!bounds.contains(LngLat::new(-95.0, 35.0)));

        assert!(model.clear_bounds().bounds().is_none());
    }

    #[test]
    fn clear_time_filters_keeps_years_and_feature() {
        let model = FilterModel::with_year(ViewScope::National, 2019)
            .unwrap()
            .set_field(FieldUpdate::Months(set(&[3])))
            .unwrap()
            .set_field(FieldUpdate::Hours(set(&[8, 9])))
            .unwrap()
            .set_field(FieldUpdate::DayOfWeek(set(&[0])))
            .unwrap()
            .toggle_feature(Feature::Stop);
        let cleared = model.clear_time_filters();
        assert!(cleared.selected_months().is_empty());
        assert!(cleared.selected_hours().is_empty());
        assert!(cleared.selected_day_of_week().is_empty());
        assert!(cleared.selected_days().is_empty());
        assert_eq!(cleared.selected_years(), &set(&[2019]));
        assert_eq!(cleared.active_feature(), Some(Feature::Stop));
        assert!(cleared.clear_feature().active_feature().is_none());
    }

    #[test]
    fn visualization_is_scoped_per_view() {
        let national = FilterModel::unconstrained(ViewScope::National);
        assert_eq!(national.visualization_type(), VisualizationType::Hexagon);
        assert!(
            national
                .set_field(FieldUpdate::Visualization(VisualizationType::Heatmap))
                .is_ok()
        );
        assert!(matches!(
            national.set_field(FieldUpdate::Visualization(VisualizationType::Severity)),
            Err(FilterError::VisualizationScope { .. })
        ));

        let state = FilterModel::unconstrained(ViewScope::State);
        assert_eq!(state.visualization_type(), VisualizationType::Accidents);
    }

    #[test]
    fn default_year_is_within_coverage() {
        let model = FilterModel::for_scope(ViewScope::National);
        assert_eq!(model.selected_years().len(), 1);
        let year = *model.selected_years().iter().next().unwrap();
        assert!((MIN_YEAR..=MAX_YEAR).contains(&year));
        assert!(model.selected_months().is_empty());
    }

    #[test]
    fn state_codes_are_validated() {
        assert_eq!(StateCode::new(" ca ").unwrap().as_str(), "CA");
        assert!(StateCode::new("CAL").is_err());
        assert!(StateCode::new("C1").is_err());
    }

    #[test]
    fn feature_names() {
        assert_eq!(Feature::TrafficSignal.as_ref(), "trafficSignal");
        assert_eq!(Feature::DayTime.query_value(), "Day");
        assert_eq!(Feature::NightTime.query_value(), "Night");
        assert_eq!("trafficsignal".parse::<Feature>().unwrap(), Feature::TrafficSignal);
        assert_eq!(
            serde_json::to_value(Feature::NightTime).unwrap(),
            serde_json::json!("nightTime")
        );
    }

    #[test]
    fn time_dimension_fields() {
        assert_eq!(TimeDimension::Day.field(), FilterField::SelectedDayOfWeek);
        assert_eq!(TimeDimension::Hour.field().domain(), (0, 23));
        assert_eq!("MONTH".parse::<TimeDimension>().unwrap(), TimeDimension::Month);
        assert_eq!(TimeDimension::Hour.to_string(), "hour");
    }
}
