//! Filter flags shared by every subcommand.

use accident_map_filter::{
    Feature, FieldUpdate, FilterError, FilterModel, LngLat, StateCode, ViewScope,
    VisualizationType,
};
use clap::Args;

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Years to include (2016-2023, comma-separated). Defaults to the
    /// latest year with data.
    #[arg(long = "year", value_delimiter = ',')]
    pub years: Vec<u16>,
    /// Include every year instead of the default year
    #[arg(long, conflicts_with = "years")]
    pub all_years: bool,
    /// Months to include (1-12)
    #[arg(long = "month", value_delimiter = ',')]
    pub months: Vec<u8>,
    /// Calendar days of month to include (1-31)
    #[arg(long = "day", value_delimiter = ',')]
    pub days: Vec<u8>,
    /// Hours of day to include (0-23)
    #[arg(long = "hour", value_delimiter = ',')]
    pub hours: Vec<u8>,
    /// Days of week to include (0 = Sunday). Overrides `--day`.
    #[arg(long = "day-of-week", value_delimiter = ',')]
    pub day_of_week: Vec<u8>,
    /// Traffic feature (crossing, junction, station, stop, trafficSignal,
    /// dayTime, nightTime)
    #[arg(long)]
    pub feature: Option<Feature>,
    /// Area selection as two corners: `LNG1,LAT1,LNG2,LAT2`
    #[arg(long, value_delimiter = ',', num_args = 4, allow_hyphen_values = true)]
    pub bounds: Option<Vec<f64>>,
    /// Two-letter state code
    #[arg(long)]
    pub state: Option<String>,
    /// Visualization type (hexagon, heatmap, contour nationally; accidents,
    /// severity for a state)
    #[arg(long)]
    pub visualization: Option<VisualizationType>,
}

impl FilterArgs {
    /// Builds the filter snapshot for a view of `scope`.
    pub fn to_filter(&self, scope: ViewScope) -> Result<FilterModel, FilterError> {
        let mut model = if self.all_years {
            FilterModel::unconstrained(scope)
        } else {
            FilterModel::for_scope(scope)
        };

        if !self.years.is_empty() {
            model = model.set_field(FieldUpdate::Years(self.years.iter().copied().collect()))?;
        }
        model = model
            .set_field(FieldUpdate::Months(self.months.iter().copied().collect()))?
            .set_field(FieldUpdate::Days(self.days.iter().copied().collect()))?
            .set_field(FieldUpdate::Hours(self.hours.iter().copied().collect()))?
            .set_field(FieldUpdate::DayOfWeek(
                self.day_of_week.iter().copied().collect(),
            ))?;

        if let Some(feature) = self.feature {
            model = model.toggle_feature(feature);
        }
        if let Some(&[lng1, lat1, lng2, lat2]) = self.bounds.as_deref() {
            model = model.set_bounds(LngLat::new(lng1, lat1), LngLat::new(lng2, lat2));
        }
        if let Some(state) = &self.state {
            model = model.set_field(FieldUpdate::State(Some(StateCode::new(state)?)))?;
        }
        if let Some(visualization) = self.visualization {
            model = model.set_field(FieldUpdate::Visualization(visualization))?;
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use accident_map_filter::query;
    use clap::Parser;

    use super::*;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        filter: FilterArgs,
    }

    fn parse(args: &[&str]) -> FilterArgs {
        Harness::try_parse_from(std::iter::once("test").chain(args.iter().copied()))
            .unwrap()
            .filter
    }

    #[test]
    fn comma_separated_lists_are_sorted() {
        let filter = parse(&["--year", "2019,2017", "--hour", "18,7"])
            .to_filter(ViewScope::National)
            .unwrap();
        assert_eq!(
            query::encode(&filter).to_string(),
            "years[]=2017&years[]=2019&hours[]=7&hours[]=18"
        );
    }

    #[test]
    fn all_years_leaves_years_unconstrained() {
        let filter = parse(&["--all-years"]).to_filter(ViewScope::National).unwrap();
        assert!(filter.selected_years().is_empty());
    }

    #[test]
    fn default_year_is_selected() {
        let filter = parse(&[]).to_filter(ViewScope::National).unwrap();
        assert_eq!(filter.selected_years().len(), 1);
    }

    #[test]
    fn negative_bounds_parse() {
        let filter = parse(&["--all-years", "--bounds", "-80.5,40,-90,30.25"])
            .to_filter(ViewScope::National)
            .unwrap();
        assert_eq!(
            query::encode(&filter).to_string(),
            "minLng=-90&maxLng=-80.5&minLat=30.25&maxLat=40"
        );
    }

    #[test]
    fn feature_names_parse_case_insensitively() {
        let filter = parse(&["--all-years", "--feature", "TrafficSignal"])
            .to_filter(ViewScope::National)
            .unwrap();
        assert_eq!(filter.active_feature(), Some(Feature::TrafficSignal));
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        let err = parse(&["--month", "13"])
            .to_filter(ViewScope::National)
            .unwrap_err();
        assert!(matches!(err, FilterError::OutOfRange { .. }));
    }

    #[test]
    fn state_visualization_in_national_scope_is_rejected() {
        let err = parse(&["--visualization", "severity"])
            .to_filter(ViewScope::National)
            .unwrap_err();
        assert!(matches!(err, FilterError::VisualizationScope { .. }));
    }
}
