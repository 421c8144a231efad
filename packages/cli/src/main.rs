#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the accident map views.

mod args;

use std::path::PathBuf;

use accident_map_api::{ApiClient, ApiConfig};
use accident_map_api_models::RankingLevel;
use accident_map_filter::{StateCode, TimeDimension, ViewScope, query};
use accident_map_view::{
    DataSource, ViewController, ViewStatus,
    views::{
        CityAnalysisSource, CountyTimeChart, CountyTimeSource, NationalMapSource, StateMapSource,
        StatesSource, StreetAnalysisSource, TopAccidentsSource, TopAccidentsView,
        county_time::axis_label,
        state::{StateMapQuery, county_shade, shade_bucket, shade_color},
    },
};
use clap::{Parser, Subcommand};

use crate::args::FilterArgs;

#[derive(Parser)]
#[command(name = "accident_map_cli", about = "US accident map filter controller")]
struct Cli {
    /// TOML file overriding the built-in API settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Base URL of the aggregation API (overrides config and environment)
    #[arg(long, global = true)]
    api_url: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the query string a filter encodes to, without contacting the API
    Query {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Fetch map data and print its summary
    Map {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Fetch one state's county choropleth
    State {
        /// Two-letter state code (e.g., "OH")
        code: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Fetch a county time series, optionally brushing a range of it
    Timeline {
        /// County name (the county's state is given with `--state`)
        #[arg(long)]
        county: String,
        /// Axis to break the series down by (hour, day, month)
        #[arg(long, default_value = "month")]
        dimension: TimeDimension,
        /// Brush the points between two axis indices and rank the cities
        /// inside that range
        #[arg(long, num_args = 2, value_names = ["START", "END"])]
        brush: Option<Vec<usize>>,
        /// Also rank the streets of this city inside the brushed range
        #[arg(long, requires = "brush")]
        city: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print the top-accidents ranking at the level implied by
    /// `--state` / `--county`
    Top {
        /// County to rank cities of (requires `--state`)
        #[arg(long, requires = "state")]
        county: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// List the states that have data
    States,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    if let Commands::Query { filter } = &cli.command {
        let model = filter.to_filter(scope_of(filter))?;
        println!("{}", query::encode(&model));
        return Ok(());
    }

    let mut config = ApiConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.api_url {
        config = config.with_base_url(url);
    }
    log::info!("Using accident API at {}", config.base_url);
    let client = ApiClient::new(&config)?;

    match cli.command {
        // Printed above without a client.
        Commands::Query { .. } => {}
        Commands::Map { filter } => {
            let model = filter.to_filter(scope_of(&filter))?;
            let mut view = ViewController::new(NationalMapSource::new(client));
            view.replace(model);
            view.settle().await;
            if let Some(data) = shown(&view)? {
                let summary = &data.summary;
                println!("Accidents:       {}", summary.total_accidents);
                println!("Avg severity:    {:.2}", summary.avg_severity);
                if let Some(states) = summary.states_affected {
                    println!("States affected: {states}");
                }
                if let Some(weather) = &summary.common_weather {
                    println!("Common weather:  {weather}");
                }
                println!("Points:          {}", data.points.len());
            }
        }
        Commands::State { code, filter } => {
            let state = StateCode::new(&code)?;
            let model = filter.to_filter(ViewScope::State)?;
            let visualization = model.visualization_type();
            let mut view = ViewController::new(StateMapSource::new(client));
            view.replace(StateMapQuery {
                state: state.clone(),
                filter: model,
            });
            view.settle().await;
            if let Some(data) = shown(&view)? {
                println!(
                    "{state}: {} accidents in {} counties (avg severity {:.2})",
                    data.summary.total_accidents,
                    data.summary.counties_affected,
                    data.summary.avg_severity
                );
                println!(
                    "{:<28} {:>10} {:>8} {:>6} {:>8}",
                    "COUNTY", "ACCIDENTS", "SHARE", "CLASS", "COLOR"
                );
                println!("{}", "-".repeat(65));
                let mut counties = data.counties()?;
                counties.sort_by(|a, b| b.accident_count.cmp(&a.accident_count));
                for county in &counties {
                    let shade = county_shade(county, visualization);
                    println!(
                        "{:<28} {:>10} {:>7.2}% {:>6} {:>8}",
                        county.name,
                        county.accident_count,
                        county.percentage_of_total,
                        shade_bucket(shade),
                        shade_color(shade)
                    );
                }
            }
        }
        Commands::Timeline {
            county,
            dimension,
            brush,
            city,
            filter,
        } => {
            let model = filter.to_filter(ViewScope::State)?;
            let Some(state) = model.state().cloned() else {
                return Err("timeline requires --state".into());
            };
            let mut chart = CountyTimeChart::open(
                CountyTimeSource::new(client.clone()),
                CityAnalysisSource::new(client.clone()),
                &county,
                state,
                model,
            );
            chart.set_dimension(dimension);
            chart.settle().await;

            if let Some(series) = shown(chart.series())? {
                for (index, (value, count)) in series.points().enumerate() {
                    println!("{index:>3}  {:<10} {count}", axis_label(dimension, value));
                }
            }

            if let Some(&[start, end]) = brush.as_deref() {
                chart.begin_drag(start);
                if !chart.end_drag(end) {
                    println!("Brush {start}..{end} selects fewer than two points; ignored");
                    return Ok(());
                }
                chart.apply_selection()?;
                chart.settle().await;
                if let Some(range) = chart.applied_range() {
                    println!(
                        "\nCities between {} and {}:",
                        axis_label(range.dimension, range.start),
                        axis_label(range.dimension, range.end)
                    );
                }
                if let Some(cities) = chart.detail().map(shown).transpose()?.flatten() {
                    print_ranking(
                        cities
                            .iter()
                            .map(|c| (c.name.as_str(), c.accidents, Some(c.avg_severity))),
                    );
                }
                if let Some(city) = &city
                    && let Some(mut streets) =
                        chart.street_drill_down(StreetAnalysisSource::new(client))
                {
                    streets.toggle_city(city);
                    streets.settle().await;
                    println!("\nStreets of {city}:");
                    if let Some(rows) = streets.streets().map(shown).transpose()?.flatten() {
                        print_ranking(
                            rows.iter()
                                .map(|s| (s.name.as_str(), s.accidents, Some(s.avg_severity))),
                        );
                    }
                    streets.close();
                }
            }
            chart.close();
        }
        Commands::Top { county, filter } => {
            let model = filter.to_filter(ViewScope::National)?;
            let state = model.state().cloned();
            let mut view = TopAccidentsView::open(TopAccidentsSource::new(client), model);
            if let Some(state) = &state {
                view.select(state.as_str())?;
            }
            if let Some(county) = &county {
                view.select(county)?;
            }
            view.settle().await;
            let heading = match view.level() {
                RankingLevel::State => "states",
                RankingLevel::County => "counties",
                RankingLevel::City => "cities",
            };
            println!("Top {heading}");
            if let Some(ranking) = shown(view.ranking())? {
                print_ranking(
                    ranking
                        .iter()
                        .map(|r| (r.name.as_str(), r.accidents, r.avg_severity)),
                );
            }
        }
        Commands::States => {
            let mut view = ViewController::new(StatesSource::new(client));
            view.replace(());
            view.settle().await;
            if let Some(states) = shown(&view)? {
                println!("{}", states.join(" "));
            }
        }
    }

    Ok(())
}

/// Scope a filter from the command line is validated against.
fn scope_of(filter: &FilterArgs) -> ViewScope {
    if filter.state.is_some() {
        ViewScope::State
    } else {
        ViewScope::National
    }
}

/// Returns the view's data if there is something to print, or the view's
/// error.
fn shown<S: DataSource>(view: &ViewController<S>) -> Result<Option<&S::Data>, String> {
    match view.status() {
        ViewStatus::Failed { message } => Err(message.clone()),
        ViewStatus::Empty => {
            println!("No data for this selection");
            Ok(None)
        }
        ViewStatus::Ready => Ok(view.data()),
        ViewStatus::Idle | ViewStatus::Loading => Ok(None),
    }
}

fn print_ranking<'a>(rows: impl Iterator<Item = (&'a str, u64, Option<f64>)>) {
    println!("{:<32} {:>10} {:>8}", "NAME", "ACCIDENTS", "SEVERITY");
    println!("{}", "-".repeat(52));
    for (name, accidents, severity) in rows {
        let severity = severity.map_or_else(|| "-".to_string(), |s| format!("{s:.2}"));
        println!("{name:<32} {accidents:>10} {severity:>8}");
    }
}
