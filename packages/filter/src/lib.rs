#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Query encoding and chart-brush reconciliation for accident map filters.
//!
//! [`query::encode`] turns a [`FilterModel`] into the repeated `key[]=value`
//! parameters the aggregation API expects, and [`brush::BrushReconciler`]
//! folds a drag selection over a time-series chart back into a new
//! [`FilterModel`] snapshot.

pub mod brush;
pub mod query;

pub use accident_map_filter_models::*;
