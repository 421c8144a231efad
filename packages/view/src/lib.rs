#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! View controllers for the accident dashboard.
//!
//! Each view owns its own filter snapshot and a [`ViewController`] that
//! turns snapshot changes into fetches. Only the response to the latest
//! snapshot is ever shown: superseded fetches are aborted and any outcome
//! that still arrives is discarded by generation.

pub mod controller;
pub mod views;

pub use controller::{DataSource, FetchOutcome, ViewController, ViewStatus};
