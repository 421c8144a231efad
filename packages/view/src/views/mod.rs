//! Data sources and composite views of the dashboard.

pub mod county_time;
pub mod national;
pub mod state;
pub mod street;
pub mod top;

pub use county_time::{CityAnalysisSource, CountyTimeChart, CountyTimeSource};
pub use national::NationalMapSource;
pub use state::StateMapSource;
pub use street::{StreetAnalysisSource, StreetDrillDown};
pub use top::{StatesSource, TopAccidentsSource, TopAccidentsView};
