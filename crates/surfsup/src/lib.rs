pub mod climate;
pub mod db;
pub mod file_access;
pub mod routes;
mod startup;
pub mod templates;
mod utils;

pub use climate::{
    Climate, ErrorResponse, PrecipitationReading, StationListing, TemperatureStats,
    TemperatureSummary, TobsReading,
};
pub use db::{CsvAccess, Dataset, Measurement, SqliteAccess, Station};
pub use file_access::{Backend, DatasetFiles};
pub use routes::*;
pub use startup::*;
pub use utils::*;
