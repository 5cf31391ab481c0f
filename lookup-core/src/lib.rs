//! Core library for the `weather-lookup` client.
//!
//! This crate defines:
//! - The weather record model and its loosely-typed payload
//! - The `RecordSource` abstraction and its HTTP implementation
//! - The lookup state machine and plain-text rendering
//! - Configuration handling
//!
//! It is used by `lookup-cli`, but can also be driven by other front-ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod source;

pub use config::Config;
pub use controller::{LookupController, LookupState};
pub use error::LookupError;
pub use model::{CreatedRecord, CurrentConditions, NewWeatherRecord, WeatherDetails, WeatherRecord};
pub use source::{HttpRecordSource, RecordSource};
