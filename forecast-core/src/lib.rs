//! Core library for the `forecast` desktop app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The provider seam and its AccuWeather implementation (city lookup,
//!   5-day forecast, icons)
//! - The search pipeline and the presenter state the UI renders from
//!
//! It is used by `forecast-gui`, but has no UI dependency of its own.

pub mod config;
pub mod error;
pub mod icon;
pub mod model;
pub mod presenter;
pub mod provider;
pub mod search;

#[cfg(test)]
mod testing;

pub use config::{Config, Endpoints};
pub use error::{FetchError, IconError, SearchError};
pub use icon::IconImage;
pub use model::{Forecast, ForecastDay, IconId, LocationKey, Query};
pub use presenter::{DayCard, FailureKind, Presenter, SearchPhase, SearchTicket, Submission, View};
pub use provider::{ForecastProvider, provider_from_config};
pub use search::{run_search, submit_search};
