use crate::{
    Config,
    error::FetchError,
    model::{Forecast, IconId, LocationKey, Query},
    provider::accuweather::AccuWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod accuweather;

/// The three remote calls a search is made of.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    /// Map a city name to the identifier of its first match.
    async fn resolve_location(&self, query: &Query) -> Result<LocationKey, FetchError>;

    /// Daily entries for the location, in chronological order.
    async fn fetch_forecast(&self, location: &LocationKey) -> Result<Forecast, FetchError>;

    /// Raw image bytes of one weather icon.
    async fn fetch_icon(&self, icon: IconId) -> Result<Vec<u8>, FetchError>;
}

/// Construct the provider described by `config`. Fails when no API key is set.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn ForecastProvider>> {
    let api_key = config.require_api_key()?;
    let provider = AccuWeatherProvider::new(
        api_key.to_owned(),
        config.endpoints.clone(),
        config.timeout(),
        config.metric,
    )?;
    Ok(Arc::new(provider))
}
