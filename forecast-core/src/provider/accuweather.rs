use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::Endpoints,
    error::FetchError,
    model::{Forecast, ForecastDay, IconId, LocationKey, Query},
};

use super::ForecastProvider;

#[derive(Debug, Clone)]
pub struct AccuWeatherProvider {
    api_key: String,
    endpoints: Endpoints,
    metric: bool,
    http: Client,
}

impl AccuWeatherProvider {
    pub fn new(
        api_key: String,
        endpoints: Endpoints,
        timeout: Duration,
        metric: bool,
    ) -> Result<Self, FetchError> {
        for url in [&endpoints.search, &endpoints.forecast, &endpoints.icons] {
            parse_url(url)?;
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { api_key, endpoints, metric, http })
    }

    fn forecast_url(&self, location: &LocationKey) -> Result<Url, FetchError> {
        join_segment(&self.endpoints.forecast, location.as_str())
    }

    fn icon_url(&self, icon: IconId) -> Result<Url, FetchError> {
        icon_url(&self.endpoints.icons, icon)
    }

    /// Send a GET and return the body of a successful response.
    async fn get_text(&self, url: Url, query: &[(&str, &str)]) -> Result<String, FetchError> {
        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::ServerError {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }
}

/// URL of the small icon variant, e.g. `{base}/07-s.png`.
pub fn icon_url(base: &str, icon: IconId) -> Result<Url, FetchError> {
    join_segment(base, &icon.file_name())
}

fn parse_url(raw: &str) -> Result<Url, FetchError> {
    Url::parse(raw).map_err(|e| FetchError::InvalidUrl { url: raw.to_string(), reason: e.to_string() })
}

fn join_segment(base: &str, segment: &str) -> Result<Url, FetchError> {
    let mut url = parse_url(base)?;
    url.path_segments_mut()
        .map_err(|_| FetchError::InvalidUrl {
            url: base.to_string(),
            reason: "URL cannot be a base".to_string(),
        })?
        .pop_if_empty()
        .push(segment);
    Ok(url)
}

#[derive(Debug, Deserialize)]
struct AwLocation {
    #[serde(rename = "Key")]
    key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwValue {
    value: f64,
    unit: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwTemperature {
    minimum: AwValue,
    maximum: AwValue,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwHalfDay {
    icon: u8,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwDailyForecast {
    date: String,
    temperature: AwTemperature,
    day: AwHalfDay,
    night: AwHalfDay,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AwForecastResponse {
    daily_forecasts: Vec<AwDailyForecast>,
}

impl AwDailyForecast {
    fn into_day(self) -> Result<ForecastDay, FetchError> {
        // Only the calendar part of the ISO timestamp is used.
        let date_part = self.date.split('T').next().unwrap_or_default();
        let date = NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
            .map_err(|e| FetchError::Malformed(format!("invalid forecast date '{}': {e}", self.date)))?;

        let unit = self
            .temperature
            .minimum
            .unit
            .or(self.temperature.maximum.unit)
            .unwrap_or_else(|| "F".to_string());

        Ok(ForecastDay {
            date,
            min_temperature: self.temperature.minimum.value,
            max_temperature: self.temperature.maximum.value,
            unit,
            day_icon: IconId(self.day.icon),
            night_icon: IconId(self.night.icon),
        })
    }
}

fn parse_location(body: &str) -> Result<LocationKey, FetchError> {
    let matches: Vec<AwLocation> = serde_json::from_str(body)?;
    matches
        .into_iter()
        .next()
        .map(|m| LocationKey(m.key))
        .ok_or(FetchError::EmptyResult)
}

fn parse_forecast(body: &str) -> Result<Forecast, FetchError> {
    let parsed: AwForecastResponse = serde_json::from_str(body)?;
    if parsed.daily_forecasts.is_empty() {
        return Err(FetchError::EmptyResult);
    }

    let days = parsed
        .daily_forecasts
        .into_iter()
        .map(AwDailyForecast::into_day)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Forecast { days })
}

#[async_trait]
impl ForecastProvider for AccuWeatherProvider {
    #[instrument(skip_all, fields(city = %query))]
    async fn resolve_location(&self, query: &Query) -> Result<LocationKey, FetchError> {
        let url = parse_url(&self.endpoints.search)?;
        let body = self
            .get_text(
                url,
                &[("apikey", self.api_key.as_str()), ("q", query.as_str()), ("details", "true")],
            )
            .await?;

        let key = parse_location(&body)?;
        debug!(location = %key, "resolved city");
        Ok(key)
    }

    #[instrument(skip_all, fields(location = %location))]
    async fn fetch_forecast(&self, location: &LocationKey) -> Result<Forecast, FetchError> {
        let url = self.forecast_url(location)?;

        let mut query = vec![("apikey", self.api_key.as_str())];
        if self.metric {
            query.push(("metric", "true"));
        }

        let body = self.get_text(url, &query).await?;
        let forecast = parse_forecast(&body)?;
        debug!(days = forecast.len(), "fetched forecast");
        Ok(forecast)
    }

    #[instrument(skip_all, fields(icon = %icon))]
    async fn fetch_icon(&self, icon: IconId) -> Result<Vec<u8>, FetchError> {
        let url = self.icon_url(icon)?;
        let res = self.http.get(url).send().await?;

        let status = res.status();
        if !status.is_success() {
            return Err(FetchError::ServerError {
                status: status.as_u16(),
                body: String::new(),
            });
        }

        Ok(res.bytes().await?.to_vec())
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
