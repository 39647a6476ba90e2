//! Test doubles shared by the unit tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use image::{Rgba, RgbaImage};
use std::{
    io::Cursor,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    error::FetchError,
    model::{Forecast, ForecastDay, IconId, LocationKey, Query},
    provider::ForecastProvider,
};

pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([255, 200, 0, 255]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Five days, 2024-01-01 to 2024-01-05, 40/55 °F, icons 1 and 33.
pub(crate) fn sample_days() -> Vec<ForecastDay> {
    (1..=5)
        .map(|d| ForecastDay {
            date: NaiveDate::from_ymd_opt(2024, 1, d).unwrap(),
            min_temperature: 40.0,
            max_temperature: 55.0,
            unit: "F".to_string(),
            day_icon: IconId(1),
            night_icon: IconId(33),
        })
        .collect()
}

/// Scripted provider that counts every call it receives.
#[derive(Debug)]
pub(crate) struct FakeProvider {
    /// `None` answers the search with an empty match list.
    pub location: Option<&'static str>,
    /// `Err(status)` answers the forecast with that server status.
    pub forecast: Result<Vec<ForecastDay>, u16>,
    /// `None` answers icon requests with 404.
    pub icon: Option<Vec<u8>>,
    pub calls: AtomicUsize,
    pub searches: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn seattle() -> Self {
        Self {
            location: Some("SEA1"),
            forecast: Ok(sample_days()),
            icon: Some(png_bytes(2, 2)),
            calls: AtomicUsize::new(0),
            searches: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn searched_for(&self) -> Vec<String> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl ForecastProvider for FakeProvider {
    async fn resolve_location(&self, query: &Query) -> Result<LocationKey, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.searches.lock().unwrap().push(query.as_str().to_string());
        self.location.map(|k| LocationKey(k.to_string())).ok_or(FetchError::EmptyResult)
    }

    async fn fetch_forecast(&self, location: &LocationKey) -> Result<Forecast, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(Some(location.as_str()), self.location);
        match &self.forecast {
            Ok(days) => Ok(Forecast { days: days.clone() }),
            Err(status) => Err(FetchError::ServerError { status: *status, body: String::new() }),
        }
    }

    async fn fetch_icon(&self, _icon: IconId) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.icon.clone().ok_or(FetchError::ServerError { status: 404, body: String::new() })
    }
}
