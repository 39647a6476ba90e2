use chrono::NaiveDate;
use std::fmt;

use crate::error::SearchError;

/// A trimmed, non-empty city name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SearchError::EmptyInput);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque location identifier handed out by the city search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationKey(pub String);

impl LocationKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Weather icon number as used by the icon endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IconId(pub u8);

impl IconId {
    /// File stem of the small icon variant, e.g. `07-s.png`.
    pub fn file_name(&self) -> String {
        format!("{:02}-s.png", self.0)
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub min_temperature: f64,
    pub max_temperature: f64,
    /// Unit letter reported by the service, `F` or `C`.
    pub unit: String,
    pub day_icon: IconId,
    pub night_icon: IconId,
}

impl ForecastDay {
    pub fn date_label(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn temperature_label(&self) -> String {
        format!(
            "{}°{unit} - {}°{unit}",
            self.min_temperature,
            self.max_temperature,
            unit = self.unit
        )
    }
}

/// Chronological daily entries, in the order the service returned them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Forecast {
    pub days: Vec<ForecastDay>,
}

impl Forecast {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}
