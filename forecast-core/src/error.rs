use thiserror::Error;

/// Failure of a single HTTP exchange with the weather service.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, timeout, TLS).
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered with status {status}: {body}")]
    ServerError { status: u16, body: String },

    /// A well-formed response that carried no usable entries.
    #[error("response contained no results")]
    EmptyResult,

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl From<serde_json::Error> for FetchError {
    fn from(err: serde_json::Error) -> Self {
        FetchError::Malformed(err.to_string())
    }
}

/// Terminal outcome of a failed search. `Display` is the text shown to the
/// user; the underlying cause stays reachable through `source()`.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Please enter a city name.")]
    EmptyInput,

    #[error("City not found. Please try again.")]
    LocationNotFound(#[source] FetchError),

    #[error("Error fetching weather data.")]
    ForecastUnavailable(#[source] FetchError),
}

impl SearchError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// The internal cause, if the failure came from the network layer.
    pub fn cause(&self) -> Option<&FetchError> {
        match self {
            SearchError::EmptyInput => None,
            SearchError::LocationNotFound(e) | SearchError::ForecastUnavailable(e) => Some(e),
        }
    }
}

#[derive(Debug, Error)]
pub enum IconError {
    #[error("failed to fetch icon: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to decode icon: {0}")]
    Decode(#[from] image::ImageError),
}
