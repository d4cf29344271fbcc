//! Error kinds surfaced by request validation and the rate service

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid currency code '{0}'. Expected three letters, e.g. USD.")]
    InvalidCurrency(String),

    #[error("Invalid date '{value}'. Expected format {format}.")]
    InvalidDate { value: String, format: &'static str },

    #[error("Invalid range '{start} {end}'. Expected format {format}.")]
    InvalidRangeFormat {
        start: String,
        end: String,
        format: &'static str,
    },

    #[error("Range START date {start} must be earlier than or equal to END date {end}.")]
    RangeOutOfOrder { start: NaiveDate, end: NaiveDate },

    #[error("Provide either DATE argument or --range, but not both.")]
    AmbiguousPeriod,

    #[error(
        "API key is required. Provide via --api-key, EXCHANGE_API_KEY or API_KEY env variable."
    )]
    MissingApiKey,

    #[error("Base URL must not be empty.")]
    EmptyBaseUrl,

    #[error("Timeout must be a positive number of seconds, got {0}.")]
    InvalidTimeout(f64),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("HTTP request failed for {date}")]
    Transport {
        date: NaiveDate,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed for {date}: status {status}")]
    Status {
        date: NaiveDate,
        status: reqwest::StatusCode,
    },

    #[error("Service returned invalid JSON response for {date}.")]
    InvalidJson {
        date: NaiveDate,
        #[source]
        source: serde_json::Error,
    },

    #[error("Service returned an error for {date}: {message}")]
    Remote { date: NaiveDate, message: String },

    #[error("Service response missing 'data' field for {date}.")]
    MissingData { date: NaiveDate },
}

impl ServiceError {
    pub fn date(&self) -> NaiveDate {
        match self {
            ServiceError::Transport { date, .. }
            | ServiceError::Status { date, .. }
            | ServiceError::InvalidJson { date, .. }
            | ServiceError::Remote { date, .. }
            | ServiceError::MissingData { date } => *date,
        }
    }
}
