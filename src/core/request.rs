//! Rate request types and input validation

use super::error::ValidationError;
use chrono::{Days, NaiveDate};
use std::fmt::Display;
use std::time::Duration;
use tracing::debug;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Unvalidated inputs, after configuration sources have been resolved.
#[derive(Debug, Clone, Default)]
pub struct RawArgs {
    pub from_currency: String,
    pub to_currency: String,
    pub date: Option<String>,
    pub range: Option<(String, String)>,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Single(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl Period {
    pub fn start(&self) -> NaiveDate {
        match self {
            Period::Single(date) => *date,
            Period::Range { start, .. } => *start,
        }
    }

    pub fn end(&self) -> NaiveDate {
        match self {
            Period::Single(date) => *date,
            Period::Range { end, .. } => *end,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Single(date) => write!(f, "{date}"),
            Period::Range { start, end } => write!(f, "{start} to {end}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RateRequest {
    pub from_currency: String,
    pub to_currency: String,
    pub period: Period,
    /// One entry per calendar day of `period`, ascending.
    pub dates: Vec<NaiveDate>,
    pub api_key: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Checks raw inputs and turns them into a request with its dates expanded.
pub fn validate(args: &RawArgs) -> Result<RateRequest, ValidationError> {
    let from_currency = normalize_currency(&args.from_currency)?;
    let to_currency = normalize_currency(&args.to_currency)?;

    let single = args.date.as_deref().map(parse_date).transpose()?;

    let range = match &args.range {
        Some((start_raw, end_raw)) => {
            let (start, end) = match (parse_date(start_raw), parse_date(end_raw)) {
                (Ok(start), Ok(end)) => (start, end),
                _ => {
                    return Err(ValidationError::InvalidRangeFormat {
                        start: start_raw.clone(),
                        end: end_raw.clone(),
                        format: DATE_FORMAT,
                    });
                }
            };
            if end < start {
                return Err(ValidationError::RangeOutOfOrder { start, end });
            }
            Some((start, end))
        }
        None => None,
    };

    let period = match (single, range) {
        (Some(date), None) => Period::Single(date),
        (None, Some((start, end))) => Period::Range { start, end },
        _ => return Err(ValidationError::AmbiguousPeriod),
    };

    let api_key = args
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or(ValidationError::MissingApiKey)?
        .to_string();

    let base_url = args.base_url.trim();
    if base_url.is_empty() {
        return Err(ValidationError::EmptyBaseUrl);
    }

    if !args.timeout_secs.is_finite() || args.timeout_secs <= 0.0 {
        return Err(ValidationError::InvalidTimeout(args.timeout_secs));
    }
    let timeout = Duration::try_from_secs_f64(args.timeout_secs)
        .map_err(|_| ValidationError::InvalidTimeout(args.timeout_secs))?;

    let dates = date_range(period.start(), period.end());
    debug!(%from_currency, %to_currency, %period, days = dates.len(), "Validated request");

    Ok(RateRequest {
        from_currency,
        to_currency,
        period,
        dates,
        api_key,
        base_url: base_url.to_string(),
        timeout,
    })
}

/// Every calendar day from `start` to `end`, both inclusive.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

fn parse_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        ValidationError::InvalidDate {
            value: value.to_string(),
            format: DATE_FORMAT,
        }
    })
}

fn normalize_currency(code: &str) -> Result<String, ValidationError> {
    let code = code.trim().to_uppercase();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(ValidationError::InvalidCurrency(code))
    }
}
