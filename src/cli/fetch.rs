use super::ui::{self, StyleType};
use crate::core::{Period, RateProvider, RateRequest, RateResponse, ServiceError};
use crate::store::ArtifactStore;
use anyhow::Result;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug)]
pub struct FetchOutcome {
    pub path: PathBuf,
    pub responses: Vec<RateResponse>,
}

/// Fetches the rate for one day of the request.
pub async fn fetch_one(
    provider: &(dyn RateProvider + Send + Sync),
    request: &RateRequest,
    date: NaiveDate,
) -> Result<RateResponse, ServiceError> {
    provider
        .fetch_rate(&request.from_currency, &request.to_currency, date)
        .await
}

/// Fetches every day of the request in ascending order, stopping at the first
/// failure.
pub async fn fetch_all(
    provider: &(dyn RateProvider + Send + Sync),
    request: &RateRequest,
) -> Result<Vec<RateResponse>, ServiceError> {
    let pb = match request.period {
        Period::Range { .. } => Some(ui::new_progress_bar(request.dates.len() as u64)),
        Period::Single(_) => None,
    };

    let mut responses = Vec::with_capacity(request.dates.len());
    for &date in &request.dates {
        if let Some(pb) = &pb {
            pb.set_message(date.to_string());
        }
        let result = fetch_one(provider, request, date).await;
        let response = match result {
            Ok(response) => response,
            Err(e) => {
                if let Some(pb) = &pb {
                    pb.abandon();
                }
                return Err(e);
            }
        };
        debug!(%date, "Fetched rate");
        responses.push(response);
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok(responses)
}

/// Fetches all days, writes the artifact and prints a summary.
pub async fn run(
    request: &RateRequest,
    provider: &(dyn RateProvider + Send + Sync),
    store: &ArtifactStore,
) -> Result<FetchOutcome> {
    info!(
        from = %request.from_currency,
        to = %request.to_currency,
        period = %request.period,
        "Fetching exchange rates..."
    );

    let responses = fetch_all(provider, request).await?;
    let path = store.persist(request, &responses)?;

    println!("{}", summary(request, &responses, &path));
    Ok(FetchOutcome { path, responses })
}

/// Text printed after a successful run; ranges get a per-day table.
fn summary(request: &RateRequest, responses: &[RateResponse], path: &Path) -> String {
    let pair = format!("{} -> {}", request.from_currency, request.to_currency);
    let location = ui::style_text(&path.display().to_string(), StyleType::Subtle);

    match request.period {
        Period::Single(date) => {
            let rate = responses
                .first()
                .and_then(|r| r.rate())
                .map(|rate| format!(" (rate: {})", ui::format_rate(rate)))
                .unwrap_or_default();
            format!("Saved exchange rate {pair} for {date}{rate} to {location}")
        }
        Period::Range { .. } => format!(
            "{}\nSaved exchange rates {pair} for {} to {location}",
            ui::rates_table(&request.dates, responses),
            request.period
        ),
    }
}
