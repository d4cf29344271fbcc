use crate::core::{RateProvider, RateRequest, RateResponse, ServiceError};
use anyhow::Context;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::request::DATE_FORMAT;

/// Client for the exchange rate service: one form POST per date.
pub struct ExchangeServiceProvider {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl ExchangeServiceProvider {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("fxrate/1.0")
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            endpoint: format!("{}/", base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn from_request(request: &RateRequest) -> anyhow::Result<Self> {
        Self::new(&request.base_url, &request.api_key, request.timeout)
    }
}

#[async_trait]
impl RateProvider for ExchangeServiceProvider {
    #[instrument(
        name = "ExchangeRateFetch",
        skip(self),
        fields(from = %from, to = %to, date = %date)
    )]
    async fn fetch_rate(
        &self,
        from: &str,
        to: &str,
        date: NaiveDate,
    ) -> Result<RateResponse, ServiceError> {
        let day = date.format(DATE_FORMAT).to_string();
        debug!("Requesting rate from {}", self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("from", from), ("to", to), ("date", day.as_str())])
            .form(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| ServiceError::Transport { date, source })?;

        let status = response.status();
        debug!(%status, "Received rate service response");
        if !status.is_success() {
            return Err(ServiceError::Status { date, status });
        }

        let body = response
            .text()
            .await
            .map_err(|source| ServiceError::Transport { date, source })?;

        let value: serde_json::Value = serde_json::from_str(&body).map_err(|source| {
            debug!(response = %body, "Failed to parse rate response");
            ServiceError::InvalidJson { date, source }
        })?;

        RateResponse::from_body(value, date)
    }
}
