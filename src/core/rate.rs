//! Rate service abstractions and response type

use super::error::ServiceError;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

/// Body returned by the rate service, kept exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RateResponse(Value);

impl RateResponse {
    /// Accepts a decoded body only if it carries `data` and no `error`.
    pub fn from_body(body: Value, date: NaiveDate) -> Result<Self, ServiceError> {
        if let Some(error) = body.get("error").filter(|e| is_truthy(e)) {
            let message = match error {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            return Err(ServiceError::Remote { date, message });
        }

        if body.get("data").is_none() {
            return Err(ServiceError::MissingData { date });
        }

        Ok(Self(body))
    }

    /// The `data.rate` value, if the service sent one.
    pub fn rate(&self) -> Option<&Value> {
        self.0.get("data").and_then(|data| data.get("rate"))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(
        &self,
        from: &str,
        to: &str,
        date: NaiveDate,
    ) -> Result<RateResponse, ServiceError>;
}
