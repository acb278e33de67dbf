//! Price providers for the tick collector.

use chrono::DateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::PriceTick;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed quote for '{pair}': {reason}")]
    Malformed { pair: String, reason: String },
}

/// A source of latest-price observations, one pair at a time.
///
/// Its only contract with the core is "eventually produces a tick"; the
/// simulation side never calls it.
pub trait PriceProvider {
    fn fetch_latest(&self, pair: &str) -> Result<PriceTick, ProviderError>;
}

/// Wire shape of a latest-quote payload.
#[derive(Debug, Deserialize)]
struct QuotePayload {
    #[serde(rename = "unixTime")]
    unix_time: i64,
    /// Close price of the latest candle.
    c: f64,
}

/// REST provider: `GET {base_url}/{pair}` with an `X-API-KEY` header,
/// expecting `{"unixTime": <secs>, "c": <close>}`.
pub struct RestPriceProvider {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
}

impl RestPriceProvider {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl PriceProvider for RestPriceProvider {
    fn fetch_latest(&self, pair: &str) -> Result<PriceTick, ProviderError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), pair);
        let payload: QuotePayload = self
            .client
            .get(&url)
            .header("X-API-KEY", &self.api_key)
            .send()?
            .error_for_status()?
            .json()?;

        let ts = DateTime::from_timestamp(payload.unix_time, 0)
            .ok_or_else(|| ProviderError::Malformed {
                pair: pair.to_string(),
                reason: format!("unixTime {} out of range", payload.unix_time),
            })?
            .naive_utc();

        if !payload.c.is_finite() || payload.c <= 0.0 {
            return Err(ProviderError::Malformed {
                pair: pair.to_string(),
                reason: format!("non-positive close {}", payload.c),
            });
        }

        Ok(PriceTick {
            ts,
            price: payload.c,
        })
    }
}
