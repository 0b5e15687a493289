//! Best-effort current price from a DexScreener-style pair endpoint.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::QuoteCfg;
use crate::types::Quote;
use crate::utils::sanitize_pair_id;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("invalid quote url: {0}")]
    Url(String),
    #[error("quote request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("quote service returned non-success status: {0}")]
    Status(#[source] reqwest::Error),
    #[error("quote response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Anything that can look up a unit price for a pair identifier.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// `Ok(None)` when the service answered but had no usable price.
    async fn fetch_price(&self, pair_id: &str) -> Result<Option<String>, LookupError>;
}

#[derive(Debug, Deserialize)]
struct PairsResponse {
    #[serde(default)]
    pairs: Option<Vec<PairRecord>>,
}

#[derive(Debug, Deserialize)]
struct PairRecord {
    #[serde(rename = "priceUsd", default)]
    price_usd: Option<String>,
}

/// Pick the price out of a pairs response body.
///
/// Only the record at index 0 is consulted. Its `priceUsd` string is returned
/// verbatim; later records are never used as a fallback.
pub fn select_price(body: &[u8]) -> Result<Option<String>, LookupError> {
    let parsed: PairsResponse = serde_json::from_slice(body)?;
    let price = parsed
        .pairs
        .unwrap_or_default()
        .into_iter()
        .next()
        .and_then(|rec| rec.price_usd)
        .filter(|p| !p.trim().is_empty());
    Ok(price)
}

pub struct DexScreenerClient {
    client: Client,
    base: Url,
    chain: String,
}

impl DexScreenerClient {
    pub fn new(cfg: &QuoteCfg) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = cfg.timeout_sec {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let base = Url::parse(&cfg.base_url)
            .with_context(|| format!("invalid quote base_url {:?}", cfg.base_url))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("quote base_url {:?} cannot take path segments", cfg.base_url);
        }
        Ok(Self {
            client: builder.build()?,
            base,
            chain: cfg.chain.trim_matches('/').to_string(),
        })
    }

    /// `{base}/{chain}/{pair_id}`, with the pair id kept as a single encoded segment.
    pub fn pair_url(&self, pair_id: &str) -> Result<Url, LookupError> {
        if pair_id == "." || pair_id == ".." {
            return Err(LookupError::Url(format!("invalid pair id {pair_id:?}")));
        }
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| LookupError::Url(format!("{} cannot be a base", self.base)))?
            .pop_if_empty()
            .push(&self.chain)
            .push(pair_id);
        Ok(url)
    }
}

#[async_trait]
impl PriceSource for DexScreenerClient {
    async fn fetch_price(&self, pair_id: &str) -> Result<Option<String>, LookupError> {
        let url = self.pair_url(pair_id)?;
        debug!("GET {}", url);
        let resp = self
            .client
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(LookupError::Request)?
            .error_for_status()
            .map_err(LookupError::Status)?;
        let body = resp.bytes().await.map_err(LookupError::Request)?;
        select_price(&body)
    }
}

/// Try to fill `quote.current_unit_price` from `source`.
///
/// Never fails: a blank pair id skips the request, and any lookup failure only
/// gets logged while the existing price stays. Returns whether the price changed.
pub async fn refresh_quote(source: &dyn PriceSource, quote: &mut Quote) -> bool {
    let pair_id = sanitize_pair_id(&quote.pair_id);
    if pair_id.is_empty() {
        return false;
    }
    match source.fetch_price(&pair_id).await {
        Ok(Some(price)) => {
            info!("Fetched price {} for pair {}", price, pair_id);
            quote.current_unit_price = Some(price);
            true
        }
        Ok(None) => {
            warn!("No price found for pair {}", pair_id);
            false
        }
        Err(e) => {
            warn!("Price lookup for pair {} failed: {:#}", pair_id, e);
            false
        }
    }
}
