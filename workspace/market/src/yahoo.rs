use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveTime};
use compute::prices::{PriceBar, build_price_table, empty_price_table};
use polars::prelude::DataFrame;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, error, info, instrument, trace, warn};

use crate::error::{MarketError, Result};
use crate::provider::{PriceProvider, check_range, normalize_symbol};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) stockcast/0.1";

const NOT_FOUND_CODE: &str = "Not Found";
/// Start of the description Yahoo sends with a 400 for a range without bars.
const NO_DATA_DESCRIPTION: &str = "Data doesn't exist";

/// Daily prices from the Yahoo Finance chart API.
#[derive(Debug, Clone)]
pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    pub fn new(base_url: impl Into<String>, user_agent: &str) -> Result<Self> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!("{}/v8/finance/chart/{}", self.base_url, symbol)
    }
}

#[async_trait]
impl PriceProvider for YahooProvider {
    #[instrument(skip(self))]
    async fn fetch(&self, symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<DataFrame> {
        trace!("Fetching prices");
        let symbol = normalize_symbol(symbol)?;
        check_range(start, end)?;
        if start == end {
            debug!("Empty date range, skipping request");
            return Ok(empty_price_table()?);
        }

        let period1 = unix_midnight(start);
        let period2 = unix_midnight(end);
        let response = self
            .client
            .get(self.chart_url(&symbol))
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "div|split".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                error!("Request for {} failed: {}", symbol, e);
                MarketError::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await?;
        debug!("Provider answered {} with {} bytes", status, body.len());

        let status_error = || MarketError::Status {
            status: status.as_u16(),
            body: truncate(&body, 200),
        };
        let envelope = match status {
            s if s.is_success() => decode_chart(&body)?,
            StatusCode::NOT_FOUND => decode_chart(&body).inspect_err(|e| {
                warn!("404 for {} without a chart body: {}", symbol, e);
            })?,
            // A range without bars is answered with a chart error body
            StatusCode::BAD_REQUEST => decode_chart(&body).map_err(|_| {
                error!("Provider returned status {} for {}", status, symbol);
                status_error()
            })?,
            _ => {
                error!("Provider returned status {} for {}", status, symbol);
                return Err(status_error());
            }
        };
        let bars = chart_bars(envelope, start, end)?;
        let df = build_price_table(bars)?;

        info!("Loaded {} rows for {} from {} to {}", df.height(), symbol, start, end);
        Ok(df)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub meta: Option<ChartMeta>,
    #[serde(default)]
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartMeta {
    #[serde(default)]
    pub gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
    #[serde(default)]
    pub adjclose: Vec<AdjClose>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjClose {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

pub fn decode_chart(body: &str) -> Result<ChartEnvelope> {
    serde_json::from_str(body).map_err(|e| {
        error!("Failed to decode chart body: {}", e);
        MarketError::Decode(e.to_string())
    })
}

/// Extracts the daily bars of a chart response that fall in `[start, end)`.
pub fn chart_bars(envelope: ChartEnvelope, start: NaiveDate, end: NaiveDate) -> Result<Vec<PriceBar>> {
    if let Some(err) = envelope.chart.error {
        if err.code == NOT_FOUND_CODE {
            warn!("Symbol not found: {}", err.description.as_deref().unwrap_or_default());
            return Ok(Vec::new());
        }
        if err
            .description
            .as_deref()
            .is_some_and(|d| d.starts_with(NO_DATA_DESCRIPTION))
        {
            debug!("No data for range: {}", err.description.as_deref().unwrap_or_default());
            return Ok(Vec::new());
        }
        return Err(MarketError::Provider {
            code: err.code,
            description: err.description.unwrap_or_default(),
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        warn!("Chart response has no result");
        return Ok(Vec::new());
    };
    let Some(timestamps) = result.timestamp else {
        debug!("No trading days in range");
        return Ok(Vec::new());
    };

    let offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let adjclose = result
        .indicators
        .adjclose
        .into_iter()
        .next()
        .map(|a| a.adjclose)
        .unwrap_or_default();

    let value = |values: &[Option<f64>], i: usize| values.get(i).copied().flatten();

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.into_iter().enumerate() {
        let date = DateTime::from_timestamp(ts + offset, 0)
            .ok_or_else(|| MarketError::Decode(format!("invalid timestamp {}", ts)))?
            .date_naive();
        if date < start || date >= end {
            trace!("Skipping bar outside range: {}", date);
            continue;
        }
        bars.push(PriceBar {
            date,
            open: value(&quote.open, i),
            high: value(&quote.high, i),
            low: value(&quote.low, i),
            close: value(&quote.close, i),
            adj_close: value(&adjclose, i),
            volume: quote.volume.get(i).copied().flatten(),
        });
    }

    Ok(bars)
}

fn unix_midnight(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

fn truncate(body: &str, max: usize) -> String {
    body.chars().take(max).collect()
}
