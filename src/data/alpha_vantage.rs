use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::ALPHA_VANTAGE;
use crate::data::source::SeriesSource;
use crate::domain::{Interval, OutputSize, PriceBar, PriceSeries, Symbol};

/// Daily FX candles from the Alpha Vantage `FX_DAILY` endpoint.
pub struct AlphaVantageSource {
    api_key: String,
    client: reqwest::blocking::Client,
}

impl AlphaVantageSource {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(ALPHA_VANTAGE.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            api_key: api_key.into(),
            client,
        })
    }

    /// Key from the command line, else the environment, else the public demo key.
    pub fn resolve_api_key(cli_key: Option<&str>) -> String {
        cli_key
            .map(str::to_string)
            .or_else(|| std::env::var(ALPHA_VANTAGE.api_key_env).ok())
            .filter(|key| !key.trim().is_empty())
            .unwrap_or_else(|| ALPHA_VANTAGE.fallback_api_key.to_string())
    }
}

impl SeriesSource for AlphaVantageSource {
    fn fetch_series(
        &self,
        symbol: Symbol,
        interval: Interval,
        output_size: OutputSize,
    ) -> Result<PriceSeries> {
        let function = match interval {
            Interval::Daily => ALPHA_VANTAGE.daily_function,
        };
        let (from_symbol, to_symbol) = symbol.base_and_quote();

        let body = self
            .client
            .get(ALPHA_VANTAGE.base_url)
            .query(&[
                ("function", function),
                ("from_symbol", from_symbol),
                ("to_symbol", to_symbol),
                ("outputsize", output_size.as_query()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .with_context(|| format!("Request for {} failed", symbol))?
            .error_for_status()
            .with_context(|| format!("Alpha Vantage rejected request for {}", symbol))?
            .text()
            .context("Failed to read response body")?;

        parse_fx_daily(&body, output_size.max_bars())
            .with_context(|| format!("Unusable {} response for {}", function, symbol))
    }

    fn signature(&self) -> &'static str {
        "Alpha Vantage API"
    }
}

#[derive(Deserialize)]
struct FxDailyResponse {
    #[serde(rename = "Time Series FX (Daily)")]
    series: Option<BTreeMap<String, FxDailyBar>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    // Rate limiting notices come back with HTTP 200 under one of these keys
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

#[derive(Deserialize)]
struct FxDailyBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
}

fn parse_price(raw: &str, field: &str, date: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .with_context(|| format!("Bad {} '{}' on {}", field, raw, date))
}

/// Parses an `FX_DAILY` body into a series, keeping the most recent `max_bars` if given.
pub fn parse_fx_daily(body: &str, max_bars: Option<usize>) -> Result<PriceSeries> {
    let response: FxDailyResponse =
        serde_json::from_str(body).context("Response is not valid JSON")?;

    if let Some(msg) = response.error_message {
        bail!("Service error: {}", msg);
    }
    let series = match (response.series, response.note.or(response.information)) {
        (Some(series), _) => series,
        (None, Some(notice)) => bail!("Service notice: {}", notice),
        (None, None) => {
            return Err(anyhow!(
                "Missing \"{}\" in response",
                ALPHA_VANTAGE.daily_series_key
            ));
        }
    };

    let mut bars = series
        .iter()
        .map(|(date, raw)| {
            let parsed = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .with_context(|| format!("Bad date '{}'", date))?;
            Ok(PriceBar::new(
                parsed,
                parse_price(&raw.open, "open", date)?,
                parse_price(&raw.high, "high", date)?,
                parse_price(&raw.low, "low", date)?,
                parse_price(&raw.close, "close", date)?,
            ))
        })
        .collect::<Result<Vec<PriceBar>>>()?;

    if let Some(max) = max_bars {
        bars.sort_by_key(|bar| bar.date);
        let excess = bars.len().saturating_sub(max);
        bars.drain(..excess);
    }

    Ok(PriceSeries::from_unsorted(bars))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "Meta Data": {
            "1. Information": "Forex Daily Prices (open, high, low, close)",
            "2. From Symbol": "EUR",
            "3. To Symbol": "USD"
        },
        "Time Series FX (Daily)": {
            "2024-01-04": {"1. open": "1.09180", "2. high": "1.09530", "3. low": "1.09020", "4. close": "1.09460"},
            "2024-01-02": {"1. open": "1.10380", "2. high": "1.10450", "3. low": "1.09410", "4. close": "1.09430"},
            "2024-01-03": {"1. open": "1.09420", "2. high": "1.09590", "3. low": "1.08920", "4. close": "1.09190"}
        }
    }"#;

    #[test]
    fn parses_and_orders_daily_bars() {
        let series = parse_fx_daily(SAMPLE, None).unwrap();
        assert_eq!(series.len(), 3);
        let first = series.first().unwrap();
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(first.open, 1.10380);
        assert_eq!(series.last().unwrap().close, 1.09460);
    }

    #[test]
    fn compact_keeps_most_recent_bars() {
        let series = parse_fx_daily(SAMPLE, Some(2)).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(
            series.first().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap()
        );
    }

    #[test]
    fn service_errors_and_notices_are_reported() {
        let err = parse_fx_daily(r#"{"Error Message": "Invalid API call."}"#, None).unwrap_err();
        assert!(err.to_string().contains("Invalid API call"));

        let err = parse_fx_daily(r#"{"Note": "Thank you for using Alpha Vantage!"}"#, None)
            .unwrap_err();
        assert!(err.to_string().contains("notice"));

        let err = parse_fx_daily(r#"{"Information": "rate limit"}"#, None).unwrap_err();
        assert!(err.to_string().contains("rate limit"));

        assert!(parse_fx_daily("{}", None).is_err());
        assert!(parse_fx_daily("not json", None).is_err());
    }

    #[test]
    fn bad_numbers_name_the_field() {
        let body = r#"{"Time Series FX (Daily)": {
            "2024-01-02": {"1. open": "x", "2. high": "1", "3. low": "1", "4. close": "1"}
        }}"#;
        let err = parse_fx_daily(body, None).unwrap_err();
        assert!(format!("{:#}", err).contains("open"));
    }

    #[test]
    fn api_key_prefers_command_line() {
        assert_eq!(AlphaVantageSource::resolve_api_key(Some("abc")), "abc");
    }
}
