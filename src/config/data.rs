//! Remote data source configuration

/// Alpha Vantage FX endpoint settings
pub struct AlphaVantageConfig {
    pub base_url: &'static str,
    /// Query function for daily FX candles
    pub daily_function: &'static str,
    /// Environment variable read for the API key when none is given on the command line
    pub api_key_env: &'static str,
    /// Key used when nothing else is configured (heavily rate limited by the service)
    pub fallback_api_key: &'static str,
    /// JSON object holding the dated bars in the daily response
    pub daily_series_key: &'static str,
    pub request_timeout_secs: u64,
}

pub const ALPHA_VANTAGE: AlphaVantageConfig = AlphaVantageConfig {
    base_url: "https://www.alphavantage.co/query",
    daily_function: "FX_DAILY",
    api_key_env: "ALPHAVANTAGE_API_KEY",
    fallback_api_key: "demo",
    daily_series_key: "Time Series FX (Daily)",
    request_timeout_secs: 20,
};
