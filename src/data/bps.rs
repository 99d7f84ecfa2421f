//! BPS WebAPI integration for monthly rice prices (variable 500).
//!
//! The response carries everything the extractor needs:
//!
//! - `datacontent`: flat object, composite key -> price
//! - `tahun`: year codes (`{"val": 113, "label": "2013"}`)
//! - `turtahun`: period codes (`{"val": 1, "label": "Januari"}`, plus `13` for the annual figure)

use std::fmt;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;

use crate::data::PriceSource;
use crate::domain::{MonthLookup, RawDataset, RawRecord, RawValue, YearLookup};
use crate::error::AppError;

const BASE_URL: &str = "https://webapi.bps.go.id/v1/api/list/model/data/lang/ind/domain/0000/var/500/key";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the BPS WebAPI.
///
/// Built once (usually from the environment) and handed to [`BpsClient`].
#[derive(Clone)]
pub struct BpsConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl BpsConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read `API_KEY`, `BPS_URL` and `BPS_TIMEOUT_SECS` (after loading `.env`).
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let api_key = std::env::var("API_KEY")
            .map_err(|_| AppError::Config("Missing API_KEY in environment (.env).".to_string()))?;
        if api_key.trim().is_empty() {
            return Err(AppError::Config("API_KEY is empty.".to_string()));
        }

        let mut config = Self::new(api_key.trim());
        if let Ok(url) = std::env::var("BPS_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(raw) = std::env::var("BPS_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| AppError::Config(format!("Invalid BPS_TIMEOUT_SECS '{raw}'.")))?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Full request URL (contains the key).
    pub fn url(&self) -> String {
        format!("{}/{}", self.base_url, self.api_key)
    }
}

impl fmt::Debug for BpsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BpsConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct BpsClient {
    client: Client,
    config: BpsConfig,
}

impl BpsClient {
    pub fn new(config: BpsConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Fetch(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> Result<Self, AppError> {
        Self::new(BpsConfig::from_env()?)
    }
}

impl PriceSource for BpsClient {
    fn describe(&self) -> String {
        format!("BPS WebAPI ({})", self.config.base_url)
    }

    fn fetch(&self) -> Result<RawDataset, AppError> {
        log::info!("fetching rice prices from {}", self.config.base_url);

        let resp = self
            .client
            .get(self.config.url())
            .send()
            .map_err(|e| AppError::Fetch(format!("BPS request failed: {}", e.without_url())))?;

        if !resp.status().is_success() {
            return Err(AppError::Fetch(format!(
                "BPS request failed with status {}.",
                resp.status()
            )));
        }

        let body = resp
            .text()
            .map_err(|e| AppError::Fetch(format!("Failed to read BPS response: {}", e.without_url())))?;

        parse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct DataResponse {
    #[serde(default)]
    datacontent: Option<Value>,
    #[serde(default)]
    tahun: Vec<CodeEntry>,
    #[serde(default)]
    turtahun: Vec<CodeEntry>,
}

#[derive(Debug, Deserialize)]
struct CodeEntry {
    val: Value,
    #[serde(default)]
    label: Value,
}

/// Parse a BPS `list/model/data` response body.
pub fn parse_response(body: &str) -> Result<RawDataset, AppError> {
    let resp: DataResponse =
        serde_json::from_str(body).map_err(|e| AppError::Fetch(format!("Failed to parse BPS response: {e}")))?;

    let records: Vec<RawRecord> = match resp.datacontent {
        Some(Value::Object(map)) => map
            .into_iter()
            .map(|(key, value)| RawRecord::new(key, raw_value(value)))
            .collect(),
        _ => Vec::new(),
    };
    if records.is_empty() {
        return Err(AppError::MissingData);
    }

    let mut years = Vec::new();
    for entry in &resp.tahun {
        match (code_string(&entry.val), label_year(&entry.label)) {
            (Some(code), Some(year)) => years.push((code, year)),
            _ => log::warn!("ignoring year entry val={} label={}", entry.val, entry.label),
        }
    }

    // Only integer period codes are months; 13 (annual) is dropped by MonthLookup.
    let months: Vec<(String, u32)> = resp
        .turtahun
        .iter()
        .filter_map(|entry| {
            let m = entry.val.as_u64()?;
            Some((m.to_string(), u32::try_from(m).ok()?))
        })
        .collect();

    let dataset = RawDataset {
        records,
        years: YearLookup::new(years),
        months: MonthLookup::new(months),
    };
    if dataset.years.is_empty() || dataset.months.is_empty() {
        log::warn!("BPS payload has no usable year or month codes; no key will decode");
    }
    log::debug!(
        "BPS payload: {} record(s), {} year code(s), {} month code(s)",
        dataset.records.len(),
        dataset.years.entries().len(),
        dataset.months.entries().len()
    );
    Ok(dataset)
}

fn raw_value(value: Value) -> RawValue {
    match value {
        Value::Number(n) => match n.as_f64() {
            Some(v) => RawValue::Number(v),
            None => RawValue::Other(Value::Number(n)),
        },
        Value::String(s) => RawValue::Text(s),
        other => RawValue::Other(other),
    }
}

fn code_string(val: &Value) -> Option<String> {
    match val {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

fn label_year(label: &Value) -> Option<i32> {
    match label {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        _ => None,
    }
}
