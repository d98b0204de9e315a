//! World Bank API v2 integration for world-aggregate macro indicators.
//!
//! Each indicator is requested separately for the `WLD` entity and the year
//! span covering the requested range. The per-indicator observations are then
//! joined on `(country, date)` and filtered to the closed date range.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::context::RunContext;
use crate::domain::{DateRange, Indicator, IndicatorRow, IndicatorTable, WORLD_ENTITY};
use crate::error::AppError;

const PER_PAGE: usize = 1000;
/// Hard stop for a misbehaving `pages` field.
const MAX_PAGES: u64 = 100;

/// A single observation after date parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub country: String,
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// One decoded response page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub page: u64,
    pub pages: u64,
    pub observations: Vec<Observation>,
    /// Rows whose `date` field could not be interpreted.
    pub skipped: usize,
}

pub struct WorldBankClient {
    client: Client,
    base_url: String,
}

impl WorldBankClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.world_bank_api_url.clone())
    }

    /// Fetch every indicator for the world aggregate and join them into one table.
    pub fn fetch_indicators(
        &self,
        indicators: &[Indicator],
        range: DateRange,
        ctx: &RunContext,
    ) -> Result<IndicatorTable, AppError> {
        let _stage = ctx.stage("fetch_world_data");
        if indicators.is_empty() {
            return Err(AppError::InvalidInput("No indicators requested.".to_string()));
        }

        info!(
            indicators = indicators.len(),
            start = %range.start,
            end = %range.end,
            "Fetching world data"
        );

        let mut series = Vec::with_capacity(indicators.len());
        for indicator in indicators {
            let obs = self.fetch_series(&indicator.code, range)?;
            debug!(code = %indicator.code, observations = obs.len(), "Indicator fetched");
            series.push(obs);
        }

        let table = assemble_table(indicators, &series, range);
        info!(rows = table.len(), "World data fetched and filtered by date");
        Ok(table)
    }

    fn fetch_series(&self, code: &str, range: DateRange) -> Result<Vec<Observation>, AppError> {
        let url = format!("{}/country/{}/indicator/{}", self.base_url, WORLD_ENTITY, code);
        let years = format!("{}:{}", range.start.year(), range.end.year());
        let per_page = PER_PAGE.to_string();

        let mut out = Vec::new();
        let mut page = 1u64;
        loop {
            let page_param = page.to_string();
            let resp = self
                .client
                .get(&url)
                .query(&[
                    ("format", "json"),
                    ("date", years.as_str()),
                    ("per_page", per_page.as_str()),
                    ("page", page_param.as_str()),
                ])
                .send()
                .map_err(|e| AppError::Network(format!("World Bank request for {code} failed: {e}")))?;

            if !resp.status().is_success() {
                return Err(AppError::Network(format!(
                    "World Bank request for {code} failed with status {}.",
                    resp.status()
                )));
            }

            let body: Value = resp.json().map_err(|e| {
                AppError::UnexpectedShape(format!("World Bank response for {code} is not JSON: {e}"))
            })?;

            let decoded = parse_page(code, body)?;
            if decoded.skipped > 0 {
                warn!(code, skipped = decoded.skipped, "Dropped observations with unparseable dates");
            }
            out.extend(decoded.observations);

            if decoded.pages <= page || page >= MAX_PAGES {
                break;
            }
            page += 1;
        }

        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    country: Named,
    date: String,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Named {
    value: String,
}

/// Decode one response body, validating its shape.
///
/// The expected body is `[metadata, observations]`. The provider reports
/// errors as `[{"message": [...]}]`, and empty results as `[metadata, null]`.
pub fn parse_page(code: &str, body: Value) -> Result<Page, AppError> {
    let mut parts = match body {
        Value::Array(parts) => parts,
        other => {
            return Err(AppError::UnexpectedShape(format!(
                "expected a [metadata, observations] array for {code}, got {}",
                describe_shape(&other)
            )));
        }
    };

    if parts.len() != 2 {
        let detail = parts
            .first()
            .and_then(provider_message)
            .unwrap_or_else(|| format!("array of {} elements", parts.len()));
        return Err(AppError::UnexpectedShape(format!(
            "expected a [metadata, observations] array for {code}, got {detail}"
        )));
    }

    let data = parts.pop().unwrap_or(Value::Null);
    let meta = parts.pop().unwrap_or(Value::Null);

    if !meta.is_object() {
        return Err(AppError::UnexpectedShape(format!(
            "expected a metadata object for {code}, got {}",
            describe_shape(&meta)
        )));
    }
    let page = json_u64(&meta, "page").unwrap_or(1);
    let pages = json_u64(&meta, "pages").unwrap_or(1);

    let rows = match data {
        Value::Null => Vec::new(),
        Value::Array(rows) => rows,
        other => {
            return Err(AppError::UnexpectedShape(format!(
                "expected an observations array for {code}, got {}",
                describe_shape(&other)
            )));
        }
    };

    let mut observations = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in rows {
        let raw: RawObservation = serde_json::from_value(row)
            .map_err(|e| AppError::UnexpectedShape(format!("malformed observation for {code}: {e}")))?;
        match parse_period(&raw.date) {
            Some(date) => observations.push(Observation {
                country: raw.country.value,
                date,
                value: raw.value.filter(|v| v.is_finite()),
            }),
            None => skipped += 1,
        }
    }

    Ok(Page {
        page,
        pages,
        observations,
        skipped,
    })
}

/// Parse a provider period label to the first day of that period.
///
/// Supports annual (`2020`), quarterly (`2020Q2`) and monthly (`2020M07`) labels.
pub fn parse_period(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let year_part = raw.get(..4)?;
    let year: i32 = year_part.parse().ok()?;
    let rest = &raw[4..];

    let month = if rest.is_empty() {
        1
    } else if let Some(q) = rest.strip_prefix('Q') {
        let q: u32 = q.parse().ok()?;
        if !(1..=4).contains(&q) {
            return None;
        }
        (q - 1) * 3 + 1
    } else if let Some(m) = rest.strip_prefix('M') {
        m.parse().ok()?
    } else {
        return None;
    };

    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Join per-indicator observations into one table, keeping rows inside `range`.
pub fn assemble_table(indicators: &[Indicator], series: &[Vec<Observation>], range: DateRange) -> IndicatorTable {
    let width = indicators.len();
    let mut by_key: BTreeMap<(NaiveDate, String), Vec<Option<f64>>> = BTreeMap::new();

    for (col, observations) in series.iter().enumerate().take(width) {
        for obs in observations {
            if !range.contains(obs.date) {
                continue;
            }
            let values = by_key
                .entry((obs.date, obs.country.clone()))
                .or_insert_with(|| vec![None; width]);
            values[col] = obs.value;
        }
    }

    IndicatorTable {
        labels: indicators.iter().map(|i| i.label.clone()).collect(),
        rows: by_key
            .into_iter()
            .map(|((date, country), values)| IndicatorRow { country, date, values })
            .collect(),
    }
}

fn provider_message(value: &Value) -> Option<String> {
    let messages = value.get("message")?.as_array()?;
    let text: Vec<String> = messages
        .iter()
        .map(|m| {
            let key = m.get("key").and_then(Value::as_str).unwrap_or("error");
            let detail = m.get("value").and_then(Value::as_str).unwrap_or("");
            format!("{key}: {detail}")
        })
        .collect();
    Some(format!("provider message [{}]", text.join("; ")))
}

fn json_u64(value: &Value, key: &str) -> Option<u64> {
    let field = value.get(key)?;
    field
        .as_u64()
        .or_else(|| field.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Short human description of a JSON value's structure (for diagnostics).
pub fn describe_shape(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(_) => "a boolean".to_string(),
        Value::Number(_) => "a number".to_string(),
        Value::String(s) => format!("a string ({} chars)", s.chars().count()),
        Value::Array(items) => format!("an array of {} elements", items.len()),
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().map(String::as_str).collect();
            format!("an object with keys [{}]", keys.join(", "))
        }
    }
}

/// Mock World Bank provider for tests: serves `body` with `status` on every
/// indicator path from a background thread and returns its base URL.
#[cfg(test)]
pub(crate) fn spawn_provider(status: u16, body: Value) -> String {
    use axum::http::StatusCode;

    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        runtime.block_on(async move {
            let status = StatusCode::from_u16(status).unwrap();
            let app = axum::Router::new().route(
                "/country/{entity}/indicator/{code}",
                axum::routing::get(move || {
                    let body = body.clone();
                    async move { (status, axum::Json(body)) }
                }),
            );
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}
