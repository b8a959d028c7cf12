//! HTTP client for the three archive queries: dataset catalog, station list,
//! and measurement data.
//!
//! Every response body is XML wrapping a single `AcademaPUJS.set(<payload>)`
//! assignment. The payload is extracted, normalized via [`crate::jsonify`],
//! and only then strict-JSON decoded; response parsing lives in free functions
//! so tests can feed canned payloads without a server.

use crate::archive::error::ArchiveError;
use crate::jsonify::jsonify;
use crate::types::fragment::{
    timestamp_from_minutes, DataParameter, ObservationFragment, ObservedValue, ParameterMeta,
};
use crate::types::{ApiCategory, ParameterDescriptor, StationDescriptor, StationKind};
use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const DEFAULT_BASE_URL: &str = "https://meteo.arso.gov.si/webmet/archive";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: reqwest::Client,
    base_url: String,
}

impl ArchiveClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ArchiveClient { client, base_url }
    }

    /// Fetches the dataset catalog and flattens its nested
    /// category -> dataset-variant -> group -> parameter tree.
    pub async fn fetch_catalog(&self) -> Result<Vec<ParameterDescriptor>, ArchiveError> {
        let url = format!("{}/settings.xml?lang=en", self.base_url);
        let payload = self.get_payload(&url).await?;
        parse_catalog(&payload)
    }

    /// Fetches the stations reporting within the window that match any of the
    /// given type codes, sorted by display name.
    pub async fn fetch_stations(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
        kinds: &[StationKind],
    ) -> Result<Vec<StationDescriptor>, ArchiveError> {
        let type_list = kinds
            .iter()
            .map(|k| k.code().to_string())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}/locations.xml?d1={}&d2={}&type={}",
            self.base_url,
            date_from.format(DATE_FORMAT),
            date_to.format(DATE_FORMAT),
            type_list
        );
        let payload = self.get_payload(&url).await?;
        parse_stations(&payload)
    }

    /// Fetches one station's measurements for one date range.
    pub async fn fetch_observations(
        &self,
        category: ApiCategory,
        parameter_ids: &[String],
        station_id: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
    ) -> Result<Vec<ObservationFragment>, ArchiveError> {
        let url = format!(
            "{}/data.xml?lang=en&vars={}&type={}&id={}&d1={}&d2={}",
            self.base_url,
            parameter_ids.join(","),
            category,
            station_id,
            date_from.format(DATE_FORMAT),
            date_to.format(DATE_FORMAT),
        );
        let payload = self.get_payload(&url).await?;
        parse_observations(category, &payload)
    }

    /// GET -> status check -> envelope extraction -> normalization.
    async fn get_payload(&self, url: &str) -> Result<String, ArchiveError> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ArchiveError::Network {
                url: url.to_string(),
                source: e,
            })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| ArchiveError::Network {
            url: url.to_string(),
            source: e,
        })?;
        if !status.is_success() {
            return Err(ArchiveError::Status {
                url: url.to_string(),
                status,
                body,
            });
        }
        let literal = extract_envelope(&body).ok_or_else(|| ArchiveError::Envelope {
            url: url.to_string(),
        })?;
        Ok(jsonify(literal))
    }
}

/// Pulls the JavaScript literal out of the `AcademaPUJS.set(...)` wrapper.
/// The literal never contains `<`, so the closing paren is the one right
/// before the element's end tag (or the end of the body).
fn extract_envelope(body: &str) -> Option<&str> {
    let pattern = Regex::new(r"(?s)AcademaPUJS\.set\((.*?)\)\s*(?:</|$)").unwrap();
    pattern
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

// Wire shapes. Every scalar arrives as a string because the normalizer wraps
// bare tokens in quotes; fields the tool does not consume are simply absent
// from these structs.

#[derive(Deserialize)]
struct CatalogEnvelope {
    dt: Vec<CatalogCategory>,
}

#[derive(Deserialize)]
struct CatalogCategory {
    #[serde(default)]
    mindate: Option<String>,
    dv: Vec<CatalogVariant>,
}

#[derive(Deserialize)]
struct CatalogVariant {
    url: String,
    groups: Vec<CatalogGroup>,
}

#[derive(Deserialize)]
struct CatalogGroup {
    gid: String,
    desc: String,
    params: BTreeMap<String, CatalogParameter>,
}

#[derive(Deserialize)]
struct CatalogParameter {
    pid: String,
    s: String,
    l: String,
    t: String,
    #[serde(default)]
    u: Option<String>,
}

fn parse_catalog(payload: &str) -> Result<Vec<ParameterDescriptor>, ArchiveError> {
    let envelope: CatalogEnvelope = serde_json::from_str(payload)?;
    let mut out = Vec::new();
    for category in envelope.dt {
        let min_date = category
            .mindate
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw, DATE_FORMAT).ok());
        for variant in category.dv {
            let Some(api) = ApiCategory::from_url(&variant.url) else {
                log::warn!("skipping catalog variant with unknown category '{}'", variant.url);
                continue;
            };
            for group in variant.groups {
                for (_, parameter) in group.params {
                    let station_kinds = StationKind::parse_set(&parameter.t)
                        .map_err(|bad| ArchiveError::StationKindCode(bad.to_string()))?;
                    out.push(ParameterDescriptor {
                        id: parameter.pid,
                        short_label: parameter.s,
                        long_label: parameter.l,
                        group_id: group.gid.clone(),
                        group_description: group.desc.clone(),
                        category: api,
                        station_kinds,
                        unit: parameter.u,
                        min_date,
                    });
                }
            }
        }
    }
    Ok(out)
}

#[derive(Deserialize)]
struct StationsEnvelope {
    #[serde(default)]
    points: BTreeMap<String, StationRecord>,
}

#[derive(Deserialize)]
struct StationRecord {
    name: String,
    lon: String,
    lat: String,
    #[serde(default)]
    alt: Option<String>,
    #[serde(rename = "type")]
    kind: String,
}

fn parse_stations(payload: &str) -> Result<Vec<StationDescriptor>, ArchiveError> {
    let envelope: StationsEnvelope = serde_json::from_str(payload)?;
    let mut out = Vec::with_capacity(envelope.points.len());
    for (key, record) in envelope.points {
        // Station keys carry a leading underscore to stay valid identifiers.
        let id = key.trim_start_matches('_').to_string();
        let lon = parse_numeric("lon", &record.lon)?;
        let lat = parse_numeric("lat", &record.lat)?;
        let altitude = match &record.alt {
            Some(raw) => Some(parse_numeric("alt", raw)?),
            None => None,
        };
        let kind = record
            .kind
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(StationKind::from_code)
            .ok_or_else(|| ArchiveError::StationKindCode(record.kind.clone()))?;
        out.push(StationDescriptor {
            id,
            name: record.name,
            lon,
            lat,
            altitude,
            kind,
        });
    }
    out.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(out)
}

fn parse_numeric(field: &str, value: &str) -> Result<f64, ArchiveError> {
    value.trim().parse().map_err(|_| ArchiveError::Numeric {
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[derive(Deserialize)]
struct DataEnvelope {
    #[serde(default)]
    points: BTreeMap<String, Value>,
    #[serde(default)]
    params: BTreeMap<String, DataParameter>,
}

fn parse_observations(
    category: ApiCategory,
    payload: &str,
) -> Result<Vec<ObservationFragment>, ArchiveError> {
    let envelope: DataEnvelope = serde_json::from_str(payload)?;
    let parameters: ParameterMeta = Arc::new(envelope.params);
    let mut out = Vec::new();
    for (station_key, buckets) in envelope.points {
        let station_id = station_key.trim_start_matches('_').to_string();
        for (timestamp_key, readings) in flatten_buckets(category, buckets)? {
            let minutes: i64 = timestamp_key
                .trim_start_matches('_')
                .parse()
                .map_err(|_| ArchiveError::Timestamp(timestamp_key.clone()))?;
            let mut values = BTreeMap::new();
            for pid in parameters.keys() {
                let value = match readings.get(pid) {
                    None => ObservedValue::Missing,
                    Some(raw) => {
                        let token = raw.as_str().ok_or_else(|| {
                            ArchiveError::Shape(format!(
                                "non-string reading for parameter '{pid}'"
                            ))
                        })?;
                        ObservedValue::decode(token).ok_or_else(|| ArchiveError::ValueToken {
                            parameter: pid.clone(),
                            token: token.to_string(),
                        })?
                    }
                };
                values.insert(pid.clone(), value);
            }
            out.push(ObservationFragment {
                station_id: station_id.clone(),
                timestamp: timestamp_from_minutes(minutes),
                values,
                parameters: Arc::clone(&parameters),
            });
        }
    }
    Ok(out)
}

/// Turns one station's bucket tree into a flat timestamp -> readings map.
///
/// The yearly-with-months cadence nests the monthly readings under a `t` key
/// inside each yearly bucket; the yearly key itself carries no information the
/// monthly timestamps do not, so it is dropped.
fn flatten_buckets(
    category: ApiCategory,
    buckets: Value,
) -> Result<BTreeMap<String, Map<String, Value>>, ArchiveError> {
    let buckets = into_object(buckets, "station bucket")?;
    let mut out = BTreeMap::new();
    if category == ApiCategory::YearlyWithMonths {
        for (year_key, yearly) in buckets {
            let mut yearly = into_object(yearly, "yearly bucket")?;
            let months = yearly.remove("t").ok_or_else(|| {
                ArchiveError::Shape(format!("yearly bucket '{year_key}' has no 't' member"))
            })?;
            for (timestamp_key, readings) in into_object(months, "monthly bucket")? {
                out.insert(timestamp_key, into_object(readings, "readings")?);
            }
        }
    } else {
        for (timestamp_key, readings) in buckets {
            out.insert(timestamp_key, into_object(readings, "readings")?);
        }
    }
    Ok(out)
}

fn into_object(value: Value, what: &str) -> Result<Map<String, Value>, ArchiveError> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(ArchiveError::Shape(format!(
            "expected {what} to be an object, got {other}"
        ))),
    }
}
