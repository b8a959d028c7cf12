//! Raw observation fragments: one station's readings at one timestamp, as a
//! single data-fetch call returns them.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Parameter metadata attached to a data response. Every fragment of a
/// response shares one copy; the aggregator checks these stay consistent
/// across responses.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataParameter {
    #[serde(rename = "s")]
    pub short_label: String,
    #[serde(rename = "l", default)]
    pub long_label: Option<String>,
    #[serde(rename = "u", default)]
    pub unit: Option<String>,
}

pub type ParameterMeta = Arc<BTreeMap<String, DataParameter>>;

/// A decoded scalar reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObservedValue {
    /// The archive's `"yes"` / `"no"` flags (e.g. snow-cover indicators).
    Flag(bool),
    Number(f64),
    /// The archive's `"/"` token, or a parameter absent from the record.
    Missing,
}

impl ObservedValue {
    /// The numeric form used for the wide table: flags become 1/0, missing
    /// readings become `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ObservedValue::Flag(true) => Some(1.0),
            ObservedValue::Flag(false) => Some(0.0),
            ObservedValue::Number(v) => Some(*v),
            ObservedValue::Missing => None,
        }
    }

    /// Decodes one raw token. `None` means the token is unrecognized, which
    /// callers must treat as a fatal decode error.
    pub(crate) fn decode(token: &str) -> Option<Self> {
        match token {
            "yes" => Some(ObservedValue::Flag(true)),
            "no" => Some(ObservedValue::Flag(false)),
            "/" | "" => Some(ObservedValue::Missing),
            _ => token.parse().ok().map(ObservedValue::Number),
        }
    }
}

/// The archive encodes time as whole minutes since this epoch.
fn minute_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(1800, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Converts the archive's minutes-since-1800 offset to an absolute timestamp.
pub fn timestamp_from_minutes(minutes: i64) -> NaiveDateTime {
    minute_epoch() + Duration::minutes(minutes)
}

/// One station's one timestamp's readings. Covers every parameter of its
/// response, keeping absent readings as explicit [`ObservedValue::Missing`].
/// Never mutated after creation.
#[derive(Debug, Clone)]
pub struct ObservationFragment {
    pub station_id: String,
    pub timestamp: NaiveDateTime,
    pub values: BTreeMap<String, ObservedValue>,
    /// Metadata of the response this fragment came from.
    pub parameters: ParameterMeta,
}
