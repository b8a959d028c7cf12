use thiserror::Error;

/// Failures of the three archive queries. Transport and protocol problems are
/// fatal for the whole operation: a non-2xx status surfaces the raw response
/// body, and an envelope or JSON mismatch signals an upstream format change
/// that no retry would fix.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("network request failed for {url}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("response from {url} does not match the AcademaPUJS.set(...) envelope")]
    Envelope { url: String },

    #[error("normalized payload is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("unexpected payload shape: {0}")]
    Shape(String),

    #[error("unrecognized value token '{token}' for parameter '{parameter}'")]
    ValueToken { parameter: String, token: String },

    #[error("invalid timestamp key '{0}'")]
    Timestamp(String),

    #[error("invalid numeric field '{field}': '{value}'")]
    Numeric { field: String, value: String },

    #[error("unknown station type code '{0}'")]
    StationKindCode(String),
}
