use crate::archive::ArchiveError;
use chrono::NaiveDate;
use thiserror::Error;

/// Everything that can go wrong in a session. All of these are fatal; the
/// crate never retries, preferring a loud abort over silently partial data.
#[derive(Debug, Error)]
pub enum ArsoError {
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error("invalid date range: {start} is after {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("chunk length must be at least one day, got {0}")]
    InvalidChunkDays(i64),

    #[error("no parameters selected")]
    EmptyParameterSelection,

    #[error("no stations selected")]
    EmptyStationSelection,

    #[error("no station types selected")]
    EmptyStationKindSelection,

    /// The catalog and data responses disagree about what a parameter id
    /// means; the merged table would silently mix different measurements.
    #[error("parameter '{id}' carries conflicting metadata across responses")]
    ParameterMismatch { id: String },

    #[error("failed to encode the export file")]
    Export(#[from] csv::Error),

    #[error("failed to write the export file")]
    ExportIo(#[from] std::io::Error),
}
