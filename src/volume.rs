//! Estimates result volume to size date-range chunks.

use crate::types::ApiCategory;
use chrono::NaiveDate;

/// Default point budget per request. The archive serves payloads around this
/// size comfortably; raise it per query to trade fewer requests for larger
/// responses.
pub const DEFAULT_TARGET_CHUNK_POINTS: f64 = 1000.0;

/// Sizing hint for a measurement query: how many data points to expect and how
/// to cut the span so each request stays near the target budget.
///
/// This is a heuristic, not a contract: `chunks_needed` is always at least 1,
/// but `days_per_chunk` can come out as 0 for very dense queries and must be
/// clamped to 1 before it reaches [`crate::split_date_range`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeEstimate {
    pub expected_points: f64,
    pub chunks_needed: u64,
    pub days_per_chunk: i64,
}

impl VolumeEstimate {
    pub fn for_query(
        category: ApiCategory,
        parameter_count: usize,
        start: NaiveDate,
        end: NaiveDate,
        target_chunk_points: f64,
    ) -> Self {
        let span = end.signed_duration_since(start);
        let seconds = span.num_seconds().max(0) as f64;
        let total_days = span.num_days().max(0);

        let expected_points = category.frequency_hz() * seconds * parameter_count as f64;
        let chunks_needed = ((expected_points / target_chunk_points) as u64).max(1);
        let days_per_chunk = total_days / chunks_needed as i64;

        Self {
            expected_points,
            chunks_needed,
            days_per_chunk,
        }
    }
}
