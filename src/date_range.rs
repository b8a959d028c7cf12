//! Splits a date span into the bounded sub-ranges one archive request covers.

use crate::error::ArsoError;
use chrono::{Datelike, Duration, NaiveDate};

/// Splits `[start, end]` (inclusive) into contiguous, non-overlapping chunks of
/// at most `days` days each, shorter at the tail.
///
/// With `split_at_year` set, a chunk that would cross a calendar-year boundary
/// is truncated to December 31 of its starting year and the next chunk begins
/// on January 1. The yearly-with-months dataset requires this because the
/// archive refuses requests spanning a year boundary there.
///
/// A span that already fits within `days` comes back as the single input pair.
/// `days < 1` and `start > end` are configuration errors.
pub fn split_date_range(
    start: NaiveDate,
    end: NaiveDate,
    days: i64,
    split_at_year: bool,
) -> Result<Vec<(NaiveDate, NaiveDate)>, ArsoError> {
    if days < 1 {
        return Err(ArsoError::InvalidChunkDays(days));
    }
    if start > end {
        return Err(ArsoError::InvalidDateRange { start, end });
    }

    let mut out = Vec::new();
    let mut chunk_start = start;
    loop {
        let mut chunk_end = chunk_start + Duration::days(days);
        if split_at_year && chunk_end.year() > chunk_start.year() {
            chunk_end = NaiveDate::from_ymd_opt(chunk_start.year(), 12, 31).unwrap();
        }
        if chunk_end >= end {
            out.push((chunk_start, end));
            return Ok(out);
        }
        out.push((chunk_start, chunk_end));
        chunk_start = chunk_end + Duration::days(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArsoError;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// Chunks must cover [start, end] exactly: first starts at `start`, last
    /// ends at `end`, and each chunk begins the day after the previous one ends.
    fn assert_covers(chunks: &[(NaiveDate, NaiveDate)], start: NaiveDate, end: NaiveDate) {
        assert_eq!(chunks.first().unwrap().0, start);
        assert_eq!(chunks.last().unwrap().1, end);
        for (from, to) in chunks {
            assert!(from <= to, "chunk {from} -> {to} is inverted");
        }
        for pair in chunks.windows(2) {
            assert_eq!(pair[1].0, pair[0].1 + Duration::days(1));
        }
    }

    #[test]
    fn splits_year_into_hundred_day_chunks() {
        let (start, end) = (date("2018-01-01"), date("2018-12-31"));
        let chunks = split_date_range(start, end, 100, false).unwrap();
        assert_eq!(
            chunks,
            vec![
                (date("2018-01-01"), date("2018-04-11")),
                (date("2018-04-12"), date("2018-07-21")),
                (date("2018-07-22"), date("2018-10-30")),
                (date("2018-10-31"), date("2018-12-31")),
            ]
        );
        assert_covers(&chunks, start, end);
    }

    #[test]
    fn chunk_count_matches_ceiling_formula() {
        for days in [1, 7, 30, 90, 365] {
            let (start, end) = (date("2015-03-14"), date("2019-11-02"));
            let chunks = split_date_range(start, end, days, false).unwrap();
            // A chunk spans days + 1 calendar dates, the span total_days + 1.
            let total_days = (end - start).num_days();
            let expected = (total_days + 1 + days) / (days + 1); // ceil
            assert_eq!(chunks.len() as i64, expected.max(1), "days = {days}");
            assert_covers(&chunks, start, end);
            for &(from, to) in &chunks {
                assert!((to - from).num_days() <= days);
            }
        }
    }

    #[test]
    fn degenerate_span_returns_single_pair() {
        let (start, end) = (date("2020-05-01"), date("2020-05-20"));
        assert_eq!(
            split_date_range(start, end, 90, false).unwrap(),
            vec![(start, end)]
        );
        assert_eq!(
            split_date_range(start, start, 1, false).unwrap(),
            vec![(start, start)]
        );
    }

    #[test]
    fn rechunking_a_chunk_is_identity() {
        let chunks = split_date_range(date("2018-01-01"), date("2018-12-31"), 100, false).unwrap();
        for &(from, to) in &chunks {
            assert_eq!(
                split_date_range(from, to, 100, false).unwrap(),
                vec![(from, to)]
            );
        }
    }

    #[test]
    fn year_boundary_truncates_chunks() {
        let (start, end) = (date("2020-06-01"), date("2021-03-01"));
        let chunks = split_date_range(start, end, 200, true).unwrap();
        assert_eq!(
            chunks,
            vec![
                (date("2020-06-01"), date("2020-12-18")),
                (date("2020-12-19"), date("2020-12-31")),
                (date("2021-01-01"), date("2021-03-01")),
            ]
        );
        assert_covers(&chunks, start, end);
        for &(from, to) in &chunks {
            assert_eq!(from.year(), to.year(), "chunk {from} -> {to} crosses a year");
        }
    }

    #[test]
    fn rejects_non_positive_day_count() {
        for days in [0, -5] {
            assert!(matches!(
                split_date_range(date("2020-01-01"), date("2020-02-01"), days, false),
                Err(ArsoError::InvalidChunkDays(d)) if d == days
            ));
        }
    }

    #[test]
    fn rejects_inverted_range() {
        assert!(matches!(
            split_date_range(date("2020-02-01"), date("2020-01-01"), 30, false),
            Err(ArsoError::InvalidDateRange { .. })
        ));
    }
}
