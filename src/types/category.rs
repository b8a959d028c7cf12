//! The sampling cadences the archive serves.

use std::fmt;

/// One of the archive's dataset cadences. The variant determines the `type=`
/// query value, the expected response shape, and the sampling frequency used
/// for chunk sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ApiCategory {
    HalfHourly,
    Daily,
    Monthly,
    Yearly,
    /// Yearly responses that nest monthly buckets inside each year. These
    /// requests must not cross a calendar-year boundary.
    YearlyWithMonths,
}

impl ApiCategory {
    pub const ALL: [ApiCategory; 5] = [
        ApiCategory::HalfHourly,
        ApiCategory::Daily,
        ApiCategory::Monthly,
        ApiCategory::Yearly,
        ApiCategory::YearlyWithMonths,
    ];

    /// The identifier the archive uses for this cadence, both in the catalog's
    /// dataset-variant `url` field and in the `type=` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiCategory::HalfHourly => "halfhourly",
            ApiCategory::Daily => "daily",
            ApiCategory::Monthly => "monthly",
            ApiCategory::Yearly => "yearly",
            ApiCategory::YearlyWithMonths => "yearly-with-months",
        }
    }

    pub fn from_url(url: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == url)
    }

    /// Nominal observations per second, used to estimate result volume.
    /// Monthly and yearly cadences use flat 30/365-day month/year lengths;
    /// this feeds a sizing heuristic, not date arithmetic.
    pub fn frequency_hz(&self) -> f64 {
        match self {
            ApiCategory::HalfHourly => 1.0 / (30.0 * 60.0),
            ApiCategory::Daily => 1.0 / (24.0 * 60.0 * 60.0),
            ApiCategory::Monthly => 1.0 / (30.0 * 24.0 * 60.0 * 60.0),
            ApiCategory::Yearly => 1.0 / (365.0 * 24.0 * 60.0 * 60.0),
            ApiCategory::YearlyWithMonths => 1.0 / (12.0 * 24.0 * 60.0 * 60.0),
        }
    }

    /// Whether requests for this cadence must be split at year boundaries.
    pub fn splits_at_year(&self) -> bool {
        matches!(self, ApiCategory::YearlyWithMonths)
    }
}

impl fmt::Display for ApiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ApiCategory;

    #[test]
    fn url_round_trip() {
        for category in ApiCategory::ALL {
            assert_eq!(ApiCategory::from_url(category.as_str()), Some(category));
        }
        assert_eq!(ApiCategory::from_url("weekly"), None);
    }

    #[test]
    fn half_hourly_frequency() {
        assert_eq!(ApiCategory::HalfHourly.frequency_hz(), 1.0 / 1800.0);
    }

    #[test]
    fn only_yearly_with_months_splits_at_year() {
        for category in ApiCategory::ALL {
            assert_eq!(
                category.splits_at_year(),
                category == ApiCategory::YearlyWithMonths
            );
        }
    }
}
