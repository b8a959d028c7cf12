//! The top-level session tying catalog lookup, station lookup, and chunked
//! data fetching together.

use crate::archive::{ArchiveClient, DEFAULT_BASE_URL};
use crate::date_range::split_date_range;
use crate::error::ArsoError;
use crate::table::{aggregate, WideTable};
use crate::types::{
    ApiCategory, ObservationFragment, ParameterDescriptor, StationDescriptor, StationKind,
};
use crate::volume::{VolumeEstimate, DEFAULT_TARGET_CHUNK_POINTS};
use bon::bon;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// A session against one archive instance. The parameter catalog is fetched at
/// most once per session and held as an immutable snapshot. Cheap to clone;
/// clones share the snapshot.
#[derive(Debug, Clone)]
pub struct Arso {
    client: ArchiveClient,
    catalog: Arc<OnceCell<Vec<ParameterDescriptor>>>,
}

#[bon]
impl Arso {
    /// Creates a session, against the public archive unless `base_url` says
    /// otherwise.
    ///
    /// ```no_run
    /// use arso_archive::Arso;
    ///
    /// let arso = Arso::builder().build();
    /// let local = Arso::builder().base_url("http://localhost:8080").build();
    /// ```
    #[builder]
    pub fn new(#[builder(into)] base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Arso {
            client: ArchiveClient::new(reqwest::Client::new(), base_url),
            catalog: Arc::new(OnceCell::new()),
        }
    }

    /// The full dataset catalog: every queryable parameter across all
    /// cadences. Fetched on first use, then served from the session snapshot.
    pub async fn catalog(&self) -> Result<&[ParameterDescriptor], ArsoError> {
        let catalog = self
            .catalog
            .get_or_try_init(|| async { Ok::<_, ArsoError>(self.client.fetch_catalog().await?) })
            .await?;
        Ok(catalog.as_slice())
    }

    /// The catalog restricted to one cadence.
    pub async fn catalog_for(
        &self,
        category: ApiCategory,
    ) -> Result<Vec<ParameterDescriptor>, ArsoError> {
        let catalog = self.catalog().await?;
        Ok(catalog
            .iter()
            .filter(|p| p.category == category)
            .cloned()
            .collect())
    }

    /// Fetches the stations of the given types that reported within the
    /// window.
    #[builder]
    pub async fn stations(
        &self,
        date_from: NaiveDate,
        date_to: NaiveDate,
        kinds: &[StationKind],
    ) -> Result<Vec<StationDescriptor>, ArsoError> {
        if kinds.is_empty() {
            return Err(ArsoError::EmptyStationKindSelection);
        }
        check_range(date_from, date_to)?;
        Ok(self.client.fetch_stations(date_from, date_to, kinds).await?)
    }

    /// Fetches measurements for any number of stations and parameters over a
    /// date range and merges them into one wide table.
    ///
    /// The range is cut into chunks sized so each request stays near
    /// `target_chunk_points` expected data points
    /// ([`DEFAULT_TARGET_CHUNK_POINTS`] unless overridden), one request per
    /// station per chunk. Any failed request aborts the whole query.
    #[builder]
    pub async fn observations(
        &self,
        category: ApiCategory,
        parameters: &[ParameterDescriptor],
        stations: &[StationDescriptor],
        date_from: NaiveDate,
        date_to: NaiveDate,
        target_chunk_points: Option<f64>,
    ) -> Result<WideTable, ArsoError> {
        if parameters.is_empty() {
            return Err(ArsoError::EmptyParameterSelection);
        }
        if stations.is_empty() {
            return Err(ArsoError::EmptyStationSelection);
        }
        check_range(date_from, date_to)?;

        let target = target_chunk_points.unwrap_or(DEFAULT_TARGET_CHUNK_POINTS);
        let estimate =
            VolumeEstimate::for_query(category, parameters.len(), date_from, date_to, target);
        let days = estimate.days_per_chunk.max(1);
        let ranges = split_date_range(date_from, date_to, days, category.splits_at_year())?;
        log::info!(
            "expecting ~{:.0} points, fetching {} range(s) per station",
            estimate.expected_points,
            ranges.len()
        );

        let parameter_ids: Vec<String> = parameters.iter().map(|p| p.id.clone()).collect();
        let total = stations.len() * ranges.len();
        let mut fragments: Vec<ObservationFragment> = Vec::new();
        let mut done = 0;
        for station in stations {
            for (chunk_from, chunk_to) in &ranges {
                done += 1;
                log::info!(
                    "[{done}/{total}] {} ({}): {chunk_from} to {chunk_to}",
                    station.name,
                    station.id
                );
                let chunk = self
                    .client
                    .fetch_observations(
                        category,
                        &parameter_ids,
                        &station.id,
                        *chunk_from,
                        *chunk_to,
                    )
                    .await?;
                fragments.extend(chunk);
            }
        }

        aggregate(&fragments, stations)
    }
}

fn check_range(date_from: NaiveDate, date_to: NaiveDate) -> Result<(), ArsoError> {
    if date_from > date_to {
        return Err(ArsoError::InvalidDateRange {
            start: date_from,
            end: date_to,
        });
    }
    Ok(())
}
