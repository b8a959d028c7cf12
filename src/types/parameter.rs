//! Catalog entries: the measurement parameters the archive can serve.

use crate::types::category::ApiCategory;
use crate::types::station::StationKind;
use chrono::NaiveDate;

/// One measurement parameter from the flattened dataset catalog.
///
/// The catalog arrives as a nested category -> dataset-variant -> group ->
/// parameter tree and is walked once into a flat list of these at session
/// start; the tree itself is never kept. The list is immutable for the rest of
/// the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    /// Archive parameter id, the value sent in the `vars=` query list.
    pub id: String,
    /// Short display label, also used for wide-table column names.
    pub short_label: String,
    pub long_label: String,
    pub group_id: String,
    pub group_description: String,
    /// The cadence this parameter is served under.
    pub category: ApiCategory,
    /// Station classes that can report this parameter.
    pub station_kinds: Vec<StationKind>,
    pub unit: Option<String>,
    /// Earliest date the archive advertises data for this cadence.
    pub min_date: Option<NaiveDate>,
}
