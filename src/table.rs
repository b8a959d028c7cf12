//! Pivots raw observation fragments into a dense station-by-parameter table.

use crate::error::ArsoError;
use crate::types::{DataParameter, ObservationFragment, StationDescriptor};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet};

/// One `station/parameter` column, row-aligned with the owning table's
/// timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub station_id: String,
    pub parameter_id: String,
    /// `"<station name>/<short label>"`.
    pub label: String,
    pub values: Vec<Option<f64>>,
}

/// A dense timestamp-by-column table merged from any number of fetch
/// responses. Rows are sorted by timestamp; rows where every column is empty
/// are dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    timestamps: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl WideTable {
    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }
}

/// Merges fragments from any number of responses into one wide table.
///
/// The result does not depend on fragment order. Fragments may cover different
/// stations, date ranges, and parameter subsets; every (station, parameter)
/// pair seen anywhere becomes a column, with gaps left as `None`. Responses
/// that disagree about a parameter id's metadata are rejected rather than
/// merged.
pub fn aggregate(
    fragments: &[ObservationFragment],
    stations: &[StationDescriptor],
) -> Result<WideTable, ArsoError> {
    let mut meta: BTreeMap<&str, &DataParameter> = BTreeMap::new();
    for fragment in fragments {
        for (pid, parameter) in fragment.parameters.iter() {
            match meta.get(pid.as_str()) {
                None => {
                    meta.insert(pid, parameter);
                }
                Some(known) if *known == parameter => {}
                Some(_) => {
                    return Err(ArsoError::ParameterMismatch { id: pid.clone() });
                }
            }
        }
    }

    let timestamps: BTreeSet<NaiveDateTime> = fragments.iter().map(|f| f.timestamp).collect();
    let row_of: BTreeMap<NaiveDateTime, usize> = timestamps
        .iter()
        .enumerate()
        .map(|(row, ts)| (*ts, row))
        .collect();

    let keys: BTreeSet<(&str, &str)> = fragments
        .iter()
        .flat_map(|f| {
            f.values
                .keys()
                .map(move |pid| (f.station_id.as_str(), pid.as_str()))
        })
        .collect();

    let mut cells: BTreeMap<(&str, &str), Vec<Option<f64>>> = keys
        .iter()
        .map(|key| (*key, vec![None; timestamps.len()]))
        .collect();
    for fragment in fragments {
        let row = row_of[&fragment.timestamp];
        for (pid, value) in &fragment.values {
            // The key set was collected from these same fragments.
            if let Some(column) = cells.get_mut(&(fragment.station_id.as_str(), pid.as_str())) {
                column[row] = value.as_f64();
            }
        }
    }

    // Rows with no readings in any column carry no information.
    let keep: Vec<bool> = (0..timestamps.len())
        .map(|row| cells.values().any(|values| values[row].is_some()))
        .collect();
    let timestamps: Vec<NaiveDateTime> = timestamps
        .into_iter()
        .zip(&keep)
        .filter(|(_, keep)| **keep)
        .map(|(ts, _)| ts)
        .collect();

    let names: BTreeMap<&str, &str> = stations
        .iter()
        .map(|s| (s.id.as_str(), s.name.as_str()))
        .collect();
    let columns = cells
        .into_iter()
        .map(|((station_id, pid), values)| {
            let station_label = names.get(station_id).copied().unwrap_or_else(|| {
                log::warn!("no station record for id {station_id}, labeling by id");
                station_id
            });
            let parameter_label = meta
                .get(pid)
                .map(|p| p.short_label.as_str())
                .unwrap_or(pid);
            Column {
                station_id: station_id.to_string(),
                parameter_id: pid.to_string(),
                label: format!("{station_label}/{parameter_label}"),
                values: values
                    .into_iter()
                    .zip(&keep)
                    .filter(|(_, keep)| **keep)
                    .map(|(v, _)| v)
                    .collect(),
            }
        })
        .collect();

    Ok(WideTable {
        timestamps,
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{timestamp_from_minutes, ObservedValue, ParameterMeta, StationKind};
    use std::sync::Arc;

    fn meta(pairs: &[(&str, &str)]) -> ParameterMeta {
        Arc::new(
            pairs
                .iter()
                .map(|(pid, label)| {
                    (
                        pid.to_string(),
                        DataParameter {
                            short_label: label.to_string(),
                            long_label: None,
                            unit: None,
                        },
                    )
                })
                .collect(),
        )
    }

    fn fragment(
        station: &str,
        minutes: i64,
        values: &[(&str, ObservedValue)],
        parameters: &ParameterMeta,
    ) -> ObservationFragment {
        ObservationFragment {
            station_id: station.to_string(),
            timestamp: timestamp_from_minutes(minutes),
            values: values
                .iter()
                .map(|(pid, v)| (pid.to_string(), *v))
                .collect(),
            parameters: Arc::clone(parameters),
        }
    }

    fn station(id: &str, name: &str) -> StationDescriptor {
        StationDescriptor {
            id: id.to_string(),
            name: name.to_string(),
            lon: 14.5,
            lat: 46.0,
            altitude: None,
            kind: StationKind::Main,
        }
    }

    #[test]
    fn merges_stations_and_ranges_into_one_grid() {
        let params = meta(&[("p1", "temperature"), ("p2", "snow cover")]);
        let fragments = vec![
            fragment(
                "30",
                1440,
                &[
                    ("p1", ObservedValue::Number(5.3)),
                    ("p2", ObservedValue::Flag(true)),
                ],
                &params,
            ),
            fragment(
                "30",
                2880,
                &[
                    ("p1", ObservedValue::Number(6.1)),
                    ("p2", ObservedValue::Missing),
                ],
                &params,
            ),
            fragment("40", 1440, &[("p1", ObservedValue::Number(-1.0))], &params),
        ];
        let stations = [station("30", "LJUBLJANA"), station("40", "KREDARICA")];

        let table = aggregate(&fragments, &stations).unwrap();
        assert_eq!(table.num_rows(), 2);
        assert_eq!(
            table.timestamps(),
            &[timestamp_from_minutes(1440), timestamp_from_minutes(2880)]
        );

        let labels: Vec<&str> = table.columns().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "LJUBLJANA/temperature",
                "LJUBLJANA/snow cover",
                "KREDARICA/temperature"
            ]
        );
        assert_eq!(table.columns()[0].values, vec![Some(5.3), Some(6.1)]);
        assert_eq!(table.columns()[1].values, vec![Some(1.0), None]);
        // Station 40 has no reading at the second timestamp.
        assert_eq!(table.columns()[2].values, vec![Some(-1.0), None]);
    }

    #[test]
    fn result_is_fragment_order_invariant() {
        let params = meta(&[("p1", "temperature")]);
        let mut fragments = vec![
            fragment("30", 2880, &[("p1", ObservedValue::Number(2.0))], &params),
            fragment("40", 1440, &[("p1", ObservedValue::Number(3.0))], &params),
            fragment("30", 1440, &[("p1", ObservedValue::Number(1.0))], &params),
        ];
        let stations = [station("30", "A"), station("40", "B")];

        let forward = aggregate(&fragments, &stations).unwrap();
        fragments.reverse();
        let reversed = aggregate(&fragments, &stations).unwrap();
        assert_eq!(forward, reversed);
    }

    #[test]
    fn all_missing_rows_are_dropped() {
        let params = meta(&[("p1", "temperature")]);
        let fragments = vec![
            fragment("30", 1440, &[("p1", ObservedValue::Number(1.0))], &params),
            fragment("30", 2880, &[("p1", ObservedValue::Missing)], &params),
            fragment("30", 4320, &[("p1", ObservedValue::Number(3.0))], &params),
        ];
        let table = aggregate(&fragments, &[station("30", "A")]).unwrap();
        assert_eq!(
            table.timestamps(),
            &[timestamp_from_minutes(1440), timestamp_from_minutes(4320)]
        );
        assert_eq!(table.columns()[0].values, vec![Some(1.0), Some(3.0)]);
    }

    #[test]
    fn conflicting_parameter_metadata_is_rejected() {
        let first = meta(&[("p1", "temperature")]);
        let second = meta(&[("p1", "pressure")]);
        let fragments = vec![
            fragment("30", 1440, &[("p1", ObservedValue::Number(1.0))], &first),
            fragment("30", 2880, &[("p1", ObservedValue::Number(2.0))], &second),
        ];
        assert!(matches!(
            aggregate(&fragments, &[station("30", "A")]),
            Err(ArsoError::ParameterMismatch { id }) if id == "p1"
        ));
    }

    #[test]
    fn unknown_station_falls_back_to_its_id() {
        let params = meta(&[("p1", "temperature")]);
        let fragments = vec![fragment(
            "99",
            1440,
            &[("p1", ObservedValue::Number(1.0))],
            &params,
        )];
        let table = aggregate(&fragments, &[]).unwrap();
        assert_eq!(table.columns()[0].label, "99/temperature");
    }

    #[test]
    fn no_fragments_make_an_empty_table() {
        let table = aggregate(&[], &[]).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.num_rows(), 0);
        assert!(table.columns().is_empty());
    }
}
