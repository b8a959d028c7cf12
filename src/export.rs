//! CSV export of a wide table.

use crate::error::ArsoError;
use crate::table::WideTable;
use std::path::Path;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Writes the table to `path` as CSV: a `time` column followed by one column
/// per station/parameter pair, missing readings as empty cells.
pub fn write_csv(table: &WideTable, path: &Path) -> Result<(), ArsoError> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["time".to_string()];
    header.extend(table.columns().iter().map(|c| c.label.clone()));
    writer.write_record(&header)?;

    for (row, timestamp) in table.timestamps().iter().enumerate() {
        let mut record = vec![timestamp.format(TIME_FORMAT).to_string()];
        record.extend(table.columns().iter().map(|c| match c.values[row] {
            Some(value) => format!("{value}"),
            None => String::new(),
        }));
        writer.write_record(&record)?;
    }

    writer.flush()?;
    Ok(())
}
