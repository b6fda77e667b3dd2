//! CSV reader.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use hitchspot_core::SpotRow;

use super::LoadError;
use super::columns::{Cell, apply, recognise};

pub(super) fn read_csv(path: &Utf8Path) -> Result<Vec<SpotRow>, LoadError> {
    let file = hitchspot_fs::open_utf8_file(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(file);
    let columns = recognise(reader.headers().map_err(csv_error)?.iter());
    if !columns.iter().any(Option::is_some) {
        log::warn!("{path} has no recognised spot columns");
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        let mut row = SpotRow::default();
        for (column, field) in columns.iter().zip(record.iter()) {
            if let Some(column) = column {
                apply(&mut row, *column, Cell::Text(field));
            }
        }
        rows.push(row);
    }
    Ok(rows)
}
