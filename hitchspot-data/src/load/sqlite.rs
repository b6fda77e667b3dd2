//! SQLite reader for the `points` table of a community dump.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use hitchspot_core::SpotRow;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags};

use super::columns::{Cell, Column, apply, recognise};
use super::{LoadError, SPOT_TABLES};

pub(super) fn read_sqlite(path: &Utf8Path) -> Result<Vec<SpotRow>, LoadError> {
    if !hitchspot_fs::is_regular_file(path).unwrap_or(false) {
        return Err(LoadError::Open {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }
    let connection = Connection::open_with_flags(path.as_std_path(), OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|source| LoadError::Database {
            path: path.to_path_buf(),
            source,
        })?;

    let found = table_names(&connection).map_err(|source| LoadError::Query {
        path: path.to_path_buf(),
        table: "sqlite_master".to_owned(),
        source,
    })?;
    let Some(table) = SPOT_TABLES
        .into_iter()
        .find(|candidate| found.iter().any(|name| name == candidate))
    else {
        return Err(LoadError::MissingTable {
            path: path.to_path_buf(),
            found,
        });
    };

    log::debug!("Reading spots from table {table} in {path}");
    read_table(&connection, table).map_err(|source| LoadError::Query {
        path: path.to_path_buf(),
        table: table.to_owned(),
        source,
    })
}

fn table_names(connection: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut statement =
        connection.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let names = statement.query_map([], |row| row.get::<_, String>(0))?;
    names.collect()
}

fn read_table(connection: &Connection, table: &str) -> rusqlite::Result<Vec<SpotRow>> {
    // `table` is one of the fixed names in `SPOT_TABLES`.
    let mut statement = connection.prepare(&format!("SELECT * FROM \"{table}\""))?;
    let columns: Vec<Option<Column>> = recognise(statement.column_names());

    let mut rows = statement.query([])?;
    let mut spots = Vec::new();
    while let Some(source) = rows.next()? {
        let mut row = SpotRow::default();
        for (index, column) in columns.iter().enumerate() {
            if let Some(column) = column {
                apply(&mut row, *column, cell(source.get_ref(index)?));
            }
        }
        spots.push(row);
    }
    Ok(spots)
}

fn cell(value: ValueRef<'_>) -> Cell<'_> {
    match value {
        ValueRef::Null | ValueRef::Blob(_) => Cell::Missing,
        ValueRef::Integer(value) => Cell::Integer(value),
        ValueRef::Real(value) => Cell::Real(value),
        ValueRef::Text(bytes) => std::str::from_utf8(bytes).map_or(Cell::Missing, Cell::Text),
    }
}
