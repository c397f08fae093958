// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading the ride dataset from CSV files.
//!
//! Column types are inferred from the cells: a column is `Int` if every non-empty cell parses
//! as `i64`, `Float` if every non-empty cell parses as `f64`, and `Str` otherwise. Empty cells
//! are null. A column with no non-empty cell at all takes the type its [`Source`] declares for
//! it (or `Str`), so header-only files still satisfy the schema.

use std::io;
use std::iter;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;
use ridelens_core::{Column, DataType, Table, TableId, Value};
use ridelens_transforms::Program;

use crate::error::AnalysisError;

/// One CSV file of the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Source {
    /// `history.csv`: one row per ride.
    History,
    /// `user.csv`: one row per user.
    User,
    /// `trip.csv`: one row per destination visited during a ride.
    Trip,
    /// `spot.csv`: destination metadata.
    Spot,
}

impl Source {
    /// Every source, in table-id order.
    pub const ALL: [Self; 4] = [Self::History, Self::User, Self::Trip, Self::Spot];

    /// Input register the table is loaded into.
    pub const fn id(self) -> TableId {
        match self {
            Self::History => TableId(1),
            Self::User => TableId(2),
            Self::Trip => TableId(3),
            Self::Spot => TableId(4),
        }
    }

    /// Short table name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::History => "history",
            Self::User => "user",
            Self::Trip => "trip",
            Self::Spot => "spot",
        }
    }

    /// File name inside the dataset directory.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::History => "history.csv",
            Self::User => "user.csv",
            Self::Trip => "trip.csv",
            Self::Spot => "spot.csv",
        }
    }

    /// Declared types, used only for columns without a single non-empty cell.
    pub const fn type_hints(self) -> &'static [(&'static str, DataType)] {
        match self {
            Self::History => &[
                ("history_id", DataType::Int),
                ("user_id", DataType::Int),
                ("started_at", DataType::Str),
                ("ended_at", DataType::Str),
                ("distance", DataType::Float),
                ("passengers_count", DataType::Int),
            ],
            Self::User => &[("user_id", DataType::Int), ("user_type", DataType::Str)],
            Self::Trip => &[("history_id", DataType::Int)],
            Self::Spot => &[],
        }
    }
}

/// The loaded input tables of one run, keyed by [`Source::id`].
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    tables: HashMap<TableId, Table>,
}

impl Dataset {
    /// Reads `sources` from `dir`.
    ///
    /// Fails on the first missing or unreadable file.
    pub fn load(dir: &Path, sources: &[Source]) -> Result<Self, AnalysisError> {
        let mut tables = HashMap::new();
        for &source in sources {
            let path = dir.join(source.file_name());
            let table = read_csv(&path, source.type_hints())?;
            tracing::info!(
                table = source.name(),
                rows = table.row_count(),
                columns = table.columns().len(),
                "loaded table"
            );
            tables.insert(source.id(), table);
        }
        Ok(Self { tables })
    }

    /// Wraps already-built tables.
    pub fn from_tables(tables: impl IntoIterator<Item = (Source, Table)>) -> Self {
        Self {
            tables: tables.into_iter().map(|(s, t)| (s.id(), t)).collect(),
        }
    }

    /// All tables, in the shape [`Program::execute`] takes.
    pub fn tables(&self) -> &HashMap<TableId, Table> {
        &self.tables
    }

    /// One table, if it was loaded.
    pub fn table(&self, source: Source) -> Option<&Table> {
        self.tables.get(&source.id())
    }

    /// Checks that `program` finds every column it reads, with a usable type.
    pub fn validate(&self, program: &Program) -> Result<(), AnalysisError> {
        program.validate(&self.tables).map_err(AnalysisError::Schema)
    }
}

/// Reads one CSV file into a table.
pub fn read_csv(path: &Path, hints: &[(&str, DataType)]) -> Result<Table, AnalysisError> {
    if !path.is_file() {
        return Err(AnalysisError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    let read_error = |source| AnalysisError::Read {
        path: path.to_path_buf(),
        source,
    };
    let file = std::fs::File::open(path).map_err(|e| read_error(csv::Error::from(e)))?;
    parse_csv(file, hints).map_err(|e| match e {
        ParseError::Csv(source) => read_error(source),
        ParseError::Table(source) => AnalysisError::Table {
            path: PathBuf::from(path),
            source,
        },
    })
}

/// Failure modes of [`parse_csv`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// Malformed CSV (ragged rows, invalid UTF-8, I/O).
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// Parsed columns do not form a table.
    #[error(transparent)]
    Table(#[from] ridelens_core::TableError),
}

/// Parses CSV text (with a header row) into a table.
pub fn parse_csv(reader: impl io::Read, hints: &[(&str, DataType)]) -> Result<Table, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, field) in cells.iter_mut().zip(record.iter()) {
            column.push((!field.is_empty()).then(|| field.to_owned()));
        }
    }

    let columns = headers
        .iter()
        .zip(cells)
        .map(|(name, cells)| {
            let hint = hints.iter().find(|(n, _)| *n == name).map(|(_, t)| *t);
            infer_column(name, cells, hint)
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Table::from_columns(columns)?)
}

fn infer_column(
    name: &str,
    cells: Vec<Option<String>>,
    hint: Option<DataType>,
) -> Result<Column, ridelens_core::TableError> {
    let mut present = cells.iter().flatten().peekable();
    if present.peek().is_none() {
        let dtype = hint.unwrap_or(DataType::Str);
        return Column::from_values(name, dtype, iter::repeat_n(Value::Null, cells.len()));
    }

    if present.all(|c| c.parse::<i64>().is_ok()) {
        let ints = cells.iter().map(|c| c.as_deref().and_then(|s| s.parse().ok()));
        return Ok(Column::int(name, ints));
    }
    if cells.iter().flatten().all(|c| c.parse::<f64>().is_ok()) {
        let floats = cells.iter().map(|c| c.as_deref().and_then(|s| s.parse().ok()));
        return Ok(Column::float(name, floats));
    }
    Ok(Column::str(name, cells))
}

#[cfg(test)]
mod tests {
    use ridelens_core::ColumnData;

    use super::*;

    const HISTORY_CSV: &str = "\
history_id,user_id,distance,started_at,passengers_count
1,10,1.5,2024-04-08 09:15:00,2
2,11,,2024-04-08 10:00:00,1
3,10,n/a,2024-04-09 11:30:00,
";

    #[test]
    fn infers_int_float_and_text() {
        let t = parse_csv(HISTORY_CSV.as_bytes(), &[]).unwrap();
        assert_eq!(t.row_count(), 3);
        assert_eq!(t.column("history_id").unwrap().data_type(), DataType::Int);
        assert_eq!(t.column("started_at").unwrap().data_type(), DataType::Str);
        assert_eq!(
            t.column("passengers_count").unwrap().data,
            ColumnData::Int(vec![Some(2), Some(1), None])
        );
        // One unparseable cell keeps the column as text; casting happens downstream.
        assert_eq!(
            t.column("distance").unwrap().data,
            ColumnData::Str(vec![Some("1.5".into()), None, Some("n/a".into())])
        );
    }

    #[test]
    fn mixed_numbers_become_float() {
        let t = parse_csv("x\n1\n2.5\n".as_bytes(), &[]).unwrap();
        assert_eq!(
            t.column("x").unwrap().data,
            ColumnData::Float(vec![Some(1.0), Some(2.5)])
        );
    }

    #[test]
    fn header_only_uses_hints() {
        let t = parse_csv(
            "user_id,user_type,note\n".as_bytes(),
            Source::User.type_hints(),
        )
        .unwrap();
        assert_eq!(t.row_count(), 0);
        assert_eq!(t.column("user_id").unwrap().data_type(), DataType::Int);
        assert_eq!(t.column("user_type").unwrap().data_type(), DataType::Str);
        assert_eq!(t.column("note").unwrap().data_type(), DataType::Str);
    }

    #[test]
    fn ragged_rows_and_duplicate_headers_fail() {
        let err = parse_csv("a,b\n1,2\n3\n".as_bytes(), &[]).unwrap_err();
        assert!(matches!(err, ParseError::Csv(_)), "{err:?}");
        let err = parse_csv("a,a\n1,2\n".as_bytes(), &[]).unwrap_err();
        assert!(matches!(err, ParseError::Table(_)), "{err:?}");
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let err = read_csv(Path::new("/nonexistent/history.csv"), &[]).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingFile { .. }), "{err}");
        assert_eq!(err.stage(), crate::Stage::Load);
    }

    #[test]
    fn source_ids_are_distinct() {
        let mut ids: Vec<u32> = Source::ALL.iter().map(|s| s.id().0).collect();
        ids.dedup();
        assert_eq!(ids, [1, 2, 3, 4]);
    }
}
