// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-oriented owned tables.

use chrono::NaiveDateTime;

use crate::value::{DataType, Value};

/// Errors returned when assembling a [`Table`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A column's length differs from the table's row count.
    #[error("column `{column}` has {found} rows, expected {expected}")]
    LengthMismatch {
        /// Offending column.
        column: String,
        /// Row count of the table.
        expected: usize,
        /// Row count of the column.
        found: usize,
    },
    /// Two columns share a name.
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),
    /// A value does not match the column's data type.
    #[error("column `{column}` holds {expected} values, got {found}")]
    TypeMismatch {
        /// Offending column.
        column: String,
        /// Column type.
        expected: DataType,
        /// Value type.
        found: DataType,
    },
}

/// Typed, nullable column storage.
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    /// Integer cells.
    Int(Vec<Option<i64>>),
    /// Float cells.
    Float(Vec<Option<f64>>),
    /// String cells.
    Str(Vec<Option<String>>),
    /// Timestamp cells.
    DateTime(Vec<Option<NaiveDateTime>>),
}

impl ColumnData {
    /// Creates empty storage for `dtype`.
    pub fn empty(dtype: DataType) -> Self {
        Self::with_capacity(dtype, 0)
    }

    /// Creates empty storage for `dtype` with room for `capacity` cells.
    pub fn with_capacity(dtype: DataType, capacity: usize) -> Self {
        match dtype {
            DataType::Int => Self::Int(Vec::with_capacity(capacity)),
            DataType::Float => Self::Float(Vec::with_capacity(capacity)),
            DataType::Str => Self::Str(Vec::with_capacity(capacity)),
            DataType::DateTime => Self::DateTime(Vec::with_capacity(capacity)),
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        match self {
            Self::Int(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Str(v) => v.len(),
            Self::DateTime(v) => v.len(),
        }
    }

    /// Returns `true` if there are no cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Logical type of the storage.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Int(_) => DataType::Int,
            Self::Float(_) => DataType::Float,
            Self::Str(_) => DataType::Str,
            Self::DateTime(_) => DataType::DateTime,
        }
    }

    /// Returns the cell at `row` as an owned [`Value`] (`Null` when missing or out of range).
    pub fn get(&self, row: usize) -> Value {
        match self {
            Self::Int(v) => v.get(row).copied().flatten().into(),
            Self::Float(v) => v.get(row).copied().flatten().into(),
            Self::Str(v) => v.get(row).cloned().flatten().into(),
            Self::DateTime(v) => v.get(row).copied().flatten().into(),
        }
    }

    /// Returns `true` if the cell at `row` is missing.
    pub fn is_null(&self, row: usize) -> bool {
        match self {
            Self::Int(v) => v.get(row).is_none_or(Option::is_none),
            Self::Float(v) => v.get(row).is_none_or(Option::is_none),
            Self::Str(v) => v.get(row).is_none_or(Option::is_none),
            Self::DateTime(v) => v.get(row).is_none_or(Option::is_none),
        }
    }

    /// Numeric view of the cell at `row`.
    pub fn f64(&self, row: usize) -> Option<f64> {
        match self {
            Self::Int(v) => v.get(row).copied().flatten().map(|x| x as f64),
            Self::Float(v) => v.get(row).copied().flatten(),
            _ => None,
        }
    }

    /// String view of the cell at `row`.
    pub fn str(&self, row: usize) -> Option<&str> {
        match self {
            Self::Str(v) => v.get(row)?.as_deref(),
            _ => None,
        }
    }

    /// Appends a value, checking it against the storage type.
    ///
    /// `Int` values are accepted by float storage.
    pub fn push(&mut self, value: Value) -> Result<(), DataType> {
        match (self, value) {
            (Self::Int(v), Value::Null) => v.push(None),
            (Self::Float(v), Value::Null) => v.push(None),
            (Self::Str(v), Value::Null) => v.push(None),
            (Self::DateTime(v), Value::Null) => v.push(None),
            (Self::Int(v), Value::Int(x)) => v.push(Some(x)),
            (Self::Float(v), Value::Float(x)) => v.push(Some(x)),
            (Self::Float(v), Value::Int(x)) => v.push(Some(x as f64)),
            (Self::Str(v), Value::Str(x)) => v.push(Some(x)),
            (Self::DateTime(v), Value::DateTime(x)) => v.push(Some(x)),
            (_, other) => return Err(other.data_type().unwrap_or(DataType::Str)),
        }
        Ok(())
    }

    /// Gathers the cells at `rows` (in that order) into new storage.
    ///
    /// `None` entries produce nulls, which is how outer joins pad unmatched rows.
    pub fn take(&self, rows: &[Option<usize>]) -> Self {
        fn gather<T: Clone>(v: &[Option<T>], rows: &[Option<usize>]) -> Vec<Option<T>> {
            rows.iter()
                .map(|r| r.and_then(|r| v.get(r).cloned().flatten()))
                .collect()
        }
        match self {
            Self::Int(v) => Self::Int(gather(v, rows)),
            Self::Float(v) => Self::Float(gather(v, rows)),
            Self::Str(v) => Self::Str(gather(v, rows)),
            Self::DateTime(v) => Self::DateTime(gather(v, rows)),
        }
    }
}

/// A named column.
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    /// Column name, unique within its table.
    pub name: String,
    /// Cell storage.
    pub data: ColumnData,
}

impl Column {
    /// Creates a column.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Creates an integer column.
    pub fn int(name: impl Into<String>, cells: impl IntoIterator<Item = Option<i64>>) -> Self {
        Self::new(name, ColumnData::Int(cells.into_iter().collect()))
    }

    /// Creates a float column.
    pub fn float(name: impl Into<String>, cells: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self::new(name, ColumnData::Float(cells.into_iter().collect()))
    }

    /// Creates a string column.
    pub fn str<S: Into<String>>(
        name: impl Into<String>,
        cells: impl IntoIterator<Item = Option<S>>,
    ) -> Self {
        Self::new(
            name,
            ColumnData::Str(cells.into_iter().map(|c| c.map(Into::into)).collect()),
        )
    }

    /// Creates a timestamp column.
    pub fn datetime(
        name: impl Into<String>,
        cells: impl IntoIterator<Item = Option<NaiveDateTime>>,
    ) -> Self {
        Self::new(name, ColumnData::DateTime(cells.into_iter().collect()))
    }

    /// Builds a column of `dtype` from owned values.
    pub fn from_values(
        name: impl Into<String>,
        dtype: DataType,
        values: impl IntoIterator<Item = Value>,
    ) -> Result<Self, TableError> {
        let name = name.into();
        let mut data = ColumnData::empty(dtype);
        for v in values {
            data.push(v).map_err(|found| TableError::TypeMismatch {
                column: name.clone(),
                expected: dtype,
                found,
            })?;
        }
        Ok(Self { name, data })
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the column has no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Logical type of the column.
    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }
}

/// An immutable, column-oriented table.
///
/// All columns have the same length. Tables are values: transforms produce new tables rather
/// than mutating their inputs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    row_count: usize,
}

impl Table {
    /// Creates an empty table with zero columns and zero rows.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from columns, validating lengths and names.
    pub fn from_columns(columns: Vec<Column>) -> Result<Self, TableError> {
        let mut table = Self::new();
        for c in columns {
            table.push_column(c)?;
        }
        Ok(table)
    }

    /// Creates a table with the given columns and zero rows.
    pub fn empty_like(schema: &[(String, DataType)]) -> Self {
        Self {
            columns: schema
                .iter()
                .map(|(name, dtype)| Column::new(name.clone(), ColumnData::empty(*dtype)))
                .collect(),
            row_count: 0,
        }
    }

    /// Appends a column.
    ///
    /// The first column fixes the row count of a column-less table.
    pub fn push_column(&mut self, column: Column) -> Result<(), TableError> {
        if self.column(&column.name).is_some() {
            return Err(TableError::DuplicateColumn(column.name));
        }
        if self.columns.is_empty() {
            self.row_count = column.len();
        } else if column.len() != self.row_count {
            let found = column.len();
            return Err(TableError::LengthMismatch {
                column: column.name,
                expected: self.row_count,
                found,
            });
        }
        self.columns.push(column);
        Ok(())
    }

    /// Replaces a column of the same name, or appends it if absent.
    pub fn set_column(&mut self, column: Column) -> Result<(), TableError> {
        match self.columns.iter().position(|c| c.name == column.name) {
            Some(idx) => {
                if column.len() != self.row_count {
                    let found = column.len();
                    return Err(TableError::LengthMismatch {
                        column: column.name,
                        expected: self.row_count,
                        found,
                    });
                }
                self.columns[idx] = column;
                Ok(())
            }
            None => self.push_column(column),
        }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Columns in order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// `(name, type)` pairs in order.
    pub fn schema(&self) -> Vec<(String, DataType)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.data_type()))
            .collect()
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the cell at (`row`, `column`), or `None` if the column does not exist.
    pub fn value(&self, row: usize, column: &str) -> Option<Value> {
        self.column(column).map(|c| c.data.get(row))
    }

    /// Gathers the given rows (in order) into a new table with the same schema.
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        let rows: Vec<Option<usize>> = rows.iter().copied().map(Some).collect();
        self.take_optional_rows(&rows)
    }

    /// Like [`Table::take_rows`], but `None` entries become all-null rows.
    pub fn take_optional_rows(&self, rows: &[Option<usize>]) -> Self {
        Self {
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), c.data.take(rows)))
                .collect(),
            row_count: rows.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_columns(vec![
            Column::int("id", [Some(1), Some(2), None]),
            Column::str("kind", [Some("a"), None, Some("c")]),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_ragged_columns() {
        let mut t = sample();
        let err = t
            .push_column(Column::float("x", [Some(1.0)]))
            .unwrap_err();
        assert!(matches!(err, TableError::LengthMismatch { expected: 3, found: 1, .. }));
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut t = sample();
        let err = t.push_column(Column::int("id", [None, None, None])).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("id".into()));
    }

    #[test]
    fn take_optional_rows_pads_with_nulls() {
        let t = sample();
        let out = t.take_optional_rows(&[Some(2), None, Some(0)]);
        assert_eq!(out.row_count(), 3);
        assert_eq!(out.value(0, "kind"), Some(Value::from("c")));
        assert!(out.value(1, "id").unwrap().is_null());
        assert_eq!(out.value(2, "id"), Some(Value::Int(1)));
    }

    #[test]
    fn from_values_checks_types() {
        let err =
            Column::from_values("n", DataType::Int, [Value::Int(1), Value::from("x")]).unwrap_err();
        assert!(matches!(err, TableError::TypeMismatch { found: DataType::Str, .. }));

        let ok = Column::from_values("f", DataType::Float, [Value::Int(2), Value::Null]).unwrap();
        assert_eq!(ok.data, ColumnData::Float(vec![Some(2.0), None]));
    }
}
