// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pulling plot-ready vectors out of tables.

use std::collections::BTreeSet;

use ridelens_core::{Column, Table, TableId};

use crate::program::ExecutionError;
use crate::requirements::ColumnKind;

fn lookup<'a>(table: &'a Table, id: TableId, name: &str) -> Result<&'a Column, ExecutionError> {
    table
        .column(name)
        .ok_or_else(|| ExecutionError::MissingColumn {
            table: id,
            column: name.to_owned(),
        })
}

/// Non-null numeric values of `column`, in row order.
pub fn numeric_values(
    table: &Table,
    id: TableId,
    column: &str,
) -> Result<Vec<f64>, ExecutionError> {
    let c = lookup(table, id, column)?;
    if !c.data_type().is_numeric() {
        return Err(ExecutionError::TypeMismatch {
            column: column.to_owned(),
            expected: ColumnKind::Numeric,
            found: c.data_type(),
        });
    }
    Ok((0..table.row_count()).filter_map(|r| c.data.f64(r)).collect())
}

/// Non-null numeric values of `value_column`, split by the text `category_column`.
///
/// The result has one entry per `categories` element, in that order. Rows whose category is
/// null or unlisted, or whose value is null, are skipped.
pub fn values_by_category(
    table: &Table,
    id: TableId,
    category_column: &str,
    value_column: &str,
    categories: &[String],
) -> Result<Vec<Vec<f64>>, ExecutionError> {
    let cat = lookup(table, id, category_column)?;
    if !ColumnKind::Text.accepts(cat.data_type()) {
        return Err(ExecutionError::TypeMismatch {
            column: category_column.to_owned(),
            expected: ColumnKind::Text,
            found: cat.data_type(),
        });
    }
    let values = lookup(table, id, value_column)?;
    if !values.data_type().is_numeric() {
        return Err(ExecutionError::TypeMismatch {
            column: value_column.to_owned(),
            expected: ColumnKind::Numeric,
            found: values.data_type(),
        });
    }
    let mut out = vec![Vec::new(); categories.len()];
    for r in 0..table.row_count() {
        let (Some(c), Some(v)) = (cat.data.str(r), values.data.f64(r)) else {
            continue;
        };
        if let Some(i) = categories.iter().position(|k| k == c) {
            out[i].push(v);
        }
    }
    Ok(out)
}

/// Sorted distinct non-null strings of `column`.
pub fn distinct_strings(
    table: &Table,
    id: TableId,
    column: &str,
) -> Result<Vec<String>, ExecutionError> {
    let c = lookup(table, id, column)?;
    let set: BTreeSet<&str> = (0..table.row_count()).filter_map(|r| c.data.str(r)).collect();
    Ok(set.into_iter().map(str::to_owned).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_columns(vec![
            Column::str(
                "user_type",
                [Some("student"), Some("staff"), None, Some("staff"), Some("guest")],
            ),
            Column::float("distance", [Some(1.0), Some(2.0), Some(3.0), None, Some(5.0)]),
        ])
        .unwrap()
    }

    #[test]
    fn splits_by_listed_categories() {
        let cats = vec!["staff".to_owned(), "student".to_owned()];
        let groups =
            values_by_category(&table(), TableId(1), "user_type", "distance", &cats).unwrap();
        assert_eq!(groups, vec![vec![2.0], vec![1.0]]);
    }

    #[test]
    fn distinct_is_sorted() {
        let d = distinct_strings(&table(), TableId(1), "user_type").unwrap();
        assert_eq!(d, ["guest", "staff", "student"]);
    }

    #[test]
    fn numeric_values_rejects_text() {
        let err = numeric_values(&table(), TableId(1), "user_type").unwrap_err();
        assert!(matches!(err, ExecutionError::TypeMismatch { .. }));
        assert_eq!(
            numeric_values(&table(), TableId(1), "distance").unwrap(),
            vec![1.0, 2.0, 3.0, 5.0]
        );
    }
}
