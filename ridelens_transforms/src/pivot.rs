// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense matrices pivoted out of long tables.

use hashbrown::HashMap;
use ridelens_core::{Table, TableId, Value};

use crate::program::ExecutionError;
use crate::requirements::ColumnKind;

/// A dense, row-major `rows x cols` matrix of `f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell at (`row`, `col`); out-of-range reads are `0.0`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col]
        } else {
            0.0
        }
    }

    /// Sets the cell at (`row`, `col`); out-of-range writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        if row < self.rows && col < self.cols {
            self.data[row * self.cols + col] = value;
        }
    }

    /// Sum of every cell.
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Smallest and largest cell, or `None` for an empty matrix.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        self.data.iter().fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Every cell multiplied by `factor`.
    #[must_use]
    pub fn scaled(mut self, factor: f64) -> Self {
        for v in &mut self.data {
            *v *= factor;
        }
        self
    }

    /// Cells divided by the matrix total; an all-zero matrix stays all zero.
    #[must_use]
    pub fn normalized(self) -> Self {
        let total = self.total();
        if total == 0.0 {
            self
        } else {
            self.scaled(1.0 / total)
        }
    }
}

/// Pivots a long table into a `row_levels x col_levels` matrix.
///
/// Each table row adds `value_col` to the cell addressed by its `row_col` and `col_col`
/// values. Cells with no row stay `0.0`; rows whose levels are not listed are ignored, as are
/// null values.
pub fn pivot_matrix(
    table: &Table,
    table_id: TableId,
    (row_col, row_levels): (&str, &[Value]),
    (col_col, col_levels): (&str, &[Value]),
    value_col: &str,
) -> Result<Matrix, ExecutionError> {
    let lookup = |name: &str| {
        table
            .column(name)
            .ok_or_else(|| ExecutionError::MissingColumn {
                table: table_id,
                column: name.to_owned(),
            })
    };
    let rows = lookup(row_col)?;
    let cols = lookup(col_col)?;
    let values = lookup(value_col)?;
    if !values.data_type().is_numeric() {
        return Err(ExecutionError::TypeMismatch {
            column: value_col.to_owned(),
            expected: ColumnKind::Numeric,
            found: values.data_type(),
        });
    }

    let row_index: HashMap<&Value, usize> =
        row_levels.iter().enumerate().map(|(i, v)| (v, i)).collect();
    let col_index: HashMap<&Value, usize> =
        col_levels.iter().enumerate().map(|(i, v)| (v, i)).collect();

    let mut m = Matrix::zeros(row_levels.len(), col_levels.len());
    for r in 0..table.row_count() {
        let (Some(&i), Some(&j), Some(v)) = (
            row_index.get(&rows.data.get(r)),
            col_index.get(&cols.data.get(r)),
            values.data.f64(r),
        ) else {
            continue;
        };
        m.set(i, j, m.get(i, j) + v);
    }
    Ok(m)
}
