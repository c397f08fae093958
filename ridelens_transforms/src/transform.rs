// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform IR types.

use ridelens_core::{TableId, Value};

/// Aggregation operation for [`Transform::Aggregate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AggregateOp {
    /// Count rows in the group (nulls included).
    Count,
    /// Sum values (skips nulls).
    Sum,
    /// Minimum value (skips nulls).
    Min,
    /// Maximum value (skips nulls).
    Max,
    /// Mean value (skips nulls; null for an all-null group).
    Mean,
    /// Median value (skips nulls; null for an all-null group).
    Median,
    /// Quantile in `[0, 1]` using nearest-rank interpolation.
    Quantile(f64),
}

/// A single aggregated output field.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateField {
    /// Operation to apply.
    pub op: AggregateOp,
    /// Input column (`None` only for [`AggregateOp::Count`]).
    pub input: Option<String>,
    /// Output column name.
    pub output: String,
}

impl AggregateField {
    /// Row count per group.
    pub fn count(output: impl Into<String>) -> Self {
        Self {
            op: AggregateOp::Count,
            input: None,
            output: output.into(),
        }
    }

    /// `op` over `input`, written to `output`.
    pub fn new(op: AggregateOp, input: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            op,
            input: Some(input.into()),
            output: output.into(),
        }
    }
}

/// Sorting order for [`Transform::Sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

/// One key of a multi-column sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Column to sort by.
    pub column: String,
    /// Sort order.
    pub order: SortOrder,
}

impl SortKey {
    /// Ascending key.
    pub fn asc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Asc,
        }
    }

    /// Descending key.
    pub fn desc(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            order: SortOrder::Desc,
        }
    }
}

/// Comparison operators for predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

/// A row predicate used by [`Transform::Filter`].
///
/// Comparisons against a null cell are false, matching SQL-style filtering.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Compare a column against a constant.
    Compare {
        /// Column to read.
        column: String,
        /// Comparison operator.
        op: CompareOp,
        /// Right-hand constant.
        value: Value,
    },
    /// The cell is not null.
    NotNull(String),
    /// All sub-predicates hold.
    And(Vec<Predicate>),
}

impl Predicate {
    /// `column <op> value`.
    pub fn compare(column: impl Into<String>, op: CompareOp, value: impl Into<Value>) -> Self {
        Self::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    /// `column == value`.
    pub fn equals(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::compare(column, CompareOp::Eq, value)
    }

    /// Every listed column is non-null (a "drop nulls" filter).
    pub fn not_null<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        Self::And(
            columns
                .into_iter()
                .map(|c| Self::NotNull(c.into()))
                .collect(),
        )
    }

    /// Conjunction of `self` and `other`, flattening nested `And`s.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let mut parts = match self {
            Self::And(parts) => parts,
            p => vec![p],
        };
        match other {
            Self::And(more) => parts.extend(more),
            p => parts.push(p),
        }
        Self::And(parts)
    }

    /// Columns read by this predicate (with repeats).
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Self::Compare { column, .. } | Self::NotNull(column) => vec![column.as_str()],
            Self::And(parts) => parts.iter().flat_map(Self::columns).collect(),
        }
    }
}

/// Join kind for [`Transform::Join`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Keep every left row; unmatched rows get nulls on the right side.
    Left,
    /// Keep only matching pairs.
    Inner,
    /// Cartesian product (no keys).
    Cross,
}

/// Column derivations for [`Transform::Derive`].
///
/// Each derivation writes `output`; an existing column of that name is replaced in place,
/// otherwise the column is appended.
#[derive(Debug, Clone, PartialEq)]
pub enum Derive {
    /// Parse text into timestamps; unparseable cells become null.
    ParseDateTime {
        /// Text (or timestamp) column.
        column: String,
        /// Output column.
        output: String,
    },
    /// Day of week, `0` = Monday .. `6` = Sunday.
    Weekday {
        /// Timestamp column.
        column: String,
        /// Output column.
        output: String,
    },
    /// Hour of day, `0..=23`.
    Hour {
        /// Timestamp column.
        column: String,
        /// Output column.
        output: String,
    },
    /// Whole minutes from `start` to `end`, truncated toward zero.
    DurationMinutes {
        /// Start timestamp column.
        start: String,
        /// End timestamp column.
        end: String,
        /// Output column.
        output: String,
    },
    /// Cast to float; unparseable text becomes null.
    CastFloat {
        /// Source column.
        column: String,
        /// Output column.
        output: String,
    },
    /// Cast to integer; a non-integral float is an error.
    CastInt {
        /// Source column.
        column: String,
        /// Output column.
        output: String,
    },
    /// Label integers as `"1"`, `"2"`, ... below `threshold` and `"{threshold}+"` at or above it.
    ThresholdBin {
        /// Integer column.
        column: String,
        /// Output column.
        output: String,
        /// First value folded into the open-ended bin.
        threshold: i64,
    },
    /// Replace nulls in `column` with `value`.
    FillNull {
        /// Column to fill in place.
        column: String,
        /// Replacement value.
        value: Value,
    },
    /// `numerator / denominator` as float; null when either side is null or the denominator is 0.
    Ratio {
        /// Numerator column.
        numerator: String,
        /// Denominator column.
        denominator: String,
        /// Output column.
        output: String,
    },
}

impl Derive {
    /// Columns read by this derivation.
    pub fn inputs(&self) -> Vec<&str> {
        match self {
            Self::ParseDateTime { column, .. }
            | Self::Weekday { column, .. }
            | Self::Hour { column, .. }
            | Self::CastFloat { column, .. }
            | Self::CastInt { column, .. }
            | Self::ThresholdBin { column, .. }
            | Self::FillNull { column, .. } => vec![column.as_str()],
            Self::DurationMinutes { start, end, .. } => vec![start.as_str(), end.as_str()],
            Self::Ratio {
                numerator,
                denominator,
                ..
            } => vec![numerator.as_str(), denominator.as_str()],
        }
    }

    /// Column written by this derivation.
    pub fn output(&self) -> &str {
        match self {
            Self::ParseDateTime { output, .. }
            | Self::Weekday { output, .. }
            | Self::Hour { output, .. }
            | Self::DurationMinutes { output, .. }
            | Self::CastFloat { output, .. }
            | Self::CastInt { output, .. }
            | Self::ThresholdBin { output, .. }
            | Self::Ratio { output, .. } => output,
            Self::FillNull { column, .. } => column,
        }
    }
}

/// A table transform from input table(s) to an output table.
#[derive(Debug, Clone, PartialEq)]
pub enum Transform {
    /// Keep only rows that satisfy a predicate. All columns are carried through.
    Filter {
        /// Input table.
        input: TableId,
        /// Output table.
        output: TableId,
        /// Predicate to apply per row.
        predicate: Predicate,
    },
    /// Select a subset of columns, in the given order.
    Project {
        /// Input table.
        input: TableId,
        /// Output table.
        output: TableId,
        /// Columns to include in the output table.
        columns: Vec<String>,
    },
    /// Stable multi-key sort; nulls sort last regardless of order.
    Sort {
        /// Input table.
        input: TableId,
        /// Output table.
        output: TableId,
        /// Sort keys, most significant first.
        by: Vec<SortKey>,
    },
    /// Group rows by key columns and compute aggregates.
    ///
    /// Output columns are `group_by` (in order) followed by the `fields` outputs (in order).
    /// Groups appear in order of first appearance in the input.
    Aggregate {
        /// Input table.
        input: TableId,
        /// Output table.
        output: TableId,
        /// Group-by key columns.
        group_by: Vec<String>,
        /// Aggregated fields.
        fields: Vec<AggregateField>,
    },
    /// Join two tables.
    ///
    /// Output columns are all left columns followed by `right_columns`. A right column whose
    /// name clashes with a left column is an error. Null keys never match.
    Join {
        /// Left table.
        left: TableId,
        /// Right table.
        right: TableId,
        /// Output table.
        output: TableId,
        /// Join kind.
        kind: JoinKind,
        /// Key columns present in both tables (empty for [`JoinKind::Cross`]).
        on: Vec<String>,
        /// Non-key columns taken from the right table.
        right_columns: Vec<String>,
    },
    /// Compute a new column from existing ones.
    Derive {
        /// Input table.
        input: TableId,
        /// Output table.
        output: TableId,
        /// The derivation.
        derive: Derive,
    },
}

impl Transform {
    /// Output table id.
    pub fn output(&self) -> TableId {
        match self {
            Self::Filter { output, .. }
            | Self::Project { output, .. }
            | Self::Sort { output, .. }
            | Self::Aggregate { output, .. }
            | Self::Join { output, .. }
            | Self::Derive { output, .. } => *output,
        }
    }

    /// Short operator name, used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Filter { .. } => "filter",
            Self::Project { .. } => "project",
            Self::Sort { .. } => "sort",
            Self::Aggregate { .. } => "aggregate",
            Self::Join { .. } => "join",
            Self::Derive { .. } => "derive",
        }
    }
}
