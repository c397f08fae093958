// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full-recompute executor for the transform IR.

use core::cmp::Ordering;

use chrono::{Datelike, Timelike};
use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use ridelens_core::{Column, ColumnData, DataType, Table, TableError, TableId, Value};
use smallvec::SmallVec;

use crate::datetime::parse_datetime_lenient;
use crate::requirements::ColumnKind;
use crate::stats::{self, QuantileMethod};
use crate::transform::{
    AggregateField, AggregateOp, CompareOp, Derive, JoinKind, Predicate, SortKey, SortOrder,
    Transform,
};

/// Errors returned by [`Program::execute`] and [`Program::validate`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExecutionError {
    /// A transform reads a table that is neither an input nor produced earlier.
    #[error("missing input table {0}")]
    MissingInput(TableId),
    /// A transform reads a column its input table does not have.
    #[error("{table} has no column `{column}`")]
    MissingColumn {
        /// Table that was read.
        table: TableId,
        /// Missing column.
        column: String,
    },
    /// A column holds a type the operation cannot use.
    #[error("column `{column}` is {found}, expected {expected}")]
    TypeMismatch {
        /// Offending column.
        column: String,
        /// What the operation needs.
        expected: ColumnKind,
        /// What the column holds.
        found: DataType,
    },
    /// Join key columns have incompatible types.
    #[error("join key `{column}` is {left} on the left but {right} on the right")]
    JoinKeyMismatch {
        /// Key column.
        column: String,
        /// Left key type.
        left: DataType,
        /// Right key type.
        right: DataType,
    },
    /// A strict cast found a cell it cannot represent.
    #[error("cannot cast `{column}` row {row} value {value} to an integer")]
    InvalidCast {
        /// Source column.
        column: String,
        /// Row index.
        row: usize,
        /// Rendered cell value.
        value: String,
    },
    /// Assembling an output table failed.
    #[error(transparent)]
    Table(#[from] TableError),
}

/// An ordered list of transforms.
///
/// Transforms run in order; each may read any input table or any table produced by an earlier
/// transform. Re-using an output id shadows the earlier table.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    transforms: Vec<Transform>,
}

/// Tables produced by [`Program::execute`], keyed by output id.
#[derive(Clone, Debug, Default)]
pub struct ProgramOutput {
    /// Produced tables.
    pub tables: HashMap<TableId, Table>,
}

impl ProgramOutput {
    /// Returns a produced table.
    pub fn table(&self, id: TableId) -> Option<&Table> {
        self.tables.get(&id)
    }

    /// Removes and returns a produced table.
    pub fn take(&mut self, id: TableId) -> Option<Table> {
        self.tables.remove(&id)
    }
}

impl Program {
    /// Creates an empty program.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a transform.
    pub fn push(&mut self, transform: Transform) {
        self.transforms.push(transform);
    }

    /// Appends a transform, builder style.
    #[must_use]
    pub fn with(mut self, transform: Transform) -> Self {
        self.push(transform);
        self
    }

    /// Transforms in execution order.
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// Runs every transform against `inputs`.
    ///
    /// Input tables are never modified. The output holds every produced table, including
    /// intermediates.
    pub fn execute(
        &self,
        inputs: &HashMap<TableId, Table>,
    ) -> Result<ProgramOutput, ExecutionError> {
        let mut produced: HashMap<TableId, Table> = HashMap::new();
        for t in &self.transforms {
            let table = {
                let lookup = |id: TableId| {
                    produced
                        .get(&id)
                        .or_else(|| inputs.get(&id))
                        .ok_or(ExecutionError::MissingInput(id))
                };
                match t {
                    Transform::Filter {
                        input, predicate, ..
                    } => filter(*input, lookup(*input)?, predicate)?,
                    Transform::Project { input, columns, .. } => {
                        project(*input, lookup(*input)?, columns)?
                    }
                    Transform::Sort { input, by, .. } => sort(*input, lookup(*input)?, by)?,
                    Transform::Aggregate {
                        input,
                        group_by,
                        fields,
                        ..
                    } => aggregate(*input, lookup(*input)?, group_by, fields)?,
                    Transform::Join {
                        left,
                        right,
                        kind,
                        on,
                        right_columns,
                        ..
                    } => join(
                        (*left, lookup(*left)?),
                        (*right, lookup(*right)?),
                        *kind,
                        on,
                        right_columns,
                    )?,
                    Transform::Derive { input, derive, .. } => {
                        derive_column(*input, lookup(*input)?, derive)?
                    }
                }
            };
            tracing::debug!(
                op = t.name(),
                output = %t.output(),
                rows = table.row_count(),
                "executed transform"
            );
            produced.insert(t.output(), table);
        }
        Ok(ProgramOutput { tables: produced })
    }
}

fn column<'a>(id: TableId, table: &'a Table, name: &str) -> Result<&'a Column, ExecutionError> {
    table
        .column(name)
        .ok_or_else(|| ExecutionError::MissingColumn {
            table: id,
            column: name.to_owned(),
        })
}

fn mismatch(column: &Column, expected: ColumnKind) -> ExecutionError {
    ExecutionError::TypeMismatch {
        column: column.name.clone(),
        expected,
        found: column.data_type(),
    }
}

enum Compiled<'a> {
    Compare(&'a ColumnData, CompareOp, &'a Value),
    NotNull(&'a ColumnData),
    And(Vec<Compiled<'a>>),
}

fn compile<'a>(
    id: TableId,
    table: &'a Table,
    predicate: &'a Predicate,
) -> Result<Compiled<'a>, ExecutionError> {
    Ok(match predicate {
        Predicate::Compare {
            column: name,
            op,
            value,
        } => {
            let col = column(id, table, name)?;
            let kind = ColumnKind::compared_with(value);
            if !kind.accepts(col.data_type()) {
                return Err(mismatch(col, kind));
            }
            Compiled::Compare(&col.data, *op, value)
        }
        Predicate::NotNull(name) => Compiled::NotNull(&column(id, table, name)?.data),
        Predicate::And(parts) => Compiled::And(
            parts
                .iter()
                .map(|p| compile(id, table, p))
                .collect::<Result<_, _>>()?,
        ),
    })
}

impl Compiled<'_> {
    fn eval(&self, row: usize) -> bool {
        match self {
            Self::Compare(data, op, value) => {
                // Comparing against null (either side) is false.
                if value.is_null() || data.is_null(row) {
                    return false;
                }
                let ord = match data {
                    ColumnData::Int(_) | ColumnData::Float(_) => {
                        match (data.f64(row), value.as_f64()) {
                            (Some(a), Some(b)) => a.partial_cmp(&b),
                            _ => None,
                        }
                    }
                    _ => Some(data.get(row).cmp(value)),
                };
                let Some(ord) = ord else {
                    return false;
                };
                match op {
                    CompareOp::Lt => ord == Ordering::Less,
                    CompareOp::Le => ord != Ordering::Greater,
                    CompareOp::Gt => ord == Ordering::Greater,
                    CompareOp::Ge => ord != Ordering::Less,
                    CompareOp::Eq => ord == Ordering::Equal,
                    CompareOp::Ne => ord != Ordering::Equal,
                }
            }
            Self::NotNull(data) => !data.is_null(row),
            Self::And(parts) => parts.iter().all(|p| p.eval(row)),
        }
    }
}

fn filter(id: TableId, table: &Table, predicate: &Predicate) -> Result<Table, ExecutionError> {
    let compiled = compile(id, table, predicate)?;
    let rows: Vec<usize> = (0..table.row_count())
        .filter(|&row| compiled.eval(row))
        .collect();
    Ok(table.take_rows(&rows))
}

fn project(id: TableId, table: &Table, columns: &[String]) -> Result<Table, ExecutionError> {
    let mut out = Table::new();
    for name in columns {
        out.push_column(column(id, table, name)?.clone())?;
    }
    Ok(out)
}

fn sort(id: TableId, table: &Table, by: &[SortKey]) -> Result<Table, ExecutionError> {
    let keys: Vec<(&ColumnData, SortOrder)> = by
        .iter()
        .map(|k| Ok((&column(id, table, &k.column)?.data, k.order)))
        .collect::<Result<_, ExecutionError>>()?;
    let mut rows: Vec<usize> = (0..table.row_count()).collect();
    rows.sort_by(|&a, &b| {
        for (data, order) in &keys {
            let (va, vb) = (data.get(a), data.get(b));
            let ord = match (va.is_null(), vb.is_null()) {
                (true, true) => Ordering::Equal,
                (true, false) => Ordering::Greater,
                (false, true) => Ordering::Less,
                (false, false) => match order {
                    SortOrder::Asc => va.cmp(&vb),
                    SortOrder::Desc => vb.cmp(&va),
                },
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
    Ok(table.take_rows(&rows))
}

type GroupKey = SmallVec<[Value; 4]>;

fn aggregate(
    id: TableId,
    table: &Table,
    group_by: &[String],
    fields: &[AggregateField],
) -> Result<Table, ExecutionError> {
    let key_columns: Vec<&Column> = group_by
        .iter()
        .map(|name| column(id, table, name))
        .collect::<Result<_, _>>()?;

    let mut groups: Vec<Vec<usize>> = Vec::new();
    if key_columns.is_empty() {
        groups.push((0..table.row_count()).collect());
    } else {
        let mut index: HashMap<GroupKey, usize> = HashMap::new();
        for row in 0..table.row_count() {
            let key: GroupKey = key_columns.iter().map(|c| c.data.get(row)).collect();
            match index.entry(key) {
                Entry::Occupied(e) => groups[*e.get()].push(row),
                Entry::Vacant(e) => {
                    e.insert(groups.len());
                    groups.push(vec![row]);
                }
            }
        }
    }

    let first_rows: Vec<Option<usize>> = groups.iter().map(|g| g.first().copied()).collect();
    let mut out = Table::new();
    for c in &key_columns {
        out.push_column(Column::new(c.name.clone(), c.data.take(&first_rows)))?;
    }
    for field in fields {
        out.push_column(aggregate_field(id, table, &groups, field)?)?;
    }
    Ok(out)
}

fn aggregate_field(
    id: TableId,
    table: &Table,
    groups: &[Vec<usize>],
    field: &AggregateField,
) -> Result<Column, ExecutionError> {
    let output = field.output.clone();
    if field.op == AggregateOp::Count {
        return Ok(Column::int(
            output,
            groups.iter().map(|g| i64::try_from(g.len()).ok()),
        ));
    }
    let name = field.input.as_deref().unwrap_or_default();
    let input = column(id, table, name)?;

    if let ColumnData::Int(cells) = &input.data
        && matches!(field.op, AggregateOp::Sum | AggregateOp::Min | AggregateOp::Max)
    {
        let per_group = groups.iter().map(|g| {
            let values = g.iter().filter_map(|&r| cells.get(r).copied().flatten());
            match field.op {
                AggregateOp::Sum => Some(values.fold(0_i64, i64::saturating_add)),
                AggregateOp::Min => values.min(),
                _ => values.max(),
            }
        });
        return Ok(Column::int(output, per_group.collect::<Vec<_>>()));
    }

    if !input.data_type().is_numeric() {
        return Err(mismatch(input, ColumnKind::Numeric));
    }
    let per_group = groups.iter().map(|g| {
        let values: Vec<f64> = g.iter().filter_map(|&r| input.data.f64(r)).collect();
        float_aggregate(field.op, &values)
    });
    Ok(Column::float(output, per_group.collect::<Vec<_>>()))
}

fn float_aggregate(op: AggregateOp, values: &[f64]) -> Option<f64> {
    match op {
        AggregateOp::Count => Some(values.len() as f64),
        AggregateOp::Sum => Some(values.iter().sum()),
        AggregateOp::Min => values.iter().copied().reduce(f64::min),
        AggregateOp::Max => values.iter().copied().reduce(f64::max),
        AggregateOp::Mean => stats::mean(values),
        AggregateOp::Median => stats::median(values),
        AggregateOp::Quantile(q) => stats::quantile(values, q, QuantileMethod::Nearest),
    }
}

fn join(
    (left_id, left): (TableId, &Table),
    (right_id, right): (TableId, &Table),
    kind: JoinKind,
    on: &[String],
    right_columns: &[String],
) -> Result<Table, ExecutionError> {
    let extra: Vec<&Column> = right_columns
        .iter()
        .map(|name| column(right_id, right, name))
        .collect::<Result<_, _>>()?;

    let mut left_rows: Vec<usize> = Vec::new();
    let mut right_rows: Vec<Option<usize>> = Vec::new();

    if kind == JoinKind::Cross {
        for l in 0..left.row_count() {
            for r in 0..right.row_count() {
                left_rows.push(l);
                right_rows.push(Some(r));
            }
        }
    } else {
        let mut keys: Vec<(&ColumnData, &ColumnData)> = Vec::with_capacity(on.len());
        for name in on {
            let l = column(left_id, left, name)?;
            let r = column(right_id, right, name)?;
            if !l.data_type().joins_with(r.data_type()) {
                return Err(ExecutionError::JoinKeyMismatch {
                    column: name.clone(),
                    left: l.data_type(),
                    right: r.data_type(),
                });
            }
            keys.push((&l.data, &r.data));
        }

        let key_at = |row: usize, left_side: bool| {
            let key: GroupKey = keys
                .iter()
                .map(|(l, r)| if left_side { l.get(row) } else { r.get(row) })
                .collect();
            (!key.iter().any(Value::is_null)).then_some(key)
        };

        let mut index: HashMap<GroupKey, SmallVec<[usize; 4]>> = HashMap::new();
        for r in 0..right.row_count() {
            if let Some(key) = key_at(r, false) {
                index.entry(key).or_default().push(r);
            }
        }
        for l in 0..left.row_count() {
            let matches = key_at(l, true).and_then(|key| index.get(&key));
            match matches {
                Some(rs) => {
                    for &r in rs {
                        left_rows.push(l);
                        right_rows.push(Some(r));
                    }
                }
                None if kind == JoinKind::Left => {
                    left_rows.push(l);
                    right_rows.push(None);
                }
                None => {}
            }
        }
    }

    let mut out = left.take_rows(&left_rows);
    for c in extra {
        out.push_column(Column::new(c.name.clone(), c.data.take(&right_rows)))?;
    }
    Ok(out)
}

fn derive_column(id: TableId, table: &Table, derive: &Derive) -> Result<Table, ExecutionError> {
    let rows = 0..table.row_count();
    let output = derive.output().to_owned();
    let new = match derive {
        Derive::ParseDateTime { column: name, .. } => {
            let src = column(id, table, name)?;
            match &src.data {
                ColumnData::Str(cells) => Column::datetime(
                    output,
                    cells
                        .iter()
                        .map(|c| c.as_deref().and_then(parse_datetime_lenient)),
                ),
                ColumnData::DateTime(cells) => Column::datetime(output, cells.iter().copied()),
                _ => return Err(mismatch(src, ColumnKind::TemporalText)),
            }
        }
        Derive::Weekday { column: name, .. } | Derive::Hour { column: name, .. } => {
            let src = column(id, table, name)?;
            let ColumnData::DateTime(cells) = &src.data else {
                return Err(mismatch(src, ColumnKind::Timestamp));
            };
            let weekday = matches!(derive, Derive::Weekday { .. });
            Column::int(
                output,
                cells.iter().map(|c| {
                    c.map(|dt| {
                        if weekday {
                            i64::from(dt.weekday().num_days_from_monday())
                        } else {
                            i64::from(dt.hour())
                        }
                    })
                }),
            )
        }
        Derive::DurationMinutes { start, end, .. } => {
            let s = column(id, table, start)?;
            let e = column(id, table, end)?;
            let (ColumnData::DateTime(sc), ColumnData::DateTime(ec)) = (&s.data, &e.data) else {
                let bad = if s.data_type() == DataType::DateTime { e } else { s };
                return Err(mismatch(bad, ColumnKind::Timestamp));
            };
            Column::int(
                output,
                sc.iter().zip(ec).map(|(s, e)| match (s, e) {
                    (Some(s), Some(e)) => Some((*e - *s).num_minutes()),
                    _ => None,
                }),
            )
        }
        Derive::CastFloat { column: name, .. } => {
            let src = column(id, table, name)?;
            match &src.data {
                ColumnData::Int(_) | ColumnData::Float(_) => {
                    Column::float(output, rows.map(|r| src.data.f64(r)))
                }
                ColumnData::Str(cells) => Column::float(
                    output,
                    cells
                        .iter()
                        .map(|c| c.as_deref().and_then(|s| s.trim().parse::<f64>().ok())),
                ),
                ColumnData::DateTime(_) => return Err(mismatch(src, ColumnKind::Numeric)),
            }
        }
        Derive::CastInt { column: name, .. } => {
            let src = column(id, table, name)?;
            match &src.data {
                ColumnData::Int(cells) => Column::int(output, cells.iter().copied()),
                ColumnData::Float(cells) => {
                    let mut out = Vec::with_capacity(cells.len());
                    for (row, cell) in cells.iter().enumerate() {
                        out.push(match cell {
                            None => None,
                            #[allow(
                                clippy::cast_possible_truncation,
                                reason = "integral values only; out-of-range saturates"
                            )]
                            Some(v) if v.is_finite() && v.fract() == 0.0 => Some(*v as i64),
                            Some(v) => {
                                return Err(ExecutionError::InvalidCast {
                                    column: name.clone(),
                                    row,
                                    value: v.to_string(),
                                });
                            }
                        });
                    }
                    Column::int(output, out)
                }
                _ => return Err(mismatch(src, ColumnKind::Numeric)),
            }
        }
        Derive::ThresholdBin {
            column: name,
            threshold,
            ..
        } => {
            let src = column(id, table, name)?;
            let ColumnData::Int(cells) = &src.data else {
                return Err(mismatch(src, ColumnKind::Integer));
            };
            Column::str(
                output,
                cells
                    .iter()
                    .map(|c| c.map(|v| threshold_label(v, *threshold))),
            )
        }
        Derive::FillNull { column: name, value } => {
            let src = column(id, table, name)?;
            Column::from_values(
                output,
                src.data_type(),
                rows.map(|r| {
                    if src.data.is_null(r) {
                        value.clone()
                    } else {
                        src.data.get(r)
                    }
                }),
            )?
        }
        Derive::Ratio {
            numerator,
            denominator,
            ..
        } => {
            let n = column(id, table, numerator)?;
            let d = column(id, table, denominator)?;
            for c in [n, d] {
                if !c.data_type().is_numeric() {
                    return Err(mismatch(c, ColumnKind::Numeric));
                }
            }
            Column::float(
                output,
                rows.map(|r| match (n.data.f64(r), d.data.f64(r)) {
                    (Some(n), Some(d)) if d != 0.0 => Some(n / d),
                    _ => None,
                }),
            )
        }
    };
    let mut out = table.clone();
    out.set_column(new)?;
    Ok(out)
}

/// `"1"`, `"2"`, ... below `threshold`; `"{threshold}+"` at or above it.
pub fn threshold_label(value: i64, threshold: i64) -> String {
    if value >= threshold {
        format!("{threshold}+")
    } else {
        value.to_string()
    }
}

/// The labels [`Derive::ThresholdBin`] produces for values `1..`, in ascending order.
pub fn threshold_levels(threshold: i64) -> Vec<String> {
    (1..=threshold).map(|v| threshold_label(v, threshold)).collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::transform::SortKey;

    const RIDES: TableId = TableId(1);
    const USERS: TableId = TableId(2);

    fn inputs() -> HashMap<TableId, Table> {
        let rides = Table::from_columns(vec![
            Column::int("user_id", [Some(1), Some(2), Some(1), Some(3), None]),
            Column::float("distance", [Some(1.5), Some(0.0), Some(3.0), Some(2.0), Some(9.0)]),
            Column::int("passengers", [Some(1), Some(6), Some(2), Some(5), Some(1)]),
            Column::str(
                "started_at",
                [
                    Some("2024-04-08 09:15:00"),
                    Some("2024-04-14 23:59:00"),
                    Some("bad"),
                    Some("2024-04-09 10:00:00"),
                    None,
                ],
            ),
        ])
        .unwrap();
        let users = Table::from_columns(vec![
            Column::int("user_id", [Some(1), Some(2), Some(4)]),
            Column::str("user_type", [Some("staff"), Some("student"), Some("staff")]),
        ])
        .unwrap();
        let mut m = HashMap::new();
        m.insert(RIDES, rides);
        m.insert(USERS, users);
        m
    }

    fn run(t: Transform) -> Table {
        let out_id = t.output();
        let mut out = Program::new().with(t).execute(&inputs()).unwrap();
        out.take(out_id).unwrap()
    }

    #[test]
    fn filter_drops_nulls_and_failed_comparisons() {
        let t = run(Transform::Filter {
            input: RIDES,
            output: TableId(10),
            predicate: Predicate::not_null(["user_id"])
                .and(Predicate::compare("distance", CompareOp::Gt, 0.0)),
        });
        assert_eq!(t.row_count(), 3);
        assert_eq!(
            t.column("distance").unwrap().data,
            ColumnData::Float(vec![Some(1.5), Some(3.0), Some(2.0)])
        );
    }

    #[test]
    fn filter_rejects_text_against_number() {
        let err = Program::new()
            .with(Transform::Filter {
                input: RIDES,
                output: TableId(10),
                predicate: Predicate::compare("started_at", CompareOp::Gt, 1_i64),
            })
            .execute(&inputs())
            .unwrap_err();
        assert!(matches!(err, ExecutionError::TypeMismatch { .. }), "{err:?}");
    }

    #[test]
    fn sort_puts_nulls_last_in_both_orders() {
        for key in [SortKey::asc("user_id"), SortKey::desc("user_id")] {
            let desc = key.order == SortOrder::Desc;
            let t = run(Transform::Sort {
                input: RIDES,
                output: TableId(10),
                by: vec![key, SortKey::asc("distance")],
            });
            let ids = t.column("user_id").unwrap().data.clone();
            let expected = if desc {
                vec![Some(3), Some(2), Some(1), Some(1), None]
            } else {
                vec![Some(1), Some(1), Some(2), Some(3), None]
            };
            assert_eq!(ids, ColumnData::Int(expected));
        }
    }

    #[test]
    fn aggregate_groups_in_first_appearance_order() {
        let t = run(Transform::Aggregate {
            input: RIDES,
            output: TableId(10),
            group_by: vec!["user_id".into()],
            fields: vec![
                AggregateField::count("n"),
                AggregateField::new(AggregateOp::Mean, "distance", "mean"),
                AggregateField::new(AggregateOp::Max, "passengers", "max_p"),
            ],
        });
        assert_eq!(
            t.column("user_id").unwrap().data,
            ColumnData::Int(vec![Some(1), Some(2), Some(3), None])
        );
        assert_eq!(
            t.column("n").unwrap().data,
            ColumnData::Int(vec![Some(2), Some(1), Some(1), Some(1)])
        );
        assert_eq!(
            t.column("mean").unwrap().data,
            ColumnData::Float(vec![Some(2.25), Some(0.0), Some(2.0), Some(9.0)])
        );
        assert_eq!(
            t.column("max_p").unwrap().data,
            ColumnData::Int(vec![Some(2), Some(6), Some(5), Some(1)])
        );
    }

    #[test]
    fn aggregate_without_keys_yields_one_row_even_when_empty() {
        let mut program = Program::new()
            .with(Transform::Filter {
                input: RIDES,
                output: TableId(10),
                predicate: Predicate::compare("distance", CompareOp::Lt, -1.0),
            })
            .with(Transform::Aggregate {
                input: TableId(10),
                output: TableId(11),
                group_by: vec![],
                fields: vec![
                    AggregateField::count("n"),
                    AggregateField::new(AggregateOp::Mean, "distance", "mean"),
                ],
            });
        program.push(Transform::Project {
            input: TableId(11),
            output: TableId(12),
            columns: vec!["n".into(), "mean".into()],
        });
        let out = program.execute(&inputs()).unwrap();
        let t = out.table(TableId(12)).unwrap();
        assert_eq!(t.row_count(), 1);
        assert_eq!(t.value(0, "n"), Some(Value::Int(0)));
        assert!(t.value(0, "mean").unwrap().is_null());
    }

    #[test]
    fn left_join_pads_and_inner_join_drops() {
        let join = |kind| Transform::Join {
            left: RIDES,
            right: USERS,
            output: TableId(10),
            kind,
            on: vec!["user_id".into()],
            right_columns: vec!["user_type".into()],
        };
        let left = run(join(JoinKind::Left));
        assert_eq!(left.row_count(), 5);
        assert_eq!(
            left.column("user_type").unwrap().data,
            ColumnData::Str(vec![
                Some("staff".into()),
                Some("student".into()),
                Some("staff".into()),
                None,
                None,
            ])
        );

        let inner = run(join(JoinKind::Inner));
        assert_eq!(inner.row_count(), 3);
    }

    #[test]
    fn cross_join_is_cartesian() {
        let t = run(Transform::Join {
            left: USERS,
            right: RIDES,
            output: TableId(10),
            kind: JoinKind::Cross,
            on: vec![],
            right_columns: vec!["passengers".into()],
        });
        assert_eq!(t.row_count(), 15);
        assert_eq!(t.value(0, "user_id"), Some(Value::Int(1)));
        assert_eq!(t.value(1, "passengers"), Some(Value::Int(6)));
        assert_eq!(t.value(5, "user_id"), Some(Value::Int(2)));
    }

    #[test]
    fn join_rejects_mismatched_keys_and_clashing_names() {
        let mut m = inputs();
        m.insert(
            TableId(3),
            Table::from_columns(vec![Column::str("user_id", [Some("1")])]).unwrap(),
        );
        let err = Program::new()
            .with(Transform::Join {
                left: RIDES,
                right: TableId(3),
                output: TableId(10),
                kind: JoinKind::Left,
                on: vec!["user_id".into()],
                right_columns: vec![],
            })
            .execute(&m)
            .unwrap_err();
        assert!(matches!(err, ExecutionError::JoinKeyMismatch { .. }), "{err:?}");

        let err = Program::new()
            .with(Transform::Join {
                left: RIDES,
                right: USERS,
                output: TableId(10),
                kind: JoinKind::Left,
                on: vec!["user_id".into()],
                right_columns: vec!["user_id".into()],
            })
            .execute(&m)
            .unwrap_err();
        assert_eq!(
            err,
            ExecutionError::Table(TableError::DuplicateColumn("user_id".into()))
        );
    }

    #[test]
    fn datetime_derivations() {
        let program = Program::new()
            .with(Transform::Derive {
                input: RIDES,
                output: TableId(10),
                derive: Derive::ParseDateTime {
                    column: "started_at".into(),
                    output: "ts".into(),
                },
            })
            .with(Transform::Derive {
                input: TableId(10),
                output: TableId(11),
                derive: Derive::Weekday {
                    column: "ts".into(),
                    output: "dow".into(),
                },
            })
            .with(Transform::Derive {
                input: TableId(11),
                output: TableId(12),
                derive: Derive::Hour {
                    column: "ts".into(),
                    output: "hour".into(),
                },
            });
        let out = program.execute(&inputs()).unwrap();
        let t = out.table(TableId(12)).unwrap();
        // 2024-04-08 is a Monday, 2024-04-14 a Sunday.
        assert_eq!(
            t.column("dow").unwrap().data,
            ColumnData::Int(vec![Some(0), Some(6), None, Some(1), None])
        );
        assert_eq!(
            t.column("hour").unwrap().data,
            ColumnData::Int(vec![Some(9), Some(23), None, Some(10), None])
        );
    }

    #[test]
    fn duration_truncates_toward_zero() {
        let at = |h, m, s| {
            NaiveDate::from_ymd_opt(2024, 4, 8)
                .and_then(|d| d.and_hms_opt(h, m, s))
                .unwrap()
        };
        let mut m = HashMap::new();
        m.insert(
            RIDES,
            Table::from_columns(vec![
                Column::datetime("s", [Some(at(9, 0, 0)), Some(at(9, 0, 0)), None]),
                Column::datetime("e", [Some(at(9, 12, 59)), Some(at(8, 58, 30)), Some(at(9, 0, 0))]),
            ])
            .unwrap(),
        );
        let mut out = Program::new()
            .with(Transform::Derive {
                input: RIDES,
                output: TableId(10),
                derive: Derive::DurationMinutes {
                    start: "s".into(),
                    end: "e".into(),
                    output: "minutes".into(),
                },
            })
            .execute(&m)
            .unwrap();
        let t = out.take(TableId(10)).unwrap();
        assert_eq!(
            t.column("minutes").unwrap().data,
            ColumnData::Int(vec![Some(12), Some(-1), None])
        );
    }

    #[test]
    fn threshold_bin_and_fill_null() {
        let t = run(Transform::Derive {
            input: RIDES,
            output: TableId(10),
            derive: Derive::ThresholdBin {
                column: "passengers".into(),
                output: "bin".into(),
                threshold: 5,
            },
        });
        assert_eq!(
            t.column("bin").unwrap().data,
            ColumnData::Str(
                ["1", "5+", "2", "5+", "1"]
                    .into_iter()
                    .map(|s| Some(s.to_owned()))
                    .collect()
            )
        );
        assert_eq!(threshold_levels(5), ["1", "2", "3", "4", "5+"]);

        let t = run(Transform::Derive {
            input: RIDES,
            output: TableId(10),
            derive: Derive::FillNull {
                column: "user_id".into(),
                value: Value::Int(0),
            },
        });
        assert_eq!(t.value(4, "user_id"), Some(Value::Int(0)));
        assert_eq!(t.schema(), inputs()[&RIDES].schema());
    }

    #[test]
    fn casts() {
        let t = run(Transform::Derive {
            input: RIDES,
            output: TableId(10),
            derive: Derive::CastFloat {
                column: "started_at".into(),
                output: "f".into(),
            },
        });
        assert!(t.value(0, "f").unwrap().is_null());

        let mut m = HashMap::new();
        m.insert(
            RIDES,
            Table::from_columns(vec![Column::float("x", [Some(2.0), Some(2.5)])]).unwrap(),
        );
        let err = Program::new()
            .with(Transform::Derive {
                input: RIDES,
                output: TableId(10),
                derive: Derive::CastInt {
                    column: "x".into(),
                    output: "x".into(),
                },
            })
            .execute(&m)
            .unwrap_err();
        assert!(
            matches!(err, ExecutionError::InvalidCast { row: 1, .. }),
            "{err:?}"
        );
    }

    #[test]
    fn ratio_is_null_for_zero_denominator() {
        let t = run(Transform::Derive {
            input: RIDES,
            output: TableId(10),
            derive: Derive::Ratio {
                numerator: "passengers".into(),
                denominator: "distance".into(),
                output: "r".into(),
            },
        });
        assert_eq!(t.value(0, "r"), Some(Value::Float(1.0 / 1.5)));
        assert!(t.value(1, "r").unwrap().is_null());
    }

    #[test]
    fn missing_input_and_column_are_reported() {
        let err = Program::new()
            .with(Transform::Sort {
                input: TableId(99),
                output: TableId(10),
                by: vec![],
            })
            .execute(&inputs())
            .unwrap_err();
        assert_eq!(err, ExecutionError::MissingInput(TableId(99)));

        let err = Program::new()
            .with(Transform::Project {
                input: RIDES,
                output: TableId(10),
                columns: vec!["nope".into()],
            })
            .execute(&inputs())
            .unwrap_err();
        assert_eq!(
            err,
            ExecutionError::MissingColumn {
                table: RIDES,
                column: "nope".into(),
            }
        );
    }
}
