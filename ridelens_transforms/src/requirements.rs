// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static column requirements of a [`Program`].
//!
//! Before running a program against freshly loaded data, callers want to know which columns of
//! which *input* tables it reads, and what kind of data it expects there. Columns read from
//! intermediate tables are traced back through the transforms that produced them; columns
//! created by a transform (derivations, aggregate outputs) impose nothing on the inputs.

use std::collections::BTreeMap;
use std::fmt;

use hashbrown::{HashMap, HashSet};
use ridelens_core::{DataType, Table, TableId, Value};

use crate::program::{ExecutionError, Program};
use crate::transform::{AggregateOp, Derive, JoinKind, Predicate, Transform};

/// The kind of data a transform expects in a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnKind {
    /// Any type.
    Any,
    /// `Int` or `Float`.
    Numeric,
    /// `Int` only.
    Integer,
    /// `Str` only.
    Text,
    /// `Str` (to be parsed) or `DateTime`.
    TemporalText,
    /// `DateTime` only.
    Timestamp,
    /// A join key: `Int` or `Str`.
    Key,
}

impl ColumnKind {
    /// Returns `true` if a column of `dtype` satisfies this requirement.
    pub fn accepts(self, dtype: DataType) -> bool {
        match self {
            Self::Any => true,
            Self::Numeric => dtype.is_numeric(),
            Self::Integer => dtype == DataType::Int,
            Self::Text => dtype == DataType::Str,
            Self::TemporalText => matches!(dtype, DataType::Str | DataType::DateTime),
            Self::Timestamp => dtype == DataType::DateTime,
            Self::Key => matches!(dtype, DataType::Int | DataType::Str),
        }
    }

    /// The kind a column must have to be compared against `value`.
    pub fn compared_with(value: &Value) -> Self {
        match value.data_type() {
            Some(DataType::Int | DataType::Float) => Self::Numeric,
            Some(DataType::Str) => Self::Text,
            Some(DataType::DateTime) => Self::Timestamp,
            None => Self::Any,
        }
    }

    /// Combines two requirements on the same column, keeping the narrower one.
    ///
    /// Requirements that cannot both hold keep `self`; validation then reports the mismatch.
    #[must_use]
    pub fn narrow(self, other: Self) -> Self {
        use ColumnKind::*;
        match (self, other) {
            (Any, k) | (k, Any) => k,
            (a, b) if a == b => a,
            (Numeric, Integer) | (Integer, Numeric) | (Key, Integer) | (Integer, Key) => Integer,
            (Key, Text) | (Text, Key) | (TemporalText, Text) | (Text, TemporalText) => Text,
            (TemporalText, Timestamp) | (Timestamp, TemporalText) => Timestamp,
            (a, _) => a,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::Numeric => "numeric",
            Self::Integer => "integer",
            Self::Text => "text",
            Self::TemporalText => "date-time text",
            Self::Timestamp => "timestamp",
            Self::Key => "key (integer or text)",
        })
    }
}

/// Required columns per input table, ordered for stable diagnostics.
pub type Requirements = BTreeMap<TableId, BTreeMap<String, ColumnKind>>;

/// How a produced table relates to its parents.
enum Node<'a> {
    /// All parent columns pass through (filter, sort).
    Pass(TableId),
    /// Parent columns pass through, plus one created column.
    Derive(TableId, &'a str),
    /// Only the listed parent columns remain.
    Project(TableId, &'a [String]),
    /// Keys come from the parent; field outputs are created.
    Aggregate(TableId, &'a [String]),
    /// Listed right columns come from the right parent, the rest from the left.
    Join(TableId, TableId, &'a [String]),
}

struct Lineage<'a> {
    nodes: HashMap<TableId, Node<'a>>,
}

impl Lineage<'_> {
    /// Resolves `column` of `table` back to an input table column, if it originates in one.
    fn resolve(&self, mut table: TableId, column: &str) -> Option<TableId> {
        // Programs are acyclic; the bound only guards against malformed ones.
        for _ in 0..=self.nodes.len() {
            let Some(node) = self.nodes.get(&table) else {
                return Some(table);
            };
            table = match *node {
                Node::Pass(parent) => parent,
                Node::Derive(parent, output) => {
                    if output == column {
                        return None;
                    }
                    parent
                }
                Node::Project(parent, columns) | Node::Aggregate(parent, columns) => {
                    if !columns.iter().any(|c| c == column) {
                        return None;
                    }
                    parent
                }
                Node::Join(left, right, right_columns) => {
                    if right_columns.iter().any(|c| c == column) {
                        right
                    } else {
                        left
                    }
                }
            };
        }
        None
    }
}

/// A join key traced back to the input tables on each side.
struct KeyPair {
    column: String,
    left: TableId,
    right: TableId,
}

impl Program {
    /// Columns this program reads from each input table, with the kind of data it expects.
    ///
    /// A table is an input if no earlier transform in the program produces it.
    pub fn required_columns(&self) -> Requirements {
        self.trace().0
    }

    fn trace(&self) -> (Requirements, Vec<KeyPair>) {
        let mut keys = Vec::new();
        let mut lineage = Lineage {
            nodes: HashMap::new(),
        };
        let mut produced: HashSet<TableId> = HashSet::new();
        let mut out = Requirements::new();

        let mut require = |lineage: &Lineage<'_>, table: TableId, column: &str, kind: ColumnKind| {
            if let Some(input) = lineage.resolve(table, column) {
                let slot = out
                    .entry(input)
                    .or_default()
                    .entry(column.to_owned())
                    .or_insert(kind);
                *slot = slot.narrow(kind);
            }
        };

        for t in self.transforms() {
            match t {
                Transform::Filter {
                    input, predicate, ..
                } => {
                    for (column, kind) in predicate_kinds(predicate) {
                        require(&lineage, *input, column, kind);
                    }
                }
                Transform::Project { input, columns, .. } => {
                    for c in columns {
                        require(&lineage, *input, c, ColumnKind::Any);
                    }
                }
                Transform::Sort { input, by, .. } => {
                    for k in by {
                        require(&lineage, *input, &k.column, ColumnKind::Any);
                    }
                }
                Transform::Aggregate {
                    input,
                    group_by,
                    fields,
                    ..
                } => {
                    for c in group_by {
                        require(&lineage, *input, c, ColumnKind::Any);
                    }
                    for f in fields {
                        if let (Some(c), false) = (&f.input, f.op == AggregateOp::Count) {
                            require(&lineage, *input, c, ColumnKind::Numeric);
                        }
                    }
                }
                Transform::Join {
                    left,
                    right,
                    kind,
                    on,
                    right_columns,
                    ..
                } => {
                    if *kind != JoinKind::Cross {
                        for c in on {
                            require(&lineage, *left, c, ColumnKind::Key);
                            require(&lineage, *right, c, ColumnKind::Key);
                            if let (Some(l), Some(r)) =
                                (lineage.resolve(*left, c), lineage.resolve(*right, c))
                            {
                                keys.push(KeyPair {
                                    column: c.clone(),
                                    left: l,
                                    right: r,
                                });
                            }
                        }
                    }
                    for c in right_columns {
                        require(&lineage, *right, c, ColumnKind::Any);
                    }
                }
                Transform::Derive { input, derive, .. } => {
                    let kind = derive_input_kind(derive);
                    for c in derive.inputs() {
                        require(&lineage, *input, c, kind);
                    }
                }
            }

            let node = match t {
                Transform::Filter { input, .. } | Transform::Sort { input, .. } => {
                    Node::Pass(*input)
                }
                Transform::Project { input, columns, .. } => Node::Project(*input, columns),
                Transform::Aggregate {
                    input, group_by, ..
                } => Node::Aggregate(*input, group_by),
                Transform::Join {
                    left,
                    right,
                    right_columns,
                    ..
                } => Node::Join(*left, *right, right_columns),
                Transform::Derive { input, derive, .. } => Node::Derive(*input, derive.output()),
            };
            produced.insert(t.output());
            lineage.nodes.insert(t.output(), node);
        }

        out.retain(|table, _| !produced.contains(table));
        keys.retain(|k| !produced.contains(&k.left) && !produced.contains(&k.right));
        (out, keys)
    }

    /// Checks `inputs` against [`Program::required_columns`] without executing anything.
    ///
    /// Reports the first missing table, missing column, or incompatible column type, in
    /// table-id then column-name order. Join keys that come from different input tables must
    /// then agree in type, as they must when the join runs.
    pub fn validate(&self, inputs: &HashMap<TableId, Table>) -> Result<(), ExecutionError> {
        let (requirements, keys) = self.trace();
        for (table_id, columns) in requirements {
            let table = inputs
                .get(&table_id)
                .ok_or(ExecutionError::MissingInput(table_id))?;
            for (name, kind) in columns {
                let column = table
                    .column(&name)
                    .ok_or_else(|| ExecutionError::MissingColumn {
                        table: table_id,
                        column: name.clone(),
                    })?;
                if !kind.accepts(column.data_type()) {
                    return Err(ExecutionError::TypeMismatch {
                        column: name,
                        expected: kind,
                        found: column.data_type(),
                    });
                }
            }
        }
        for key in keys {
            let dtype = |id: TableId| {
                inputs
                    .get(&id)
                    .and_then(|t| t.column(&key.column))
                    .map(|c| c.data_type())
            };
            if let (Some(left), Some(right)) = (dtype(key.left), dtype(key.right))
                && !left.joins_with(right)
            {
                return Err(ExecutionError::JoinKeyMismatch {
                    column: key.column,
                    left,
                    right,
                });
            }
        }
        Ok(())
    }
}

fn predicate_kinds(predicate: &Predicate) -> Vec<(&str, ColumnKind)> {
    match predicate {
        Predicate::Compare { column, value, .. } => {
            vec![(column.as_str(), ColumnKind::compared_with(value))]
        }
        Predicate::NotNull(column) => vec![(column.as_str(), ColumnKind::Any)],
        Predicate::And(parts) => parts.iter().flat_map(predicate_kinds).collect(),
    }
}

fn derive_input_kind(derive: &Derive) -> ColumnKind {
    match derive {
        Derive::ParseDateTime { .. } => ColumnKind::TemporalText,
        Derive::Weekday { .. } | Derive::Hour { .. } | Derive::DurationMinutes { .. } => {
            ColumnKind::Timestamp
        }
        Derive::CastFloat { .. } | Derive::FillNull { .. } => ColumnKind::Any,
        Derive::CastInt { .. } | Derive::Ratio { .. } => ColumnKind::Numeric,
        Derive::ThresholdBin { .. } => ColumnKind::Integer,
    }
}

#[cfg(test)]
mod tests {
    use ridelens_core::Column;

    use super::*;
    use crate::transform::{AggregateField, CompareOp};

    const HISTORY: TableId = TableId(1);
    const USER: TableId = TableId(2);

    fn program() -> Program {
        let mut p = Program::new();
        p.push(Transform::Derive {
            input: HISTORY,
            output: TableId(10),
            derive: Derive::ParseDateTime {
                column: "started_at".into(),
                output: "started_at_dt".into(),
            },
        });
        p.push(Transform::Join {
            left: TableId(10),
            right: USER,
            output: TableId(11),
            kind: JoinKind::Left,
            on: vec!["user_id".into()],
            right_columns: vec!["user_type".into()],
        });
        p.push(Transform::Derive {
            input: TableId(11),
            output: TableId(12),
            derive: Derive::Hour {
                column: "started_at_dt".into(),
                output: "hour".into(),
            },
        });
        p.push(Transform::Filter {
            input: TableId(12),
            output: TableId(13),
            predicate: Predicate::not_null(["user_type", "hour"])
                .and(Predicate::compare("distance", CompareOp::Gt, 0.0)),
        });
        p.push(Transform::Aggregate {
            input: TableId(13),
            output: TableId(14),
            group_by: vec!["user_type".into()],
            fields: vec![AggregateField::count("n")],
        });
        p
    }

    #[test]
    fn traces_reads_back_to_inputs() {
        let req = program().required_columns();
        assert_eq!(req.len(), 2, "{req:?}");

        let history = &req[&HISTORY];
        assert_eq!(history["started_at"], ColumnKind::TemporalText);
        assert_eq!(history["user_id"], ColumnKind::Key);
        assert_eq!(history["distance"], ColumnKind::Numeric);
        assert!(!history.contains_key("started_at_dt"));
        assert!(!history.contains_key("hour"));
        assert!(!history.contains_key("user_type"));

        let user = &req[&USER];
        assert_eq!(user["user_id"], ColumnKind::Key);
        assert_eq!(user["user_type"], ColumnKind::Any);
    }

    #[test]
    fn validate_reports_missing_column() {
        let mut inputs = HashMap::new();
        inputs.insert(
            HISTORY,
            Table::from_columns(vec![
                Column::str("started_at", [Some("2024-01-01 10:00")]),
                Column::int("user_id", [Some(1)]),
            ])
            .unwrap(),
        );
        inputs.insert(
            USER,
            Table::from_columns(vec![
                Column::int("user_id", [Some(1)]),
                Column::str("user_type", [Some("staff")]),
            ])
            .unwrap(),
        );
        let err = program().validate(&inputs).unwrap_err();
        assert_eq!(
            err,
            ExecutionError::MissingColumn {
                table: HISTORY,
                column: "distance".into(),
            }
        );
    }

    #[test]
    fn validate_reports_wrong_type() {
        let mut inputs = HashMap::new();
        inputs.insert(
            HISTORY,
            Table::from_columns(vec![
                Column::str("started_at", [Some("2024-01-01 10:00")]),
                Column::int("user_id", [Some(1)]),
                Column::str("distance", [Some("far")]),
            ])
            .unwrap(),
        );
        inputs.insert(
            USER,
            Table::from_columns(vec![
                Column::int("user_id", [Some(1)]),
                Column::str("user_type", [Some("staff")]),
            ])
            .unwrap(),
        );
        let err = program().validate(&inputs).unwrap_err();
        assert!(
            matches!(err, ExecutionError::TypeMismatch { ref column, .. } if column == "distance"),
            "{err:?}"
        );
    }

    #[test]
    fn validate_reports_join_keys_of_different_types() {
        let mut inputs = HashMap::new();
        inputs.insert(
            HISTORY,
            Table::from_columns(vec![
                Column::str("started_at", [Some("2024-01-01 10:00")]),
                Column::int("user_id", [Some(1)]),
                Column::float("distance", [Some(2.0)]),
            ])
            .unwrap(),
        );
        inputs.insert(
            USER,
            Table::from_columns(vec![
                Column::str("user_id", [Some("u1")]),
                Column::str("user_type", [Some("staff")]),
            ])
            .unwrap(),
        );
        let err = program().validate(&inputs).unwrap_err();
        assert_eq!(
            err,
            ExecutionError::JoinKeyMismatch {
                column: "user_id".into(),
                left: DataType::Int,
                right: DataType::Str,
            }
        );

        inputs.insert(
            USER,
            Table::from_columns(vec![
                Column::int("user_id", [Some(1)]),
                Column::str("user_type", [Some("staff")]),
            ])
            .unwrap(),
        );
        assert_eq!(program().validate(&inputs), Ok(()));
    }

    #[test]
    fn narrowing_prefers_specific_kinds() {
        assert_eq!(
            ColumnKind::Any.narrow(ColumnKind::Numeric),
            ColumnKind::Numeric
        );
        assert_eq!(
            ColumnKind::Key.narrow(ColumnKind::Integer),
            ColumnKind::Integer
        );
        assert_eq!(
            ColumnKind::TemporalText.narrow(ColumnKind::Timestamp),
            ColumnKind::Timestamp
        );
    }
}
