// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mean of a numeric column per category, as a table and a bar chart.

use hashbrown::HashMap;
use ridelens_core::{Table, TableId};
use ridelens_transforms::{AggregateField, AggregateOp, Program, Transform};

use crate::error::AnalysisError;
use crate::figure::Figure;
use crate::plots::{self, Titles};

const INPUT: TableId = TableId(900);
const MEANS: TableId = TableId(901);

/// The per-group means and their bar chart.
#[derive(Clone, Debug)]
pub struct GroupMean {
    /// One row per group: the category column and `mean_<value>`.
    pub table: Table,
    /// One bar per row of `table`, in row order.
    pub figure: Figure,
}

/// Groups `table` by `category` and renders the mean of `value` per group.
///
/// Groups keep their first-appearance order unless `order` is given, in which case they follow
/// it and groups not listed are left out. Group labels are the category values as text.
pub fn group_mean_bar(
    table: &Table,
    category: &str,
    value: &str,
    order: Option<&[String]>,
    file_name: &str,
    titles: &Titles,
) -> Result<GroupMean, AnalysisError> {
    let mean_column = format!("mean_{value}");
    let program = Program::new().with(Transform::Aggregate {
        input: INPUT,
        output: MEANS,
        group_by: vec![category.to_owned()],
        fields: vec![AggregateField::new(AggregateOp::Mean, value, &mean_column)],
    });
    let inputs: HashMap<TableId, Table> = [(INPUT, table.clone())].into_iter().collect();
    program.validate(&inputs).map_err(AnalysisError::Schema)?;
    let mut output = program.execute(&inputs)?;
    let means = output.take(MEANS).unwrap_or_default();

    let labels: Vec<String> = (0..means.row_count())
        .map(|r| means.value(r, category).unwrap_or_default().to_string())
        .collect();
    let means = match order {
        Some(order) => {
            let rows: Vec<usize> = order
                .iter()
                .filter_map(|level| labels.iter().position(|l| l == level))
                .collect();
            means.take_rows(&rows)
        }
        None => means,
    };

    let (categories, values): (Vec<String>, Vec<f64>) = (0..means.row_count())
        .map(|r| {
            let label = means.value(r, category).unwrap_or_default().to_string();
            let mean = means
                .value(r, &mean_column)
                .and_then(|v| v.as_f64())
                .unwrap_or(f64::NAN);
            (label, mean)
        })
        .unzip();
    tracing::debug!(category, value, groups = categories.len(), "computed group means");
    let figure = plots::bar(file_name, titles, &categories, &values)?;
    Ok(GroupMean {
        table: means,
        figure,
    })
}

#[cfg(test)]
mod tests {
    use ridelens_core::{Column, Value};

    use super::*;

    fn scores() -> Table {
        Table::from_columns(vec![
            Column::str("term", [Some("spring"), Some("fall"), Some("spring"), None]),
            Column::int("score", [Some(80), Some(70), Some(90), Some(50)]),
        ])
        .unwrap()
    }

    fn titles() -> Titles {
        Titles::new("mean score by term", "term", "score")
    }

    #[test]
    fn follows_requested_order() {
        let order = ["fall".to_owned(), "spring".to_owned(), "summer".to_owned()];
        let result =
            group_mean_bar(&scores(), "term", "score", Some(&order), "m.svg", &titles()).unwrap();
        let t = &result.table;
        assert_eq!(t.row_count(), 2);
        assert_eq!(t.value(0, "term"), Some(Value::from("fall")));
        assert_eq!(t.value(0, "mean_score"), Some(Value::Float(70.0)));
        assert_eq!(t.value(1, "mean_score"), Some(Value::Float(85.0)));
        assert!(result.figure.svg.contains(">fall<"));
    }

    #[test]
    fn missing_value_column_is_a_schema_error() {
        let err = group_mean_bar(&scores(), "term", "grade", None, "m.svg", &titles())
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Schema(_)), "{err}");
    }

    #[test]
    fn empty_table_renders_an_empty_chart() {
        let empty = Table::empty_like(&scores().schema());
        let result = group_mean_bar(&empty, "term", "score", None, "m.svg", &titles()).unwrap();
        assert_eq!(result.table.row_count(), 0);
        assert!(result.figure.svg.contains("no data"));
    }
}
