// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform programs that turn the raw tables into analysis-ready tables.
//!
//! Each builder returns a [`Program`] over the [`Source`] input registers. Output registers are
//! exported as constants; intermediates use private registers from `100` up.

use ridelens_core::{TableId, Value};
use ridelens_transforms::{
    AggregateField, AggregateOp, CompareOp, Derive, JoinKind, Predicate, Program, SortKey,
    Transform,
};

use crate::dataset::Source;

/// Values at or above this are binned as `"5+"`.
pub const BIN_THRESHOLD: i64 = 5;

/// Rides per (`user_type`, `dow`, `hour`) with `ride_count`, `total_rides` and
/// `share_within_type`.
pub const USAGE_SHARE: TableId = TableId(110);
/// Rides with `distance_f` and `duration_min`, both valid.
pub const RIDE_DURATIONS: TableId = TableId(210);
/// Rides with `passengers_count >= 1`, positive `distance` and `passengers_cat`.
pub const PASSENGER_RIDES: TableId = TableId(220);
/// Distance summary per (`user_type`, `passengers_cat`).
pub const PASSENGER_SUMMARY: TableId = TableId(222);
/// Rides with `spots_n`, `spots_bin` and `passengers_bin`.
pub const RIDE_FEATURES: TableId = TableId(310);
/// Ride counts `n` per (`passengers_bin`, `spots_bin`).
pub const PASSENGER_SPOT_COUNTS: TableId = TableId(311);

const HISTORY: TableId = Source::History.id();
const USER: TableId = Source::User.id();
const TRIP: TableId = Source::Trip.id();

/// Builds a linear run of transforms, each reading the previous output.
struct Chain {
    program: Program,
    current: TableId,
    next: u32,
}

impl Chain {
    fn new(input: TableId, first_register: u32) -> Self {
        Self {
            program: Program::new(),
            current: input,
            next: first_register,
        }
    }

    fn register(&mut self) -> TableId {
        let id = TableId(self.next);
        self.next += 1;
        id
    }

    fn then(mut self, make: impl FnOnce(TableId, TableId) -> Transform) -> Self {
        let output = self.register();
        self.program.push(make(self.current, output));
        self.current = output;
        self
    }

    /// Adds a transform off the main line and returns its output register.
    fn side(&mut self, make: impl FnOnce(TableId) -> Transform) -> TableId {
        let output = self.register();
        self.program.push(make(output));
        output
    }

    fn derive(self, derive: Derive) -> Self {
        self.then(|input, output| Transform::Derive {
            input,
            output,
            derive,
        })
    }

    fn filter(self, predicate: Predicate) -> Self {
        self.then(|input, output| Transform::Filter {
            input,
            output,
            predicate,
        })
    }

    fn left_join(self, right: TableId, on: &str, columns: &[&str]) -> Self {
        self.then(|left, output| Transform::Join {
            left,
            right,
            output,
            kind: JoinKind::Left,
            on: vec![on.to_owned()],
            right_columns: columns.iter().map(|c| (*c).to_owned()).collect(),
        })
    }

    fn parse_timestamps(self) -> Self {
        ["started_at", "ended_at"]
            .into_iter()
            .fold(self, |chain, column| {
                chain.derive(Derive::ParseDateTime {
                    column: column.into(),
                    output: column.into(),
                })
            })
    }

    fn join_user_type(self) -> Self {
        self.left_join(USER, "user_id", &["user_type"])
    }

    /// Ends the chain with a transform writing the fixed register `output`.
    fn finish(
        mut self,
        output: TableId,
        make: impl FnOnce(TableId, TableId) -> Transform,
    ) -> Program {
        self.program.push(make(self.current, output));
        self.program
    }
}

fn threshold_bin(column: &str, output: &str) -> Derive {
    Derive::ThresholdBin {
        column: column.into(),
        output: output.into(),
        threshold: BIN_THRESHOLD,
    }
}

fn duration_minutes() -> Derive {
    Derive::DurationMinutes {
        start: "started_at".into(),
        end: "ended_at".into(),
        output: "duration_min".into(),
    }
}

/// Ride shares per weekday and hour within each user type.
///
/// `dow` is `0` for Monday through `6` for Sunday. Rides without a user type or a parseable
/// start time are dropped.
pub fn usage_share() -> Program {
    let mut chain = Chain::new(HISTORY, 100)
        .parse_timestamps()
        .join_user_type()
        .derive(Derive::Weekday {
            column: "started_at".into(),
            output: "dow".into(),
        })
        .derive(Derive::Hour {
            column: "started_at".into(),
            output: "hour".into(),
        })
        .filter(Predicate::not_null(["user_type", "dow", "hour"]))
        .then(|input, output| Transform::Aggregate {
            input,
            output,
            group_by: vec!["user_type".into(), "dow".into(), "hour".into()],
            fields: vec![AggregateField::count("ride_count")],
        });
    let counts = chain.current;
    let totals = chain.side(|output| Transform::Aggregate {
        input: counts,
        output,
        group_by: vec!["user_type".into()],
        fields: vec![AggregateField::new(
            AggregateOp::Sum,
            "ride_count",
            "total_rides",
        )],
    });
    chain
        .left_join(totals, "user_type", &["total_rides"])
        .finish(USAGE_SHARE, |input, output| Transform::Derive {
            input,
            output,
            derive: Derive::Ratio {
                numerator: "ride_count".into(),
                denominator: "total_rides".into(),
                output: "share_within_type".into(),
            },
        })
}

/// Rides with a positive duration and a non-negative distance, for the box plots.
pub fn ride_durations() -> Program {
    Chain::new(HISTORY, 200)
        .parse_timestamps()
        .derive(Derive::CastFloat {
            column: "distance".into(),
            output: "distance_f".into(),
        })
        .join_user_type()
        .derive(duration_minutes())
        .finish(RIDE_DURATIONS, |input, output| Transform::Filter {
            input,
            output,
            predicate: Predicate::not_null(["user_type", "distance_f", "duration_min"])
                .and(Predicate::compare("duration_min", CompareOp::Gt, 0_i64))
                .and(Predicate::compare("distance_f", CompareOp::Ge, 0.0)),
        })
}

/// Rides with passengers and a positive distance, plus the distance summary per
/// (`user_type`, `passengers_cat`).
///
/// The summary holds `n`, `mean`, `median`, `q25`, `q75` and `max`, sorted by both keys.
/// Quartiles take the nearest order statistic.
pub fn passenger_rides() -> Program {
    let mut program = Chain::new(HISTORY, 212)
        .join_user_type()
        .derive(Derive::CastInt {
            column: "passengers_count".into(),
            output: "passengers_count".into(),
        })
        .derive(Derive::CastFloat {
            column: "distance".into(),
            output: "distance".into(),
        })
        .filter(
            Predicate::not_null(["user_type", "passengers_count", "distance"])
                .and(Predicate::compare("passengers_count", CompareOp::Ge, 1_i64))
                .and(Predicate::compare("distance", CompareOp::Gt, 0.0)),
        )
        .finish(PASSENGER_RIDES, |input, output| Transform::Derive {
            input,
            output,
            derive: threshold_bin("passengers_count", "passengers_cat"),
        });

    let grouped = TableId(221);
    let stat = |op, name: &str| AggregateField::new(op, "distance", name);
    program.push(Transform::Aggregate {
        input: PASSENGER_RIDES,
        output: grouped,
        group_by: vec!["user_type".into(), "passengers_cat".into()],
        fields: vec![
            AggregateField::count("n"),
            stat(AggregateOp::Mean, "mean"),
            stat(AggregateOp::Median, "median"),
            stat(AggregateOp::Quantile(0.25), "q25"),
            stat(AggregateOp::Quantile(0.75), "q75"),
            stat(AggregateOp::Max, "max"),
        ],
    });
    program.push(Transform::Sort {
        input: grouped,
        output: PASSENGER_SUMMARY,
        by: vec![SortKey::asc("user_type"), SortKey::asc("passengers_cat")],
    });
    program
}

/// Rides with their destination count, binned, plus counts per
/// (`passengers_bin`, `spots_bin`).
///
/// Rides without trip rows get `spots_n = 0` and are then dropped by the `spots_n >= 1` filter.
pub fn ride_features() -> Program {
    let mut chain = Chain::new(HISTORY, 300);
    let spots = chain.side(|output| Transform::Aggregate {
        input: TRIP,
        output,
        group_by: vec!["history_id".into()],
        fields: vec![AggregateField::count("spots_n")],
    });
    let mut program = chain
        .left_join(spots, "history_id", &["spots_n"])
        .join_user_type()
        .derive(Derive::FillNull {
            column: "spots_n".into(),
            value: Value::Int(0),
        })
        .derive(Derive::CastFloat {
            column: "distance".into(),
            output: "distance".into(),
        })
        .parse_timestamps()
        .derive(duration_minutes())
        .derive(threshold_bin("spots_n", "spots_bin"))
        .derive(threshold_bin("passengers_count", "passengers_bin"))
        .finish(RIDE_FEATURES, |input, output| Transform::Filter {
            input,
            output,
            predicate: Predicate::compare("spots_n", CompareOp::Ge, 1_i64)
                .and(Predicate::compare("passengers_count", CompareOp::Ge, 1_i64))
                .and(Predicate::not_null([
                    "user_type",
                    "distance",
                    "passengers_count",
                    "spots_bin",
                    "passengers_bin",
                ])),
        });
    program.push(Transform::Aggregate {
        input: RIDE_FEATURES,
        output: PASSENGER_SPOT_COUNTS,
        group_by: vec!["passengers_bin".into(), "spots_bin".into()],
        fields: vec![AggregateField::count("n")],
    });
    program
}

#[cfg(test)]
mod tests {
    use ridelens_core::{Column, ColumnData, Table};
    use ridelens_transforms::{ColumnKind, threshold_levels};

    use super::*;
    use crate::dataset::Dataset;

    fn history() -> Table {
        Table::from_columns(vec![
            Column::int("history_id", [Some(1), Some(2), Some(3), Some(4)]),
            Column::int("user_id", [Some(10), Some(11), Some(10), Some(99)]),
            Column::str(
                "started_at",
                [
                    Some("2024-04-08 09:00:00"),
                    Some("2024-04-08 09:30:00"),
                    Some("2024-04-09 18:10:00"),
                    Some("2024-04-09 18:20:00"),
                ],
            ),
            Column::str(
                "ended_at",
                [
                    Some("2024-04-08 09:20:00"),
                    Some("2024-04-08 09:30:00"),
                    Some("2024-04-09 18:55:00"),
                    Some("2024-04-09 18:30:00"),
                ],
            ),
            Column::str("distance", [Some("2.5"), Some("1"), Some("x"), Some("4")]),
            Column::int("passengers_count", [Some(1), Some(6), Some(2), Some(1)]),
        ])
        .unwrap()
    }

    fn dataset() -> Dataset {
        let user = Table::from_columns(vec![
            Column::int("user_id", [Some(10), Some(11)]),
            Column::str("user_type", [Some("staff"), Some("student")]),
        ])
        .unwrap();
        let trip = Table::from_columns(vec![Column::int(
            "history_id",
            [Some(1), Some(1), Some(2), Some(3)],
        )])
        .unwrap();
        Dataset::from_tables([
            (Source::History, history()),
            (Source::User, user),
            (Source::Trip, trip),
        ])
    }

    #[test]
    fn usage_share_sums_to_one_per_type() {
        let d = dataset();
        d.validate(&usage_share()).unwrap();
        let out = usage_share().execute(d.tables()).unwrap();
        let t = out.table(USAGE_SHARE).unwrap();
        // Ride 4 has no known user and is dropped.
        assert_eq!(t.row_count(), 3);
        let rows: Vec<(String, i64, i64, f64)> = (0..t.row_count())
            .map(|r| {
                (
                    t.value(r, "user_type").unwrap().to_string(),
                    t.value(r, "dow").unwrap().as_i64().unwrap(),
                    t.value(r, "hour").unwrap().as_i64().unwrap(),
                    t.value(r, "share_within_type").unwrap().as_f64().unwrap(),
                )
            })
            .collect();
        assert_eq!(
            rows,
            vec![
                ("staff".into(), 0, 9, 0.5),
                ("student".into(), 0, 9, 1.0),
                ("staff".into(), 1, 18, 0.5),
            ]
        );
    }

    #[test]
    fn ride_durations_drop_zero_length_and_unparsed_rides() {
        let out = ride_durations().execute(dataset().tables()).unwrap();
        let t = out.table(RIDE_DURATIONS).unwrap();
        // Ride 2 lasts 0 minutes, ride 3 has no parseable distance, ride 4 no user.
        assert_eq!(
            t.column("history_id").unwrap().data,
            ColumnData::Int(vec![Some(1)])
        );
        assert_eq!(t.value(0, "duration_min"), Some(Value::Int(20)));
        assert_eq!(t.value(0, "distance_f"), Some(Value::Float(2.5)));
    }

    #[test]
    fn passenger_rides_bin_and_summarize() {
        let out = passenger_rides().execute(dataset().tables()).unwrap();
        let rides = out.table(PASSENGER_RIDES).unwrap();
        assert_eq!(
            rides.column("passengers_cat").unwrap().data,
            ColumnData::Str(vec![Some("1".into()), Some("5+".into())])
        );
        let summary = out.table(PASSENGER_SUMMARY).unwrap();
        assert_eq!(summary.row_count(), 2);
        assert_eq!(summary.value(0, "user_type"), Some(Value::from("staff")));
        assert_eq!(summary.value(0, "n"), Some(Value::Int(1)));
        assert_eq!(summary.value(1, "q75"), Some(Value::Float(1.0)));
        assert_eq!(threshold_levels(BIN_THRESHOLD).len(), 5);
    }

    #[test]
    fn ride_features_count_trips_per_ride() {
        let out = ride_features().execute(dataset().tables()).unwrap();
        let t = out.table(RIDE_FEATURES).unwrap();
        // Ride 3 has no parseable distance and ride 4 has no trips.
        assert_eq!(
            t.column("spots_n").unwrap().data,
            ColumnData::Int(vec![Some(2), Some(1)])
        );
        assert_eq!(
            t.column("passengers_bin").unwrap().data,
            ColumnData::Str(vec![Some("1".into()), Some("5+".into())])
        );
        let counts = out.table(PASSENGER_SPOT_COUNTS).unwrap();
        assert_eq!(counts.row_count(), 2);
    }

    #[test]
    fn programs_only_read_history_user_and_trip() {
        let req = ride_features().required_columns();
        assert_eq!(req[&HISTORY]["passengers_count"], ColumnKind::Integer);
        assert_eq!(req[&TRIP]["history_id"], ColumnKind::Key);
        assert!(req.contains_key(&USER));
        assert!(!req.contains_key(&Source::Spot.id()));
        assert!(!usage_share().required_columns().contains_key(&TRIP));
    }
}
