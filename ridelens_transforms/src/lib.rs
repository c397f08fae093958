// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Table transforms for ride analyses.
//!
//! This crate provides:
//! - a small transform IR that models `TableId -> TableId` operators (filter, project, sort,
//!   aggregate, join, derive),
//! - a full-recompute executor over owned [`ridelens_core::Table`]s,
//! - static column requirements, so a program can be checked against loaded data before it
//!   runs, and
//! - plot-side helpers: pivots into dense matrices, per-category value extraction and
//!   descriptive statistics.

mod datetime;
mod extract;
mod pivot;
mod program;
mod requirements;
pub mod stats;
mod transform;

pub use datetime::parse_datetime_lenient;
pub use extract::{distinct_strings, numeric_values, values_by_category};
pub use pivot::{Matrix, pivot_matrix};
pub use program::{ExecutionError, Program, ProgramOutput, threshold_label, threshold_levels};
pub use requirements::{ColumnKind, Requirements};
pub use transform::{
    AggregateField, AggregateOp, CompareOp, Derive, JoinKind, Predicate, SortKey, SortOrder,
    Transform,
};
