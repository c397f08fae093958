// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core data model for `ridelens`.
//!
//! This crate holds the two vocabularies the other crates speak:
//! - **Tables**: immutable, typed, column-oriented data ([`Table`], [`Column`], [`Value`]).
//!   Datasets are loaded into tables once per run and every derived table is a fresh value.
//! - **Marks**: positioned render primitives ([`Mark`]) with stable identity ([`MarkId`]) and an
//!   explicit `z_index`, produced by the chart layer and consumed by renderers.
//!
//! Marks carry resolved geometry only. Encoding/recompute machinery is out of scope.

mod ids;
mod mark;
mod table;
mod value;

pub use ids::{MarkId, TableId};
pub use mark::{
    Mark, MarkBuilder, MarkKind, MarkPayload, PathMark, PathMarkBuilder, RectMark,
    RectMarkBuilder, TextAnchor, TextBaseline, TextMark, TextMarkBuilder,
};
pub use table::{Column, ColumnData, Table, TableError};
pub use value::{DataType, Value};
