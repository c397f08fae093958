// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stable identifiers.

use core::fmt;

/// Identifies a table slot in a transform program (inputs and intermediate outputs).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub u32);

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "table#{}", self.0)
    }
}

/// Stable identity for a rendered mark.
///
/// Renderers order marks by `(z_index, MarkId)`, so ids double as a deterministic tie-break.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Wraps a raw id.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Derives an id for the `row_key`-th row of `table`.
    ///
    /// The table id occupies the high 32 bits so row marks of different tables never collide.
    pub fn for_row(table: TableId, row_key: u64) -> Self {
        Self((u64::from(table.0) << 32) | (row_key & 0xFFFF_FFFF))
    }

    /// Returns an id offset from this one (wrapping).
    #[must_use]
    pub fn offset(self, delta: u64) -> Self {
        Self(self.0.wrapping_add(delta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_ids_do_not_collide_across_tables() {
        let a = MarkId::for_row(TableId(1), 7);
        let b = MarkId::for_row(TableId(2), 7);
        assert_ne!(a, b);
        assert_eq!(MarkId::for_row(TableId(1), 7), a);
    }
}
