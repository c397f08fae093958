// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Analysis failures and the stage each one belongs to.

use std::fmt;
use std::io;
use std::path::PathBuf;

use ridelens_core::TableError;
use ridelens_transforms::ExecutionError;

/// The pipeline stage a failure happened in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Reading dataset files.
    Load,
    /// Checking loaded tables against the columns an analysis reads.
    Schema,
    /// Running transforms and statistics.
    Compute,
    /// Building figures in memory.
    Render,
    /// Writing figure files.
    Write,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load => "load",
            Self::Schema => "schema",
            Self::Compute => "compute",
            Self::Render => "render",
            Self::Write => "write",
        })
    }
}

/// Errors returned by an analysis run. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// A dataset file does not exist.
    #[error("dataset file {} not found", path.display())]
    MissingFile {
        /// Expected location.
        path: PathBuf,
    },
    /// A dataset file could not be read or parsed as CSV.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        /// File being read.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
    /// A dataset file parsed, but its columns do not form a table (e.g. repeated headers).
    #[error("invalid table in {}: {source}", path.display())]
    Table {
        /// File being read.
        path: PathBuf,
        /// Underlying table error.
        #[source]
        source: TableError,
    },
    /// Loaded tables lack a column, or hold it with the wrong type.
    #[error("schema check failed: {0}")]
    Schema(#[source] ExecutionError),
    /// A transform failed while running.
    #[error("computation failed: {0}")]
    Compute(#[from] ExecutionError),
    /// A figure could not be built.
    #[error("cannot render figure `{figure}`: {reason}")]
    Render {
        /// Figure file name.
        figure: String,
        /// What went wrong.
        reason: String,
    },
    /// A figure file or the output directory could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl AnalysisError {
    /// The stage this error aborted.
    pub fn stage(&self) -> Stage {
        match self {
            Self::MissingFile { .. } | Self::Read { .. } | Self::Table { .. } => Stage::Load,
            Self::Schema(_) => Stage::Schema,
            Self::Compute(_) => Stage::Compute,
            Self::Render { .. } => Stage::Render,
            Self::Write { .. } => Stage::Write,
        }
    }
}
