// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rendered figures and writing them to disk.

use std::fs;
use std::path::{Path, PathBuf};

use kurbo::Rect;
use ridelens_core::Mark;

use crate::error::AnalysisError;

/// A chart rendered to SVG, identified by its output file name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Figure {
    /// File name inside the figures directory.
    pub file_name: String,
    /// SVG document.
    pub svg: String,
}

impl Figure {
    /// Serializes `marks` inside `view`.
    ///
    /// The file name must be a plain `*.svg` name; anything that could escape the figures
    /// directory is rejected.
    pub fn render(
        file_name: impl Into<String>,
        view: Rect,
        marks: &[Mark],
    ) -> Result<Self, AnalysisError> {
        let file_name = file_name.into();
        check_file_name(&file_name)?;
        let svg = ridelens_svg::render_svg(view, marks);
        tracing::debug!(figure = %file_name, marks = marks.len(), "rendered figure");
        Ok(Self { file_name, svg })
    }
}

fn check_file_name(name: &str) -> Result<(), AnalysisError> {
    let reason = if !name.ends_with(".svg") || name.len() == ".svg".len() {
        Some("expected a non-empty name ending in `.svg`")
    } else if name.contains(['/', '\\']) || name.starts_with('.') {
        Some("figure names may not contain path separators or start with `.`")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(AnalysisError::Render {
            figure: name.to_owned(),
            reason: reason.to_owned(),
        }),
        None => Ok(()),
    }
}

/// Turns a data value into something safe to embed in a figure file name.
///
/// Path separators become `_`, as does a leading `.`.
pub fn file_name_fragment(value: &str) -> String {
    let mut fragment: String = value
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    if fragment.starts_with('.') {
        fragment.replace_range(..1, "_");
    }
    fragment
}

/// Writes every figure into `dir`, creating it if needed. Existing files are overwritten.
///
/// Figures are first written as `*.svg.tmp` siblings and only renamed into place once every
/// one of them was written, so an I/O error leaves no new figure behind.
///
/// Returns the written paths in figure order.
pub fn write_figures(dir: &Path, figures: &[Figure]) -> Result<Vec<PathBuf>, AnalysisError> {
    fs::create_dir_all(dir).map_err(|source| AnalysisError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(figures.len());
    for figure in figures {
        let path = dir.join(&figure.file_name);
        let tmp = dir.join(format!("{}.tmp", figure.file_name));
        if let Err(source) = fs::write(&tmp, &figure.svg) {
            discard(&staged);
            let _ = fs::remove_file(&tmp);
            return Err(AnalysisError::Write { path, source });
        }
        staged.push((tmp, path));
    }
    let mut written = Vec::with_capacity(staged.len());
    for (i, (tmp, path)) in staged.iter().enumerate() {
        if let Err(source) = fs::rename(tmp, path) {
            discard(&staged[i..]);
            return Err(AnalysisError::Write {
                path: path.clone(),
                source,
            });
        }
        tracing::info!(path = %path.display(), "wrote figure");
        written.push(path.clone());
    }
    Ok(written)
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        if let Err(e) = fs::remove_file(tmp) {
            tracing::warn!(path = %tmp.display(), "could not remove staged figure: {e}");
        }
    }
}
