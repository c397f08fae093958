// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end runs of every analysis over fixture datasets.

mod common;

use std::fs;

use common::{Fixture, HISTORY, USER, file_names};
use ridelens_analysis::analyses::{self, Destinations, DistanceDuration, UsageHeatmap};
use ridelens_analysis::{AnalysisError, Stage};

#[test]
fn analysis_01_writes_one_heatmap_per_user_type() {
    let fixture = Fixture::new();
    analyses::run(&UsageHeatmap, &fixture.config()).unwrap();
    assert_eq!(
        file_names(&fixture.figures_dir()),
        ["01_heatmap_dow_hour_staff.svg", "01_heatmap_dow_hour_student.svg"]
    );
    let staff =
        fs::read_to_string(fixture.figures_dir().join("01_heatmap_dow_hour_staff.svg")).unwrap();
    assert!(staff.starts_with("<svg"));
    assert!(staff.contains("(total rides=4)"));
}

#[test]
fn analysis_02_writes_every_figure() {
    let fixture = Fixture::new();
    let written = analyses::run(&DistanceDuration, &fixture.config()).unwrap();
    assert_eq!(written.len(), 6);
    assert_eq!(
        file_names(&fixture.figures_dir()),
        [
            "02_bar_mean_distance_by_passengers.svg",
            "02_boxplot_distance_by_passengers_staff.svg",
            "02_boxplot_distance_by_passengers_student.svg",
            "02_boxplot_distance_by_user_type.svg",
            "02_boxplot_duration_by_user_type.svg",
            "02_scatter_distance_by_passengers.svg",
        ]
    );
}

#[test]
fn analysis_03_writes_every_figure() {
    let fixture = Fixture::new();
    analyses::run(&Destinations, &fixture.config()).unwrap();
    assert_eq!(
        file_names(&fixture.figures_dir()),
        [
            "03_boxplot_distance_by_spots.svg",
            "03_heatmap_passengers_spots.svg",
            "03_jitter_distance_by_spots.svg",
            "03_violin_spots_by_user_type.svg",
        ]
    );
}

#[test]
fn reruns_are_byte_identical() {
    for analysis in analyses::all() {
        let fixture = Fixture::new();
        let first = analyses::run(analysis, &fixture.config()).unwrap();
        let before: Vec<Vec<u8>> = first.iter().map(|p| fs::read(p).unwrap()).collect();
        let second = analyses::run(analysis, &fixture.config()).unwrap();
        let after: Vec<Vec<u8>> = second.iter().map(|p| fs::read(p).unwrap()).collect();
        assert_eq!(first, second, "{}", analysis.name());
        assert!(before == after, "{} output changed between runs", analysis.name());
    }
}

#[test]
fn missing_column_fails_before_writing() {
    let history = HISTORY.replace("passengers_count", "riders");
    let fixture = Fixture::with_files(&[
        ("history.csv", history.as_str()),
        ("user.csv", USER),
        ("trip.csv", common::TRIP),
    ]);
    for analysis in [&DistanceDuration as &dyn analyses::Analysis, &Destinations] {
        let err = analyses::run(analysis, &fixture.config()).unwrap_err();
        assert_eq!(err.stage(), Stage::Schema, "{err}");
        assert!(err.to_string().contains("passengers_count"), "{err}");
    }
    assert!(!fixture.figures_dir().exists());
}

#[test]
fn missing_file_is_a_load_error() {
    let fixture = Fixture::with_files(&[("history.csv", HISTORY)]);
    let err = analyses::run(&UsageHeatmap, &fixture.config()).unwrap_err();
    assert!(matches!(err, AnalysisError::MissingFile { .. }), "{err}");
    assert!(err.to_string().contains("user.csv"));
    assert!(!fixture.figures_dir().exists());
}

#[test]
fn header_only_tables_render_empty_figures() {
    let fixture = Fixture::with_files(&[
        (
            "history.csv",
            "history_id,user_id,started_at,ended_at,distance,passengers_count\n",
        ),
        ("user.csv", "user_id,user_type\n"),
        ("trip.csv", "trip_id,history_id,spot_id\n"),
    ]);
    for analysis in analyses::all() {
        analyses::run(analysis, &fixture.config()).unwrap();
    }
    let names = file_names(&fixture.figures_dir());
    // analysis_02 has no user type with rides, so no per-type box plots.
    assert_eq!(names.len(), 2 + 4 + 4);
    let violin =
        fs::read_to_string(fixture.figures_dir().join("03_violin_spots_by_user_type.svg"))
            .unwrap();
    assert!(violin.contains("no data"));
}

#[test]
fn unwritable_figures_dir_is_a_write_error() {
    let fixture = Fixture::new();
    fs::write(fixture.figures_dir(), "not a directory").unwrap();
    let err = analyses::run(&UsageHeatmap, &fixture.config()).unwrap_err();
    assert_eq!(err.stage(), Stage::Write, "{err}");
    assert!(matches!(err, AnalysisError::Write { .. }), "{err}");
    assert!(
        err.to_string().contains(&fixture.figures_dir().display().to_string()),
        "{err}"
    );
    assert!(fixture.figures_dir().is_file());
}
