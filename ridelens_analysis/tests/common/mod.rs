// Copyright 2025 the RideLens Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixture datasets written into temporary directories.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const HISTORY: &str = "\
history_id,user_id,started_at,ended_at,distance,passengers_count
1,10,2024-04-08 08:05:00,2024-04-08 08:35:00,3.2,1
2,10,2024-04-08 08:40:00,2024-04-08 09:00:00,1.1,2
3,11,2024-04-09 17:10:00,2024-04-09 17:55:00,6.4,1
4,12,2024-04-10 12:00:00,2024-04-10 12:25:00,2.0,5
5,11,2024-04-13 21:30:00,2024-04-13 22:00:00,4.8,3
6,12,2024-04-14 09:15:00,2024-04-14 09:15:00,0.0,1
7,13,2024-04-11 07:50:00,2024-04-11 08:20:00,n/a,2
8,10,2024-04-12 18:00:00,2024-04-12 18:40:00,7.5,
";

pub const USER: &str = "\
user_id,user_type,name
10,staff,Ann
11,student,Bo
12,student,Cy
13,staff,Di
";

pub const TRIP: &str = "\
trip_id,history_id,spot_id
1,1,100
2,1,101
3,2,100
4,3,102
5,3,103
6,3,104
7,4,100
8,5,101
9,5,102
10,8,100
";

pub const SPOT: &str = "\
spot_id,name
100,Library
101,Gym
102,Station
103,Hall
104,Park
";

/// A dataset directory plus a figures directory that does not exist yet.
pub struct Fixture {
    pub root: TempDir,
}

impl Fixture {
    /// Writes the four standard tables.
    pub fn new() -> Self {
        Self::with_files(&[
            ("history.csv", HISTORY),
            ("user.csv", USER),
            ("trip.csv", TRIP),
            ("spot.csv", SPOT),
        ])
    }

    /// Writes the given files into the data directory.
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let root = tempfile::tempdir().unwrap();
        let data = root.path().join("data");
        fs::create_dir(&data).unwrap();
        for (name, contents) in files {
            fs::write(data.join(name), contents).unwrap();
        }
        Self { root }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.path().join("data")
    }

    pub fn figures_dir(&self) -> PathBuf {
        self.root.path().join("figures")
    }

    pub fn config(&self) -> ridelens_analysis::Config {
        ridelens_analysis::Config::new(self.data_dir(), self.figures_dir())
    }
}

/// File names in `dir`, sorted.
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
