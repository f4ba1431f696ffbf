// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Code to generate JUnit XML reports from run results.

use crate::{config::Config, errors::ReportWriteError, result::RunResult};
use camino::Utf8Path;
use chrono::{DateTime, Local};
use indexmap::IndexMap;
use quick_junit::{NonSuccessKind, Report, TestCase, TestCaseStatus, TestSuite};
use std::{fs::File, time::Duration};
use tracing::debug;

/// The name of the report written by hdltest.
pub const REPORT_NAME: &str = "hdltest";

/// The name of the single test suite in the report.
pub const TEST_SUITE_NAME: &str = "testsuite";

/// Turns a finished run into a JUnit report.
#[derive(Clone, Debug)]
pub struct ReportEmitter<'a> {
    config: &'a Config,
    results: &'a IndexMap<String, RunResult>,
    start_time: Option<DateTime<Local>>,
    elapsed: Option<Duration>,
}

impl<'a> ReportEmitter<'a> {
    /// Creates a new emitter over the given results.
    ///
    /// Records are emitted in `config.tests()` order.
    pub fn new(config: &'a Config, results: &'a IndexMap<String, RunResult>) -> Self {
        Self {
            config,
            results,
            start_time: None,
            elapsed: None,
        }
    }

    /// Sets the wall-clock start time and duration of the run.
    pub fn set_run_time(&mut self, start_time: DateTime<Local>, elapsed: Duration) -> &mut Self {
        self.start_time = Some(start_time);
        self.elapsed = Some(elapsed);
        self
    }

    /// Builds the report: one test case per requested test, in request order.
    pub fn build(&self) -> Report {
        let mut test_suite = TestSuite::new(TEST_SUITE_NAME);
        for name in self.config.tests() {
            match self.results.get(name) {
                Some(result) => {
                    test_suite.add_test_case(test_case(name, result));
                }
                None => debug!("no result for {name}, leaving it out of the report"),
            }
        }
        if let Some(start_time) = self.start_time {
            test_suite.set_timestamp(start_time);
        }
        if let Some(elapsed) = self.elapsed {
            test_suite.set_time(elapsed);
        }

        let mut report = Report::new(REPORT_NAME);
        if let Some(start_time) = self.start_time {
            report.set_timestamp(start_time);
        }
        if let Some(elapsed) = self.elapsed {
            report.set_time(elapsed);
        }
        report.add_test_suites([test_suite]);
        report
    }

    /// Builds the report and writes it to `path`, creating parent directories as needed.
    pub fn write_to(&self, path: &Utf8Path) -> Result<(), ReportWriteError> {
        if let Some(dir) = path.parent().filter(|dir| !dir.as_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|error| ReportWriteError::Fs {
                file: dir.to_path_buf(),
                error,
            })?;
        }

        let f = File::create(path).map_err(|error| ReportWriteError::Fs {
            file: path.to_path_buf(),
            error,
        })?;
        self.build()
            .serialize(f)
            .map_err(|error| ReportWriteError::Junit {
                file: path.to_path_buf(),
                error,
            })
    }
}

fn test_case(name: &str, result: &RunResult) -> TestCase {
    // A failure (no valid result at all) takes precedence over an error (the test ran and
    // failed), even though both flags may be set.
    let status = if result.failure() {
        let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
        status.set_type("could not run test");
        status
    } else if result.error() {
        let mut status = TestCaseStatus::non_success(NonSuccessKind::Error);
        status.set_type("test failed");
        status
    } else {
        TestCaseStatus::success()
    };

    let mut test_case = TestCase::new(name, status);
    test_case
        .set_classname(name)
        .set_time(result.duration())
        .set_system_out(result.output());
    test_case
}
