// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The outcome of a single simulator invocation.

use crate::{
    helpers::plural,
    reporter::{LogLevel, LogSink},
};
use std::{io, time::Duration};

/// Flags derived by a backend from a simulator's output and exit status.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RunFlags {
    /// The tool reported at least one warning.
    pub warning: bool,

    /// The tool ran and reported an error: a compile error or a failing test-bench.
    pub error: bool,

    /// No valid result could be obtained from the tool at all.
    pub failure: bool,
}

impl RunFlags {
    /// Flags for a clean invocation.
    pub const CLEAN: Self = Self {
        warning: false,
        error: false,
        failure: false,
    };
}

/// The immutable outcome of one compile or test invocation.
///
/// `failure` and `error` may both be set. Consumers that must pick one, such as the JUnit report,
/// prefer `failure`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunResult {
    duration: Duration,
    output: String,
    flags: RunFlags,
}

impl RunResult {
    /// Creates a new result.
    pub fn new(duration: Duration, output: impl Into<String>, flags: RunFlags) -> Self {
        Self {
            duration,
            output: output.into(),
            flags,
        }
    }

    /// Creates a result for an invocation that could not produce any output.
    ///
    /// Both `failure` and `error` are set, so the invocation counts as failed.
    pub fn failed_to_run(duration: Duration, message: impl Into<String>) -> Self {
        Self::new(
            duration,
            message,
            RunFlags {
                warning: false,
                error: true,
                failure: true,
            },
        )
    }

    /// Returns how long the invocation took.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the captured output, with stdout and stderr combined.
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Returns all flags.
    pub fn flags(&self) -> RunFlags {
        self.flags
    }

    /// Returns true if the tool reported a warning.
    pub fn warning(&self) -> bool {
        self.flags.warning
    }

    /// Returns true if the tool reported an error.
    pub fn error(&self) -> bool {
        self.flags.error
    }

    /// Returns true if no valid result could be obtained from the tool.
    pub fn failure(&self) -> bool {
        self.flags.failure
    }

    /// Writes this result to `sink`.
    ///
    /// The full output is written if `level` is [`LogLevel::Text`], or if this result carries a
    /// warning or an error regardless of `level`. Otherwise only a one-line note is written.
    pub fn print(&self, sink: &mut LogSink<'_>, level: LogLevel) -> io::Result<()> {
        if level == LogLevel::Text || self.flags.warning || self.flags.error {
            sink.write_lines(LogLevel::Text, &self.output)
        } else {
            let line_count = self.output.lines().count();
            if line_count == 0 {
                return Ok(());
            }
            sink.write_line(
                LogLevel::Info,
                format_args!(
                    "({line_count} line{} of output hidden, rerun with --verbose to show)",
                    plural(line_count)
                ),
            )
        }
    }
}
