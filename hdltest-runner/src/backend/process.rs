// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Invoking simulator tools as child processes.

use crate::{
    errors::BackendError,
    result::{RunFlags, RunResult},
    time::stopwatch,
};
use camino::Utf8Path;
use duct::cmd;
use std::time::Duration;
use tracing::debug;

/// Substrings in a tool's output that mark errors and warnings.
#[derive(Copy, Clone, Debug)]
pub(super) struct OutputMarkers {
    pub(super) errors: &'static [&'static str],
    pub(super) warnings: &'static [&'static str],
}

impl OutputMarkers {
    fn has_error(&self, output: &str) -> bool {
        self.errors.iter().any(|marker| output.contains(marker))
    }

    fn has_warning(&self, output: &str) -> bool {
        self.warnings.iter().any(|marker| output.contains(marker))
    }
}

/// A single tool invocation.
#[derive(Debug)]
pub(super) struct ToolCommand<'a> {
    program: &'a Utf8Path,
    args: Vec<String>,
    dir: &'a Utf8Path,
}

impl<'a> ToolCommand<'a> {
    pub(super) fn new(program: &'a Utf8Path, dir: &'a Utf8Path) -> Self {
        Self {
            program,
            args: Vec::new(),
            dir,
        }
    }

    pub(super) fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub(super) fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Runs the tool to completion, capturing stdout and stderr together.
    ///
    /// A non-zero exit code or an error marker in the output sets `error`. A process that exits
    /// without an exit code (e.g. killed by a signal) sets `failure` as well.
    pub(super) fn run(self, markers: &OutputMarkers) -> Result<RunResult, BackendError> {
        std::fs::create_dir_all(self.dir).map_err(|err| BackendError::WorkDir {
            dir: self.dir.to_owned(),
            err,
        })?;

        let command_str = self.display_command();
        debug!("running `{command_str}` in {}", self.dir);

        let stopwatch = stopwatch();
        let output = cmd(self.program.as_std_path(), &self.args)
            .dir(self.dir)
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked()
            .run()
            .map_err(|err| BackendError::Spawn {
                command: command_str.clone(),
                err,
            })?;
        let duration = stopwatch.snapshot().duration;

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        let exit_code = output.status.code();
        debug!("`{command_str}` exited with {exit_code:?} in {duration:?}");

        let flags = RunFlags {
            warning: markers.has_warning(&text),
            error: exit_code != Some(0) || markers.has_error(&text),
            failure: exit_code.is_none(),
        };
        Ok(RunResult::new(duration, text, flags))
    }

    fn display_command(&self) -> String {
        let mut s = self.program.to_string();
        for arg in &self.args {
            s.push(' ');
            s.push_str(arg);
        }
        s
    }
}

/// Combines the results of two invocations that together form one logical step.
pub(super) fn combine(first: RunResult, second: RunResult) -> RunResult {
    let (a, b) = (first.flags(), second.flags());
    let mut output = first.output().to_owned();
    output.push_str(second.output());
    RunResult::new(
        first.duration() + second.duration(),
        output,
        RunFlags {
            warning: a.warning || b.warning,
            error: a.error || b.error,
            failure: a.failure || b.failure,
        },
    )
}

/// Runs `steps` in order, stopping at the first one that reports an error.
pub(super) fn run_steps(
    steps: Vec<ToolCommand<'_>>,
    markers: &OutputMarkers,
) -> Result<RunResult, BackendError> {
    let mut combined = RunResult::new(Duration::ZERO, "", RunFlags::CLEAN);
    for step in steps {
        let result = step.run(markers)?;
        combined = combine(combined, result);
        if combined.error() {
            break;
        }
    }
    Ok(combined)
}
