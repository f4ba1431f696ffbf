// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The test orchestrator: selects a backend, compiles the sources, runs each test-bench and
//! reports on the results.
//!
//! A run moves through the stages of [`RunStage`] in order and never goes back. The two fatal
//! stages, [`RunStage::NoBackend`] and [`RunStage::CompileFailed`], end the run with an
//! [`OrchestratorError`] after an error line has been written to the log sink.

use crate::{
    backend::{BackendRegistry, SimulatorBackend},
    config::Config,
    errors::{DisplayErrorChain, OrchestratorError},
    helpers::{DisplaySeconds, plural},
    junit::ReportEmitter,
    reporter::{LogLevel, LogSink},
    result::RunResult,
    time::{StopwatchStart, stopwatch},
};
use camino::{Utf8Path, Utf8PathBuf};
use hdltest_metadata::HdlTestExitCode;
use indexmap::IndexMap;
use std::{fmt, time::Duration};
use tracing::debug;

/// Options that control a run, usually taken from the command line.
#[derive(Clone, Debug, Default)]
pub struct OrchestratorOpts {
    /// The simulator to use. Empty means auto-detect.
    pub simulator: String,

    /// Show the full output of every compile and test invocation.
    pub verbose: bool,

    /// Exit with 0 even if tests failed.
    pub exit_zero: bool,

    /// Where to write a JUnit report, if anywhere.
    pub junit_path: Option<Utf8PathBuf>,
}

/// The stage a run is in.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunStage {
    /// Nothing has happened yet.
    Init,

    /// A backend was selected.
    BackendSelected,

    /// The sources compiled without errors.
    Compiled,

    /// Every requested test-bench was run.
    TestsRun,

    /// The JUnit report was written.
    Reported,

    /// The run finished and an exit code was computed.
    Done,

    /// Terminal: no backend could be selected.
    NoBackend,

    /// Terminal: the sources failed to compile.
    CompileFailed,
}

impl RunStage {
    /// Returns true if this is one of the fatal terminal stages.
    pub fn is_fatal(self) -> bool {
        matches!(self, RunStage::NoBackend | RunStage::CompileFailed)
    }
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunStage::Init => "init",
            RunStage::BackendSelected => "backend-selected",
            RunStage::Compiled => "compiled",
            RunStage::TestsRun => "tests-run",
            RunStage::Reported => "reported",
            RunStage::Done => "done",
            RunStage::NoBackend => "no-backend",
            RunStage::CompileFailed => "compile-failed",
        };
        f.write_str(s)
    }
}

/// The state accumulated over a run.
///
/// `passed() + failed()` always equals `test_results().len()`.
#[derive(Clone, Debug)]
pub struct RunState {
    stage: RunStage,
    compile_result: Option<RunResult>,
    test_results: IndexMap<String, RunResult>,
    passed: usize,
    failed: usize,
    total_duration: Duration,
    elapsed: Duration,
}

impl RunState {
    fn new() -> Self {
        Self {
            stage: RunStage::Init,
            compile_result: None,
            test_results: IndexMap::new(),
            passed: 0,
            failed: 0,
            total_duration: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Returns the stage the run reached.
    pub fn stage(&self) -> RunStage {
        self.stage
    }

    /// Returns the result of compiling the sources, if compilation happened.
    pub fn compile_result(&self) -> Option<&RunResult> {
        self.compile_result.as_ref()
    }

    /// Returns the result of every test-bench that was run, in run order.
    pub fn test_results(&self) -> &IndexMap<String, RunResult> {
        &self.test_results
    }

    /// Returns the number of test-benches that passed.
    pub fn passed(&self) -> usize {
        self.passed
    }

    /// Returns the number of test-benches that failed.
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Returns the sum of the durations of every test-bench invocation.
    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    /// Returns the wall-clock time of the run, as of the summary.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn record(&mut self, name: &str, result: RunResult) {
        if result.error() {
            self.failed += 1;
        } else {
            self.passed += 1;
        }
        self.total_duration += result.duration();
        self.test_results.insert(name.to_owned(), result);
    }
}

/// Drives a single run from backend selection to exit code.
#[derive(Debug)]
pub struct TestOrchestrator<'a> {
    registry: &'a BackendRegistry,
    sink: LogSink<'a>,
    opts: OrchestratorOpts,
    state: RunState,
    stopwatch: StopwatchStart,
}

impl<'a> TestOrchestrator<'a> {
    /// Creates a new orchestrator. The wall clock starts now.
    pub fn new(registry: &'a BackendRegistry, sink: LogSink<'a>, opts: OrchestratorOpts) -> Self {
        Self {
            registry,
            sink,
            opts,
            state: RunState::new(),
            stopwatch: stopwatch(),
        }
    }

    /// Runs the configuration to completion and returns the process exit code.
    pub fn run(&mut self, config: &Config) -> Result<i32, OrchestratorError> {
        let mut backend = self.select_backend()?;
        self.run_with_backend(backend.as_mut(), config)
    }

    /// Runs the configuration against an already-selected backend and returns the process exit
    /// code.
    pub fn run_with_backend(
        &mut self,
        backend: &mut dyn SimulatorBackend,
        config: &Config,
    ) -> Result<i32, OrchestratorError> {
        self.state.stage = RunStage::BackendSelected;
        self.compile_source(backend, config)?;
        self.run_tests(backend, config)?;
        self.print_summary(config)?;
        if let Some(path) = self.opts.junit_path.clone() {
            self.emit_report(config, &path)?;
        }

        self.state.stage = RunStage::Done;
        self.sink.flush().map_err(OrchestratorError::WriteOutput)?;
        Ok(self.exit_code())
    }

    /// Returns the state of the run so far.
    pub fn state(&self) -> &RunState {
        &self.state
    }

    /// Consumes the orchestrator, returning the state of the run. This also releases the sink.
    pub fn into_state(self) -> RunState {
        self.state
    }

    /// Returns the exit code for the run as it currently stands.
    ///
    /// Only test failures count. Warnings never change the exit code.
    pub fn exit_code(&self) -> i32 {
        if self.state.failed == 0 || self.opts.exit_zero {
            HdlTestExitCode::OK
        } else {
            HdlTestExitCode::TEST_RUN_FAILED
        }
    }

    // ---
    // Stages
    // ---

    fn select_backend(&mut self) -> Result<Box<dyn SimulatorBackend>, OrchestratorError> {
        let requested = self.opts.simulator.clone();
        match self.registry.create_backend(&requested) {
            Some(backend) => {
                self.write(
                    LogLevel::Info,
                    format_args!(
                        "Using simulator {} from {}",
                        backend.name(),
                        backend.install_path()
                    ),
                )?;
                self.state.stage = RunStage::BackendSelected;
                Ok(backend)
            }
            None => {
                let err = OrchestratorError::NoBackend { requested };
                self.fatal(RunStage::NoBackend, &err)?;
                Err(err)
            }
        }
    }

    fn compile_source(
        &mut self,
        backend: &mut dyn SimulatorBackend,
        config: &Config,
    ) -> Result<(), OrchestratorError> {
        let file_count = config.files().len();
        self.write(
            LogLevel::Info,
            format_args!(
                "Compiling {file_count} file{} into library {}",
                plural(file_count),
                config.library()
            ),
        )?;

        let result = match backend.compile(config) {
            Ok(result) => result,
            Err(err) => {
                let err = OrchestratorError::CompileInvoke {
                    backend: backend.name(),
                    err,
                };
                self.fatal(RunStage::CompileFailed, &err)?;
                return Err(err);
            }
        };

        let level = self.print_level(&result);
        result
            .print(&mut self.sink, level)
            .map_err(OrchestratorError::WriteOutput)?;
        let failed = result.error();
        self.state.compile_result = Some(result);

        if failed {
            let err = OrchestratorError::CompileFailed;
            self.fatal(RunStage::CompileFailed, &err)?;
            return Err(err);
        }

        self.write(LogLevel::Info, "Compile succeeded")?;
        self.sink.write_blank().map_err(OrchestratorError::WriteOutput)?;
        self.state.stage = RunStage::Compiled;
        Ok(())
    }

    fn run_tests(
        &mut self,
        backend: &mut dyn SimulatorBackend,
        config: &Config,
    ) -> Result<(), OrchestratorError> {
        for name in config.duplicate_tests() {
            self.write(
                LogLevel::Warning,
                format_args!("test {name} is listed more than once, running it once"),
            )?;
        }

        for name in config.tests() {
            self.write(LogLevel::Info, format_args!("Starting {name}"))?;

            let stopwatch = stopwatch();
            let result = match backend.test(config, name) {
                Ok(result) => result,
                Err(err) => {
                    let duration = stopwatch.snapshot().duration;
                    self.write(
                        LogLevel::Warning,
                        format_args!("could not run {name}, counting it as failed"),
                    )?;
                    RunResult::failed_to_run(duration, DisplayErrorChain::new(err).to_string())
                }
            };

            let level = self.print_level(&result);
            result
                .print(&mut self.sink, level)
                .map_err(OrchestratorError::WriteOutput)?;
            self.write_verdict(name, &result)?;
            self.sink.write_blank().map_err(OrchestratorError::WriteOutput)?;

            self.state.record(name, result);
        }

        debug!(
            "ran {} tests: {} passed, {} failed",
            self.state.test_results.len(),
            self.state.passed,
            self.state.failed
        );
        self.state.stage = RunStage::TestsRun;
        Ok(())
    }

    fn print_summary(&mut self, config: &Config) -> Result<(), OrchestratorError> {
        self.state.elapsed = self.stopwatch.snapshot().duration;

        self.write(LogLevel::Info, "==== Summary ====")?;
        for name in config.tests() {
            if let Some(result) = self.state.test_results.get(name).cloned() {
                self.write_verdict(name, &result)?;
            }
        }
        self.write(LogLevel::Info, "=================")?;

        let total = self.state.test_results.len();
        let (passed, failed) = (self.state.passed, self.state.failed);
        let (total_duration, elapsed) = (self.state.total_duration, self.state.elapsed);
        self.write(
            LogLevel::Info,
            format_args!("Total: {total} test{}", plural(total)),
        )?;
        if total == 0 {
            self.write(LogLevel::Warning, "No tests were run!")?;
        }
        if passed != 0 {
            self.write(LogLevel::Info, format_args!("Passed: {passed} of {total}"))?;
        }
        if failed != 0 {
            self.write(LogLevel::Error, format_args!("Failed: {failed} of {total}"))?;
        }
        self.write(
            LogLevel::Info,
            format_args!(
                "Total simulation time: {} seconds",
                DisplaySeconds(total_duration)
            ),
        )?;
        self.write(
            LogLevel::Info,
            format_args!("Elapsed time: {} seconds", DisplaySeconds(elapsed)),
        )?;
        if failed != 0 {
            self.write(LogLevel::Warning, "Some failed!")?;
        }
        Ok(())
    }

    fn emit_report(
        &mut self,
        config: &Config,
        path: &Utf8Path,
    ) -> Result<(), OrchestratorError> {
        let snapshot = self.stopwatch.snapshot();
        ReportEmitter::new(config, &self.state.test_results)
            .set_run_time(snapshot.start_time, snapshot.duration)
            .write_to(path)?;
        debug!("wrote JUnit report to {path}");
        self.state.stage = RunStage::Reported;
        Ok(())
    }

    // ---
    // Helper methods
    // ---

    // Verbose mode or a warning shows everything. Errors escalate inside `RunResult::print`.
    fn print_level(&self, result: &RunResult) -> LogLevel {
        if self.opts.verbose || result.warning() {
            LogLevel::Text
        } else {
            LogLevel::Info
        }
    }

    fn write_verdict(&mut self, name: &str, result: &RunResult) -> Result<(), OrchestratorError> {
        let seconds = DisplaySeconds(result.duration());
        if result.error() {
            self.write(LogLevel::Error, format_args!("fail {name} ({seconds} seconds)"))
        } else {
            self.write(LogLevel::Info, format_args!("pass {name} ({seconds} seconds)"))
        }
    }

    fn fatal(&mut self, stage: RunStage, err: &OrchestratorError) -> Result<(), OrchestratorError> {
        self.state.stage = stage;
        self.write(LogLevel::Error, DisplayErrorChain::new(err))?;
        self.sink.flush().map_err(OrchestratorError::WriteOutput)
    }

    fn write(&mut self, level: LogLevel, line: impl fmt::Display) -> Result<(), OrchestratorError> {
        self.sink
            .write_line(level, line)
            .map_err(OrchestratorError::WriteOutput)
    }
}
