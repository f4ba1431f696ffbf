// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError,
    errors::Result,
    output::{OutputContext, OutputOpts, OutputWriter, clap_styles},
};
use camino::Utf8PathBuf;
use clap::{CommandFactory, Parser};
use hdltest_runner::{
    backend::{BackendRegistry, SearchPath},
    config::Config,
    orchestrator::{OrchestratorOpts, TestOrchestrator},
    reporter::LogSink,
};
use std::io::Write;
use tracing::debug;

/// Compile an HDL source set with an external simulator and run its test-benches.
///
/// The configuration file lists the sources to compile, in order, and the test-benches to run.
/// The simulator is picked from the ones found on PATH unless --simulator is passed.
#[derive(Debug, Parser)]
#[command(version, styles = clap_styles::style())]
pub struct HdlTestApp {
    /// Configuration file listing source files and test-benches
    #[arg(long, value_name = "PATH")]
    config: Option<Utf8PathBuf>,

    /// Also write all output to this file, without colors
    #[arg(long, value_name = "PATH")]
    log: Option<Utf8PathBuf>,

    /// Write a JUnit XML report to this file
    #[arg(long, value_name = "PATH")]
    junit: Option<Utf8PathBuf>,

    /// Run these test-benches instead of the ones in the configuration file
    #[arg(long, value_name = "NAME", num_args = 1..)]
    tests: Option<Vec<String>>,

    /// Simulator to use, e.g. modelsim or nvc [default: first one found]
    #[arg(long, value_name = "NAME")]
    simulator: Option<String>,

    /// Exit with 0 even if some test-benches failed
    #[arg(long = "exit-0")]
    exit_0: bool,

    #[command(flatten)]
    output: OutputOpts,
}

impl HdlTestApp {
    /// Initializes the output context: logging and colors.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code.
    pub fn exec(self, output: OutputContext, writer: &mut OutputWriter) -> Result<i32> {
        self.exec_with_search_path(output, writer, SearchPath::from_env())
    }

    pub(crate) fn exec_with_search_path(
        self,
        output: OutputContext,
        writer: &mut OutputWriter,
        search_path: SearchPath,
    ) -> Result<i32> {
        let Some(config_path) = self.config else {
            let help = Self::command().render_help();
            // Failing to print help doesn't change the outcome.
            let _ = writeln!(writer.stderr_writer(), "{help}");
            return Err(ExpectedError::ConfigNotSpecified);
        };

        let mut config = Config::from_file(&config_path)?;
        if let Some(tests) = self.tests {
            debug!("overriding tests from {config_path} with {tests:?}");
            config.set_tests(tests);
        }

        let registry = BackendRegistry::new(search_path);
        let mut sink = LogSink::new(writer.sink_output());
        if output.colorize_sink() {
            sink.colorize();
        }
        if let Some(log) = self.log {
            sink.tee_to_file(&log)
                .map_err(|err| ExpectedError::log_file_create(log, err))?;
        }

        let opts = OrchestratorOpts {
            simulator: self.simulator.unwrap_or_default(),
            verbose: output.verbose,
            exit_zero: self.exit_0,
            junit_path: self.junit,
        };
        let mut orchestrator = TestOrchestrator::new(&registry, sink, opts);
        let code = orchestrator.run(&config)?;
        Ok(code)
    }
}
