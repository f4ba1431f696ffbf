// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by hdltest.

use crate::backend::BackendKind;
use camino::Utf8PathBuf;
use hdltest_metadata::HdlTestExitCode;
use thiserror::Error;

/// An error that occurred while reading a configuration file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigReadError {
    /// The configuration file could not be read.
    #[error("failed to read config file at `{config_file}`")]
    Read {
        /// The configuration file.
        config_file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        err: std::io::Error,
    },

    /// The configuration file is not valid TOML, or does not match the expected schema.
    #[error("failed to parse config file at `{config_file}`")]
    Parse {
        /// The configuration file.
        config_file: Utf8PathBuf,

        /// The underlying TOML error.
        #[source]
        err: Box<toml::de::Error>,
    },
}

/// A simulator backend could not be created because its tool is not installed.
#[derive(Clone, Debug, Error)]
#[error("simulator `{kind}` is not available on the search path")]
pub struct BackendUnavailable {
    kind: BackendKind,
}

impl BackendUnavailable {
    pub(crate) fn new(kind: BackendKind) -> Self {
        Self { kind }
    }

    /// Returns the backend that was requested.
    pub fn kind(&self) -> BackendKind {
        self.kind
    }
}

/// An error that occurred while invoking a simulator tool.
///
/// Ordinary compile errors and failing test-benches are *not* reported through this type: they
/// are communicated through the flags on [`RunResult`](crate::result::RunResult). This error means
/// the tool could not be invoked at all.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BackendError {
    /// The working directory for the simulator could not be created.
    #[error("failed to create simulator working directory `{dir}`")]
    WorkDir {
        /// The directory that was being created.
        dir: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        err: std::io::Error,
    },

    /// The tool could not be spawned or waited on.
    #[error("failed to execute `{command}`")]
    Spawn {
        /// The command line that was executed.
        command: String,

        /// The underlying IO error.
        #[source]
        err: std::io::Error,
    },
}

/// An error that occurred while writing a JUnit report.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportWriteError {
    /// An error occurred while operating on the file system.
    #[error("error operating on path {file}")]
    Fs {
        /// The file being operated on.
        file: Utf8PathBuf,

        /// The underlying IO error.
        #[source]
        error: std::io::Error,
    },

    /// An error occurred while producing JUnit XML.
    #[error("error writing JUnit output to {file}")]
    Junit {
        /// The output file.
        file: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: quick_junit::SerializeError,
    },
}

/// An error that ended a test run early.
///
/// For the fatal stages ([`NoBackend`](Self::NoBackend) and
/// [`CompileFailed`](Self::CompileFailed)), the orchestrator has already written an error line to
/// its log sink by the time this error is returned.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OrchestratorError {
    /// No simulator backend could be selected.
    #[error("{}", no_backend_message(.requested))]
    NoBackend {
        /// The requested backend name, or empty for auto-detection.
        requested: String,
    },

    /// The simulator could not be invoked to compile the sources.
    #[error("failed to invoke {backend} to compile sources")]
    CompileInvoke {
        /// The backend name.
        backend: &'static str,

        /// The underlying error.
        #[source]
        err: BackendError,
    },

    /// Compiling the sources produced an error.
    #[error("failed to compile sources")]
    CompileFailed,

    /// Writing to the log sink failed.
    #[error("error writing output")]
    WriteOutput(#[source] std::io::Error),

    /// Writing the JUnit report failed.
    #[error("failed to write JUnit report")]
    Report(#[from] ReportWriteError),
}

impl OrchestratorError {
    /// Returns true if the orchestrator already wrote a message about this error to its log sink.
    pub fn is_reported(&self) -> bool {
        matches!(
            self,
            Self::NoBackend { .. } | Self::CompileInvoke { .. } | Self::CompileFailed
        )
    }

    /// Returns the process exit code for this error.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::NoBackend { .. } => HdlTestExitCode::SETUP_FAILED,
            Self::CompileInvoke { .. } | Self::CompileFailed => HdlTestExitCode::COMPILE_FAILED,
            Self::WriteOutput(_) | Self::Report(_) => HdlTestExitCode::WRITE_OUTPUT_ERROR,
        }
    }
}

fn no_backend_message(requested: &str) -> String {
    if requested.is_empty() {
        "no available simulator found".to_owned()
    } else {
        format!("simulator `{requested}` not found")
    }
}

/// Displays an error along with its chain of sources, separated by `: `.
#[derive(Debug)]
pub struct DisplayErrorChain<E>(E);

impl<E: std::error::Error> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self(error)
    }
}

impl<E: std::error::Error> std::fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)?;
        let mut source = self.0.source();
        while let Some(err) = source {
            write!(f, ": {err}")?;
            source = err.source();
        }
        Ok(())
    }
}
