// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::NO_HEADING_TARGET;
use camino::Utf8PathBuf;
use hdltest_metadata::HdlTestExitCode;
use hdltest_runner::errors::{ConfigReadError, OrchestratorError};
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// The #[error()] strings are placeholders: errors are printed with `display_to_stderr`.

/// An error that ends an hdltest run with a non-zero exit code.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("no config file specified")]
    ConfigNotSpecified,

    #[error("config read error")]
    ConfigRead {
        #[from]
        err: ConfigReadError,
    },

    #[error("failed to create log file")]
    LogFileCreate {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },

    #[error("run failed")]
    Orchestrator {
        #[from]
        err: OrchestratorError,
    },
}

impl ExpectedError {
    pub(crate) fn log_file_create(path: Utf8PathBuf, err: std::io::Error) -> Self {
        Self::LogFileCreate { path, err }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotSpecified | Self::ConfigRead { .. } | Self::LogFileCreate { .. } => {
                HdlTestExitCode::SETUP_FAILED
            }
            Self::Orchestrator { err } => err.process_exit_code(),
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self) {
        let mut next_error = match self {
            Self::ConfigNotSpecified => {
                error!("no config file specified, pass one with --config");
                None
            }
            Self::ConfigRead { err } => {
                error!("{err}");
                err.source()
            }
            Self::LogFileCreate { path, err } => {
                error!("failed to create log file `{path}`");
                Some(err as &dyn Error)
            }
            Self::Orchestrator { err } => {
                if err.is_reported() {
                    // The orchestrator already wrote this to the console and log file.
                    None
                } else {
                    error!("{err}");
                    err.source()
                }
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
