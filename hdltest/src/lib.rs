// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `hdltest` command-line interface.
//!
//! Compiles the sources listed in a configuration file with an external simulator, runs the
//! listed test-benches and reports the results. The logic lives in `hdltest-runner`; this crate
//! parses options, sets up logging and maps the outcome to an exit code.

mod dispatch;
mod errors;
mod output;

pub use dispatch::HdlTestApp;
#[doc(hidden)]
pub use errors::ExpectedError;
pub use output::{Color, OutputContext, OutputWriter};
