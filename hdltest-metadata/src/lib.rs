// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Machine-readable metadata for hdltest runs.
//!
//! Currently this is limited to the set of exit codes that `hdltest` documents, so that wrapper
//! scripts and CI integrations can depend on them without pulling in the runner.

#![warn(missing_docs)]

mod exit_codes;

pub use exit_codes::*;
