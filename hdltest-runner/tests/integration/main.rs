// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests that run the orchestrator against fake simulator tools.
//!
//! The fake tools are shell scripts, so these tests only run on Unix.

#![cfg(unix)]

mod fixtures;
mod modelsim;
mod nvc;
