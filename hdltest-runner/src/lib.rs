// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core logic for hdltest: compile a hardware-description source set with an external
//! simulator, run a list of test-benches against it, and report the results.
//!
//! The entry point is [`TestOrchestrator`](orchestrator::TestOrchestrator). Simulators are
//! reached through the [`SimulatorBackend`](backend::SimulatorBackend) trait, and selected by a
//! [`BackendRegistry`](backend::BackendRegistry).

#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod errors;
mod helpers;
pub mod junit;
pub mod orchestrator;
pub mod reporter;
pub mod result;
mod time;
