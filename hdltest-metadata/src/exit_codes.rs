// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `hdltest` runs.
///
/// CI systems historically only distinguish zero from non-zero, so every failure maps to 1. The
/// separate names document *why* a run failed and keep call sites readable.
pub enum HdlTestExitCode {}

impl HdlTestExitCode {
    /// All requested test-benches passed, or failures were overridden with `--exit-0`.
    pub const OK: i32 = 0;

    /// One or more test-benches failed.
    pub const TEST_RUN_FAILED: i32 = 1;

    /// The run could not start: no configuration, no usable simulator, or an unreadable config.
    pub const SETUP_FAILED: i32 = 1;

    /// Compiling the source set failed.
    ///
    /// This is not affected by `--exit-0`: a failed compile means no test result can be trusted.
    pub const COMPILE_FAILED: i32 = 1;

    /// Writing console output, the log file or the JUnit report failed.
    pub const WRITE_OUTPUT_ERROR: i32 = 1;
}
