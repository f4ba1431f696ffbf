// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration for an hdltest run.
//!
//! A configuration lists the source files to compile and the test-benches to run:
//!
//! ```toml
//! files = ["src/counter.vhd", "tb/tb_counter.vhd"]
//! tests = ["tb_counter"]
//! ```

use crate::errors::ConfigReadError;
use camino::{Utf8Path, Utf8PathBuf};
use indexmap::IndexSet;
use serde::Deserialize;
use tracing::debug;

/// A parsed configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    files: Vec<Utf8PathBuf>,
    tests: Vec<String>,
    duplicate_tests: Vec<String>,
    library: String,
    build_dir: Utf8PathBuf,
}

impl Config {
    /// The library name used when the configuration doesn't specify one.
    pub const DEFAULT_LIBRARY: &'static str = "work";

    /// The build directory used when the configuration doesn't specify one, relative to the
    /// directory containing the configuration file.
    pub const DEFAULT_BUILD_DIR: &'static str = "build";

    /// Reads the configuration at `config_file`.
    ///
    /// Relative source paths and the build directory are resolved against the (absolute)
    /// directory that contains `config_file`.
    pub fn from_file(config_file: &Utf8Path) -> Result<Self, ConfigReadError> {
        let data =
            std::fs::read_to_string(config_file).map_err(|err| ConfigReadError::Read {
                config_file: config_file.to_owned(),
                err,
            })?;
        // Simulators run in the build directory, so paths must not depend on the current
        // directory.
        let config_file_abs =
            config_file
                .canonicalize_utf8()
                .map_err(|err| ConfigReadError::Read {
                    config_file: config_file.to_owned(),
                    err,
                })?;
        let base_dir = config_file_abs.parent().unwrap_or(Utf8Path::new("/"));
        Self::from_str_with_base(&data, base_dir).map_err(|err| ConfigReadError::Parse {
            config_file: config_file.to_owned(),
            err: Box::new(err),
        })
    }

    /// Builds a configuration directly from its parts. Paths are used as given.
    pub fn new(
        files: impl IntoIterator<Item = impl Into<Utf8PathBuf>>,
        tests: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let (tests, duplicate_tests) = dedup_tests(tests.into_iter().map(Into::into));
        Self {
            files: files.into_iter().map(Into::into).collect(),
            tests,
            duplicate_tests,
            library: Self::DEFAULT_LIBRARY.to_owned(),
            build_dir: Utf8PathBuf::from(Self::DEFAULT_BUILD_DIR),
        }
    }

    /// Sets the build directory.
    pub fn with_build_dir(mut self, build_dir: impl Into<Utf8PathBuf>) -> Self {
        self.build_dir = build_dir.into();
        self
    }

    /// Replaces the list of test-benches wholesale, as `--tests` does.
    pub fn set_tests(&mut self, tests: impl IntoIterator<Item = impl Into<String>>) {
        (self.tests, self.duplicate_tests) = dedup_tests(tests.into_iter().map(Into::into));
    }

    /// Returns the source files, in compile order.
    pub fn files(&self) -> &[Utf8PathBuf] {
        &self.files
    }

    /// Returns the test-bench names, in run order.
    pub fn tests(&self) -> &[String] {
        &self.tests
    }

    /// Returns the test-bench names that were listed more than once, each once, in the order
    /// their first repeat was seen.
    pub fn duplicate_tests(&self) -> &[String] {
        &self.duplicate_tests
    }

    /// Returns the name of the library sources are compiled into.
    pub fn library(&self) -> &str {
        &self.library
    }

    /// Returns the directory simulators run in.
    pub fn build_dir(&self) -> &Utf8Path {
        &self.build_dir
    }

    // ---
    // Helper methods
    // ---

    fn from_str_with_base(data: &str, base_dir: &Utf8Path) -> Result<Self, toml::de::Error> {
        let deserialized: ConfigDeserialize = toml::from_str(data)?;
        let (tests, duplicate_tests) = dedup_tests(deserialized.tests);
        Ok(Self {
            files: deserialized
                .files
                .into_iter()
                .map(|file| base_dir.join(file))
                .collect(),
            tests,
            duplicate_tests,
            library: deserialized.library,
            build_dir: base_dir.join(deserialized.build_dir),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ConfigDeserialize {
    #[serde(default)]
    files: Vec<Utf8PathBuf>,
    #[serde(default)]
    tests: Vec<String>,
    #[serde(default = "default_library")]
    library: String,
    #[serde(default = "default_build_dir")]
    build_dir: Utf8PathBuf,
}

fn default_library() -> String {
    Config::DEFAULT_LIBRARY.to_owned()
}

fn default_build_dir() -> Utf8PathBuf {
    Config::DEFAULT_BUILD_DIR.into()
}

// Returns the unique tests in first-seen order, and the names that were repeated.
fn dedup_tests(tests: impl IntoIterator<Item = String>) -> (Vec<String>, Vec<String>) {
    let mut seen = IndexSet::new();
    let mut duplicates = IndexSet::new();
    for test in tests {
        if seen.contains(&test) {
            debug!("test `{test}` is listed more than once");
            duplicates.insert(test);
        } else {
            seen.insert(test);
        }
    }
    (seen.into_iter().collect(), duplicates.into_iter().collect())
}
