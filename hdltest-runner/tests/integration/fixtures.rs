// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use camino_tempfile::{Utf8TempDir, tempdir};
use hdltest_runner::{
    backend::{BackendRegistry, SearchPath},
    config::Config,
    errors::OrchestratorError,
    orchestrator::{OrchestratorOpts, RunState, TestOrchestrator},
    reporter::{LogSink, SinkOutput},
};
use std::os::unix::fs::PermissionsExt;

/// A temporary project with a `bin` directory of fake simulator tools.
#[derive(Debug)]
pub(crate) struct FakeProject {
    dir: Utf8TempDir,
}

impl FakeProject {
    pub(crate) fn new() -> Self {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("bin")).unwrap();
        Self { dir }
    }

    pub(crate) fn root(&self) -> &Utf8Path {
        self.dir.path()
    }

    pub(crate) fn bin_dir(&self) -> Utf8PathBuf {
        self.root().join("bin")
    }

    /// Installs an executable shell script named `name` into `bin`.
    pub(crate) fn install(&self, name: &str, script: &str) {
        let path = self.bin_dir().join(name);
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    /// Writes `hdltest.toml` and reads it back.
    pub(crate) fn config(&self, files: &[&str], tests: &[&str]) -> Config {
        let quote = |items: &[&str]| {
            items
                .iter()
                .map(|item| format!("\"{item}\""))
                .collect::<Vec<_>>()
                .join(", ")
        };
        let config_path = self.root().join("hdltest.toml");
        std::fs::write(
            &config_path,
            format!("files = [{}]\ntests = [{}]\n", quote(files), quote(tests)),
        )
        .unwrap();
        Config::from_file(&config_path).unwrap()
    }

    /// Reads the calls the fake tools logged to `calls.log` in the build directory.
    pub(crate) fn calls(&self, config: &Config) -> Vec<String> {
        match std::fs::read_to_string(config.build_dir().join("calls.log")) {
            Ok(calls) => calls.lines().map(str::to_owned).collect(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(err) => panic!("failed to read calls.log: {err}"),
        }
    }

    pub(crate) fn run(&self, config: &Config, opts: OrchestratorOpts) -> RunOutput {
        let registry = BackendRegistry::new(SearchPath::new([self.bin_dir()]));
        let mut buf = Vec::new();
        let mut orchestrator =
            TestOrchestrator::new(&registry, LogSink::new(SinkOutput::Buffer(&mut buf)), opts);
        let result = orchestrator.run(config);
        let state = orchestrator.into_state();
        RunOutput {
            result,
            state,
            output: String::from_utf8(buf).unwrap(),
        }
    }
}

pub(crate) struct RunOutput {
    pub(crate) result: Result<i32, OrchestratorError>,
    pub(crate) state: RunState,
    pub(crate) output: String,
}
