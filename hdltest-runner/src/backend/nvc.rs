// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    SimulatorBackend, executable_file_name,
    process::{OutputMarkers, ToolCommand},
};
use crate::{config::Config, errors::BackendError, result::RunResult};
use camino::{Utf8Path, Utf8PathBuf};

const MARKERS: OutputMarkers = OutputMarkers {
    errors: &["** Error:", "** Fatal:", "** Failure:"],
    warnings: &["** Warning:"],
};

/// NVC: `nvc -a` to analyse, `nvc -e -r` to elaborate and run.
#[derive(Debug)]
pub(super) struct NvcBackend {
    install_path: Utf8PathBuf,
    nvc: Utf8PathBuf,
}

impl NvcBackend {
    pub(super) fn new(install_path: Utf8PathBuf) -> Self {
        Self {
            nvc: install_path.join(executable_file_name("nvc")),
            install_path,
        }
    }

    fn work_arg(config: &Config) -> String {
        format!("--work={}", config.library())
    }
}

impl SimulatorBackend for NvcBackend {
    fn name(&self) -> &'static str {
        "nvc"
    }

    fn install_path(&self) -> &Utf8Path {
        &self.install_path
    }

    fn compile(&mut self, config: &Config) -> Result<RunResult, BackendError> {
        ToolCommand::new(&self.nvc, config.build_dir())
            .args([Self::work_arg(config), "--std=2008".to_owned(), "-a".to_owned()])
            .args(config.files().iter().map(|file| file.as_str()))
            .run(&MARKERS)
    }

    fn test(&mut self, config: &Config, test_name: &str) -> Result<RunResult, BackendError> {
        ToolCommand::new(&self.nvc, config.build_dir())
            .args([Self::work_arg(config), "--std=2008".to_owned()])
            .args(["-e", test_name, "-r"])
            .run(&MARKERS)
    }
}
