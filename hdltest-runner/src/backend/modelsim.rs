// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{
    SimulatorBackend, executable_file_name,
    process::{OutputMarkers, ToolCommand, run_steps},
};
use crate::{config::Config, errors::BackendError, result::RunResult};
use camino::{Utf8Path, Utf8PathBuf};

const MARKERS: OutputMarkers = OutputMarkers {
    errors: &["** Error", "** Fatal", "** Failure"],
    warnings: &["** Warning"],
};

/// ModelSim and Questa: `vlib` + `vcom` to compile, `vsim` in command-line mode to run.
#[derive(Debug)]
pub(super) struct ModelSimBackend {
    install_path: Utf8PathBuf,
    vlib: Utf8PathBuf,
    vcom: Utf8PathBuf,
    vsim: Utf8PathBuf,
}

impl ModelSimBackend {
    pub(super) fn new(install_path: Utf8PathBuf) -> Self {
        Self {
            vlib: install_path.join(executable_file_name("vlib")),
            vcom: install_path.join(executable_file_name("vcom")),
            vsim: install_path.join(executable_file_name("vsim")),
            install_path,
        }
    }
}

impl SimulatorBackend for ModelSimBackend {
    fn name(&self) -> &'static str {
        "modelsim"
    }

    fn install_path(&self) -> &Utf8Path {
        &self.install_path
    }

    fn compile(&mut self, config: &Config) -> Result<RunResult, BackendError> {
        let dir = config.build_dir();
        let steps = vec![
            ToolCommand::new(&self.vlib, dir).arg(config.library()),
            ToolCommand::new(&self.vcom, dir)
                .args(["-2008", "-work", config.library()])
                .args(config.files().iter().map(|file| file.as_str())),
        ];
        run_steps(steps, &MARKERS)
    }

    fn test(&mut self, config: &Config, test_name: &str) -> Result<RunResult, BackendError> {
        ToolCommand::new(&self.vsim, config.build_dir())
            .args(["-c", "-quiet", "-do", "run -all; quit -f"])
            .arg(format!("{}.{test_name}", config.library()))
            .run(&MARKERS)
    }
}
