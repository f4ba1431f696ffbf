// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Simulator backends.
//!
//! A backend adapts one external simulation tool. The set of supported tools is closed and
//! described by [`BackendKind`]; a [`BackendRegistry`] picks one of them, either by name or by
//! checking which tools are installed.

mod modelsim;
mod nvc;
mod process;
mod registry;

pub use registry::*;

use crate::{
    config::Config,
    errors::{BackendError, BackendUnavailable},
    result::RunResult,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::{ffi::OsString, fmt};
use tracing::debug;

/// A simulator that can compile a source set and run test-benches against it.
///
/// Both operations return `Ok` for ordinary compile errors and failing test-benches: those are
/// communicated through the flags on [`RunResult`]. `Err` is reserved for the tool not being
/// invocable at all.
pub trait SimulatorBackend: fmt::Debug {
    /// Returns the registry name of this backend.
    fn name(&self) -> &'static str;

    /// Returns the directory the tool was found in.
    fn install_path(&self) -> &Utf8Path;

    /// Compiles every file in `config.files()`, in order.
    fn compile(&mut self, config: &Config) -> Result<RunResult, BackendError>;

    /// Runs the test-bench `test_name` against the compiled library.
    fn test(&mut self, config: &Config, test_name: &str) -> Result<RunResult, BackendError>;
}

/// The simulators hdltest knows about.
///
/// The declaration order is the auto-detection priority used by
/// [`BackendRegistry::new`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Siemens ModelSim or Questa.
    ModelSim,

    /// The NVC VHDL compiler and simulator.
    Nvc,
}

impl BackendKind {
    /// All known backends, in auto-detection order.
    pub const ALL: &'static [BackendKind] = &[BackendKind::ModelSim, BackendKind::Nvc];

    /// Returns the lowercase registry name of this backend.
    pub fn name(self) -> &'static str {
        match self {
            BackendKind::ModelSim => "modelsim",
            BackendKind::Nvc => "nvc",
        }
    }

    /// Returns the directory containing this backend's tools, or `None` if they aren't installed.
    pub fn find_install_path(self, search_path: &SearchPath) -> Option<Utf8PathBuf> {
        let executable = self.marker_executable();
        let found = search_path.find_executable(executable);
        debug!(
            "looking for {} (`{executable}`): {}",
            self.name(),
            found.as_deref().map_or("not found", |path| path.as_str()),
        );
        found.and_then(|path| path.parent().map(Utf8Path::to_path_buf))
    }

    /// Returns true if this backend's tools are installed.
    ///
    /// This is side-effect-free and does not construct a backend.
    pub fn is_available(self, search_path: &SearchPath) -> bool {
        self.find_install_path(search_path).is_some()
    }

    /// Creates a backend instance, fixing its install path for the rest of its lifetime.
    pub fn create(
        self,
        search_path: &SearchPath,
    ) -> Result<Box<dyn SimulatorBackend>, BackendUnavailable> {
        let install_path = self
            .find_install_path(search_path)
            .ok_or_else(|| BackendUnavailable::new(self))?;
        let backend: Box<dyn SimulatorBackend> = match self {
            BackendKind::ModelSim => Box::new(modelsim::ModelSimBackend::new(install_path)),
            BackendKind::Nvc => Box::new(nvc::NvcBackend::new(install_path)),
        };
        Ok(backend)
    }

    // The executable whose presence means the tool is installed.
    fn marker_executable(self) -> &'static str {
        match self {
            BackendKind::ModelSim => "vsim",
            BackendKind::Nvc => "nvc",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An ordered list of directories searched for simulator executables.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<Utf8PathBuf>,
}

impl SearchPath {
    /// Creates a search path from the given directories, searched in order.
    pub fn new(dirs: impl IntoIterator<Item = impl Into<Utf8PathBuf>>) -> Self {
        Self {
            dirs: dirs.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates a search path from the `PATH` environment variable.
    ///
    /// Entries that aren't valid UTF-8 are skipped.
    pub fn from_env() -> Self {
        Self::from_path_var(std::env::var_os("PATH"))
    }

    /// Returns the directories in this search path.
    pub fn dirs(&self) -> &[Utf8PathBuf] {
        &self.dirs
    }

    /// Returns the first executable named `name` in the search path.
    pub fn find_executable(&self, name: &str) -> Option<Utf8PathBuf> {
        let file_name = executable_file_name(name);
        self.dirs
            .iter()
            .map(|dir| dir.join(&file_name))
            .find(|candidate| is_executable(candidate))
    }

    fn from_path_var(var: Option<OsString>) -> Self {
        let dirs = match var {
            Some(var) => std::env::split_paths(&var)
                .filter_map(|path| match Utf8PathBuf::from_path_buf(path) {
                    Ok(path) => Some(path),
                    Err(path) => {
                        debug!("skipping non-UTF-8 PATH entry {}", path.display());
                        None
                    }
                })
                .filter(|path| !path.as_str().is_empty())
                .collect(),
            None => Vec::new(),
        };
        Self { dirs }
    }
}

/// Returns the platform file name for an executable, e.g. `vsim.exe` on Windows.
pub(crate) fn executable_file_name(name: &str) -> String {
    format!("{name}{}", std::env::consts::EXE_SUFFIX)
}

#[cfg(unix)]
fn is_executable(path: &Utf8Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    match path.metadata() {
        Ok(metadata) => metadata.is_file() && metadata.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Utf8Path) -> bool {
    path.is_file()
}
