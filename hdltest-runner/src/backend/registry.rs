// Copyright (c) The hdltest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{BackendKind, SearchPath, SimulatorBackend};
use indexmap::IndexMap;
use tracing::debug;

/// Selects a simulator backend by name, or by checking which tools are installed.
///
/// Registration order is part of the contract: when several backends are available,
/// auto-detection picks the first registered one.
#[derive(Clone, Debug)]
pub struct BackendRegistry {
    backends: IndexMap<&'static str, BackendKind>,
    search_path: SearchPath,
}

impl BackendRegistry {
    /// Creates a registry with every known backend, in [`BackendKind::ALL`] order.
    pub fn new(search_path: SearchPath) -> Self {
        Self::with_kinds(BackendKind::ALL.iter().copied(), search_path)
    }

    /// Creates a registry with the given backends, in the given order.
    ///
    /// Registering the same backend twice keeps its first position.
    pub fn with_kinds(kinds: impl IntoIterator<Item = BackendKind>, search_path: SearchPath) -> Self {
        let mut backends = IndexMap::new();
        for kind in kinds {
            backends.entry(kind.name()).or_insert(kind);
        }
        Self {
            backends,
            search_path,
        }
    }

    /// Returns the registered backends, in registration order.
    pub fn kinds(&self) -> impl ExactSizeIterator<Item = BackendKind> + '_ {
        self.backends.values().copied()
    }

    /// Returns the search path used to look up tools.
    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// Creates a backend.
    ///
    /// * If `requested` is non-empty, it is looked up case-insensitively. `None` is returned if
    ///   it isn't registered or its tool isn't installed; the two cases are not distinguished.
    /// * If `requested` is empty, the first registered backend whose tool is installed is
    ///   returned, or `None` if there isn't one.
    pub fn create_backend(&self, requested: &str) -> Option<Box<dyn SimulatorBackend>> {
        if requested.is_empty() {
            self.kinds().find_map(|kind| {
                let backend = kind.create(&self.search_path).ok()?;
                debug!("auto-detected simulator {kind}");
                Some(backend)
            })
        } else {
            let kind = self.backends.get(requested.to_lowercase().as_str())?;
            kind.create(&self.search_path).ok()
        }
    }
}
