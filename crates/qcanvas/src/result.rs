//! Result records and their persisted JSON shapes.

use serde::Serialize;
use std::path::{Path, PathBuf};

use qcanvas_hal::Counts;

use crate::config::CanvasConfig;
use crate::error::{CanvasError, CanvasResult};

/// Where the frontend reads its data from.
pub const DEFAULT_RESULT_PATH: &str = "web/quantum_data.json";

/// The measured fingerprint of one name.
///
/// Read-only once built; shot and state totals are always computed from
/// the counts.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtResult {
    name: String,
    seed: u32,
    counts: Counts,
    config: CanvasConfig,
    backend: String,
}

/// Full-metadata JSON shape.
#[derive(Debug, Serialize)]
pub struct FullRecord<'a> {
    /// Input name, as given.
    pub name: &'a str,
    /// Derived seed.
    pub seed: u32,
    /// Outcome histogram.
    pub counts: &'a Counts,
    /// Sum of counts.
    pub total_shots: u64,
    /// Distinct outcomes observed.
    pub num_states: usize,
    /// Backend that produced the counts.
    pub backend: &'a str,
    /// Session configuration.
    pub config: &'a CanvasConfig,
}

/// Wrap raw counts with their provenance.
pub fn aggregate(
    name: impl Into<String>,
    seed: u32,
    counts: Counts,
    config: CanvasConfig,
    backend: impl Into<String>,
) -> ArtResult {
    ArtResult {
        name: name.into(),
        seed,
        counts,
        config,
        backend: backend.into(),
    }
}

impl ArtResult {
    /// Input name, as given.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Derived seed.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Outcome histogram.
    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    /// Session configuration.
    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Backend that produced the counts.
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// Sum of all counts.
    pub fn total_shots(&self) -> u64 {
        self.counts.total_shots()
    }

    /// Number of distinct outcomes observed.
    pub fn num_states(&self) -> usize {
        self.counts.len()
    }

    /// Borrowed view in the full-metadata shape.
    pub fn full_record(&self) -> FullRecord<'_> {
        FullRecord {
            name: &self.name,
            seed: self.seed,
            counts: &self.counts,
            total_shots: self.total_shots(),
            num_states: self.num_states(),
            backend: &self.backend,
            config: &self.config,
        }
    }

    /// Bare `{bitstring: count}` JSON, keys sorted.
    pub fn to_frontend_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(&self.counts)?)
    }

    /// `{name, seed, counts, total_shots, num_states, backend, config}` JSON.
    pub fn to_full_json(&self) -> CanvasResult<String> {
        Ok(serde_json::to_string_pretty(&self.full_record())?)
    }
}

/// Write a result to `path` and return its absolute location.
///
/// Missing parent directories are created.
pub fn save_result(
    result: &ArtResult,
    path: impl AsRef<Path>,
    full_metadata: bool,
) -> CanvasResult<PathBuf> {
    let json = if full_metadata {
        result.to_full_json()?
    } else {
        result.to_frontend_json()?
    };
    write_json(path.as_ref(), &json)
}

/// Write `json` to `path`, creating parent directories.
pub(crate) fn write_json(path: &Path, json: &str) -> CanvasResult<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| CanvasError::io(parent, e))?;
    }
    std::fs::write(path, json).map_err(|e| CanvasError::io(path, e))?;
    std::path::absolute(path).map_err(|e| CanvasError::io(path, e))
}
