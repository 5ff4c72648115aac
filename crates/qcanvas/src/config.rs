//! Session configuration.
//!
//! Loaded from (highest precedence first):
//! 1. Environment variables (`QCANVAS_QUBITS`, `QCANVAS_LAYERS`, `QCANVAS_SHOTS`)
//! 2. A YAML configuration file
//! 3. Default values (5 qubits, 3 layers, 100 shots)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CanvasError, CanvasResult};

/// Largest register the canvas accepts; a 20-qubit state vector is 16 MiB.
pub const MAX_QUBITS: u32 = 20;

/// Deepest ansatz the canvas accepts; the template is built eagerly.
pub const MAX_LAYERS: u32 = 100;

/// Circuit shape and sampling budget, fixed for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CanvasConfig {
    /// Qubits in the ansatz.
    #[serde(default = "default_num_qubits")]
    pub num_qubits: u32,
    /// Entanglement layers; the ansatz has one more rotation block than this.
    #[serde(default = "default_layers")]
    pub layers: u32,
    /// Shots per circuit.
    #[serde(default = "default_shots")]
    pub shots: u32,
}

fn default_num_qubits() -> u32 {
    5
}

fn default_layers() -> u32 {
    3
}

fn default_shots() -> u32 {
    100
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            num_qubits: default_num_qubits(),
            layers: default_layers(),
            shots: default_shots(),
        }
    }
}

impl CanvasConfig {
    /// Create a validated configuration.
    pub fn new(num_qubits: u32, layers: u32, shots: u32) -> CanvasResult<Self> {
        let config = Self {
            num_qubits,
            layers,
            shots,
        };
        config.validate()?;
        Ok(config)
    }

    /// Rotation angles the ansatz needs: `(layers + 1) * num_qubits * 2`.
    pub fn num_parameters(&self) -> usize {
        (self.layers as usize + 1) * self.num_qubits as usize * 2
    }

    /// Number of distinct measurement outcomes, `2^num_qubits`.
    pub fn max_states(&self) -> u64 {
        1u64 << self.num_qubits
    }

    /// Check the configuration.
    pub fn validate(&self) -> CanvasResult<()> {
        if !(1..=MAX_QUBITS).contains(&self.num_qubits) {
            return Err(CanvasError::Config(format!(
                "num_qubits must be between 1 and {MAX_QUBITS}, got {}",
                self.num_qubits
            )));
        }
        if self.layers > MAX_LAYERS {
            return Err(CanvasError::Config(format!(
                "layers must be at most {MAX_LAYERS}, got {}",
                self.layers
            )));
        }
        if self.shots == 0 {
            return Err(CanvasError::Config("shots must be at least 1".into()));
        }
        Ok(())
    }

    /// Load and validate a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CanvasResult<Self> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| CanvasError::io(path, e))?;
        let config: Self = serde_yaml_ng::from_str(&contents)
            .map_err(|e| CanvasError::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// File (or defaults), then environment overrides, then validation.
    pub fn load(config_file: Option<&Path>) -> CanvasResult<Self> {
        let base = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn merge_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> CanvasResult<Self> {
        let parse = |key: &str| -> CanvasResult<Option<u32>> {
            lookup(key)
                .map(|v| {
                    v.trim()
                        .parse()
                        .map_err(|_| CanvasError::Config(format!("{key} must be an integer, got '{v}'")))
                })
                .transpose()
        };
        if let Some(v) = parse("QCANVAS_QUBITS")? {
            self.num_qubits = v;
        }
        if let Some(v) = parse("QCANVAS_LAYERS")? {
            self.layers = v;
        }
        if let Some(v) = parse("QCANVAS_SHOTS")? {
            self.shots = v;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CanvasConfig::default();
        assert_eq!((config.num_qubits, config.layers, config.shots), (5, 3, 100));
        assert_eq!(config.num_parameters(), 40);
        assert_eq!(config.max_states(), 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(CanvasConfig::new(0, 3, 100).is_err());
        assert!(CanvasConfig::new(MAX_QUBITS + 1, 3, 100).is_err());
        assert!(CanvasConfig::new(5, 3, 0).is_err());
        assert!(CanvasConfig::new(1, 0, 1).is_ok());
    }

    #[test]
    fn test_layer_bound() {
        assert!(CanvasConfig::new(MAX_QUBITS, MAX_LAYERS, 1).is_ok());
        assert!(matches!(
            CanvasConfig::new(5, MAX_LAYERS + 1, 100),
            Err(CanvasError::Config(_))
        ));
        assert!(matches!(
            CanvasConfig::new(5, u32::MAX, 100),
            Err(CanvasError::Config(_))
        ));
    }

    #[test]
    fn test_env_layers_are_validated() {
        let config = CanvasConfig::default()
            .merge_env(|key| (key == "QCANVAS_LAYERS").then(|| u32::MAX.to_string()))
            .unwrap();
        assert!(matches!(config.validate(), Err(CanvasError::Config(_))));
    }

    #[test]
    fn test_from_file_with_partial_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "num_qubits: 4\nshots: 2048").unwrap();

        let config = CanvasConfig::from_file(file.path()).unwrap();
        assert_eq!(config.num_qubits, 4);
        assert_eq!(config.layers, 3);
        assert_eq!(config.shots, 2048);
    }

    #[test]
    fn test_from_file_rejects_unknown_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "qubits: 4").unwrap();
        assert!(matches!(
            CanvasConfig::from_file(file.path()),
            Err(CanvasError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            CanvasConfig::from_file("/nonexistent/qcanvas.yaml"),
            Err(CanvasError::Io { .. })
        ));
    }

    #[test]
    fn test_env_overrides() {
        let config = CanvasConfig::default()
            .merge_env(|key| match key {
                "QCANVAS_QUBITS" => Some("3".into()),
                "QCANVAS_SHOTS" => Some(" 500 ".into()),
                _ => None,
            })
            .unwrap();
        assert_eq!((config.num_qubits, config.layers, config.shots), (3, 3, 500));
    }

    #[test]
    fn test_env_override_must_be_numeric() {
        let err = CanvasConfig::default()
            .merge_env(|key| (key == "QCANVAS_LAYERS").then(|| "many".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains("QCANVAS_LAYERS"));
    }
}
