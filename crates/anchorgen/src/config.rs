//! Pipeline configuration.

use std::path::Path;

use anchorgen_core::{AnchorError, Result};
use serde::{Deserialize, Serialize};

/// Knobs for one table build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reject certificates without Basic Constraints `cA = TRUE`.
    #[serde(default)]
    pub require_ca: bool,

    /// Decode certificates on worker threads.
    #[serde(default)]
    pub parallel_decode: bool,

    /// Worker thread count (default: available parallelism).
    #[serde(default)]
    pub workers: Option<usize>,

    /// Annotation key carrying the declared SPKI hash.
    #[serde(default = "default_fingerprint_annotation")]
    pub fingerprint_annotation: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            require_ca: false,
            parallel_decode: false,
            workers: None,
            fingerprint_annotation: default_fingerprint_annotation(),
        }
    }
}

impl PipelineConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| AnchorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(AnchorError::Config("workers must be at least 1".into()));
        }
        if self.fingerprint_annotation.trim().is_empty() {
            return Err(AnchorError::Config(
                "fingerprint_annotation must not be empty".into(),
            ));
        }
        Ok(())
    }

    /// Number of decode workers to spawn.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        })
    }
}

fn default_fingerprint_annotation() -> String {
    String::from("SHA256 Fingerprint:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert!(!config.require_ca);
        assert!(!config.parallel_decode);
        assert_eq!(config.workers, None);
        assert_eq!(config.fingerprint_annotation, "SHA256 Fingerprint:");
        assert!(config.worker_count() >= 1);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::load(&dir.path().join("anchorgen.toml")).unwrap();
        assert_eq!(config, PipelineConfig::default());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "require_ca = true\nworkers = 3").unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert!(config.require_ca);
        assert_eq!(config.worker_count(), 3);
        assert_eq!(config.fingerprint_annotation, "SHA256 Fingerprint:");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = PipelineConfig::from_toml_str("require_ca = \"yes\"").unwrap_err();
        assert!(matches!(err, AnchorError::Config(_)));
    }

    #[test]
    fn test_zero_workers_rejected() {
        assert!(matches!(
            PipelineConfig::from_toml_str("workers = 0"),
            Err(AnchorError::Config(_))
        ));
    }

    #[test]
    fn test_empty_annotation_rejected() {
        assert!(PipelineConfig::from_toml_str("fingerprint_annotation = \" \"").is_err());
    }

    #[test]
    fn test_config_serialization() {
        let config = PipelineConfig {
            parallel_decode: true,
            ..PipelineConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        assert_eq!(PipelineConfig::from_toml_str(&text).unwrap(), config);
    }
}
