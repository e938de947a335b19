//! YAML configuration for blueprint policy.
//!
//! Only the data-shaped part of [`BlueprintOptions`] can live in a file;
//! callbacks and custom errors are attached in code afterwards.
//!
//! # Example YAML
//!
//! ```yaml
//! throw_on_error: true
//! serialize: false
//! parallel: true
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::BlueprintOptions;

/// File-backed engine settings. Missing keys take their defaults and unknown
/// keys are ignored.
///
/// # Examples
///
/// ```
/// use podeng::EngineConfig;
///
/// let config: EngineConfig = serde_yaml::from_str("parallel: true").unwrap();
/// assert!(config.parallel);
/// assert!(!config.throw_on_error);
///
/// let options = config.into_options();
/// assert!(options.parallel);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Raise [`BlueprintError::Rejected`](crate::BlueprintError::Rejected)
    /// when any field fails.
    pub throw_on_error: bool,
    /// `call` returns serialized output.
    pub serialize: bool,
    /// Process array elements in parallel.
    pub parallel: bool,
}

impl EngineConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::BlueprintError::Io) if the file cannot be read,
    /// or [`Yaml`](crate::BlueprintError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](crate::BlueprintError::Io) if the file cannot be
    /// written, or [`Yaml`](crate::BlueprintError::Yaml) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn into_options(self) -> BlueprintOptions {
        BlueprintOptions::new()
            .throw_on_error(self.throw_on_error)
            .serialize(self.serialize)
            .parallel(self.parallel)
    }
}

impl From<EngineConfig> for BlueprintOptions {
    fn from(config: EngineConfig) -> Self {
        config.into_options()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ThrowOnError;

    #[test]
    fn test_deserialize_complete() {
        let yaml = r#"
throw_on_error: true
serialize: true
parallel: true
"#;
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.throw_on_error);
        assert!(config.serialize);
        assert!(config.parallel);
    }

    #[test]
    fn test_missing_and_unknown_keys() {
        let yaml = r#"
serialize: true
on_error: ignored
"#;
        let config: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            config,
            EngineConfig {
                serialize: true,
                ..EngineConfig::default()
            }
        );
    }

    #[test]
    fn test_into_options() {
        let options: BlueprintOptions = EngineConfig {
            throw_on_error: true,
            serialize: false,
            parallel: true,
        }
        .into();
        assert!(matches!(options.throw_on_error, ThrowOnError::Default));
        assert!(!options.serialize);
        assert!(options.parallel);
        assert!(options.on_error.is_empty());
    }

    #[test]
    fn test_load_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.yml");

        let original = EngineConfig {
            throw_on_error: true,
            serialize: true,
            parallel: false,
        };
        original.save(&path).unwrap();

        let loaded = EngineConfig::load(&path).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EngineConfig::load(dir.path().join("absent.yml")).unwrap_err();
        assert!(matches!(err, crate::BlueprintError::Io(_)));
    }
}
