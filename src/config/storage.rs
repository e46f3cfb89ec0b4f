//! Storage configuration

use std::path::PathBuf;

use serde::Deserialize;

use super::error::ValidationError;

/// Where meetings are kept.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process memory; lost on restart
    #[default]
    Memory,
    /// One JSON document per meeting under `data_dir`
    File,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend
    pub data_dir: Option<PathBuf>,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == StorageBackend::File && self.data_dir.is_none() {
            return Err(ValidationError::MissingRequired("STORAGE__DATA_DIR"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_backend_needs_directory() {
        let config = StorageConfig {
            backend: StorageBackend::File,
            data_dir: None,
        };
        assert!(config.validate().is_err());

        let config = StorageConfig {
            backend: StorageBackend::File,
            data_dir: Some(PathBuf::from("/var/lib/meetings")),
        };
        assert!(config.validate().is_ok());
    }
}
