//! YAML configuration files
//!
//! Plans are stored one per file, in the same shape as
//! [`runway_core::SimConfig`]. Every optional field may be omitted.

use std::fs;
use std::path::Path;

use runway_core::SimConfig;

/// Error types for storage operations
#[derive(Debug)]
pub enum StorageError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "IO error: {msg}"),
            StorageError::Parse(msg) => write!(f, "Parse error: {msg}"),
            StorageError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}

pub fn config_from_yaml(yaml: &str) -> Result<SimConfig, StorageError> {
    serde_saphyr::from_str(yaml).map_err(|e| StorageError::Parse(e.to_string()))
}

pub fn config_to_yaml(config: &SimConfig) -> Result<String, StorageError> {
    serde_saphyr::to_string(config).map_err(|e| StorageError::Serialize(e.to_string()))
}

/// Load a configuration file. Does not validate.
pub fn load_config(path: &Path) -> Result<SimConfig, StorageError> {
    let content = fs::read_to_string(path)
        .map_err(|e| StorageError::Io(format!("Failed to read {}: {e}", path.display())))?;
    config_from_yaml(&content).map_err(|e| match e {
        StorageError::Parse(msg) => StorageError::Parse(format!("{}: {msg}", path.display())),
        other => other,
    })
}

/// Write a configuration file, replacing any existing one atomically.
pub fn save_config(path: &Path, config: &SimConfig) -> Result<(), StorageError> {
    let yaml = config_to_yaml(config)?;
    atomic_write(path, yaml.as_bytes())
        .map_err(|e| StorageError::Io(format!("Failed to write {}: {e}", path.display())))
}

/// Write to `path` via a temporary sibling and rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
