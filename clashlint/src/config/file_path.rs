use crate::config::{ClashConfig, FileError};
use std::fs;
use std::path::{Path, PathBuf};

pub fn parse_paths(config: &Option<PathBuf>) -> Result<PathBuf, FileError> {
    let config_path = match config {
        None => {
            let home = PathBuf::from(std::env::var("HOME")?);
            home.join(".config").join("clash").join("config.yaml")
        }
        Some(p) => p.clone(),
    };
    Ok(config_path)
}

/// Read a configuration file. The raw document is returned alongside the typed
/// view so callers can run schema checks over fields the checker does not model.
pub fn load_config(path: &Path) -> Result<(serde_yaml::Value, ClashConfig), FileError> {
    let path_str = path.to_string_lossy().to_string();
    let text = fs::read_to_string(path).map_err(|e| FileError::Io(path_str.clone(), e))?;
    parse_config(&path_str, &text)
}

pub fn parse_config(
    source: &str,
    text: &str,
) -> Result<(serde_yaml::Value, ClashConfig), FileError> {
    let serde_error = |e| FileError::Serde(source.to_string(), e);
    let document: serde_yaml::Value = serde_yaml::from_str(text).map_err(serde_error)?;
    // an empty file is an empty configuration
    let document = match document {
        serde_yaml::Value::Null => serde_yaml::Value::Mapping(Default::default()),
        d => d,
    };
    let config: ClashConfig = serde_yaml::from_value(document.clone()).map_err(serde_error)?;
    Ok((document, config))
}

pub fn save_config(path: &Path, config: &ClashConfig) -> Result<(), FileError> {
    let path_str = path.to_string_lossy().to_string();
    let text = serde_yaml::to_string(config).map_err(|e| FileError::Serde(path_str.clone(), e))?;
    fs::write(path, text).map_err(|e| FileError::Io(path_str, e))
}
