// config/types.rs
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::error::ConfigError;
use crate::kubeconfig::DecodeMode;

const CONFIG_DIR_NAME: &str = "mke-clientbundle";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    pub decode_mode: DecodeMode,
    /// Fail bundles that carry no kubeconfig
    pub require_kube: bool,
    pub output_format: OutputFormat,
    /// Append logs here instead of stderr
    pub log_file: Option<String>,
}

impl DecoderConfig {
    /// `~/.config/mke-clientbundle/config.json` or the platform equivalent
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Loads an explicit config file, or the default one when it exists, or
    /// falls back to defaults.
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(default) => Self::load_from_file(&default.to_string_lossy()),
                None => Ok(Self::default()),
            },
        }
    }

    pub fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let path = expand(path);
        let config_str = fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&config_str).map_err(|source| ConfigError::Json { path, source })
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let path = expand(path);
        let config_str = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Json {
            path: path.clone(),
            source,
        })?;
        if let Some(parent) = PathBuf::from(&path).parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
        }
        fs::write(&path, config_str).map_err(|source| ConfigError::Io { path, source })
    }

    /// Log file path with `~` expanded
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(|p| PathBuf::from(expand(p)))
    }
}

fn expand(path: &str) -> String {
    shellexpand::tilde(path).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"require_kube": true}"#).unwrap();

        let config = DecoderConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert!(config.require_kube);
        assert_eq!(config.decode_mode, DecodeMode::Lenient);
        assert_eq!(config.output_format, OutputFormat::Json);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let path = path.to_str().unwrap();

        let config = DecoderConfig {
            decode_mode: DecodeMode::Strict,
            require_kube: true,
            output_format: OutputFormat::Yaml,
            log_file: Some("/var/log/mke-clientbundle.log".to_string()),
        };
        config.save_to_file(path).unwrap();

        let raw = fs::read_to_string(path).unwrap();
        assert!(raw.contains(r#""decode_mode": "strict""#));
        assert_eq!(DecoderConfig::load_from_file(path).unwrap(), config);
    }

    #[test]
    fn reports_bad_json_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{not json").unwrap();

        let err = DecoderConfig::load_from_file(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = DecoderConfig::load(Some("/nonexistent/mke-clientbundle.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
