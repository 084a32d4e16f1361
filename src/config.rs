//! Configuration handling for minipy

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::codec::Codec;
use crate::error::MinipyError;
use crate::select::SelectOptions;

/// File looked up in the working directory when `--config` is not given.
pub const CONFIG_FILE: &str = "minipy.toml";

/// minipy configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub minipy: MinipyConfig,
}

/// Core settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinipyConfig {
    /// Consider compressed stubs at all
    #[serde(default = "default_compress")]
    pub compress: bool,

    /// Always emit a stub, even when plain text is shorter
    #[serde(default)]
    pub force_compress: bool,

    /// Codecs tried in order
    #[serde(default = "default_codecs")]
    pub codecs: Vec<Codec>,

    /// Suffix of minimized output files
    #[serde(default = "default_min_suffix")]
    pub min_suffix: String,

    /// Suffix of restored output files
    #[serde(default = "default_max_suffix")]
    pub max_suffix: String,
}

fn default_compress() -> bool {
    true
}

fn default_codecs() -> Vec<Codec> {
    Codec::DEFAULT.to_vec()
}

fn default_min_suffix() -> String {
    ".min".to_string()
}

fn default_max_suffix() -> String {
    ".max".to_string()
}

impl Default for MinipyConfig {
    fn default() -> Self {
        Self {
            compress: default_compress(),
            force_compress: false,
            codecs: default_codecs(),
            min_suffix: default_min_suffix(),
            max_suffix: default_max_suffix(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, MinipyError> {
        let content = fs::read_to_string(path).map_err(|e| MinipyError::Config {
            path: path.to_path_buf(),
            message: format!("failed to read config file: {}", e),
        })?;
        toml::from_str(&content).map_err(|e| MinipyError::Config {
            path: path.to_path_buf(),
            message: format!("failed to parse config file: {}", e),
        })
    }

    /// Load `path` when given, else `minipy.toml` in `dir` if it exists,
    /// else the defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, MinipyError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Config::default())
        }
    }

    /// Forced compression switches compression on.
    pub fn select_options(&self) -> SelectOptions {
        SelectOptions {
            compress: self.minipy.compress || self.minipy.force_compress,
            force_compress: self.minipy.force_compress,
            codecs: self.minipy.codecs.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert!(config.minipy.compress);
        assert_eq!(config.minipy.min_suffix, ".min");
    }

    #[test]
    fn partial_section_keeps_other_defaults() {
        let config: Config = toml::from_str(
            r#"
            [minipy]
            force_compress = true
            codecs = ["zlib", "zstd"]
            "#,
        )
        .unwrap();
        assert!(config.minipy.force_compress);
        assert!(config.minipy.compress);
        assert_eq!(config.minipy.codecs, vec![Codec::Zlib, Codec::Zstd]);
        assert_eq!(config.minipy.max_suffix, ".max");
    }

    #[test]
    fn unknown_codec_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[minipy]\ncodecs = [\"rar\"]\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, MinipyError::Config { .. }));
    }

    #[test]
    fn discover_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::discover(None, dir.path()).unwrap(), Config::default());
        fs::write(dir.path().join(CONFIG_FILE), "[minipy]\ncompress = false\n").unwrap();
        assert!(!Config::discover(None, dir.path()).unwrap().minipy.compress);
    }

    #[test]
    fn force_compress_wins_over_compress_off() {
        let config: Config =
            toml::from_str("[minipy]\ncompress = false\nforce_compress = true\n").unwrap();
        let options = config.select_options();
        assert!(options.compress);
        assert!(options.force_compress);
    }
}
