//! Tool configuration: collaborator credentials and state location.
//!
//! Configuration is layered, simplest first:
//! 1. built-in defaults (public Gemini endpoint, default model, per-user
//!    data dir);
//! 2. an optional TOML config file (`--config`, or
//!    `<config dir>/nft-forge/config.toml`);
//! 3. the `GEMINI_API_KEY` environment variable, which overrides the file.
//!
//! Unlike the state records, a malformed config file IS an error: the
//! file is user-authored, and silently ignoring a typo would be worse
//! than stopping.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Environment variable consulted for the collaborator credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing API key: set {API_KEY_ENV} or api_key in the config file")]
    MissingApiKey,
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// On-disk config file shape. Every field is optional; defaults fill in
/// the rest.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    state_dir: Option<PathBuf>,
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub model: String,
    pub state_dir: PathBuf,
}

impl Config {
    /// Resolve config from defaults, optional file, and environment.
    ///
    /// `path`: explicit config file (must exist when given). When absent,
    /// the default location is used if present, silently skipped if not.
    /// `state_dir`: CLI override, wins over everything.
    pub fn load(path: Option<&Path>, state_dir: Option<&Path>) -> Result<Self, ConfigError> {
        let env_api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        Self::load_with_env(path, state_dir, env_api_key)
    }

    /// Same as [`Config::load`] with the environment lookup injected —
    /// tests pass the "env" value directly instead of mutating the
    /// process environment.
    pub fn load_with_env(
        path: Option<&Path>,
        state_dir: Option<&Path>,
        env_api_key: Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => read_config_file(p)?,
            None => match default_config_path() {
                Some(p) if p.exists() => read_config_file(&p)?,
                _ => FileConfig::default(),
            },
        };

        Ok(Self {
            api_key: env_api_key.or(file.api_key),
            endpoint: file.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: file.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            state_dir: state_dir
                .map(Path::to_path_buf)
                .or(file.state_dir)
                .unwrap_or_else(default_state_dir),
        })
    }

    /// The credential, or the configuration error that names how to set it.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }
}

fn read_config_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("nft-forge").join("config.toml"))
}

fn default_state_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("nft-forge"))
        .unwrap_or_else(|| PathBuf::from(".nft-forge"))
}
