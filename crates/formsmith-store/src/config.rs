//! Store configuration and service factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use formsmith_core::FormService;

use crate::fs::JsonDirStore;
use crate::link::{RandomLinks, MAX_LINK_LENGTH, MIN_LINK_LENGTH};

/// Top-level formsmith configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormsmithConfig {
    /// Directory holding stored forms and responses.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Owner recorded on forms when no `--owner` is given.
    #[serde(default = "default_owner")]
    pub default_owner: String,
    /// Length of generated shareable links.
    #[serde(default = "default_link_length")]
    pub link_length: usize,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./formsmith-data")
}
fn default_owner() -> String {
    "local".to_string()
}
fn default_link_length() -> usize {
    26
}

impl Default for FormsmithConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            default_owner: default_owner(),
            link_length: default_link_length(),
        }
    }
}

impl FormsmithConfig {
    /// `link_length` clamped to what the link generator supports.
    pub fn effective_link_length(&self) -> usize {
        self.link_length.clamp(MIN_LINK_LENGTH, MAX_LINK_LENGTH)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `formsmith.toml` in the current directory
/// 2. `~/.config/formsmith/config.toml`
///
/// Environment variable overrides: `FORMSMITH_DATA_DIR`, `FORMSMITH_OWNER`.
pub fn load_config() -> Result<FormsmithConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<FormsmithConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("formsmith.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => FormsmithConfig::default(),
    };

    // Apply env var overrides
    if let Ok(dir) = std::env::var("FORMSMITH_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(owner) = std::env::var("FORMSMITH_OWNER") {
        config.default_owner = owner;
    }

    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));

    Ok(config)
}

fn parse_config(content: &str) -> Result<FormsmithConfig> {
    Ok(toml::from_str::<FormsmithConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("formsmith"))
}

/// Build a service over the JSON-directory store named by the config.
pub fn open_service(config: &FormsmithConfig) -> FormService {
    tracing::debug!("using data directory {}", config.data_dir.display());
    FormService::new(
        Arc::new(JsonDirStore::new(&config.data_dir)),
        Arc::new(RandomLinks::new(config.effective_link_length())),
    )
}
