use crate::error::{GitrelError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working tree and the home directory
pub const CONFIG_FILE_NAME: &str = ".gitrel.toml";

/// `KEY=value` file read by earlier gitrel releases, still honoured
pub const LEGACY_CONFIG_FILE_NAME: &str = ".gitrelrc";

/// Candidates per directory, in lookup order
const CONFIG_FILE_NAMES: [&str; 2] = [CONFIG_FILE_NAME, LEGACY_CONFIG_FILE_NAME];

/// Persisted defaults for gitrel.
///
/// Every key is optional; command-line flags take precedence over the file
/// and built-in defaults apply to whatever neither provides.
///
/// ```toml
/// fetch = true
/// remote = "origin"
/// local-branch-name = "release/%v"
/// remote-branch-name = "release/%v"
/// ```
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub fetch: Option<bool>,

    #[serde(default)]
    pub remote: Option<String>,

    #[serde(default)]
    pub local_branch_name: Option<String>,

    #[serde(default)]
    pub remote_branch_name: Option<String>,
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| GitrelError::config(e.to_string()))
    }

    /// Parse a `.gitrelrc` file.
    ///
    /// ```text
    /// FETCH=true
    /// REMOTE=origin
    /// LOCAL_BRANCH_NAME=release/%v
    /// ```
    ///
    /// Keys are case-insensitive and `_` stands for the `-` of the TOML
    /// keys. Unknown keys are ignored; empty values count as unset.
    pub fn from_env_str(content: &str) -> Result<Self> {
        let mut config = Config::default();

        for entry in dotenvy::from_read_iter(content.as_bytes()) {
            let (key, value) = entry.map_err(|e| GitrelError::config(e.to_string()))?;
            let value = value.trim();
            if value.is_empty() {
                continue;
            }

            match key.to_ascii_lowercase().replace('-', "_").as_str() {
                "fetch" => config.fetch = Some(parse_bool(value)?),
                "remote" => config.remote = Some(value.to_string()),
                "local_branch_name" => config.local_branch_name = Some(value.to_string()),
                "remote_branch_name" => config.remote_branch_name = Some(value.to_string()),
                other => debug!(key = other, "ignoring unknown config key"),
            }
        }

        Ok(config)
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(GitrelError::config(format!(
            "invalid boolean for fetch: {}",
            other
        ))),
    }
}

fn is_legacy_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name == LEGACY_CONFIG_FILE_NAME)
}

/// Read and parse a single configuration file.
///
/// A file named `.gitrelrc` is read as `KEY=value` lines, anything else as
/// TOML.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;

    let parsed = if is_legacy_file(path) {
        Config::from_env_str(&content)
    } else {
        toml::from_str(&content).map_err(|e| GitrelError::config(e.to_string()))
    };
    parsed.map_err(|e| match e {
        GitrelError::Config(msg) => GitrelError::config(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

fn config_in(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Locate the configuration file to use.
///
/// Walks from `start_dir` up to the filesystem root, then falls back to
/// `home_dir`. Within a directory `.gitrel.toml` wins over `.gitrelrc`.
pub fn find_config_file(start_dir: &Path, home_dir: Option<&Path>) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find_map(config_in)
        .or_else(|| home_dir.and_then(config_in))
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Explicit path (must exist)
/// 2. `.gitrel.toml` or `.gitrelrc` in `start_dir` or any parent directory
/// 3. `.gitrel.toml` or `.gitrelrc` in `home_dir`
/// 4. Default configuration if no file found
pub fn load_config_from(
    explicit: Option<&Path>,
    start_dir: &Path,
    home_dir: Option<&Path>,
) -> Result<Config> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(GitrelError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        debug!(path = %path.display(), "loading explicit config file");
        return load_config_file(path);
    }

    match find_config_file(start_dir, home_dir) {
        Some(path) => {
            debug!(path = %path.display(), "loading config file");
            load_config_file(&path)
        }
        None => {
            debug!("no config file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// [load_config_from] rooted at the current directory and the user's home
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let cwd = std::env::current_dir()?;
    let home = dirs::home_dir();

    load_config_from(explicit, &cwd, home.as_deref())
}
