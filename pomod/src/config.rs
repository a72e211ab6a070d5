use anyhow::{Context, Result};
use directories::ProjectDirs;
use pomod_ipc::SOCKET_PATH;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "pomod.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub socket_path: PathBuf,
    /// Overrides the per-user data directory holding the log and hooks.
    pub data_dir: Option<PathBuf>,
    /// Raise a desktop notification when a period ends.
    pub notifications: bool,
    /// Fallback tracing filter when `POMOD_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(SOCKET_PATH),
            data_dir: None,
            notifications: false,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Directory holding `log.jsonl` and `hooks/`.
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .context("Could not determine data directory")
    }

    pub fn hooks_dir(&self) -> Result<PathBuf> {
        Ok(self.resolved_data_dir()?.join("hooks"))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "pomod")
}

pub fn load_config() -> Result<Config> {
    match project_dirs() {
        Some(proj_dirs) => load_config_from(&proj_dirs.config_dir().join(CONFIG_FILE)),
        None => Ok(Config::default()),
    }
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {:?}", path))?;
    toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file at {:?}", path))
}
