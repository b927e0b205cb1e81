use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tool locations and defaults for a coverage run, read from `config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lcov: PathBuf,
    pub genhtml: PathBuf,
    pub tar: PathBuf,
    /// Directory `lcov` scans for `.gcda`/`.gcno` files.
    pub capture_dir: PathBuf,
    pub merged_output: PathBuf,
    /// Pass `--no-external` to `lcov --capture`.
    pub no_external: bool,
    pub genhtml_ignore_errors: Vec<String>,
    pub genhtml_legend: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lcov: PathBuf::from("lcov"),
            genhtml: PathBuf::from("genhtml"),
            tar: PathBuf::from("tar"),
            capture_dir: PathBuf::from("."),
            merged_output: PathBuf::from("corpus.info"),
            no_external: true,
            genhtml_ignore_errors: vec!["source".to_string()],
            genhtml_legend: true,
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "corpuscoverage", "corpus-coverage")
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Loads the user config, falling back to defaults when there is none.
    ///
    /// An explicit `path` must exist and parse; the per-user file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))
    }
}
