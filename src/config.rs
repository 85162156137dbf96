use std::{
    fs::create_dir_all,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::depth::DEFAULT_MAX_DEPTH;
use crate::error::{Error, Result};

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Containers with at least this many entries are filtered in parallel.
    #[serde(default)]
    pub parallel_min_children: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            parallel_min_children: None,
        }
    }
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ViewConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_preview_len")]
    pub preview_len: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            preview_len: default_preview_len(),
        }
    }
}

fn default_page_size() -> usize {
    100
}
fn default_preview_len() -> usize {
    120
}

impl Config {
    pub fn parse(text: &str, origin: &Path) -> Result<Config> {
        toml::from_str(text).map_err(|source| Error::Config {
            path: origin.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Config::parse(&text, path)
    }

    /// Loads `explicit` if given (it must exist), otherwise the default config
    /// file if there is one, otherwise built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Config> {
        if let Some(path) = explicit {
            return Config::load(path);
        }
        match config_dir() {
            Some(dir) if dir.join("config.toml").is_file() => Config::load(&dir.join("config.toml")),
            _ => Ok(Config::default()),
        }
    }
}

/// Per-user config directory, `None` when the platform has no home directory.
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "snappy-sift").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Remembers the last document that was opened, in a `.snappy` file.
#[derive(Debug, Clone)]
pub struct RecentFile {
    dir: PathBuf,
}

impl RecentFile {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn in_config_dir() -> Option<Self> {
        config_dir().map(RecentFile::new)
    }

    fn file_path(&self) -> PathBuf {
        self.dir.join(".snappy")
    }

    pub fn save(&self, opened: &Path) -> Result<()> {
        create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;
        let path = self.file_path();
        std::fs::write(&path, opened.to_string_lossy().as_bytes()).map_err(|e| Error::io(&path, e))
    }

    /// The remembered file, or `None` if nothing is remembered or it no longer exists.
    pub fn load(&self) -> Result<Option<PathBuf>> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path).map_err(|e| Error::io(&path, e))?;
        let remembered = PathBuf::from(content.trim());
        if !remembered.exists() {
            log::warn!("last opened file {} no longer exists", remembered.display());
            return Ok(None);
        }
        Ok(Some(remembered))
    }

    pub fn clear(&self) -> Result<()> {
        let path = self.file_path();
        if path.exists() {
            std::fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
        }
        Ok(())
    }
}
