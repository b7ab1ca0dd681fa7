//! File-based configuration provider (YAML)
//!
//! Supports user-level (~/.config/toolweave/config.yaml) and workspace-level
//! (.config/toolweave/config.yaml) config, or any explicit path.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::settings::Settings;
use super::traits::{ConfigProvider, ConfigResult};

const APP_DIR: &str = "toolweave";
const FILE_NAME: &str = "config.yaml";

/// Where a config file comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// ~/.config/toolweave/config.yaml
    User,
    /// .config/toolweave/config.yaml in the workspace root
    Workspace,
    /// Path given on the command line
    Explicit,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
            ConfigLevel::Explicit => "explicit",
        }
    }
}

/// File-based configuration provider
///
/// A missing file loads as default settings with no providers. The parsed
/// file is cached until [`reload`](Self::reload).
///
/// # Example
///
/// ```no_run
/// use toolweave_core::config::FileConfigProvider;
///
/// let user_config = FileConfigProvider::user();
/// let workspace_config = FileConfigProvider::workspace("/path/to/workspace");
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    level: ConfigLevel,
    cache: RwLock<Option<Settings>>,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
            cache: RwLock::new(None),
        }
    }

    /// User-level config provider (~/.config/toolweave/config.yaml)
    pub fn user() -> Self {
        // XDG config dir on Linux, ~/Library/Application Support on macOS
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        Self::new(config_dir.join(APP_DIR).join(FILE_NAME), ConfigLevel::User)
    }

    /// Workspace-level config provider (.config/toolweave/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root.as_ref().join(".config").join(APP_DIR).join(FILE_NAME);
        Self::new(path, ConfigLevel::Workspace)
    }

    /// Config file at an explicit path
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ConfigLevel::Explicit)
    }

    /// Workspace config if present, else the user config
    pub fn discover(workspace_root: impl AsRef<Path>) -> Self {
        let workspace = Self::workspace(workspace_root);
        if workspace.exists() {
            workspace
        } else {
            Self::user()
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> ConfigResult<Settings> {
        if !self.path.exists() {
            return Ok(Settings::default());
        }
        let content = fs::read_to_string(&self.path)?;
        Settings::from_yaml(&content)
    }

    /// Re-read the file, replacing the cached settings
    pub fn reload(&self) -> ConfigResult<Settings> {
        let settings = self.read()?;
        *self.cache.write() = Some(settings.clone());
        Ok(settings)
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    async fn load(&self) -> ConfigResult<Settings> {
        if let Some(settings) = self.cache.read().as_ref() {
            return Ok(settings.clone());
        }
        self.reload()
    }
}
