use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::cli::CliArgs;
use crate::git::{DEFAULT_GIT_PROGRAM, GitCommand};
use crate::recent::RecentLimits;

const APP_NAME: &str = "branch-titlebar";

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Config {
    pub version: u32,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub git: GitConfig,
    #[serde(default)]
    pub recent: RecentConfig,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PollConfig {
    pub interval_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct GitConfig {
    pub program: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct RecentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub max_categories: usize,
    pub max_items_per_category: usize,
    pub max_fallback_items: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: 1,
            poll: PollConfig::default(),
            git: GitConfig::default(),
            recent: RecentConfig::default(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval_secs: 5 }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_GIT_PROGRAM.to_string(),
            timeout_secs: 5,
        }
    }
}

impl Default for RecentConfig {
    fn default() -> Self {
        let limits = RecentLimits::default();
        Self {
            data_dir: None,
            max_categories: limits.max_categories,
            max_items_per_category: limits.max_items_per_category,
            max_fallback_items: limits.max_fallback_items,
        }
    }
}

pub fn get_default_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", APP_NAME)
        .context("Failed to determine project directories")?;

    let config_dir = proj_dirs.config_dir();
    Ok(config_dir.join(format!("{}.toml", APP_NAME)))
}

/// Per-user data directory holding the recent-entry list
pub fn get_default_data_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
        return Ok(proj_dirs.data_dir().to_path_buf());
    }
    dirs::home_dir()
        .map(|home| home.join(format!(".{}", APP_NAME)))
        .context("Failed to determine data directory")
}

impl Config {
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let path = match config_path {
            Some(p) => p,
            None => get_default_config_path()?,
        };

        if !path.exists() {
            let default_config = Config::default();
            // Create directory if it doesn't exist
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .context("Failed to create config directory")?;
            }
            default_config.save(&path)?;
            return Ok(default_config);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .context("Failed to serialize config to TOML")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    pub fn from_cli_and_file(cli_args: &CliArgs) -> Result<Self> {
        let mut config = Self::load(cli_args.config.clone())?;

        // CLI args override config file
        if let Some(interval) = cli_args.interval {
            config.poll.interval_secs = interval;
        }
        if let Some(data_dir) = &cli_args.data_dir {
            config.recent.data_dir = Some(data_dir.clone());
        }

        Ok(config)
    }

    /// Zero is bumped to one second so the timer cannot spin
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll.interval_secs.max(1))
    }

    /// Same clamp as the poll interval: a zero deadline would kill every lookup
    pub fn git_command(&self) -> GitCommand {
        let timeout = Duration::from_secs(self.git.timeout_secs.max(1));
        GitCommand::new(self.git.program.clone(), timeout)
    }

    pub fn recent_limits(&self) -> RecentLimits {
        RecentLimits {
            max_categories: self.recent.max_categories,
            max_items_per_category: self.recent.max_items_per_category,
            max_fallback_items: self.recent.max_fallback_items,
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.recent.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => get_default_data_dir(),
        }
    }
}
