//! Configuration loading from TOML files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global configuration for blogpull.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub http: HttpConfig,
    pub workers: WorkersConfig,
    pub filter: FilterConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory downloads land under (one subdirectory per blog).
    pub default_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            default_dir: PathBuf::from("public"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent sent with asset downloads.
    pub user_agent: String,
    pub connect_timeout: u64,
    /// Stall detection: seconds with no data before a read fails.
    pub read_timeout: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: String::from("blogpull/0.1"),
            connect_timeout: 30,
            read_timeout: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WorkersConfig {
    /// Download workers (post discovery and scanning stay sequential).
    pub default: usize,
    pub max: usize,
}

impl Default for WorkersConfig {
    fn default() -> Self {
        Self {
            default: 4,
            max: 16,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Minimum embedded width hint for kept images.
    pub min_width: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { min_width: 640 }
    }
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Search order:
    /// 1. ./blogpull.toml (current directory)
    /// 2. ~/.config/blogpull/config.toml
    ///
    /// If no config file is found, returns the defaults.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("blogpull.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "blogpull") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        log::info!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.output.default_dir, PathBuf::from("public"));
        assert_eq!(config.filter.min_width, 640);
        assert!(config.workers.default >= 1);
        assert_eq!(config.http.read_timeout, 30);
    }

    #[test]
    fn parse_config_toml() {
        let toml = r#"
[output]
default_dir = "/tmp/blogs"

[http]
user_agent = "Mozilla/5.0"
read_timeout = 60

[workers]
default = 2
max = 4

[filter]
min_width = 800
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.output.default_dir, PathBuf::from("/tmp/blogs"));
        assert_eq!(config.http.user_agent, "Mozilla/5.0");
        assert_eq!(config.http.read_timeout, 60);
        assert_eq!(config.http.connect_timeout, 30);
        assert_eq!(config.workers.default, 2);
        assert_eq!(config.filter.min_width, 800);
    }

    #[test]
    fn from_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::from_file(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn from_file_takes_borrowed_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blogpull.toml");
        std::fs::write(&path, "[filter]\nmin_width = 900\n").unwrap();
        let config = Config::from_file(path.as_path()).unwrap();
        assert_eq!(config.filter.min_width, 900);
    }
}
