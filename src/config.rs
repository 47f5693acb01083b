//! Run configuration.
//!
//! Everything that used to be ambient process state (working directory,
//! registry endpoint, discovery strategy) lives in one [`Config`] value that
//! callers pass explicitly. Values are layered: defaults, then an optional
//! `lockstep.yaml` in the workspace root, then environment variables, then
//! command-line overrides.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::adapters::live::DEFAULT_REGISTRY_URL;
use crate::error::{Error, Result};

/// Name of the optional configuration file in the workspace root.
pub const CONFIG_FILE: &str = "lockstep.yaml";

/// Environment variable overriding the registry URL.
pub const REGISTRY_ENV: &str = "LOCKSTEP_REGISTRY";

/// Environment variable overriding the discovery mode.
pub const DISCOVERY_ENV: &str = "LOCKSTEP_DISCOVERY";

/// How package locations are enumerated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscoveryMode {
    /// Use `workspaces` from the root manifest when present, lerna otherwise.
    #[default]
    Auto,
    /// Expand the root manifest's `workspaces` patterns.
    Members,
    /// Ask `lerna ls` for package locations.
    Lerna,
}

impl FromStr for DiscoveryMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "members" => Ok(Self::Members),
            "lerna" => Ok(Self::Lerna),
            other => Err(Error::Config(format!(
                "unknown discovery mode '{other}', expected auto, members or lerna"
            ))),
        }
    }
}

/// Settings read from `lockstep.yaml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    registry: Option<String>,
    discovery: Option<DiscoveryMode>,
}

/// Values given on the command line; `None` keeps the layered value.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    /// Workspace root.
    pub cwd: Option<PathBuf>,
    /// Registry base URL.
    pub registry_url: Option<String>,
}

/// Resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Workspace root; also the location of the root manifest.
    pub cwd: PathBuf,
    /// Base URL of the package registry used for dist-tag lookups.
    pub registry_url: String,
    /// Strategy for finding package locations.
    pub discovery: DiscoveryMode,
}

impl Config {
    /// Creates a configuration with default settings rooted at `cwd`.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            discovery: DiscoveryMode::Auto,
        }
    }

    /// Loads the layered configuration from disk and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory is unknown, the config file
    /// is malformed, or an environment value is invalid.
    pub fn load(overrides: Overrides) -> Result<Self> {
        let cwd = match overrides.cwd {
            Some(cwd) => std::path::absolute(&cwd).map_err(|e| {
                Error::Config(format!("cannot resolve working directory {}: {e}", cwd.display()))
            })?,
            None => std::env::current_dir()
                .map_err(|e| Error::Config(format!("cannot determine working directory: {e}")))?,
        };
        let mut config = Self::new(cwd);
        config.apply_file(&config.cwd.join(CONFIG_FILE))?;
        config.apply_env(|key| std::env::var(key).ok())?;
        if let Some(url) = overrides.registry_url {
            config.registry_url = url;
        }
        Ok(config)
    }

    /// Applies `path` when it exists.
    fn apply_file(&mut self, path: &Path) -> Result<()> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(Error::Config(format!("failed to read {}: {e}", path.display()))),
        };
        self.apply_yaml(&contents)
            .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))
    }

    fn apply_yaml(&mut self, contents: &str) -> std::result::Result<(), serde_yaml::Error> {
        let file: FileConfig = serde_yaml::from_str(contents)?;
        if let Some(url) = file.registry {
            self.registry_url = url;
        }
        if let Some(mode) = file.discovery {
            self.discovery = mode;
        }
        Ok(())
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(url) = lookup(REGISTRY_ENV).filter(|v| !v.is_empty()) {
            self.registry_url = url;
        }
        if let Some(mode) = lookup(DISCOVERY_ENV).filter(|v| !v.is_empty()) {
            self.discovery = mode.parse()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::new("/ws");
        assert_eq!(config.registry_url, DEFAULT_REGISTRY_URL);
        assert_eq!(config.discovery, DiscoveryMode::Auto);
    }

    #[test]
    fn file_then_env_precedence() {
        let mut config = Config::new("/ws");
        config
            .apply_yaml("registry: https://file.example.com\ndiscovery: members\n")
            .unwrap();
        assert_eq!(config.registry_url, "https://file.example.com");
        assert_eq!(config.discovery, DiscoveryMode::Members);

        config
            .apply_env(|key| (key == REGISTRY_ENV).then(|| "https://env.example.com".to_string()))
            .unwrap();
        assert_eq!(config.registry_url, "https://env.example.com");
        assert_eq!(config.discovery, DiscoveryMode::Members);
    }

    #[test]
    fn rejects_unknown_keys() {
        let mut config = Config::new("/ws");
        assert!(config.apply_yaml("registy: typo\n").is_err());
    }

    #[test]
    fn rejects_unknown_discovery_mode() {
        let mut config = Config::new("/ws");
        let err = config
            .apply_env(|key| (key == DISCOVERY_ENV).then(|| "pnpm".to_string()))
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_reads_config_file_and_overrides() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "discovery: lerna\n").unwrap();

        let config = Config::load(Overrides {
            cwd: Some(dir.path().to_path_buf()),
            registry_url: Some("https://cli.example.com".into()),
        })
        .unwrap();

        assert_eq!(config.discovery, DiscoveryMode::Lerna);
        assert_eq!(config.registry_url, "https://cli.example.com");
    }

    #[test]
    fn load_makes_relative_cwd_absolute() {
        let config = Config::load(Overrides {
            cwd: Some(PathBuf::from("relative-workspace")),
            registry_url: None,
        })
        .unwrap();

        assert!(config.cwd.is_absolute());
        assert!(config.cwd.ends_with("relative-workspace"));
        assert!(config.cwd.starts_with(std::env::current_dir().unwrap()));
    }
}
