use crate::api::types::Part;
use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that supplies the backend base URL
pub const BASE_URL_ENV: &str = "ROSTER_BASE_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
  pub api: ApiConfig,
  pub default_part: Part,
  /// Custom title for header (defaults to backend host if not set)
  pub title: Option<String>,
  pub log: LogConfig,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
  /// Users collection, e.g. `http://localhost:8080/user`
  pub base_url: Url,
  pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogConfig {
  /// Filter directive used when RUST_LOG is unset
  pub level: Option<String>,
  /// Log file path (default: $XDG_DATA_HOME/roster/roster.log)
  pub file: Option<PathBuf>,
}

/// Config file as written on disk. Every field is optional so the file can
/// be omitted entirely when the base URL comes from the flag or environment.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
  #[serde(default)]
  pub api: ApiSection,
  pub default_part: Option<Part>,
  pub title: Option<String>,
  #[serde(default)]
  pub log: LogConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApiSection {
  pub base_url: Option<String>,
  pub timeout_secs: Option<u64>,
}

/// Values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
  /// From `--base-url`
  pub base_url: Option<String>,
  /// From the environment
  pub env_base_url: Option<String>,
  /// From `--part`
  pub part: Option<Part>,
}

impl Config {
  /// Load configuration from file and apply overrides.
  ///
  /// File search order:
  /// 1. Explicit path if provided
  /// 2. ./roster.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/roster/config.yaml
  ///
  /// A missing file is fine as long as a base URL is supplied some other way.
  pub fn load(explicit_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let file = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => ConfigFile::default(),
    };

    Self::resolve(file, overrides)
  }

  /// Merge file contents with overrides and validate the result.
  ///
  /// Base URL precedence: flag, then environment, then file. Having none
  /// at all is fatal.
  pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self> {
    let raw_url = overrides
      .base_url
      .or(overrides.env_base_url)
      .or(file.api.base_url)
      .filter(|s| !s.trim().is_empty())
      .ok_or_else(|| {
        eyre!(
          "No backend base URL configured. Pass --base-url, set {}, or add api.base_url \
           to ~/.config/roster/config.yaml",
          BASE_URL_ENV
        )
      })?;

    let base_url = parse_base_url(raw_url.trim())?;

    Ok(Self {
      api: ApiConfig {
        base_url,
        timeout_secs: file.api.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
      },
      default_part: overrides.part.or(file.default_part).unwrap_or_default(),
      title: file.title,
      log: file.log,
    })
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("roster.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("roster").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<ConfigFile> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  /// Host shown in the header when no title is configured
  pub fn display_title(&self) -> String {
    match &self.title {
      Some(title) => title.clone(),
      None => self
        .api
        .base_url
        .host_str()
        .map(|host| match self.api.base_url.port() {
          Some(port) => format!("{}:{}", host, port),
          None => host.to_string(),
        })
        .unwrap_or_else(|| self.api.base_url.to_string()),
    }
  }
}

fn parse_base_url(raw: &str) -> Result<Url> {
  let url = Url::parse(raw).map_err(|e| eyre!("Invalid base URL '{}': {}", raw, e))?;

  match url.scheme() {
    "http" | "https" => {}
    other => {
      return Err(eyre!(
        "Invalid base URL '{}': unsupported scheme '{}'",
        raw,
        other
      ))
    }
  }
  if url.cannot_be_a_base() {
    return Err(eyre!("Invalid base URL '{}': not a hierarchical URL", raw));
  }

  Ok(url)
}
