use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file '{path}': {source}")]
  Read {
    path: PathBuf,
    source: std::io::Error,
  },

  #[error("failed to parse config file '{path}': {source}")]
  Parse {
    path: PathBuf,
    source: toml::de::Error,
  },
}

/// Log configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
  /// Log file path, if not set, logs will be printed to stdout
  pub file: Option<String>,
  /// Log level, default is "info"
  #[serde(default = "default_log_level")]
  pub level: String,
}

fn default_log_level() -> String {
  "info".to_string()
}

impl Default for LogConfig {
  fn default() -> Self {
    Self {
      file: None,
      level: default_log_level(),
    }
  }
}

/// Server configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
  /// Server listening address (Redis protocol)
  #[serde(default = "default_server_addr")]
  pub server_addr: String,

  /// Max bytes of unparsed input buffered per client, default 1 GiB
  #[serde(default = "default_client_query_buffer_limit")]
  pub client_query_buffer_limit: usize,

  /// Log configuration
  #[serde(default)]
  pub log: LogConfig,
}

fn default_server_addr() -> String {
  "0.0.0.0:6379".to_string()
}

fn default_client_query_buffer_limit() -> usize {
  1024 * 1024 * 1024
}

impl Default for Config {
  fn default() -> Self {
    Self {
      server_addr: default_server_addr(),
      client_query_buffer_limit: default_client_query_buffer_limit(),
      log: LogConfig::default(),
    }
  }
}

impl Config {
  /// Load configuration from TOML file
  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let config_str = fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;

    toml::from_str(&config_str).map_err(|source| ConfigError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_full_config() {
    let config_str = r#"
server_addr = "127.0.0.1:7000"
client_query_buffer_limit = 65536

[log]
level = "debug"
file = "/tmp/kvstore.log"
"#;

    let config: Config = toml::from_str(config_str).unwrap();
    assert_eq!(config.server_addr, "127.0.0.1:7000");
    assert_eq!(config.client_query_buffer_limit, 65536);
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.log.file.as_deref(), Some("/tmp/kvstore.log"));
  }

  #[test]
  fn test_default_config() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config, Config::default());
    assert_eq!(config.server_addr, "0.0.0.0:6379");
    assert_eq!(config.client_query_buffer_limit, 1024 * 1024 * 1024);
    assert_eq!(config.log.level, "info");
    assert!(config.log.file.is_none());
  }

  #[test]
  fn test_partial_log_section() {
    let config: Config = toml::from_str("[log]\nfile = \"out.log\"\n").unwrap();
    assert_eq!(config.log.level, "info");
    assert_eq!(config.log.file.as_deref(), Some("out.log"));
  }

  #[test]
  fn test_from_file_errors() {
    let missing = std::env::temp_dir().join("kvstore-config-does-not-exist.toml");
    assert!(matches!(
      Config::from_file(&missing),
      Err(ConfigError::Read { .. })
    ));

    let bad = std::env::temp_dir().join(format!("kvstore-bad-{}.toml", std::process::id()));
    fs::write(&bad, "server_addr = [").unwrap();
    let err = Config::from_file(&bad).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
    assert!(err.to_string().contains("failed to parse config file"));
    fs::remove_file(&bad).unwrap();
  }
}
