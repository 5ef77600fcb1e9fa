//! Runtime configuration: an optional TOML file under `SHELF_*` environment
//! variables.

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Which storage backend the server runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
  #[default]
  Sqlite,
  Document,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
  #[default]
  Pretty,
  Json,
}

/// Runtime server configuration. Every field has a default, so an empty
/// file (or no file at all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:          String,
  #[serde(default = "default_port")]
  pub port:          u16,
  #[serde(default)]
  pub backend:       Backend,
  /// Database file for the SQLite backend. A leading `~/` is expanded.
  #[serde(default = "default_sqlite_path")]
  pub sqlite_path:   PathBuf,
  /// Index directory for the document backend. A leading `~/` is expanded.
  #[serde(default = "default_document_path")]
  pub document_path: PathBuf,
  #[serde(default)]
  pub log_format:    LogFormat,
}

fn default_host() -> String { "0.0.0.0".to_owned() }

fn default_port() -> u16 { 3000 }

fn default_sqlite_path() -> PathBuf { PathBuf::from("shelf.db") }

fn default_document_path() -> PathBuf { PathBuf::from("shelf-index") }

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:          default_host(),
      port:          default_port(),
      backend:       Backend::default(),
      sqlite_path:   default_sqlite_path(),
      document_path: default_document_path(),
      log_format:    LogFormat::default(),
    }
  }
}

impl ServerConfig {
  /// Read `path` if it exists, then apply `SHELF_*` overrides.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_sources(path, Environment::with_prefix("SHELF").try_parsing(true))
  }

  fn from_sources(path: &Path, env: Environment) -> Result<Self, ConfigError> {
    Config::builder()
      .add_source(File::from(path).required(false))
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }

  /// `sqlite_path` with a leading `~` expanded to the home directory.
  pub fn sqlite_path(&self) -> PathBuf { expand_tilde(&self.sqlite_path) }

  /// `document_path` with a leading `~` expanded to the home directory.
  pub fn document_path(&self) -> PathBuf { expand_tilde(&self.document_path) }
}

fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
