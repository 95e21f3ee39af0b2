use crate::core::{ForgeError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration structure parsed from a TOML file.
///
/// Every section and key is optional; a missing file yields the defaults.
/// The file is looked up at `$DBFORGE_CONFIG`, falling back to
/// `~/.dbforge.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub build: Option<BuildConfig>,
    pub sqlite: Option<SqliteConfig>,
}

/// Build-related configuration.
#[derive(Debug, Default, Deserialize)]
pub struct BuildConfig {
    /// File name of the database created under `--db-dir`.
    pub database_file: Option<String>,
}

/// SQLite-related configuration applied to every opened connection.
#[derive(Debug, Default, Deserialize)]
pub struct SqliteConfig {
    pub foreign_keys: Option<bool>,
    pub journal_mode: Option<String>,
}

impl Config {
    /// File name of the database created by the build operation.
    pub fn database_file(&self) -> &str {
        self.build
            .as_ref()
            .and_then(|b| b.database_file.as_deref())
            .unwrap_or("database.db")
    }

    /// Connection pragmas, defaulted when the section is absent.
    pub fn sqlite(&self) -> SqliteConfig {
        match &self.sqlite {
            Some(s) => SqliteConfig {
                foreign_keys: s.foreign_keys,
                journal_mode: s.journal_mode.clone(),
            },
            None => SqliteConfig::default(),
        }
    }
}

/// Loads configuration from a TOML file at the given path.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(&path)
        .map_err(|e| ForgeError::Config(format!("{}: {}", path.as_ref().display(), e)))?;
    toml::from_str(&content).map_err(|e| ForgeError::Config(e.to_string()))
}

/// Loads the user configuration, or defaults when no file is present.
///
/// `$DBFORGE_CONFIG` names an explicit file (an error if unreadable);
/// otherwise `~/.dbforge.toml` is used when it exists.
pub fn load_default_config() -> Result<Config> {
    if let Ok(path) = std::env::var("DBFORGE_CONFIG") {
        return load_config(PathBuf::from(path));
    }
    if let Some(home) = dirs::home_dir() {
        let path = home.join(".dbforge.toml");
        if path.exists() {
            return load_config(path);
        }
    }
    Ok(Config::default())
}
