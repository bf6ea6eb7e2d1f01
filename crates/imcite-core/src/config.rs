//! Configuration loading
//!
//! The master database path comes from layered TOML files, later files
//! overriding earlier ones:
//!
//! ```toml
//! # /etc/imcite.toml, <config dir>/imcite/config.toml, ./.imcite.toml
//! db = "~/references/master.bib"
//! ```
//!
//! An explicit `--config` file is read last, and a `--db` flag beats them
//! all. The result is an immutable value constructed once at startup and
//! passed by reference into the operations that need it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// Default master database location
pub const DEFAULT_DB: &str = "~/.imcite/db.bib";

/// Immutable run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the master bibliography database, `~`-expanded
    pub db: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    db: Option<String>,
}

impl Config {
    pub fn load(config_file: Option<&Path>, db_flag: Option<&Path>) -> Result<Self, Error> {
        let mut db = DEFAULT_DB.to_string();

        let mut layers: Vec<PathBuf> = vec![PathBuf::from("/etc/imcite.toml")];
        if let Some(dir) = dirs::config_dir() {
            layers.push(dir.join("imcite").join("config.toml"));
        }
        layers.push(PathBuf::from("./.imcite.toml"));

        for path in &layers {
            if !path.exists() {
                continue;
            }
            if let Some(value) = read_config_file(path)?.db {
                tracing::debug!("using db from {}", path.display());
                db = value;
            }
        }
        // An explicitly named config file must be readable.
        if let Some(path) = config_file {
            if let Some(value) = read_config_file(path)?.db {
                db = value;
            }
        }

        let db = match db_flag {
            Some(flag) => expand_user(flag),
            None => expand_user(Path::new(&db)),
        };
        Ok(Self { db })
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, Error> {
    let text = fs::read_to_string(path).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    toml::from_str(&text).map_err(|e| Error::Config {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Expand a leading `~` component with the user's home directory
pub fn expand_user(path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
