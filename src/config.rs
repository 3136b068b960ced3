use std::{env, path::PathBuf};

use log::LevelFilter;

use crate::{openlibrary::DEFAULT_OPENLIBRARY_URL, transport::DEFAULT_API_URL};

pub const API_URL_VAR: &str = "BOOKSHELF_API_URL";
pub const OPENLIBRARY_URL_VAR: &str = "BOOKSHELF_OPENLIBRARY_URL";
pub const CREDENTIALS_VAR: &str = "BOOKSHELF_CREDENTIALS";
pub const LOG_VAR: &str = "BOOKSHELF_LOG";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub openlibrary_url: String,
    pub credentials_path: PathBuf,
    pub log_level: LevelFilter,
}

impl Config {
    /// Reads settings from the environment, falling back to defaults.
    ///
    /// Runs before the logger is installed, so nothing here is logged.
    pub fn load() -> Self {
        Self {
            api_url: var(API_URL_VAR).unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            openlibrary_url: var(OPENLIBRARY_URL_VAR)
                .unwrap_or_else(|| DEFAULT_OPENLIBRARY_URL.to_string()),
            credentials_path: var(CREDENTIALS_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(default_credentials_path),
            log_level: var(LOG_VAR)
                .and_then(|level| level.parse().ok())
                .unwrap_or(LevelFilter::Warn),
        }
    }
}

fn var(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

pub fn default_credentials_path() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(".bookshelf")
        .join("credentials.json")
}
