use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{info, warn};

use crate::gallery::DEFAULT_GALLERY_PAGE_SIZE;
use crate::related::DEFAULT_RELATED_LIMIT;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// sqlx connection URL. `None` means a SQLite file in the user data directory.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub related_limit: usize,
    pub gallery_page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            max_connections: 10,
            related_limit: DEFAULT_RELATED_LIMIT,
            gallery_page_size: DEFAULT_GALLERY_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Defaults, then the TOML file (if given), then `GDA_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        config.apply_env();
        Ok(config.normalized())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))?;
        info!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("GDA_DATABASE_URL") {
            if !url.trim().is_empty() {
                self.database_url = Some(url);
            }
        }
        if let Some(n) = env_parse("GDA_MAX_CONNECTIONS") {
            self.max_connections = n;
        }
        if let Some(n) = env_parse("GDA_RELATED_LIMIT") {
            self.related_limit = n;
        }
        if let Some(n) = env_parse("GDA_GALLERY_PAGE_SIZE") {
            self.gallery_page_size = n;
        }
    }

    fn normalized(mut self) -> Self {
        if self.gallery_page_size == 0 {
            warn!("gallery_page_size must be positive, using {DEFAULT_GALLERY_PAGE_SIZE}");
            self.gallery_page_size = DEFAULT_GALLERY_PAGE_SIZE;
        }
        self.max_connections = self.max_connections.max(1);
        self
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("ignoring invalid {key} value `{raw}`");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str("related_limit = 5\n").unwrap();
        assert_eq!(config.related_limit, 5);
        assert_eq!(config.gallery_page_size, 12);
        assert_eq!(config.max_connections, 10);
        assert!(config.database_url.is_none());
    }

    #[test]
    fn zero_page_size_is_replaced() {
        let config = Config { gallery_page_size: 0, max_connections: 0, ..Config::default() }.normalized();
        assert_eq!(config.gallery_page_size, 12);
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn reads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gda.toml");
        std::fs::write(&path, "database_url = \"sqlite::memory:\"\ngallery_page_size = 6\n").unwrap();
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.database_url.as_deref(), Some("sqlite::memory:"));
        assert_eq!(config.gallery_page_size, 6);
    }
}
