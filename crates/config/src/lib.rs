//! Configuration loading and validation.
//!
//! Values are layered, later sources winning:
//!
//! 1. Built-in defaults ([`Config::default()`]).
//! 2. A config file (TOML, YAML or JSON, chosen by extension). Either given
//!    explicitly, or `sheetdex.toml` in the platform config directory if it
//!    exists.
//! 3. Environment variables prefixed `SHEETDEX_`, with `__` separating
//!    nested keys (`SHEETDEX_FETCH__TIMEOUT_SECS=10`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};
use sheetdex_sheets::Columns;
use sheetdex_sheets::fetcher::DEFAULT_URL_TEMPLATE;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PREFIX: &str = "SHEETDEX_";
const CONFIG_FILE: &str = "sheetdex.toml";
const CACHE_FILE: &str = "catalog.json";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "sheetdex")
}

/// How sheets are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// URL with `{sheet_id}` and `{tab_id}` placeholders.
    pub url_template: String,
    /// Upper bound for a single sheet fetch. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}
impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// Lives as long as the process.
    #[default]
    Memory,
    /// JSON file; survives restarts.
    File,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// File store location. Defaults to the platform cache directory.
    pub path: Option<PathBuf>,
    /// Keep serving the last good catalog when a refresh of a stale one
    /// fails, instead of returning the failure.
    pub serve_stale_on_error: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sheet id of the link sheet that lists every dataset sheet.
    pub link_sheet_id: String,
    pub fetch: FetchConfig,
    pub columns: Columns,
    pub cache: CacheConfig,
}

impl Config {
    /// Build the layered [`Figment`] without extracting it.
    pub fn figment(file: Option<&Path>) -> Result<Figment> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        let file = match file {
            Some(path) => Some(path.to_path_buf()),
            None => project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE)).filter(|path| path.is_file()),
        };
        if let Some(path) = file {
            tracing::debug!(path = %path.display(), "Loading configuration file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file(&path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file(&path)),
                Some("json") => figment.merge(Json::file(&path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path)),
            };
        }
        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load and validate configuration from every source.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let config: Config = Self::figment(file)?.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.link_sheet_id.trim().is_empty() {
            exn::bail!(ErrorKind::Invalid("link_sheet_id"));
        }
        let template = &self.fetch.url_template;
        if !template.contains("{sheet_id}") || !template.contains("{tab_id}") {
            exn::bail!(ErrorKind::Invalid("fetch.url_template"));
        }
        if self.fetch.timeout_secs == Some(0) {
            exn::bail!(ErrorKind::Invalid("fetch.timeout_secs"));
        }
        let columns = &self.columns;
        let names = [
            &columns.link.name,
            &columns.link.sheet_id,
            &columns.link.tab_id,
            &columns.dataset.key,
            &columns.dataset.label,
            &columns.dataset.content,
        ];
        if names.iter().any(|name| name.trim().is_empty()) {
            exn::bail!(ErrorKind::Invalid("columns"));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch.timeout_secs.map(Duration::from_secs)
    }

    /// Where the file store lives, or `None` for the in-memory store.
    pub fn cache_path(&self) -> Result<Option<PathBuf>> {
        match (self.cache.backend, &self.cache.path) {
            (CacheBackend::Memory, _) => Ok(None),
            (CacheBackend::File, Some(path)) => Ok(Some(path.clone())),
            (CacheBackend::File, None) => {
                let dirs = project_dirs().ok_or_raise(|| ErrorKind::NoCacheDir)?;
                Ok(Some(dirs.cache_dir().join(CACHE_FILE)))
            },
        }
    }
}
