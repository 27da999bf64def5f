//! Build configuration.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use jsonc_parser::ParseOptions;
use jsonschema::Validator;
use serde::{Deserialize, Serialize};

use crate::BuilderError;

// Embed the schema
const SCHEMA_JSON: &str = include_str!("../../../schemas/v1/config.json");
static CONFIG_SCHEMA: OnceLock<Validator> = OnceLock::new();

/// Configuration for a chart build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Chart specification files or glob patterns.
    #[serde(default = "default_specs")]
    pub specs: Vec<String>,

    /// Whether to enable caching.
    #[serde(default = "default_cache")]
    pub cache: bool,

    /// Cache directory.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: String,

    /// Cache store file name inside `cache_dir`.
    #[serde(default = "default_cache_file")]
    pub cache_file: String,

    /// Shared theme file. Its modification time is part of every fingerprint.
    #[serde(default = "default_theme")]
    pub theme: Option<String>,

    /// Whether to report per-chart render durations.
    #[serde(default)]
    pub timings: bool,

    /// Base directory for resolving relative paths.
    /// This is usually the directory containing the configuration file.
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

fn default_specs() -> Vec<String> {
    vec!["docs/_data/charts.yml".to_string()]
}

fn default_cache() -> bool {
    true
}

fn default_cache_dir() -> String {
    ".cache".to_string()
}

fn default_cache_file() -> String {
    "charts.json".to_string()
}

fn default_theme() -> Option<String> {
    Some("docs/_data/site.yml".to_string())
}

impl BuildConfig {
    /// Config file names searched by [`BuildConfig::discover`], in priority order.
    pub const CONFIG_FILES: [&'static str; 2] = [".chartsmith.jsonc", ".chartsmith.json"];

    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self {
            specs: default_specs(),
            cache: true,
            cache_dir: default_cache_dir(),
            cache_file: default_cache_file(),
            theme: default_theme(),
            timings: false,
            base_dir: None,
        }
    }

    /// Finds a config file in `dir`.
    pub fn discover(dir: impl AsRef<Path>) -> Option<PathBuf> {
        let dir = dir.as_ref();
        Self::CONFIG_FILES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.is_file())
    }

    /// Loads configuration from a file.
    ///
    /// Supports `.chartsmith.jsonc`, `.chartsmith.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BuilderError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| BuilderError::config(format!("Failed to read config: {}", e)))?;

        let mut config = Self::from_json(&content)?;

        if let Some(parent) = path.parent() {
            config.base_dir = Some(parent.to_path_buf());
        }

        Ok(config)
    }

    /// Parses configuration from a JSON (or JSONC) string with schema validation.
    pub fn from_json(json: &str) -> Result<Self, BuilderError> {
        let value = jsonc_parser::parse_to_serde_value(json, &ParseOptions::default())
            .map_err(|e| BuilderError::config(format!("Invalid JSON: {}", e)))?
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        let schema = CONFIG_SCHEMA.get_or_init(|| {
            let schema_json: serde_json::Value =
                serde_json::from_str(SCHEMA_JSON).expect("Invalid embedded config schema");
            Validator::new(&schema_json).expect("Invalid config schema compilation")
        });

        if let Err(e) = schema.validate(&value) {
            let error_msg = format!("{} at {}", e, e.instance_path());
            return Err(BuilderError::config(format!(
                "Config validation failed: {}",
                error_msg
            )));
        }

        serde_json::from_value(value)
            .map_err(|e| BuilderError::config(format!("Invalid config: {}", e)))
    }

    /// Resolves a path from the config against `base_dir`.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        resolve_path(self.root(), path.as_ref())
    }

    /// Returns the project root used for relative paths.
    pub fn root(&self) -> &Path {
        self.base_dir.as_deref().unwrap_or(Path::new(""))
    }

    /// Returns the location of the cache store file.
    pub fn cache_path(&self) -> PathBuf {
        self.resolve(Path::new(&self.cache_dir).join(&self.cache_file))
    }

    /// Returns the location of the shared theme file, if configured.
    pub fn theme_path(&self) -> Option<PathBuf> {
        self.theme.as_ref().map(|theme| self.resolve(theme))
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Joins `path` onto `root` unless `path` is absolute or `root` is the
/// current directory, so relative paths stay relative.
pub(crate) fn resolve_path(root: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || root.as_os_str().is_empty() || root == Path::new(".") {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
