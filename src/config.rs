// src/config.rs
use std::collections::BTreeMap;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use serde::de::value::{Error as ValueError, MapDeserializer};
use serde::{Deserialize, Deserializer};

use crate::models::EnvConfig;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Syntax of a configuration source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    /// `KEY=VALUE` lines.
    #[default]
    Env,
    /// A single flat JSON object.
    Json,
    /// A single flat YAML mapping.
    Yaml,
}

impl ConfigFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ConfigFormat::Env => "env",
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
        }
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Where configuration is read from: `<dir>/<name>.<format extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub dir: PathBuf,
    pub name: String,
    pub format: ConfigFormat,
}

impl Default for ConfigSource {
    /// `./app.env`
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            name: "app".to_string(),
            format: ConfigFormat::Env,
        }
    }
}

impl ConfigSource {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>, format: ConfigFormat) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
            format,
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.name, self.format.extension()))
    }
}

/// Load configuration from `./app.env`.
///
/// Call once at startup and hand the result to whatever needs it.
pub fn init() -> Result<EnvConfig, ConfigError> {
    let source = ConfigSource::default();
    let config = load(&source)?;
    tracing::info!("Config loaded from {}", source.path().display());
    Ok(config)
}

/// Read `source` and project its keys onto [`EnvConfig`].
///
/// Nothing is cached: loading again after the file changed returns the new
/// contents. Values are never exported into the process environment.
///
/// Env sources expand `$NAME` and `${NAME}` in unquoted and double-quoted
/// values, from the process environment first and then from keys earlier in
/// the file. An unknown name expands to nothing, so `pa$word` reads as `pa`.
/// Single-quote any value that must keep a literal `$`, such as a secret.
pub fn load(source: &ConfigSource) -> Result<EnvConfig, ConfigError> {
    let path = source.path();
    tracing::debug!("Reading {} config from {}", source.format, path.display());

    let read_error = |source: BoxError| ConfigError::Read {
        path: path.clone(),
        source,
    };

    match source.format {
        ConfigFormat::Env => {
            let pairs = read_env_file(&path).map_err(read_error)?;

            tracing::debug!("Parsed {} keys from {}", pairs.len(), path.display());
            log_ignored_keys(pairs.keys().map(String::as_str));

            project(path, MapDeserializer::<_, ValueError>::new(pairs.into_iter()))
        }
        ConfigFormat::Json => {
            let text = std::fs::read_to_string(&path).map_err(|e| read_error(e.into()))?;
            let value: serde_json::Value =
                serde_json::from_str(&text).map_err(|e| read_error(e.into()))?;

            let serde_json::Value::Object(map) = value else {
                return Err(ConfigError::Decode {
                    path,
                    source: "top-level JSON value must be an object".into(),
                });
            };

            tracing::debug!("Parsed {} keys from {}", map.len(), path.display());
            log_ignored_keys(map.keys().map(String::as_str));

            project(path, serde_json::Value::Object(map))
        }
        ConfigFormat::Yaml => {
            let text = std::fs::read_to_string(&path).map_err(|e| read_error(e.into()))?;
            let value: serde_yaml::Value =
                serde_yaml::from_str(&text).map_err(|e| read_error(e.into()))?;

            let serde_yaml::Value::Mapping(map) = value else {
                return Err(ConfigError::Decode {
                    path,
                    source: "top-level YAML value must be a mapping".into(),
                });
            };

            tracing::debug!("Parsed {} keys from {}", map.len(), path.display());
            log_ignored_keys(map.keys().filter_map(serde_yaml::Value::as_str));

            project(path, serde_yaml::Value::Mapping(map))
        }
    }
}

fn project<'de, D>(path: PathBuf, deserializer: D) -> Result<EnvConfig, ConfigError>
where
    D: Deserializer<'de>,
    D::Error: Send + Sync + 'static,
{
    EnvConfig::deserialize(deserializer).map_err(|e| ConfigError::Decode {
        path,
        source: e.into(),
    })
}

/// Parse `KEY=VALUE` lines. A repeated key keeps its last value.
fn read_env_file(path: &Path) -> Result<BTreeMap<String, String>, BoxError> {
    let text = std::fs::read_to_string(path)?;
    let mut pairs = BTreeMap::new();

    for item in dotenvy::from_read_iter(Cursor::new(quote_bare_values(&text))) {
        let (key, value) = item?;
        pairs.insert(key, value);
    }

    Ok(pairs)
}

/// Double-quote unquoted values so dotenvy keeps their inner whitespace,
/// e.g. a libpq `host=db port=5432` DSN. A trailing ` #comment` is dropped.
/// Comments, blank lines, quoted values and lines without `=` pass through.
fn quote_bare_values(text: &str) -> String {
    let mut out = String::with_capacity(text.len());

    for line in text.lines() {
        match quote_bare_value(line) {
            Some(quoted) => out.push_str(&quoted),
            None => out.push_str(line),
        }
        out.push('\n');
    }

    out
}

fn quote_bare_value(line: &str) -> Option<String> {
    if line.trim_start().starts_with('#') {
        return None;
    }

    let (key, rest) = line.split_once('=')?;
    let mut value = rest.trim();

    if let Some(comment) = value.find(" #").or_else(|| value.find("\t#")) {
        value = value[..comment].trim_end();
    }

    if value.is_empty() || value.starts_with('"') || value.starts_with('\'') {
        return None;
    }

    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    Some(format!("{}=\"{}\"", key, escaped))
}

fn log_ignored_keys<'a>(keys: impl Iterator<Item = &'a str>) {
    for key in keys.filter(|key| !EnvConfig::is_known_key(key)) {
        tracing::debug!("Ignoring unrecognized config key {}", key);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read { path: PathBuf, source: BoxError },
    #[error("cannot decode config file {}: {source}", path.display())]
    Decode { path: PathBuf, source: BoxError },
}
