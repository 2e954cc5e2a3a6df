//! Configuration management for `benchneon`.
//!
//! Configuration sources and precedence (highest wins):
//! 1. CLI flags
//! 2. Environment variables (`BENCHNEON_<KEY>`)
//! 3. File given with `--config`
//! 4. Project config (`<root>/benchneon.yaml`)
//! 5. User config (`~/.config/benchneon/config.yaml`)
//! 6. Defaults
//!
//! Layers are flat string maps. They are merged first and parsed once, into
//! the immutable [`BenchmarkConfig`] that the pipeline threads through.

use crate::binary::DEFAULT_BINARY_NAME;
use crate::error::{BenchError, Result};
use crate::model::{Profile, warmups_to_discard};
use crate::runner::{DEFAULT_FEATURE, DEFAULT_FLAG_ENV, DEFAULT_MODE_FLAG};
use serde::Serialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project config file name, looked up in the benchmark root.
pub const PROJECT_CONFIG_FILE: &str = "benchneon.yaml";
/// Environment variable prefix for config keys.
pub const ENV_PREFIX: &str = "BENCHNEON_";

const DEFAULT_TOKENS: usize = 60_000;
const DEFAULT_COLOR_KEYS: usize = 6_000;
const DEFAULT_ITERATIONS: usize = 12;
const DEFAULT_WARMUPS: usize = 2;

/// Every key the harness understands, in normalized form.
pub const KNOWN_KEYS: &[&str] = &[
    "tokens",
    "color-keys",
    "iterations",
    "warmups",
    "profile",
    "bin",
    "no-build",
    "keep-temp",
    "binary-name",
    "feature",
    "mode-flag",
    "flag-env",
    "cargo",
];

/// A configuration layer: normalized key to raw string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigLayer {
    pub values: HashMap<String, String>,
}

impl ConfigLayer {
    /// Merge another layer on top of this one (higher precedence wins).
    pub fn merge_from(&mut self, other: &Self) {
        for (key, value) in &other.values {
            self.values.insert(key.clone(), value.clone());
        }
    }

    /// Merge multiple layers in precedence order (lowest to highest).
    #[must_use]
    pub fn merge_layers(layers: &[Self]) -> Self {
        let mut merged = Self::default();
        for layer in layers {
            merged.merge_from(layer);
        }
        merged
    }

    /// Insert under the normalized form of `key`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(normalize_key(key), value.into());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(&normalize_key(key)).map(String::as_str)
    }

    /// Build a layer from a YAML file path. Missing files return empty config.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn from_yaml(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| BenchError::io_at(format!("reading {}", path.display()), e))?;
        let value: serde_yaml::Value = serde_yaml::from_str(&contents)?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(layer_from_yaml_value(&value))
    }

    /// Build a layer from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_vars(env::vars())
    }

    /// Build a layer from `BENCHNEON_*` pairs in `vars`.
    #[must_use]
    pub fn from_env_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut layer = Self::default();
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layer.set(stripped, value);
            }
        }
        layer
    }

    /// Keys present in this layer that the harness does not recognise.
    #[must_use]
    pub fn unknown_keys(&self) -> Vec<&str> {
        let mut unknown: Vec<&str> = self
            .values
            .keys()
            .map(String::as_str)
            .filter(|key| !KNOWN_KEYS.contains(key))
            .collect();
        unknown.sort_unstable();
        unknown
    }
}

/// CLI overrides for config loading. `None` leaves lower layers in charge.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub tokens: Option<usize>,
    pub color_keys: Option<usize>,
    pub iterations: Option<usize>,
    pub warmups: Option<usize>,
    pub profile: Option<Profile>,
    pub bin: Option<PathBuf>,
    pub no_build: Option<bool>,
    pub keep_temp: Option<bool>,
    pub binary_name: Option<String>,
    pub feature: Option<String>,
    pub mode_flag: Option<String>,
}

impl CliOverrides {
    #[must_use]
    pub fn as_layer(&self) -> ConfigLayer {
        let mut layer = ConfigLayer::default();

        if let Some(tokens) = self.tokens {
            layer.set("tokens", tokens.to_string());
        }
        if let Some(color_keys) = self.color_keys {
            layer.set("color-keys", color_keys.to_string());
        }
        if let Some(iterations) = self.iterations {
            layer.set("iterations", iterations.to_string());
        }
        if let Some(warmups) = self.warmups {
            layer.set("warmups", warmups.to_string());
        }
        if let Some(profile) = self.profile {
            layer.set("profile", profile.as_str());
        }
        if let Some(bin) = &self.bin {
            layer.set("bin", bin.to_string_lossy());
        }
        if let Some(no_build) = self.no_build {
            layer.set("no-build", no_build.to_string());
        }
        if let Some(keep_temp) = self.keep_temp {
            layer.set("keep-temp", keep_temp.to_string());
        }
        if let Some(name) = &self.binary_name {
            layer.set("binary-name", name.clone());
        }
        if let Some(feature) = &self.feature {
            layer.set("feature", feature.clone());
        }
        if let Some(mode_flag) = &self.mode_flag {
            layer.set("mode-flag", mode_flag.clone());
        }

        layer
    }
}

/// Default config layer (lowest precedence).
#[must_use]
pub fn default_config_layer() -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    layer.set("tokens", DEFAULT_TOKENS.to_string());
    layer.set("color-keys", DEFAULT_COLOR_KEYS.to_string());
    layer.set("iterations", DEFAULT_ITERATIONS.to_string());
    layer.set("warmups", DEFAULT_WARMUPS.to_string());
    layer.set("profile", Profile::Release.as_str());
    layer.set("no-build", "false");
    layer.set("keep-temp", "false");
    layer.set("binary-name", DEFAULT_BINARY_NAME);
    layer.set("feature", DEFAULT_FEATURE);
    layer.set("mode-flag", DEFAULT_MODE_FLAG);
    layer.set("flag-env", DEFAULT_FLAG_ENV);
    layer.set("cargo", "cargo");
    layer
}

/// Load user config (~/.config/benchneon/config.yaml).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<ConfigLayer> {
    let Ok(home) = env::var("HOME") else {
        return Ok(ConfigLayer::default());
    };
    let path = Path::new(&home)
        .join(".config")
        .join("benchneon")
        .join("config.yaml");
    ConfigLayer::from_yaml(&path)
}

/// Load project config (`<root>/benchneon.yaml`).
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(root: &Path) -> Result<ConfigLayer> {
    ConfigLayer::from_yaml(&root.join(PROJECT_CONFIG_FILE))
}

/// Load a config file named on the command line; unlike the implicit
/// locations it must exist.
///
/// # Errors
///
/// Returns an error if the file is missing, unreadable or malformed.
pub fn load_explicit_config(path: &Path) -> Result<ConfigLayer> {
    if !path.is_file() {
        return Err(BenchError::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    ConfigLayer::from_yaml(path)
}

/// Load configuration with the full precedence chain.
///
/// # Errors
///
/// Returns an error if any config file cannot be read or parsed.
pub fn load_config(
    root: &Path,
    explicit: Option<&Path>,
    cli: &CliOverrides,
) -> Result<ConfigLayer> {
    let explicit_layer = match explicit {
        Some(path) => load_explicit_config(path)?,
        None => ConfigLayer::default(),
    };

    let merged = ConfigLayer::merge_layers(&[
        default_config_layer(),
        load_user_config()?,
        load_project_config(root)?,
        explicit_layer,
        ConfigLayer::from_env(),
        cli.as_layer(),
    ]);

    for key in merged.unknown_keys() {
        debug!(key, "Ignoring unknown config key");
    }

    Ok(merged)
}

/// Immutable benchmark configuration, built once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkConfig {
    pub tokens: usize,
    pub color_keys: usize,
    pub iterations: usize,
    pub warmups: usize,
    pub profile: Profile,
    pub binary: Option<PathBuf>,
    pub allow_build: bool,
    pub keep_temp: bool,
    pub root: PathBuf,
    pub binary_name: String,
    pub feature: String,
    pub mode_flag: String,
    pub flag_env: String,
    pub cargo: String,
}

impl BenchmarkConfig {
    /// Parse a merged layer. Missing keys fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first key whose value does not
    /// parse, or if `iterations` is zero.
    pub fn from_layer(layer: &ConfigLayer, root: PathBuf) -> Result<Self> {
        let defaults = default_config_layer();
        let layer = ConfigLayer::merge_layers(&[defaults, layer.clone()]);

        let iterations = parse_usize(&layer, "iterations")?;
        if iterations == 0 {
            return Err(BenchError::validation("iterations", "must be at least 1"));
        }

        let profile = require(&layer, "profile")?.parse::<Profile>()?;
        let binary = layer
            .get("bin")
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            tokens: parse_usize(&layer, "tokens")?,
            color_keys: parse_usize(&layer, "color-keys")?,
            iterations,
            warmups: parse_usize(&layer, "warmups")?,
            profile,
            binary,
            allow_build: !parse_flag(&layer, "no-build")?,
            keep_temp: parse_flag(&layer, "keep-temp")?,
            root,
            binary_name: require_non_empty(&layer, "binary-name")?,
            feature: require_non_empty(&layer, "feature")?,
            mode_flag: require_non_empty(&layer, "mode-flag")?,
            flag_env: require_non_empty(&layer, "flag-env")?,
            cargo: require_non_empty(&layer, "cargo")?,
        })
    }

    /// Warmup samples dropped per variant.
    #[must_use]
    pub fn discarded(&self) -> usize {
        warmups_to_discard(self.iterations, self.warmups)
    }

    /// Samples reported per variant.
    #[must_use]
    pub fn retained(&self) -> usize {
        self.iterations - self.discarded()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase().replace(['_', '.'], "-")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        _ => None,
    }
}

fn require<'a>(layer: &'a ConfigLayer, key: &str) -> Result<&'a str> {
    layer
        .get(key)
        .ok_or_else(|| BenchError::validation(key, "missing value"))
}

fn require_non_empty(layer: &ConfigLayer, key: &str) -> Result<String> {
    let value = require(layer, key)?.trim();
    if value.is_empty() {
        return Err(BenchError::validation(key, "must not be empty"));
    }
    Ok(value.to_string())
}

fn parse_usize(layer: &ConfigLayer, key: &str) -> Result<usize> {
    let raw = require(layer, key)?;
    raw.trim().parse::<usize>().map_err(|_| {
        BenchError::validation(key, format!("expected a non-negative integer, got '{raw}'"))
    })
}

fn parse_flag(layer: &ConfigLayer, key: &str) -> Result<bool> {
    let raw = require(layer, key)?;
    parse_bool(raw)
        .ok_or_else(|| BenchError::validation(key, format!("expected true or false, got '{raw}'")))
}

fn layer_from_yaml_value(value: &serde_yaml::Value) -> ConfigLayer {
    let mut layer = ConfigLayer::default();
    let mut flat = HashMap::new();
    flatten_yaml(value, "", &mut flat);

    for (key, value) in flat {
        layer.set(&key, value);
    }

    layer
}

fn flatten_yaml(value: &serde_yaml::Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        serde_yaml::Value::Mapping(map) => {
            for (key, value) in map {
                let Some(key_str) = key.as_str() else {
                    continue;
                };
                let next_prefix = if prefix.is_empty() {
                    key_str.to_string()
                } else {
                    format!("{prefix}.{key_str}")
                };
                flatten_yaml(value, &next_prefix, out);
            }
        }
        serde_yaml::Value::Sequence(values) => {
            let joined = values
                .iter()
                .filter_map(yaml_scalar_to_string)
                .collect::<Vec<_>>()
                .join(",");
            out.insert(prefix.to_string(), joined);
        }
        _ => {
            if let Some(value) = yaml_scalar_to_string(value) {
                out.insert(prefix.to_string(), value);
            }
        }
    }
}

fn yaml_scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Bool(v) => Some(v.to_string()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Null
        | serde_yaml::Value::Sequence(_)
        | serde_yaml::Value::Mapping(_) => None,
        serde_yaml::Value::Tagged(tagged) => yaml_scalar_to_string(&tagged.value),
    }
}
