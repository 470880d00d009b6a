//! Layered configuration surface (§10.3).
//!
//! Precedence, highest first: explicit CLI flags, then a `flix.toml`
//! project file (parsed with `toml`/`serde`), then the built-in defaults
//! below. `Config::load` merges all three once at startup; nothing here
//! is re-read mid-run.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::style::ColorMode;

fn default_iteration_cap() -> usize {
    flix_solve::DEFAULT_ITERATION_CAP
}

fn default_strict_verify() -> bool {
    false
}

fn default_color() -> String {
    "auto".to_string()
}

#[cfg(feature = "verification")]
fn default_verify_timeout_ms() -> u64 {
    flix_verify::DEFAULT_TIMEOUT_MS
}

#[cfg(not(feature = "verification"))]
fn default_verify_timeout_ms() -> u64 {
    10_000
}

/// The `flix.toml` project file shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    #[serde(default = "default_iteration_cap")]
    pub iteration_cap: usize,
    #[serde(default = "default_strict_verify")]
    pub strict_verify: bool,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_verify_timeout_ms")]
    pub verify_timeout_ms: u64,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            iteration_cap: default_iteration_cap(),
            strict_verify: default_strict_verify(),
            color: default_color(),
            verify_timeout_ms: default_verify_timeout_ms(),
        }
    }
}

/// Errors loading or parsing `flix.toml`.
#[derive(Debug)]
pub enum ConfigError {
    Io { path: String, source: std::io::Error },
    Parse { path: String, source: toml::de::Error },
    InvalidColor(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, source } => write!(f, "could not read '{path}': {source}"),
            ConfigError::Parse { path, source } => write!(f, "could not parse '{path}': {source}"),
            ConfigError::InvalidColor(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io { source, .. } => Some(source),
            ConfigError::Parse { source, .. } => Some(source),
            ConfigError::InvalidColor(_) => None,
        }
    }
}

/// The fully resolved configuration for one CLI invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub iteration_cap: usize,
    pub strict_verify: bool,
    pub color: ColorMode,
    pub verify_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            iteration_cap: flix_solve::DEFAULT_ITERATION_CAP,
            strict_verify: false,
            color: ColorMode::Auto,
            verify_timeout_ms: default_verify_timeout_ms(),
        }
    }
}

impl Config {
    /// Loads `flix.toml` from `project_dir` if present, applying built-in
    /// defaults for whatever the file omits or leaves absent entirely.
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        let manifest_path = project_dir.join("flix.toml");
        let manifest = if manifest_path.exists() {
            let text = fs::read_to_string(&manifest_path)
                .map_err(|source| ConfigError::Io { path: manifest_path.display().to_string(), source })?;
            toml::from_str(&text).map_err(|source| ConfigError::Parse { path: manifest_path.display().to_string(), source })?
        } else {
            ManifestConfig::default()
        };

        let color = manifest.color.parse().map_err(ConfigError::InvalidColor)?;
        Ok(Config {
            iteration_cap: manifest.iteration_cap,
            strict_verify: manifest.strict_verify,
            color,
            verify_timeout_ms: manifest.verify_timeout_ms,
        })
    }

    /// Applies CLI flag overrides, which always win over the project file.
    pub fn with_overrides(mut self, iteration_cap: Option<usize>, strict_verify: bool, color: Option<ColorMode>) -> Self {
        if let Some(cap) = iteration_cap {
            self.iteration_cap = cap;
        }
        if strict_verify {
            self.strict_verify = true;
        }
        if let Some(c) = color {
            self.color = c;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_matches_builtin_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.iteration_cap, flix_solve::DEFAULT_ITERATION_CAP);
        assert!(!cfg.strict_verify);
        assert_eq!(cfg.color, ColorMode::Auto);
    }

    #[test]
    fn loads_overrides_from_flix_toml() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("flix.toml")).unwrap();
        writeln!(file, "iteration_cap = 42\nstrict_verify = true\ncolor = \"never\"").unwrap();

        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg.iteration_cap, 42);
        assert!(cfg.strict_verify);
        assert_eq!(cfg.color, ColorMode::Never);
    }

    #[test]
    fn absent_manifest_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(dir.path()).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn cli_overrides_win_over_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = fs::File::create(dir.path().join("flix.toml")).unwrap();
        writeln!(file, "iteration_cap = 42").unwrap();

        let cfg = Config::load(dir.path()).unwrap().with_overrides(Some(7), true, Some(ColorMode::Always));
        assert_eq!(cfg.iteration_cap, 7);
        assert!(cfg.strict_verify);
        assert_eq!(cfg.color, ColorMode::Always);
    }
}
