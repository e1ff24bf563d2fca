//! Tint configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tint_theme::ResolverConfig;

pub const CONFIG_FILE: &str = "tint.toml";

/// Top-level Tint configuration (tint.toml)
#[derive(Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct TintConfig {
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
}

/// Theme document location
#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct ThemeConfig {
    /// Theme document (relative to the project root)
    #[serde(default = "default_theme_path")]
    pub path: String,
}

fn default_theme_path() -> String {
    "theme.css".to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            path: default_theme_path(),
        }
    }
}

impl TintConfig {
    /// Load configuration from a directory (looks for tint.toml).
    ///
    /// A missing file yields the defaults.
    pub fn load_from_dir(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            tracing::debug!("No {} in {}, using defaults", CONFIG_FILE, path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let config: TintConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(config)
    }

    /// Theme document path resolved against `root`
    pub fn theme_path(&self, root: &Path) -> PathBuf {
        let root = if root.is_file() {
            root.parent().unwrap_or(Path::new("."))
        } else {
            root
        };
        root.join(&self.theme.path)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = TintConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config, TintConfig::default());
        assert_eq!(config.theme_path(dir.path()), dir.path().join("theme.css"));
        assert_eq!(config.resolver.max_ancestors, 5);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            "[theme]\npath = \"styles/brand.css\"\n\n[resolver]\nmax_ancestors = 2\n",
        )
        .unwrap();

        let config = TintConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.theme.path, "styles/brand.css");
        assert_eq!(config.resolver.max_ancestors, 2);
        assert_eq!(config.resolver.variable_prefix, "--oui-");
        assert_eq!(
            config.theme_path(&dir.path().join(CONFIG_FILE)),
            dir.path().join("styles/brand.css")
        );
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[theme\npath = 1").unwrap();
        let err = TintConfig::load_from_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_toml_round_trip() {
        let config = TintConfig::default();
        let text = config.to_toml().unwrap();
        let back: TintConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
