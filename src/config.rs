//! Component configuration module.
//!
//! Handles loading, validating, and merging `picture.toml`. Stock defaults are
//! overridden key by key by the user file, so a file only needs the values it
//! changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! base_url = "http://localhost/"     # Relative image and source URLs resolve against this
//! stylesheet_dir = "static/variants" # Where namespace stylesheets live
//!
//! [breakpoints]
//! mobile_max_width = "767px"         # Shared mobile threshold for the scoped CSS
//!
//! [synthesis]
//! step = 50                          # Width step between synthesized candidates
//! format = "webp"                    # Forced `format` query value
//! mime_type = "image/webp"           # `type` of candidates with a forced format
//! max_width = 8192                   # Widths above this are clamped before synthesis
//!
//! [quality]
//! placeholder = 0                    # `quality` query value of the placeholder stage
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Name of the config file looked up in a directory.
pub const CONFIG_FILENAME: &str = "picture.toml";

/// Component configuration loaded from `picture.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PictureConfig {
    /// Absolute URL that relative `defaultSource` values resolve against.
    pub base_url: String,
    /// Directory holding the namespace variant stylesheets.
    pub stylesheet_dir: String,
    pub breakpoints: BreakpointsConfig,
    pub synthesis: SynthesisConfig,
    pub quality: QualityConfig,
}

impl Default for PictureConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost/".to_string(),
            stylesheet_dir: "static/variants".to_string(),
            breakpoints: BreakpointsConfig::default(),
            synthesis: SynthesisConfig::default(),
            quality: QualityConfig::default(),
        }
    }
}

impl PictureConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.synthesis.step == 0 {
            return Err(ConfigError::Validation(
                "synthesis.step must be non-zero".into(),
            ));
        }
        if self.synthesis.max_width < self.synthesis.step {
            return Err(ConfigError::Validation(format!(
                "synthesis.max_width ({}) must be at least synthesis.step ({})",
                self.synthesis.max_width, self.synthesis.step
            )));
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(ConfigError::Validation(format!(
                "base_url must be an absolute URL, got {:?}",
                self.base_url
            )));
        }
        if self.breakpoints.mobile_max_width.trim().is_empty() {
            return Err(ConfigError::Validation(
                "breakpoints.mobile_max_width must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Media breakpoints used by the scoped stylesheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakpointsConfig {
    /// Upper bound of the mobile media query (CSS length).
    pub mobile_max_width: String,
}

impl Default for BreakpointsConfig {
    fn default() -> Self {
        Self {
            mobile_max_width: "767px".to_string(),
        }
    }
}

/// Responsive source synthesis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SynthesisConfig {
    /// Width step between consecutive candidates, in CSS pixels.
    pub step: u32,
    /// Value forced onto a `format` query parameter.
    pub format: String,
    /// Mime type declared on candidates whose format was forced.
    pub mime_type: String,
    /// Largest width synthesized for, in CSS pixels.
    pub max_width: u32,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            step: 50,
            format: "webp".to_string(),
            mime_type: "image/webp".to_string(),
            max_width: 8192,
        }
    }
}

/// Progressive quality settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    /// `quality` query value requested for the placeholder stage.
    pub placeholder: u32,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self { placeholder: 0 }
    }
}

// =============================================================================
// Layered loading: stock defaults, then picture.toml
// =============================================================================

/// Stock defaults as a TOML table, the bottom layer of every load.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(PictureConfig::default())
        .expect("stock PictureConfig serializes to a TOML table")
}

/// Layer `overlay` onto `base`. Nested tables combine per key; any other
/// overlay value wins outright.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    let (mut layered, overrides) = match (base, overlay) {
        (toml::Value::Table(below), toml::Value::Table(above)) => (below, above),
        (_, replacement) => return replacement,
    };
    for (key, value) in overrides {
        let value = match layered.remove(&key) {
            Some(below) => merge_toml(below, value),
            None => value,
        };
        layered.insert(key, value);
    }
    toml::Value::Table(layered)
}

/// The `picture.toml` table in `dir`, or `None` when the directory has none.
fn read_overrides(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let text = match fs::read_to_string(dir.join(CONFIG_FILENAME)) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(toml::from_str(&text)?))
}

/// Apply `overrides` (if any) on top of `defaults`, then type-check and
/// validate the result.
pub fn resolve_config(
    defaults: toml::Value,
    overrides: Option<toml::Value>,
) -> Result<PictureConfig, ConfigError> {
    let layered = overrides.into_iter().fold(defaults, merge_toml);
    let config = PictureConfig::deserialize(layered)?;
    config.validate()?;
    Ok(config)
}

/// Effective configuration for components rendered from `dir`.
pub fn load_config(dir: &Path) -> Result<PictureConfig, ConfigError> {
    resolve_config(stock_defaults_value(), read_overrides(dir)?)
}

/// Returns a fully-commented stock `picture.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# picture-atom configuration
# ==========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Absolute URL that relative `defaultSource` and `sources` URLs are resolved against.
base_url = "http://localhost/"

# Directory holding the namespace variant stylesheets
# (overflow-/, overflow-scale-up-/, scale-up-/, teaser-/, store-logo-/).
stylesheet_dir = "static/variants"

# ---------------------------------------------------------------------------
# Breakpoints
# ---------------------------------------------------------------------------
[breakpoints]
# Upper bound of the mobile media query used by the `-mobile` style variables.
mobile_max_width = "767px"

# ---------------------------------------------------------------------------
# Responsive source synthesis
# ---------------------------------------------------------------------------
[synthesis]
# Width step between synthesized candidates, in CSS pixels.
step = 50

# When the image URL has a `format` query parameter, it is forced to this value
# and each candidate declares `mime_type`.
format = "webp"
mime_type = "image/webp"

# Widths above this (from the natural width or the URL's `width` value) are
# clamped before synthesis. Must be at least `step`.
max_width = 8192

# ---------------------------------------------------------------------------
# Progressive quality
# ---------------------------------------------------------------------------
[quality]
# `quality` query value of the placeholder stage.
placeholder = 0
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_overrides(text: &str) -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILENAME), text).unwrap();
        tmp
    }

    // =========================================================================
    // Loading from a directory
    // =========================================================================

    #[test]
    fn directory_without_picture_toml_uses_stock_values() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load_config(tmp.path()).unwrap(), PictureConfig::default());
    }

    #[test]
    fn overrides_keep_untouched_stock_values() {
        let tmp = write_overrides(
            r#"
base_url = "https://shop.example/"

[breakpoints]
mobile_max_width = "600px"
"#,
        );
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.base_url, "https://shop.example/");
        assert_eq!(config.breakpoints.mobile_max_width, "600px");
        assert_eq!(config.synthesis, SynthesisConfig::default());
    }

    #[test]
    fn malformed_picture_toml_is_toml_error() {
        let tmp = write_overrides("base_url = [[[");
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn misspelled_synthesis_key_is_rejected() {
        let tmp = write_overrides("[synthesis]\nstepp = 10\n");
        let err = load_config(tmp.path()).unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn blank_mobile_breakpoint_fails_validation() {
        let tmp = write_overrides("[breakpoints]\nmobile_max_width = \" \"\n");
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn zero_step_is_invalid() {
        let mut config = PictureConfig::default();
        config.synthesis.step = 0;
        assert!(config.validate().unwrap_err().to_string().contains("step"));
    }

    #[test]
    fn max_width_below_step_is_invalid() {
        let mut config = PictureConfig::default();
        config.synthesis.max_width = 10;
        assert!(
            config
                .validate()
                .unwrap_err()
                .to_string()
                .contains("max_width")
        );
    }

    #[test]
    fn base_url_must_be_absolute() {
        let config = PictureConfig {
            base_url: "/assets/".into(),
            ..PictureConfig::default()
        };
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Layering
    // =========================================================================

    #[test]
    fn nested_synthesis_override_merges_per_key() {
        let overlay: toml::Value = toml::from_str("[synthesis]\nformat = \"avif\"\n").unwrap();
        let merged = merge_toml(stock_defaults_value(), overlay);
        let synthesis = &merged["synthesis"];
        assert_eq!(synthesis["format"].as_str(), Some("avif"));
        assert_eq!(synthesis["step"].as_integer(), Some(50));
        assert_eq!(synthesis["max_width"].as_integer(), Some(8192));
    }

    #[test]
    fn placeholder_quality_override_resolves() {
        let overlay: toml::Value = toml::from_str("[quality]\nplaceholder = 5\n").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(config.quality.placeholder, 5);
        assert_eq!(config.synthesis.step, 50);
    }

    #[test]
    fn generated_picture_toml_matches_stock_values() {
        let config: PictureConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, PictureConfig::default());
    }
}
