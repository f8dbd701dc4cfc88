//! Layout settings loaded from TOML
//!
//! A settings file picks the engine configuration and the viewport the root
//! is laid out in:
//!
//! ```toml
//! [layout]
//! point_scale_factor = 2.0
//! use_web_defaults = false
//! experimental_features = ["web-flex-basis"]
//!
//! [viewport]
//! width = 375
//! height = 667
//! direction = "ltr"
//! ```

use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::layout::{Config, Direction, ExperimentalFeature, FloatOptional, LayoutError};

/// Errors that can occur when loading or interpreting settings
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid settings: {0}")]
    Invalid(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Engine configuration and viewport for a layout run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub point_scale_factor: f32,
    pub use_web_defaults: bool,
    pub use_legacy_stretch_behaviour: bool,
    pub diff_legacy_stretch_behaviour: bool,
    pub print_tree: bool,
    pub experimental_features: Vec<ExperimentalFeature>,
    /// Owner width; `None` lets the root size itself
    pub width: Option<f32>,
    pub height: Option<f32>,
    pub direction: Direction,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlSettings {
    #[serde(default)]
    layout: TomlLayout,
    #[serde(default)]
    viewport: TomlViewport,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlLayout {
    point_scale_factor: Option<f32>,
    use_web_defaults: Option<bool>,
    use_legacy_stretch_behaviour: Option<bool>,
    diff_legacy_stretch_behaviour: Option<bool>,
    print_tree: Option<bool>,
    #[serde(default)]
    experimental_features: Vec<String>,
}

#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlViewport {
    width: Option<f32>,
    height: Option<f32>,
    direction: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            point_scale_factor: 1.0,
            use_web_defaults: false,
            use_legacy_stretch_behaviour: false,
            diff_legacy_stretch_behaviour: false,
            print_tree: false,
            experimental_features: Vec::new(),
            width: None,
            height: None,
            direction: Direction::Ltr,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load settings from a TOML string; missing keys keep their defaults
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let parsed: TomlSettings = toml::from_str(content)?;
        let defaults = Self::default();

        let experimental_features = parsed
            .layout
            .experimental_features
            .iter()
            .map(|name| {
                ExperimentalFeature::from_str(name)
                    .map_err(|err| SettingsError::Invalid(err.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let direction = match parsed.viewport.direction {
            Some(name) => Direction::from_str(&name)
                .map_err(|err| SettingsError::Invalid(err.to_string()))?,
            None => defaults.direction,
        };

        Ok(Settings {
            point_scale_factor: parsed
                .layout
                .point_scale_factor
                .unwrap_or(defaults.point_scale_factor),
            use_web_defaults: parsed.layout.use_web_defaults.unwrap_or_default(),
            use_legacy_stretch_behaviour: parsed
                .layout
                .use_legacy_stretch_behaviour
                .unwrap_or_default(),
            diff_legacy_stretch_behaviour: parsed
                .layout
                .diff_legacy_stretch_behaviour
                .unwrap_or_default(),
            print_tree: parsed.layout.print_tree.unwrap_or_default(),
            experimental_features,
            width: parsed.viewport.width,
            height: parsed.viewport.height,
            direction,
        })
    }

    /// Engine configuration described by these settings
    pub fn config(&self) -> Result<Config, SettingsError> {
        let config = self
            .experimental_features
            .iter()
            .fold(Config::new(), |config, feature| {
                config.with_experimental_feature(*feature, true)
            })
            .with_point_scale_factor(self.point_scale_factor)?
            .with_web_defaults(self.use_web_defaults)
            .with_legacy_stretch_behaviour(self.use_legacy_stretch_behaviour)
            .with_legacy_stretch_diffing(self.diff_legacy_stretch_behaviour)
            .with_print_tree(self.print_tree);
        Ok(config)
    }

    pub fn owner_width(&self) -> FloatOptional {
        self.width.into()
    }

    pub fn owner_height(&self) -> FloatOptional {
        self.height.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.point_scale_factor, 1.0);
        assert_eq!(settings.direction, Direction::Ltr);
        assert!(settings.owner_width().is_undefined());
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(Settings::from_toml("").unwrap(), Settings::default());
    }

    #[test]
    fn test_load_from_toml() {
        let settings = Settings::from_toml(
            r#"
            [layout]
            point_scale_factor = 3.0
            use_web_defaults = true
            experimental_features = ["web-flex-basis"]

            [viewport]
            width = 320
            direction = "rtl"
            "#,
        )
        .unwrap();
        assert_eq!(settings.point_scale_factor, 3.0);
        assert!(settings.use_web_defaults);
        assert_eq!(settings.width, Some(320.0));
        assert_eq!(settings.height, None);
        assert_eq!(settings.direction, Direction::Rtl);

        let config = settings.config().unwrap();
        assert_eq!(config.point_scale_factor, 3.0);
        assert!(config.use_web_defaults);
        assert!(config.is_experimental_feature_enabled(ExperimentalFeature::WebFlexBasis));
    }

    #[test]
    fn test_unknown_feature_is_rejected() {
        let err = Settings::from_toml("[layout]\nexperimental_features = [\"warp-drive\"]")
            .unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(err.to_string().contains("warp-drive"));
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Settings::from_toml("[layout]\nrounding = 2").unwrap_err();
        assert!(matches!(err, SettingsError::ParseError(_)));
    }

    #[test]
    fn test_negative_scale_factor_fails_config() {
        let settings = Settings::from_toml("[layout]\npoint_scale_factor = -1.0").unwrap();
        assert!(matches!(settings.config(), Err(SettingsError::Layout(_))));
    }
}
