#![forbid(unsafe_code)]

//! Provider-level configuration as data.
//!
//! Everything a provider can default for its steps, loadable from TOML or
//! JSON. Missing fields fall back to [`TourConfig::default`].
//!
//! ```toml
//! backdrop = "stop"
//! conflict_policy = "last_write_wins"
//!
//! [shape]
//! kind = "rectangle"
//! padding = 8.0
//!
//! [overlay]
//! color = "#101820"
//! opacity = 0.6
//!
//! [floating]
//! placement = "top"
//! offset = 6.0
//! ```
//!
//! Callback behaviors cannot be expressed as data; set them on the
//! [`SpotlightTourProvider`](crate::SpotlightTourProvider) instead.

use std::path::Path;

use serde::{Deserialize, Serialize};
use spotlight_core::{ConflictPolicy, FloatingOptions, ShapeOptions};

use crate::backdrop::BackdropAction;
use crate::error::ConfigError;

/// Backdrop paint passed through to the render layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// `#rrggbb` hex color.
    pub color: String,
    /// Opacity in `[0, 1]`.
    pub opacity: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            color: "#000000".into(),
            opacity: 0.45,
        }
    }
}

impl OverlayStyle {
    /// Parse the color into RGB components.
    #[must_use]
    pub fn rgb(&self) -> Option<[u8; 3]> {
        let hex = self.color.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |at: usize| u8::from_str_radix(&hex[at..at + 2], 16).ok();
        Some([channel(0)?, channel(2)?, channel(4)?])
    }
}

/// Top-level tour configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TourConfig {
    /// Default backdrop-press behavior.
    pub backdrop: BackdropAction,
    /// Default cut-out shape.
    pub shape: ShapeOptions,
    /// Backdrop paint.
    pub overlay: OverlayStyle,
    /// Default tooltip placement.
    pub floating: FloatingOptions,
    /// How to settle several elements claiming one step.
    pub conflict_policy: ConflictPolicy,
}

impl TourConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns every problem found. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.shape.padding.is_finite() || self.shape.padding < 0.0 {
            errors.push(format!(
                "shape.padding must be finite and >= 0, got {}",
                self.shape.padding
            ));
        }

        if !(0.0..=1.0).contains(&self.overlay.opacity) {
            errors.push(format!(
                "overlay.opacity must be in [0, 1], got {}",
                self.overlay.opacity
            ));
        }

        if self.overlay.rgb().is_none() {
            errors.push(format!(
                "overlay.color must be #rrggbb, got {:?}",
                self.overlay.color
            ));
        }

        if !self.floating.offset.is_finite() {
            errors.push("floating.offset must be finite".into());
        }

        errors
    }

    /// Consume the config, returning it only if [`validate`](Self::validate)
    /// finds nothing.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Serialize as a single JSON line for logging.
    #[must_use]
    pub fn to_jsonl(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".into())
    }
}
