#![forbid(unsafe_code)]

//! Container configuration.
//!
//! [`SortableConfig`] captures every tunable of a sortable container: the
//! layout mode, drag participation (group, handle, accepted sources) and a
//! nested [`SortableOptions`] bag of numeric knobs. Every field has a
//! default, and documents may be partial:
//!
//! ```toml
//! mode = "grid"
//! group_id = "board"
//!
//! [options]
//! gutter = 8.0
//! scroll_threshold = 120.0
//!
//! [options.animation]
//! tension = 300.0
//! ```
//!
//! ```rust,ignore
//! let config = SortableConfig::from_toml_str(text)?.validated()?;
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Layout mode of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Single column; every item spans the container width.
    #[default]
    List,
    /// Masonry grid of equal-width columns.
    Grid,
}

/// Top-level configuration of one sortable container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortableConfig {
    pub mode: LayoutMode,
    /// Whether items can be dragged at all.
    pub is_sortable: bool,
    /// Containers sharing a group id exchange items.
    pub group_id: Option<String>,
    /// Restricts drag initiation to targets matching this selector.
    pub drag_handle_selector: Option<String>,
    /// Drop-target allow list: this container accepts foreign items only
    /// when the list is empty or contains its own id.
    pub drag_sources: Vec<String>,
    pub options: SortableOptions,
}

impl Default for SortableConfig {
    fn default() -> Self {
        Self {
            mode: LayoutMode::List,
            is_sortable: true,
            group_id: None,
            drag_handle_selector: None,
            drag_sources: Vec::new(),
            options: SortableOptions::default(),
        }
    }
}

/// Numeric tuning knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SortableOptions {
    /// Space between items, in pixels.
    pub gutter: f64,
    /// Auto-scroll speed multiplier; max speed is `50 × scroll_speed` px/frame.
    pub scroll_speed: f64,
    /// Distance from an edge (px) inside which auto-scroll engages.
    pub scroll_threshold: f64,
    pub long_press_delay_ms: u64,
    pub long_press_move_tolerance_px: f64,
    pub clone_cleanup_fallback_timeout_ms: u64,
    pub auto_scroll_proximity_power: f64,
    pub auto_scroll_min_speed_offset_multiplier: f64,
    pub default_item_width: f64,
    pub container_fallback_width: f64,
    pub default_item_height: f64,
    pub scroll_debounce_delay_ms: u64,
    pub virtual_scroll_buffer: usize,
    pub animation: AnimationConfig,
}

impl Default for SortableOptions {
    fn default() -> Self {
        Self {
            gutter: 0.0,
            scroll_speed: 2.0,
            scroll_threshold: 300.0,
            long_press_delay_ms: 100,
            long_press_move_tolerance_px: 50.0,
            clone_cleanup_fallback_timeout_ms: 500,
            auto_scroll_proximity_power: 3.0,
            auto_scroll_min_speed_offset_multiplier: 0.1,
            default_item_width: 300.0,
            container_fallback_width: 1000.0,
            default_item_height: 10.0,
            scroll_debounce_delay_ms: 100,
            virtual_scroll_buffer: 20,
            animation: AnimationConfig::default(),
        }
    }
}

impl SortableOptions {
    #[must_use]
    pub fn long_press_delay(&self) -> Duration {
        Duration::from_millis(self.long_press_delay_ms)
    }

    #[must_use]
    pub fn clone_cleanup_fallback_timeout(&self) -> Duration {
        Duration::from_millis(self.clone_cleanup_fallback_timeout_ms)
    }

    #[must_use]
    pub fn scroll_debounce_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_debounce_delay_ms)
    }
}

/// Spring and transition knobs for drag visuals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub tension: f64,
    pub friction: f64,
    /// Scale applied to the clone while it is being dragged.
    pub scale: f64,
    /// Duration of item reposition transitions, for the renderer.
    pub duration_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tension: 170.0,
            friction: 26.0,
            scale: 1.05,
            duration_ms: 200,
        }
    }
}

impl SortableConfig {
    #[must_use]
    pub fn list() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn grid() -> Self {
        Self {
            mode: LayoutMode::Grid,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_group(mut self, group_id: impl Into<String>) -> Self {
        self.group_id = Some(group_id.into());
        self
    }

    #[must_use]
    pub fn with_handle(mut self, selector: impl Into<String>) -> Self {
        self.drag_handle_selector = Some(selector.into());
        self
    }

    #[must_use]
    pub fn with_drag_sources<I, S>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.drag_sources = sources.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.is_sortable = sortable;
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: SortableOptions) -> Self {
        self.options = options;
        self
    }

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

    /// List every out-of-range parameter. Empty means valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let o = &self.options;
        let mut errors = Vec::new();

        if !(o.gutter >= 0.0) {
            errors.push(format!("options.gutter must be >= 0, got {}", o.gutter));
        }
        if !(o.scroll_speed > 0.0) {
            errors.push(format!(
                "options.scroll_speed must be > 0, got {}",
                o.scroll_speed
            ));
        }
        if !(o.scroll_threshold > 0.0) {
            errors.push(format!(
                "options.scroll_threshold must be > 0, got {}",
                o.scroll_threshold
            ));
        }
        if !(o.long_press_move_tolerance_px >= 0.0) {
            errors.push(format!(
                "options.long_press_move_tolerance_px must be >= 0, got {}",
                o.long_press_move_tolerance_px
            ));
        }
        if !(o.auto_scroll_proximity_power > 0.0) {
            errors.push(format!(
                "options.auto_scroll_proximity_power must be > 0, got {}",
                o.auto_scroll_proximity_power
            ));
        }
        if !(o.auto_scroll_min_speed_offset_multiplier >= 0.0) {
            errors.push(format!(
                "options.auto_scroll_min_speed_offset_multiplier must be >= 0, got {}",
                o.auto_scroll_min_speed_offset_multiplier
            ));
        }
        for (name, value) in [
            ("default_item_width", o.default_item_width),
            ("default_item_height", o.default_item_height),
            ("container_fallback_width", o.container_fallback_width),
        ] {
            if !(value > 0.0) {
                errors.push(format!("options.{name} must be > 0, got {value}"));
            }
        }
        if !(o.animation.tension > 0.0) {
            errors.push(format!(
                "options.animation.tension must be > 0, got {}",
                o.animation.tension
            ));
        }
        if !(o.animation.friction >= 0.0) {
            errors.push(format!(
                "options.animation.friction must be >= 0, got {}",
                o.animation.friction
            ));
        }
        if !(o.animation.scale > 0.0) {
            errors.push(format!(
                "options.animation.scale must be > 0, got {}",
                o.animation.scale
            ));
        }
        if self
            .drag_handle_selector
            .as_deref()
            .is_some_and(|s| s.trim().is_empty())
        {
            errors.push("drag_handle_selector must not be blank".into());
        }

        errors
    }

    /// Return `self` if valid, otherwise every validation message.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`SortableConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
