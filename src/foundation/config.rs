//! Typed settings for layers and gesture controllers.
//!
//! Every struct has a `Default` and accepts partial JSON: missing fields keep
//! their default values.

use crate::foundation::core::Extent;
use crate::foundation::error::{CanopyError, CanopyResult};

/// Per-layer behavior switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct LayerSettings {
    /// Whether the event router delivers events to this layer.
    pub enable_events: bool,
    /// Whether the layer registers with the scheduler and flushes on ticks.
    pub auto_update: bool,
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            enable_events: true,
            auto_update: true,
        }
    }
}

/// Drag controller settings.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Translate bounds; deltas leaving them are dropped.
    pub extent: Extent,
}

/// Zoom controller settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    /// Scale change per wheel delta unit.
    pub zoom_factor: f64,
    /// `[min, max]` scale clamp; `null` is unbounded.
    #[serde(with = "scale_bounds")]
    pub scale_extent: [f64; 2],
    /// Translate bounds for pointer panning.
    pub pan_extent: Extent,
    /// Length of animated transitions in milliseconds.
    pub duration_ms: u64,
    /// Ease name for animated transitions.
    pub ease: String,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            zoom_factor: 0.001,
            scale_extent: [0.0, f64::INFINITY],
            pan_extent: Extent::UNBOUNDED,
            duration_ms: 250,
            ease: "default".to_owned(),
        }
    }
}

/// All settings in one document.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CanopyConfig {
    /// Layer switches.
    pub layer: LayerSettings,
    /// Drag defaults.
    pub drag: DragConfig,
    /// Zoom defaults.
    pub zoom: ZoomConfig,
}

impl CanopyConfig {
    /// Parse a JSON document.
    pub fn from_json_str(s: &str) -> CanopyResult<Self> {
        serde_json::from_str(s).map_err(|e| CanopyError::serde(e.to_string()))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> CanopyResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CanopyError::serde(e.to_string()))
    }
}

mod scale_bounds {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &[f64; 2], serializer: S) -> Result<S::Ok, S::Error> {
        let [min, max] = v.map(|b| b.is_finite().then_some(b));
        [min, max].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[f64; 2], D::Error> {
        let [min, max] = <[Option<f64>; 2]>::deserialize(deserializer)?;
        Ok([min.unwrap_or(f64::NEG_INFINITY), max.unwrap_or(f64::INFINITY)])
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
