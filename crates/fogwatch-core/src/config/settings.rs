use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::state::GameStateType;

/// Feature toggles that gate detection.
///
/// `smart_features_enabled` is the master switch: when it is off every
/// published state collapses to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub smart_features_enabled: bool,
    pub map_detection_enabled: bool,
    pub killer_detection_enabled: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            smart_features_enabled: false,
            map_detection_enabled: true,
            killer_detection_enabled: true,
        }
    }
}

impl FeatureFlags {
    /// Every feature enabled.
    pub fn all() -> Self {
        Self {
            smart_features_enabled: true,
            map_detection_enabled: true,
            killer_detection_enabled: true,
        }
    }
}

/// Debug switches for inspecting the detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    pub ocr_debug_enabled: bool,
    /// Freeze detection while the state is of this type.
    pub break_on: Option<GameStateType>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub features: FeatureFlags,
    pub debug: DebugSettings,
}

impl Settings {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load settings, falling back to defaults when the file is missing or invalid.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings from {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    /// Whether detection should pause on the given state.
    pub fn breaks_on(&self, state_type: GameStateType) -> bool {
        self.debug.ocr_debug_enabled && self.debug.break_on == Some(state_type)
    }
}
