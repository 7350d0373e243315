//! Configuration and tuning constants.
//!
//! This module contains:
//! - `Settings` - user settings loaded from a TOML file
//! - `FeatureFlags` - the detection feature toggles
//! - Timing and threshold constants for the detectors

mod settings;

pub use settings::*;

/// Detection loop and timer configuration.
pub mod timing {
    use std::time::Duration;

    /// Period of the scheduler tick. Most ticks are throttled away.
    pub const TICK_INTERVAL: Duration = Duration::from_millis(50);

    /// Minimum spacing between the end of one cycle and the start of the next.
    pub const MIN_CYCLE_SPACING: Duration = Duration::from_secs(1);

    /// Detector silence after which a match is assumed.
    pub const FALLBACK_AFTER: Duration = Duration::from_secs(10);

    /// Window in which a worse map guess cannot replace an accepted one.
    pub const MAP_HYSTERESIS_WINDOW: Duration = Duration::from_secs(3);
}

/// Score and count thresholds for the text heuristics.
pub mod thresholds {
    /// Minimum similarity for a map name match.
    pub const MAP_ACCEPT_SCORE: f64 = 0.85;

    /// Map names whose length differs from the candidate by more than this
    /// many characters are scored 0 without a full comparison.
    pub const MAP_LENGTH_PREFILTER: usize = 3;

    /// Minimum similarity for the loading screen phrase.
    pub const LOADING_TEXT_SCORE: f64 = 0.9;

    /// Settings category words required on the settings panel.
    pub const SETTINGS_VOCABULARY_MIN: usize = 5;

    /// Main menu words required on the main menu.
    pub const MAIN_MENU_MIN: usize = 3;

    /// Numeric tokens required in the bloodpoints region.
    pub const BLOODPOINTS_MIN: usize = 3;

    /// Shortest text before an ellipsis that may match a killer name.
    pub const TRUNCATED_NAME_MIN: usize = 4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_constants() {
        assert_eq!(timing::TICK_INTERVAL.as_millis(), 50);
        assert_eq!(timing::MIN_CYCLE_SPACING.as_secs(), 1);
        assert_eq!(timing::FALLBACK_AFTER.as_secs(), 10);
        assert_eq!(timing::MAP_HYSTERESIS_WINDOW.as_secs(), 3);
    }

    #[test]
    fn test_threshold_constants() {
        assert!(thresholds::MAP_ACCEPT_SCORE < thresholds::LOADING_TEXT_SCORE);
        assert_eq!(thresholds::MAP_LENGTH_PREFILTER, 3);
        assert_eq!(thresholds::SETTINGS_VOCABULARY_MIN, 5);
    }
}
