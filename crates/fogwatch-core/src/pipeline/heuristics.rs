//! Word-level classifiers for the menu, settings and loading regions.
//!
//! These are pure functions over OCR lines. Gating on the current state is
//! the caller's concern.

use std::sync::LazyLock;

use regex::Regex;
use strum::Display;

use crate::config::thresholds;
use crate::state::DetectionCause;
use crate::text::{count_words_in, similarity, words};

/// Phrase shown on the lobby loading screen.
pub const LOADING_PHRASE: &str = "connecting to other players";

/// Keywords of the settings back/apply buttons.
pub const SETTINGS_BUTTON_KEYWORDS: &[&str] = &["back", "esc", "escape", "apply", "changes"];

/// Category tabs of the settings panel.
pub const SETTINGS_VOCABULARY: &[&str] = &[
    "general",
    "accessibility",
    "beta",
    "online",
    "graphics",
    "audio",
    "controls",
    "input",
    "binding",
    "support",
    "match",
    "details",
];

pub const MAIN_MENU_WORDS: &[&str] = &["play", "rift", "pass", "quests", "store"];

pub const MENU_BUTTON_WORDS: &[&str] = &["play", "continue", "cancel"];

static BLOODPOINTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{3,}").expect("bloodpoints pattern is valid"));

/// Which part of the settings screen a text block was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SettingsPanel {
    /// Bottom left button row, read through the map region.
    BackButton,
    /// Category tabs across the top.
    Categories,
}

/// Menu regions and the cause each one reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum MenuSignal {
    MainMenu,
    MenuButton,
    Bloodpoints,
}

impl MenuSignal {
    pub fn cause(self) -> DetectionCause {
        match self {
            Self::MainMenu => DetectionCause::MainMenuText,
            Self::MenuButton => DetectionCause::MenuButtonText,
            Self::Bloodpoints => DetectionCause::BloodpointsText,
        }
    }
}

/// Whether `lines` read from `panel` show the settings screen.
pub fn is_settings_screen<S: AsRef<str>>(panel: SettingsPanel, lines: &[S]) -> bool {
    let tokens = words(lines);
    let has_button = count_words_in(&tokens, SETTINGS_BUTTON_KEYWORDS) > 0;

    match panel {
        SettingsPanel::BackButton => has_button,
        SettingsPanel::Categories => {
            has_button
                || count_words_in(&tokens, SETTINGS_VOCABULARY)
                    >= thresholds::SETTINGS_VOCABULARY_MIN
        }
    }
}

/// Classify a menu region.
///
/// `allow_menu_button` is false while the state is unknown: the start-up
/// disclaimer also says "play".
pub fn menu_cause<S: AsRef<str>>(
    signal: MenuSignal,
    lines: &[S],
    allow_menu_button: bool,
) -> Option<DetectionCause> {
    let tokens = words(lines);

    let detected = match signal {
        MenuSignal::MainMenu => {
            count_words_in(&tokens, MAIN_MENU_WORDS) >= thresholds::MAIN_MENU_MIN
        }
        MenuSignal::MenuButton => {
            allow_menu_button && count_words_in(&tokens, MENU_BUTTON_WORDS) > 0
        }
        MenuSignal::Bloodpoints => {
            tokens
                .iter()
                .filter(|token| BLOODPOINTS_RE.is_match(token))
                .count()
                >= thresholds::BLOODPOINTS_MIN
        }
    };

    detected.then(|| signal.cause())
}

/// Whether any line reads as the loading screen phrase.
pub fn is_loading_text<S: AsRef<str>>(lines: &[S]) -> bool {
    lines
        .iter()
        .any(|line| similarity(LOADING_PHRASE, line.as_ref()) >= thresholds::LOADING_TEXT_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod settings_tests {
        use super::*;

        #[test]
        fn test_back_button_keywords() {
            assert!(is_settings_screen(SettingsPanel::BackButton, &["[ESC] BACK"]));
            assert!(is_settings_screen(SettingsPanel::BackButton, &["APPLY CHANGES"]));
            assert!(!is_settings_screen(SettingsPanel::BackButton, &["BACKPACK"]));
            assert!(!is_settings_screen(
                SettingsPanel::BackButton,
                &["GENERAL AUDIO GRAPHICS CONTROLS BETA"]
            ));
        }

        #[test]
        fn test_categories_need_five_words() {
            let four = ["GENERAL", "AUDIO", "GRAPHICS", "CONTROLS"];
            let five = ["GENERAL", "AUDIO", "GRAPHICS", "CONTROLS", "ONLINE"];
            assert!(!is_settings_screen(SettingsPanel::Categories, &four));
            assert!(is_settings_screen(SettingsPanel::Categories, &five));
        }

        #[test]
        fn test_categories_accept_button_keywords() {
            assert!(is_settings_screen(SettingsPanel::Categories, &["ESC BACK"]));
        }

        #[test]
        fn test_empty_text() {
            let empty: [&str; 0] = [];
            assert!(!is_settings_screen(SettingsPanel::Categories, &empty));
            assert!(!is_settings_screen(SettingsPanel::BackButton, &[""]));
        }
    }

    mod menu_tests {
        use super::*;

        #[test]
        fn test_main_menu_threshold() {
            assert_eq!(
                menu_cause(MenuSignal::MainMenu, &["PLAY", "RIFT PASS"], true),
                Some(DetectionCause::MainMenuText)
            );
            assert_eq!(menu_cause(MenuSignal::MainMenu, &["PLAY", "STORE"], true), None);
        }

        #[test]
        fn test_main_menu_whole_tokens_only() {
            assert_eq!(
                menu_cause(MenuSignal::MainMenu, &["PLAYER RIFTS STORES"], true),
                None
            );
        }

        #[test]
        fn test_menu_button_requires_known_state() {
            assert_eq!(
                menu_cause(MenuSignal::MenuButton, &["CONTINUE"], true),
                Some(DetectionCause::MenuButtonText)
            );
            assert_eq!(menu_cause(MenuSignal::MenuButton, &["PLAY"], false), None);
        }

        #[test]
        fn test_bloodpoints() {
            assert_eq!(
                menu_cause(MenuSignal::Bloodpoints, &["123 4567", "890"], true),
                Some(DetectionCause::BloodpointsText)
            );
            assert_eq!(menu_cause(MenuSignal::Bloodpoints, &["12 34 567"], true), None);
        }
    }

    #[test]
    fn test_loading_text() {
        assert!(is_loading_text(&["CONNECTING TO OTHER PLAYERS"]));
        assert!(is_loading_text(&["", "Connecting to other player5"]));
        assert!(!is_loading_text(&["CONNECTING"]));
    }
}
