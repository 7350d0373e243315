use std::time::Instant;

use serde::Serialize;
use strum::{Display, EnumIter, IntoStaticStr};

use crate::map::MapDirectory;
use crate::pipeline::heuristics::{MenuSignal, SettingsPanel};
use crate::pipeline::{RegionId, RegionSnapshot};
use crate::state::GameStateMachine;

/// The detector that classified a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, IntoStaticStr)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Decision {
    LoadingScreen,
    Map,
    /// Map region text matched a killer power but no map.
    Killer,
    Settings,
    LoadingText,
    MainMenu,
    KillerName,
    MenuButton,
    Bloodpoints,
    SettingsBackButton,
    /// Nothing fired and the silence timer forced a match.
    Fallback,
}

/// One detector over the region results of a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum Check {
    LoadingScreen,
    MapText,
    Settings,
    LoadingText,
    MainMenu,
    KillerName,
    MenuButton,
    Bloodpoints,
    SettingsBackButton,
}

impl Check {
    /// Every check, in the order a cycle tries them.
    pub const PRIORITY: [Check; 9] = [
        Check::LoadingScreen,
        Check::MapText,
        Check::Settings,
        Check::LoadingText,
        Check::MainMenu,
        Check::KillerName,
        Check::MenuButton,
        Check::Bloodpoints,
        Check::SettingsBackButton,
    ];

    /// The region this check reads.
    pub fn region(self) -> RegionId {
        match self {
            Check::LoadingScreen => RegionId::LoadingScreen,
            Check::MapText | Check::SettingsBackButton => RegionId::Map,
            Check::Settings => RegionId::Settings,
            Check::LoadingText => RegionId::LoadingText,
            Check::MainMenu | Check::KillerName => RegionId::MainMenu,
            Check::MenuButton => RegionId::MenuButton,
            Check::Bloodpoints => RegionId::Bloodpoints,
        }
    }

    /// Run this check. A missing region result counts as no signal.
    pub fn run<D: MapDirectory>(
        self,
        machine: &mut GameStateMachine<D>,
        snapshot: &RegionSnapshot,
        now: Instant,
    ) -> Option<Decision> {
        let lines = move || snapshot.ocr(self.region()).map(|result| result.text.as_slice());

        match self {
            Check::LoadingScreen => {
                let black = snapshot.pure_black(self.region())?;
                machine
                    .guess_loading_screen(black.passed, None, now)
                    .map(|_| Decision::LoadingScreen)
            }
            Check::MapText => {
                let lines = lines()?;
                let map = lines.iter().find_map(|line| machine.guess_map(line, now));
                let killer = machine.guess_killer_by_power(lines, now);
                match (map, killer) {
                    (Some(_), _) => Some(Decision::Map),
                    (None, Some(_)) => Some(Decision::Killer),
                    (None, None) => None,
                }
            }
            Check::Settings => machine
                .guess_settings(SettingsPanel::Categories, lines()?, now)
                .then_some(Decision::Settings),
            Check::LoadingText => {
                let text = snapshot.ocr(self.region())?;
                machine
                    .guess_loading_screen(false, Some(text), now)
                    .map(|_| Decision::LoadingText)
            }
            Check::MainMenu => machine
                .guess_menu(MenuSignal::MainMenu, lines()?, now)
                .map(|_| Decision::MainMenu),
            Check::KillerName => machine
                .guess_killer_by_name(lines()?, now)
                .map(|_| Decision::KillerName),
            Check::MenuButton => machine
                .guess_menu(MenuSignal::MenuButton, lines()?, now)
                .map(|_| Decision::MenuButton),
            Check::Bloodpoints => machine
                .guess_menu(MenuSignal::Bloodpoints, lines()?, now)
                .map(|_| Decision::Bloodpoints),
            Check::SettingsBackButton => machine
                .guess_settings(SettingsPanel::BackButton, lines()?, now)
                .then_some(Decision::SettingsBackButton),
        }
    }
}

/// Run `checks` in order and stop at the first one that fires.
pub fn evaluate<D: MapDirectory>(
    machine: &mut GameStateMachine<D>,
    snapshot: &RegionSnapshot,
    checks: &[Check],
    now: Instant,
) -> Option<Decision> {
    checks
        .iter()
        .find_map(|check| check.run(machine, snapshot, now))
}

/// A group of regions captured together and the checks they unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stage {
    pub regions: &'static [RegionId],
    pub checks: &'static [Check],
}

/// Capture stages of one cycle, cheapest first.
///
/// The back button check reads the map region captured in an earlier stage.
pub const STAGES: [Stage; 4] = [
    Stage {
        regions: &[RegionId::LoadingScreen],
        checks: &[Check::LoadingScreen],
    },
    Stage {
        regions: &[RegionId::Map],
        checks: &[Check::MapText],
    },
    Stage {
        regions: &[RegionId::Settings],
        checks: &[Check::Settings],
    },
    Stage {
        regions: &[
            RegionId::LoadingText,
            RegionId::MainMenu,
            RegionId::MenuButton,
            RegionId::Bloodpoints,
        ],
        checks: &[
            Check::LoadingText,
            Check::MainMenu,
            Check::KillerName,
            Check::MenuButton,
            Check::Bloodpoints,
            Check::SettingsBackButton,
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeatureFlags;
    use crate::killer::{KillerCatalog, KillerId};
    use crate::map::{MapListing, StaticMapDirectory};
    use crate::state::{DetectionCause, GameStateType};
    use strum::IntoEnumIterator;

    fn machine(now: Instant) -> GameStateMachine<StaticMapDirectory> {
        let mut listing = MapListing::new();
        listing.insert(
            "Red Forest".to_string(),
            vec!["Mother's Dwelling.webp".to_string(), "Temple of Purgation.webp".to_string()],
        );
        GameStateMachine::new(
            FeatureFlags::all(),
            KillerCatalog::builtin(),
            StaticMapDirectory::from_listing(listing),
            now,
        )
    }

    fn main_menu() -> RegionSnapshot {
        RegionSnapshot::new().with_ocr(RegionId::MainMenu, ["PLAY", "RIFT PASS", "STORE"])
    }

    #[test]
    fn test_stages_cover_priority_order() {
        let staged: Vec<Check> = STAGES.iter().flat_map(|stage| stage.checks.iter().copied()).collect();
        assert_eq!(staged, Check::PRIORITY.to_vec());
        assert_eq!(Check::iter().count(), Check::PRIORITY.len());
    }

    #[test]
    fn test_stage_regions_precede_their_checks() {
        let mut captured = Vec::new();
        for stage in STAGES {
            captured.extend_from_slice(stage.regions);
            for check in stage.checks {
                assert!(captured.contains(&check.region()), "{check} runs before its region");
            }
        }
    }

    #[test]
    fn test_empty_snapshot_decides_nothing() {
        let now = Instant::now();
        let mut machine = machine(now);
        assert_eq!(
            evaluate(&mut machine, &RegionSnapshot::new(), &Check::PRIORITY, now),
            None
        );
    }

    #[test]
    fn test_first_positive_check_wins() {
        let now = Instant::now();
        let mut machine = machine(now);
        evaluate(&mut machine, &main_menu(), &Check::PRIORITY, now);
        assert!(machine.state().is(GameStateType::Menu));

        let snapshot = main_menu()
            .with_pure_black(RegionId::LoadingScreen, true)
            .with_ocr(RegionId::Bloodpoints, ["111 222 333"]);
        let decision = evaluate(&mut machine, &snapshot, &Check::PRIORITY, now);

        assert_eq!(decision, Some(Decision::LoadingScreen));
        assert_eq!(machine.state().detected_by, Some(DetectionCause::BlackEdges));
    }

    #[test]
    fn test_map_text_enters_match() {
        let now = Instant::now();
        let mut machine = machine(now);
        evaluate(&mut machine, &main_menu(), &Check::PRIORITY, now);

        let snapshot = RegionSnapshot::new().with_ocr(RegionId::Map, ["RED FOREST", "MOTHER'S DWELLING"]);
        let decision = evaluate(&mut machine, &snapshot, &Check::PRIORITY, now);

        assert_eq!(decision, Some(Decision::Map));
        let state = machine.state();
        assert!(state.is(GameStateType::Match));
        assert_eq!(state.map.as_ref().map(|m| m.name.as_str()), Some("Mother's Dwelling"));
    }

    #[test]
    fn test_map_text_feeds_killer_power() {
        let now = Instant::now();
        let mut machine = machine(now);
        evaluate(&mut machine, &main_menu(), &Check::PRIORITY, now);

        let snapshot =
            RegionSnapshot::new().with_ocr(RegionId::Map, ["TEMPLE OF PURGATION", "BLINK"]);
        assert_eq!(
            evaluate(&mut machine, &snapshot, &Check::PRIORITY, now),
            Some(Decision::Map)
        );
        assert_eq!(machine.state().killer.map(|k| k.id()), Some(KillerId::Nurse));

        let snapshot = RegionSnapshot::new().with_ocr(RegionId::Map, ["BLINK"]);
        assert_eq!(
            evaluate(&mut machine, &snapshot, &Check::PRIORITY, now),
            Some(Decision::Killer)
        );
    }

    #[test]
    fn test_settings_back_button_uses_map_region() {
        let now = Instant::now();
        let mut machine = machine(now);
        evaluate(&mut machine, &main_menu(), &Check::PRIORITY, now);

        let snapshot = RegionSnapshot::new().with_ocr(RegionId::Map, ["[ESC] BACK"]);
        assert_eq!(
            evaluate(&mut machine, &snapshot, &Check::PRIORITY, now),
            Some(Decision::SettingsBackButton)
        );
        assert!(machine.state().is(GameStateType::Menu));
    }

    #[test]
    fn test_killer_name_in_menu() {
        let now = Instant::now();
        let mut machine = machine(now);
        evaluate(&mut machine, &main_menu(), &Check::PRIORITY, now);

        let snapshot = RegionSnapshot::new().with_ocr(RegionId::MainMenu, ["THE HUNTRESS"]);
        assert_eq!(
            evaluate(&mut machine, &snapshot, &Check::PRIORITY, now),
            Some(Decision::KillerName)
        );
        assert_eq!(machine.state().killer_guess, Some(KillerId::Huntress));
    }

    #[test]
    fn test_decision_names() {
        assert_eq!(Decision::SettingsBackButton.to_string(), "settings-back-button");
        assert_eq!(
            serde_json::to_value(Decision::LoadingScreen).unwrap(),
            "loading-screen"
        );
    }
}
