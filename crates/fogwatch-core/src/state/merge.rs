use crate::config::FeatureFlags;
use crate::state::{GameState, GameStateType, StatePatch};

/// Compute the next state from the current one and a detector's patch.
///
/// Rules, in order:
/// - smart features off: everything collapses to `Unknown`
/// - `map` is kept unless the patch brings a new one, except when entering
///   `Match` from `Menu`, `Unknown` or `Closed` (a fresh match forgets the map)
/// - `killer` and `killer_guess` are dropped when entering `Menu`, `Closed` or
///   `Unknown` from any other state, then overridden by the patch
/// - fields of disabled features are stripped
///
/// The killer certainty ladder is enforced by the caller, which only puts a
/// killer into the patch after checking it against the held one.
pub fn merge(prev: &GameState, patch: StatePatch, flags: &FeatureFlags) -> GameState {
    if !flags.smart_features_enabled {
        return GameState::new(GameStateType::Unknown);
    }

    let state_type = patch.state_type.unwrap_or(prev.state_type);

    let map = match patch.map {
        Some(map) => Some(map),
        None if starts_fresh_match(prev.state_type, state_type) => None,
        None => prev.map.clone(),
    };

    let (killer, killer_guess) = if forgets_killer(prev.state_type, state_type) {
        (None, None)
    } else {
        (prev.killer, prev.killer_guess)
    };

    let mut next = GameState {
        state_type,
        map,
        killer: patch.killer.or(killer),
        killer_guess: patch.killer_guess.or(killer_guess),
        detected_by: patch.detected_by.or(prev.detected_by),
    };

    if !flags.map_detection_enabled {
        next.map = None;
    }
    if !flags.killer_detection_enabled {
        next.killer = None;
        next.killer_guess = None;
    }

    next
}

fn forgets_killer(prev: GameStateType, next: GameStateType) -> bool {
    prev != next
        && matches!(
            next,
            GameStateType::Menu | GameStateType::Closed | GameStateType::Unknown
        )
}

fn starts_fresh_match(prev: GameStateType, next: GameStateType) -> bool {
    next == GameStateType::Match
        && matches!(
            prev,
            GameStateType::Menu | GameStateType::Unknown | GameStateType::Closed
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::killer::{KillerCatalog, KillerId};
    use crate::map::MapId;
    use crate::state::{DetectionCause, KillerCertainty, KillerState};

    fn ormond() -> MapId {
        MapId::new("Ormond", "Mount Ormond Resort", "Mount Ormond Resort.webp")
    }

    fn trapper() -> KillerState {
        let entry = *KillerCatalog::builtin().get(KillerId::Trapper).unwrap();
        KillerState::new(entry, KillerCertainty::Certain)
    }

    fn in_match() -> GameState {
        GameState {
            state_type: GameStateType::Match,
            map: Some(ormond()),
            killer: Some(trapper()),
            killer_guess: Some(KillerId::Trapper),
            detected_by: Some(DetectionCause::MapText),
        }
    }

    #[test]
    fn test_smart_features_off_collapses_to_unknown() {
        let flags = FeatureFlags::default();
        let next = merge(
            &in_match(),
            StatePatch::transition(GameStateType::Menu, DetectionCause::MainMenuText),
            &flags,
        );
        assert_eq!(next, GameState::new(GameStateType::Unknown));
    }

    #[test]
    fn test_empty_patch_is_identity() {
        let prev = in_match();
        let next = merge(&prev, StatePatch::default(), &FeatureFlags::all());
        assert_eq!(next, prev);
    }

    #[test]
    fn test_menu_to_match_clears_map() {
        let prev = GameState {
            state_type: GameStateType::Menu,
            map: Some(ormond()),
            ..GameState::default()
        };
        let next = merge(
            &prev,
            StatePatch::transition(GameStateType::Match, DetectionCause::Fallback),
            &FeatureFlags::all(),
        );
        assert_eq!(next.state_type, GameStateType::Match);
        assert!(next.map.is_none());
    }

    #[test]
    fn test_match_loading_match_preserves_map() {
        let flags = FeatureFlags::all();
        let loading = merge(
            &in_match(),
            StatePatch::transition(GameStateType::Loading, DetectionCause::BlackEdges),
            &flags,
        );
        assert_eq!(loading.map, Some(ormond()));

        let back = merge(
            &loading,
            StatePatch::transition(GameStateType::Match, DetectionCause::Fallback),
            &flags,
        );
        assert_eq!(back.state_type, GameStateType::Match);
        assert_eq!(back.map, Some(ormond()));
    }

    #[test]
    fn test_map_patch_wins_over_fresh_match_rule() {
        let prev = GameState::new(GameStateType::Menu);
        let next = merge(
            &prev,
            StatePatch::transition(GameStateType::Match, DetectionCause::MapText).with_map(ormond()),
            &FeatureFlags::all(),
        );
        assert_eq!(next.map, Some(ormond()));
    }

    #[test]
    fn test_map_preserved_into_menu() {
        let next = merge(
            &in_match(),
            StatePatch::transition(GameStateType::Menu, DetectionCause::MenuButtonText),
            &FeatureFlags::all(),
        );
        assert_eq!(next.map, Some(ormond()));
    }

    #[test]
    fn test_match_to_menu_clears_killer() {
        let next = merge(
            &in_match(),
            StatePatch::transition(GameStateType::Menu, DetectionCause::MainMenuText),
            &FeatureFlags::all(),
        );
        assert!(next.killer.is_none());
        assert!(next.killer_guess.is_none());
        assert_eq!(next.detected_by, Some(DetectionCause::MainMenuText));
    }

    #[test]
    fn test_leaving_session_clears_killer() {
        let flags = FeatureFlags::all();
        let closed = merge(
            &in_match(),
            StatePatch::transition(GameStateType::Closed, DetectionCause::HostLifecycle),
            &flags,
        );
        assert!(closed.killer.is_none());
        assert!(closed.killer_guess.is_none());

        let prev = GameState {
            state_type: GameStateType::Closed,
            killer: Some(trapper()),
            ..GameState::default()
        };
        let unknown = merge(
            &prev,
            StatePatch::transition(GameStateType::Unknown, DetectionCause::HostLifecycle),
            &flags,
        );
        assert!(unknown.killer.is_none());
    }

    #[test]
    fn test_menu_to_menu_keeps_killer_guess() {
        let prev = GameState {
            state_type: GameStateType::Menu,
            killer_guess: Some(KillerId::Nurse),
            ..GameState::default()
        };
        let next = merge(
            &prev,
            StatePatch::transition(GameStateType::Menu, DetectionCause::BloodpointsText),
            &FeatureFlags::all(),
        );
        assert_eq!(next.killer_guess, Some(KillerId::Nurse));
    }

    #[test]
    fn test_disabled_features_strip_fields() {
        let flags = FeatureFlags {
            map_detection_enabled: false,
            ..FeatureFlags::all()
        };
        let next = merge(&in_match(), StatePatch::default(), &flags);
        assert!(next.map.is_none());
        assert!(next.killer.is_some());

        let flags = FeatureFlags {
            killer_detection_enabled: false,
            ..FeatureFlags::all()
        };
        let next = merge(&in_match(), StatePatch::default(), &flags);
        assert!(next.map.is_some());
        assert!(next.killer.is_none());
        assert!(next.killer_guess.is_none());
    }

    #[test]
    fn test_detected_by_kept_when_patch_has_none() {
        let next = merge(&in_match(), StatePatch::default(), &FeatureFlags::all());
        assert_eq!(next.detected_by, Some(DetectionCause::MapText));
    }
}
