use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use tracing::{debug, info};

use crate::config::{FeatureFlags, timing};
use crate::events::{EngineEvent, EventBus};
use crate::host::GameInfo;
use crate::killer::{KillerCatalog, KillerId, KillerIdentifier};
use crate::map::{MapDirectory, MapId, MapIdentifier};
use crate::pipeline::OcrResult;
use crate::pipeline::heuristics::{self, MenuSignal, SettingsPanel};
use crate::state::{
    DetectionCause, GameState, GameStateType, KillerCertainty, KillerState, StatePatch, merge,
};

/// Owner of the authoritative [`GameState`].
///
/// Detectors never touch the state directly. Each `guess_*` method checks its
/// own gating, turns positive results into a [`StatePatch`] and pushes it
/// through [`merge`]. Every push resets the silence timer used by
/// [`assume_in_match`](Self::assume_in_match); only structurally distinct
/// results are committed and announced.
pub struct GameStateMachine<D> {
    state: GameState,
    flags: FeatureFlags,
    last_update: Instant,
    killers: KillerIdentifier,
    maps: MapIdentifier<D>,
    events: EventBus,
}

impl<D: MapDirectory> GameStateMachine<D> {
    pub fn new(flags: FeatureFlags, catalog: KillerCatalog, directory: D, now: Instant) -> Self {
        Self {
            state: GameState::default(),
            flags,
            last_update: now,
            killers: KillerIdentifier::new(catalog),
            maps: MapIdentifier::new(directory),
            events: EventBus::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn flags(&self) -> &FeatureFlags {
        &self.flags
    }

    /// Time of the last push, accepted or not.
    pub fn last_update(&self) -> Instant {
        self.last_update
    }

    pub fn killers(&self) -> &KillerIdentifier {
        &self.killers
    }

    pub fn maps(&self) -> &MapIdentifier<D> {
        &self.maps
    }

    pub fn subscribe(&mut self) -> Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Publish a diagnostic event to subscribers.
    pub fn publish(&mut self, event: EngineEvent) {
        self.events.emit(event);
    }

    /// Swap the feature flags and republish the current state under them.
    pub fn update_flags(&mut self, flags: FeatureFlags, now: Instant) {
        debug!("Feature flags updated: {:?}", flags);
        self.flags = flags;
        self.push(StatePatch::default(), now);
    }

    /// Merge `patch` into the state. Returns whether the state changed.
    fn push(&mut self, patch: StatePatch, now: Instant) -> bool {
        let next = merge(&self.state, patch, &self.flags);
        self.last_update = now;

        if next == self.state {
            return false;
        }

        info!(
            "Game state {} -> {} ({})",
            self.state.state_type,
            next.state_type,
            next.detected_by.map_or("unspecified", |cause| cause.into())
        );
        self.state = next.clone();
        self.events.emit(EngineEvent::StateChanged(next));
        true
    }

    /// Settings screens pause classification: the current state is
    /// republished unchanged.
    pub fn guess_settings<S: AsRef<str>>(
        &mut self,
        panel: SettingsPanel,
        lines: &[S],
        now: Instant,
    ) -> bool {
        if self.state.is(GameStateType::Unknown) {
            return false;
        }
        if !heuristics::is_settings_screen(panel, lines) {
            return false;
        }

        debug!("Settings screen detected ({})", panel);
        self.push(StatePatch::default(), now);
        true
    }

    /// Detect a loading screen from black borders or the loading phrase.
    ///
    /// Neither signal is trusted before a baseline state is known or during a
    /// match, where dark scenes are common.
    pub fn guess_loading_screen(
        &mut self,
        black_edges: bool,
        text: Option<&OcrResult>,
        now: Instant,
    ) -> Option<DetectionCause> {
        if matches!(
            self.state.state_type,
            GameStateType::Unknown | GameStateType::Match
        ) {
            return None;
        }

        let mut cause = None;
        if black_edges {
            cause = Some(DetectionCause::BlackEdges);
        }
        if text.is_some_and(|text| heuristics::is_loading_text(&text.text)) {
            cause = Some(DetectionCause::LoadingText);
        }

        let cause = cause?;
        self.push(StatePatch::transition(GameStateType::Loading, cause), now);
        Some(cause)
    }

    /// Detect a menu screen from one of the menu regions.
    pub fn guess_menu<S: AsRef<str>>(
        &mut self,
        signal: MenuSignal,
        lines: &[S],
        now: Instant,
    ) -> Option<DetectionCause> {
        let allow_menu_button = !self.state.is(GameStateType::Unknown);
        let cause = heuristics::menu_cause(signal, lines, allow_menu_button)?;

        self.push(StatePatch::transition(GameStateType::Menu, cause), now);
        Some(cause)
    }

    /// Resolve `candidate` to a map and enter `Match` with it.
    pub fn guess_map(&mut self, candidate: &str, now: Instant) -> Option<MapId> {
        if !self.flags.map_detection_enabled {
            return None;
        }

        let found = self.maps.resolve(candidate, now)?;
        debug!("Map detected: {} ({:.3})", found.map, found.score);

        let patch = StatePatch::transition(GameStateType::Match, DetectionCause::MapText)
            .with_map(found.map.clone());
        self.push(patch, now);
        Some(found.map)
    }

    /// Identify the killer from in-match power prompts.
    ///
    /// Returns the committed record, or `None` when nothing matched or the
    /// guess is less certain than the one already held.
    pub fn guess_killer_by_power<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        now: Instant,
    ) -> Option<KillerState> {
        if !self.flags.killer_detection_enabled || !self.state.is(GameStateType::Match) {
            return None;
        }

        let held = self.state.killer.map(|killer| killer.id());
        let guess = self
            .killers
            .identify_by_power(lines, self.state.killer_guess, held)?;

        if !self.accepts_certainty(guess.certainty) {
            debug!(
                "Ignoring {} guess for {}, holding {:?}",
                guess.certainty,
                guess.entry.id,
                self.state.killer_certainty()
            );
            return None;
        }

        let killer = KillerState::new(guess.entry, guess.certainty);
        let patch = StatePatch::transition(GameStateType::Match, DetectionCause::KillerPowerText)
            .with_killer(killer);
        self.push(patch, now);
        Some(killer)
    }

    /// Identify the killer from a character name shown in menus.
    ///
    /// Sets the soft guess, and commits a blind guess when nothing better is
    /// held.
    pub fn guess_killer_by_name<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        now: Instant,
    ) -> Option<KillerId> {
        if !self.flags.killer_detection_enabled || !self.state.is(GameStateType::Menu) {
            return None;
        }

        let entry = *self.killers.identify_by_name(lines)?;
        debug!("Killer name detected: {}", entry.id);

        let mut patch = StatePatch::default()
            .with_killer_guess(entry.id)
            .detected_by(DetectionCause::KillerNameText);
        if self.accepts_certainty(KillerCertainty::BlindGuess) {
            patch = patch.with_killer(KillerState::new(entry, KillerCertainty::BlindGuess));
        }
        self.push(patch, now);
        Some(entry.id)
    }

    /// Force `Match` after [`timing::FALLBACK_AFTER`] without any push.
    pub fn assume_in_match(&mut self, now: Instant) -> bool {
        if matches!(
            self.state.state_type,
            GameStateType::Unknown | GameStateType::Match
        ) {
            return false;
        }

        let silence = self.silence(now);
        if silence < timing::FALLBACK_AFTER {
            return false;
        }

        debug!("No detection for {:?}, assuming match", silence);
        self.push(
            StatePatch::transition(GameStateType::Match, DetectionCause::Fallback),
            now,
        );
        true
    }

    /// Time since the last push.
    pub fn silence(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_update)
    }

    pub fn on_game_opened(&mut self, now: Instant) {
        self.push(
            StatePatch::transition(GameStateType::Unknown, DetectionCause::HostLifecycle),
            now,
        );
    }

    pub fn on_game_closed(&mut self, now: Instant) {
        self.push(
            StatePatch::transition(GameStateType::Closed, DetectionCause::HostLifecycle),
            now,
        );
    }

    /// Apply a host lifecycle report.
    ///
    /// A launch only leaves `Closed`; an exit always closes.
    pub fn on_game_info(&mut self, info: GameInfo, now: Instant) {
        if !info.running {
            if !self.state.is(GameStateType::Closed) {
                self.on_game_closed(now);
            }
        } else if self.state.is(GameStateType::Closed) {
            self.on_game_opened(now);
        }
    }

    fn accepts_certainty(&self, certainty: KillerCertainty) -> bool {
        self.state
            .killer_certainty()
            .is_none_or(|held| certainty >= held)
    }
}
