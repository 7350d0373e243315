use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

use crate::killer::{KillerEntry, KillerId};
use crate::map::MapId;

/// Game phase as seen from the screen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStateType {
    #[default]
    Unknown,
    Menu,
    Loading,
    Match,
    Closed,
}

/// Signal that produced the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectionCause {
    MainMenuText,
    MenuButtonText,
    BloodpointsText,
    LoadingText,
    BlackEdges,
    MapText,
    SettingsText,
    KillerPowerText,
    KillerNameText,
    Fallback,
    HostLifecycle,
}

/// Confidence of a killer guess.
///
/// Tiers are ordered so that a held guess can only be replaced by one that
/// compares greater or equal.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum KillerCertainty {
    BlindGuess = 0,
    Uncertain = 30,
    Certain = 60,
    Confirmed = 90,
}

impl KillerCertainty {
    pub fn value(self) -> u8 {
        self as u8
    }
}

/// Committed killer record: the catalog entry plus how sure we are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KillerState {
    #[serde(flatten)]
    pub entry: KillerEntry,
    pub certainty: KillerCertainty,
}

impl KillerState {
    pub fn new(entry: KillerEntry, certainty: KillerCertainty) -> Self {
        Self { entry, certainty }
    }

    pub fn id(&self) -> KillerId {
        self.entry.id
    }
}

/// The single authoritative game state.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GameState {
    #[serde(rename = "type")]
    pub state_type: GameStateType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map: Option<MapId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub killer: Option<KillerState>,
    /// Soft identity hint that survives clearing of `killer`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub killer_guess: Option<KillerId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_by: Option<DetectionCause>,
}

impl GameState {
    pub fn new(state_type: GameStateType) -> Self {
        Self {
            state_type,
            ..Self::default()
        }
    }

    pub fn is(&self, state_type: GameStateType) -> bool {
        self.state_type == state_type
    }

    pub fn killer_certainty(&self) -> Option<KillerCertainty> {
        self.killer.as_ref().map(|k| k.certainty)
    }
}

/// Partial update proposed by a detector.
///
/// `None` fields mean "no opinion"; [`merge`](super::merge) decides what the
/// next state keeps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StatePatch {
    pub state_type: Option<GameStateType>,
    pub map: Option<MapId>,
    pub killer: Option<KillerState>,
    pub killer_guess: Option<KillerId>,
    pub detected_by: Option<DetectionCause>,
}

impl StatePatch {
    /// Patch that only changes the state type.
    pub fn transition(state_type: GameStateType, cause: DetectionCause) -> Self {
        Self {
            state_type: Some(state_type),
            detected_by: Some(cause),
            ..Self::default()
        }
    }

    pub fn with_map(mut self, map: MapId) -> Self {
        self.map = Some(map);
        self
    }

    pub fn with_killer(mut self, killer: KillerState) -> Self {
        self.killer = Some(killer);
        self
    }

    pub fn with_killer_guess(mut self, killer: KillerId) -> Self {
        self.killer_guess = Some(killer);
        self
    }

    pub fn detected_by(mut self, cause: DetectionCause) -> Self {
        self.detected_by = Some(cause);
        self
    }
}
