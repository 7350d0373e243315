//! # fogwatch-core
//!
//! Game state inference for the fogwatch overlay.
//!
//! This crate provides:
//! - Text similarity scoring for noisy OCR output
//! - Killer identification against a static character catalog
//! - Map identification against a map directory, with hysteresis
//! - The authoritative `GameState` and its state machine
//! - A region evaluation pipeline that turns captured frames into state updates
//! - A throttled detection loop gated by the host game lifecycle
//!
//! Screen capture, OCR and rendering are provided by the host through the
//! traits in [`pipeline`], [`map`] and [`host`].

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod host;
pub mod killer;
pub mod map;
pub mod pipeline;
pub mod replay;
pub mod state;
pub mod text;

// Re-export from clock module
pub use clock::{Clock, ManualClock, SystemClock};

// Re-export from config module
pub use config::{DebugSettings, FeatureFlags, Settings};

// Re-export from engine module
pub use engine::{CycleGate, CycleGuard, DetectionLoop, Engine, Refusal, TickOutcome};

// Re-export from error module
pub use error::{Error, Result};

// Re-export from events module
pub use events::{CycleReport, EngineEvent, EventBus};

// Re-export from host module
pub use host::{GameInfo, HostMonitor};

// Re-export from killer module
pub use killer::{
    AttackButton, KillerCatalog, KillerEntry, KillerGuess, KillerId, KillerIdentifier, StartHint,
};

// Re-export from map module
pub use map::{MapDirectory, MapGuess, MapId, MapIdentifier, MapListing, MapMatch, StaticMapDirectory};

// Re-export from pipeline module
pub use pipeline::{
    Check, Decision, FrameSource, OcrRegion, OcrResult, PixelFrame, PureBlackResult,
    PureBlackSpec, Rect, RegionId, RegionResult, RegionSnapshot, RgbFrame, ScanArea,
};

// Re-export from replay module
pub use replay::{RecordedCycle, parse_recording, read_recording};

// Re-export from state module
pub use state::{
    DetectionCause, GameState, GameStateMachine, GameStateType, KillerCertainty, KillerState,
    StatePatch, merge,
};

// Re-export from text module
pub use text::{normalize_for_match, similarity, similarity_normalized, words};
