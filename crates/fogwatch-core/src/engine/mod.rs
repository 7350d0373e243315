//! Detection engine.
//!
//! This module contains:
//! - `Engine` - the state machine plus settings and a clock, running cycles
//! - `CycleGate` - the single in-flight cycle lock and minimum spacing
//! - `DetectionLoop` - the ticking scheduler with host gating

mod detection_loop;
mod gate;

pub use detection_loop::*;
pub use gate::*;

use std::time::Instant;

use chrono::Utc;
use crossbeam_channel::Receiver;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::config::Settings;
use crate::events::{CycleReport, EngineEvent};
use crate::host::GameInfo;
use crate::killer::KillerCatalog;
use crate::map::MapDirectory;
use crate::pipeline::{
    Check, Decision, FrameSource, RegionSnapshot, STAGES, evaluate, scan_regions,
};
use crate::state::{GameState, GameStateMachine};

/// Game state inference over captured frames.
pub struct Engine<D, C> {
    machine: GameStateMachine<D>,
    settings: Settings,
    clock: C,
}

impl<D: MapDirectory, C: Clock> Engine<D, C> {
    pub fn new(settings: Settings, catalog: KillerCatalog, directory: D, clock: C) -> Self {
        let machine = GameStateMachine::new(settings.features, catalog, directory, clock.now());
        Self {
            machine,
            settings,
            clock,
        }
    }

    pub fn state(&self) -> &GameState {
        self.machine.state()
    }

    pub fn machine(&self) -> &GameStateMachine<D> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut GameStateMachine<D> {
        &mut self.machine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn subscribe(&mut self) -> Receiver<EngineEvent> {
        self.machine.subscribe()
    }

    /// Replace the settings; feature changes apply to the current state at once.
    pub fn update_settings(&mut self, settings: Settings) {
        let features_changed = settings.features != self.settings.features;
        self.settings = settings;
        if features_changed {
            let now = self.clock.now();
            self.machine.update_flags(settings.features, now);
        }
    }

    pub fn on_game_info(&mut self, info: GameInfo) {
        let now = self.clock.now();
        self.machine.on_game_info(info, now);
    }

    /// Whether detection is frozen by the debug break-on setting.
    pub fn is_paused(&self) -> bool {
        self.settings.breaks_on(self.state().state_type)
    }

    /// Evaluate a complete set of region results, then the fallback timer.
    pub fn evaluate_snapshot(&mut self, snapshot: &RegionSnapshot) -> CycleReport {
        let started = self.clock.now();
        let started_at = Utc::now();

        self.machine
            .publish(EngineEvent::RegionResults(snapshot.clone()));
        let decision = evaluate(&mut self.machine, snapshot, &Check::PRIORITY, started)
            .or_else(|| self.fallback(started));

        self.finish(started, started_at, decision)
    }

    /// Capture a frame and run the capture stages until one decides.
    ///
    /// A failed capture ends the cycle without touching the state.
    pub fn run_cycle<S: FrameSource>(&mut self, source: &S) -> CycleReport {
        let started = self.clock.now();
        let started_at = Utc::now();

        let frame = match source.capture_frame() {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Frame capture failed: {}", e);
                return self.finish(started, started_at, None);
            }
        };

        let mut snapshot = RegionSnapshot::new();
        let mut decision = None;
        for stage in STAGES {
            snapshot.extend(scan_regions(source, &frame, stage.regions));
            self.machine
                .publish(EngineEvent::RegionResults(snapshot.clone()));

            let now = self.clock.now();
            decision = evaluate(&mut self.machine, &snapshot, stage.checks, now);
            if decision.is_some() {
                break;
            }
        }

        let decision = decision.or_else(|| {
            let now = self.clock.now();
            self.fallback(now)
        });
        self.finish(started, started_at, decision)
    }

    fn fallback(&mut self, now: Instant) -> Option<Decision> {
        self.machine
            .assume_in_match(now)
            .then_some(Decision::Fallback)
    }

    fn finish(
        &mut self,
        started: Instant,
        started_at: chrono::DateTime<Utc>,
        decision: Option<Decision>,
    ) -> CycleReport {
        if let Some(decision) = decision {
            self.machine.publish(EngineEvent::Decision(decision));
        }

        let elapsed = self.clock.now().saturating_duration_since(started);
        debug!(
            "Cycle finished in {}ms ({})",
            elapsed.as_millis(),
            decision.map_or("no decision", |d| d.into())
        );

        let report = CycleReport {
            started_at,
            elapsed_ms: elapsed.as_millis() as u64,
            decision,
        };
        self.machine
            .publish(EngineEvent::CycleCompleted(report.clone()));
        report
    }
}
