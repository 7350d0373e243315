use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use tracing::{debug, info};

use crate::clock::Clock;
use crate::config::timing;
use crate::engine::{CycleGate, Engine, Refusal};
use crate::events::CycleReport;
use crate::host::HostMonitor;
use crate::map::MapDirectory;
use crate::pipeline::FrameSource;

/// What a scheduler tick did.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Smart features are off.
    Disabled,
    /// The game is not running or not focused.
    Inactive,
    /// Detection is frozen by the debug break-on setting.
    Paused,
    Busy,
    Throttled,
    Completed(CycleReport),
}

/// Fixed-period scheduler driving an [`Engine`].
///
/// Every tick reads the host state first, so `Closed`/`Unknown` transitions
/// happen even while sampling is gated off.
pub struct DetectionLoop<D, C, S, H> {
    engine: Engine<D, C>,
    source: S,
    host: H,
    gate: CycleGate,
}

impl<D, C, S, H> DetectionLoop<D, C, S, H>
where
    D: MapDirectory,
    C: Clock,
    S: FrameSource,
    H: HostMonitor,
{
    pub fn new(engine: Engine<D, C>, source: S, host: H) -> Self {
        Self {
            engine,
            source,
            host,
            gate: CycleGate::default(),
        }
    }

    pub fn engine(&self) -> &Engine<D, C> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine<D, C> {
        &mut self.engine
    }

    pub fn gate(&self) -> &CycleGate {
        &self.gate
    }

    /// Run one scheduler tick.
    pub fn tick(&mut self) -> TickOutcome {
        let info = self.host.game_info().unwrap_or_default();
        self.engine.on_game_info(info);

        if !self.engine.settings().features.smart_features_enabled {
            return TickOutcome::Disabled;
        }
        if !info.is_active() {
            return TickOutcome::Inactive;
        }
        if self.engine.is_paused() {
            return TickOutcome::Paused;
        }

        let guard = match self.gate.try_begin(self.engine.clock().now()) {
            Ok(guard) => guard,
            Err(Refusal::Busy) => return TickOutcome::Busy,
            Err(Refusal::Throttled) => return TickOutcome::Throttled,
        };

        let report = self.engine.run_cycle(&self.source);
        guard.finish(self.engine.clock().now());
        TickOutcome::Completed(report)
    }

    /// Tick every [`timing::TICK_INTERVAL`] until `shutdown_requested` is set.
    pub fn run(&mut self, shutdown_requested: &AtomicBool) {
        info!("Detection loop started");

        loop {
            if shutdown_requested.load(Ordering::SeqCst) {
                debug!("Shutdown signal received, exiting detection loop");
                break;
            }

            if let TickOutcome::Completed(report) = self.tick() {
                if let Some(decision) = report.decision {
                    debug!("Cycle decided by {} in {}ms", decision, report.elapsed_ms);
                }
            }

            thread::sleep(timing::TICK_INTERVAL);
        }

        info!("Detection loop stopped");
    }
}
