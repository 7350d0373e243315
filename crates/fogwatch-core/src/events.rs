//! Outbound notifications.
//!
//! Subscribers receive every accepted state change plus the diagnostic
//! stream (raw region results, the detector that fired, cycle timing).

use chrono::{DateTime, Utc};
use crossbeam_channel::{Receiver, Sender, unbounded};
use serde::Serialize;
use tracing::debug;

use crate::pipeline::{Decision, RegionSnapshot};
use crate::state::GameState;

/// Event published by the engine.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum EngineEvent {
    /// Emitted once per structurally distinct committed state.
    StateChanged(GameState),
    /// Accumulated region results after a capture stage.
    RegionResults(RegionSnapshot),
    /// The detector that classified the current cycle.
    Decision(Decision),
    CycleCompleted(CycleReport),
}

/// Summary of one detection cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
}

/// Fan-out of engine events to any number of subscribers.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<EngineEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<EngineEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    /// Send `event` to every subscriber, dropping the ones that hung up.
    pub fn emit(&mut self, event: EngineEvent) {
        let before = self.subscribers.len();
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());

        let dropped = before - self.subscribers.len();
        if dropped > 0 {
            debug!("Dropped {} disconnected subscriber(s)", dropped);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameStateType;

    #[test]
    fn test_emit_reaches_all_subscribers() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.emit(EngineEvent::Decision(Decision::Map));

        assert!(matches!(a.try_recv(), Ok(EngineEvent::Decision(Decision::Map))));
        assert!(matches!(b.try_recv(), Ok(EngineEvent::Decision(Decision::Map))));
    }

    #[test]
    fn test_disconnected_subscriber_is_pruned() {
        let mut bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());
        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(EngineEvent::StateChanged(GameState::new(GameStateType::Menu)));

        assert_eq!(bus.subscriber_count(), 1);
        assert!(kept.try_recv().is_ok());
    }

    #[test]
    fn test_event_json_shape() {
        let event = EngineEvent::StateChanged(GameState::new(GameStateType::Loading));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "state-changed");
        assert_eq!(json["data"]["type"], "LOADING");
    }
}
