//! Replay command implementation.

use std::sync::Arc;

use anyhow::{Context, Result};
use fogwatch_core::{
    Engine, EngineEvent, GameState, GameStateType, KillerCatalog, ManualClock, Settings,
    StaticMapDirectory, read_recording,
};
use owo_colors::Style;
use serde::Serialize;
use tracing::{info, warn};

/// One state change as printed with `--json`.
#[derive(Serialize)]
struct StateLine<'a> {
    at_ms: u64,
    state: &'a GameState,
}

/// Text styles for printed state changes.
#[derive(Debug, Clone, Copy)]
struct Palette {
    emphasis: Style,
    muted: Style,
    menu: Style,
    loading: Style,
    in_match: Style,
    closed: Style,
    unknown: Style,
}

impl Palette {
    fn colored() -> Self {
        Self {
            emphasis: Style::new().bold(),
            muted: Style::new().dimmed(),
            menu: Style::new().cyan(),
            loading: Style::new().yellow(),
            in_match: Style::new().green(),
            closed: Style::new().red(),
            unknown: Style::new().dimmed(),
        }
    }

    fn plain() -> Self {
        Self {
            emphasis: Style::new(),
            muted: Style::new(),
            menu: Style::new(),
            loading: Style::new(),
            in_match: Style::new(),
            closed: Style::new(),
            unknown: Style::new(),
        }
    }

    fn state_type(&self, state_type: GameStateType) -> Style {
        match state_type {
            GameStateType::Menu => self.menu,
            GameStateType::Loading => self.loading,
            GameStateType::Match => self.in_match,
            GameStateType::Closed => self.closed,
            GameStateType::Unknown => self.unknown,
        }
    }
}

/// Run the replay command
pub fn run(
    snapshots: &str,
    maps: Option<&str>,
    settings: Settings,
    json: bool,
    color: bool,
) -> Result<()> {
    let cycles = read_recording(snapshots)
        .with_context(|| format!("Failed to read recording {}", snapshots))?;
    info!("Loaded {} recorded cycles from {}", cycles.len(), snapshots);

    let directory = match maps {
        Some(path) => StaticMapDirectory::load(path)
            .with_context(|| format!("Failed to load map directory {}", path))?,
        None => {
            warn!("No map directory given, map detection will not match");
            StaticMapDirectory::unloaded()
        }
    };

    if !settings.features.smart_features_enabled {
        warn!("Smart features are disabled in settings, every cycle will be skipped");
    }

    let clock = Arc::new(ManualClock::new());
    let mut engine = Engine::new(
        settings,
        KillerCatalog::builtin(),
        directory,
        Arc::clone(&clock),
    );
    let events = engine.subscribe();
    let palette = if color {
        Palette::colored()
    } else {
        Palette::plain()
    };

    let mut changes = 0;
    let mut skipped = 0;
    for cycle in &cycles {
        if cycle.apply(&mut engine, &clock).is_none() {
            skipped += 1;
        }

        for event in events.try_iter() {
            if let EngineEvent::StateChanged(state) = event {
                changes += 1;
                if json {
                    let line = StateLine {
                        at_ms: cycle.at_ms,
                        state: &state,
                    };
                    println!("{}", serde_json::to_string(&line)?);
                } else {
                    println!("{}", format_change(cycle.at_ms, &state, &palette));
                }
            }
        }
    }

    if !json {
        println!();
        println!(
            "{} cycles, {} skipped, {} state changes, final state {}",
            cycles.len(),
            skipped,
            changes,
            engine.state().state_type
        );
    }
    Ok(())
}

fn format_change(at_ms: u64, state: &GameState, palette: &Palette) -> String {
    let name = format!("{:<7}", state.state_type.to_string());
    let mut line = format!(
        "{:>8.3}s  {}",
        at_ms as f64 / 1000.0,
        palette.state_type(state.state_type).style(name)
    );
    if let Some(cause) = state.detected_by {
        line.push_str(&format!("  by {}", palette.muted.style(cause)));
    }
    if let Some(map) = &state.map {
        line.push_str(&format!("  map {}", palette.emphasis.style(map)));
    }
    if let Some(killer) = &state.killer {
        line.push_str(&format!(
            "  killer {} [{}]",
            palette.emphasis.style(killer.id()),
            killer.certainty
        ));
    } else if let Some(guess) = state.killer_guess {
        line.push_str(&format!("  guess {}", guess));
    }
    line
}
