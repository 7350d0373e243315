//! Recorded region results.
//!
//! A recording is a JSON-lines file with one detection cycle per line:
//!
//! ```json
//! {"at_ms": 1500, "running": true, "focused": true, "regions": {"main-menu": {"type": "ocr", "text": ["PLAY"]}}}
//! ```
//!
//! Replaying a recording drives an [`Engine`] on a [`ManualClock`] without a
//! screen or OCR backend.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, ManualClock};
use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::events::CycleReport;
use crate::host::GameInfo;
use crate::map::MapDirectory;
use crate::pipeline::RegionSnapshot;

fn default_true() -> bool {
    true
}

/// One recorded cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedCycle {
    /// Milliseconds since the start of the recording.
    pub at_ms: u64,
    #[serde(default = "default_true")]
    pub running: bool,
    #[serde(default = "default_true")]
    pub focused: bool,
    #[serde(default)]
    pub regions: RegionSnapshot,
}

impl RecordedCycle {
    pub fn game_info(&self) -> GameInfo {
        GameInfo::new(self.running, self.focused)
    }

    /// Feed this cycle to `engine`, whose clock is `clock`.
    ///
    /// The same gating as the live loop applies; returns `None` when the
    /// cycle was skipped.
    pub fn apply<D, C>(&self, engine: &mut Engine<D, C>, clock: &ManualClock) -> Option<CycleReport>
    where
        D: MapDirectory,
        C: Clock,
    {
        clock.set_offset(Duration::from_millis(self.at_ms));
        engine.on_game_info(self.game_info());

        let skip = !engine.settings().features.smart_features_enabled
            || !self.game_info().is_active()
            || engine.is_paused();
        if skip {
            return None;
        }

        Some(engine.evaluate_snapshot(&self.regions))
    }
}

/// Parse a recording. Blank lines are ignored.
pub fn parse_recording(content: &str) -> Result<Vec<RecordedCycle>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            serde_json::from_str(line).map_err(|e| Error::InvalidRecording {
                line: index + 1,
                message: e.to_string(),
            })
        })
        .collect()
}

pub fn read_recording<P: AsRef<Path>>(path: P) -> Result<Vec<RecordedCycle>> {
    let content = fs::read_to_string(path)?;
    parse_recording(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{OcrResult, PureBlackResult, RegionId};
    use std::io::Write;

    const RECORDING: &str = r#"
{"at_ms": 0, "regions": {"main-menu": {"type": "ocr", "text": ["PLAY", "RIFT", "STORE"]}}}

{"at_ms": 1000, "running": true, "focused": false, "regions": {}}
{"at_ms": 2000, "regions": {"loading-screen": {"type": "pure-black", "passed": true}}}
"#;

    #[test]
    fn test_parse_recording() {
        let cycles = parse_recording(RECORDING).unwrap();
        assert_eq!(cycles.len(), 3);

        assert_eq!(cycles[0].at_ms, 0);
        assert!(cycles[0].running && cycles[0].focused);
        assert_eq!(
            cycles[0].regions.ocr(RegionId::MainMenu),
            Some(&OcrResult::new(["PLAY", "RIFT", "STORE"]))
        );

        assert!(!cycles[1].game_info().is_active());
        assert_eq!(
            cycles[2].regions.pure_black(RegionId::LoadingScreen),
            Some(&PureBlackResult {
                passed: true,
                ratio: 0.0
            })
        );
    }

    #[test]
    fn test_invalid_line_reports_line_number() {
        let content = "{\"at_ms\": 0}\n\n{\"at_ms\": \"soon\"}\n";
        match parse_recording(content) {
            Err(Error::InvalidRecording { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_unknown_region_rejected() {
        let content = r#"{"at_ms": 0, "regions": {"minimap": {"type": "ocr", "text": []}}}"#;
        assert!(parse_recording(content).is_err());
    }

    #[test]
    fn test_read_recording_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(RECORDING.as_bytes()).unwrap();

        let cycles = read_recording(file.path()).unwrap();
        assert_eq!(cycles.len(), 3);
        assert!(read_recording("/nonexistent/recording.jsonl").is_err());
    }
}
