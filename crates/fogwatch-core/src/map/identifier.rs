use std::time::Instant;

use tracing::debug;

use crate::config::{thresholds, timing};
use crate::map::{MapDirectory, MapId};
use crate::text::similarity_normalized;

/// An accepted map guess, remembered for hysteresis.
#[derive(Debug, Clone, PartialEq)]
pub struct MapGuess {
    pub at: Instant,
    pub map_file: String,
    /// Normalized OCR text that produced the guess.
    pub matched_text: String,
    pub score: f64,
}

impl MapGuess {
    /// Whether this guess must be rejected in favor of a recent `previous` one.
    ///
    /// Inside the hysteresis window a guess loses when it scores strictly worse
    /// or was read from shorter text. Map names fade in and out character by
    /// character, so a truncated read can briefly match a different map.
    pub fn loses_to(&self, previous: &MapGuess) -> bool {
        let age = self.at.saturating_duration_since(previous.at);
        if age >= timing::MAP_HYSTERESIS_WINDOW {
            return false;
        }

        self.score < previous.score
            || self.matched_text.chars().count() < previous.matched_text.chars().count()
    }
}

/// A map resolved from text.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMatch {
    pub map: MapId,
    pub map_file: String,
    pub score: f64,
}

/// Resolves OCR text to a known map.
pub struct MapIdentifier<D> {
    directory: D,
    last_guess: Option<MapGuess>,
}

impl<D: MapDirectory> MapIdentifier<D> {
    pub fn new(directory: D) -> Self {
        Self {
            directory,
            last_guess: None,
        }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn last_guess(&self) -> Option<&MapGuess> {
        self.last_guess.as_ref()
    }

    /// Resolve `candidate` to the best matching known map.
    ///
    /// Returns `None` when the directory is not loaded, no map scores at least
    /// [`thresholds::MAP_ACCEPT_SCORE`], the guess loses to a recent better one,
    /// or the directory cannot resolve the file.
    pub fn resolve(&mut self, candidate: &str, now: Instant) -> Option<MapMatch> {
        let Some(listing) = self.directory.list_known_map_files() else {
            debug!("Map directory not loaded, skipping map guess");
            return None;
        };

        let needle = self.directory.normalize_for_match(candidate);
        if needle.is_empty() {
            return None;
        }
        let needle_len = needle.chars().count();

        let mut best: Option<(&str, f64)> = None;
        for file in listing.values().flatten() {
            let name = self
                .directory
                .normalize_for_match(&self.directory.base_name(file));
            let score = if name.chars().count().abs_diff(needle_len)
                > thresholds::MAP_LENGTH_PREFILTER
            {
                0.0
            } else {
                similarity_normalized(&name, &needle)
            };

            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((file.as_str(), score));
            }
        }

        let (file, score) = best?;
        if score < thresholds::MAP_ACCEPT_SCORE {
            return None;
        }
        debug!("Best map match for {:?}: {} ({:.3})", candidate, file, score);

        let guess = MapGuess {
            at: now,
            map_file: file.to_string(),
            matched_text: needle,
            score,
        };

        if let Some(previous) = &self.last_guess {
            if guess.loses_to(previous) {
                debug!(
                    "Rejected map guess {} ({:.3}), keeping {} ({:.3})",
                    guess.map_file, guess.score, previous.map_file, previous.score
                );
                return None;
            }
        }

        let map = self.directory.resolve_by_filename(&guess.map_file)?;
        let map_file = guess.map_file.clone();
        self.last_guess = Some(guess);

        Some(MapMatch {
            map,
            map_file,
            score,
        })
    }
}
