use tracing::debug;

use crate::config::thresholds;
use crate::killer::{KillerCatalog, KillerEntry, KillerId};
use crate::state::KillerCertainty;
use crate::text::normalize_for_match;

/// A killer proposed by the identifier, before the certainty ladder is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KillerGuess {
    pub entry: KillerEntry,
    pub certainty: KillerCertainty,
}

impl KillerGuess {
    fn new(entry: &KillerEntry, certainty: KillerCertainty) -> Self {
        Self {
            entry: *entry,
            certainty,
        }
    }
}

/// Matches recognized text against the killer catalog.
///
/// Labels match whole OCR lines after normalization, so `LAUNCH` does not
/// match a `LAUNCH BIOPOD` prompt.
#[derive(Debug, Clone, Default)]
pub struct KillerIdentifier {
    catalog: KillerCatalog,
}

impl KillerIdentifier {
    pub fn new(catalog: KillerCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &KillerCatalog {
        &self.catalog
    }

    /// Identify the killer from in-match power prompts.
    ///
    /// 1. A soft guess confirmed by one of its confirmation labels is `Confirmed`.
    /// 2. A single power label hit is `Certain`, or `Confirmed` when it names the
    ///    killer already held or guessed. Several hits are `Uncertain` and the
    ///    first entry in catalog order wins.
    /// 3. Confirmation labels alone give a `BlindGuess`.
    pub fn identify_by_power<S: AsRef<str>>(
        &self,
        lines: &[S],
        soft_guess: Option<KillerId>,
        held: Option<KillerId>,
    ) -> Option<KillerGuess> {
        let lines = normalized_lines(lines);
        if lines.is_empty() {
            return None;
        }

        if let Some(entry) = soft_guess.and_then(|id| self.catalog.get(id)) {
            if labels_match(entry.confirm_labels, &lines) {
                debug!("Confirmed soft guess {} by confirmation label", entry.id);
                return Some(KillerGuess::new(entry, KillerCertainty::Confirmed));
            }
        }

        let power_hits: Vec<&KillerEntry> = self
            .catalog
            .iter()
            .filter(|entry| labels_match(entry.power_labels, &lines))
            .collect();

        match power_hits.as_slice() {
            [] => {}
            [entry] => {
                let known = Some(entry.id) == held || Some(entry.id) == soft_guess;
                let certainty = if known {
                    KillerCertainty::Confirmed
                } else {
                    KillerCertainty::Certain
                };
                return Some(KillerGuess::new(entry, certainty));
            }
            [first, rest @ ..] => {
                debug!(
                    "Ambiguous power label: {} and {} other(s), picking {}",
                    first.id,
                    rest.len(),
                    first.id
                );
                return Some(KillerGuess::new(first, KillerCertainty::Uncertain));
            }
        }

        self.catalog
            .iter()
            .find(|entry| labels_match(entry.confirm_labels, &lines))
            .map(|entry| KillerGuess::new(entry, KillerCertainty::BlindGuess))
    }

    /// Identify the killer from a character name shown in menus.
    ///
    /// A line cut off with an ellipsis matches any alias that contains, or is
    /// contained in, the text before the ellipsis.
    pub fn identify_by_name<S: AsRef<str>>(&self, lines: &[S]) -> Option<&KillerEntry> {
        for line in lines {
            let line = line.as_ref();
            let found = match truncated_prefix(line) {
                Some(prefix) => self.find_by_prefix(&prefix),
                None => self.find_by_full_name(&normalize_for_match(line)),
            };
            if found.is_some() {
                return found;
            }
        }
        None
    }

    fn find_by_full_name(&self, name: &str) -> Option<&KillerEntry> {
        if name.is_empty() {
            return None;
        }
        self.catalog.iter().find(|entry| {
            entry
                .names
                .iter()
                .any(|alias| normalize_for_match(alias) == name)
        })
    }

    fn find_by_prefix(&self, prefix: &str) -> Option<&KillerEntry> {
        self.catalog.iter().find(|entry| {
            entry.names.iter().any(|alias| {
                let alias = normalize_for_match(alias);
                alias.contains(prefix) || prefix.contains(alias.as_str())
            })
        })
    }
}

fn normalized_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    lines
        .iter()
        .map(|line| normalize_for_match(line.as_ref()))
        .filter(|line| !line.is_empty())
        .collect()
}

fn labels_match(labels: &[&str], lines: &[String]) -> bool {
    labels
        .iter()
        .map(|label| normalize_for_match(label))
        .any(|label| lines.contains(&label))
}

/// Normalized text before an ellipsis, if the line was truncated.
fn truncated_prefix(line: &str) -> Option<String> {
    let cut = line.find("...").or_else(|| line.find('…'))?;
    let prefix = normalize_for_match(&line[..cut]);
    (prefix.chars().count() >= thresholds::TRUNCATED_NAME_MIN).then_some(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builtin() -> KillerIdentifier {
        KillerIdentifier::new(KillerCatalog::builtin())
    }

    #[test]
    fn test_unique_power_label_is_certain() {
        let guess = builtin()
            .identify_by_power(&["THROW HATCHET"], None, None)
            .unwrap();
        assert_eq!(guess.entry.id, KillerId::Huntress);
        assert_eq!(guess.certainty, KillerCertainty::Certain);
    }

    #[test]
    fn test_power_label_matching_held_killer_is_confirmed() {
        let guess = builtin()
            .identify_by_power(&["blink"], None, Some(KillerId::Nurse))
            .unwrap();
        assert_eq!(guess.entry.id, KillerId::Nurse);
        assert_eq!(guess.certainty, KillerCertainty::Confirmed);
    }

    #[test]
    fn test_power_label_matching_soft_guess_is_confirmed() {
        let guess = builtin()
            .identify_by_power(&["SET TRAP"], Some(KillerId::Trapper), None)
            .unwrap();
        assert_eq!(guess.certainty, KillerCertainty::Confirmed);
    }

    #[test]
    fn test_soft_guess_confirmed_by_confirmation_label() {
        let guess = builtin()
            .identify_by_power(&["USE CHAINSAW"], Some(KillerId::Cannibal), None)
            .unwrap();
        assert_eq!(guess.entry.id, KillerId::Cannibal);
        assert_eq!(guess.certainty, KillerCertainty::Confirmed);
    }

    #[test]
    fn test_ambiguous_power_label_picks_first_in_catalog() {
        // CHARGE POUNCE belongs to both the Twins and the Dark Lord
        let guess = builtin()
            .identify_by_power(&["CHARGE POUNCE"], None, None)
            .unwrap();
        assert_eq!(guess.entry.id, KillerId::Twins);
        assert_eq!(guess.certainty, KillerCertainty::Uncertain);
    }

    #[test]
    fn test_confirmation_label_alone_is_blind_guess() {
        // USE CHAINSAW is shared by the Hillbilly and the Cannibal
        let guess = builtin()
            .identify_by_power(&["USE CHAINSAW"], None, None)
            .unwrap();
        assert_eq!(guess.entry.id, KillerId::Hillbilly);
        assert_eq!(guess.certainty, KillerCertainty::BlindGuess);
    }

    #[test]
    fn test_power_labels_match_whole_lines() {
        let guess = builtin()
            .identify_by_power(&["LAUNCH BIOPOD"], None, None)
            .unwrap();
        assert_eq!(guess.entry.id, KillerId::Singularity);
        assert_eq!(guess.certainty, KillerCertainty::Certain);
    }

    #[test]
    fn test_punctuation_is_ignored() {
        let guess = builtin()
            .identify_by_power(&["(HOLD) AMBUSH"], None, None)
            .unwrap();
        assert_eq!(guess.entry.id, KillerId::Pig);

        let guess = builtin()
            .identify_by_power(&["HOLD AMBUSH"], None, None)
            .unwrap();
        assert_eq!(guess.entry.id, KillerId::Pig);
    }

    #[test]
    fn test_no_match() {
        let identifier = builtin();
        assert!(identifier.identify_by_power(&["REPAIR"], None, None).is_none());
        assert!(identifier.identify_by_power::<&str>(&[], None, None).is_none());
    }

    #[test]
    fn test_identify_by_name() {
        let identifier = builtin();
        let entry = identifier.identify_by_name(&["THE NURSE"]).unwrap();
        assert_eq!(entry.id, KillerId::Nurse);

        let entry = identifier.identify_by_name(&["READY", "Naughty Bear"]).unwrap();
        assert_eq!(entry.id, KillerId::Trapper);

        assert!(identifier.identify_by_name(&["THE SURVIVOR"]).is_none());
    }

    #[test]
    fn test_identify_by_truncated_name() {
        let identifier = builtin();
        let entry = identifier.identify_by_name(&["THE SKULL MER..."]).unwrap();
        assert_eq!(entry.id, KillerId::SkullMerchant);

        let entry = identifier.identify_by_name(&["THE DEATHSL…"]).unwrap();
        assert_eq!(entry.id, KillerId::Deathslinger);
    }

    #[test]
    fn test_truncated_name_needs_enough_text() {
        assert!(builtin().identify_by_name(&["TH..."]).is_none());
    }

    #[test]
    fn test_custom_catalog() {
        let identifier = KillerIdentifier::new(KillerCatalog::new(vec![KillerEntry {
            id: KillerId::Trapper,
            names: &["THE TRAPPER"],
            power_labels: &["SET TRAP"],
            confirm_labels: &[],
            start: None,
        }]));
        assert_eq!(identifier.catalog().len(), 1);
        assert!(identifier.identify_by_power(&["BLINK"], None, None).is_none());
    }
}
