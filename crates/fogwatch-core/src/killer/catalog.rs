use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

/// Playable killer characters.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    IntoStaticStr,
    EnumIter,
    EnumCount,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum KillerId {
    Trapper,
    Wraith,
    Hillbilly,
    Nurse,
    Shape,
    Hag,
    Doctor,
    Cannibal,
    Huntress,
    Nightmare,
    Pig,
    Clown,
    Spirit,
    Legion,
    Plague,
    GhostFace,
    Demogorgon,
    Oni,
    Deathslinger,
    Executioner,
    Blight,
    Twins,
    Trickster,
    Nemesis,
    Cenobite,
    Artist,
    Onryo,
    Dredge,
    Mastermind,
    Knight,
    SkullMerchant,
    Singularity,
    Xenomorph,
    GoodGuy,
    Unknown,
    Lich,
    DarkLord,
    Houndmaster,
    Ghoul,
    Animatronic,
    Krasue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum AttackButton {
    M1,
    M2,
}

/// How the killer's power is started, shown to the player at match start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StartHint {
    pub button: AttackButton,
    pub label: &'static str,
}

/// One killer and the texts that identify it.
///
/// - `names`: character name and skin aliases shown in menus
/// - `power_labels`: in-match power prompts unique to this killer
/// - `confirm_labels`: prompts shared with other killers; they only confirm
///   an existing guess or serve as a last resort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct KillerEntry {
    pub id: KillerId,
    pub names: &'static [&'static str],
    pub power_labels: &'static [&'static str],
    pub confirm_labels: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<StartHint>,
}

/// Immutable killer catalog, searched in order.
#[derive(Debug, Clone)]
pub struct KillerCatalog {
    entries: Vec<KillerEntry>,
}

impl KillerCatalog {
    pub fn new(entries: Vec<KillerEntry>) -> Self {
        Self { entries }
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Self {
        Self::new(BUILTIN_KILLERS.to_vec())
    }

    pub fn get(&self, id: KillerId) -> Option<&KillerEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &KillerEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for KillerCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

static BUILTIN_KILLERS: &[KillerEntry] = &[
    KillerEntry {
        id: KillerId::Trapper,
        names: &["THE TRAPPER", "NAUGHTY BEAR"],
        power_labels: &["SET TRAP"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Wraith,
        names: &["THE WRAITH"],
        power_labels: &["CLOAK", "UNCLOAK"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Hillbilly,
        names: &["THE HILLBILLY"],
        power_labels: &[],
        confirm_labels: &["USE CHAINSAW"],
        start: None,
    },
    KillerEntry {
        id: KillerId::Nurse,
        names: &["THE NURSE"],
        power_labels: &["BLINK"],
        confirm_labels: &[],
        start: Some(StartHint { button: AttackButton::M2, label: "BLINK (M2)" }),
    },
    KillerEntry {
        id: KillerId::Shape,
        names: &["THE SHAPE"],
        power_labels: &["PURSUER MODE", "STALKER MODE", "CHARGE SLAUGHTERING STRIKE"],
        confirm_labels: &["STALK"],
        start: None,
    },
    KillerEntry {
        id: KillerId::Hag,
        names: &["THE HAG"],
        power_labels: &["PLACE TRAP"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Doctor,
        names: &["THE DOCTOR", "PHARAOH EDDIE", "THE LOOK-SEE"],
        power_labels: &["STATIC BLAST", "SHOCK THERAPY"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Cannibal,
        names: &["THE CANNIBAL"],
        power_labels: &["EXTEND CHAINSAW SWEEP"],
        confirm_labels: &["USE CHAINSAW"],
        start: None,
    },
    KillerEntry {
        id: KillerId::Huntress,
        names: &["THE HUNTRESS", "THE MORDEO", "WERE-ELK"],
        power_labels: &["THROW HATCHET"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Nightmare,
        names: &["THE NIGHTMARE"],
        power_labels: &["SWITCH TO SNARE", "SWITCH TO PALLET", "CHARGE DREAM SNARE", "PALLET FOCUS"],
        confirm_labels: &["TELEPORT"],
        start: None,
    },
    KillerEntry {
        id: KillerId::Pig,
        names: &["THE PIG"],
        power_labels: &["(HOLD) AMBUSH"],
        confirm_labels: &["CROUCH", "STAND UP"],
        start: None,
    },
    KillerEntry {
        id: KillerId::Clown,
        names: &["THE CLOWN"],
        power_labels: &["THROW BOTTLE"],
        confirm_labels: &["SWAP (TAP)", "RELOAD(HOLD)"],
        start: None,
    },
    KillerEntry {
        id: KillerId::Spirit,
        names: &["THE SPIRIT", "TOMIE"],
        power_labels: &["PHASE WALK"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Legion,
        names: &["THE LEGION", "HUNK"],
        power_labels: &["FRENZY", "END FRENZY"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Plague,
        names: &["THE PLAGUE"],
        power_labels: &["VILE PURGE", "CORRUPT PURGE"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::GhostFace,
        names: &["THE GHOST FACE"],
        power_labels: &["STEALTH MODE"],
        confirm_labels: &["STALK", "LEAN AND STALK"],
        start: None,
    },
    KillerEntry {
        id: KillerId::Demogorgon,
        names: &["THE DEMOGORGON"],
        power_labels: &["CHANNEL ABYSS", "OPEN PORTAL"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Oni,
        names: &["THE ONI", "MURDEROUS GRIZZLY", "SAMURAI EDDIE"],
        power_labels: &["ABSORB", "BLOOD FURY", "DEMON DASH", "DEMON STRIKE"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Deathslinger,
        names: &["THE DEATHSLINGER", "STRANGER EDDIE"],
        power_labels: &["AIM DOWN SIGHTS"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Executioner,
        names: &["THE EXECUTIONER"],
        power_labels: &["RITES OF JUDGMENT"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Blight,
        names: &["THE BLIGHT", "WILLIAM BURKIN"],
        power_labels: &["RUSH"],
        confirm_labels: &[],
        start: Some(StartHint { button: AttackButton::M2, label: "RUSH (M2)" }),
    },
    KillerEntry {
        id: KillerId::Twins,
        names: &["THE TWINS"],
        power_labels: &["UNBIND VICTOR", "CONTROL CHARLOTTE", "CHARGE POUNCE"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Trickster,
        names: &["THE TRICKSTER"],
        power_labels: &["AIM BLADE", "MAIN EVENT"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Nemesis,
        names: &["THE NEMESIS"],
        power_labels: &["CHARGE TENTACLE STRIKE"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Cenobite,
        names: &["THE CENOBITE", "CHATTERER"],
        power_labels: &["CREATE GATEWAY", "CLOSE GATEWAY"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Artist,
        names: &["THE ARTIST", "BOULET ARTIST", "MISS FUCHI", "THE LESHEN"],
        power_labels: &["LAUNCH", "BIRDS OF TORMENT"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Onryo,
        names: &["THE ONRYO"],
        power_labels: &["MANIFEST", "DEMANIFEST"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Dredge,
        names: &["THE DREDGE", "EDDIE'S TRIBUTE"],
        power_labels: &["CHARGE TELEPORT", "RETURN TO REMNANT"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Mastermind,
        names: &["THE MASTERMIND"],
        power_labels: &["CHARGE BOUND", "TRIGGER BOUND"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Knight,
        names: &["THE KNIGHT"],
        power_labels: &["SUMMON GUARD"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::SkullMerchant,
        names: &["THE SKULL MERCHANT"],
        power_labels: &["DEPLOY DRONE", "INSPECT RADAR"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Singularity,
        names: &["THE SINGULARITY"],
        power_labels: &["CHARGE BIOPOD", "LAUNCH BIOPOD"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Xenomorph,
        names: &["THE XENOMORPH", "XENOMORPH QUEEN"],
        power_labels: &["TAIL ATTACK", "HIGHLIGHT CONTROL STATION"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::GoodGuy,
        names: &["THE GOOD GUY", "THE GOOD GAL"],
        power_labels: &["ENTER HIDEY", "EXIT HIDEY", "SLICE & DICE"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Unknown,
        names: &["THE UNKNOWN"],
        power_labels: &["CHARGE UVX"],
        confirm_labels: &["TELEPORT"],
        start: None,
    },
    KillerEntry {
        id: KillerId::Lich,
        names: &["THE LICH"],
        power_labels: &["VILE DARKNESS", "CAST FLY", "CAST FLIGHT OF THE DAMNED", "CAST DISPELLING SPHERE", "CAST MAGE HAND"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::DarkLord,
        names: &["THE DARK LORD", "TRUE FORM"],
        power_labels: &["SHAPESHIFT", "CHARGE HELLFIRE", "CHARGE POUNCE"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Houndmaster,
        names: &["THE HOUNDMASTER", "ULTIMATE HOUNDMASTER"],
        power_labels: &["SWITCH COMMAND", "CHASE", "CHASE COMMAND", "REDIRECT CHASE", "SEARCH COMMAND"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Ghoul,
        names: &["THE GHOUL"],
        power_labels: &["CHARGE KAGUNE LEAP"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Animatronic,
        names: &["THE ANIMATRONIC"],
        power_labels: &["READY AIM", "THROW AXE"],
        confirm_labels: &[],
        start: None,
    },
    KillerEntry {
        id: KillerId::Krasue,
        names: &["THE KRASUE"],
        power_labels: &["CHARGE REGURGITATE", "HEAD FORM", "HEADLONG FLIGHT", "BODY FORM"],
        confirm_labels: &[],
        start: None,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;

    #[test]
    fn test_builtin_covers_every_killer_once() {
        let catalog = KillerCatalog::builtin();
        assert_eq!(catalog.len(), KillerId::COUNT);

        let ids: HashSet<KillerId> = catalog.iter().map(|e| e.id).collect();
        for id in KillerId::iter() {
            assert!(ids.contains(&id), "missing {id}");
        }
    }

    #[test]
    fn test_every_entry_has_a_name() {
        for entry in KillerCatalog::builtin().iter() {
            assert!(!entry.names.is_empty(), "{} has no names", entry.id);
            assert!(
                !entry.power_labels.is_empty() || !entry.confirm_labels.is_empty(),
                "{} has no labels",
                entry.id
            );
        }
    }

    #[test]
    fn test_start_hints() {
        let catalog = KillerCatalog::builtin();
        let nurse = catalog.get(KillerId::Nurse).unwrap();
        assert_eq!(
            nurse.start,
            Some(StartHint {
                button: AttackButton::M2,
                label: "BLINK (M2)"
            })
        );
        assert!(catalog.get(KillerId::Trapper).unwrap().start.is_none());
    }

    #[test]
    fn test_display_id() {
        assert_eq!(KillerId::SkullMerchant.to_string(), "SKULL_MERCHANT");
        assert_eq!(KillerId::GhostFace.to_string(), "GHOST_FACE");
    }
}
