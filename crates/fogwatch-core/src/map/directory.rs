//! Map directory collaborator.
//!
//! The list of known maps belongs to the host. The core only queries it
//! through [`MapDirectory`]; [`StaticMapDirectory`] is an in-memory
//! implementation loaded from a JSON listing.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::text::normalize_for_match;

/// Known map files grouped by realm.
pub type MapListing = BTreeMap<String, Vec<String>>;

/// Canonical identifier of a resolved map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapId {
    pub realm: String,
    pub name: String,
    pub file: String,
}

impl MapId {
    pub fn new(realm: impl Into<String>, name: impl Into<String>, file: impl Into<String>) -> Self {
        Self {
            realm: realm.into(),
            name: name.into(),
            file: file.into(),
        }
    }
}

impl fmt::Display for MapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.realm, self.name)
    }
}

/// Trait for querying the known maps.
pub trait MapDirectory {
    /// All known map files, or `None` while the directory is not loaded.
    fn list_known_map_files(&self) -> Option<&MapListing>;

    /// Resolve a map file name to its canonical identifier.
    fn resolve_by_filename(&self, file: &str) -> Option<MapId>;

    fn normalize_for_match(&self, text: &str) -> String {
        normalize_for_match(text)
    }

    /// Display name of a map file: extension and variant number removed.
    fn base_name(&self, file: &str) -> String {
        base_name(file)
    }
}

/// Strip the extension and a trailing variant number from a map file name.
///
/// `"Mount Ormond Resort 2.webp"` becomes `"Mount Ormond Resort"`.
pub fn base_name(file: &str) -> String {
    let stem = match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    };

    let without_digits = stem.trim_end_matches(|c: char| c.is_ascii_digit());
    let trimmed = without_digits.trim_end_matches([' ', '_', '-']);
    if trimmed.len() < without_digits.len() && !trimmed.is_empty() {
        trimmed.to_string()
    } else {
        stem.trim().to_string()
    }
}

/// In-memory map directory.
#[derive(Debug, Clone, Default)]
pub struct StaticMapDirectory {
    listing: Option<MapListing>,
}

impl StaticMapDirectory {
    /// Directory that has not been loaded yet.
    pub fn unloaded() -> Self {
        Self { listing: None }
    }

    pub fn from_listing(listing: MapListing) -> Self {
        Self {
            listing: Some(listing),
        }
    }

    /// Load a JSON listing of the form `{ "realm": ["file", ...] }`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let listing: MapListing = serde_json::from_str(content)?;
        if listing.values().all(Vec::is_empty) {
            return Err(Error::InvalidMapDirectory(
                "listing contains no map files".to_string(),
            ));
        }
        Ok(Self::from_listing(listing))
    }

    pub fn is_loaded(&self) -> bool {
        self.listing.is_some()
    }

    pub fn len(&self) -> usize {
        self.listing
            .as_ref()
            .map_or(0, |listing| listing.values().map(Vec::len).sum())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MapDirectory for StaticMapDirectory {
    fn list_known_map_files(&self) -> Option<&MapListing> {
        self.listing.as_ref()
    }

    fn resolve_by_filename(&self, file: &str) -> Option<MapId> {
        let listing = self.listing.as_ref()?;
        listing.iter().find_map(|(realm, files)| {
            files
                .iter()
                .find(|f| f.as_str() == file)
                .map(|f| MapId::new(realm.clone(), base_name(f), f.clone()))
        })
    }
}
