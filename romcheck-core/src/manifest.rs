use crate::error::{ManifestError, VerifyError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// One expected file from a DAT manifest.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub name: String,
    /// Lowercase hex SHA-256.
    pub expected_digest: String,
    /// Name of the game the rom belongs to, empty when the DAT has none.
    pub container_name: String,
    /// Informational only; classification is decided by the digest.
    pub expected_size: u64,
}

/// Lookup table from rom file name to its manifest entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ManifestIndex {
    entries: HashMap<String, ManifestEntry>,
}

impl ManifestIndex {
    /// Parse a DAT document held in memory.
    pub fn from_xml(xml: &str) -> Result<Self, ManifestError> {
        let opts = roxmltree::ParsingOptions { allow_dtd: true, ..Default::default() };
        let doc = roxmltree::Document::parse_with_options(xml, opts)?;
        let root = doc.root_element();

        let mut index = ManifestIndex::default();
        let games = root.descendants().filter(|n| *n != root && n.has_tag_name("game"));
        for game in games {
            let Some(rom) = game.children().find(|n| n.has_tag_name("rom")) else {
                continue;
            };
            let Some(name) = rom.attribute("name").filter(|s| !s.is_empty()) else {
                continue;
            };
            let digest = rom.attribute("sha256").unwrap_or_default().to_lowercase();
            if digest.is_empty() {
                debug!(rom = name, "skipping rom without sha256");
                continue;
            }
            let expected_size = match rom.attribute("size") {
                None => 0,
                Some(raw) => raw.trim().parse::<u64>().map_err(|_| ManifestError::InvalidSize {
                    rom: name.to_string(),
                    value: raw.to_string(),
                })?,
            };
            index.insert(ManifestEntry {
                name: name.to_string(),
                expected_digest: digest,
                container_name: game.attribute("name").unwrap_or_default().to_string(),
                expected_size,
            });
        }
        Ok(index)
    }

    /// Add an entry, replacing any previous entry with the same name.
    pub fn insert(&mut self, entry: ManifestEntry) {
        if let Some(prev) = self.entries.insert(entry.name.clone(), entry) {
            debug!(rom = %prev.name, "duplicate manifest entry, keeping the last one");
        }
    }

    pub fn get(&self, name: &str) -> Option<&ManifestEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ManifestEntry> {
        self.entries.values()
    }
}

impl FromIterator<ManifestEntry> for ManifestIndex {
    fn from_iter<I: IntoIterator<Item = ManifestEntry>>(iter: I) -> Self {
        let mut index = ManifestIndex::default();
        for entry in iter {
            index.insert(entry);
        }
        index
    }
}

/// Read and parse the DAT file at `path`. Any failure is fatal for the run.
pub fn parse(path: &Path) -> Result<ManifestIndex, VerifyError> {
    let bytes = std::fs::read(path)
        .map_err(|source| VerifyError::ManifestRead { path: path.to_path_buf(), source })?;
    let wrap = |source: ManifestError| VerifyError::ManifestParse { path: path.to_path_buf(), source };
    let xml = String::from_utf8(bytes).map_err(|e| wrap(e.into()))?;
    let index = ManifestIndex::from_xml(&xml).map_err(wrap)?;
    debug!(entries = index.len(), path = %path.display(), "parsed manifest");
    Ok(index)
}
