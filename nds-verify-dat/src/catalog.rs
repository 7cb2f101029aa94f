//! Identify a dump against a No-Intro catalog.
//!
//! The catalog is read-only: it is flattened once into [`CatalogEntry`]
//! values in document order and queried by the decrypted image's SHA-1 and
//! size. When several entries satisfy both, the first one in catalog order
//! wins; duplicates are not reported.

use std::collections::HashMap;

use nds_verify_core::ImageHashes;
use serde::Serialize;

use crate::dat::DatFile;
use crate::error::DatError;

/// One catalog row: a game's identity plus one of its ROM images.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// No-Intro catalog id (empty when the DAT has none)
    pub id: String,
    /// Raw name, `Title (Region)[ (Tag)]`
    pub display_name: String,
    pub serial: Option<String>,
    /// SHA-1 of the decrypted image (lowercase hex)
    pub sha1: String,
    pub size: u64,
}

/// A catalog display name split into its parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecomposedName {
    pub game_name: String,
    /// Region as written in the catalog, not yet checked against the vocabulary
    pub region: String,
    /// Raw content of the third parenthesized group, if any
    pub language_tag: Option<String>,
}

/// A catalog hit for a dump.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogMatch {
    pub entry: CatalogEntry,
    pub name: DecomposedName,
}

/// Split a catalog display name on `" ("`.
///
/// Element 0 is the game name, element 1 the region, element 2 (if any)
/// the language tag. A missing region is an error; a missing language tag
/// is not.
pub fn decompose_name(display_name: &str) -> Result<DecomposedName, DatError> {
    let mut parts = display_name.split(" (");
    let game_name = parts.next().unwrap_or_default().to_string();
    if game_name.is_empty() {
        return Err(DatError::invalid_name(display_name, "empty title"));
    }

    let region = match parts.next() {
        Some(raw) => strip_close(raw).to_string(),
        None => return Err(DatError::invalid_name(display_name, "no region group")),
    };
    if region.is_empty() {
        return Err(DatError::invalid_name(display_name, "empty region group"));
    }

    let language_tag = parts.next().map(|raw| strip_close(raw).to_string());

    Ok(DecomposedName {
        game_name,
        region,
        language_tag,
    })
}

fn strip_close(raw: &str) -> &str {
    raw.strip_suffix(')').unwrap_or(raw)
}

/// An indexed, ordered view of a DAT file.
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    /// SHA-1 → entry positions, in catalog order
    by_sha1: HashMap<String, Vec<usize>>,
}

impl Catalog {
    /// Build a catalog from a parsed DAT file. ROMs without a SHA-1 cannot be
    /// matched and are skipped.
    pub fn from_dat(dat: DatFile) -> Self {
        let mut entries = Vec::new();
        for game in dat.games {
            let id = game.id.unwrap_or_default();
            for rom in game.roms {
                let Some(sha1) = rom.sha1 else {
                    log::debug!("Skipping ROM without SHA-1 in '{}'", game.name);
                    continue;
                };
                entries.push(CatalogEntry {
                    id: id.clone(),
                    display_name: game.name.clone(),
                    serial: rom.serial,
                    sha1,
                    size: rom.size,
                });
            }
        }
        Self::from_entries(entries)
    }

    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        let mut by_sha1: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            by_sha1.entry(entry.sha1.to_lowercase()).or_default().push(i);
        }
        Self { entries, by_sha1 }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry whose SHA-1 and size both equal the decrypted image's.
    pub fn lookup(&self, decrypted: &ImageHashes) -> Option<&CatalogEntry> {
        self.by_sha1
            .get(decrypted.sha1.as_str())?
            .iter()
            .map(|&i| &self.entries[i])
            .find(|entry| entry.size == decrypted.size)
    }

    /// Look up the decrypted image and decompose the matching entry's name.
    ///
    /// A matched entry whose name cannot be decomposed is an error: the
    /// catalog is authoritative, so its data is never half-used.
    pub fn match_hashes(&self, decrypted: &ImageHashes) -> Result<Option<CatalogMatch>, DatError> {
        let Some(entry) = self.lookup(decrypted) else {
            return Ok(None);
        };
        log::debug!(
            "Catalog match: {} (id {}, serial {})",
            entry.display_name,
            entry.id,
            entry.serial.as_deref().unwrap_or("-"),
        );
        let name = decompose_name(&entry.display_name)?;
        Ok(Some(CatalogMatch {
            entry: entry.clone(),
            name,
        }))
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
