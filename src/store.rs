//! Durable asset history and marketplace listings.
//!
//! Two named records live in the state directory:
//!
//! - `history.json` — the ordered asset history, newest first, capacity
//!   [`HISTORY_CAPACITY`].
//! - `listed.json` — the set of asset ids marked as listed.
//!
//! Both are written in full after every mutating operation (no batching,
//! no debouncing) and restored at session start. Malformed or missing
//! content on load recovers to an empty collection — a stale state file
//! must never take the tool down. Recovery is logged through `tracing`
//! and otherwise invisible to the user.
//!
//! Each record carries a `version` field. Bump [`STATE_VERSION`] to
//! invalidate state written by an incompatible format.

use crate::asset::{Asset, AssetId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// Maximum number of assets retained in the history.
pub const HISTORY_CAPACITY: usize = 12;

/// Version of the on-disk state format.
pub const STATE_VERSION: u32 = 1;

const HISTORY_FILENAME: &str = "history.json";
const LISTED_FILENAME: &str = "listed.json";

/// Ordered collection of generated assets, newest first.
///
/// Insertion order reflects generation time, not edit time — editing an
/// asset replaces its `image_data` in place without moving it. The history
/// exclusively owns asset records; everything else refers to them by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetHistory {
    assets: Vec<Asset>,
}

impl AssetHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an asset; always succeeds.
    ///
    /// If the history would exceed [`HISTORY_CAPACITY`], the oldest entries
    /// are dropped from the tail and returned so the caller can cascade
    /// (unlist them, clear a selection pointing at them).
    pub fn insert(&mut self, asset: Asset) -> Vec<Asset> {
        self.assets.insert(0, asset);
        if self.assets.len() > HISTORY_CAPACITY {
            self.assets.split_off(HISTORY_CAPACITY)
        } else {
            Vec::new()
        }
    }

    /// Remove the asset with this id. Returns the asset, or `None` if the
    /// id is unknown (a no-op).
    pub fn remove(&mut self, id: &AssetId) -> Option<Asset> {
        let pos = self.assets.iter().position(|a| &a.id == id)?;
        Some(self.assets.remove(pos))
    }

    pub fn get(&self, id: &AssetId) -> Option<&Asset> {
        self.assets.iter().find(|a| &a.id == id)
    }

    pub fn get_mut(&mut self, id: &AssetId) -> Option<&mut Asset> {
        self.assets.iter_mut().find(|a| &a.id == id)
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.get(id).is_some()
    }

    /// Most recently generated asset.
    pub fn newest(&self) -> Option<&Asset> {
        self.assets.first()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.iter()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// Set of asset ids marked as listed on the marketplace.
///
/// Pure set semantics: marking is idempotent, order is irrelevant, and
/// listing one asset never affects another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingSet {
    ids: HashSet<AssetId>,
}

impl ListingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent set-insert. Returns `true` if the id was newly listed.
    pub fn mark_listed(&mut self, id: AssetId) -> bool {
        self.ids.insert(id)
    }

    pub fn is_listed(&self, id: &AssetId) -> bool {
        self.ids.contains(id)
    }

    /// Drop an id from the set. Returns `true` if it was present.
    /// Called only from the deletion/eviction cascade.
    pub fn unlist(&mut self, id: &AssetId) -> bool {
        self.ids.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

#[derive(Serialize)]
struct HistoryRecordRef<'a> {
    version: u32,
    assets: &'a [Asset],
}

#[derive(Deserialize)]
struct HistoryRecord {
    version: u32,
    assets: Vec<Asset>,
}

#[derive(Serialize)]
struct ListedRecordRef<'a> {
    version: u32,
    listed: Vec<&'a AssetId>,
}

#[derive(Deserialize)]
struct ListedRecord {
    version: u32,
    listed: Vec<AssetId>,
}

/// Durable storage for the two state records.
///
/// Owns only the location; the in-memory collections live in the session.
/// `load` never fails — it recovers to empty on any problem. `persist`
/// failures are real errors (the user's state would silently stop being
/// saved) and are surfaced to the caller.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn history_path(&self) -> PathBuf {
        self.dir.join(HISTORY_FILENAME)
    }

    fn listed_path(&self) -> PathBuf {
        self.dir.join(LISTED_FILENAME)
    }

    /// Restore both records. Missing files are a normal first run; anything
    /// unreadable or unparseable loads as empty and is logged.
    pub fn load(&self) -> (AssetHistory, ListingSet) {
        let history = match load_record::<HistoryRecord>(&self.history_path()) {
            Some(record) if record.version == STATE_VERSION => AssetHistory {
                assets: record.assets,
            },
            Some(record) => {
                tracing::warn!(
                    found = record.version,
                    expected = STATE_VERSION,
                    "history record has a different format version; starting empty"
                );
                AssetHistory::new()
            }
            None => AssetHistory::new(),
        };

        let listings = match load_record::<ListedRecord>(&self.listed_path()) {
            Some(record) if record.version == STATE_VERSION => ListingSet {
                ids: record.listed.into_iter().collect(),
            },
            Some(record) => {
                tracing::warn!(
                    found = record.version,
                    expected = STATE_VERSION,
                    "listed record has a different format version; starting empty"
                );
                ListingSet::new()
            }
            None => ListingSet::new(),
        };

        (history, listings)
    }

    /// Write both records in full. Called after every mutating operation.
    pub fn persist(&self, history: &AssetHistory, listings: &ListingSet) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let record = HistoryRecordRef {
            version: STATE_VERSION,
            assets: &history.assets,
        };
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(self.history_path(), json)?;

        // Sorted so repeated persists of the same state are byte-identical.
        let mut listed: Vec<&AssetId> = listings.ids.iter().collect();
        listed.sort();
        let record = ListedRecordRef {
            version: STATE_VERSION,
            listed,
        };
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(self.listed_path(), json)
    }
}

/// Read and parse one record file. `None` means "start empty" — the file
/// is missing (first run) or malformed (logged).
fn load_record<T: serde::de::DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable state record; starting empty");
            return None;
        }
    };
    match serde_json::from_str(&content) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "malformed state record; starting empty");
            None
        }
    }
}
