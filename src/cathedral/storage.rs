//! Save slots on disk.
//!
//! One JSON file per slot under `<data_dir>/saves/`. Writes go to a temp file
//! that is renamed over the slot while an exclusive lock is held, so a crash
//! mid-save leaves the previous save intact.

use chrono::{DateTime, Utc};
use fs2::FileExt;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::StoreError;
use super::gauge::OilGauge;
use super::inventory::Inventory;
use super::session::Location;
use super::types::{Difficulty, Entity, ItemId, SAVE_SCHEMA_VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SaveSlot {
    Autosave,
    /// Numbered from 1.
    Manual(u8),
}

impl SaveSlot {
    fn file_name(self) -> String {
        match self {
            SaveSlot::Autosave => "autosave.json".to_string(),
            SaveSlot::Manual(n) => format!("slot_{}.json", n),
        }
    }
}

impl fmt::Display for SaveSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveSlot::Autosave => write!(f, "autosave"),
            SaveSlot::Manual(n) => write!(f, "slot {}", n),
        }
    }
}

/// Everything persisted for one run. Terrain is not saved; only entity tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveData {
    pub version: u8,
    pub saved_at: DateTime<Utc>,
    pub difficulty: Difficulty,
    pub location: Location,
    pub oil: OilGauge,
    pub inventory: Inventory,
    pub attunement: Option<ItemId>,
    pub checkpoint: Location,
    pub rooms: BTreeMap<String, Vec<Entity>>,
    pub journal: Vec<String>,
    pub moves: u32,
    pub blackouts: u32,
}

/// Summary line for the slot picker.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotInfo {
    pub slot: SaveSlot,
    pub saved_at: DateTime<Utc>,
    pub room: String,
    pub oil: OilGauge,
    pub moves: u32,
    pub difficulty: Difficulty,
}

impl fmt::Display for SlotInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} | {} | oil {} | {} moves | {}",
            self.slot,
            self.saved_at.format("%Y-%m-%d %H:%M"),
            self.room,
            self.oil,
            self.moves,
            self.difficulty.label()
        )
    }
}

pub trait SaveStore {
    fn save(&self, slot: SaveSlot, data: &SaveData) -> Result<(), StoreError>;
    fn load(&self, slot: SaveSlot) -> Result<SaveData, StoreError>;
    /// Occupied slots, autosave first.
    fn list(&self) -> Result<Vec<SlotInfo>, StoreError>;
}

#[derive(Debug, Clone)]
pub struct FileSaveStore {
    dir: PathBuf,
    max_slots: u8,
}

impl FileSaveStore {
    pub fn new(data_dir: impl AsRef<Path>, max_slots: u8) -> Self {
        Self {
            dir: data_dir.as_ref().join("saves"),
            max_slots,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_slots(&self) -> u8 {
        self.max_slots
    }

    fn path_for(&self, slot: SaveSlot) -> Result<PathBuf, StoreError> {
        if let SaveSlot::Manual(n) = slot {
            if n == 0 || n > self.max_slots {
                return Err(StoreError::InvalidSlot {
                    requested: n,
                    max: self.max_slots,
                });
            }
        }
        Ok(self.dir.join(slot.file_name()))
    }

    fn slots(&self) -> impl Iterator<Item = SaveSlot> {
        std::iter::once(SaveSlot::Autosave).chain((1..=self.max_slots).map(SaveSlot::Manual))
    }
}

impl SaveStore for FileSaveStore {
    fn save(&self, slot: SaveSlot, data: &SaveData) -> Result<(), StoreError> {
        let path = self.path_for(slot)?;
        let json = serde_json::to_string_pretty(data)?;
        write_json_atomic(&path, &json)?;
        info!("saved {} to {}", slot, path.display());
        Ok(())
    }

    fn load(&self, slot: SaveSlot) -> Result<SaveData, StoreError> {
        let path = self.path_for(slot)?;
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::SlotEmpty(slot.to_string()))
            }
            Err(e) => return Err(e.into()),
        };
        // Check the version before the shape so old saves get a clear error.
        let value: serde_json::Value = serde_json::from_str(&text)?;
        let found = value
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or(0);
        if found != u64::from(SAVE_SCHEMA_VERSION) {
            return Err(StoreError::SchemaMismatch {
                expected: SAVE_SCHEMA_VERSION,
                found: u8::try_from(found).unwrap_or(u8::MAX),
            });
        }
        let data = serde_json::from_value(value)?;
        debug!("loaded {} from {}", slot, path.display());
        Ok(data)
    }

    fn list(&self) -> Result<Vec<SlotInfo>, StoreError> {
        let mut out = Vec::new();
        for slot in self.slots() {
            match self.load(slot) {
                Ok(data) => out.push(SlotInfo {
                    slot,
                    saved_at: data.saved_at,
                    room: data.location.room,
                    oil: data.oil,
                    moves: data.moves,
                    difficulty: data.difficulty,
                }),
                Err(StoreError::SlotEmpty(_)) => {}
                Err(StoreError::Json(e)) => debug!("skipping unreadable {}: {}", slot, e),
                Err(StoreError::SchemaMismatch { found, .. }) => {
                    debug!("skipping {} with schema version {}", slot, found)
                }
                Err(e) => return Err(e),
            }
        }
        Ok(out)
    }
}

fn write_json_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("save.json");
    // Lock a sidecar so the slot itself is never truncated before the rename.
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(dir.join(format!(".{}.lock", base)))?;
    lock_file.lock_exclusive()?;

    let mut counter = 0u32;
    let (tmp_path, mut tmp) = loop {
        let cand = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&cand) {
            Ok(tmp) => break (cand, tmp),
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
            }
            Err(e) => return Err(e),
        }
    };
    let written = tmp
        .write_all(content.as_bytes())
        .and_then(|()| tmp.sync_all())
        .and_then(|()| fs::rename(&tmp_path, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }
    if let Ok(dirf) = File::open(dir) {
        let _ = dirf.sync_all();
    }
    lock_file.unlock()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cathedral::session::{Session, SessionOptions};
    use tempfile::TempDir;

    fn store() -> (TempDir, FileSaveStore) {
        let tmp = TempDir::new().expect("tempdir");
        let store = FileSaveStore::new(tmp.path(), 5);
        (tmp, store)
    }

    #[test]
    fn empty_slot_is_reported() {
        let (_tmp, store) = store();
        let err = store.load(SaveSlot::Manual(1)).unwrap_err();
        assert!(matches!(err, StoreError::SlotEmpty(_)));
    }

    #[test]
    fn slot_range_is_enforced() {
        let (_tmp, store) = store();
        let data = Session::new(SessionOptions::default()).snapshot();
        for bad in [0, 6] {
            let err = store.save(SaveSlot::Manual(bad), &data).unwrap_err();
            assert!(matches!(err, StoreError::InvalidSlot { max: 5, .. }));
        }
    }

    #[test]
    fn saved_data_comes_back_identical() {
        let (_tmp, store) = store();
        let data = Session::new(SessionOptions::default()).snapshot();
        store.save(SaveSlot::Manual(3), &data).expect("save");
        assert_eq!(store.load(SaveSlot::Manual(3)).expect("load"), data);
        assert!(store.dir().join("slot_3.json").exists());
    }

    #[test]
    fn list_skips_empty_and_stale_slots() {
        let (_tmp, store) = store();
        let data = Session::new(SessionOptions::default()).snapshot();
        store.save(SaveSlot::Autosave, &data).expect("autosave");
        store.save(SaveSlot::Manual(2), &data).expect("slot 2");
        fs::write(store.dir().join("slot_4.json"), r#"{"version": 99}"#).expect("write");

        let slots: Vec<_> = store.list().expect("list").into_iter().map(|i| i.slot).collect();
        assert_eq!(slots, vec![SaveSlot::Autosave, SaveSlot::Manual(2)]);
    }

    #[test]
    fn failed_write_leaves_no_temp_file() {
        let (_tmp, store) = store();
        // A directory where the slot file should go makes the final rename fail.
        fs::create_dir_all(store.dir().join("slot_1.json").join("blocker")).expect("mkdir");
        let data = Session::new(SessionOptions::default()).snapshot();
        let err = store.save(SaveSlot::Manual(1), &data).unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));

        let leftovers: Vec<_> = fs::read_dir(store.dir())
            .expect("read dir")
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.contains(".tmp-"))
            .collect();
        assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);
    }

    #[test]
    fn slot_count_comes_from_the_store() {
        let tmp = TempDir::new().expect("tempdir");
        assert_eq!(FileSaveStore::new(tmp.path(), 3).max_slots(), 3);
        assert_eq!(
            FileSaveStore::new(tmp.path(), 3).dir(),
            tmp.path().join("saves")
        );
    }

    #[test]
    fn schema_mismatch_is_rejected() {
        let (_tmp, store) = store();
        fs::create_dir_all(store.dir()).expect("mkdir");
        fs::write(store.dir().join("slot_1.json"), r#"{"version": 99}"#).expect("write");
        let err = store.load(SaveSlot::Manual(1)).unwrap_err();
        assert!(matches!(
            err,
            StoreError::SchemaMismatch { expected: SAVE_SCHEMA_VERSION, found: 99 }
        ));
    }
}
