use chrono::{DateTime, Utc};
use log::error;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

use crate::constellation::Constellation;
use crate::elements::error::CacheError;
use crate::elements::types::ElementSet;

/// Durable per-constellation element-set store.
///
/// One slot per constellation, persisted as `<folder>/<id>.json`. Reads are
/// served from memory; the folder is only read at [`ElementCache::open`].
/// Disk writes are serialized on their own lock, so readers only ever wait
/// for a map swap.
pub struct ElementCache {
    base: PathBuf,
    entries: RwLock<HashMap<Constellation, ElementSet>>,
    disk: Mutex<()>,
}

impl ElementCache {
    /// Open the cache folder and load every entry persisted in it.
    pub fn open(base: PathBuf) -> Result<Self, CacheError> {
        std::fs::create_dir_all(&base)?;

        let mut entries = HashMap::new();
        for entry in base.read_dir()? {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            match load_entry(&path) {
                Ok(set) => {
                    entries.insert(set.constellation, set);
                }
                Err(e) => error!("Failed to load cached elements {}: {}", path.display(), e),
            }
        }

        log::info!(
            "Element cache at {} holds {} constellation(s)",
            base.display(),
            entries.len()
        );

        Ok(ElementCache {
            base,
            entries: RwLock::new(entries),
            disk: Mutex::new(()),
        })
    }

    fn slot_path(&self, constellation: Constellation) -> PathBuf {
        self.base.join(format!("{}.json", constellation.as_str()))
    }

    pub fn get(&self, constellation: Constellation) -> Option<ElementSet> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&constellation)
            .cloned()
    }

    /// Replace the slot for `constellation`, stamped with the current time.
    /// Blocks on file I/O.
    pub fn put(&self, constellation: Constellation, raw_text: String) {
        self.put_at(constellation, raw_text, Utc::now());
    }

    pub(crate) fn put_at(
        &self,
        constellation: Constellation,
        raw_text: String,
        fetched_at: DateTime<Utc>,
    ) {
        let set = ElementSet {
            constellation,
            raw_text,
            fetched_at,
        };

        // Held until the map is updated so disk and memory agree on the last writer.
        let _disk = self.disk.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = self.persist(&set) {
            error!("Failed to persist elements for {}: {}", constellation, e);
        }
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(constellation, set);
    }

    pub fn is_stale(&self, constellation: Constellation, max_age: Duration) -> bool {
        self.is_stale_at(constellation, max_age, Utc::now())
    }

    pub(crate) fn is_stale_at(
        &self,
        constellation: Constellation,
        max_age: Duration,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(fetched_at) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&constellation)
            .map(|set| set.fetched_at)
        else {
            return true;
        };

        match chrono::Duration::from_std(max_age) {
            Ok(max_age) => now - fetched_at >= max_age,
            Err(_) => false,
        }
    }

    /// Write to a sibling temp file, then rename over the slot.
    fn persist(&self, set: &ElementSet) -> Result<(), CacheError> {
        let path = self.slot_path(set.constellation);
        let tmp = path.with_extension("json.tmp");
        let body = serde_json::to_vec_pretty(set)?;
        let written = std::fs::write(&tmp, body).and_then(|()| std::fs::rename(&tmp, &path));
        if written.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        Ok(written?)
    }
}

fn load_entry(path: &Path) -> Result<ElementSet, CacheError> {
    let content = std::fs::read(path)?;
    Ok(serde_json::from_slice(&content)?)
}
