use std::{
    collections::HashMap,
    ffi::OsString,
    fs::{self, File, OpenOptions},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use crate::{Artifact, CacheKey};

use super::{
    CacheEntry, Store, StoreError,
    record::{self, Decoded, Record},
};

/// A store backed by an append-only record log on disk.
///
/// Every insert and removal appends one record. Opening the store replays
/// the log into memory. A final record cut short by a crash is dropped (and
/// the file truncated to the last complete record) once its header checks
/// out. Any other record that fails verification makes [`FileStore::open`]
/// fail with [`StoreError::Corrupt`] and leaves the file alone. Superseded records stay in the log until
/// [`FileStore::compact`] rewrites it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    file: File,
    entries: HashMap<CacheKey, CacheEntry>,
    stale_records: usize,
}

impl FileStore {
    /// Opens the log at `path`, creating it and its parent directories if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or read, or if it holds
    /// a corrupt record.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        let mut store = Self {
            path,
            file,
            entries: HashMap::new(),
            stale_records: 0,
        };

        let mut offset = 0;
        while offset < bytes.len() {
            match record::decode(&bytes[offset..], offset as u64)? {
                Decoded::Complete { record, len } => {
                    store.apply(record);
                    offset += len;
                }
                Decoded::Torn => {
                    log::warn!(
                        "dropping {} trailing bytes of a partial record in {}",
                        bytes.len() - offset,
                        store.path.display()
                    );
                    store.file.set_len(offset as u64)?;
                    break;
                }
            }
        }

        log::info!(
            "opened cache store {} with {} entries",
            store.path.display(),
            store.entries.len()
        );
        Ok(store)
    }

    /// Returns the path of the log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the number of superseded records still in the log.
    #[must_use]
    pub fn stale_records(&self) -> usize {
        self.stale_records
    }

    /// Rewrites the log so it holds exactly one record per live entry.
    ///
    /// The new log is written beside the old one and renamed over it, so a
    /// crash part way through leaves the old log intact. The store only
    /// switches to the new log once the rename has succeeded; on any error it
    /// keeps appending to the old one.
    ///
    /// # Errors
    ///
    /// Returns an error if the new log cannot be written or moved into place.
    pub fn compact(&mut self) -> Result<(), StoreError> {
        let mut bytes = Vec::new();
        for (key, entry) in &self.entries {
            bytes.extend_from_slice(&Record::put(key, entry).encode()?);
        }

        self.file = replace_file(&self.path, &bytes)?;

        log::info!(
            "compacted cache store {}: dropped {} stale records",
            self.path.display(),
            self.stale_records
        );
        self.stale_records = 0;
        Ok(())
    }

    /// Applies a replayed record to the in-memory entries.
    fn apply(&mut self, record: Record) {
        match record {
            Record::Put {
                key,
                level,
                artifact,
            } => {
                let entry = CacheEntry {
                    level,
                    artifact: Artifact::new(artifact),
                };
                if self
                    .entries
                    .insert(CacheKey::from_bytes(key), entry)
                    .is_some()
                {
                    self.stale_records += 1;
                }
            }
            Record::Remove { key } => {
                // The removal record is stale, and so is the put it cancels.
                let removed = self.entries.remove(&CacheKey::from_bytes(key)).is_some();
                self.stale_records += if removed { 2 } else { 1 };
            }
        }
    }

    fn append(&mut self, record: &Record) -> Result<(), StoreError> {
        let frame = record.encode()?;
        self.file.write_all(&frame)?;
        Ok(())
    }
}

impl Store for FileStore {
    fn get(&self, key: &CacheKey) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn insert(&mut self, key: CacheKey, entry: CacheEntry) -> Result<(), StoreError> {
        self.append(&Record::put(&key, &entry))?;
        if self.entries.insert(key, entry).is_some() {
            self.stale_records += 1;
        }
        Ok(())
    }

    fn remove(&mut self, key: &CacheKey) -> Result<bool, StoreError> {
        if !self.entries.contains_key(key) {
            return Ok(false);
        }
        self.append(&Record::remove(key))?;
        self.entries.remove(key);
        self.stale_records += 2;
        Ok(true)
    }

    fn keys(&self) -> Vec<CacheKey> {
        self.entries.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.file.sync_all()?;
        Ok(())
    }
}

/// Writes `data` to `{path}.tmp`, syncs it, then renames it over `path`.
///
/// Returns an append handle to the new file, opened before the rename so the
/// caller never ends up holding a handle to the replaced file.
fn replace_file(path: &Path, data: &[u8]) -> std::io::Result<File> {
    let tmp = tmp_path(path);

    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.sync_all()?;
    drop(file);

    let replacement = OpenOptions::new().read(true).append(true).open(&tmp)?;
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(replacement)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp_path = OsString::from(path.as_os_str());
    tmp_path.push(".tmp");
    PathBuf::from(tmp_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::tempdir;
    use waterfill_core::{Terrain, Volume};

    fn key(volume: i64) -> CacheKey {
        let terrain = Terrain::new(vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        CacheKey::new(&terrain, Volume::Integer(volume))
    }

    fn entry(level: f64) -> CacheEntry {
        CacheEntry {
            level,
            artifact: Artifact::from(format!("level {level}")),
        }
    }

    #[test]
    fn entries_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.db");

        let mut store = FileStore::open(&path).unwrap();
        store.insert(key(2), entry(2.5)).unwrap();
        store.insert(key(6), entry(4.0)).unwrap();
        store.flush().unwrap();
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&key(2)).unwrap(), Some(entry(2.5)));
        assert_eq!(store.get(&key(6)).unwrap(), Some(entry(4.0)));
    }

    #[test]
    fn removals_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.db");

        let mut store = FileStore::open(&path).unwrap();
        store.insert(key(2), entry(2.5)).unwrap();
        assert!(store.remove(&key(2)).unwrap());
        assert!(!store.remove(&key(2)).unwrap());
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.stale_records(), 2);
    }

    #[test]
    fn torn_tail_is_dropped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.db");

        let mut store = FileStore::open(&path).unwrap();
        store.insert(key(2), entry(2.5)).unwrap();
        drop(store);
        let intact_len = fs::metadata(&path).unwrap().len();

        // Half of a second record, as left by a crash mid-write.
        let frame = Record::put(&key(6), &entry(4.0)).encode().unwrap();
        let mut file = OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(&frame[..frame.len() / 2]).unwrap();
        drop(file);

        let mut store = FileStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(fs::metadata(&path).unwrap().len(), intact_len);

        // Appends after recovery land on a record boundary.
        store.insert(key(6), entry(4.0)).unwrap();
        drop(store);
        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.get(&key(6)).unwrap(), Some(entry(4.0)));
    }

    #[test]
    fn corrupt_record_fails_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.db");

        let mut store = FileStore::open(&path).unwrap();
        store.insert(key(2), entry(2.5)).unwrap();
        drop(store);

        let mut bytes = fs::read(&path).unwrap();
        let last = bytes.len() - 1;
        bytes[last] ^= 0xff;
        fs::write(&path, &bytes).unwrap();

        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Corrupt { offset: 0, .. })
        ));
    }

    #[test]
    fn compact_drops_stale_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.db");

        let mut store = FileStore::open(&path).unwrap();
        store.insert(key(1), entry(2.0)).unwrap();
        store.insert(key(2), entry(2.5)).unwrap();
        store.insert(key(3), entry(3.0)).unwrap();
        store.remove(&key(1)).unwrap();
        let before = fs::metadata(&path).unwrap().len();

        store.compact().unwrap();
        assert_eq!(store.stale_records(), 0);
        assert!(fs::metadata(&path).unwrap().len() < before);

        store.insert(key(4), entry(3.5)).unwrap();
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.stale_records(), 0);
        assert_eq!(store.get(&key(1)).unwrap(), None);
        assert_eq!(store.get(&key(4)).unwrap(), Some(entry(3.5)));

        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn damaged_length_fails_open_and_keeps_the_log() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.db");

        let mut store = FileStore::open(&path).unwrap();
        store.insert(key(1), entry(2.0)).unwrap();
        store.insert(key(2), entry(2.5)).unwrap();
        store.insert(key(3), entry(3.0)).unwrap();
        drop(store);

        let mut bytes = fs::read(&path).unwrap();
        bytes[4..8].copy_from_slice(&0xffff_ff00_u32.to_le_bytes());
        fs::write(&path, &bytes).unwrap();

        assert!(matches!(
            FileStore::open(&path),
            Err(StoreError::Corrupt { offset: 0, .. })
        ));
        assert_eq!(fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn failed_compaction_keeps_the_store_writable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.db");

        let mut store = FileStore::open(&path).unwrap();
        store.insert(key(1), entry(2.0)).unwrap();
        store.insert(key(1), entry(2.0)).unwrap();

        // A directory in the way of the replacement log.
        fs::create_dir(tmp_path(&path)).unwrap();
        assert!(matches!(store.compact(), Err(StoreError::Io(_))));
        assert_eq!(store.stale_records(), 1);

        store.insert(key(2), entry(2.5)).unwrap();
        drop(store);

        let store = FileStore::open(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(&key(2)).unwrap(), Some(entry(2.5)));
    }
}
