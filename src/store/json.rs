use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::app::{Result, SkimmerError};
use crate::domain::Snapshot;
use crate::store::Store;

pub const DEFAULT_FILE_NAME: &str = "persisted_data.json";

/// Keeps the whole snapshot in one JSON file, rewritten on every save.
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `<data_dir>/skimmer/persisted_data.json`
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| SkimmerError::Other("Could not find data directory".into()))?;
        Ok(data_dir.join("skimmer").join(DEFAULT_FILE_NAME))
    }
}

impl Store for JsonStore {
    fn load(&self) -> Result<Option<Snapshot>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_str(&content)?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string(snapshot)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Identity, RawItem};
    use crate::ingest;
    use crate::store::{load_or_empty, save_or_warn};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let raw = RawItem {
            identity: Identity::Guid("guid-1".into()),
            title: "First".into(),
            link: "https://example.com/1".into(),
            pub_date: Utc.with_ymd_and_hms(2024, 3, 9, 17, 45, 12).unwrap()
                + chrono::Duration::milliseconds(250),
        };
        let (snapshot, _) =
            ingest::merge(Snapshot::new(), "https://example.com/feed", "Example", vec![raw]);
        ingest::remove_item(snapshot, "gone")
    }

    #[test]
    fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("state.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("state.json"));
        let snapshot = sample_snapshot();

        store.save(&snapshot).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, snapshot);

        store.save(&loaded).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), snapshot);
    }

    #[test]
    fn test_file_shape() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        JsonStore::new(&path).save(&sample_snapshot()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let item = &value["itemsByFeed"]["https://example.com/feed"][0];
        assert_eq!(item["guid"], "guid-1");
        assert_eq!(item["feedTitle"], "Example");
        assert_eq!(item["pubDate"], "2024-03-09T17:45:12.250Z");
        assert_eq!(value["removedGUIDs"][0], "gone");
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("nested").join("deeper").join("state.json"));
        store.save(&Snapshot::new()).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonStore::new(&path);
        assert!(store.load().is_err());
        assert_eq!(load_or_empty(&store), Snapshot::new());
    }

    #[test]
    fn test_bad_timestamp_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("state.json");
        fs::write(
            &path,
            r##"{"itemsByFeed":{"f":[{"title":"t","link":"#","guid":"g","feedTitle":"F","pubDate":"yesterday"}]},"removedGUIDs":[]}"##,
        )
        .unwrap();

        assert_eq!(load_or_empty(&JsonStore::new(&path)), Snapshot::new());
    }

    #[test]
    fn test_failed_save_is_reported_not_raised() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the write fail.
        let path = dir.path().join("state.json");
        fs::create_dir(&path).unwrap();

        let store = JsonStore::new(&path);
        assert!(store.save(&sample_snapshot()).is_err());
        assert!(!save_or_warn(&store, &sample_snapshot()));
    }
}
