use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{debug, warn};

use super::KeyValueStore;

/// Key-value pairs kept in memory and written back to one JSON file on every
/// change. Writes go to a sibling temp file that is renamed over the store, so
/// a reader sees either the old or the new contents.
pub struct FileStore {
    path: PathBuf,
    inner: HashMap<String, String>,
}

impl FileStore {
    /// A missing, empty or unreadable file opens as an empty store.
    pub fn from_file(path: impl AsRef<Path>) -> FileStore {
        let path = path.as_ref().to_path_buf();

        let inner = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => HashMap::new(),
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                warn!("{}: corrupt store, starting empty: {}", path.display(), err);
                HashMap::new()
            }),
            Err(err) => {
                debug!("{}: not readable, starting empty: {}", path.display(), err);
                HashMap::new()
            }
        };

        FileStore { path, inner }
    }

    pub fn keys(&self) -> std::collections::hash_map::Keys<'_, String, String> {
        self.inner.keys()
    }

    pub fn synchronize(&self) -> anyhow::Result<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;

        let text = serde_json::to_string_pretty(&self.inner)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("creating temp file in {}", parent.display()))?;
        tmp.write_all(text.as_bytes())?;
        tmp.persist(&self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;

        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.inner.insert(key.to_string(), value);
        self.synchronize()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::{FileStore, KeyValueStore};

    #[test]
    fn survives_reopen() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("store.json");

        let mut store = FileStore::from_file(&path);
        store.set("greeting", String::from("hello"))?;

        let store = FileStore::from_file(&path);

        assert_eq!(Some(String::from("hello")), store.get("greeting"));

        Ok(())
    }

    #[test]
    fn rewrite_replaces_the_file_without_leftovers() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");
        fs::write(&path, r#"{"old": "value"}"#)?;

        let mut store = FileStore::from_file(&path);
        store.set("device", String::from("abc"))?;
        store.set("device", String::from("def"))?;

        let names = fs::read_dir(dir.path())?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().to_string())
            .collect::<Vec<_>>();

        assert_eq!(vec!["store.json"], names);

        let store = FileStore::from_file(&path);

        assert_eq!(Some(String::from("def")), store.get("device"));
        assert_eq!(Some(String::from("value")), store.get("old"));

        Ok(())
    }

    #[test]
    fn missing_file_is_empty() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;

        let store = FileStore::from_file(dir.path().join("absent.json"));

        assert_eq!(0, store.keys().count());

        Ok(())
    }

    #[test]
    fn corrupt_file_is_empty() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json")?;

        let store = FileStore::from_file(&path);

        assert_eq!(None, store.get("anything"));

        Ok(())
    }
}
