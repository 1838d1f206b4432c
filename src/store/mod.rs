use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::error;

mod file;
mod local;

pub use file::FileStore;
pub use local::{LocalStore, COMMENTS_KEY, DEVICE_KEY, RATINGS_KEY};

/// Durable string key-value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()>;
}

/// Non-durable store for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    inner: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        self.inner.insert(key.to_string(), value);
        Ok(())
    }
}

/// One store shared by the local backend and the device identity.
impl<S: KeyValueStore> KeyValueStore for Arc<Mutex<S>> {
    fn get(&self, key: &str) -> Option<String> {
        match self.lock() {
            Ok(store) => store.get(key),
            Err(_) => {
                error!("store lock poisoned while reading {}", key);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: String) -> anyhow::Result<()> {
        let mut store = self
            .lock()
            .map_err(|_| anyhow::Error::msg("store lock poisoned"))?;

        store.set(key, value)
    }
}
