use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::PathBuf,
    sync::Mutex,
};

type Subscriber = Box<dyn Fn(&str) + Send + Sync>;

/// Local JSON key-value store, one file per key under the data directory.
///
/// Every successful `write` notifies registered subscribers with the
/// written key, so read-side components can refresh without polling.
/// Reads never fail: missing and unreadable values both come back as
/// `None`.
pub struct LocalStore {
    dir: PathBuf,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl LocalStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create data directory {}", dir.display()))?;
        Ok(Self {
            dir,
            subscribers: Mutex::new(Vec::new()),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Reads and deserializes the value stored under `key`. A value that
    /// no longer parses is logged and treated as absent.
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let contents = fs::read_to_string(self.key_path(key)).ok()?;
        match serde_json::from_str(&contents) {
            Ok(value) => Some(value),
            Err(e) => {
                log::debug!("Discarding unreadable value for '{}': {}", key, e);
                None
            }
        }
    }

    /// Serializes `value` under `key`, then fires subscribers.
    pub fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let serialized = serde_json::to_string_pretty(value)?;
        let path = self.key_path(key);
        fs::write(&path, serialized)
            .with_context(|| format!("Failed to write '{}' to {}", key, path.display()))?;
        self.notify(key);
        Ok(())
    }

    /// Registers a callback invoked with the key after every successful
    /// write, including writes to keys the caller does not care about.
    pub fn subscribe(&self, subscriber: impl Fn(&str) + Send + Sync + 'static) {
        self.subscribers.lock().unwrap().push(Box::new(subscriber));
    }

    fn notify(&self, key: &str) {
        for subscriber in self.subscribers.lock().unwrap().iter() {
            subscriber(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn temp_store() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_key_reads_none() {
        let (_dir, store) = temp_store();
        assert_eq!(store.read::<Vec<String>>("movies_1"), None);
    }

    #[test]
    fn write_then_read_round_trips() {
        let (_dir, store) = temp_store();
        let value = vec!["a".to_string(), "b".to_string()];
        store.write("movies_1", &value).unwrap();
        assert_eq!(store.read::<Vec<String>>("movies_1"), Some(value));
    }

    #[test]
    fn corrupt_value_reads_none() {
        let (dir, store) = temp_store();
        fs::write(dir.path().join("movies_1.json"), "not json {").unwrap();
        assert_eq!(store.read::<Vec<String>>("movies_1"), None);
    }

    #[test]
    fn write_notifies_subscribers_with_key() {
        let (_dir, store) = temp_store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(move |key| sink.lock().unwrap().push(key.to_string()));

        store.write("movies_1", &Vec::<String>::new()).unwrap();
        store.write("movies_p2p", &Vec::<String>::new()).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["movies_1", "movies_p2p"]);
    }
}
