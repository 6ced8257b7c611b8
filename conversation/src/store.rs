use anyhow::Result;
use async_trait::async_trait;
use llm::ChatTurn;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// Process-wide keyed storage scoped by an opaque document identifier.
///
/// Entries live from first `set` until an explicit `delete`. Not safe for
/// concurrent writers to the same key; callers serialize their
/// load-mutate-save cycles per key.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        (**self).delete(key).await
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.lock().await.remove(key);
        Ok(())
    }
}

/// File-per-key store rooted at a directory, for persistence across runs.
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // Scope keys are opaque; flatten anything filesystem-hostile.
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{safe}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Persisted conversation histories over any [`KeyValueStore`].
///
/// Histories are saved as a whole (full overwrite) and loaded as a whole;
/// a stored value that no longer parses degrades to an empty history rather
/// than an error, so a corrupted entry cannot wedge the assistant.
pub struct HistoryStore<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn load(&self, scope_key: &str) -> Result<Vec<ChatTurn>> {
        let Some(raw) = self.store.get(scope_key).await? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(history) => Ok(history),
            Err(e) => {
                tracing::warn!(scope_key, error = %e, "stored history unreadable, starting fresh");
                Ok(Vec::new())
            }
        }
    }

    pub async fn save(&self, scope_key: &str, history: &[ChatTurn]) -> Result<()> {
        let raw = serde_json::to_string(history)?;
        self.store.set(scope_key, &raw).await
    }

    pub async fn clear(&self, scope_key: &str) -> Result<()> {
        self.store.delete(scope_key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<ChatTurn> {
        vec![
            ChatTurn::system("tutor"),
            ChatTurn::user("hi"),
            ChatTurn::assistant("hello"),
        ]
    }

    #[tokio::test]
    async fn missing_entry_loads_as_empty() {
        let store = HistoryStore::new(MemoryKeyValueStore::new());
        assert!(store.load("doc-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = HistoryStore::new(MemoryKeyValueStore::new());
        store.save("doc-1", &sample()).await.unwrap();
        assert_eq!(store.load("doc-1").await.unwrap(), sample());
    }

    #[tokio::test]
    async fn scope_keys_are_independent() {
        let store = HistoryStore::new(MemoryKeyValueStore::new());
        store.save("doc-1", &sample()).await.unwrap();
        assert!(store.load("doc-2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupt_entry_self_heals_to_empty() {
        let kv = MemoryKeyValueStore::new();
        kv.set("doc-1", "{not json").await.unwrap();
        let store = HistoryStore::new(kv);
        assert!(store.load("doc-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_removes_the_entry() {
        let store = HistoryStore::new(MemoryKeyValueStore::new());
        store.save("doc-1", &sample()).await.unwrap();
        store.clear("doc-1").await.unwrap();
        assert!(store.load("doc-1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = HistoryStore::new(FileKeyValueStore::new(dir.path().to_path_buf()));

        store.save("doc one/with:odd chars", &sample()).await.unwrap();
        assert_eq!(
            store.load("doc one/with:odd chars").await.unwrap(),
            sample()
        );

        store.clear("doc one/with:odd chars").await.unwrap();
        assert!(store.load("doc one/with:odd chars").await.unwrap().is_empty());
        // Clearing an already-missing key is not an error.
        store.clear("doc one/with:odd chars").await.unwrap();
    }

    #[tokio::test]
    async fn file_store_heals_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKeyValueStore::new(dir.path().to_path_buf());
        kv.set("doc-1", "<garbage>").await.unwrap();

        let store = HistoryStore::new(kv);
        assert!(store.load("doc-1").await.unwrap().is_empty());
    }
}
