//! Key-value storage port
//!
//! Everything the reader persists (bookmarks, the offline catalog) goes through
//! [`StorageProvider`], so the same code runs against a data directory, an
//! in-memory map in tests, or any other backend.

use crate::error::StorageError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Abstract storage provider trait
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Read data from the given path
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>>;

    /// Write data to the given path
    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()>;

    /// Delete data at the given path
    async fn delete(&self, path: &str) -> StorageResult<()>;

    /// List entries under the given prefix
    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>>;

    /// Check if a path exists
    async fn exists(&self, path: &str) -> StorageResult<bool>;
}

/// Read and deserialize a JSON document, `None` when the path is absent
pub async fn read_json<T: DeserializeOwned>(
    storage: &dyn StorageProvider,
    path: &str,
) -> StorageResult<Option<T>> {
    if !storage.exists(path).await? {
        return Ok(None);
    }
    let data = storage.read(path).await?;
    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|e| StorageError::BackendError(format!("{}: {}", path, e)))
}

/// Serialize a value as JSON and write it to the given path
pub async fn write_json<T: Serialize + ?Sized>(
    storage: &dyn StorageProvider,
    path: &str,
    value: &T,
) -> StorageResult<()> {
    let data =
        serde_json::to_vec_pretty(value).map_err(|e| StorageError::BackendError(e.to_string()))?;
    storage.write(path, data).await
}

/// Local filesystem storage provider
pub struct LocalStorage {
    root: std::path::PathBuf,
}

impl LocalStorage {
    /// Create a new local storage provider with the given root directory
    pub fn new(root: impl Into<std::path::PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of this provider
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Safely resolve a path, preventing path traversal attacks
    fn full_path(&self, path: &str) -> StorageResult<std::path::PathBuf> {
        use std::path::Component;

        let mut normalized = std::path::PathBuf::new();
        for component in std::path::Path::new(path).components() {
            match component {
                Component::Normal(c) => normalized.push(c),
                Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) | Component::RootDir => {
                    return Err(StorageError::PermissionDenied(format!(
                        "path escapes storage root: {}",
                        path
                    )));
                }
            }
        }

        Ok(self.root.join(normalized))
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        let full_path = self.full_path(path)?;
        tokio::fs::read(full_path)
            .await
            .map_err(|e| StorageError::NotFound(format!("{}: {}", path, e)))
    }

    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()> {
        let full_path = self.full_path(path)?;
        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::BackendError(e.to_string()))?;
        }

        // Write next to the target and rename so readers never see a partial file
        let temp_path = full_path.with_extension("tmp");
        tokio::fs::write(&temp_path, data)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?;
        tokio::fs::rename(&temp_path, &full_path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        let full_path = self.full_path(path)?;
        tokio::fs::remove_file(full_path)
            .await
            .map_err(|e| StorageError::NotFound(format!("{}: {}", path, e)))
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let full_path = self.full_path(prefix)?;
        let mut entries = Vec::new();
        let mut read_dir = match tokio::fs::read_dir(&full_path).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(entries),
            Err(e) => return Err(StorageError::BackendError(e.to_string())),
        };

        while let Some(entry) = read_dir
            .next_entry()
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))?
        {
            if let Some(name) = entry.file_name().to_str() {
                entries.push(name.to_string());
            }
        }
        entries.sort();
        Ok(entries)
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        let full_path = self.full_path(path)?;
        tokio::fs::try_exists(full_path)
            .await
            .map_err(|e| StorageError::BackendError(e.to_string()))
    }
}

/// In-memory storage provider
#[derive(Default)]
pub struct MemoryStorage {
    data: std::sync::RwLock<std::collections::HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StorageError {
        StorageError::BackendError("memory storage lock poisoned".to_string())
    }
}

#[async_trait]
impl StorageProvider for MemoryStorage {
    async fn read(&self, path: &str) -> StorageResult<Vec<u8>> {
        self.data
            .read()
            .map_err(|_| Self::poisoned())?
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn write(&self, path: &str, data: Vec<u8>) -> StorageResult<()> {
        self.data
            .write()
            .map_err(|_| Self::poisoned())?
            .insert(path.to_string(), data);
        Ok(())
    }

    async fn delete(&self, path: &str) -> StorageResult<()> {
        self.data
            .write()
            .map_err(|_| Self::poisoned())?
            .remove(path)
            .ok_or_else(|| StorageError::NotFound(path.to_string()))?;
        Ok(())
    }

    async fn list(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut keys: Vec<String> = self
            .data
            .read()
            .map_err(|_| Self::poisoned())?
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn exists(&self, path: &str) -> StorageResult<bool> {
        Ok(self
            .data
            .read()
            .map_err(|_| Self::poisoned())?
            .contains_key(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_storage() {
        let storage = MemoryStorage::new();

        storage.write("test.txt", b"hello".to_vec()).await.unwrap();

        let data = storage.read("test.txt").await.unwrap();
        assert_eq!(data, b"hello");

        assert!(storage.exists("test.txt").await.unwrap());
        assert!(!storage.exists("missing.txt").await.unwrap());

        storage.delete("test.txt").await.unwrap();
        assert!(!storage.exists("test.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_local_storage_nested_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage
            .write("catalog/bible/1.json", b"[]".to_vec())
            .await
            .unwrap();

        assert!(storage.exists("catalog/bible/1.json").await.unwrap());
        assert_eq!(storage.list("catalog/bible").await.unwrap(), vec!["1.json"]);
        assert!(storage.list("catalog/missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_local_storage_rejects_traversal() {
        let dir = tempfile::TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        let err = storage.read("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StorageError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let storage = MemoryStorage::new();
        let missing: Option<Vec<String>> = read_json(&storage, "keys.json").await.unwrap();
        assert!(missing.is_none());

        write_json(&storage, "keys.json", &vec!["1:1".to_string()])
            .await
            .unwrap();
        let keys: Option<Vec<String>> = read_json(&storage, "keys.json").await.unwrap();
        assert_eq!(keys, Some(vec!["1:1".to_string()]));
    }
}
