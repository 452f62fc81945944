//! Bookmarks persisted through the storage port

use super::Position;
use crate::error::StorageError;
use crate::storage::{read_json, write_json, StorageProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A bookmarked verse, written as `"{chapter}:{verse}"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Bookmark {
    pub chapter: u32,
    pub verse: u32,
}

impl From<Position> for Bookmark {
    fn from(p: Position) -> Self {
        Self {
            chapter: p.chapter,
            verse: p.verse,
        }
    }
}

impl From<Bookmark> for Position {
    fn from(b: Bookmark) -> Self {
        Position::new(b.chapter, b.verse)
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chapter, self.verse)
    }
}

impl FromStr for Bookmark {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (chapter, verse) = s
            .split_once(':')
            .ok_or_else(|| format!("bookmark '{}' is not chapter:verse", s))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("bookmark '{}' is not chapter:verse", s))
        };
        Ok(Self {
            chapter: parse(chapter)?,
            verse: parse(verse)?,
        })
    }
}

impl From<Bookmark> for String {
    fn from(b: Bookmark) -> Self {
        b.to_string()
    }
}

impl TryFrom<String> for Bookmark {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Bookmark list of one text, stored as a JSON array under `{code}-bookmarks`
///
/// Clones share a write lock, so toggles through any clone are applied one
/// at a time to the stored list.
#[derive(Clone)]
pub struct BookmarkStore {
    storage: Arc<dyn StorageProvider>,
    text_code: String,
    key: String,
    write_lock: Arc<Mutex<()>>,
}

impl BookmarkStore {
    pub fn new(storage: Arc<dyn StorageProvider>, text_code: &str) -> Self {
        Self {
            storage,
            text_code: text_code.to_string(),
            key: format!("{}-bookmarks", text_code),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn text_code(&self) -> &str {
        &self.text_code
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored bookmarks in insertion order; malformed entries are skipped
    pub async fn load(&self) -> Result<Vec<Bookmark>, StorageError> {
        let raw: Vec<String> = read_json(self.storage.as_ref(), &self.key)
            .await?
            .unwrap_or_default();

        let mut bookmarks = Vec::with_capacity(raw.len());
        for entry in raw {
            match entry.parse::<Bookmark>() {
                Ok(b) if !bookmarks.contains(&b) => bookmarks.push(b),
                Ok(_) => {}
                Err(e) => tracing::warn!("Skipping stored bookmark: {}", e),
            }
        }
        Ok(bookmarks)
    }

    pub async fn save(&self, bookmarks: &[Bookmark]) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        write_json(self.storage.as_ref(), &self.key, bookmarks).await
    }

    /// Toggle `bookmark` in the stored list
    ///
    /// Returns whether it was added, and the list as written.
    pub async fn toggle(&self, bookmark: Bookmark) -> Result<(bool, Vec<Bookmark>), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut bookmarks = self.load().await?;
        let added = toggle(&mut bookmarks, bookmark);
        write_json(self.storage.as_ref(), &self.key, &bookmarks).await?;
        Ok((added, bookmarks))
    }
}

/// Add `bookmark` if absent, remove it if present; returns whether it was added
pub fn toggle(bookmarks: &mut Vec<Bookmark>, bookmark: Bookmark) -> bool {
    if let Some(index) = bookmarks.iter().position(|b| *b == bookmark) {
        bookmarks.remove(index);
        false
    } else {
        bookmarks.push(bookmark);
        true
    }
}
