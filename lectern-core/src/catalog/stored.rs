//! Catalog kept as JSON documents in a [`StorageProvider`]
//!
//! Layout:
//! - `catalog/texts.json`: every text record
//! - `catalog/{code}/chapters.json`: chapter list of a text
//! - `catalog/{code}/{chapter}.json`: verses of one chapter

use super::{Catalog, CatalogResult, CatalogWriter};
use crate::error::CatalogError;
use crate::storage::{read_json, write_json, StorageProvider};
use crate::types::{Chapter, HolyText, Verse};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

const TEXTS_PATH: &str = "catalog/texts.json";

/// Offline catalog over any storage provider
pub struct StoredCatalog {
    storage: Arc<dyn StorageProvider>,
    /// Serializes read-modify-write cycles on the JSON documents
    write_lock: Mutex<()>,
}

impl StoredCatalog {
    pub fn new(storage: Arc<dyn StorageProvider>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// Text codes become path segments, so only plain identifiers are accepted
    fn validate_code(code: &str) -> CatalogResult<()> {
        if !code.is_empty()
            && code
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            Ok(())
        } else {
            Err(CatalogError::UnknownText(code.to_string()))
        }
    }

    fn chapters_path(code: &str) -> String {
        format!("catalog/{}/chapters.json", code)
    }

    fn verses_path(code: &str, chapter: u32) -> String {
        format!("catalog/{}/{}.json", code, chapter)
    }
}

#[async_trait]
impl Catalog for StoredCatalog {
    async fn fetch_texts(&self) -> CatalogResult<Vec<HolyText>> {
        Ok(read_json(self.storage.as_ref(), TEXTS_PATH)
            .await?
            .unwrap_or_default())
    }

    async fn fetch_chapter_list(&self, text_code: &str) -> CatalogResult<Vec<Chapter>> {
        Self::validate_code(text_code)?;
        Ok(read_json(self.storage.as_ref(), &Self::chapters_path(text_code))
            .await?
            .unwrap_or_default())
    }

    async fn fetch_verses(&self, text_code: &str, chapter: u32) -> CatalogResult<Vec<Verse>> {
        Self::validate_code(text_code)?;
        Ok(
            read_json(self.storage.as_ref(), &Self::verses_path(text_code, chapter))
                .await?
                .unwrap_or_default(),
        )
    }
}

#[async_trait]
impl CatalogWriter for StoredCatalog {
    async fn upsert_text(&self, text: &HolyText) -> CatalogResult<()> {
        Self::validate_code(&text.code)?;
        let _guard = self.write_lock.lock().await;

        let mut texts = self.fetch_texts().await?;
        match texts.iter_mut().find(|t| t.code == text.code) {
            Some(existing) => {
                let id = existing.id;
                *existing = text.clone();
                existing.id = id;
            }
            None => {
                let mut text = text.clone();
                text.id = texts.iter().map(|t| t.id).max().unwrap_or(0) + 1;
                text.created_at.get_or_insert_with(chrono::Utc::now);
                texts.push(text);
            }
        }
        write_json(self.storage.as_ref(), TEXTS_PATH, &texts).await?;
        Ok(())
    }

    async fn upsert_chapter(&self, chapter: &Chapter) -> CatalogResult<()> {
        Self::validate_code(&chapter.text_code)?;
        let _guard = self.write_lock.lock().await;

        let mut chapters = self.fetch_chapter_list(&chapter.text_code).await?;
        chapters.retain(|c| c.number != chapter.number);
        chapters.push(chapter.clone());
        chapters.sort_by_key(|c| c.number);
        write_json(
            self.storage.as_ref(),
            &Self::chapters_path(&chapter.text_code),
            &chapters,
        )
        .await?;
        Ok(())
    }

    async fn upsert_verses(&self, verses: &[Verse]) -> CatalogResult<()> {
        let _guard = self.write_lock.lock().await;

        let mut by_chapter: BTreeMap<(&str, u32), Vec<&Verse>> = BTreeMap::new();
        for verse in verses {
            Self::validate_code(&verse.text_code)?;
            by_chapter
                .entry((verse.text_code.as_str(), verse.chapter))
                .or_default()
                .push(verse);
        }

        for ((code, chapter), incoming) in by_chapter {
            let mut stored = self.fetch_verses(code, chapter).await?;
            for verse in incoming {
                stored.retain(|v| v.number != verse.number);
                stored.push(verse.clone());
            }
            stored.sort_by_key(|v| v.number);
            write_json(
                self.storage.as_ref(),
                &Self::verses_path(code, chapter),
                &stored,
            )
            .await?;
        }
        Ok(())
    }

    async fn count_verses(&self, text_code: &str) -> CatalogResult<usize> {
        let mut total = 0;
        for chapter in self.fetch_chapter_list(text_code).await? {
            total += self.fetch_verses(text_code, chapter.number).await?.len();
        }
        Ok(total)
    }
}
