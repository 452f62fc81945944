//! Routes individual texts to dedicated catalogs

use super::{Catalog, CatalogResult};
use crate::types::{Chapter, HolyText, Verse};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// A primary catalog with per-text overrides
///
/// Reads for a routed text code go to its override; everything else goes to
/// the primary. Text listings are merged, keeping the primary record on
/// conflicts.
pub struct CompositeCatalog {
    primary: Arc<dyn Catalog>,
    routes: HashMap<String, Arc<dyn Catalog>>,
}

impl CompositeCatalog {
    pub fn new(primary: Arc<dyn Catalog>) -> Self {
        Self {
            primary,
            routes: HashMap::new(),
        }
    }

    /// Serve `text_code` from `catalog`
    pub fn route(mut self, text_code: impl Into<String>, catalog: Arc<dyn Catalog>) -> Self {
        self.routes.insert(text_code.into(), catalog);
        self
    }

    fn backend(&self, text_code: &str) -> &dyn Catalog {
        self.routes
            .get(text_code)
            .map(|c| c.as_ref())
            .unwrap_or(self.primary.as_ref())
    }
}

#[async_trait]
impl Catalog for CompositeCatalog {
    async fn fetch_texts(&self) -> CatalogResult<Vec<HolyText>> {
        let mut texts = self.primary.fetch_texts().await?;

        for (code, catalog) in &self.routes {
            match catalog.fetch_texts().await {
                Ok(routed) => {
                    for text in routed.into_iter().filter(|t| &t.code == code) {
                        match texts.iter_mut().find(|t| t.code == text.code) {
                            // Keep the primary's id and description when it has the text
                            Some(existing) => {
                                if existing.total_chapters.is_none() {
                                    existing.total_chapters = text.total_chapters;
                                }
                            }
                            None => texts.push(text),
                        }
                    }
                }
                Err(e) => tracing::warn!("Failed to list texts for route '{}': {}", code, e),
            }
        }

        texts.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(texts)
    }

    async fn fetch_chapter_list(&self, text_code: &str) -> CatalogResult<Vec<Chapter>> {
        self.backend(text_code).fetch_chapter_list(text_code).await
    }

    async fn fetch_chapter(&self, text_code: &str, number: u32) -> CatalogResult<Option<Chapter>> {
        self.backend(text_code).fetch_chapter(text_code, number).await
    }

    async fn fetch_verses(&self, text_code: &str, chapter: u32) -> CatalogResult<Vec<Verse>> {
        self.backend(text_code).fetch_verses(text_code, chapter).await
    }
}
