//! Catalog access: where texts, chapters and verses come from

mod composite;
mod quran;
mod rest;
mod stored;

pub use composite::CompositeCatalog;
pub use quran::{merge_editions, Ayah, QuranApi, QURAN_API_URL};
pub use rest::RestCatalog;
pub use stored::StoredCatalog;

use crate::config::Config;
use crate::error::CatalogError;
use crate::storage::LocalStorage;
use crate::types::{Chapter, HolyText, Verse};
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for catalog operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Read side of a catalog backend
#[async_trait]
pub trait Catalog: Send + Sync {
    /// All texts the backend knows about
    async fn fetch_texts(&self) -> CatalogResult<Vec<HolyText>>;

    /// Chapters of a text, ordered by number
    async fn fetch_chapter_list(&self, text_code: &str) -> CatalogResult<Vec<Chapter>>;

    /// A single chapter, `None` when it does not exist
    async fn fetch_chapter(&self, text_code: &str, number: u32) -> CatalogResult<Option<Chapter>> {
        Ok(self
            .fetch_chapter_list(text_code)
            .await?
            .into_iter()
            .find(|c| c.number == number))
    }

    /// Verses of a chapter, ordered by verse number
    async fn fetch_verses(&self, text_code: &str, chapter: u32) -> CatalogResult<Vec<Verse>>;
}

/// Write side used by the importers
#[async_trait]
pub trait CatalogWriter: Catalog {
    /// Insert or replace a text record
    async fn upsert_text(&self, text: &HolyText) -> CatalogResult<()>;

    /// Insert or replace a chapter, keyed by (text, number)
    async fn upsert_chapter(&self, chapter: &Chapter) -> CatalogResult<()>;

    /// Insert or replace verses, keyed by (text, chapter, number)
    async fn upsert_verses(&self, verses: &[Verse]) -> CatalogResult<()>;

    /// Number of verses stored for a text
    async fn count_verses(&self, text_code: &str) -> CatalogResult<usize>;
}

/// Read and write handles onto the configured store
#[derive(Clone)]
pub struct Catalogs {
    /// Catalog for reading, with the Quran routed to the public Quran API
    /// when enabled
    pub reader: Arc<dyn Catalog>,

    /// The store itself, used by the importers
    pub writer: Arc<dyn CatalogWriter>,
}

/// Build the catalogs selected by the configuration: the hosted database when
/// configured, otherwise the local data directory
pub fn catalogs_from_config(config: &Config) -> CatalogResult<Catalogs> {
    let (primary, writer): (Arc<dyn Catalog>, Arc<dyn CatalogWriter>) = match &config.database {
        Some(db) => {
            let rest = Arc::new(RestCatalog::new(&db.url, &db.key)?);
            (rest.clone() as Arc<dyn Catalog>, rest as Arc<dyn CatalogWriter>)
        }
        None => {
            let stored = Arc::new(StoredCatalog::new(Arc::new(LocalStorage::new(
                &config.data_dir,
            ))));
            (stored.clone() as Arc<dyn Catalog>, stored as Arc<dyn CatalogWriter>)
        }
    };

    let reader: Arc<dyn Catalog> = if config.quran_api {
        Arc::new(CompositeCatalog::new(primary).route("quran", Arc::new(QuranApi::new())))
    } else {
        primary
    };

    Ok(Catalogs { reader, writer })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_local_catalogs_share_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            quran_api: false,
            ..Config::default()
        };
        let catalogs = catalogs_from_config(&config).unwrap();

        catalogs
            .writer
            .upsert_text(&HolyText::new("torah", "Torah"))
            .await
            .unwrap();
        let texts = catalogs.reader.fetch_texts().await.unwrap();
        assert_eq!(texts[0].code, "torah");
    }
}
