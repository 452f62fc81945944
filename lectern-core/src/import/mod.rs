//! Importers that populate a catalog from files and remote sources

mod bible_json;
mod remote;

pub use bible_json::{parse_bible_json, BibleJson};
pub use remote::{RemoteImporter, SUPPORTED_DOWNLOADS};

use crate::catalog::CatalogWriter;
use crate::error::ImportError;
use crate::transliterate::TransliterationChain;
use crate::types::{Chapter, HolyText, Verse};
use serde::Serialize;

/// Everything needed to store one text
#[derive(Debug, Clone, PartialEq)]
pub struct ImportBundle {
    pub text: HolyText,
    pub chapters: Vec<Chapter>,
    pub verses: Vec<Verse>,
}

impl ImportBundle {
    pub fn verses_of(&self, chapter: u32) -> impl Iterator<Item = &Verse> {
        self.verses.iter().filter(move |v| v.chapter == chapter)
    }
}

/// Progress of a running import, reported once per stored chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

/// Progress callback shared by the importers
pub type ProgressFn<'a> = &'a (dyn Fn(Progress) + Send + Sync);

/// Counts of what an import wrote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub chapters: usize,
    pub verses: usize,
}

/// User-facing result of a download request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportOutcome {
    pub success: bool,
    pub message: String,
}

impl ImportOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Insert the text record unless the catalog already has one with that code
pub async fn ensure_text(writer: &dyn CatalogWriter, text: &HolyText) -> Result<(), ImportError> {
    let exists = writer
        .fetch_texts()
        .await?
        .iter()
        .any(|t| t.code == text.code);
    if !exists {
        tracing::info!("Adding text '{}' to the catalog", text.code);
        writer.upsert_text(text).await?;
    }
    Ok(())
}

/// Store a bundle chapter by chapter
///
/// The text record is only written when missing. Transliterations are
/// generated for each chapter before it is stored when a chain is given.
pub async fn store_bundle(
    writer: &dyn CatalogWriter,
    mut bundle: ImportBundle,
    transliterator: Option<&TransliterationChain>,
    progress: ProgressFn<'_>,
) -> Result<ImportSummary, ImportError> {
    ensure_text(writer, &bundle.text).await?;

    if let Some(chain) = transliterator {
        let written = chain.enrich_verses(&mut bundle.verses).await;
        tracing::debug!("Generated {} transliterations", written);
    }

    let total = bundle.chapters.len();
    let mut summary = ImportSummary::default();
    progress(Progress {
        completed: 0,
        total,
    });

    for (index, chapter) in bundle.chapters.iter().enumerate() {
        writer.upsert_chapter(chapter).await?;
        let verses: Vec<Verse> = bundle.verses_of(chapter.number).cloned().collect();
        if !verses.is_empty() {
            writer.upsert_verses(&verses).await?;
        }

        summary.chapters += 1;
        summary.verses += verses.len();
        progress(Progress {
            completed: index + 1,
            total,
        });
    }

    tracing::info!(
        "Stored {} chapters and {} verses for '{}'",
        summary.chapters,
        summary.verses,
        bundle.text.code
    );
    Ok(summary)
}

/// Parse a Bible JSON document and store it
pub async fn import_bible_json(
    writer: &dyn CatalogWriter,
    json: &str,
    transliterator: Option<&TransliterationChain>,
    progress: ProgressFn<'_>,
) -> Result<ImportSummary, ImportError> {
    let bundle = parse_bible_json(json)?;
    store_bundle(writer, bundle, transliterator, progress).await
}
