//! Read-only catalog over the public Quran API (api.alquran.cloud)
//!
//! Each translation is a separate "edition"; a surah is assembled by fetching
//! the editions concurrently and aligning them to the original by position.

use super::{Catalog, CatalogResult};
use crate::error::CatalogError;
use crate::types::{Chapter, HolyText, Language, Verse};
use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use std::collections::HashMap;

/// Default API root
pub const QURAN_API_URL: &str = "https://api.alquran.cloud/v1";

const QURAN_CODE: &str = "quran";

const ORIGINAL_EDITION: &str = "quran-uthmani";

const AUDIO_EDITION: &str = "ar.alafasy";

/// Translation editions and the language each one fills
const EDITIONS: [(Language, &str); 4] = [
    (Language::EnglishTransliteration, "en.transliteration"),
    (Language::English, "en.sahih"),
    (Language::Malayalam, "ml.abdulhameed"),
    (Language::Tamil, "ta.tamil"),
];

/// One ayah as returned for a single edition
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Ayah {
    #[serde(rename = "numberInSurah")]
    pub number_in_surah: u32,

    #[serde(default)]
    pub text: String,

    #[serde(default)]
    pub audio: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct SurahInfo {
    number: u32,
    name: String,
    #[serde(rename = "englishName")]
    english_name: String,
    #[serde(rename = "numberOfAyahs")]
    number_of_ayahs: u32,
}

#[derive(Debug, Deserialize)]
struct SurahEdition {
    ayahs: Vec<Ayah>,
}

/// Quran catalog backed by the public API
pub struct QuranApi {
    client: reqwest::Client,
    base_url: String,
}

impl QuranApi {
    pub fn new() -> Self {
        Self::with_base_url(QURAN_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn ensure_quran(text_code: &str) -> CatalogResult<()> {
        if text_code == QURAN_CODE {
            Ok(())
        } else {
            Err(CatalogError::UnknownText(text_code.to_string()))
        }
    }

    async fn fetch_edition(&self, surah: u32, edition: &str) -> CatalogResult<Vec<Ayah>> {
        let url = format!("{}/surah/{}/{}", self.base_url, surah, edition);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        let envelope: Envelope<SurahEdition> = response.json().await?;
        Ok(envelope.data.ayahs)
    }

    /// Fetch an edition, degrading to an empty list on failure
    async fn fetch_edition_or_empty(&self, surah: u32, edition: &str) -> Vec<Ayah> {
        match self.fetch_edition(surah, edition).await {
            Ok(ayahs) => ayahs,
            Err(e) => {
                tracing::warn!("Failed to fetch {} for surah {}: {}", edition, surah, e);
                Vec::new()
            }
        }
    }
}

impl Default for QuranApi {
    fn default() -> Self {
        Self::new()
    }
}

/// Assemble verses from the original edition plus translation editions
///
/// Translations are aligned to the original by position; audio is matched by
/// ayah number.
pub fn merge_editions(
    surah: u32,
    original: Vec<Ayah>,
    translations: Vec<(Language, Vec<Ayah>)>,
    audio: Vec<Ayah>,
) -> Vec<Verse> {
    let audio: HashMap<u32, String> = audio
        .into_iter()
        .filter_map(|a| a.audio.map(|url| (a.number_in_surah, url)))
        .collect();

    original
        .into_iter()
        .enumerate()
        .map(|(index, ayah)| {
            let mut verse = Verse::new(QURAN_CODE, surah, ayah.number_in_surah, ayah.text);
            for (language, ayahs) in &translations {
                if let Some(translated) = ayahs.get(index) {
                    verse.set_translation(*language, translated.text.clone());
                }
            }
            verse.audio_url = audio.get(&verse.number).cloned();
            verse
        })
        .collect()
}

#[async_trait]
impl Catalog for QuranApi {
    async fn fetch_texts(&self) -> CatalogResult<Vec<HolyText>> {
        Ok(HolyText::well_known(QURAN_CODE).into_iter().collect())
    }

    async fn fetch_chapter_list(&self, text_code: &str) -> CatalogResult<Vec<Chapter>> {
        Self::ensure_quran(text_code)?;
        let url = format!("{}/surah", self.base_url);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                status: response.status().as_u16(),
                url,
            });
        }
        let envelope: Envelope<Vec<SurahInfo>> = response.json().await?;

        Ok(envelope
            .data
            .into_iter()
            .map(|s| {
                Chapter::new(QURAN_CODE, s.number, s.name)
                    .with_english_name(s.english_name)
                    .with_verses_count(s.number_of_ayahs)
            })
            .collect())
    }

    async fn fetch_verses(&self, text_code: &str, chapter: u32) -> CatalogResult<Vec<Verse>> {
        Self::ensure_quran(text_code)?;

        let translation_requests = EDITIONS.iter().map(|(language, edition)| async move {
            (*language, self.fetch_edition_or_empty(chapter, edition).await)
        });
        let (original, translations, audio) = futures::join!(
            self.fetch_edition(chapter, ORIGINAL_EDITION),
            join_all(translation_requests),
            self.fetch_edition_or_empty(chapter, AUDIO_EDITION),
        );

        Ok(merge_editions(chapter, original?, translations, audio))
    }
}
