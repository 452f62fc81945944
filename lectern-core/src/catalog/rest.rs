//! Hosted store client speaking the PostgREST dialect
//!
//! Tables: `holy_books`, `book_chapters`, `book_verses`. Reads use `eq.` filters
//! and `order=`; writes are upserts with `Prefer: resolution=merge-duplicates`.

use super::{Catalog, CatalogResult, CatalogWriter};
use crate::error::CatalogError;
use crate::types::{Chapter, HolyText, Language, Verse};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Upserts are sent in batches of this many rows to stay under request limits
const UPSERT_BATCH: usize = 20;

/// Catalog backed by a PostgREST endpoint (e.g. a Supabase project)
pub struct RestCatalog {
    client: reqwest::Client,
    base_url: String,
}

impl RestCatalog {
    /// Create a client for the project at `url`, authenticating with `key`
    pub fn new(url: &str, key: &str) -> CatalogResult<Self> {
        let mut headers = HeaderMap::new();
        let invalid = |e: reqwest::header::InvalidHeaderValue| CatalogError::Request(e.to_string());
        headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid)?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}/rest/v1", url.trim_end_matches('/')),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> CatalogResult<Vec<T>> {
        let url = self.table_url(table);
        tracing::debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(&url)
            .query(&[("select", "*")])
            .query(query)
            .send()
            .await?;
        let response = check_status(response)?;
        Ok(response.json().await?)
    }

    async fn upsert<T: Serialize + Sync>(
        &self,
        table: &str,
        on_conflict: &str,
        rows: &[T],
    ) -> CatalogResult<()> {
        let url = self.table_url(table);
        for batch in rows.chunks(UPSERT_BATCH) {
            let response = self
                .client
                .post(&url)
                .query(&[("on_conflict", on_conflict)])
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(batch)
                .send()
                .await?;
            check_status(response)?;
            tracing::debug!("Upserted {} rows into {}", batch.len(), table);
        }
        Ok(())
    }
}

fn check_status(response: reqwest::Response) -> CatalogResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(CatalogError::Status {
            status: status.as_u16(),
            url: response.url().to_string(),
        })
    }
}

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`
fn content_range_total(value: &str) -> Option<usize> {
    value.rsplit_once('/')?.1.trim().parse().ok()
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{}", value)
}

#[async_trait]
impl Catalog for RestCatalog {
    async fn fetch_texts(&self) -> CatalogResult<Vec<HolyText>> {
        let rows: Vec<HolyBookRow> = self
            .select("holy_books", &[("order", "id".to_string())])
            .await?;
        Ok(rows.into_iter().map(HolyText::from).collect())
    }

    async fn fetch_chapter_list(&self, text_code: &str) -> CatalogResult<Vec<Chapter>> {
        let rows: Vec<ChapterRow> = self
            .select(
                "book_chapters",
                &[("book_code", eq(text_code)), ("order", "number".to_string())],
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.into_chapter(text_code)).collect())
    }

    async fn fetch_chapter(&self, text_code: &str, number: u32) -> CatalogResult<Option<Chapter>> {
        let rows: Vec<ChapterRow> = self
            .select(
                "book_chapters",
                &[("book_code", eq(text_code)), ("number", eq(number))],
            )
            .await?;
        Ok(rows.into_iter().next().map(|r| r.into_chapter(text_code)))
    }

    async fn fetch_verses(&self, text_code: &str, chapter: u32) -> CatalogResult<Vec<Verse>> {
        let rows: Vec<VerseRow> = self
            .select(
                "book_verses",
                &[
                    ("book_code", eq(text_code)),
                    ("chapter_number", eq(chapter)),
                    ("order", "verse_number".to_string()),
                ],
            )
            .await?;
        Ok(rows.into_iter().map(|r| r.into_verse(text_code)).collect())
    }
}

#[async_trait]
impl CatalogWriter for RestCatalog {
    async fn upsert_text(&self, text: &HolyText) -> CatalogResult<()> {
        self.upsert("holy_books", "code", &[HolyBookRow::from(text.clone())])
            .await
    }

    async fn upsert_chapter(&self, chapter: &Chapter) -> CatalogResult<()> {
        self.upsert(
            "book_chapters",
            "book_code,number",
            &[ChapterRow::from(chapter.clone())],
        )
        .await
    }

    async fn upsert_verses(&self, verses: &[Verse]) -> CatalogResult<()> {
        let rows: Vec<VerseRow> = verses.iter().cloned().map(VerseRow::from).collect();
        self.upsert("book_verses", "book_code,chapter_number,verse_number", &rows)
            .await
    }

    async fn count_verses(&self, text_code: &str) -> CatalogResult<usize> {
        let response = self
            .client
            .head(self.table_url("book_verses"))
            .query(&[("select", "id".to_string()), ("book_code", eq(text_code))])
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = check_status(response)?;

        response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(content_range_total)
            .ok_or_else(|| CatalogError::Decode("missing Content-Range count".into()))
    }
}

/// Row of the `holy_books` table
#[derive(Debug, Serialize, Deserialize)]
struct HolyBookRow {
    #[serde(default, skip_serializing_if = "is_zero")]
    id: i64,
    code: String,
    name: String,
    description: Option<String>,
    language: Option<String>,
    total_chapters: Option<u32>,
    #[serde(default, skip_serializing)]
    created_at: Option<DateTime<Utc>>,
}

fn is_zero(id: &i64) -> bool {
    *id == 0
}

impl From<HolyBookRow> for HolyText {
    fn from(row: HolyBookRow) -> Self {
        HolyText {
            id: row.id,
            code: row.code,
            name: row.name,
            description: row.description,
            language: row.language,
            total_chapters: row.total_chapters,
            created_at: row.created_at,
        }
    }
}

impl From<HolyText> for HolyBookRow {
    fn from(text: HolyText) -> Self {
        HolyBookRow {
            id: text.id,
            code: text.code,
            name: text.name,
            description: text.description,
            language: text.language,
            total_chapters: text.total_chapters,
            created_at: text.created_at,
        }
    }
}

/// Row of the `book_chapters` table
#[derive(Debug, Serialize, Deserialize)]
struct ChapterRow {
    book_code: Option<String>,
    number: u32,
    name: String,
    english_name: String,
    verses_count: u32,
}

impl ChapterRow {
    fn into_chapter(self, text_code: &str) -> Chapter {
        Chapter {
            text_code: self.book_code.unwrap_or_else(|| text_code.to_string()),
            number: self.number,
            name: self.name,
            english_name: self.english_name,
            verses_count: self.verses_count,
        }
    }
}

impl From<Chapter> for ChapterRow {
    fn from(chapter: Chapter) -> Self {
        ChapterRow {
            book_code: Some(chapter.text_code),
            number: chapter.number,
            name: chapter.name,
            english_name: chapter.english_name,
            verses_count: chapter.verses_count,
        }
    }
}

/// Row of the `book_verses` table
#[derive(Debug, Default, Serialize, Deserialize)]
struct VerseRow {
    book_code: Option<String>,
    chapter_number: u32,
    verse_number: u32,
    original_text: String,
    english_translation: Option<String>,
    english_transliteration: Option<String>,
    malayalam_translation: Option<String>,
    tamil_translation: Option<String>,
    malayalam_transliteration: Option<String>,
    tamil_transliteration: Option<String>,
    audio_url: Option<String>,
}

impl VerseRow {
    fn into_verse(self, text_code: &str) -> Verse {
        let mut verse = Verse::new(
            self.book_code.unwrap_or_else(|| text_code.to_string()),
            self.chapter_number,
            self.verse_number,
            self.original_text,
        );
        let columns = [
            (Language::English, self.english_translation),
            (Language::EnglishTransliteration, self.english_transliteration),
            (Language::Malayalam, self.malayalam_translation),
            (Language::MalayalamTransliteration, self.malayalam_transliteration),
            (Language::Tamil, self.tamil_translation),
            (Language::TamilTransliteration, self.tamil_transliteration),
        ];
        for (language, text) in columns {
            if let Some(text) = text {
                verse.set_translation(language, text);
            }
        }
        verse.audio_url = self.audio_url;
        verse
    }
}

impl From<Verse> for VerseRow {
    fn from(verse: Verse) -> Self {
        let get = |language| verse.translations.get(&language).cloned();
        VerseRow {
            english_translation: get(Language::English),
            english_transliteration: get(Language::EnglishTransliteration),
            malayalam_translation: get(Language::Malayalam),
            tamil_translation: get(Language::Tamil),
            malayalam_transliteration: get(Language::MalayalamTransliteration),
            tamil_transliteration: get(Language::TamilTransliteration),
            book_code: Some(verse.text_code),
            chapter_number: verse.chapter,
            verse_number: verse.number,
            original_text: verse.original,
            audio_url: verse.audio_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_range_total() {
        assert_eq!(content_range_total("0-24/3573"), Some(3573));
        assert_eq!(content_range_total("*/0"), Some(0));
        assert_eq!(content_range_total("0-24/*"), None);
        assert_eq!(content_range_total("garbage"), None);
    }

    #[test]
    fn test_table_url() {
        let catalog = RestCatalog::new("https://example.supabase.co/", "anon").unwrap();
        assert_eq!(
            catalog.table_url("book_verses"),
            "https://example.supabase.co/rest/v1/book_verses"
        );
    }

    #[test]
    fn test_verse_row_maps_columns() {
        let row: VerseRow = serde_json::from_value(serde_json::json!({
            "id": 7,
            "book_code": "bible",
            "chapter_number": 1,
            "verse_number": 3,
            "original_text": "And God said, Let there be light",
            "english_translation": "And God said, Let there be light",
            "english_transliteration": null,
            "malayalam_translation": "",
            "tamil_translation": null,
            "malayalam_transliteration": null,
            "tamil_transliteration": null,
            "audio_url": null
        }))
        .unwrap();

        let verse = row.into_verse("bible");
        assert_eq!(verse.chapter, 1);
        assert_eq!(verse.number, 3);
        assert_eq!(verse.translations.len(), 1);
        assert!(verse.text(Language::Malayalam).is_none());

        let back = VerseRow::from(verse);
        assert_eq!(back.book_code.as_deref(), Some("bible"));
        assert!(back.malayalam_translation.is_none());
    }

    #[test]
    fn test_chapter_row_without_book_code() {
        let row: ChapterRow = serde_json::from_value(serde_json::json!({
            "id": 1,
            "book_code": null,
            "number": 2,
            "name": "البقرة",
            "english_name": "Al-Baqara",
            "verses_count": 286
        }))
        .unwrap();
        let chapter = row.into_chapter("quran");
        assert_eq!(chapter.text_code, "quran");
        assert_eq!(chapter.verses_count, 286);
    }

    #[test]
    fn test_new_text_row_omits_id() {
        let row = HolyBookRow::from(HolyText::new("torah", "Torah"));
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("id").is_none());
        assert!(json.get("created_at").is_none());
    }
}
