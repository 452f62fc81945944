//! Bible JSON documents
//!
//! Each Bible book becomes one catalog chapter; the verses of a book are
//! numbered sequentially across its chapters so that a book reads as one
//! continuous chapter.

use super::ImportBundle;
use crate::error::ImportError;
use crate::types::{Chapter, HolyText, Language, Verse};
use serde::Deserialize;

const BIBLE_CODE: &str = "bible";

#[derive(Debug, Clone, Deserialize)]
pub struct BibleJson {
    pub metadata: Metadata,
    pub books: Vec<Book>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub language: LanguageInfo,
    pub total_books: u32,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LanguageInfo {
    #[serde(default)]
    pub original: Vec<String>,
    #[serde(default)]
    pub translations: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Book {
    pub number: u32,
    pub name: Localized,
    #[serde(default)]
    pub chapters: Vec<BookChapter>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookChapter {
    pub number: u32,
    #[serde(default)]
    pub verses: Vec<BookVerse>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookVerse {
    pub number: u32,
    pub text: Localized,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Localized {
    pub english: String,
    #[serde(default)]
    pub malayalam: Option<String>,
    #[serde(default)]
    pub tamil: Option<String>,
}

impl BibleJson {
    fn validate(&self) -> Result<(), ImportError> {
        if self.books.is_empty() {
            return Err(ImportError::InvalidStructure(
                "the JSON must include a non-empty books array".into(),
            ));
        }
        let mut numbers: Vec<u32> = self.books.iter().map(|b| b.number).collect();
        numbers.sort_unstable();
        if numbers.contains(&0) {
            return Err(ImportError::InvalidStructure("book numbers start at 1".into()));
        }
        if numbers.windows(2).any(|w| w[0] == w[1]) {
            return Err(ImportError::InvalidStructure("duplicate book number".into()));
        }
        Ok(())
    }

    /// Convert to catalog records
    pub fn into_bundle(self) -> Result<ImportBundle, ImportError> {
        self.validate()?;

        let mut text = HolyText::new(BIBLE_CODE, "Bible")
            .with_description(self.metadata.title.clone())
            .with_total_chapters(self.metadata.total_books);
        if !self.metadata.language.original.is_empty() {
            text = text.with_language(self.metadata.language.original.join(", "));
        }

        let mut chapters = Vec::with_capacity(self.books.len());
        let mut verses = Vec::new();

        for book in self.books {
            let mut number = 0;
            for chapter in &book.chapters {
                for verse in &chapter.verses {
                    number += 1;
                    let mut record = Verse::new(BIBLE_CODE, book.number, number, &verse.text.english)
                        .with_translation(Language::English, &verse.text.english);
                    if let Some(ml) = &verse.text.malayalam {
                        record.set_translation(Language::Malayalam, ml);
                    }
                    if let Some(ta) = &verse.text.tamil {
                        record.set_translation(Language::Tamil, ta);
                    }
                    verses.push(record);
                }
            }

            chapters.push(
                Chapter::new(BIBLE_CODE, book.number, book.name.english.clone())
                    .with_verses_count(number),
            );
        }

        Ok(ImportBundle {
            text,
            chapters,
            verses,
        })
    }
}

/// Parse and validate a Bible JSON document
pub fn parse_bible_json(json: &str) -> Result<ImportBundle, ImportError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("metadata").is_none() || !value.get("books").is_some_and(|b| b.is_array()) {
        return Err(ImportError::InvalidStructure(
            "the JSON must include metadata and books array".into(),
        ));
    }
    let document: BibleJson = serde_json::from_value(value)?;
    document.into_bundle()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "metadata": {
            "title": "Holy Bible (KJV)",
            "language": { "original": ["Hebrew", "Greek"], "translations": ["English"] },
            "total_books": 66,
            "source": "test"
        },
        "books": [
            {
                "number": 1,
                "name": { "english": "Genesis", "malayalam": "ഉല്പത്തി" },
                "chapters": [
                    { "number": 1, "verses": [
                        { "number": 1, "text": { "english": "In the beginning", "malayalam": "ആദിയിൽ" } },
                        { "number": 2, "text": { "english": "And the earth" } }
                    ]},
                    { "number": 2, "verses": [
                        { "number": 1, "text": { "english": "Thus the heavens", "tamil": "இவ்விதமாக" } }
                    ]}
                ]
            }
        ]
    }"#;

    #[test]
    fn test_books_become_chapters() {
        let bundle = parse_bible_json(SAMPLE).unwrap();

        assert_eq!(bundle.text.code, "bible");
        assert_eq!(bundle.text.language.as_deref(), Some("Hebrew, Greek"));
        assert_eq!(bundle.text.total_chapters, Some(66));

        assert_eq!(bundle.chapters.len(), 1);
        assert_eq!(bundle.chapters[0].name, "Genesis");
        assert_eq!(bundle.chapters[0].verses_count, 3);

        let numbers: Vec<u32> = bundle.verses.iter().map(|v| v.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(bundle.verses[0].text(Language::Malayalam), Some("ആദിയിൽ"));
        assert_eq!(bundle.verses[2].text(Language::Tamil), Some("இவ்விதமாக"));
        assert_eq!(bundle.verses[1].original, "And the earth");
    }

    #[test]
    fn test_rejects_missing_books() {
        let err = parse_bible_json(r#"{"metadata": {}}"#).unwrap_err();
        assert!(matches!(err, ImportError::InvalidStructure(_)));

        let err = parse_bible_json("not json").unwrap_err();
        assert!(matches!(err, ImportError::InvalidJson(_)));
    }

    #[test]
    fn test_rejects_duplicate_books() {
        let json = SAMPLE.replace(
            r#""books": ["#,
            r#""books": [{"number": 1, "name": {"english": "Dup"}, "chapters": []},"#,
        );
        assert!(matches!(
            parse_bible_json(&json),
            Err(ImportError::InvalidStructure(_))
        ));
    }
}
