//! Holy text records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A readable text (Quran, Bible, ...) identified by its code
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HolyText {
    /// Database identifier (0 for texts that were never stored)
    #[serde(default)]
    pub id: i64,

    /// Short code used in URLs and foreign keys (e.g. "quran")
    pub code: String,

    /// Display name
    pub name: String,

    pub description: Option<String>,

    /// Original language(s) of the text
    pub language: Option<String>,

    #[serde(alias = "totalChapters")]
    pub total_chapters: Option<u32>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl HolyText {
    /// Create a new text record with the required fields
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: 0,
            code: code.into(),
            name: name.into(),
            description: None,
            language: None,
            total_chapters: None,
            created_at: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_total_chapters(mut self, total: u32) -> Self {
        self.total_chapters = Some(total);
        self
    }

    /// Built-in record for one of the well-known texts
    pub fn well_known(code: &str) -> Option<Self> {
        WELL_KNOWN
            .iter()
            .find(|t| t.code == code)
            .map(|t| {
                HolyText::new(t.code, t.name)
                    .with_description(t.description)
                    .with_language(t.language)
                    .with_total_chapters(t.chapters)
            })
    }

    /// Built-in records for every well-known text
    pub fn all_well_known() -> Vec<Self> {
        WELL_KNOWN
            .iter()
            .filter_map(|t| Self::well_known(t.code))
            .collect()
    }
}

struct KnownText {
    code: &'static str,
    name: &'static str,
    description: &'static str,
    language: &'static str,
    chapters: u32,
}

const WELL_KNOWN: [KnownText; 5] = [
    KnownText {
        code: "quran",
        name: "Quran",
        description: "The central religious text of Islam",
        language: "Arabic",
        chapters: 114,
    },
    KnownText {
        code: "bible",
        name: "Bible",
        description: "The holy scripture of Christianity",
        language: "Hebrew, Aramaic, Greek",
        chapters: 66,
    },
    KnownText {
        code: "gita",
        name: "Bhagavad Gita",
        description: "A 700-verse Hindu scripture",
        language: "Sanskrit",
        chapters: 18,
    },
    KnownText {
        code: "ramayana",
        name: "Ramayana",
        description: "Ancient Indian epic poem",
        language: "Sanskrit",
        chapters: 7,
    },
    KnownText {
        code: "torah",
        name: "Torah",
        description: "The first five books of the Hebrew Bible",
        language: "Hebrew",
        chapters: 5,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_known_chapter_counts() {
        assert_eq!(
            HolyText::well_known("quran").unwrap().total_chapters,
            Some(114)
        );
        assert_eq!(HolyText::well_known("torah").unwrap().total_chapters, Some(5));
        assert!(HolyText::well_known("vedas").is_none());
        assert_eq!(HolyText::all_well_known().len(), 5);
    }
}
