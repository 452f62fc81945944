//! Chapter type representing one numbered division of a text

use serde::{Deserialize, Serialize};

/// A numbered division of a text (surah, book, kanda, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Chapter {
    /// Code of the text this chapter belongs to
    #[serde(alias = "book_code")]
    pub text_code: String,

    /// 1-based chapter number
    pub number: u32,

    /// Localized name
    pub name: String,

    pub english_name: String,

    pub verses_count: u32,
}

impl Chapter {
    /// Create a new chapter with both names set to `name`
    pub fn new(text_code: impl Into<String>, number: u32, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            text_code: text_code.into(),
            number,
            english_name: name.clone(),
            name,
            verses_count: 0,
        }
    }

    /// Set the English name
    pub fn with_english_name(mut self, english_name: impl Into<String>) -> Self {
        self.english_name = english_name.into();
        self
    }

    /// Set the verse count
    pub fn with_verses_count(mut self, count: u32) -> Self {
        self.verses_count = count;
        self
    }

    /// Name to show, falling back to "Chapter N" when the record has none
    pub fn display_name(&self) -> String {
        if !self.english_name.trim().is_empty() {
            self.english_name.clone()
        } else if !self.name.trim().is_empty() {
            self.name.clone()
        } else {
            format!("Chapter {}", self.number)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_fallback() {
        let chapter = Chapter::new("gita", 3, "");
        assert_eq!(chapter.display_name(), "Chapter 3");

        let chapter = Chapter::new("gita", 3, "कर्मयोग").with_english_name("Karma Yoga");
        assert_eq!(chapter.display_name(), "Karma Yoga");
    }
}
