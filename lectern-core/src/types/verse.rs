//! Verse type: original text plus translations and transliterations

use super::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One verse of a chapter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Verse {
    pub text_code: String,

    /// Chapter number the verse belongs to
    pub chapter: u32,

    /// 1-based verse number within the chapter
    pub number: u32,

    /// Original-language text
    pub original: String,

    /// Translations and transliterations keyed by language
    #[serde(default)]
    pub translations: BTreeMap<Language, String>,

    /// Recitation audio, where the source provides one
    #[serde(default)]
    pub audio_url: Option<String>,
}

impl Verse {
    pub fn new(
        text_code: impl Into<String>,
        chapter: u32,
        number: u32,
        original: impl Into<String>,
    ) -> Self {
        Self {
            text_code: text_code.into(),
            chapter,
            number,
            original: original.into(),
            translations: BTreeMap::new(),
            audio_url: None,
        }
    }

    /// Add a translation, ignoring blank text
    pub fn with_translation(mut self, language: Language, text: impl Into<String>) -> Self {
        self.set_translation(language, text);
        self
    }

    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    /// Set a translation; blank text removes it
    pub fn set_translation(&mut self, language: Language, text: impl Into<String>) {
        let text = text.into();
        if language == Language::Original {
            self.original = text;
        } else if text.trim().is_empty() {
            self.translations.remove(&language);
        } else {
            self.translations.insert(language, text);
        }
    }

    /// Text for a language; the original counts as a language
    pub fn text(&self, language: Language) -> Option<&str> {
        match language {
            Language::Original => Some(self.original.as_str()),
            other => self.translations.get(&other).map(String::as_str),
        }
    }

    /// Bookmark key for this verse
    pub fn key(&self) -> String {
        format!("{}:{}", self.chapter, self.number)
    }
}
