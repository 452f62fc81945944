//! Read-only snapshots of the reader for front ends

use super::Position;
use crate::types::{Chapter, Language, LanguageSelection, Verse};
use serde::Serialize;

/// One displayed line of a verse
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseLine {
    pub language: Language,
    pub label: &'static str,
    pub text: String,
}

/// A verse filtered by the language selection, in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerseView {
    pub chapter: u32,
    pub number: u32,
    pub lines: Vec<VerseLine>,
    pub audio_url: Option<String>,
}

impl VerseView {
    pub fn render(verse: &Verse, languages: &LanguageSelection) -> Self {
        let lines = languages
            .iter()
            .filter_map(|language| {
                verse
                    .text(language)
                    .filter(|text| !text.trim().is_empty())
                    .map(|text| VerseLine {
                        language,
                        label: language.label(),
                        text: text.to_string(),
                    })
            })
            .collect();

        Self {
            chapter: verse.chapter,
            number: verse.number,
            lines,
            audio_url: verse.audio_url.clone(),
        }
    }
}

/// The "book spread": chapter header on the left, current verse on the right
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub text_code: String,
    pub position: Position,
    pub chapter: Option<Chapter>,
    /// 1-based page within the chapter; one verse per page
    pub page: u32,
    pub total_pages: u32,
    pub last_chapter: u32,
    pub verse: Option<VerseView>,
    pub bookmarked: bool,
    pub languages: Vec<Language>,
    pub transitioning: bool,
    /// The last chapter fetch failed; front ends offer a retry
    pub load_failed: bool,
}

impl PageView {
    /// Short header such as `Al-Faatiha (1) 3/7`
    pub fn heading(&self) -> String {
        let name = self
            .chapter
            .as_ref()
            .map(Chapter::display_name)
            .unwrap_or_else(|| format!("Chapter {}", self.position.chapter));
        format!(
            "{} ({}) {}/{}",
            name, self.position.chapter, self.page, self.total_pages
        )
    }
}
