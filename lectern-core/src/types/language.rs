//! Display languages and the reader's language selection

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A display-language tag
///
/// Declaration order is display order: the original text first, then each
/// translation followed by its transliteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// Original-language text (Arabic, Hebrew, Sanskrit, ...)
    #[serde(alias = "arabic")]
    Original,
    English,
    EnglishTransliteration,
    Malayalam,
    MalayalamTransliteration,
    Tamil,
    TamilTransliteration,
}

impl Language {
    /// Every language, in display order
    pub const ALL: [Language; 7] = [
        Language::Original,
        Language::English,
        Language::EnglishTransliteration,
        Language::Malayalam,
        Language::MalayalamTransliteration,
        Language::Tamil,
        Language::TamilTransliteration,
    ];

    /// Stable tag used in URLs, storage and the JSON API
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Original => "original",
            Language::English => "english",
            Language::EnglishTransliteration => "english_transliteration",
            Language::Malayalam => "malayalam",
            Language::MalayalamTransliteration => "malayalam_transliteration",
            Language::Tamil => "tamil",
            Language::TamilTransliteration => "tamil_transliteration",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Language::Original => "Original",
            Language::English => "English Translation",
            Language::EnglishTransliteration => "English Transliteration",
            Language::Malayalam => "Malayalam Translation",
            Language::MalayalamTransliteration => "Malayalam Transliteration",
            Language::Tamil => "Tamil Translation",
            Language::TamilTransliteration => "Tamil Transliteration",
        }
    }

    /// The transliteration that accompanies a translation, if any
    pub fn transliteration(&self) -> Option<Language> {
        match self {
            Language::English => Some(Language::EnglishTransliteration),
            Language::Malayalam => Some(Language::MalayalamTransliteration),
            Language::Tamil => Some(Language::TamilTransliteration),
            _ => None,
        }
    }

    /// ISO 639-1 code of the script a transliteration is produced from
    pub fn iso_code(&self) -> Option<&'static str> {
        match self {
            Language::English | Language::EnglishTransliteration => Some("en"),
            Language::Malayalam | Language::MalayalamTransliteration => Some("ml"),
            Language::Tamil | Language::TamilTransliteration => Some("ta"),
            Language::Original => None,
        }
    }

    pub fn is_transliteration(&self) -> bool {
        matches!(
            self,
            Language::EnglishTransliteration
                | Language::MalayalamTransliteration
                | Language::TamilTransliteration
        )
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "original" | "arabic" => Ok(Language::Original),
            "english" => Ok(Language::English),
            "english_transliteration" => Ok(Language::EnglishTransliteration),
            "malayalam" => Ok(Language::Malayalam),
            "malayalam_transliteration" => Ok(Language::MalayalamTransliteration),
            "tamil" => Ok(Language::Tamil),
            "tamil_transliteration" => Ok(Language::TamilTransliteration),
            other => Err(format!("unknown language '{}'", other)),
        }
    }
}

/// Outcome of toggling a language in a [`LanguageSelection`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Toggle {
    Enabled,
    Disabled,
    /// The language was the last one selected and stays on
    Rejected,
}

/// Set of enabled display languages; never empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Language>", into = "Vec<Language>")]
pub struct LanguageSelection {
    enabled: BTreeSet<Language>,
}

impl LanguageSelection {
    /// A selection holding a single language
    pub fn only(language: Language) -> Self {
        Self {
            enabled: BTreeSet::from([language]),
        }
    }

    /// Build a selection from a list; `None` if the list is empty
    pub fn from_languages(languages: impl IntoIterator<Item = Language>) -> Option<Self> {
        let enabled: BTreeSet<Language> = languages.into_iter().collect();
        if enabled.is_empty() {
            None
        } else {
            Some(Self { enabled })
        }
    }

    /// Parse a comma-separated tag list such as `english,tamil`
    pub fn parse_list(list: &str) -> Result<Self, String> {
        let languages = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Language::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_languages(languages).ok_or_else(|| "at least one language is required".into())
    }

    /// Flip a language on or off, refusing to remove the last one
    pub fn toggle(&mut self, language: Language) -> Toggle {
        if self.enabled.contains(&language) {
            if self.enabled.len() == 1 {
                return Toggle::Rejected;
            }
            self.enabled.remove(&language);
            Toggle::Disabled
        } else {
            self.enabled.insert(language);
            Toggle::Enabled
        }
    }

    pub fn contains(&self, language: Language) -> bool {
        self.enabled.contains(&language)
    }

    /// Enabled languages in display order
    pub fn iter(&self) -> impl Iterator<Item = Language> + '_ {
        self.enabled.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enabled.is_empty()
    }
}

impl Default for LanguageSelection {
    fn default() -> Self {
        Self {
            enabled: BTreeSet::from([
                Language::Original,
                Language::English,
                Language::Malayalam,
                Language::Tamil,
            ]),
        }
    }
}

impl TryFrom<Vec<Language>> for LanguageSelection {
    type Error = String;

    fn try_from(value: Vec<Language>) -> Result<Self, Self::Error> {
        Self::from_languages(value).ok_or_else(|| "language selection cannot be empty".into())
    }
}

impl From<LanguageSelection> for Vec<Language> {
    fn from(selection: LanguageSelection) -> Self {
        selection.enabled.into_iter().collect()
    }
}
