//! Best-effort transliteration of Malayalam and Tamil translations
//!
//! Backends are tried in order; when every backend fails the verse gets a
//! placeholder carrying the untransliterated translation. Placeholders are
//! recognised on the next enrichment and retried.

mod http;
mod indic;

pub use http::HttpTransliterator;
pub use indic::IndicTransliterator;

use crate::config::Config;
use crate::error::TransliterationError;
use crate::types::{Language, Verse};
use async_trait::async_trait;

/// Marker prefixed to translations that could not be transliterated
pub const PLACEHOLDER_MARKER: &str = "[Transliteration not available]";

/// Languages whose transliteration is generated rather than fetched
const GENERATED: [Language; 2] = [Language::Malayalam, Language::Tamil];

/// A single transliteration backend
#[async_trait]
pub trait Transliterator: Send + Sync {
    /// Transliterate `text` written in `language` into Latin script
    async fn transliterate(
        &self,
        text: &str,
        language: Language,
    ) -> Result<String, TransliterationError>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Placeholder stored when no backend could transliterate `translation`
pub fn placeholder(translation: &str) -> String {
    format!("{} {}", PLACEHOLDER_MARKER, translation)
}

/// Ordered list of backends, falling through to a placeholder
pub struct TransliterationChain {
    backends: Vec<Box<dyn Transliterator>>,
}

impl TransliterationChain {
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Append a backend to the end of the chain
    pub fn with(mut self, backend: impl Transliterator + 'static) -> Self {
        self.backends.push(Box::new(backend));
        self
    }

    /// The configured service (if any) followed by the built-in tables
    pub fn from_config(config: &Config) -> Self {
        let mut chain = Self::new();
        if let Some(url) = &config.transliteration_url {
            chain = chain.with(HttpTransliterator::new(url));
        }
        chain.with(IndicTransliterator)
    }

    /// Transliterate with the first backend that succeeds, or return the placeholder
    pub async fn transliterate(&self, text: &str, language: Language) -> String {
        for backend in &self.backends {
            match backend.transliterate(text, language).await {
                Ok(result) if !result.trim().is_empty() => return result,
                Ok(_) => tracing::debug!("{} returned an empty transliteration", backend.name()),
                Err(e) => tracing::debug!("{} could not transliterate: {}", backend.name(), e),
            }
        }
        tracing::warn!("No transliteration available for {} text", language.label());
        placeholder(text)
    }

    /// Fill missing or placeholder Malayalam/Tamil transliterations
    ///
    /// Returns the number of transliterations written.
    pub async fn enrich_verses(&self, verses: &mut [Verse]) -> usize {
        let mut written = 0;
        for verse in verses.iter_mut() {
            for language in GENERATED {
                let Some(target) = language.transliteration() else {
                    continue;
                };
                let Some(translation) = verse.text(language).map(str::to_string) else {
                    continue;
                };
                let needs_work = verse
                    .text(target)
                    .map_or(true, |existing| existing.contains(PLACEHOLDER_MARKER));
                if needs_work {
                    let result = self.transliterate(&translation, language).await;
                    verse.set_translation(target, result);
                    written += 1;
                }
            }
        }
        written
    }
}

impl Default for TransliterationChain {
    fn default() -> Self {
        Self::new().with(IndicTransliterator)
    }
}
