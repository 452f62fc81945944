//! Client for an external transliteration service
//!
//! The service receives `{"text": .., "language": "ml"}` and answers with
//! `{"transliteration": ..}`.

use super::Transliterator;
use crate::error::TransliterationError;
use crate::types::Language;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct Request<'a> {
    text: &'a str,
    language: &'a str,
}

#[derive(Deserialize)]
struct Response {
    #[serde(alias = "result")]
    transliteration: String,
}

pub struct HttpTransliterator {
    client: reqwest::Client,
    url: String,
}

impl HttpTransliterator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl Transliterator for HttpTransliterator {
    async fn transliterate(
        &self,
        text: &str,
        language: Language,
    ) -> Result<String, TransliterationError> {
        let iso = language
            .iso_code()
            .ok_or_else(|| TransliterationError::UnsupportedLanguage(language.to_string()))?;

        let response = self
            .client
            .post(&self.url)
            .json(&Request {
                text,
                language: iso,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TransliterationError::Service(format!(
                "{} returned {}",
                self.url,
                response.status()
            )));
        }

        let body: Response = response.json().await?;
        Ok(body.transliteration)
    }

    fn name(&self) -> &str {
        "http"
    }
}
