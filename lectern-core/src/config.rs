//! Runtime configuration read from `LECTERN_*` environment variables

use crate::error::LecternError;
use std::path::PathBuf;
use std::time::Duration;

/// Default presentation delay of a page turn
pub const DEFAULT_PAGE_TURN_DELAY: Duration = Duration::from_millis(500);

/// Default seconds between autoplay page turns
pub const DEFAULT_AUTOPLAY_SECONDS: u64 = 5;

/// Connection settings for the hosted PostgREST-style store
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    pub url: String,

    /// Anonymous or service key sent as `apikey` and bearer token
    pub key: String,
}

/// Settings shared by the CLI and the server
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Hosted store; the local data directory is used when unset
    pub database: Option<DatabaseConfig>,

    /// Directory for the offline catalog and bookmarks
    pub data_dir: PathBuf,

    pub page_turn_delay: Duration,

    pub autoplay_seconds: u64,

    /// Read the Quran from the public Quran API instead of the catalog
    pub quran_api: bool,

    /// Optional external transliteration service, tried before the built-in tables
    pub transliteration_url: Option<String>,

    pub bible_api_key: Option<String>,

    pub gita_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            data_dir: PathBuf::from("./lectern_data"),
            page_turn_delay: DEFAULT_PAGE_TURN_DELAY,
            autoplay_seconds: DEFAULT_AUTOPLAY_SECONDS,
            quran_api: true,
            transliteration_url: None,
            bible_api_key: None,
            gita_api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, LecternError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LecternError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Config::default();

        match (get("LECTERN_DATABASE_URL"), get("LECTERN_DATABASE_KEY")) {
            (Some(url), Some(key)) => {
                config.database = Some(DatabaseConfig {
                    url: url.trim_end_matches('/').to_string(),
                    key,
                })
            }
            (Some(_), None) => {
                return Err(LecternError::Config(
                    "LECTERN_DATABASE_URL is set but LECTERN_DATABASE_KEY is missing".into(),
                ))
            }
            _ => {}
        }

        if let Some(dir) = get("LECTERN_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Some(ms) = get("LECTERN_PAGE_TURN_DELAY_MS") {
            let ms: u64 = ms.parse().map_err(|_| {
                LecternError::Config(format!("LECTERN_PAGE_TURN_DELAY_MS: '{}' is not a number", ms))
            })?;
            config.page_turn_delay = Duration::from_millis(ms);
        }

        if let Some(secs) = get("LECTERN_AUTOPLAY_SECONDS") {
            config.autoplay_seconds = secs.parse().map_err(|_| {
                LecternError::Config(format!("LECTERN_AUTOPLAY_SECONDS: '{}' is not a number", secs))
            })?;
        }

        if let Some(flag) = get("LECTERN_QURAN_API") {
            config.quran_api = !matches!(flag.to_lowercase().as_str(), "0" | "off" | "false" | "no");
        }

        config.transliteration_url = get("LECTERN_TRANSLITERATION_URL");
        config.bible_api_key = get("LECTERN_BIBLE_API_KEY");
        config.gita_api_key = get("LECTERN_GITA_API_KEY");

        Ok(config)
    }
}
