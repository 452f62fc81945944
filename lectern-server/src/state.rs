//! Application state

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use lectern_core::catalog::{catalogs_from_config, Catalog, CatalogWriter};
use lectern_core::reader::{AutoPlay, BookmarkStore, Position, Reader, ReaderOptions};
use lectern_core::storage::{LocalStorage, StorageProvider};
use lectern_core::transliterate::TransliterationChain;
use lectern_core::Config;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,

    /// Catalog used for reading and exports
    pub catalog: Arc<dyn Catalog>,

    /// Backing store written by the importers
    pub writer: Arc<dyn CatalogWriter>,

    /// Storage for bookmarks
    pub storage: Arc<dyn StorageProvider>,

    pub transliterator: Arc<TransliterationChain>,

    /// Open reading sessions by id
    pub sessions: Arc<RwLock<HashMap<Uuid, Arc<Session>>>>,

    /// One bookmark store per text, shared by every session on it
    bookmark_stores: Arc<std::sync::Mutex<HashMap<String, BookmarkStore>>>,

    /// Channel for SSE events
    pub event_tx: broadcast::Sender<ServerEvent>,
}

/// One reader opened over the API
pub struct Session {
    pub id: Uuid,
    pub reader: Arc<Reader>,
    pub autoplay: Mutex<AutoPlay>,
    pub created_at: DateTime<Utc>,
    last_seen: std::sync::Mutex<Instant>,
}

impl Session {
    pub fn new(reader: Reader, autoplay_seconds: u64) -> Self {
        let reader = Arc::new(reader);
        Self {
            id: Uuid::new_v4(),
            autoplay: Mutex::new(AutoPlay::new(reader.clone()).with_speed(autoplay_seconds)),
            reader,
            created_at: Utc::now(),
            last_seen: std::sync::Mutex::new(Instant::now()),
        }
    }

    /// Mark the session as used by a client
    pub fn touch(&self) {
        *self.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    /// Time since a client last used the session
    pub fn idle_for(&self) -> Duration {
        self.last_seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }
}

/// Server-sent events
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// A text was imported or downloaded into the catalog
    TextImported { code: String, message: String },

    /// An import or download failed
    ImportFailed { code: String, message: String },
}

impl AppState {
    /// Create application state from the environment
    pub async fn new() -> Result<Self> {
        let config = Config::from_env().context("Failed to read configuration")?;

        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .with_context(|| format!("Failed to create {}", config.data_dir.display()))?;

        let catalogs = catalogs_from_config(&config).context("Failed to set up the catalog")?;
        match &config.database {
            Some(db) => tracing::info!("Using hosted catalog at {}", db.url),
            None => tracing::info!("Using local catalog in {}", config.data_dir.display()),
        }

        let storage = Arc::new(LocalStorage::new(&config.data_dir));
        let transliterator = TransliterationChain::from_config(&config);

        Ok(Self::from_parts(
            config,
            catalogs.reader,
            catalogs.writer,
            storage,
            transliterator,
        ))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        config: Config,
        catalog: Arc<dyn Catalog>,
        writer: Arc<dyn CatalogWriter>,
        storage: Arc<dyn StorageProvider>,
        transliterator: TransliterationChain,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            config: Arc::new(config),
            catalog,
            writer,
            storage,
            transliterator: Arc::new(transliterator),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            bookmark_stores: Arc::new(std::sync::Mutex::new(HashMap::new())),
            event_tx,
        }
    }

    /// Open a reader on `text_code` and register it as a session
    pub async fn open_session(&self, text_code: &str, start: Position) -> Arc<Session> {
        let reader = Reader::open_with_bookmarks(
            self.catalog.clone(),
            self.bookmark_store(text_code),
            start,
            ReaderOptions::from_config(&self.config),
        )
        .await;

        let session = Arc::new(Session::new(reader, self.config.autoplay_seconds));
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        tracing::debug!("Opened session {} on '{}'", session.id, text_code);
        session
    }

    /// Bookmark store of `text_code`, created on first use
    pub fn bookmark_store(&self, text_code: &str) -> BookmarkStore {
        self.bookmark_stores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(text_code.to_string())
            .or_insert_with(|| BookmarkStore::new(self.storage.clone(), text_code))
            .clone()
    }

    pub async fn session(&self, id: Uuid) -> Option<Arc<Session>> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Remove a session and stop its autoplay
    pub async fn close_session(&self, id: Uuid) -> Option<Arc<Session>> {
        let session = self.sessions.write().await.remove(&id)?;
        session.autoplay.lock().await.set_enabled(false);
        Some(session)
    }

    /// Close sessions unused for longer than `max_idle`
    ///
    /// Sessions with an open event stream are kept. Returns how many were
    /// closed.
    pub async fn sweep_idle_sessions(&self, max_idle: Duration) -> usize {
        let idle: Vec<Uuid> = self
            .sessions
            .read()
            .await
            .values()
            .filter(|s| s.reader.watcher_count() == 0 && s.idle_for() >= max_idle)
            .map(|s| s.id)
            .collect();

        let mut closed = 0;
        for id in idle {
            if self.close_session(id).await.is_some() {
                tracing::debug!("Closed idle session {}", id);
                closed += 1;
            }
        }
        closed
    }

    /// Periodically close idle sessions
    pub fn spawn_session_sweeper(&self, max_idle: Duration) -> JoinHandle<()> {
        let state = self.clone();
        let period = max_idle.clamp(Duration::from_secs(1), Duration::from_secs(60));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let closed = state.sweep_idle_sessions(max_idle).await;
                if closed > 0 {
                    tracing::info!("Closed {} idle sessions", closed);
                }
            }
        })
    }

    /// Subscribe to server events
    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.event_tx.subscribe()
    }

    /// Broadcast an event
    pub fn broadcast(&self, event: ServerEvent) {
        // Ignore errors (no subscribers)
        let _ = self.event_tx.send(event);
    }
}
