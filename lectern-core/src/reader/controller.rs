//! The pagination controller
//!
//! A [`Reader`] owns the reading position within one text. Page turns are
//! debounced by a transition flag: while a turn is in flight every other turn
//! is ignored. Chapter loads carry a request token so a slow fetch cannot
//! overwrite the result of a newer navigation.

use super::bookmarks::{self, Bookmark, BookmarkStore};
use super::position::{Direction, Pagination, Position, Step, VerseTarget};
use super::view::{PageView, VerseView};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::storage::StorageProvider;
use crate::types::{Chapter, HolyText, Language, LanguageSelection, Toggle, Verse};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Settings of a reader session
#[derive(Debug, Clone)]
pub struct ReaderOptions {
    /// Presentation delay applied before a page turn takes effect
    pub page_turn_delay: Duration,

    pub languages: LanguageSelection,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            page_turn_delay: crate::config::DEFAULT_PAGE_TURN_DELAY,
            languages: LanguageSelection::default(),
        }
    }
}

impl ReaderOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            page_turn_delay: config.page_turn_delay,
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.page_turn_delay = delay;
        self
    }

    pub fn with_languages(mut self, languages: LanguageSelection) -> Self {
        self.languages = languages;
        self
    }
}

/// Result of a page turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Another turn was in flight
    Ignored,
    /// Moved within the current chapter
    Moved,
    /// Crossed into another chapter
    ChapterChanged,
    StartOfText,
    EndOfText,
    /// No verses are loaded for the current chapter
    NoVerses,
    /// The neighbouring chapter could not be fetched; the page is unchanged
    LoadFailed,
    /// A newer navigation replaced this turn's chapter load
    Superseded,
}

impl TurnOutcome {
    pub fn moved(self) -> bool {
        matches!(self, TurnOutcome::Moved | TurnOutcome::ChapterChanged)
    }
}

struct ReaderState {
    pagination: Pagination,
    verses: Vec<Verse>,
    languages: LanguageSelection,
    bookmarks: Vec<Bookmark>,
    /// The last chapter fetch failed and nothing has been shown since
    load_failed: bool,
}

/// What became of a chapter load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Load {
    Installed,
    Stale,
    Failed,
}

/// What a failed fetch does to the displayed chapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnFailure {
    /// Keep the current chapter and position
    Stay,
    /// Show the requested chapter with no verses
    Clear,
}

/// Clears the transition flag when the turn completes or is dropped
struct TransitionGuard<'a>(&'a AtomicBool);

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Pagination controller for one text
pub struct Reader {
    catalog: Arc<dyn Catalog>,
    bookmark_store: BookmarkStore,
    text_code: String,
    chapters: Vec<Chapter>,
    delay: Duration,
    state: Mutex<ReaderState>,
    transitioning: AtomicBool,
    generation: AtomicU64,
    positions: watch::Sender<Position>,
}

impl Reader {
    /// Open `text_code` at `start`, loading the chapter list, bookmarks and
    /// the starting chapter's verses
    pub async fn open(
        catalog: Arc<dyn Catalog>,
        storage: Arc<dyn StorageProvider>,
        text_code: &str,
        start: Position,
        options: ReaderOptions,
    ) -> Self {
        let store = BookmarkStore::new(storage, text_code);
        Self::open_with_bookmarks(catalog, store, start, options).await
    }

    /// Open the text a [`BookmarkStore`] belongs to
    ///
    /// Readers opened on clones of one store serialize their bookmark writes.
    pub async fn open_with_bookmarks(
        catalog: Arc<dyn Catalog>,
        bookmark_store: BookmarkStore,
        start: Position,
        options: ReaderOptions,
    ) -> Self {
        let code = bookmark_store.text_code().to_string();
        let text_code = code.as_str();
        let chapters = match catalog.fetch_chapter_list(text_code).await {
            Ok(chapters) => chapters,
            Err(e) => {
                tracing::warn!("Failed to fetch chapters of '{}': {}", text_code, e);
                Vec::new()
            }
        };
        let last_chapter = chapters
            .iter()
            .map(|c| c.number)
            .max()
            .or_else(|| HolyText::well_known(text_code).and_then(|t| t.total_chapters))
            .unwrap_or(start.chapter)
            .max(1);

        let bookmarks = match bookmark_store.load().await {
            Ok(b) => b,
            Err(e) => {
                tracing::warn!("Failed to load bookmarks for '{}': {}", text_code, e);
                Vec::new()
            }
        };

        let pagination = Pagination::new(start.chapter, last_chapter);
        let (positions, _) = watch::channel(pagination.position());

        let reader = Self {
            catalog,
            bookmark_store,
            text_code: text_code.to_string(),
            chapters,
            delay: options.page_turn_delay,
            state: Mutex::new(ReaderState {
                pagination,
                verses: Vec::new(),
                languages: options.languages,
                bookmarks,
                load_failed: false,
            }),
            transitioning: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            positions,
        };

        let chapter = reader.lock().pagination.chapter();
        reader
            .load_chapter(chapter, VerseTarget::Index(start.verse), OnFailure::Clear)
            .await;
        reader
    }

    fn lock(&self) -> MutexGuard<'_, ReaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, position: Position) {
        self.positions.send_replace(position);
    }

    pub fn text_code(&self) -> &str {
        &self.text_code
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter_info(&self, number: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.number == number)
    }

    pub fn position(&self) -> Position {
        self.lock().pagination.position()
    }

    pub fn last_chapter(&self) -> u32 {
        self.lock().pagination.last_chapter()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning.load(Ordering::Acquire)
    }

    /// Follow every applied position change
    pub fn subscribe(&self) -> watch::Receiver<Position> {
        self.positions.subscribe()
    }

    /// Number of live [`subscribe`](Self::subscribe) receivers
    pub fn watcher_count(&self) -> usize {
        self.positions.receiver_count()
    }

    /// Whether the last chapter fetch failed; cleared by the next page shown
    pub fn load_failed(&self) -> bool {
        self.lock().load_failed
    }

    /// Verses of the current chapter
    pub fn verses(&self) -> Vec<Verse> {
        self.lock().verses.clone()
    }

    pub fn current_verse(&self) -> Option<Verse> {
        let state = self.lock();
        let index = state.pagination.verse_index() as usize;
        state.verses.get(index - 1).cloned()
    }

    /// Fetch a chapter and install it unless a newer load started meanwhile
    async fn load_chapter(&self, chapter: u32, target: VerseTarget, on_failure: OnFailure) -> Load {
        let token = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let fetched = self.catalog.fetch_verses(&self.text_code, chapter).await;

        let (load, position) = {
            let mut state = self.lock();
            if self.generation.load(Ordering::Acquire) != token {
                tracing::debug!(
                    "Discarding stale verses for {} chapter {}",
                    self.text_code,
                    chapter
                );
                return Load::Stale;
            }
            match fetched {
                Ok(verses) => {
                    let count = verses.len() as u32;
                    state.verses = verses;
                    state.load_failed = false;
                    state.pagination.install(chapter, count, target);
                    (Load::Installed, Some(state.pagination.position()))
                }
                Err(e) => {
                    tracing::warn!(
                        "Failed to fetch verses for {} chapter {}: {}",
                        self.text_code,
                        chapter,
                        e
                    );
                    state.load_failed = true;
                    match on_failure {
                        OnFailure::Stay => (Load::Failed, None),
                        OnFailure::Clear => {
                            state.verses = Vec::new();
                            state.pagination.install(chapter, 0, target);
                            (Load::Failed, Some(state.pagination.position()))
                        }
                    }
                }
            }
        };

        if let Some(position) = position {
            tracing::debug!("Loaded {} at {}", self.text_code, position);
            self.publish(position);
        }
        load
    }

    /// Turn one page forward or backward
    ///
    /// Ignored while another turn is in flight. The move takes effect after
    /// the presentation delay; crossing a chapter boundary loads the new
    /// chapter before the position changes.
    pub async fn turn_page(&self, direction: Direction) -> TurnOutcome {
        if self.transitioning.swap(true, Ordering::AcqRel) {
            return TurnOutcome::Ignored;
        }
        let _guard = TransitionGuard(&self.transitioning);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let (step, position) = {
            let mut state = self.lock();
            let step = state.pagination.plan_turn(direction);
            if let Step::Within(index) = step {
                state.pagination.select(VerseTarget::Index(index));
                state.load_failed = false;
            }
            (step, state.pagination.position())
        };

        match step {
            Step::Within(_) => {
                self.publish(position);
                TurnOutcome::Moved
            }
            Step::Chapter { chapter, target } => {
                match self.load_chapter(chapter, target, OnFailure::Stay).await {
                    Load::Installed => TurnOutcome::ChapterChanged,
                    Load::Stale => TurnOutcome::Superseded,
                    Load::Failed => TurnOutcome::LoadFailed,
                }
            }
            Step::StartOfText => TurnOutcome::StartOfText,
            Step::EndOfText => TurnOutcome::EndOfText,
            Step::NoVerses => TurnOutcome::NoVerses,
        }
    }

    /// Jump to a position, loading its chapter when it is not the current one
    pub async fn go_to(&self, chapter: u32, verse: u32) -> Position {
        let target = VerseTarget::Index(verse);
        let in_place = {
            let mut state = self.lock();
            let chapter = state.pagination.clamp_chapter(chapter);
            if chapter == state.pagination.chapter() && !state.verses.is_empty() {
                // Invalidate any load still in flight for another chapter
                self.generation.fetch_add(1, Ordering::AcqRel);
                state.pagination.select(target);
                state.load_failed = false;
                Some(state.pagination.position())
            } else {
                None
            }
        };

        match in_place {
            Some(position) => {
                self.publish(position);
                position
            }
            None => {
                let chapter = self.lock().pagination.clamp_chapter(chapter);
                self.load_chapter(chapter, target, OnFailure::Clear).await;
                self.position()
            }
        }
    }

    /// Re-fetch the current chapter, keeping the verse index where possible
    pub async fn reload(&self) -> Position {
        let current = self.position();
        self.load_chapter(
            current.chapter,
            VerseTarget::Index(current.verse),
            OnFailure::Clear,
        )
        .await;
        self.position()
    }

    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.lock().bookmarks.clone()
    }

    pub fn is_bookmarked(&self) -> bool {
        let state = self.lock();
        let current = Bookmark::from(state.pagination.position());
        state.bookmarks.contains(&current)
    }

    /// Toggle a bookmark on the current verse and persist the list
    ///
    /// The toggle is applied to the stored list, so bookmarks written by other
    /// readers of the same text are kept. Returns whether the verse is now
    /// bookmarked. When storage fails the toggle only applies to this reader.
    pub async fn toggle_bookmark(&self) -> bool {
        let current = Bookmark::from(self.position());

        match self.bookmark_store.toggle(current).await {
            Ok((added, stored)) => {
                self.lock().bookmarks = stored;
                added
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to persist bookmarks under '{}': {}",
                    self.bookmark_store.key(),
                    e
                );
                bookmarks::toggle(&mut self.lock().bookmarks, current)
            }
        }
    }

    /// Re-read the stored bookmark list, picking up other readers' changes
    pub async fn reload_bookmarks(&self) -> Vec<Bookmark> {
        match self.bookmark_store.load().await {
            Ok(stored) => {
                self.lock().bookmarks = stored.clone();
                stored
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load bookmarks under '{}': {}",
                    self.bookmark_store.key(),
                    e
                );
                self.bookmarks()
            }
        }
    }

    pub fn languages(&self) -> LanguageSelection {
        self.lock().languages.clone()
    }

    /// Flip a language; deselecting the last one is rejected
    pub fn toggle_language(&self, language: Language) -> Toggle {
        self.lock().languages.toggle(language)
    }

    pub fn set_languages(&self, languages: LanguageSelection) {
        self.lock().languages = languages;
    }

    /// Snapshot of the current page
    pub fn page(&self) -> PageView {
        let state = self.lock();
        let position = state.pagination.position();
        let verse = state
            .verses
            .get(position.verse as usize - 1)
            .map(|v| VerseView::render(v, &state.languages));

        PageView {
            text_code: self.text_code.clone(),
            position,
            chapter: self.chapter_info(position.chapter).cloned(),
            page: if state.verses.is_empty() { 0 } else { position.verse },
            total_pages: state.verses.len() as u32,
            last_chapter: state.pagination.last_chapter(),
            verse,
            bookmarked: state.bookmarks.contains(&Bookmark::from(position)),
            languages: state.languages.iter().collect(),
            transitioning: self.is_transitioning(),
            load_failed: state.load_failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogWriter, StoredCatalog};
    use crate::storage::MemoryStorage;

    async fn seeded(counts: &[u32]) -> Arc<StoredCatalog> {
        let catalog = Arc::new(StoredCatalog::new(Arc::new(MemoryStorage::new())));
        for (i, count) in counts.iter().enumerate() {
            let chapter = i as u32 + 1;
            catalog
                .upsert_chapter(&Chapter::new("gita", chapter, format!("Chapter {}", chapter)))
                .await
                .unwrap();
            let verses: Vec<Verse> = (1..=*count)
                .map(|v| Verse::new("gita", chapter, v, format!("{}.{}", chapter, v)))
                .collect();
            catalog.upsert_verses(&verses).await.unwrap();
        }
        catalog
    }

    async fn reader(counts: &[u32], start: Position) -> Reader {
        Reader::open(
            seeded(counts).await,
            Arc::new(MemoryStorage::new()),
            "gita",
            start,
            ReaderOptions::default().with_delay(Duration::ZERO),
        )
        .await
    }

    #[tokio::test]
    async fn test_open_clamps_start() {
        let reader = reader(&[3, 4], Position::new(9, 99)).await;
        assert_eq!(reader.position(), Position::new(2, 4));
        assert_eq!(reader.last_chapter(), 2);
    }

    #[tokio::test]
    async fn test_turns_across_chapters() {
        let reader = reader(&[2, 3], Position::new(1, 2)).await;

        assert_eq!(reader.turn_page(Direction::Forward).await, TurnOutcome::ChapterChanged);
        assert_eq!(reader.position(), Position::new(2, 1));

        assert_eq!(reader.turn_page(Direction::Backward).await, TurnOutcome::ChapterChanged);
        assert_eq!(reader.position(), Position::new(1, 2));
        assert_eq!(reader.current_verse().unwrap().original, "1.2");
    }

    #[tokio::test]
    async fn test_turn_ignored_while_transitioning() {
        let reader = Reader::open(
            seeded(&[5]).await,
            Arc::new(MemoryStorage::new()),
            "gita",
            Position::default(),
            ReaderOptions::default().with_delay(Duration::from_millis(50)),
        )
        .await;

        let (first, second) = tokio::join!(
            reader.turn_page(Direction::Forward),
            reader.turn_page(Direction::Forward)
        );
        assert_eq!(first, TurnOutcome::Moved);
        assert_eq!(second, TurnOutcome::Ignored);
        assert_eq!(reader.position(), Position::new(1, 2));
        assert!(!reader.is_transitioning());
    }

    #[tokio::test]
    async fn test_empty_chapter_does_not_advance() {
        let reader = reader(&[0, 2], Position::default()).await;
        assert_eq!(reader.turn_page(Direction::Forward).await, TurnOutcome::NoVerses);
        assert_eq!(reader.position(), Position::new(1, 1));
        assert!(reader.page().verse.is_none());
        assert_eq!(reader.page().page, 0);
    }

    #[tokio::test]
    async fn test_bookmark_toggle_and_page() {
        let storage = Arc::new(MemoryStorage::new());
        let reader = Reader::open(
            seeded(&[3]).await,
            storage.clone(),
            "gita",
            Position::new(1, 2),
            ReaderOptions::default().with_delay(Duration::ZERO),
        )
        .await;

        assert!(reader.toggle_bookmark().await);
        assert!(reader.page().bookmarked);
        let stored = storage.read("gita-bookmarks").await.unwrap();
        assert_eq!(serde_json::from_slice::<Vec<String>>(&stored).unwrap(), vec!["1:2"]);

        assert!(!reader.toggle_bookmark().await);
        assert!(reader.bookmarks().is_empty());
    }

    #[tokio::test]
    async fn test_go_to_and_languages() {
        let reader = reader(&[3, 5], Position::default()).await;
        let mut positions = reader.subscribe();

        assert_eq!(reader.go_to(2, 4).await, Position::new(2, 4));
        assert!(positions.has_changed().unwrap());
        assert_eq!(*positions.borrow_and_update(), Position::new(2, 4));

        assert_eq!(reader.go_to(2, 0).await, Position::new(2, 1));

        let only = LanguageSelection::only(Language::Original);
        reader.set_languages(only);
        assert_eq!(reader.toggle_language(Language::Original), Toggle::Rejected);
        assert_eq!(reader.toggle_language(Language::English), Toggle::Enabled);
    }
}
