//! Behavioral tests for the reader
//!
//! Pagination invariants are checked with proptest against the pure
//! `Pagination` state machine; the async controller and autoplay run on a
//! paused tokio clock so timer behavior is deterministic.

use async_trait::async_trait;
use lectern_core::catalog::{Catalog, CatalogResult, CatalogWriter, StoredCatalog};
use lectern_core::error::CatalogError;
use lectern_core::reader::{
    AutoPlay, BookmarkStore, Direction, Pagination, Position, Reader, ReaderOptions, Step,
    TurnOutcome, VerseTarget,
};
use lectern_core::storage::MemoryStorage;
use lectern_core::types::{Chapter, HolyText, Verse};
use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// Fixtures
// =============================================================================

async fn catalog(code: &str, counts: &[u32]) -> Arc<StoredCatalog> {
    let catalog = Arc::new(StoredCatalog::new(Arc::new(MemoryStorage::new())));
    catalog.upsert_text(&HolyText::new(code, code)).await.unwrap();
    for (i, count) in counts.iter().enumerate() {
        let chapter = i as u32 + 1;
        catalog
            .upsert_chapter(
                &Chapter::new(code, chapter, format!("Chapter {}", chapter))
                    .with_verses_count(*count),
            )
            .await
            .unwrap();
        let verses: Vec<Verse> = (1..=*count)
            .map(|v| Verse::new(code, chapter, v, format!("{}:{}", chapter, v)))
            .collect();
        catalog.upsert_verses(&verses).await.unwrap();
    }
    catalog
}

async fn open(counts: &[u32], start: Position) -> Arc<Reader> {
    Arc::new(
        Reader::open(
            catalog("quran", counts).await,
            Arc::new(MemoryStorage::new()),
            "quran",
            start,
            ReaderOptions::default().with_delay(Duration::ZERO),
        )
        .await,
    )
}

/// Apply a planned step the way the controller does, using known verse counts
fn apply(p: &mut Pagination, step: Step, counts: &[u32]) {
    match step {
        Step::Within(index) => p.select(VerseTarget::Index(index)),
        Step::Chapter { chapter, target } => {
            p.install(chapter, counts[chapter as usize - 1], target)
        }
        _ => {}
    }
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Forward), Just(Direction::Backward)]
}

// =============================================================================
// Pagination properties
// =============================================================================

proptest! {
    #[test]
    fn verse_index_stays_in_range(
        counts in prop::collection::vec(1u32..15, 1..8),
        turns in prop::collection::vec(direction(), 0..60),
    ) {
        let mut p = Pagination::new(1, counts.len() as u32);
        p.install(1, counts[0], VerseTarget::First);

        for turn in turns {
            let step = p.plan_turn(turn);
            apply(&mut p, step, &counts);
            let count = counts[p.chapter() as usize - 1];
            prop_assert!(p.verse_index() >= 1);
            prop_assert!(p.verse_index() <= count);
            prop_assert!(p.chapter() >= 1 && p.chapter() <= counts.len() as u32);
        }
    }

    #[test]
    fn forward_then_backward_returns(
        counts in prop::collection::vec(1u32..15, 1..8),
        chapter_seed in any::<prop::sample::Index>(),
        verse_seed in any::<prop::sample::Index>(),
    ) {
        let chapter = chapter_seed.index(counts.len()) as u32 + 1;
        let verse = verse_seed.index(counts[chapter as usize - 1] as usize) as u32 + 1;
        let mut p = Pagination::new(chapter, counts.len() as u32);
        p.install(chapter, counts[chapter as usize - 1], VerseTarget::Index(verse));
        let before = p.position();

        let step = p.plan_turn(Direction::Forward);
        prop_assume!(step != Step::EndOfText);
        apply(&mut p, step, &counts);
        let step = p.plan_turn(Direction::Backward);
        apply(&mut p, step, &counts);

        prop_assert_eq!(p.position(), before);
    }

    #[test]
    fn reclamp_after_load(count in 0u32..50, requested in 0u32..100) {
        let mut p = Pagination::new(1, 1);
        p.install(1, count, VerseTarget::Index(requested));
        prop_assert!(p.verse_index() >= 1);
        prop_assert!(p.verse_index() <= count.max(1));
    }
}

#[test]
fn test_second_chapter_last_verse_forward() {
    let mut p = Pagination::new(2, 114);
    p.install(2, 5, VerseTarget::Index(5));
    let step = p.plan_turn(Direction::Forward);
    apply(&mut p, step, &[7, 5, 9]);
    assert_eq!(p.position(), Position::new(3, 1));
}

// =============================================================================
// Controller
// =============================================================================

#[tokio::test]
async fn test_bounds_of_text_are_unchanged() {
    let reader = open(&[3, 2], Position::new(1, 1)).await;
    assert_eq!(reader.turn_page(Direction::Backward).await, TurnOutcome::StartOfText);
    assert_eq!(reader.position(), Position::new(1, 1));

    reader.go_to(2, 2).await;
    assert_eq!(reader.turn_page(Direction::Forward).await, TurnOutcome::EndOfText);
    assert_eq!(reader.position(), Position::new(2, 2));
}

#[tokio::test]
async fn test_backward_lands_on_last_verse_of_previous_chapter() {
    let reader = open(&[7, 4], Position::new(2, 1)).await;
    let mut positions = reader.subscribe();

    assert_eq!(reader.turn_page(Direction::Backward).await, TurnOutcome::ChapterChanged);
    assert_eq!(reader.position(), Position::new(1, 7));
    assert_eq!(*positions.borrow_and_update(), Position::new(1, 7));
    assert_eq!(reader.page().total_pages, 7);
    assert_eq!(reader.current_verse().unwrap().original, "1:7");
}

#[tokio::test]
async fn test_page_turn_waits_for_presentation_delay() {
    tokio::time::pause();
    let reader = Reader::open(
        catalog("quran", &[5]).await,
        Arc::new(MemoryStorage::new()),
        "quran",
        Position::default(),
        ReaderOptions::default(),
    )
    .await;

    let start = tokio::time::Instant::now();
    assert_eq!(reader.turn_page(Direction::Forward).await, TurnOutcome::Moved);
    assert!(start.elapsed() >= Duration::from_millis(500));
    assert_eq!(reader.position(), Position::new(1, 2));
}

/// Catalog whose chapter 2 answers slowly
struct SlowCatalog {
    inner: Arc<StoredCatalog>,
}

#[async_trait]
impl Catalog for SlowCatalog {
    async fn fetch_texts(&self) -> CatalogResult<Vec<HolyText>> {
        self.inner.fetch_texts().await
    }

    async fn fetch_chapter_list(&self, text_code: &str) -> CatalogResult<Vec<Chapter>> {
        self.inner.fetch_chapter_list(text_code).await
    }

    async fn fetch_verses(&self, text_code: &str, chapter: u32) -> CatalogResult<Vec<Verse>> {
        if chapter == 2 {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        self.inner.fetch_verses(text_code, chapter).await
    }
}

#[tokio::test(start_paused = true)]
async fn test_stale_chapter_load_is_discarded() {
    let slow = Arc::new(SlowCatalog {
        inner: catalog("quran", &[3, 4, 5]).await,
    });
    let reader = Reader::open(
        slow,
        Arc::new(MemoryStorage::new()),
        "quran",
        Position::default(),
        ReaderOptions::default().with_delay(Duration::ZERO),
    )
    .await;

    let (slow_result, fast_result) = tokio::join!(reader.go_to(2, 1), reader.go_to(3, 5));

    assert_eq!(fast_result, Position::new(3, 5));
    assert_eq!(slow_result, Position::new(3, 5));
    assert_eq!(reader.position(), Position::new(3, 5));
    assert_eq!(reader.page().total_pages, 5);
}

#[tokio::test(start_paused = true)]
async fn test_turn_superseded_by_newer_navigation() {
    let slow = Arc::new(SlowCatalog {
        inner: catalog("quran", &[3, 4, 5]).await,
    });
    let reader = Reader::open(
        slow,
        Arc::new(MemoryStorage::new()),
        "quran",
        Position::new(1, 3),
        ReaderOptions::default().with_delay(Duration::ZERO),
    )
    .await;

    let (outcome, _) = tokio::join!(reader.turn_page(Direction::Forward), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        reader.go_to(3, 2).await
    });

    assert_eq!(outcome, TurnOutcome::Superseded);
    assert_eq!(reader.position(), Position::new(3, 2));
}

/// Catalog whose chapter 2 cannot be fetched
struct FailingCatalog {
    inner: Arc<StoredCatalog>,
}

#[async_trait]
impl Catalog for FailingCatalog {
    async fn fetch_texts(&self) -> CatalogResult<Vec<HolyText>> {
        self.inner.fetch_texts().await
    }

    async fn fetch_chapter_list(&self, text_code: &str) -> CatalogResult<Vec<Chapter>> {
        self.inner.fetch_chapter_list(text_code).await
    }

    async fn fetch_verses(&self, text_code: &str, chapter: u32) -> CatalogResult<Vec<Verse>> {
        if chapter == 2 {
            return Err(CatalogError::Request("connection reset".into()));
        }
        self.inner.fetch_verses(text_code, chapter).await
    }
}

async fn open_failing(start: Position) -> Reader {
    let failing = Arc::new(FailingCatalog {
        inner: catalog("quran", &[3, 3, 3]).await,
    });
    Reader::open(
        failing,
        Arc::new(MemoryStorage::new()),
        "quran",
        start,
        ReaderOptions::default().with_delay(Duration::ZERO),
    )
    .await
}

#[tokio::test]
async fn test_failed_chapter_fetch_keeps_current_page() {
    let reader = open_failing(Position::new(1, 3)).await;
    assert!(!reader.page().load_failed);

    assert_eq!(reader.turn_page(Direction::Forward).await, TurnOutcome::LoadFailed);
    assert_eq!(reader.position(), Position::new(1, 3));
    let page = reader.page();
    assert!(page.load_failed);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.verse.unwrap().number, 3);

    // Still free to move within the chapter that is loaded
    assert_eq!(reader.turn_page(Direction::Backward).await, TurnOutcome::Moved);
    assert_eq!(reader.position(), Position::new(1, 2));
    assert!(!reader.load_failed());
}

#[tokio::test]
async fn test_failed_jump_shows_empty_chapter_with_error() {
    let reader = open_failing(Position::new(3, 1)).await;

    assert_eq!(reader.go_to(2, 2).await, Position::new(2, 1));
    let page = reader.page();
    assert!(page.load_failed);
    assert!(page.verse.is_none());
    assert_eq!(reader.turn_page(Direction::Forward).await, TurnOutcome::NoVerses);

    reader.reload().await;
    assert!(reader.load_failed());

    assert_eq!(reader.go_to(1, 2).await, Position::new(1, 2));
    assert!(!reader.page().load_failed);
}

#[tokio::test]
async fn test_bookmarks_from_two_readers_are_merged() {
    let storage = Arc::new(MemoryStorage::new());
    let texts = catalog("quran", &[3]).await;
    let store = BookmarkStore::new(storage.clone(), "quran");
    let options = ReaderOptions::default().with_delay(Duration::ZERO);

    let first = Reader::open_with_bookmarks(
        texts.clone(),
        store.clone(),
        Position::new(1, 1),
        options.clone(),
    )
    .await;
    let second = Reader::open(texts, storage, "quran", Position::new(1, 2), options).await;

    assert!(first.toggle_bookmark().await);
    assert!(second.toggle_bookmark().await);

    let stored: Vec<String> = store.load().await.unwrap().iter().map(|b| b.to_string()).collect();
    assert_eq!(stored, vec!["1:1", "1:2"]);
    assert_eq!(second.bookmarks().len(), 2);
    assert_eq!(first.reload_bookmarks().await.len(), 2);
}

// =============================================================================
// Autoplay
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_autoplay_turns_every_interval() {
    let reader = open(&[5], Position::default()).await;
    let mut autoplay = AutoPlay::new(reader.clone()).with_speed(2);
    autoplay.set_enabled(true);

    tokio::time::sleep(Duration::from_millis(2100)).await;
    assert_eq!(reader.position(), Position::new(1, 2));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(reader.position(), Position::new(1, 3));
}

#[tokio::test(start_paused = true)]
async fn test_disabling_autoplay_cancels_pending_turn() {
    let reader = open(&[5], Position::default()).await;
    let mut autoplay = AutoPlay::new(reader.clone()).with_speed(1);
    autoplay.set_enabled(true);

    tokio::time::sleep(Duration::from_millis(500)).await;
    autoplay.set_enabled(false);
    assert!(!autoplay.is_enabled());

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(reader.position(), Position::new(1, 1));
}

#[tokio::test(start_paused = true)]
async fn test_speed_change_reschedules() {
    let reader = open(&[9], Position::default()).await;
    let mut autoplay = AutoPlay::new(reader.clone());
    assert_eq!(autoplay.speed(), 5);
    autoplay.set_enabled(true);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(autoplay.set_speed(1), 1);
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(reader.position(), Position::new(1, 2));

    assert_eq!(autoplay.set_speed(42), 10);
}

#[tokio::test(start_paused = true)]
async fn test_autoplay_crosses_chapters_and_stops_at_end() {
    let reader = open(&[1, 1], Position::default()).await;
    let mut autoplay = AutoPlay::new(reader.clone()).with_speed(1);
    autoplay.set_enabled(true);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(reader.position(), Position::new(2, 1));

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(reader.position(), Position::new(2, 1));
    assert!(!autoplay.is_enabled());
}

#[tokio::test(start_paused = true)]
async fn test_dropping_autoplay_cancels_it() {
    let reader = open(&[5], Position::default()).await;
    {
        let mut autoplay = AutoPlay::new(reader.clone()).with_speed(1);
        assert!(autoplay.toggle());
    }
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(reader.position(), Position::new(1, 1));
}

#[tokio::test(start_paused = true)]
async fn test_repeated_enable_keeps_the_running_timer() {
    let reader = open(&[9], Position::default()).await;
    let mut autoplay = AutoPlay::new(reader.clone()).with_speed(2);
    autoplay.set_enabled(true);

    tokio::time::sleep(Duration::from_millis(1500)).await;
    autoplay.set_enabled(true);
    assert_eq!(autoplay.set_speed(2), 2);

    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(reader.position(), Position::new(1, 2));
}
