//! Bookmarks command

use super::AppContext;
use anyhow::{Context, Result};
use lectern_core::reader::BookmarkStore;

/// Show the bookmarks saved for a text
pub async fn bookmarks(ctx: &AppContext, code: &str, json: bool) -> Result<()> {
    let bookmarks = BookmarkStore::new(ctx.storage.clone(), code)
        .load()
        .await
        .with_context(|| format!("Failed to load bookmarks for '{}'", code))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&bookmarks)?);
        return Ok(());
    }

    if bookmarks.is_empty() {
        println!("No bookmarks for '{}'", code);
        return Ok(());
    }

    // Names are a nicety; list the positions even when the catalog is unreachable
    let chapters = match ctx.catalog.fetch_chapter_list(code).await {
        Ok(chapters) => chapters,
        Err(e) => {
            tracing::debug!("Could not fetch chapter names: {}", e);
            Vec::new()
        }
    };

    for bookmark in &bookmarks {
        match chapters.iter().find(|c| c.number == bookmark.chapter) {
            Some(chapter) => println!("{:<8} {}", bookmark.to_string(), chapter.display_name()),
            None => println!("{}", bookmark),
        }
    }
    Ok(())
}
