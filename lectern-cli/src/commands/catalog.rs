//! Catalog listing commands

use super::AppContext;
use anyhow::{Context, Result};

/// List the texts in the catalog
pub async fn texts(ctx: &AppContext, json: bool) -> Result<()> {
    let texts = ctx
        .catalog
        .fetch_texts()
        .await
        .context("Failed to fetch texts")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&texts)?);
        return Ok(());
    }

    if texts.is_empty() {
        println!("No texts in the catalog. Try `lectern download <code>` or `lectern import <file>`.");
        return Ok(());
    }

    for text in &texts {
        let chapters = text
            .total_chapters
            .map(|n| format!("{} chapters", n))
            .unwrap_or_default();
        println!("{:<10} {:<20} {}", text.code, text.name, chapters);
        if let Some(desc) = &text.description {
            println!("{:<10} {}", "", desc);
        }
    }

    Ok(())
}

/// List the chapters of a text
pub async fn chapters(ctx: &AppContext, code: &str, json: bool) -> Result<()> {
    let chapters = ctx
        .catalog
        .fetch_chapter_list(code)
        .await
        .with_context(|| format!("Failed to fetch chapters of '{}'", code))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&chapters)?);
        return Ok(());
    }

    if chapters.is_empty() {
        println!("No chapters found for '{}'", code);
        return Ok(());
    }

    for chapter in &chapters {
        let local = if chapter.name != chapter.english_name {
            format!(" ({})", chapter.name)
        } else {
            String::new()
        };
        println!(
            "{:>4}  {}{}  [{} verses]",
            chapter.number,
            chapter.display_name(),
            local,
            chapter.verses_count
        );
    }

    Ok(())
}
