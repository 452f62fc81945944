//! Import and download commands

use super::AppContext;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use lectern_core::import::{import_bible_json, Progress, RemoteImporter};
use lectern_core::transliterate::TransliterationChain;
use std::path::Path;

fn chapter_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>5}/{len:5} chapters")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}

fn track(pb: &ProgressBar, progress: Progress) {
    pb.set_length(progress.total as u64);
    pb.set_position(progress.completed as u64);
}

/// Import a Bible JSON file into the catalog
pub async fn import(ctx: &AppContext, input: &Path) -> Result<()> {
    let json = tokio::fs::read_to_string(input)
        .await
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;

    let transliterator = TransliterationChain::from_config(&ctx.config);
    let pb = chapter_bar();
    let summary = import_bible_json(
        ctx.writer.as_ref(),
        &json,
        Some(&transliterator),
        &|progress: Progress| track(&pb, progress),
    )
    .await
    .with_context(|| format!("Failed to import {}", input.display()))?;
    pb.finish_and_clear();

    tracing::info!("Imported {}", input.display());
    println!(
        "Imported {} chapters and {} verses",
        summary.chapters, summary.verses
    );
    Ok(())
}

/// Download a text from its public source into the catalog
pub async fn download(ctx: &AppContext, code: &str) -> Result<()> {
    let importer = RemoteImporter::new(ctx.writer.clone(), &ctx.config);
    let pb = chapter_bar();
    let outcome = importer
        .download_and_store(code, &|progress: Progress| track(&pb, progress))
        .await;
    pb.finish_and_clear();

    if !outcome.success {
        bail!("{}", outcome.message);
    }
    println!("{}", outcome.message);
    Ok(())
}
