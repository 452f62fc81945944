//! Export commands

use super::AppContext;
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use lectern_core::export::{download_file_name, export_title, exporter_for_format, Exporter};
use lectern_core::{Chapter, Verse};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

fn bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-")
}

/// Export one chapter to a file, a directory, or stdout
pub async fn export(
    ctx: &AppContext,
    code: &str,
    chapter: u32,
    output: Option<&Path>,
    format: &str,
) -> Result<()> {
    let exporter = exporter_for_format(format)
        .with_context(|| format!("No exporter available for {} format", format))?;

    let verses = ctx
        .catalog
        .fetch_verses(code, chapter)
        .await
        .with_context(|| format!("Failed to fetch {} chapter {}", code, chapter))?;
    if verses.is_empty() {
        bail!("No verses found for {} chapter {}", code, chapter);
    }
    let title = export_title(&verses);

    let Some(output) = output else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        exporter.export(&title, &verses, &mut out)?;
        out.flush()?;
        return Ok(());
    };

    let path = if output.is_dir() {
        let name = ctx
            .catalog
            .fetch_chapter(code, chapter)
            .await
            .ok()
            .flatten()
            .map(|c| c.display_name())
            .unwrap_or_else(|| format!("Chapter {}", chapter));
        output.join(download_file_name(code, &name, exporter.file_extension()))
    } else {
        output.to_path_buf()
    };

    let mut file = BufWriter::new(
        File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?,
    );
    exporter
        .export(&title, &verses, &mut file)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.flush()?;

    println!(
        "Exported {} verses of {} chapter {} -> {}",
        verses.len(),
        code,
        chapter,
        path.display()
    );
    Ok(())
}

/// Export every chapter of a text into `output_dir`
///
/// Chapters are fetched one after another, then written in parallel.
pub async fn export_all(
    ctx: &AppContext,
    code: &str,
    output_dir: &Path,
    format: &str,
    jobs: usize,
) -> Result<()> {
    let exporter = exporter_for_format(format)
        .with_context(|| format!("No exporter available for {} format", format))?;

    let chapters = ctx
        .catalog
        .fetch_chapter_list(code)
        .await
        .with_context(|| format!("Failed to fetch chapters of '{}'", code))?;
    if chapters.is_empty() {
        bail!("No chapters found for '{}'", code);
    }

    fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    let fetch_pb = ProgressBar::new(chapters.len() as u64);
    fetch_pb.set_style(bar_style());
    fetch_pb.set_message("fetching");

    let mut work: Vec<(Chapter, Vec<Verse>)> = Vec::with_capacity(chapters.len());
    for chapter in chapters {
        let verses = ctx
            .catalog
            .fetch_verses(code, chapter.number)
            .await
            .with_context(|| format!("Failed to fetch {} chapter {}", code, chapter.number))?;
        fetch_pb.inc(1);
        work.push((chapter, verses));
    }
    fetch_pb.finish_and_clear();

    let code = code.to_string();
    let output_dir = output_dir.to_path_buf();
    let (written, errors) = tokio::task::spawn_blocking(move || {
        // Configure thread pool
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok(); // Ignore if already configured

        let pb = ProgressBar::new(work.len() as u64);
        pb.set_style(bar_style());
        pb.set_message("writing");

        let success_count = AtomicUsize::new(0);
        let error_count = AtomicUsize::new(0);

        work.par_iter().for_each(|(chapter, verses)| {
            let path = output_dir.join(download_file_name(
                &code,
                &chapter.display_name(),
                exporter.file_extension(),
            ));
            match write_chapter(&path, verses, exporter.as_ref()) {
                Ok(()) => {
                    success_count.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!("Exported chapter {} -> {:?}", chapter.number, path);
                }
                Err(e) => {
                    error_count.fetch_add(1, Ordering::Relaxed);
                    tracing::error!("Failed to export chapter {}: {:#}", chapter.number, e);
                }
            }
            pb.inc(1);
        });

        pb.finish_and_clear();
        (
            success_count.load(Ordering::Relaxed),
            error_count.load(Ordering::Relaxed),
        )
    })
    .await
    .context("Export task failed")?;

    println!("\nExport complete:");
    println!("  Written: {}", written);
    println!("  Errors:  {}", errors);

    if errors > 0 {
        bail!("Export completed with {} errors", errors);
    }

    Ok(())
}

fn write_chapter(path: &Path, verses: &[Verse], exporter: &dyn Exporter) -> Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    exporter.export(&export_title(verses), verses, &mut file)?;
    file.flush()?;
    Ok(())
}
