//! Exporters for writing a chapter's verses to downloadable files

mod json;
mod text;

pub use json::JsonExporter;
pub use text::PlainTextExporter;

use crate::error::ExportError;
use crate::types::Verse;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io::Write;

/// Title used when there is nothing to export
pub const EMPTY_TITLE: &str = "Holy Book";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Trait for exporting verse lists to output formats
pub trait Exporter: Send + Sync {
    /// Write `verses` under `title`
    fn export(&self, title: &str, verses: &[Verse], writer: &mut dyn Write)
        -> Result<(), ExportError>;

    /// Format name (e.g., "Text", "JSON")
    fn format_name(&self) -> &str;

    /// File extension for this format
    fn file_extension(&self) -> &str;

    /// MIME type for this format
    fn mime_type(&self) -> &str;

    /// Export into an in-memory string
    fn export_to_string(&self, title: &str, verses: &[Verse]) -> Result<String, ExportError> {
        let mut buf = Vec::new();
        self.export(title, verses, &mut buf)?;
        String::from_utf8(buf)
            .map_err(|e| ExportError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
    }
}

/// Get an exporter by format name
pub fn exporter_for_format(format: &str) -> Option<Box<dyn Exporter>> {
    match format.to_lowercase().as_str() {
        "text" | "txt" | "plain" => Some(Box::new(PlainTextExporter)),
        "json" => Some(Box::new(JsonExporter::new())),
        _ => None,
    }
}

/// Title derived from the first verse: `"{code} - Chapter {n}"`
pub fn export_title(verses: &[Verse]) -> String {
    match verses.first() {
        Some(v) => format!("{} - Chapter {}", v.text_code, v.chapter),
        None => EMPTY_TITLE.to_string(),
    }
}

/// Download name: `{code}_{chapter name with whitespace runs as _, lowercased}.{ext}`
pub fn download_file_name(text_code: &str, chapter_name: &str, extension: &str) -> String {
    let name = WHITESPACE.replace_all(chapter_name.trim(), "_").to_lowercase();
    format!("{}_{}.{}", text_code, name, extension)
}
