//! Plain text export

use super::Exporter;
use crate::error::ExportError;
use crate::types::{Language, Verse};
use std::io::Write;

/// Labeled lines written after the original text, only when present
const LINES: [(Language, &str); 6] = [
    (Language::English, "English Translation"),
    (Language::EnglishTransliteration, "English Transliteration"),
    (Language::Malayalam, "Malayalam Translation"),
    (Language::Tamil, "Tamil Translation"),
    (Language::MalayalamTransliteration, "Malayalam Transliteration"),
    (Language::TamilTransliteration, "Tamil Transliteration"),
];

const SEPARATOR_WIDTH: usize = 50;

/// Human-readable text file with one block per verse
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExporter;

impl Exporter for PlainTextExporter {
    fn export(
        &self,
        title: &str,
        verses: &[Verse],
        writer: &mut dyn Write,
    ) -> Result<(), ExportError> {
        writeln!(writer, "{}", title)?;
        writeln!(writer, "{}", "=".repeat(title.chars().count()))?;
        writeln!(writer)?;

        for verse in verses {
            writeln!(writer, "Chapter {}, Verse {}:", verse.chapter, verse.number)?;
            writeln!(writer, "Original: {}", verse.original)?;
            for (language, label) in LINES {
                if let Some(text) = verse.text(language).filter(|t| !t.is_empty()) {
                    writeln!(writer, "{}: {}", label, text)?;
                }
            }
            writeln!(writer, "{}", "-".repeat(SEPARATOR_WIDTH))?;
        }
        Ok(())
    }

    fn format_name(&self) -> &str {
        "Text"
    }

    fn file_extension(&self) -> &str {
        "txt"
    }

    fn mime_type(&self) -> &str {
        "text/plain; charset=utf-8"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_export_is_header_only() {
        let out = PlainTextExporter.export_to_string("Holy Book", &[]).unwrap();
        assert_eq!(out, "Holy Book\n=========\n\n");
    }

    #[test]
    fn test_optional_lines_skipped() {
        let verses = vec![Verse::new("torah", 1, 1, "בְּרֵאשִׁית")];
        let out = PlainTextExporter.export_to_string("t", &verses).unwrap();
        assert!(!out.contains("English"));
        assert!(out.ends_with(&format!("{}\n", "-".repeat(50))));
    }
}
