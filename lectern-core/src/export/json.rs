//! JSON export

use super::Exporter;
use crate::error::ExportError;
use crate::types::Verse;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct Document<'a> {
    title: &'a str,
    verses: &'a [Verse],
}

/// Pretty-printed `{ "title": .., "verses": [..] }` document
#[derive(Debug, Clone, Copy)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    /// Single-line output
    pub fn compact() -> Self {
        Self { pretty: false }
    }
}

impl Default for JsonExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for JsonExporter {
    fn export(
        &self,
        title: &str,
        verses: &[Verse],
        writer: &mut dyn Write,
    ) -> Result<(), ExportError> {
        let doc = Document { title, verses };
        if self.pretty {
            serde_json::to_writer_pretty(&mut *writer, &doc)?;
        } else {
            serde_json::to_writer(&mut *writer, &doc)?;
        }
        writeln!(writer)?;
        Ok(())
    }

    fn format_name(&self) -> &str {
        "JSON"
    }

    fn file_extension(&self) -> &str {
        "json"
    }

    fn mime_type(&self) -> &str {
        "application/json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Language;

    #[test]
    fn test_json_document() {
        let verses = vec![Verse::new("gita", 2, 47, "karmaṇy evādhikāras te")
            .with_translation(Language::English, "You have a right to action alone")];
        let out = JsonExporter::compact()
            .export_to_string("gita - Chapter 2", &verses)
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["title"], "gita - Chapter 2");
        assert_eq!(value["verses"][0]["number"], 47);
        assert_eq!(
            value["verses"][0]["translations"]["english"],
            "You have a right to action alone"
        );
    }
}
