//! Core types: texts, chapters, verses and display languages

mod chapter;
mod language;
mod text;
mod verse;

pub use chapter::Chapter;
pub use language::{Language, LanguageSelection, Toggle};
pub use text::HolyText;
pub use verse::Verse;
