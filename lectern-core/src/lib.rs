//! Lectern Core Library
//!
//! This crate provides the types, catalog access and reading logic for the
//! Lectern multi-text scripture reader. Verses come from a [`catalog::Catalog`]
//! backend; a [`reader::Reader`] pages through them one verse at a time.

pub mod catalog;
pub mod config;
pub mod error;
pub mod export;
pub mod import;
pub mod reader;
pub mod storage;
pub mod transliterate;
pub mod types;

pub use config::Config;
pub use error::{
    CatalogError, ExportError, ImportError, LecternError, Result, StorageError,
    TransliterationError,
};
pub use types::{Chapter, HolyText, Language, LanguageSelection, Toggle, Verse};
