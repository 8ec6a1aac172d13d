//! # incognitus-i18n
//!
//! Loads per-language string tables, resolves keys with a default-language
//! fallback, and applies the result to the page.

pub mod document;
pub mod prefs;
pub mod source;
mod translator;


pub use document::MemoryDocument;
pub use prefs::{FilePrefs, MemoryPrefs};
pub use source::{DirTableSource, HttpTableSource};
pub use translator::{Translator, LANG_PREF_KEY, LOADING_CLASS};
