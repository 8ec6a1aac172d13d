//! In-memory page model.

use incognitus_core::traits::Document;
use std::collections::BTreeSet;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Value of the `data-i18n` attribute, if the element carries one.
    pub key: Option<String>,
    pub text: String,
}

#[derive(Debug, Default)]
struct Page {
    elements: Vec<Element>,
    rtl: bool,
    body_classes: BTreeSet<String>,
}

/// A flat list of elements plus the root direction and body classes.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    page: Mutex<Page>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// A page with one keyed element per key, text empty, body still `loading`.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let doc = Self::new();
        for key in keys {
            doc.push(Some(key.into()), "");
        }
        doc.add_body_class(crate::LOADING_CLASS);
        doc
    }

    /// Append an element; `key = None` models an untranslated element.
    pub fn push(&self, key: Option<String>, text: impl Into<String>) {
        self.lock().elements.push(Element {
            key,
            text: text.into(),
        });
    }

    pub fn add_body_class(&self, class: &str) {
        self.lock().body_classes.insert(class.to_string());
    }

    pub fn has_body_class(&self, class: &str) -> bool {
        self.lock().body_classes.contains(class)
    }

    pub fn is_rtl(&self) -> bool {
        self.lock().rtl
    }

    /// Root `dir` attribute as the browser would report it.
    pub fn dir(&self) -> &'static str {
        if self.is_rtl() {
            "rtl"
        } else {
            "ltr"
        }
    }

    /// Snapshot of every element.
    pub fn elements(&self) -> Vec<Element> {
        self.lock().elements.clone()
    }

    /// Text of the first element keyed `key`.
    pub fn text_of(&self, key: &str) -> Option<String> {
        self.lock()
            .elements
            .iter()
            .find(|el| el.key.as_deref() == Some(key))
            .map(|el| el.text.clone())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Page> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Document for MemoryDocument {
    fn translate_elements(&self, resolve: &dyn Fn(&str) -> String) {
        let mut page = self.lock();
        for el in page.elements.iter_mut() {
            if let Some(key) = el.key.as_deref() {
                el.text = resolve(key);
            }
        }
    }

    fn set_rtl(&self, rtl: bool) {
        self.lock().rtl = rtl;
    }

    fn remove_body_class(&self, class: &str) {
        self.lock().body_classes.remove(class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_skips_unkeyed_elements() {
        let doc = MemoryDocument::new();
        doc.push(Some("title".into()), "");
        doc.push(None, "static");

        doc.translate_elements(&|key| format!("<{key}>"));

        let els = doc.elements();
        assert_eq!(els[0].text, "<title>");
        assert_eq!(els[1].text, "static");
    }

    #[test]
    fn test_dir_reflects_rtl() {
        let doc = MemoryDocument::new();
        assert_eq!(doc.dir(), "ltr");
        doc.set_rtl(true);
        assert_eq!(doc.dir(), "rtl");
        doc.set_rtl(false);
        assert!(!doc.is_rtl());
    }

    #[test]
    fn test_with_keys_starts_loading() {
        let doc = MemoryDocument::with_keys(["a", "b"]);
        assert!(doc.has_body_class("loading"));
        assert_eq!(doc.elements().len(), 2);
        doc.remove_body_class("loading");
        assert!(!doc.has_body_class("loading"));
    }
}
