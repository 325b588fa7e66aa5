//! Values merged into a template

use std::collections::BTreeMap;
use std::fmt;

/// An image supplied by the user, embedded inline where its key appears
#[derive(Clone, PartialEq, Eq)]
pub struct InlineImage {
    pub bytes: Vec<u8>,
    /// Original upload name, kept for log messages only
    pub file_name: Option<String>,
}

impl InlineImage {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: None,
        }
    }

    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }
}

impl fmt::Debug for InlineImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineImage")
            .field("len", &self.bytes.len())
            .field("file_name", &self.file_name)
            .finish()
    }
}

/// A single context entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextValue {
    /// Already formatted text (names, amounts, dates)
    Text(String),
    Image(InlineImage),
}

impl From<String> for ContextValue {
    fn from(value: String) -> Self {
        ContextValue::Text(value)
    }
}

impl From<&str> for ContextValue {
    fn from(value: &str) -> Self {
        ContextValue::Text(value.to_string())
    }
}

impl From<InlineImage> for ContextValue {
    fn from(value: InlineImage) -> Self {
        ContextValue::Image(value)
    }
}

/// Placeholder key to value mapping
///
/// Keys are upper-cased on insertion and lookup, so `cliente`, `Cliente` and
/// `CLIENTE` address the same entry. Iteration is in key order, which keeps
/// merges deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateContext {
    values: BTreeMap<String, ContextValue>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized form of a placeholder key
    pub fn normalize_key(key: &str) -> String {
        key.trim().to_uppercase()
    }

    pub fn insert(&mut self, key: &str, value: impl Into<ContextValue>) -> &mut Self {
        self.values.insert(Self::normalize_key(key), value.into());
        self
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<ContextValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts the image, or blank text when none was supplied
    ///
    /// An optional image never leaves its token behind, whatever the
    /// template's missing-key policy.
    pub fn with_image_or_blank(mut self, key: &str, image: Option<InlineImage>) -> Self {
        match image {
            Some(image) => self.insert(key, image),
            None => self.insert(key, ""),
        };
        self
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.values.get(&Self::normalize_key(key))
    }

    /// Text value of a key, if it holds text
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(ContextValue::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(&Self::normalize_key(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ContextValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
