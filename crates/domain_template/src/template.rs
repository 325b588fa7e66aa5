//! Template references and the template store
//!
//! A template is a value: the file it lives in plus the placeholder
//! convention it was authored with. Two conventions exist in the wild:
//!
//! - **Literal**: the template contains `{{KEY}}` (or `{{ KEY }}`) markers
//!   and each context key is replaced by exact find-and-replace using the
//!   template's own bracket style.
//! - **Expression**: the template contains `{{ KEY }}` expressions (any inner
//!   spacing) that are resolved against the context, images included.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::TemplateError;

/// Bracket style of literal tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStyle {
    /// `{{KEY}}`
    Tight,
    /// `{{ KEY }}`
    Spaced,
}

impl TokenStyle {
    /// Builds the literal token for a key
    pub fn token(&self, key: &str) -> String {
        match self {
            TokenStyle::Tight => format!("{{{{{}}}}}", key),
            TokenStyle::Spaced => format!("{{{{ {} }}}}", key),
        }
    }

    /// Pattern matching any token written in this style
    pub(crate) fn pattern(&self) -> &'static str {
        match self {
            TokenStyle::Tight => r"\{\{([A-Za-z_][A-Za-z0-9_]*)\}\}",
            TokenStyle::Spaced => r"\{\{ ([A-Za-z_][A-Za-z0-9_]*) \}\}",
        }
    }
}

/// Placeholder convention a template was authored with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "style", rename_all = "snake_case")]
pub enum PlaceholderConvention {
    Literal(TokenStyle),
    Expression,
}

/// What happens to a placeholder whose key has no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeyPolicy {
    /// The token stays in the output verbatim
    LeaveLiteral,
    /// The token is removed
    Empty,
    /// The merge fails with `TemplateError::MissingKey`
    Fail,
}

impl PlaceholderConvention {
    /// Policy each convention has historically applied
    pub fn default_missing_key_policy(&self) -> MissingKeyPolicy {
        match self {
            PlaceholderConvention::Literal(_) => MissingKeyPolicy::LeaveLiteral,
            PlaceholderConvention::Expression => MissingKeyPolicy::Empty,
        }
    }
}

/// A named template together with how its placeholders are written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRef {
    pub name: String,
    pub convention: PlaceholderConvention,
    pub missing_keys: MissingKeyPolicy,
}

impl TemplateRef {
    pub fn new(name: impl Into<String>, convention: PlaceholderConvention) -> Self {
        Self {
            name: name.into(),
            missing_keys: convention.default_missing_key_policy(),
            convention,
        }
    }

    /// Template using `{{KEY}}` find-and-replace
    pub fn literal(name: impl Into<String>) -> Self {
        Self::new(name, PlaceholderConvention::Literal(TokenStyle::Tight))
    }

    /// Template using `{{ KEY }}` expressions
    pub fn expression(name: impl Into<String>) -> Self {
        Self::new(name, PlaceholderConvention::Expression)
    }

    pub fn with_missing_keys(mut self, policy: MissingKeyPolicy) -> Self {
        self.missing_keys = policy;
        self
    }
}

/// Directory holding the template files
#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the raw bytes of a template
    ///
    /// # Errors
    ///
    /// `TemplateError::TemplateNotFound` if the name escapes the store
    /// directory or the file cannot be read.
    pub fn load(&self, template: &TemplateRef) -> Result<Vec<u8>, TemplateError> {
        let name = template.name.as_str();
        let is_plain_file_name = !name.is_empty()
            && Path::new(name).file_name().map(|f| f == name).unwrap_or(false);
        if !is_plain_file_name {
            return Err(TemplateError::not_found(name, "not a plain file name"));
        }

        let path = self.root.join(name);
        debug!(path = %path.display(), "Loading template");
        std::fs::read(&path).map_err(|e| TemplateError::not_found(name, e))
    }
}
