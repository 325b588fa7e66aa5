//! Placeholder substitution strategies
//!
//! A strategy receives the visible text of one paragraph and returns the
//! segments that replace it, or `None` when the paragraph has nothing to
//! substitute. Both conventions sit behind [`SubstitutionStrategy`] and are
//! picked per template by [`strategy_for`].

use once_cell::sync::Lazy;
use regex::Regex;

use crate::context::{ContextValue, TemplateContext};
use crate::error::TemplateError;
use crate::template::{MissingKeyPolicy, PlaceholderConvention, TokenStyle};

static TIGHT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(TokenStyle::Tight.pattern()).expect("tight token pattern"));

static SPACED_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(TokenStyle::Spaced.pattern()).expect("spaced token pattern"));

static EXPRESSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("expression pattern")
});

/// Output of a substitution over one paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Template text that may still hold tokens
    Text(String),
    /// A value already substituted; never scanned again
    Resolved(String),
    /// Inline image stored under this context key
    Image(String),
}

impl Segment {
    /// Text of the segment, empty for images
    pub fn as_text(&self) -> &str {
        match self {
            Segment::Text(text) | Segment::Resolved(text) => text,
            Segment::Image(_) => "",
        }
    }
}

/// Resolves the placeholders of one paragraph against a context
pub trait SubstitutionStrategy: Send + Sync {
    /// Returns the replacement segments, or `None` if nothing changed
    ///
    /// # Errors
    ///
    /// `TemplateError::MissingKey` when `policy` is `Fail` and a placeholder
    /// has no value.
    fn substitute(
        &self,
        text: &str,
        context: &TemplateContext,
        policy: MissingKeyPolicy,
    ) -> Result<Option<Vec<Segment>>, TemplateError>;
}

/// Selects the strategy for a placeholder convention
pub fn strategy_for(convention: PlaceholderConvention) -> Box<dyn SubstitutionStrategy> {
    match convention {
        PlaceholderConvention::Literal(style) => Box::new(LiteralSubstitution::new(style)),
        PlaceholderConvention::Expression => Box::new(ExpressionSubstitution),
    }
}

fn value_segment(key: &str, value: &ContextValue) -> Segment {
    match value {
        ContextValue::Text(text) => Segment::Resolved(text.clone()),
        ContextValue::Image(_) => Segment::Image(key.to_string()),
    }
}

/// Exact find-and-replace of each context key written in one token style
#[derive(Debug, Clone, Copy)]
pub struct LiteralSubstitution {
    style: TokenStyle,
}

impl LiteralSubstitution {
    pub fn new(style: TokenStyle) -> Self {
        Self { style }
    }

    fn leftover_pattern(&self) -> &'static Regex {
        match self.style {
            TokenStyle::Tight => &TIGHT_TOKEN,
            TokenStyle::Spaced => &SPACED_TOKEN,
        }
    }
}

impl SubstitutionStrategy for LiteralSubstitution {
    fn substitute(
        &self,
        text: &str,
        context: &TemplateContext,
        policy: MissingKeyPolicy,
    ) -> Result<Option<Vec<Segment>>, TemplateError> {
        if !text.contains("{{") {
            return Ok(None);
        }

        let mut segments = vec![Segment::Text(text.to_string())];
        let mut changed = false;

        for (key, value) in context.iter() {
            let token = self.style.token(key);
            let mut next = Vec::with_capacity(segments.len());
            for segment in segments {
                match segment {
                    Segment::Text(body) if body.contains(&token) => {
                        changed = true;
                        let mut parts = body.split(token.as_str()).peekable();
                        while let Some(part) = parts.next() {
                            next.push(Segment::Text(part.to_string()));
                            if parts.peek().is_some() {
                                next.push(value_segment(key, value));
                            }
                        }
                    }
                    other => next.push(other),
                }
            }
            segments = next;
        }

        if policy != MissingKeyPolicy::LeaveLiteral {
            let pattern = self.leftover_pattern();
            for segment in segments.iter_mut() {
                if let Segment::Text(body) = segment {
                    if let Some(found) = pattern.captures(body) {
                        if policy == MissingKeyPolicy::Fail {
                            return Err(TemplateError::MissingKey(found[1].to_string()));
                        }
                        *body = pattern.replace_all(body, "").into_owned();
                        changed = true;
                    }
                }
            }
        }

        Ok(changed.then_some(segments))
    }
}

/// `{{ KEY }}` expressions with any inner spacing, resolved case-insensitively
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionSubstitution;

impl SubstitutionStrategy for ExpressionSubstitution {
    fn substitute(
        &self,
        text: &str,
        context: &TemplateContext,
        policy: MissingKeyPolicy,
    ) -> Result<Option<Vec<Segment>>, TemplateError> {
        let mut segments = Vec::new();
        let mut last = 0;
        let mut changed = false;

        for found in EXPRESSION.captures_iter(text) {
            let Some(whole) = found.get(0) else {
                continue;
            };
            let key = TemplateContext::normalize_key(&found[1]);
            segments.push(Segment::Text(text[last..whole.start()].to_string()));
            last = whole.end();

            match context.get(&key) {
                Some(value) => {
                    changed = true;
                    segments.push(value_segment(&key, value));
                }
                None => match policy {
                    MissingKeyPolicy::LeaveLiteral => {
                        segments.push(Segment::Resolved(whole.as_str().to_string()))
                    }
                    MissingKeyPolicy::Empty => changed = true,
                    MissingKeyPolicy::Fail => return Err(TemplateError::MissingKey(key)),
                },
            }
        }

        if !changed {
            return Ok(None);
        }
        segments.push(Segment::Text(text[last..].to_string()));
        Ok(Some(segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flatten(segments: &[Segment]) -> String {
        segments.iter().map(Segment::as_text).collect()
    }

    fn context() -> TemplateContext {
        TemplateContext::new().with("CLIENTE", "Ana").with("VALOR", "{{CLIENTE}}")
    }

    #[test]
    fn test_literal_replaces_own_style_only() {
        let strategy = LiteralSubstitution::new(TokenStyle::Spaced);
        let out = strategy
            .substitute("A {{ CLIENTE }} B {{CLIENTE}}", &context(), MissingKeyPolicy::LeaveLiteral)
            .unwrap()
            .unwrap();
        assert_eq!(flatten(&out), "A Ana B {{CLIENTE}}");
    }

    #[test]
    fn test_literal_does_not_rescan_values() {
        let strategy = LiteralSubstitution::new(TokenStyle::Tight);
        let out = strategy
            .substitute("{{VALOR}}", &context(), MissingKeyPolicy::LeaveLiteral)
            .unwrap()
            .unwrap();
        assert_eq!(flatten(&out), "{{CLIENTE}}");
    }

    #[test]
    fn test_literal_leaves_unknown_keys() {
        let strategy = LiteralSubstitution::new(TokenStyle::Tight);
        let out = strategy
            .substitute("{{MODELO}}", &context(), MissingKeyPolicy::LeaveLiteral)
            .unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn test_literal_empty_policy_strips_unknown_keys() {
        let strategy = LiteralSubstitution::new(TokenStyle::Tight);
        let out = strategy
            .substitute("x{{MODELO}}y", &context(), MissingKeyPolicy::Empty)
            .unwrap()
            .unwrap();
        assert_eq!(flatten(&out), "xy");
    }

    #[test]
    fn test_expression_any_spacing_and_case() {
        let out = ExpressionSubstitution
            .substitute("{{cliente}}-{{   CLIENTE }}", &context(), MissingKeyPolicy::Empty)
            .unwrap()
            .unwrap();
        assert_eq!(flatten(&out), "Ana-Ana");
    }

    #[test]
    fn test_expression_missing_key_policies() {
        let ctx = TemplateContext::new();
        let empty = ExpressionSubstitution
            .substitute("a{{ X }}b", &ctx, MissingKeyPolicy::Empty)
            .unwrap()
            .unwrap();
        assert_eq!(flatten(&empty), "ab");

        let kept = ExpressionSubstitution
            .substitute("a{{ X }}b", &ctx, MissingKeyPolicy::LeaveLiteral)
            .unwrap();
        assert_eq!(kept, None);

        let failed = ExpressionSubstitution.substitute("a{{ X }}b", &ctx, MissingKeyPolicy::Fail);
        assert!(matches!(failed, Err(TemplateError::MissingKey(k)) if k == "X"));
    }

    #[test]
    fn test_image_values_become_image_segments() {
        let ctx = TemplateContext::new().with("IMAGEM", crate::context::InlineImage::new(vec![1]));
        let out = ExpressionSubstitution
            .substitute("{{ IMAGEM }}", &ctx, MissingKeyPolicy::Empty)
            .unwrap()
            .unwrap();
        assert!(out.contains(&Segment::Image("IMAGEM".to_string())));
    }
}
