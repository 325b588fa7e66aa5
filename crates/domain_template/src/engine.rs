//! The merge engine

use core_kernel::DocumentId;
use tracing::{debug, info};

use crate::context::{ContextValue, TemplateContext};
use crate::error::TemplateError;
use crate::images::{ImageConstraint, ImageEmbedder};
use crate::output::MergedDocument;
use crate::package::{DocxPackage, DOCUMENT_PART};
use crate::strategy::{strategy_for, Segment, SubstitutionStrategy};
use crate::template::{MissingKeyPolicy, TemplateRef, TemplateStore};
use crate::xml::{leaf_paragraphs, Paragraph, Piece};

/// Merges contexts into DOCX templates
///
/// The engine holds no per-merge state: every call loads its template,
/// builds a fresh package and names the result with a new [`DocumentId`].
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    store: TemplateStore,
    images: ImageConstraint,
}

impl TemplateEngine {
    pub fn new(store: TemplateStore) -> Self {
        Self {
            store,
            images: ImageConstraint::default(),
        }
    }

    pub fn with_image_constraint(mut self, constraint: ImageConstraint) -> Self {
        self.images = constraint;
        self
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Loads `template` and merges `context` into it
    ///
    /// # Errors
    ///
    /// - `TemplateNotFound` if the template is missing or not a DOCX package
    /// - `Render` if an image cannot be decoded or the XML cannot be rewritten
    /// - `MissingKey` if the template is strict and a placeholder has no value
    pub fn merge(
        &self,
        template: &TemplateRef,
        context: &TemplateContext,
    ) -> Result<MergedDocument, TemplateError> {
        let bytes = self.store.load(template)?;
        let package = DocxPackage::from_bytes(&bytes)
            .map_err(|e| TemplateError::not_found(&template.name, e))?;
        let merged = self.merge_package(package, template, context)?;

        let document = MergedDocument::new(DocumentId::new_v7(), merged);
        info!(
            template = %template.name,
            document_id = %document.id,
            keys = context.len(),
            "Template merged"
        );
        Ok(document)
    }

    fn merge_package(
        &self,
        mut package: DocxPackage,
        template: &TemplateRef,
        context: &TemplateContext,
    ) -> Result<Vec<u8>, TemplateError> {
        let strategy = strategy_for(template.convention);
        let mut embedder = ImageEmbedder::new(self.images);

        for part in package.content_parts() {
            let Some(xml) = package.xml_part(&part)? else {
                continue;
            };
            let merged = merge_part(
                &xml,
                &part,
                strategy.as_ref(),
                context,
                template.missing_keys,
                &mut embedder,
            )?;
            if let Some(merged) = merged {
                debug!(part = %part, "Part rewritten");
                package.set_part(&part, merged.into_bytes());
            }
        }

        if !embedder.is_empty() {
            embedder.apply(&mut package)?;
        }
        package.to_bytes()
    }
}

/// Substitutes every leaf paragraph of one XML part
///
/// Returns `None` when no paragraph changed.
pub(crate) fn merge_part(
    xml: &str,
    part: &str,
    strategy: &dyn SubstitutionStrategy,
    context: &TemplateContext,
    policy: MissingKeyPolicy,
    embedder: &mut ImageEmbedder,
) -> Result<Option<String>, TemplateError> {
    let mut out = String::with_capacity(xml.len());
    let mut copied_to = 0;
    let mut changed = false;

    for range in leaf_paragraphs(xml) {
        let paragraph = Paragraph::new(&xml[range.clone()]);
        let Some(segments) = strategy.substitute(&paragraph.text(), context, policy)? else {
            continue;
        };

        let pieces = to_pieces(segments, part, context, embedder)?;
        out.push_str(&xml[copied_to..range.start]);
        out.push_str(&paragraph.rewrite(&pieces));
        copied_to = range.end;
        changed = true;
    }

    if !changed {
        return Ok(None);
    }
    out.push_str(&xml[copied_to..]);
    Ok(Some(out))
}

fn to_pieces(
    segments: Vec<Segment>,
    part: &str,
    context: &TemplateContext,
    embedder: &mut ImageEmbedder,
) -> Result<Vec<Piece>, TemplateError> {
    let mut pieces = Vec::new();
    let mut text = String::new();

    for segment in segments {
        match segment {
            Segment::Text(s) | Segment::Resolved(s) => text.push_str(&s),
            Segment::Image(key) => {
                let Some(ContextValue::Image(image)) = context.get(&key) else {
                    return Err(TemplateError::render(format!("{} is not an image", key)));
                };
                pieces.push(Piece::Text(std::mem::take(&mut text)));
                pieces.push(Piece::Drawing(embedder.embed(part, &key, image)?));
            }
        }
    }
    pieces.push(Piece::Text(text));
    Ok(pieces)
}
