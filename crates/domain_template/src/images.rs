//! Inline image embedding
//!
//! Images are decoded once to learn their pixel size, then written into the
//! package as new media parts. Each content part that references an image
//! gets its own relationship entry, and the display size is derived from the
//! configured [`ImageConstraint`] so a tall upload cannot push the document
//! onto an extra page.

use image::{ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Cursor;
use tracing::debug;

use crate::context::InlineImage;
use crate::error::TemplateError;
use crate::package::{DocxPackage, CONTENT_TYPES_PART};
use crate::xml::escape;

/// English Metric Units per millimetre
pub const EMU_PER_MM: u64 = 36_000;

/// Fixed display size of merged images, in millimetres
///
/// Only one dimension is fixed; the other follows the image aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fit", content = "mm", rename_all = "snake_case")]
pub enum ImageConstraint {
    Height(u32),
    Width(u32),
}

impl Default for ImageConstraint {
    fn default() -> Self {
        ImageConstraint::Height(60)
    }
}

impl ImageConstraint {
    /// Display extent `(cx, cy)` in EMU for an image of the given pixel size
    pub fn extent(&self, width_px: u32, height_px: u32) -> (u64, u64) {
        let (w, h) = (u64::from(width_px.max(1)), u64::from(height_px.max(1)));
        match *self {
            ImageConstraint::Height(mm) => {
                let cy = u64::from(mm) * EMU_PER_MM;
                (cy * w / h, cy)
            }
            ImageConstraint::Width(mm) => {
                let cx = u64::from(mm) * EMU_PER_MM;
                (cx, cx * h / w)
            }
        }
    }
}

/// A decoded image ready to be written as a media part
struct Media {
    bytes: Vec<u8>,
    part_name: String,
    extension: &'static str,
    content_type: &'static str,
    width: u32,
    height: u32,
}

fn probe(image: &InlineImage) -> Result<(&'static str, &'static str, u32, u32), TemplateError> {
    let reader = ImageReader::new(Cursor::new(image.bytes.as_slice()))
        .with_guessed_format()
        .map_err(|e| TemplateError::render(format!("cannot read image: {}", e)))?;

    let (extension, content_type) = match reader.format() {
        Some(ImageFormat::Png) => ("png", "image/png"),
        Some(ImageFormat::Jpeg) => ("jpeg", "image/jpeg"),
        Some(ImageFormat::Gif) => ("gif", "image/gif"),
        Some(ImageFormat::Bmp) => ("bmp", "image/bmp"),
        Some(other) => {
            return Err(TemplateError::render(format!("unsupported image format {:?}", other)))
        }
        None => return Err(TemplateError::render("unrecognized image format")),
    };

    let decoded = reader
        .decode()
        .map_err(|e| TemplateError::render(format!("cannot decode image: {}", e)))?;
    Ok((extension, content_type, decoded.width(), decoded.height()))
}

/// Relationship file of a package part: `word/document.xml` has its
/// relationships in `word/_rels/document.xml.rels`
fn rels_part(part: &str) -> String {
    match part.rsplit_once('/') {
        Some((dir, file)) => format!("{}/_rels/{}.rels", dir, file),
        None => format!("_rels/{}.rels", part),
    }
}

fn drawing_xml(doc_pr_id: u32, rel_id: &str, name: &str, cx: u64, cy: u64) -> String {
    let name = escape(name);
    format!(
        concat!(
            r#"<w:drawing xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            r#"<wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:docPr id="{id}" name="{name}"/>"#,
            r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" noChangeAspect="1"/></wp:cNvGraphicFramePr>"#,
            r#"<a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
            r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:nvPicPr><pic:cNvPr id="0" name="{name}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#
        ),
        cx = cx,
        cy = cy,
        id = doc_pr_id,
        name = name,
        rel = rel_id,
    )
}

/// Collects the images of one merge and writes them into the package
pub(crate) struct ImageEmbedder {
    constraint: ImageConstraint,
    // keyed by context key, so an image used twice is stored once
    media: BTreeMap<String, Media>,
    // part name -> (context key -> relationship id)
    relationships: BTreeMap<String, BTreeMap<String, String>>,
    drawings: u32,
}

impl ImageEmbedder {
    pub(crate) fn new(constraint: ImageConstraint) -> Self {
        Self {
            constraint,
            media: BTreeMap::new(),
            relationships: BTreeMap::new(),
            drawings: 0,
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.media.is_empty()
    }

    /// Registers `image` for use in `part` and returns its drawing element
    pub(crate) fn embed(
        &mut self,
        part: &str,
        key: &str,
        image: &InlineImage,
    ) -> Result<String, TemplateError> {
        if !self.media.contains_key(key) {
            let (extension, content_type, width, height) = probe(image)?;
            let index = self.media.len() + 1;
            debug!(key, width, height, extension, file_name = ?image.file_name, "Embedding image");
            self.media.insert(
                key.to_string(),
                Media {
                    bytes: image.bytes.clone(),
                    part_name: format!("word/media/merged{}.{}", index, extension),
                    extension,
                    content_type,
                    width,
                    height,
                },
            );
        }
        let Some(media) = self.media.get(key) else {
            return Err(TemplateError::render(format!("image {} was not registered", key)));
        };

        let part_rels = self.relationships.entry(part.to_string()).or_default();
        let next_rel = format!("rIdMerged{}", part_rels.len() + 1);
        let rel_id = part_rels.entry(key.to_string()).or_insert(next_rel).clone();

        self.drawings += 1;
        let (cx, cy) = self.constraint.extent(media.width, media.height);
        let name = media.part_name.rsplit('/').next().unwrap_or(&media.part_name);
        Ok(drawing_xml(50_000 + self.drawings, &rel_id, name, cx, cy))
    }

    /// Writes media parts, relationships and content types
    pub(crate) fn apply(self, package: &mut DocxPackage) -> Result<(), TemplateError> {
        for media in self.media.values() {
            package.set_part(&media.part_name, media.bytes.clone());
        }

        for (part, rels) in &self.relationships {
            let rels_name = rels_part(part);
            let mut xml = package.xml_part(&rels_name)?.unwrap_or_else(|| {
                String::from(concat!(
                    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#
                ))
            });
            let mut entries = String::new();
            for (key, rel_id) in rels {
                let Some(media) = self.media.get(key) else {
                    continue;
                };
                let target = media.part_name.trim_start_matches("word/");
                entries.push_str(&format!(
                    r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="{}"/>"#,
                    rel_id, target
                ));
            }
            insert_before_close(&mut xml, "</Relationships>", &entries)?;
            package.set_part(&rels_name, xml.into_bytes());
        }

        let Some(mut types) = package.xml_part(CONTENT_TYPES_PART)? else {
            return Err(TemplateError::render("package has no content type registry"));
        };
        let mut defaults = String::new();
        for media in self.media.values() {
            let declared = format!(r#"Extension="{}""#, media.extension);
            let known = types.to_ascii_lowercase().contains(&declared.to_ascii_lowercase());
            if !known && !defaults.contains(&declared) {
                defaults.push_str(&format!(
                    r#"<Default {} ContentType="{}"/>"#,
                    declared, media.content_type
                ));
            }
        }
        if !defaults.is_empty() {
            insert_before_close(&mut types, "</Types>", &defaults)?;
            package.set_part(CONTENT_TYPES_PART, types.into_bytes());
        }
        Ok(())
    }
}

fn insert_before_close(xml: &mut String, close: &str, content: &str) -> Result<(), TemplateError> {
    match xml.rfind(close) {
        Some(at) => {
            xml.insert_str(at, content);
            Ok(())
        }
        None => Err(TemplateError::render(format!("missing {} element", close))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extent_follows_aspect_ratio() {
        let (cx, cy) = ImageConstraint::Height(60).extent(200, 100);
        assert_eq!(cy, 60 * EMU_PER_MM);
        assert_eq!(cx, 120 * EMU_PER_MM);

        let (cx, cy) = ImageConstraint::Width(50).extent(100, 300);
        assert_eq!(cx, 50 * EMU_PER_MM);
        assert_eq!(cy, 150 * EMU_PER_MM);
    }

    #[test]
    fn test_default_constraint() {
        assert_eq!(ImageConstraint::default(), ImageConstraint::Height(60));
    }

    #[test]
    fn test_rels_part() {
        assert_eq!(rels_part("word/document.xml"), "word/_rels/document.xml.rels");
        assert_eq!(rels_part("word/header1.xml"), "word/_rels/header1.xml.rels");
    }

    #[test]
    fn test_garbage_is_render_error() {
        let mut embedder = ImageEmbedder::new(ImageConstraint::default());
        let result = embedder.embed("word/document.xml", "IMAGEM", &InlineImage::new(b"not an image".to_vec()));
        assert!(matches!(result, Err(TemplateError::Render(_))));
    }
}
