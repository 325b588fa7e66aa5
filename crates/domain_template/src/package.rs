//! DOCX package access
//!
//! A DOCX file is a zip archive of XML parts. The package is read fully into
//! memory, parts are edited in place and the archive is written back with
//! the original entry order, new parts appended at the end.

use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::TemplateError;

/// Main document part
pub const DOCUMENT_PART: &str = "word/document.xml";

/// Content type registry of the package
pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// In-memory DOCX archive
#[derive(Debug, Clone)]
pub struct DocxPackage {
    entries: Vec<(String, Vec<u8>)>,
}

impl DocxPackage {
    /// Reads an archive and checks it carries a main document part
    ///
    /// # Errors
    ///
    /// `TemplateError::Render` when the bytes are not a zip archive or lack
    /// `word/document.xml`. Callers loading templates map this to
    /// `TemplateNotFound`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TemplateError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| TemplateError::render(format!("not a document package: {}", e)))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .map_err(|e| TemplateError::render(format!("unreadable package entry: {}", e)))?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push((file.name().to_string(), data));
        }

        let package = Self { entries };
        if package.part(DOCUMENT_PART).is_none() {
            return Err(TemplateError::render(format!("package has no {}", DOCUMENT_PART)));
        }
        Ok(package)
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, data)| data.as_slice())
    }

    /// Part decoded as UTF-8 XML
    pub fn xml_part(&self, name: &str) -> Result<Option<String>, TemplateError> {
        match self.part(name) {
            Some(data) => String::from_utf8(data.to_vec())
                .map(Some)
                .map_err(|_| TemplateError::render(format!("{} is not UTF-8", name))),
            None => Ok(None),
        }
    }

    /// Replaces a part, or appends it when new
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|(entry, _)| entry == name) {
            Some((_, existing)) => *existing = data,
            None => self.entries.push((name.to_string(), data)),
        }
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Parts whose text is merged: the main document, headers and footers
    pub fn content_parts(&self) -> Vec<String> {
        let mut parts = vec![DOCUMENT_PART.to_string()];
        parts.extend(
            self.part_names()
                .filter(|name| {
                    let Some(file) = name.strip_prefix("word/") else {
                        return false;
                    };
                    !file.contains('/')
                        && file.ends_with(".xml")
                        && (file.starts_with("header") || file.starts_with("footer"))
                })
                .map(str::to_string),
        );
        parts
    }

    /// Writes the archive back out
    pub fn to_bytes(&self) -> Result<Vec<u8>, TemplateError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, data) in &self.entries {
            writer
                .start_file(name.as_str(), options)
                .map_err(|e| TemplateError::render(format!("cannot write {}: {}", name, e)))?;
            writer.write_all(data)?;
        }

        let cursor = writer
            .finish()
            .map_err(|e| TemplateError::render(format!("cannot finish package: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_requires_document_part() {
        let bytes = archive(&[("word/styles.xml", "<w:styles/>")]);
        assert!(matches!(DocxPackage::from_bytes(&bytes), Err(TemplateError::Render(_))));
        assert!(DocxPackage::from_bytes(b"plain text").is_err());
    }

    #[test]
    fn test_content_parts() {
        let bytes = archive(&[
            ("[Content_Types].xml", "<Types/>"),
            ("word/document.xml", "<w:document/>"),
            ("word/header1.xml", "<w:hdr/>"),
            ("word/footer2.xml", "<w:ftr/>"),
            ("word/_rels/header1.xml.rels", "<Relationships/>"),
            ("word/styles.xml", "<w:styles/>"),
        ]);
        let package = DocxPackage::from_bytes(&bytes).unwrap();
        assert_eq!(
            package.content_parts(),
            vec!["word/document.xml", "word/header1.xml", "word/footer2.xml"]
        );
    }

    #[test]
    fn test_rewrite_keeps_order_and_appends() {
        let bytes = archive(&[
            ("[Content_Types].xml", "<Types/>"),
            ("word/document.xml", "<w:document/>"),
        ]);
        let mut package = DocxPackage::from_bytes(&bytes).unwrap();
        package.set_part("word/document.xml", b"<w:document>x</w:document>".to_vec());
        package.set_part("word/media/a.png", vec![1, 2, 3]);

        let reread = DocxPackage::from_bytes(&package.to_bytes().unwrap()).unwrap();
        assert_eq!(
            reread.part_names().collect::<Vec<_>>(),
            vec!["[Content_Types].xml", "word/document.xml", "word/media/a.png"]
        );
        assert_eq!(
            reread.xml_part("word/document.xml").unwrap().as_deref(),
            Some("<w:document>x</w:document>")
        );
    }
}
