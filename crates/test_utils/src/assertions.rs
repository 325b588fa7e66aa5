//! Custom Test Assertions
//!
//! Helpers for inspecting merged DOCX output. Text assertions work on the
//! visible text of the main document part, with all markup removed, so a
//! value split across runs still matches.

use std::io::{Cursor, Read};
use zip::ZipArchive;

/// Returns a part of a DOCX package as text, if present
pub fn docx_part(bytes: &[u8], name: &str) -> Option<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).ok()?;
    let mut file = archive.by_name(name).ok()?;
    let mut xml = String::new();
    file.read_to_string(&mut xml).ok()?;
    Some(xml)
}

/// Visible text of a part: element markup stripped, entities decoded
pub fn part_text(xml: &str) -> String {
    let mut text = String::with_capacity(xml.len());
    let mut in_tag = false;
    for c in xml.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

/// Visible text of the main document part
///
/// # Panics
///
/// Panics if the bytes are not a DOCX package
pub fn docx_text(bytes: &[u8]) -> String {
    let xml = docx_part(bytes, "word/document.xml").expect("merged output has no word/document.xml");
    part_text(&xml)
}

/// Asserts that the document text contains `needle`
pub fn assert_docx_contains(bytes: &[u8], needle: &str) {
    let text = docx_text(bytes);
    assert!(
        text.contains(needle),
        "Expected document to contain {:?}, text was {:?}",
        needle,
        text
    );
}

/// Asserts that the document text does not contain `needle`
pub fn assert_docx_not_contains(bytes: &[u8], needle: &str) {
    let text = docx_text(bytes);
    assert!(
        !text.contains(needle),
        "Expected document not to contain {:?}, text was {:?}",
        needle,
        text
    );
}

/// Names of all entries in a DOCX package
pub fn docx_entries(bytes: &[u8]) -> Vec<String> {
    match ZipArchive::new(Cursor::new(bytes)) {
        Ok(archive) => archive.file_names().map(str::to_string).collect(),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_text_strips_markup() {
        let xml = r#"<w:p><w:r><w:t>A &amp; </w:t></w:r><w:r><w:t>B</w:t></w:r></w:p>"#;
        assert_eq!(part_text(xml), "A & B");
    }
}
