//! Test Data Builders
//!
//! Builds DOCX templates in memory so merge tests do not depend on binary
//! files checked into the repository. The packages carry only the parts a
//! word processor needs to open them.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES_HEAD: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
);

const PACKAGE_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#
);

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// One paragraph, given as the texts of its runs
#[derive(Debug, Clone)]
struct TestParagraph {
    runs: Vec<String>,
    bold_first_run: bool,
}

impl TestParagraph {
    fn to_xml(&self) -> String {
        let mut xml = String::from("<w:p>");
        for (index, run) in self.runs.iter().enumerate() {
            xml.push_str("<w:r>");
            if index == 0 && self.bold_first_run {
                xml.push_str("<w:rPr><w:b/></w:rPr>");
            }
            xml.push_str(&format!(r#"<w:t xml:space="preserve">{}</w:t>"#, escape(run)));
            xml.push_str("</w:r>");
        }
        xml.push_str("</w:p>");
        xml
    }
}

/// Builder for minimal DOCX templates
#[derive(Debug, Clone, Default)]
pub struct DocxTemplateBuilder {
    body: Vec<TestParagraph>,
    header: Option<Vec<TestParagraph>>,
    footer: Option<Vec<TestParagraph>>,
}

impl DocxTemplateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a paragraph with a single run
    pub fn paragraph(mut self, text: &str) -> Self {
        self.body.push(TestParagraph {
            runs: vec![text.to_string()],
            bold_first_run: false,
        });
        self
    }

    /// Adds a paragraph split across several runs, the first one bold
    pub fn split_paragraph(mut self, runs: &[&str]) -> Self {
        self.body.push(TestParagraph {
            runs: runs.iter().map(|r| r.to_string()).collect(),
            bold_first_run: true,
        });
        self
    }

    pub fn header(mut self, text: &str) -> Self {
        self.header.get_or_insert_with(Vec::new).push(TestParagraph {
            runs: vec![text.to_string()],
            bold_first_run: false,
        });
        self
    }

    pub fn footer(mut self, text: &str) -> Self {
        self.footer.get_or_insert_with(Vec::new).push(TestParagraph {
            runs: vec![text.to_string()],
            bold_first_run: false,
        });
        self
    }

    fn part_xml(root: &str, paragraphs: &[TestParagraph], wrap_body: bool) -> String {
        let content: String = paragraphs.iter().map(TestParagraph::to_xml).collect();
        let content = if wrap_body {
            format!("<w:body>{}<w:sectPr/></w:body>", content)
        } else {
            content
        };
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:{root} xmlns:w="{w}" xmlns:r="{r}">{content}</w:{root}>"#,
            root = root,
            w = W_NS,
            r = R_NS,
            content = content
        )
    }

    /// Serializes the template as DOCX bytes
    pub fn build(&self) -> Vec<u8> {
        let mut types = String::from(CONTENT_TYPES_HEAD);
        let mut document_rels = Vec::new();
        let mut parts = Vec::new();

        if let Some(header) = &self.header {
            types.push_str(r#"<Override PartName="/word/header1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml"/>"#);
            document_rels.push(("rId10", "header", "header1.xml"));
            parts.push(("word/header1.xml".to_string(), Self::part_xml("hdr", header, false)));
        }
        if let Some(footer) = &self.footer {
            types.push_str(r#"<Override PartName="/word/footer1.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml"/>"#);
            document_rels.push(("rId11", "footer", "footer1.xml"));
            parts.push(("word/footer1.xml".to_string(), Self::part_xml("ftr", footer, false)));
        }
        types.push_str("</Types>");

        let mut rels = String::from(concat!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#
        ));
        for (id, kind, target) in &document_rels {
            rels.push_str(&format!(
                r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/{}" Target="{}"/>"#,
                id, kind, target
            ));
        }
        rels.push_str("</Relationships>");

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        let mut add = |name: &str, body: &str| {
            writer.start_file(name, options).expect("start zip entry");
            writer.write_all(body.as_bytes()).expect("write zip entry");
        };
        add("[Content_Types].xml", &types);
        add("_rels/.rels", PACKAGE_RELS);
        add("word/document.xml", &Self::part_xml("document", &self.body, true));
        add("word/_rels/document.xml.rels", &rels);
        for (name, xml) in &parts {
            add(name, xml);
        }
        writer.finish().expect("finish zip").into_inner()
    }
}

/// Encodes a solid-colour PNG of the given size
pub fn png_image(width: u32, height: u32) -> Vec<u8> {
    let image = RgbImage::from_pixel(width, height, Rgb([200, 30, 30]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .expect("encode png");
    bytes.into_inner()
}

/// Writes a template into `dir` under `name` and returns its bytes
pub fn write_template(dir: &std::path::Path, name: &str, template: &DocxTemplateBuilder) -> Vec<u8> {
    let bytes = template.build();
    std::fs::write(dir.join(name), &bytes).expect("write template");
    bytes
}
