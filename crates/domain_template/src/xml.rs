//! WordprocessingML paragraph handling
//!
//! Placeholders are matched against the visible text of a paragraph, which
//! Word frequently splits across several runs (`{{CLI` + `ENTE}}`). A
//! paragraph is therefore read as the concatenation of its `<w:t>` texts
//! and, when a substitution applies, rewritten as fresh runs that keep the
//! paragraph properties and the formatting of the first run.
//!
//! Runs without text (page breaks, existing drawings, field characters) and
//! bookmarks survive a rewrite: those found before the first text go in
//! front of the new runs, the rest after them. Hyperlinks are flattened into
//! plain runs.
//!
//! Only leaf paragraphs are considered: a paragraph that contains another
//! paragraph (text boxes, shapes) is left to its inner paragraphs.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static PARAGRAPH_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?w:p(?:\s[^>]*)?/?>").expect("paragraph tag pattern"));

static TEXT_NODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab/>|<w:br/>|<w:cr/>").expect("text node pattern")
});

static PARAGRAPH_PROPERTIES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:pPr(?:\s[^>]*)?(?:/>|>.*?</w:pPr>)").expect("paragraph properties pattern")
});

static KEPT_ELEMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:r(?:\s[^>]*)?>.*?</w:r>|<w:bookmark(?:Start|End)(?:\s[^>]*)?/>")
        .expect("kept element pattern")
});

static FIRST_RUN_PROPERTIES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<w:r(?:\s[^>]*)?>\s*(<w:rPr(?:\s[^>]*)?(?:/>|>.*?</w:rPr>))")
        .expect("run properties pattern")
});

/// Byte ranges of every leaf `<w:p>` element, in document order
pub(crate) fn leaf_paragraphs(xml: &str) -> Vec<Range<usize>> {
    // (start offset, contains a nested paragraph)
    let mut open: Vec<(usize, bool)> = Vec::new();
    let mut leaves = Vec::new();

    for tag in PARAGRAPH_TAG.find_iter(xml) {
        let text = tag.as_str();
        if text.starts_with("</") {
            if let Some((start, has_child)) = open.pop() {
                if !has_child {
                    leaves.push(start..tag.end());
                }
                if let Some(parent) = open.last_mut() {
                    parent.1 = true;
                }
            }
        } else if text.ends_with("/>") {
            if let Some(parent) = open.last_mut() {
                parent.1 = true;
            }
        } else {
            open.push((tag.start(), false));
        }
    }

    leaves
}

/// A piece of rewritten paragraph content
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Piece {
    Text(String),
    /// Complete `<w:drawing>` element
    Drawing(String),
}

/// View over the XML of one leaf paragraph
pub(crate) struct Paragraph<'a> {
    xml: &'a str,
}

impl<'a> Paragraph<'a> {
    pub(crate) fn new(xml: &'a str) -> Self {
        Self { xml }
    }

    /// Visible text, with tabs and line breaks as `\t` and `\n`
    pub(crate) fn text(&self) -> String {
        let mut text = String::new();
        for node in TEXT_NODE.captures_iter(self.xml) {
            match node.get(1) {
                Some(content) => text.push_str(&unescape(content.as_str())),
                None if node[0].starts_with("<w:tab") => text.push('\t'),
                None => text.push('\n'),
            }
        }
        text
    }

    fn open_tag(&self) -> &'a str {
        match self.xml.find('>') {
            Some(end) => &self.xml[..=end],
            None => "<w:p>",
        }
    }

    fn properties(&self) -> (&'a str, &'a str) {
        let body = &self.xml[self.open_tag().len()..];
        let (ppr, rest) = match PARAGRAPH_PROPERTIES.find(body) {
            Some(m) if body[..m.start()].trim().is_empty() => (m.as_str(), &body[m.end()..]),
            _ => ("", body),
        };
        let rpr = FIRST_RUN_PROPERTIES
            .captures(rest)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .unwrap_or("");
        (ppr, rpr)
    }

    /// Textless runs and bookmarks, split into those before and after the
    /// first text node
    fn kept_elements(&self) -> (Vec<&'a str>, Vec<&'a str>) {
        let body = &self.xml[self.open_tag().len()..];
        let first_text = TEXT_NODE.find(body).map(|m| m.start()).unwrap_or(body.len());

        let mut leading = Vec::new();
        let mut trailing = Vec::new();
        for element in KEPT_ELEMENT.find_iter(body) {
            let xml = element.as_str();
            if xml.starts_with("<w:r") && TEXT_NODE.is_match(xml) {
                continue;
            }
            if element.start() < first_text {
                leading.push(xml);
            } else {
                trailing.push(xml);
            }
        }
        (leading, trailing)
    }

    /// Rebuilds the paragraph with the given content
    pub(crate) fn rewrite(&self, pieces: &[Piece]) -> String {
        let (ppr, rpr) = self.properties();
        let (leading, trailing) = self.kept_elements();
        let mut out = String::with_capacity(self.xml.len());
        out.push_str(self.open_tag());
        out.push_str(ppr);
        leading.iter().for_each(|element| out.push_str(element));

        for piece in pieces {
            match piece {
                Piece::Text(text) if text.is_empty() => {}
                Piece::Text(text) => {
                    out.push_str("<w:r>");
                    out.push_str(rpr);
                    push_text_nodes(&mut out, text);
                    out.push_str("</w:r>");
                }
                Piece::Drawing(drawing) => {
                    out.push_str("<w:r>");
                    out.push_str(rpr);
                    out.push_str(drawing);
                    out.push_str("</w:r>");
                }
            }
        }

        trailing.iter().for_each(|element| out.push_str(element));
        out.push_str("</w:p>");
        out
    }
}

fn push_text_nodes(out: &mut String, text: &str) {
    let mut chunk = String::new();
    for c in text.chars() {
        match c {
            '\t' => {
                flush_text(out, &mut chunk);
                out.push_str("<w:tab/>");
            }
            '\n' => {
                flush_text(out, &mut chunk);
                out.push_str("<w:br/>");
            }
            _ => chunk.push(c),
        }
    }
    flush_text(out, &mut chunk);
}

fn flush_text(out: &mut String, chunk: &mut String) {
    if !chunk.is_empty() {
        out.push_str("<w:t xml:space=\"preserve\">");
        out.push_str(&escape(chunk));
        out.push_str("</w:t>");
        chunk.clear();
    }
}

/// Escapes text content and attribute values
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Resolves the predefined entities and numeric character references
pub(crate) fn unescape(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let Some(semi) = tail.find(';') else {
            out.push_str(tail);
            return out;
        };
        let entity = &tail[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => entity
                .strip_prefix("#x")
                .map(|hex| u32::from_str_radix(hex, 16).ok())
                .unwrap_or_else(|| entity.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };
        match decoded {
            Some(c) => out.push(c),
            None => out.push_str(&tail[..=semi]),
        }
        rest = &tail[semi + 1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPLIT_RUNS: &str = concat!(
        r#"<w:p w:rsidR="00A1"><w:pPr><w:jc w:val="center"/></w:pPr>"#,
        r#"<w:r><w:rPr><w:b/></w:rPr><w:t>Cliente: {{CLI</w:t></w:r>"#,
        r#"<w:r><w:t>ENTE}}</w:t></w:r></w:p>"#
    );

    #[test]
    fn test_text_spans_runs() {
        assert_eq!(Paragraph::new(SPLIT_RUNS).text(), "Cliente: {{CLIENTE}}");
    }

    #[test]
    fn test_rewrite_keeps_properties() {
        let rewritten = Paragraph::new(SPLIT_RUNS).rewrite(&[Piece::Text("Cliente: A & B".into())]);
        assert_eq!(
            rewritten,
            concat!(
                r#"<w:p w:rsidR="00A1"><w:pPr><w:jc w:val="center"/></w:pPr>"#,
                r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Cliente: A &amp; B</w:t></w:r></w:p>"#
            )
        );
    }

    #[test]
    fn test_leaf_paragraphs_skip_containers() {
        let xml = concat!(
            "<w:body><w:p><w:r><w:t>a</w:t></w:r></w:p>",
            "<w:p><w:r><w:txbxContent><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:txbxContent></w:r></w:p>",
            "<w:p/><w:p><w:pPr/></w:p></w:body>"
        );
        let texts: Vec<String> = leaf_paragraphs(xml)
            .into_iter()
            .map(|r| Paragraph::new(&xml[r]).text())
            .collect();
        assert_eq!(texts, vec!["a", "inner", ""]);
    }

    #[test]
    fn test_tabs_and_breaks() {
        let xml = "<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>";
        let para = Paragraph::new(xml);
        assert_eq!(para.text(), "a\tb\nc");
        assert_eq!(
            para.rewrite(&[Piece::Text(para.text())]),
            concat!(
                "<w:p><w:r><w:t xml:space=\"preserve\">a</w:t><w:tab/>",
                "<w:t xml:space=\"preserve\">b</w:t><w:br/>",
                "<w:t xml:space=\"preserve\">c</w:t></w:r></w:p>"
            )
        );
    }

    #[test]
    fn test_rewrite_keeps_textless_runs_and_bookmarks() {
        let xml = concat!(
            r#"<w:p><w:r><w:br w:type="page"/></w:r><w:bookmarkStart w:id="0" w:name="topo"/>"#,
            r#"<w:r><w:t>Cliente: {{CLIENTE}}</w:t></w:r><w:bookmarkEnd w:id="0"/>"#,
            r#"<w:proofErr w:type="spellStart"/></w:p>"#
        );
        let para = Paragraph::new(xml);
        assert_eq!(para.text(), "Cliente: {{CLIENTE}}");
        assert_eq!(
            para.rewrite(&[Piece::Text("Cliente: Ana".into())]),
            concat!(
                r#"<w:p><w:r><w:br w:type="page"/></w:r><w:bookmarkStart w:id="0" w:name="topo"/>"#,
                r#"<w:r><w:t xml:space="preserve">Cliente: Ana</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#
            )
        );
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape("a &amp; b &lt;c&gt; &#233; &#xE9; &bogus;"), "a & b <c> é é &bogus;");
        assert_eq!(escape("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
