//! Text Extractor — turns PDF or DOCX bytes into one plain-text string.
//!
//! Decoding never fails outward: a document that cannot be read yields an
//! empty string plus a warning, and the parser turns that into a structured
//! "no text" result.

use std::any::Any;
use std::io::{Cursor, Read};
use std::panic;

use quick_xml::events::Event;
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const DOCX_BODY_PART: &str = "word/document.xml";
/// Inflated size cap for the DOCX body; uploads are capped compressed only.
const MAX_DOCX_BODY_BYTES: u64 = 64 * 1024 * 1024;

/// Document formats the extractor understands.
/// Legacy `doc` uploads are read as DOCX containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Doc,
}

impl DocumentKind {
    /// Resolves a declared file type (usually a filename extension),
    /// ignoring case. Returns `None` for anything unrecognized.
    pub fn from_declared(declared: &str) -> Option<Self> {
        match declared.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
enum ExtractError {
    #[error("PDF decode failed: {0}")]
    Pdf(String),

    #[error("PDF decoder panicked: {0}")]
    Panicked(String),

    #[error("DOCX body exceeds {limit} bytes when inflated")]
    BodyTooLarge { limit: u64 },

    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX read error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DOCX XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Extracts the plain text of a document. Returns an empty string when the
/// bytes cannot be decoded as `kind`.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> String {
    let result = match kind {
        DocumentKind::Pdf => pdf_text(bytes),
        DocumentKind::Docx | DocumentKind::Doc => docx_text(bytes, MAX_DOCX_BODY_BYTES),
    };

    match result {
        Ok(text) => {
            debug!(?kind, chars = text.len(), "Extracted document text");
            text
        }
        Err(e) => {
            warn!(?kind, "Text extraction failed: {e}");
            String::new()
        }
    }
}

/// Page texts concatenated in document order, without page markers.
fn pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    // pdf-extract panics on some malformed inputs instead of returning Err.
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
        Ok(Ok(pages)) => Ok(join_pages(&pages)),
        Ok(Err(e)) => Err(ExtractError::Pdf(e.to_string())),
        Err(payload) => Err(ExtractError::Panicked(panic_message(payload.as_ref()))),
    }
}

/// pdf-extract opens each page with blank lines; drop them so page breaks
/// read as ordinary line breaks.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim_matches('\n'))
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Paragraph texts joined by newlines, in order of completion.
fn docx_text(bytes: &[u8], limit: u64) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let body = archive.by_name(DOCX_BODY_PART)?;
    if body.size() > limit {
        return Err(ExtractError::BodyTooLarge { limit });
    }

    // The declared size can lie; never inflate past the limit.
    let mut xml = String::new();
    body.take(limit + 1).read_to_string(&mut xml)?;
    if xml.len() as u64 > limit {
        return Err(ExtractError::BodyTooLarge { limit });
    }
    Ok(docx_paragraphs(&xml)?.join("\n"))
}

/// Paragraphs can nest (text boxes inside a paragraph), so each open `w:p`
/// gets its own buffer. An inner paragraph is emitted before the one that
/// contains it.
fn docx_paragraphs(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut open: Vec<String> = Vec::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => open.push(String::new()),
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Event::Empty(e) => match (e.name().as_ref(), open.last_mut()) {
                (b"w:p", _) => paragraphs.push(String::new()),
                (b"w:tab", Some(current)) => current.push('\t'),
                (b"w:br" | b"w:cr", Some(current)) => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                if let Some(current) = open.last_mut() {
                    current.push_str(&t.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    if let Some(done) = open.pop() {
                        paragraphs.push(done);
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}

/// In-memory document builders shared by tests across the crate.
#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::{Cursor, Write};

    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};
    use zip::write::SimpleFileOptions;

    /// Builds a minimal DOCX whose body holds one paragraph per entry.
    pub(crate) fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t xml:space=\"preserve\">{p}</w:t></w:r></w:p>"))
            .collect();
        docx_with_body(&body)
    }

    /// Builds a DOCX around raw `<w:body>` XML.
    pub(crate) fn docx_with_body(body: &str) -> Vec<u8> {
        let xml = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    /// Builds a one-page PDF with each entry on its own text line.
    pub(crate) fn pdf_with_lines(lines: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 12.into()]),
            Operation::new("TL", vec![14.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
        ];
        for line in lines {
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }
}
