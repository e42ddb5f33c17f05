//! Document-to-text extraction for uploaded resumes.
//!
//! Never fails: unreadable or unsupported documents produce empty text, which
//! the extractor turns into an all-empty record.

use std::io::{Cursor, Read};
use std::panic::AssertUnwindSafe;

use anyhow::Result;
use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::warn;

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    PlainText,
    Unsupported,
}

/// Decides the document kind from the content type, falling back to the file
/// extension.
pub fn detect_kind(file_name: Option<&str>, content_type: Option<&str>) -> DocumentKind {
    match content_type.map(|c| c.to_ascii_lowercase()) {
        Some(ct) if ct == "application/pdf" => return DocumentKind::Pdf,
        Some(ct) if ct == DOCX_CONTENT_TYPE => return DocumentKind::Docx,
        Some(ct) if ct.starts_with("text/") => return DocumentKind::PlainText,
        _ => {}
    }

    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("pdf") => DocumentKind::Pdf,
        Some("docx") => DocumentKind::Docx,
        Some("txt") | Some("md") | Some("text") => DocumentKind::PlainText,
        _ => DocumentKind::Unsupported,
    }
}

/// Extracts plain text in reading order.
pub fn extract_text(file_name: Option<&str>, content_type: Option<&str>, data: &Bytes) -> String {
    match detect_kind(file_name, content_type) {
        // pdf-extract panics on some malformed files instead of erroring.
        DocumentKind::Pdf => {
            let extracted = std::panic::catch_unwind(AssertUnwindSafe(|| {
                pdf_extract::extract_text_from_mem(data)
            }));
            match extracted {
                Ok(Ok(text)) => text,
                Ok(Err(e)) => {
                    warn!("PDF text extraction failed: {e}");
                    String::new()
                }
                Err(_) => {
                    warn!("PDF text extraction panicked");
                    String::new()
                }
            }
        }
        DocumentKind::Docx => docx_text(data).unwrap_or_else(|e| {
            warn!("DOCX text extraction failed: {e:#}");
            String::new()
        }),
        DocumentKind::PlainText => String::from_utf8_lossy(data).into_owned(),
        DocumentKind::Unsupported => {
            warn!(
                "Unsupported document type (name: {:?}, content type: {:?})",
                file_name, content_type
            );
            String::new()
        }
    }
}

/// Runs `extract_text` on the blocking pool so large PDFs do not stall the
/// async workers.
pub async fn extract_text_blocking(
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
) -> String {
    tokio::task::spawn_blocking(move || {
        extract_text(file_name.as_deref(), content_type.as_deref(), &data)
    })
    .await
    .unwrap_or_else(|e| {
        warn!("spawn_blocking failed in document extraction: {e}");
        String::new()
    })
}

/// Paragraph text from `word/document.xml`, one line per `<w:p>`.
fn docx_text(data: &[u8]) -> Result<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY)?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"w:t" => in_text = false,
            Event::End(e) if e.name().as_ref() == b"w:p" => {
                paragraphs.push(std::mem::take(&mut current));
            }
            Event::Text(t) if in_text => current.push_str(&t.unescape()?),
            Event::Empty(e) if e.name().as_ref() == b"w:tab" => current.push('\t'),
            Event::Empty(e) if e.name().as_ref() == b"w:br" => current.push('\n'),
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }
    Ok(paragraphs.join("\n"))
}
