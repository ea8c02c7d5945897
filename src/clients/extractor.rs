//! Plain-text extraction from uploaded documents.

use std::io::{Cursor, Read};

use quick_xml::{Reader, events::Event};
use thiserror::Error;

/// Document formats accepted by the upload endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
}

impl DocumentKind {
    /// Resolves a file extension, case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(DocumentKind::Pdf),
            "docx" => Some(DocumentKind::Docx),
            "txt" => Some(DocumentKind::Txt),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Docx => "docx",
            DocumentKind::Txt => "txt",
        }
    }
}

/// Messages are shown to the user as-is.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type. Please upload PDF, DOCX, or TXT files.")]
    UnsupportedType(String),

    #[error("{}", parse_failure_message(.kind))]
    Parse { kind: DocumentKind, detail: String },

    #[error("No text could be extracted from the file.")]
    Empty,
}

fn parse_failure_message(kind: &DocumentKind) -> &'static str {
    match kind {
        DocumentKind::Pdf => "Failed to parse PDF file. Please ensure it contains readable text.",
        DocumentKind::Docx => "Failed to parse DOCX file.",
        DocumentKind::Txt => "Failed to read TXT file.",
    }
}

pub trait TextExtractor: Send + Sync {
    /// Extracts trimmed, non-empty text from `bytes` declared as `extension`.
    fn extract(&self, bytes: &[u8], extension: &str) -> Result<String, ExtractionError>;
}

/// Extractor backed by `pdf-extract` for PDF and the `word/document.xml` part
/// of DOCX archives.
#[derive(Debug, Default)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, bytes: &[u8], extension: &str) -> Result<String, ExtractionError> {
        let kind = DocumentKind::from_extension(extension)
            .ok_or_else(|| ExtractionError::UnsupportedType(extension.to_string()))?;

        let text = match kind {
            DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes).map_err(|e| {
                ExtractionError::Parse {
                    kind,
                    detail: e.to_string(),
                }
            })?,
            DocumentKind::Docx => docx_text(bytes).map_err(|detail| ExtractionError::Parse {
                kind,
                detail,
            })?,
            // Invalid sequences become U+FFFD instead of failing the upload.
            DocumentKind::Txt => String::from_utf8_lossy(bytes).into_owned(),
        };

        let text = text.trim();
        if text.is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(text.to_string())
    }
}

/// Text runs of the main document part; paragraphs end with a newline.
/// Elements are matched by local name, whatever prefix the producer bound
/// to the WordprocessingML namespace.
fn docx_text(bytes: &[u8]) -> Result<String, String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| e.to_string())?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| e.to_string())?
        .read_to_string(&mut xml)
        .map_err(|e| e.to_string())?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;
    loop {
        match reader.read_event().map_err(|e| e.to_string())? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_run_text = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => text.push('\t'),
                b"br" | b"cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(run) if in_run_text => {
                text.push_str(&run.unescape().map_err(|e| e.to_string())?);
            }
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}
