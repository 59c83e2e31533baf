//! Text extraction from PDF, DOCX and plain-text documents.

use crate::cancel::CancelToken;
use crate::error::{ExtractError, ExtractResult};
use crate::limits::Limits;
use crate::normalize::normalize;
use crate::types::{DocumentKind, ExtractedText};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;

/// Extracts and normalizes text from supported document files.
///
/// Decoding runs on the blocking thread pool; the decode loops poll the
/// cancellation token between pages/paragraphs so a long extraction can be
/// aborted promptly. A canceled extraction returns no partial text.
#[derive(Debug, Clone, Default)]
pub struct DocumentExtractor {
    limits: Limits,
}

impl DocumentExtractor {
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Extract normalized text from the document at `path`.
    ///
    /// Validation failures (empty path, missing file, unsupported
    /// extension) are distinct error variants and are never retried. A PDF
    /// whose assembled text falls under the plausibility threshold fails
    /// with [`ExtractError::NoExtractableText`] rather than silently
    /// returning near-empty text.
    pub async fn extract_text(
        &self,
        path: impl AsRef<Path>,
        cancel: &CancelToken,
    ) -> ExtractResult<ExtractedText> {
        let path = path.as_ref();

        if path.as_os_str().is_empty() {
            return Err(ExtractError::EmptyPath);
        }

        match tokio::fs::metadata(path).await {
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ExtractError::NotFound(path.to_path_buf()));
            }
            Err(e) => return Err(ExtractError::Io(e)),
        }

        let kind = DocumentKind::from_path(path).ok_or_else(|| ExtractError::UnsupportedType {
            extension: path
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default(),
        })?;

        if cancel.is_canceled() {
            return Err(ExtractError::Canceled);
        }

        let raw = match kind {
            DocumentKind::Pdf => self.extract_pdf(path, cancel).await?,
            DocumentKind::Docx => self.extract_docx(path, cancel).await?,
            DocumentKind::Txt => tokio::fs::read_to_string(path).await?,
        };

        let source_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(ExtractedText::new(normalize(&raw), source_name))
    }

    async fn extract_pdf(&self, path: &Path, cancel: &CancelToken) -> ExtractResult<String> {
        let path = path.to_path_buf();
        let cancel = cancel.clone();
        let min_len = self.limits.min_pdf_text_len;

        tokio::task::spawn_blocking(move || {
            let bytes = std::fs::read(&path)?;
            let raw = pdf_extract::extract_text_from_mem(&bytes)
                .map_err(|e| ExtractError::Pdf(e.to_string()))?;
            assemble_pdf_pages(&raw, min_len, &cancel)
        })
        .await
        .map_err(|e| ExtractError::Pdf(format!("decode task failed: {e}")))?
    }

    async fn extract_docx(&self, path: &Path, cancel: &CancelToken) -> ExtractResult<String> {
        let path = path.to_path_buf();
        let cancel = cancel.clone();

        tokio::task::spawn_blocking(move || {
            let bytes = std::fs::read(&path)?;
            decode_docx(&bytes, &cancel)
        })
        .await
        .map_err(|e| ExtractError::Docx(format!("decode task failed: {e}")))?
    }
}

/// Join the non-blank pages of a decoded PDF with blank-line separators.
///
/// `pdf-extract` separates pages with form feeds. A result shorter than
/// `min_len` signals a document with no usable text layer (a scanned
/// image), which is a distinct error condition.
fn assemble_pdf_pages(raw: &str, min_len: usize, cancel: &CancelToken) -> ExtractResult<String> {
    let mut text = String::new();

    for page in raw.split('\x0C') {
        if cancel.is_canceled() {
            return Err(ExtractError::Canceled);
        }
        let page = page.trim();
        if page.is_empty() {
            continue;
        }
        if !text.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str(page);
    }

    if text.chars().count() < min_len {
        return Err(ExtractError::NoExtractableText);
    }
    Ok(text)
}

/// Pull paragraph text out of a DOCX archive's `word/document.xml`,
/// joining non-blank paragraphs with newlines.
fn decode_docx(bytes: &[u8], cancel: &CancelToken) -> ExtractResult<String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive =
        zip::ZipArchive::new(cursor).map_err(|e| ExtractError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(format!("missing word/document.xml: {e}")))?
        .read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut paragraph = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    if cancel.is_canceled() {
                        return Err(ExtractError::Canceled);
                    }
                    let line = paragraph.trim();
                    if !line.is_empty() {
                        text.push_str(line);
                        text.push('\n');
                    }
                    paragraph.clear();
                }
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let run = t.unescape().map_err(|e| ExtractError::Docx(e.to_string()))?;
                paragraph.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Docx(e.to_string())),
            Ok(_) => {}
        }
    }

    Ok(text)
}
