//! Resume Text Extractor: best-effort plain text from PDF and DOCX bytes.
//!
//! PDF goes through `pdf-extract`, DOCX through `docx-rs`. Extraction never
//! fails the caller: parser errors and parser panics are logged and yield an
//! empty string. Only an unsupported extension is an error.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::resume::ResumeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    /// Accepts an extension with or without the leading dot, any case.
    pub fn from_extension(ext: &str) -> Result<Self, ResumeError> {
        let normalized = ext.trim().trim_start_matches('.').to_lowercase();
        match normalized.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            _ => Err(ResumeError::UnsupportedFormat(format!(".{normalized}"))),
        }
    }

    pub fn from_filename(name: &str) -> Result<Self, ResumeError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext)
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }
}

/// Extracts text in the given format. Empty string means nothing extracted.
pub fn extract_text(bytes: &[u8], format: DocumentFormat) -> String {
    let result = match format {
        DocumentFormat::Pdf => extract_pdf(bytes),
        DocumentFormat::Docx => extract_docx(bytes),
    };
    match result {
        Ok(text) => text,
        Err(e) => {
            warn!("Error extracting text from {}: {e:#}", format.extension());
            String::new()
        }
    }
}

fn extract_pdf(bytes: &[u8]) -> anyhow::Result<String> {
    guarded("PDF", || {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| anyhow::anyhow!("{e:?}"))
    })
}

/// Emits each body paragraph's run text followed by a newline.
fn extract_docx(bytes: &[u8]) -> anyhow::Result<String> {
    let docx = guarded("DOCX", || {
        docx_rs::read_docx(bytes).map_err(|e| anyhow::anyhow!("{e:?}"))
    })?;

    let mut text = String::new();
    for child in docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for para_child in paragraph.children {
                if let ParagraphChild::Run(run) = para_child {
                    for run_child in run.children {
                        if let RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

/// Both parsers can panic on malformed input.
fn guarded<T>(kind: &str, parse: impl FnOnce() -> anyhow::Result<T>) -> anyhow::Result<T> {
    match catch_unwind(AssertUnwindSafe(parse)) {
        Ok(result) => result,
        Err(_) => anyhow::bail!("{kind} parser panicked"),
    }
}
