//! DOCX body paragraphs as plain text.

use crate::error::{ConversionError, Result};
use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};
use std::path::Path;

/// Read every top-level paragraph of a DOCX file, empty ones included.
///
/// Tables and other block content are not paragraphs and are left out.
pub fn read_paragraphs(path: &Path) -> Result<Vec<String>> {
    if !path.exists() {
        return Err(ConversionError::InputNotFound(path.to_path_buf()));
    }
    let data = std::fs::read(path)?;
    paragraphs_from_bytes(&data)
}

/// Parse DOCX bytes into paragraph texts.
pub fn paragraphs_from_bytes(data: &[u8]) -> Result<Vec<String>> {
    let docx = read_docx(data)
        .map_err(|e| ConversionError::DocxError(format!("Failed to parse DOCX: {:?}", e)))?;

    Ok(docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            _ => None,
        })
        .collect())
}

fn paragraph_text(para: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            push_run_text(run, &mut text);
        }
    }
    text
}

fn push_run_text(run: &docx_rs::Run, text: &mut String) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}
