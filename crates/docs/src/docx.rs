//! DOCX text extraction using docx-rs.

use deck_core::{clean_text, Error, Result};
use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};

/// Extract the body paragraphs of a Word document, one per line, cleaned.
///
/// Only top-level paragraphs are read; table content is not included.
pub fn extract_docx_text(bytes: &[u8]) -> Result<String> {
    let docx = docx_rs::read_docx(bytes)
        .map_err(|e| Error::DocxError(format!("Error reading DOCX: {}", e)))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    Ok(clean_text(&paragraphs.join("\n")))
}

/// Text of a paragraph, including hyperlink runs.
pub(crate) fn paragraph_text(p: &Paragraph) -> String {
    let mut text = String::new();
    for child in &p.children {
        push_child_text(child, &mut text);
    }
    text
}

fn push_child_text(child: &ParagraphChild, text: &mut String) {
    match child {
        ParagraphChild::Run(r) => {
            for run_child in &r.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
        ParagraphChild::Hyperlink(h) => {
            for child in &h.children {
                push_child_text(child, text);
            }
        }
        _ => {}
    }
}
