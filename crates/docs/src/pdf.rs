//! PDF text extraction with an OCR fallback for scanned documents.

use crate::ocr::{OcrEngine, PageRasterizer};
use deck_core::Result;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Extract embedded text with pdf-extract, trimmed.
///
/// Unreadable documents yield an empty string so the caller can fall back
/// to OCR.
pub fn extract_pdf_text(bytes: &[u8]) -> String {
    // pdf-extract panics on some malformed files.
    match catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(Ok(text)) => text.trim().to_string(),
        Ok(Err(e)) => {
            log::debug!("pdf-extract failed: {}", e);
            String::new()
        }
        Err(_) => {
            log::warn!("pdf-extract panicked while reading document");
            String::new()
        }
    }
}

/// Render every page and OCR it, appending a newline after each page.
pub fn ocr_pdf(
    bytes: &[u8],
    rasterizer: &dyn PageRasterizer,
    ocr: &dyn OcrEngine,
) -> Result<String> {
    let workdir = tempfile::Builder::new().prefix("deck-pdf-").tempdir()?;
    let pdf_path = workdir.path().join("input.pdf");
    std::fs::write(&pdf_path, bytes)?;

    let pages_dir = workdir.path().join("pages");
    std::fs::create_dir(&pages_dir)?;

    let pages = rasterizer.rasterize(&pdf_path, &pages_dir)?;
    log::debug!("Rendered {} PDF pages for OCR", pages.len());

    let mut text = String::new();
    for page in &pages {
        text.push_str(&ocr.recognize(page)?);
        text.push('\n');
    }

    Ok(text)
}
