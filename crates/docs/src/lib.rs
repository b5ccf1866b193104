//! Document text extraction for non-presentation uploads.
//!
//! PDFs are read for embedded text and OCR'd page by page when they carry
//! almost none. Images go straight to OCR, Word documents are read with
//! docx-rs and plain text is decoded as UTF-8 or Latin-1.

pub mod docx;
pub mod extractor;
pub mod ocr;
pub mod pdf;

pub use docx::extract_docx_text;
pub use extractor::{DocumentExtractor, MIN_PDF_TEXT_CHARS};
pub use ocr::{OcrEngine, PageRasterizer, Pdftoppm, TesseractOcr, DEFAULT_OCR_LANG, DEFAULT_RASTER_DPI};
pub use pdf::{extract_pdf_text, ocr_pdf};
