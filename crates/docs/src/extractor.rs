//! Text extraction dispatch by document type.

use crate::docx::extract_docx_text;
use crate::ocr::{OcrEngine, PageRasterizer, Pdftoppm, TesseractOcr};
use crate::pdf::{extract_pdf_text, ocr_pdf};
use deck_core::{clean_text, decode_text, DocumentFormat, Error, Result};

/// Embedded PDF text at or below this many characters triggers OCR.
pub const MIN_PDF_TEXT_CHARS: usize = 20;

/// Extracts plain text from PDF, image, Word and text documents.
pub struct DocumentExtractor {
    ocr: Box<dyn OcrEngine>,
    rasterizer: Box<dyn PageRasterizer>,
    min_pdf_text_chars: usize,
}

impl DocumentExtractor {
    /// Create an extractor using Tesseract and `pdftoppm`.
    pub fn new() -> Self {
        Self::with_engines(TesseractOcr::default(), Pdftoppm::default())
    }

    /// Create an extractor with specific OCR and rasterisation backends.
    pub fn with_engines(
        ocr: impl OcrEngine + 'static,
        rasterizer: impl PageRasterizer + 'static,
    ) -> Self {
        Self {
            ocr: Box::new(ocr),
            rasterizer: Box::new(rasterizer),
            min_pdf_text_chars: MIN_PDF_TEXT_CHARS,
        }
    }

    /// Set the embedded-text threshold below which PDFs are OCR'd.
    pub fn with_min_pdf_text_chars(mut self, chars: usize) -> Self {
        self.min_pdf_text_chars = chars;
        self
    }

    /// Extract cleaned text from a document, choosing the backend by file name.
    pub fn extract(&self, bytes: &[u8], filename: &str) -> Result<String> {
        let format = DocumentFormat::from_filename(filename)
            .filter(|f| !f.is_presentation())
            .ok_or_else(|| {
                Error::UnsupportedFormat("Unsupported file type for extraction.".to_string())
            })?;

        log::debug!("Extracting {} as {:?}", filename, format);

        match format {
            DocumentFormat::Pdf => self.extract_pdf(bytes),
            DocumentFormat::Image => self.extract_image(bytes),
            DocumentFormat::Docx => extract_docx_text(bytes),
            DocumentFormat::Text => Ok(clean_text(&decode_text(bytes))),
            DocumentFormat::Pptx | DocumentFormat::Ppt => Err(Error::UnsupportedFormat(
                "Unsupported file type for extraction.".to_string(),
            )),
        }
    }

    /// Embedded PDF text, or OCR of the rendered pages when there is too little.
    pub fn extract_pdf(&self, bytes: &[u8]) -> Result<String> {
        self.embedded_or_ocr(extract_pdf_text(bytes), bytes)
    }

    /// Keep `embedded` when its trimmed length is over the threshold, else OCR the PDF.
    fn embedded_or_ocr(&self, embedded: String, bytes: &[u8]) -> Result<String> {
        let chars = embedded.trim().chars().count();
        if chars > self.min_pdf_text_chars {
            return Ok(clean_text(&embedded));
        }

        log::info!(
            "PDF has {} characters of embedded text, falling back to OCR",
            chars
        );
        let text = ocr_pdf(bytes, self.rasterizer.as_ref(), self.ocr.as_ref())?;
        Ok(clean_text(&text))
    }

    /// OCR a raster image after converting it to grayscale.
    pub fn extract_image(&self, bytes: &[u8]) -> Result<String> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| Error::UnsupportedFormat(format!("Cannot decode image: {}", e)))?;
        let gray = image.to_luma8();

        let workdir = tempfile::Builder::new().prefix("deck-ocr-").tempdir()?;
        let path = workdir.path().join("image.png");
        gray.save_with_format(&path, image::ImageFormat::Png)
            .map_err(|e| Error::OcrError(format!("Cannot stage image: {}", e)))?;

        let text = self.ocr.recognize(&path)?;
        Ok(clean_text(&text))
    }
}

impl Default for DocumentExtractor {
    fn default() -> Self {
        Self::new()
    }
}
