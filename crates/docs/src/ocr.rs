//! OCR engines and PDF page rasterisation.

use deck_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default Tesseract language.
pub const DEFAULT_OCR_LANG: &str = "eng";

/// Default resolution for rendering PDF pages before OCR.
pub const DEFAULT_RASTER_DPI: u32 = 200;

/// Recognises text in an image file.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &Path) -> Result<String>;
}

/// Renders the pages of a PDF file to images, in page order.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// OCR through the Tesseract engine.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    lang: String,
}

impl TesseractOcr {
    pub fn new(lang: impl Into<String>) -> Self {
        Self { lang: lang.into() }
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }
}

impl Default for TesseractOcr {
    fn default() -> Self {
        Self::new(DEFAULT_OCR_LANG)
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, image: &Path) -> Result<String> {
        let input = rusty_tesseract::Image::from_path(image.to_path_buf())
            .map_err(|e| Error::OcrError(format!("{}: {}", image.display(), e)))?;

        let args = rusty_tesseract::Args {
            lang: self.lang.clone(),
            ..Default::default()
        };

        rusty_tesseract::image_to_string(&input, &args)
            .map_err(|e| Error::OcrError(format!("{}: {}", image.display(), e)))
    }
}

/// Page rendering with poppler's `pdftoppm`, producing grayscale PNGs.
#[derive(Debug, Clone)]
pub struct Pdftoppm {
    program: PathBuf,
    dpi: u32,
}

impl Pdftoppm {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            dpi: DEFAULT_RASTER_DPI,
        }
    }

    /// Set the rendering resolution.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi.max(1);
        self
    }
}

impl Default for Pdftoppm {
    fn default() -> Self {
        Self::new("pdftoppm")
    }
}

impl PageRasterizer for Pdftoppm {
    fn rasterize(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let prefix = out_dir.join("page");

        let output = Command::new(&self.program)
            .arg("-png")
            .arg("-gray")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|e| {
                Error::PdfError(format!("Failed to run {}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            return Err(Error::PdfError(format!(
                "{} failed: {}",
                self.program.display(),
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        page_images(out_dir)
    }
}

/// PNG files in `dir`, ordered by name.
///
/// `pdftoppm` zero-pads page numbers to a common width, so name order is
/// page order.
pub(crate) fn page_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut pages: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
        .collect();
    pages.sort();
    Ok(pages)
}
