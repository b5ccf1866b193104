//! Shared extraction backends.

use std::sync::Arc;

use deck_docs::{DocumentExtractor, Pdftoppm, TesseractOcr};
use deck_ppt::{Converter, JavaConverter, LegacyExtractor};

use crate::config::ServerConfig;

/// Legacy extractor over any converter implementation.
pub type DynLegacyExtractor = LegacyExtractor<Box<dyn Converter + Send + Sync>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub legacy: Arc<DynLegacyExtractor>,
    pub documents: Arc<DocumentExtractor>,
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create state from explicit backends.
    pub fn new(
        legacy: DynLegacyExtractor,
        documents: DocumentExtractor,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            legacy: Arc::new(legacy),
            documents: Arc::new(documents),
            max_upload_bytes,
        }
    }

    /// Create state with the Java converter, Tesseract and pdftoppm.
    pub fn from_config(config: &ServerConfig) -> Self {
        let converter: Box<dyn Converter + Send + Sync> = Box::new(JavaConverter::new(
            &config.java,
            &config.converter_jar,
        ));
        let legacy = LegacyExtractor::new(converter).with_policy(config.legacy_policy);

        let documents = DocumentExtractor::with_engines(
            TesseractOcr::new(config.ocr_lang.clone()),
            Pdftoppm::new(&config.pdftoppm),
        );

        Self::new(legacy, documents, config.max_upload_bytes)
    }
}
