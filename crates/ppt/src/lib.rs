//! Legacy PPT (OLE/CFB) backend for slide text extraction.
//!
//! Binary .ppt files are handed to an external converter process whose
//! slide-delimited output is parsed by `deck_core::parse_converter_output`.

pub mod converter;

pub use converter::{Converter, JavaConverter, LegacyExtractor, LegacyPolicy, DEFAULT_CONVERTER_JAR};
