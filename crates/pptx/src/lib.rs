//! PPTX (Office Open XML) parser backend for slide text extraction.
//!
//! Parses .pptx files, which are ZIP archives containing XML documents, into
//! shape trees that `deck_core::extract_slides` turns into slide text.

pub mod parser;
pub mod shapes;

pub use parser::PptxParser;
pub use shapes::parse_slide_xml;
