//! Core slide model, shape-tree text extraction, converter output parsing,
//! and text cleanup for slide and document text extraction.

pub mod delimited;
pub mod error;
pub mod extract;
pub mod format;
pub mod normalize;
pub mod types;
pub mod walker;

pub use delimited::{parse_converter_output, parse_delimited, split_lines};
pub use error::{Error, Result};
pub use extract::{extract_slides, slide_text};
pub use format::{format_delimited, format_labeled, SlideFormatter, TextLayout};
pub use normalize::{clean_text, decode_text};
pub use types::{
    Deck, DocumentFormat, ShapeKind, ShapeNode, Slide, SlideRecord, Table, TextFrame,
};
pub use walker::{collect, shape_paragraphs};
