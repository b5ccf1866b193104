//! Domain types for slide shape trees and extracted slide text.

use serde::{Deserialize, Serialize};

/// A parsed presentation: slides in presentation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

impl Deck {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slide to the end of the deck.
    pub fn add_slide(&mut self, slide: Slide) {
        self.slides.push(slide);
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

impl FromIterator<Slide> for Deck {
    fn from_iter<I: IntoIterator<Item = Slide>>(iter: I) -> Self {
        Self {
            slides: iter.into_iter().collect(),
        }
    }
}

/// A single slide: its top-level shapes in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    pub shapes: Vec<ShapeNode>,
}

impl Slide {
    /// Create a slide from its top-level shapes.
    pub fn new(shapes: Vec<ShapeNode>) -> Self {
        Self { shapes }
    }
}

/// One visual element on a slide.
///
/// Text frame and table are independent capabilities: a node may expose
/// either, both or neither, regardless of its [`ShapeKind`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeNode {
    pub kind: ShapeKind,
    pub text_frame: Option<TextFrame>,
    pub table: Option<Table>,
}

impl ShapeNode {
    /// A plain shape with a text frame holding the given paragraphs.
    pub fn text<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            kind: ShapeKind::Other,
            text_frame: Some(TextFrame::new(paragraphs)),
            table: None,
        }
    }

    /// A graphic frame carrying a table.
    pub fn table(table: Table) -> Self {
        Self {
            kind: ShapeKind::Other,
            text_frame: None,
            table: Some(table),
        }
    }

    /// A group of child shapes.
    pub fn group(children: Vec<ShapeNode>) -> Self {
        Self {
            kind: ShapeKind::Group(children),
            text_frame: None,
            table: None,
        }
    }

    /// A shape that carries no text (pictures, connectors, charts).
    pub fn other() -> Self {
        Self {
            kind: ShapeKind::Other,
            text_frame: None,
            table: None,
        }
    }

    /// Attach a text frame to this node.
    pub fn with_text_frame(mut self, frame: TextFrame) -> Self {
        self.text_frame = Some(frame);
        self
    }

    /// Attach a table to this node.
    pub fn with_table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    /// Child shapes when this node is a group.
    pub fn children(&self) -> Option<&[ShapeNode]> {
        match &self.kind {
            ShapeKind::Group(children) => Some(children),
            ShapeKind::Other => None,
        }
    }
}

/// Primary tag of a shape node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeKind {
    /// Grouped cluster of shapes, in document order.
    Group(Vec<ShapeNode>),
    /// Any non-group shape.
    Other,
}

/// Paragraph texts of a text body. Paragraphs may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextFrame {
    pub paragraphs: Vec<String>,
}

impl TextFrame {
    pub fn new<I, S>(paragraphs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paragraphs: paragraphs.into_iter().map(Into::into).collect(),
        }
    }
}

/// A table: rows of cells, each cell holding a text frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<Vec<TextFrame>>,
}

impl Table {
    pub fn new(rows: Vec<Vec<TextFrame>>) -> Self {
        Self { rows }
    }

    /// Build a table whose cells each hold a single paragraph.
    pub fn from_cells<R, C, S>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| TextFrame::new([cell])).collect())
                .collect(),
        }
    }
}

/// Extracted text of one slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// Slide number. 1-based for parsed decks; converter output may carry 0
    /// for text that precedes the first slide marker.
    #[serde(rename = "slide")]
    pub slide_number: usize,

    /// Newline-joined slide text.
    pub text: String,
}

impl SlideRecord {
    pub fn new(slide_number: usize, text: impl Into<String>) -> Self {
        Self {
            slide_number,
            text: text.into(),
        }
    }
}

/// The format of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Legacy PPT (OLE/CFB binary).
    Ppt,
    /// Portable Document Format.
    Pdf,
    /// Word (Office Open XML).
    Docx,
    /// Plain text.
    Text,
    /// Raster image for OCR.
    Image,
}

impl DocumentFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "txt" => Some(Self::Text),
            "jpg" | "jpeg" | "png" | "tiff" => Some(Self::Image),
            _ => None,
        }
    }

    /// Detect format from the extension of a file name.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Detect format from file magic bytes.
    ///
    /// ZIP containers are reported as [`DocumentFormat::Pptx`]; callers that
    /// also accept DOCX should prefer the extension.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        // PPT is an OLE/CFB file (D0 CF 11 E0 A1 B1 1A E1)
        if bytes.len() >= 8
            && bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        {
            return Some(Self::Ppt);
        }

        if bytes.starts_with(b"%PDF") {
            return Some(Self::Pdf);
        }

        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47])
            || bytes.starts_with(&[0xFF, 0xD8, 0xFF])
            || bytes.starts_with(b"II*\0")
            || bytes.starts_with(b"MM\0*")
        {
            return Some(Self::Image);
        }

        None
    }

    /// Whether this is a slide presentation format.
    pub fn is_presentation(&self) -> bool {
        matches!(self, Self::Pptx | Self::Ppt)
    }
}
