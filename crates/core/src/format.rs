//! Text renderings of extracted slide records.

use crate::delimited::MARKER_PREFIX;
use crate::types::SlideRecord;

/// Layout used when writing slide records as text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextLayout {
    /// `--- Slide N ---` marker blocks, readable by the delimiter parser.
    #[default]
    Delimited,
    /// `Slide N:` headed blocks separated by a blank line.
    Labeled,
}

/// Formatter for slide record text output.
#[derive(Debug, Clone, Default)]
pub struct SlideFormatter {
    layout: TextLayout,
}

impl SlideFormatter {
    /// Create a formatter using the delimited layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different layout.
    pub fn with_layout(mut self, layout: TextLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Render records in the configured layout.
    pub fn format(&self, records: &[SlideRecord]) -> String {
        match self.layout {
            TextLayout::Delimited => format_delimited(records),
            TextLayout::Labeled => format_labeled(records),
        }
    }
}

/// Render records as marker blocks, each followed by a blank line.
///
/// # Example output
/// ```text
/// --- Slide 1 ---
/// Welcome
///
/// --- Slide 2 ---
/// Agenda
///
/// ```
pub fn format_delimited(records: &[SlideRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&format!("{} {} ---\n", MARKER_PREFIX, record.slide_number));
        out.push_str(&record.text);
        out.push_str("\n\n");
    }
    out
}

/// Render records as `Slide N:` blocks joined by a blank line.
pub fn format_labeled(records: &[SlideRecord]) -> String {
    records
        .iter()
        .map(|r| format!("Slide {}:\n{}", r.slide_number, r.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}
