//! Parser for the slide-delimited text emitted by the legacy converter.
//!
//! The converter prints a `--- Slide <N> ---` marker line before each slide,
//! followed by that slide's text lines:
//!
//! ```text
//! --- Slide 1 ---
//! Amazing grace
//!
//! --- Slide 2 ---
//! How sweet the sound
//! ```

use crate::error::{Error, Result};
use crate::types::SlideRecord;

/// Prefix that opens a slide marker line.
pub const MARKER_PREFIX: &str = "--- Slide";

/// Closing dashes of a slide marker line.
const MARKER_DASHES: &str = "---";

/// Parse converter output already split into lines.
///
/// Lines before the first marker attach to slide 0. A marker followed by no
/// lines produces no record.
pub fn parse_delimited<I, S>(lines: I) -> Result<Vec<SlideRecord>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut records = Vec::new();
    let mut current_slide = 0usize;
    let mut current_lines: Vec<String> = Vec::new();

    for line in lines {
        let line = line.as_ref();

        if line.starts_with(MARKER_PREFIX) {
            if !current_lines.is_empty() {
                records.push(SlideRecord::new(current_slide, current_lines.join("\n")));
                current_lines.clear();
            }
            current_slide = parse_marker(line)?;
        } else {
            current_lines.push(line.to_string());
        }
    }

    if !current_lines.is_empty() {
        records.push(SlideRecord::new(current_slide, current_lines.join("\n")));
    }

    log::debug!("Parsed {} slide records from converter output", records.len());

    Ok(records)
}

/// Parse raw converter stdout.
///
/// Lines are split with [`split_lines`]; a trailing line terminator does not
/// start an extra empty line.
pub fn parse_converter_output(output: &str) -> Result<Vec<SlideRecord>> {
    parse_delimited(split_lines(output))
}

/// Whether `c` ends a line. Besides `\n` and `\r` this covers vertical tab,
/// form feed, the file/group/record separators, NEL and the Unicode line and
/// paragraph separators.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}'
            | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into lines on every line break, treating `\r\n` as one break.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_line_break(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(_, '\n')) = chars.peek() {
                chars.next();
                start += 1;
            }
        }
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Read the slide number out of a marker line.
fn parse_marker(line: &str) -> Result<usize> {
    let number = line
        .replace(MARKER_PREFIX, "")
        .replace(MARKER_DASHES, "");
    let number = number.trim();

    number.parse::<usize>().map_err(|e| {
        Error::MalformedConverterOutput(format!(
            "invalid slide number '{}' in marker '{}': {}",
            number, line, e
        ))
    })
}
