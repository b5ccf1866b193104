//! Per-slide text extraction from a parsed deck.

use crate::types::{Deck, Slide, SlideRecord};
use crate::walker;

/// Extract one record per slide, numbered from 1 in deck order.
///
/// Every slide yields a record, even when it carries no text.
pub fn extract_slides(deck: &Deck) -> Vec<SlideRecord> {
    deck.slides
        .iter()
        .enumerate()
        .map(|(idx, slide)| SlideRecord::new(idx + 1, slide_text(slide)))
        .collect()
}

/// Join the non-empty paragraphs of a slide with newlines.
///
/// Only zero-length paragraphs are dropped; whitespace-only paragraphs are
/// kept as they are.
pub fn slide_text(slide: &Slide) -> String {
    let mut paragraphs = Vec::new();
    for shape in &slide.shapes {
        walker::collect(shape, &mut paragraphs);
    }

    paragraphs.retain(|p| !p.is_empty());
    paragraphs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ShapeNode, Table};

    fn deck(slides: Vec<Vec<ShapeNode>>) -> Deck {
        slides.into_iter().map(Slide::new).collect()
    }

    #[test]
    fn test_numbers_follow_slide_order() {
        let deck = deck(vec![
            vec![ShapeNode::text(["one"])],
            vec![],
            vec![ShapeNode::text(["three"])],
        ]);
        let records = extract_slides(&deck);

        assert_eq!(records.len(), 3);
        let numbers: Vec<usize> = records.iter().map(|r| r.slide_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_slide_yields_empty_text() {
        let records = extract_slides(&deck(vec![vec![]]));
        assert_eq!(records, vec![SlideRecord::new(1, "")]);
    }

    #[test]
    fn test_group_recursion_drops_empty_paragraphs() {
        let group = ShapeNode::group(vec![
            ShapeNode::text(["A", ""]),
            ShapeNode::text(["B"]),
        ]);
        let records = extract_slides(&deck(vec![vec![group]]));
        assert_eq!(records[0].text, "A\nB");
    }

    #[test]
    fn test_table_traversal_order() {
        let table = ShapeNode::table(Table::from_cells([
            ["r1c1", "r1c2"],
            ["r2c1", "r2c2"],
        ]));
        let records = extract_slides(&deck(vec![vec![table]]));
        assert_eq!(records[0].text, "r1c1\nr1c2\nr2c1\nr2c2");
    }

    #[test]
    fn test_whitespace_paragraphs_are_kept() {
        let records = extract_slides(&deck(vec![vec![ShapeNode::text(["a", " ", "", "b"])]]));
        assert_eq!(records[0].text, "a\n \nb");
    }

    #[test]
    fn test_shapes_concatenate_across_slide() {
        let records = extract_slides(&deck(vec![vec![
            ShapeNode::text(["Title"]),
            ShapeNode::other(),
            ShapeNode::text(["", "Body line"]),
        ]]));
        assert_eq!(records[0].text, "Title\nBody line");
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let deck = deck(vec![
            vec![ShapeNode::group(vec![ShapeNode::text(["x"])])],
            vec![ShapeNode::text(["y"])],
        ]);
        assert_eq!(extract_slides(&deck), extract_slides(&deck));
    }
}
