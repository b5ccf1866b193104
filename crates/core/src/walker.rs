//! Depth-first text collection over a shape tree.

use crate::types::ShapeNode;

/// Append every paragraph reachable from `shape` to `into`, in document order.
///
/// Text frame paragraphs come first, then table cells (row-major), then the
/// children of a group. Empty paragraphs are kept; filtering happens when a
/// slide's text is joined.
pub fn collect(shape: &ShapeNode, into: &mut Vec<String>) {
    if let Some(frame) = &shape.text_frame {
        into.extend(frame.paragraphs.iter().cloned());
    }

    if let Some(table) = &shape.table {
        for row in &table.rows {
            for cell in row {
                into.extend(cell.paragraphs.iter().cloned());
            }
        }
    }

    if let Some(children) = shape.children() {
        for child in children {
            collect(child, into);
        }
    }
}

/// Paragraphs of a single shape tree, as a new vector.
pub fn shape_paragraphs(shape: &ShapeNode) -> Vec<String> {
    let mut paragraphs = Vec::new();
    collect(shape, &mut paragraphs);
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Table, TextFrame};

    #[test]
    fn test_text_frame_keeps_empty_paragraphs() {
        let shape = ShapeNode::text(["Title", "", "Body"]);
        assert_eq!(shape_paragraphs(&shape), vec!["Title", "", "Body"]);
    }

    #[test]
    fn test_table_is_row_major() {
        let shape = ShapeNode::table(Table::from_cells([
            ["r1c1", "r1c2"],
            ["r2c1", "r2c2"],
        ]));
        assert_eq!(
            shape_paragraphs(&shape),
            vec!["r1c1", "r1c2", "r2c1", "r2c2"]
        );
    }

    #[test]
    fn test_table_cell_paragraphs_in_order() {
        let table = Table::new(vec![vec![
            TextFrame::new(["a1", "a2"]),
            TextFrame::new(Vec::<String>::new()),
            TextFrame::new(["b1"]),
        ]]);
        assert_eq!(shape_paragraphs(&ShapeNode::table(table)), vec!["a1", "a2", "b1"]);
    }

    #[test]
    fn test_text_frame_and_table_are_additive() {
        let shape = ShapeNode::text(["caption"]).with_table(Table::from_cells([["cell"]]));
        assert_eq!(shape_paragraphs(&shape), vec!["caption", "cell"]);
    }

    #[test]
    fn test_nested_groups_follow_document_order() {
        let shape = ShapeNode::group(vec![
            ShapeNode::text(["1"]),
            ShapeNode::group(vec![ShapeNode::text(["2"]), ShapeNode::other()]),
            ShapeNode::text(["3"]),
        ]);
        assert_eq!(shape_paragraphs(&shape), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_group_own_text_precedes_children() {
        let shape = ShapeNode::group(vec![ShapeNode::text(["child"])])
            .with_text_frame(TextFrame::new(["own"]));
        assert_eq!(shape_paragraphs(&shape), vec!["own", "child"]);
    }

    #[test]
    fn test_other_shape_contributes_nothing() {
        let mut into = vec!["existing".to_string()];
        collect(&ShapeNode::other(), &mut into);
        assert_eq!(into, vec!["existing"]);
    }
}
