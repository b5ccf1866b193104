//! Shape-tree construction from slide XML (`ppt/slides/slideN.xml`).
//!
//! Only the direct children of `p:spTree` and of nested `p:grpSp` elements
//! become shape nodes:
//!
//! - `p:sp` carries a text frame (the paragraphs of its `p:txBody`)
//! - `p:graphicFrame` carries a table when it holds an `a:tbl`
//! - `p:grpSp` becomes a group of its child shapes
//! - everything else (`p:pic`, `p:cxnSp`, ...) carries no text

use deck_core::{Error, Result, ShapeKind, ShapeNode, Slide, Table, TextFrame};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Element names that open a shape when they sit directly in a shape tree.
const SHAPE_ELEMENTS: &[&[u8]] = &[
    b"sp",
    b"grpSp",
    b"graphicFrame",
    b"pic",
    b"cxnSp",
    b"contentPart",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShapeTag {
    Sp,
    Group,
    GraphicFrame,
    Other,
}

impl ShapeTag {
    fn from_local_name(name: &[u8]) -> Self {
        match name {
            b"sp" => Self::Sp,
            b"grpSp" => Self::Group,
            b"graphicFrame" => Self::GraphicFrame,
            _ => Self::Other,
        }
    }
}

/// A shape whose closing tag has not been reached yet.
#[derive(Debug)]
struct ShapeBuilder {
    tag: ShapeTag,
    text_frame: Option<TextFrame>,
    table: Option<Table>,
    children: Vec<ShapeNode>,
}

impl ShapeBuilder {
    fn new(tag: ShapeTag) -> Self {
        Self {
            tag,
            // Every `p:sp` exposes a text frame, even without a body.
            text_frame: (tag == ShapeTag::Sp).then(TextFrame::default),
            table: None,
            children: Vec::new(),
        }
    }

    fn build(self) -> ShapeNode {
        let kind = match self.tag {
            ShapeTag::Group => ShapeKind::Group(self.children),
            _ => ShapeKind::Other,
        };
        ShapeNode {
            kind,
            text_frame: self.text_frame,
            table: self.table,
        }
    }
}

/// An open element on the path from the root.
#[derive(Debug)]
struct OpenElement {
    name: Vec<u8>,
    opens_shape: bool,
}

/// Parser state for one slide.
#[derive(Debug, Default)]
struct SlideBuilder {
    path: Vec<OpenElement>,
    in_shape_tree: bool,
    seen_shape_tree: bool,
    top_level: Vec<ShapeNode>,
    shapes: Vec<ShapeBuilder>,
    table: Option<Table>,
    row: Option<Vec<TextFrame>>,
    cell: Option<TextFrame>,
    paragraph: Option<String>,
    in_text: bool,
}

impl SlideBuilder {
    fn parent(&self) -> Option<&[u8]> {
        self.path.last().map(|e| e.name.as_slice())
    }

    /// Whether a shape element at the current position belongs to a shape tree.
    fn is_shape_slot(&self) -> bool {
        self.in_shape_tree && matches!(self.parent(), Some(b"spTree") | Some(b"grpSp"))
    }

    fn current_tag(&self) -> Option<ShapeTag> {
        self.shapes.last().map(|s| s.tag)
    }

    fn start(&mut self, e: &BytesStart, empty: bool) -> Result<()> {
        let qname = e.name();
        let name = local_name(qname.as_ref());
        let mut opens_shape = false;

        match name {
            b"spTree" if !self.in_shape_tree => {
                self.in_shape_tree = true;
                self.seen_shape_tree = true;
            }
            _ if SHAPE_ELEMENTS.contains(&name) && self.is_shape_slot() => {
                let builder = ShapeBuilder::new(ShapeTag::from_local_name(name));
                if empty {
                    self.finish_shape(builder.build());
                } else {
                    self.shapes.push(builder);
                    opens_shape = true;
                }
            }
            b"tbl" if self.current_tag() == Some(ShapeTag::GraphicFrame) => {
                if self.table.is_some() {
                    return Err(Error::MalformedDocument("nested table".to_string()));
                }
                self.table = Some(Table::default());
                if empty {
                    self.end_table();
                }
            }
            b"tr" if !self.path_contains(b"tbl") => {
                return Err(Error::MalformedDocument(
                    "table row outside of a table".to_string(),
                ));
            }
            b"tr" if self.table.is_some() => {
                self.row = Some(Vec::new());
                if empty {
                    self.end_row()?;
                }
            }
            b"tc" if !self.path_contains(b"tr") => {
                return Err(Error::MalformedDocument(
                    "table cell outside of a table row".to_string(),
                ));
            }
            b"tc" if self.row.is_some() => {
                self.cell = Some(TextFrame::default());
                if empty {
                    self.end_cell()?;
                }
            }
            b"p" if matches!(self.parent(), Some(b"txBody")) && self.accepts_paragraphs() => {
                self.paragraph = Some(String::new());
                if empty {
                    self.end_paragraph();
                }
            }
            b"t" if self.paragraph.is_some() && !empty => {
                self.in_text = true;
            }
            // Soft line break, rendered as a vertical tab.
            b"br" => {
                if let Some(paragraph) = self.paragraph.as_mut() {
                    paragraph.push('\u{b}');
                }
            }
            _ => {}
        }

        if !empty {
            self.path.push(OpenElement {
                name: name.to_vec(),
                opens_shape,
            });
        }

        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        let element = self
            .path
            .pop()
            .ok_or_else(|| Error::MalformedDocument("unexpected closing tag".to_string()))?;

        if element.opens_shape {
            let builder = self.shapes.pop().ok_or_else(|| {
                Error::MalformedDocument("shape closed before it was opened".to_string())
            })?;
            self.finish_shape(builder.build());
            return Ok(());
        }

        match element.name.as_slice() {
            b"spTree" if self.in_shape_tree && !self.path_contains(b"spTree") => {
                self.in_shape_tree = false;
            }
            b"t" => self.in_text = false,
            b"p" if self.paragraph.is_some() => self.end_paragraph(),
            b"tc" if self.cell.is_some() => self.end_cell()?,
            b"tr" if self.row.is_some() => self.end_row()?,
            b"tbl" if self.table.is_some() => self.end_table(),
            _ => {}
        }

        Ok(())
    }

    fn text(&mut self, text: &str) {
        if self.in_text {
            if let Some(paragraph) = self.paragraph.as_mut() {
                paragraph.push_str(text);
            }
        }
    }

    fn path_contains(&self, name: &[u8]) -> bool {
        self.path.iter().any(|e| e.name == name)
    }

    /// A text body belongs either to a table cell or to an `p:sp` shape.
    fn accepts_paragraphs(&self) -> bool {
        self.cell.is_some() || self.current_tag() == Some(ShapeTag::Sp)
    }

    fn end_paragraph(&mut self) {
        let Some(paragraph) = self.paragraph.take() else {
            return;
        };
        self.in_text = false;

        if let Some(cell) = self.cell.as_mut() {
            cell.paragraphs.push(paragraph);
        } else if let Some(frame) = self.shapes.last_mut().and_then(|s| s.text_frame.as_mut()) {
            frame.paragraphs.push(paragraph);
        }
    }

    fn end_cell(&mut self) -> Result<()> {
        let cell = self.cell.take().unwrap_or_default();
        let row = self.row.as_mut().ok_or_else(|| {
            Error::MalformedDocument("table cell outside of a table row".to_string())
        })?;
        row.push(cell);
        Ok(())
    }

    fn end_row(&mut self) -> Result<()> {
        let row = self.row.take().unwrap_or_default();
        let table = self.table.as_mut().ok_or_else(|| {
            Error::MalformedDocument("table row outside of a table".to_string())
        })?;
        table.rows.push(row);
        Ok(())
    }

    fn end_table(&mut self) {
        if let Some(table) = self.table.take() {
            if let Some(shape) = self.shapes.last_mut() {
                shape.table = Some(table);
            }
        }
    }

    fn finish_shape(&mut self, node: ShapeNode) {
        match self.shapes.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.top_level.push(node),
        }
    }

    fn finish(self) -> Result<Slide> {
        if !self.seen_shape_tree {
            return Err(Error::MalformedDocument(
                "slide has no shape tree".to_string(),
            ));
        }
        if !self.shapes.is_empty() || !self.path.is_empty() {
            return Err(Error::MalformedDocument(
                "slide XML ended inside an open element".to_string(),
            ));
        }
        Ok(Slide::new(self.top_level))
    }
}

/// Build the shape tree of a slide from its XML part.
pub fn parse_slide_xml(xml: &str) -> Result<Slide> {
    let mut reader = Reader::from_str(xml);
    // Run text keeps its spacing; " world" must not lose the leading space.
    reader.trim_text(false);

    let mut builder = SlideBuilder::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => builder.start(e, false)?,
            Ok(Event::Empty(ref e)) => builder.start(e, true)?,
            Ok(Event::End(_)) => builder.end()?,
            Ok(Event::Text(ref e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| Error::MalformedDocument(format!("bad text escape: {}", e)))?;
                builder.text(&text);
            }
            Ok(Event::CData(ref e)) => {
                let text = String::from_utf8_lossy(e).to_string();
                builder.text(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::MalformedDocument(format!(
                    "slide XML error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    builder.finish()
}

/// Extract the local name from a potentially namespaced XML element name.
pub(crate) fn local_name(name: &[u8]) -> &[u8] {
    if let Some(pos) = name.iter().position(|&b| b == b':') {
        &name[pos + 1..]
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::slide_text;

    fn wrap(shapes: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/></p:nvGrpSpPr><p:grpSpPr/>{}</p:spTree></p:cSld>
</p:sld>"#,
            shapes
        )
    }

    fn text_shape(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| {
                if p.is_empty() {
                    "<a:p><a:endParaRPr lang=\"en-US\"/></a:p>".to_string()
                } else {
                    format!("<a:p><a:r><a:rPr lang=\"en-US\"/><a:t>{}</a:t></a:r></a:p>", p)
                }
            })
            .collect();
        format!(
            "<p:sp><p:nvSpPr><p:cNvPr id=\"2\" name=\"Text\"/></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp>",
            body
        )
    }

    #[test]
    fn test_text_shape_paragraphs() {
        let slide = parse_slide_xml(&wrap(&text_shape(&["Title", "", "Body"]))).unwrap();
        assert_eq!(slide.shapes.len(), 1);
        assert_eq!(
            slide.shapes[0].text_frame,
            Some(TextFrame::new(["Title", "", "Body"]))
        );
    }

    #[test]
    fn test_runs_are_concatenated_with_spacing() {
        let xml = wrap(
            "<p:sp><p:txBody><a:p><a:r><a:t>Hello</a:t></a:r><a:r><a:t> world</a:t></a:r><a:br/><a:r><a:t>&amp; more</a:t></a:r></a:p></p:txBody></p:sp>",
        );
        let slide = parse_slide_xml(&xml).unwrap();
        assert_eq!(slide_text(&slide), "Hello world\u{b}& more");
    }

    #[test]
    fn test_field_text_is_included() {
        let xml = wrap(
            "<p:sp><p:txBody><a:p><a:fld id=\"{1}\" type=\"slidenum\"><a:t>7</a:t></a:fld></a:p></p:txBody></p:sp>",
        );
        assert_eq!(slide_text(&parse_slide_xml(&xml).unwrap()), "7");
    }

    #[test]
    fn test_shape_without_body_has_empty_frame() {
        let slide = parse_slide_xml(&wrap("<p:sp><p:spPr/></p:sp>")).unwrap();
        assert_eq!(slide.shapes[0].text_frame, Some(TextFrame::default()));
    }

    #[test]
    fn test_table_graphic_frame() {
        let xml = wrap(
            "<p:graphicFrame><a:graphic><a:graphicData><a:tbl><a:tblGrid/>\
             <a:tr h=\"1\"><a:tc><a:txBody><a:p><a:r><a:t>r1c1</a:t></a:r></a:p></a:txBody></a:tc>\
             <a:tc><a:txBody><a:p><a:r><a:t>r1c2</a:t></a:r></a:p></a:txBody></a:tc></a:tr>\
             <a:tr h=\"1\"><a:tc><a:txBody><a:p><a:r><a:t>r2c1</a:t></a:r></a:p></a:txBody></a:tc>\
             <a:tc hMerge=\"1\"><a:txBody><a:p/></a:txBody></a:tc></a:tr>\
             </a:tbl></a:graphicData></a:graphic></p:graphicFrame>",
        );
        let slide = parse_slide_xml(&xml).unwrap();
        let shape = &slide.shapes[0];

        assert!(shape.text_frame.is_none());
        let table = shape.table.as_ref().unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1][1], TextFrame::new([""]));
        assert_eq!(slide_text(&slide), "r1c1\nr1c2\nr2c1");
    }

    #[test]
    fn test_chart_graphic_frame_has_no_table() {
        let xml = wrap("<p:graphicFrame><a:graphic><a:graphicData><c:chart xmlns:c=\"c\"/></a:graphicData></a:graphic></p:graphicFrame>");
        let slide = parse_slide_xml(&xml).unwrap();
        assert_eq!(slide.shapes[0], ShapeNode::other());
    }

    #[test]
    fn test_nested_groups() {
        let inner = format!("<p:grpSp><p:grpSpPr/>{}</p:grpSp>", text_shape(&["B"]));
        let outer = format!(
            "<p:grpSp><p:nvGrpSpPr/><p:grpSpPr/>{}<p:pic/>{}</p:grpSp>",
            text_shape(&["A", ""]),
            inner
        );
        let slide = parse_slide_xml(&wrap(&outer)).unwrap();

        assert_eq!(slide.shapes.len(), 1);
        let children = slide.shapes[0].children().unwrap();
        assert_eq!(children.len(), 3);
        assert_eq!(children[1], ShapeNode::other());
        assert_eq!(children[2].children().map(|c| c.len()), Some(1));
        assert_eq!(slide_text(&slide), "A\nB");
    }

    #[test]
    fn test_document_order_across_shapes() {
        let xml = wrap(&format!(
            "{}<p:cxnSp/>{}",
            text_shape(&["first"]),
            text_shape(&["second"])
        ));
        let slide = parse_slide_xml(&xml).unwrap();
        assert_eq!(slide.shapes.len(), 3);
        assert_eq!(slide_text(&slide), "first\nsecond");
    }

    #[test]
    fn test_empty_shape_tree() {
        let slide = parse_slide_xml(&wrap("")).unwrap();
        assert!(slide.shapes.is_empty());
    }

    #[test]
    fn test_missing_shape_tree_is_malformed() {
        let err = parse_slide_xml("<p:sld><p:cSld/></p:sld>").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_row_outside_table_is_malformed() {
        let err = parse_slide_xml(&wrap("<p:graphicFrame><a:tr/></p:graphicFrame>")).unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_truncated_xml_is_malformed() {
        let xml = wrap(&text_shape(&["x"]));
        let truncated = &xml[..xml.len() - 30];
        assert!(matches!(
            parse_slide_xml(truncated),
            Err(Error::MalformedDocument(_))
        ));
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name(b"p:sp"), b"sp");
        assert_eq!(local_name(b"a:t"), b"t");
        assert_eq!(local_name(b"sp"), b"sp");
    }

    #[test]
    fn test_line_break_stays_inside_paragraph() {
        let xml = wrap(
            "<p:sp><p:txBody><a:p><a:r><a:t>one</a:t></a:r><a:br/><a:r><a:t>two</a:t></a:r></a:p><a:p><a:r><a:t>three</a:t></a:r></a:p></p:txBody></p:sp>",
        );
        let slide = parse_slide_xml(&xml).unwrap();
        assert_eq!(
            slide.shapes[0].text_frame,
            Some(TextFrame::new(["one\u{b}two", "three"]))
        );
    }
}
