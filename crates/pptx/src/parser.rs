//! PPTX file parser implementation.

use crate::shapes::{local_name, parse_slide_xml};
use deck_core::{extract_slides, Deck, Error, Result, Slide, SlideRecord};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

const PRESENTATION_PATH: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PATH: &str = "ppt/_rels/presentation.xml.rels";

/// Parser for PPTX (Office Open XML) files.
pub struct PptxParser;

impl PptxParser {
    /// Create a new PPTX parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a PPTX file from a reader into its slide shape trees.
    pub fn parse<R: Read + Seek>(&self, reader: R) -> Result<Deck> {
        let mut archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;

        let slide_order = self.get_slide_order(&mut archive)?;

        let mut deck = Deck::new();
        for slide_path in &slide_order {
            let slide = self.parse_slide(&mut archive, slide_path)?;
            deck.add_slide(slide);
        }

        if deck.is_empty() {
            log::warn!("Presentation has no slides");
        } else {
            log::debug!("Found {} slides in presentation", deck.len());
        }

        Ok(deck)
    }

    /// Parse a PPTX file and extract the text of every slide.
    pub fn extract<R: Read + Seek>(&self, reader: R) -> Result<Vec<SlideRecord>> {
        let deck = self.parse(reader)?;
        Ok(extract_slides(&deck))
    }

    /// Get the ordered list of slide part paths.
    ///
    /// The slide id list in `presentation.xml` defines the order, and an empty
    /// list means no slides. Only when that part is missing are slide
    /// relationships ordered by the number in their target.
    fn get_slide_order<R: Read + Seek>(&self, archive: &mut ZipArchive<R>) -> Result<Vec<String>> {
        let rels_content = self.read_file_from_archive(archive, PRESENTATION_RELS_PATH)?;
        let relationships = parse_slide_relationships(&rels_content)?;

        match self.read_file_from_archive(archive, PRESENTATION_PATH) {
            Ok(content) => {
                let slide_ids = parse_slide_id_list(&content)?;
                let targets: HashMap<&str, &str> = relationships
                    .iter()
                    .map(|(id, target)| (id.as_str(), target.as_str()))
                    .collect();

                slide_ids
                    .iter()
                    .map(|rid| {
                        targets
                            .get(rid.as_str())
                            .map(|target| resolve_target(target))
                            .ok_or_else(|| {
                                Error::XmlError(format!("Slide relationship '{}' not found", rid))
                            })
                    })
                    .collect()
            }
            Err(e) => {
                log::warn!("No presentation part, ordering slides by name: {}", e);
                Ok(order_by_slide_number(&relationships))
            }
        }
    }

    /// Parse a single slide from the archive.
    fn parse_slide<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        slide_path: &str,
    ) -> Result<Slide> {
        let content = self.read_file_from_archive(archive, slide_path)?;
        parse_slide_xml(&content).map_err(|e| match e {
            Error::MalformedDocument(msg) => {
                Error::MalformedDocument(format!("{}: {}", slide_path, msg))
            }
            other => other,
        })
    }

    /// Read a file from the ZIP archive.
    fn read_file_from_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        path: &str,
    ) -> Result<String> {
        let mut file = archive
            .by_name(path)
            .map_err(|e| Error::ZipError(format!("File not found in archive '{}': {}", path, e)))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::ZipError(format!("Failed to read '{}': {}", path, e)))?;

        Ok(content)
    }
}

impl Default for PptxParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Collect `(Id, Target)` of every slide relationship, in document order.
fn parse_slide_relationships(xml: &str) -> Result<Vec<(String, String)>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut slides = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let mut rel_type = String::new();
                let mut target = String::new();
                let mut id = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Type" => {
                            rel_type = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        b"Target" => {
                            target = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        b"Id" => {
                            id = String::from_utf8_lossy(&attr.value).to_string();
                        }
                        _ => {}
                    }
                }

                if rel_type.ends_with("/slide") {
                    slides.push((id, target));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing relationships: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(slides)
}

/// Collect the relationship ids of `p:sldIdLst/p:sldId`, in presentation order.
fn parse_slide_id_list(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut ids = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                if local_name(e.name().as_ref()) == b"sldId" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id" {
                        ids.push(String::from_utf8_lossy(&attr.value).to_string());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "Error parsing presentation part: {}",
                    e
                )));
            }
            _ => {}
        }
    }

    Ok(ids)
}

/// Order slide parts by the number in their target, unnumbered parts last by name.
fn order_by_slide_number(relationships: &[(String, String)]) -> Vec<String> {
    let mut slides: Vec<(String, Option<usize>)> = relationships
        .iter()
        .map(|(_, target)| (resolve_target(target), extract_slide_number(target)))
        .collect();

    slides.sort_by(|a, b| match (a.1, b.1) {
        (Some(na), Some(nb)) => na.cmp(&nb),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.0.cmp(&b.0),
    });

    slides.into_iter().map(|(path, _)| path).collect()
}

/// Turn a relationship target into an archive path.
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        absolute.to_string()
    } else {
        format!("ppt/{}", target)
    }
}

/// Extract a slide number from a string like "slides/slide3.xml".
fn extract_slide_number(s: &str) -> Option<usize> {
    let s = s.trim_end_matches(".xml").trim_end_matches(".rels");

    let digits: String = s.chars().rev().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    let digits: String = digits.chars().rev().collect();
    digits.parse().ok()
}
