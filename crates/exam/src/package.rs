//! Word document generation and ZIP bundling for exam packages.

use deck_core::{Error, Result};
use docx_rs::{Docx, LineSpacing, Paragraph, Run, Style, StyleType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Space after each numbered item, in twentieths of a point (6 pt).
const ITEM_SPACE_AFTER: u32 = 120;

const HEADING_STYLE_ID: &str = "Heading1";

/// A named set of questions and their answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamPackage {
    /// Base name for the documents and the archive.
    #[serde(rename = "document_name")]
    pub name: String,
    pub questions: Vec<String>,
    pub answers: Vec<String>,
}

impl ExamPackage {
    pub fn new(
        name: impl Into<String>,
        questions: impl IntoIterator<Item = impl Into<String>>,
        answers: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            questions: questions.into_iter().map(Into::into).collect(),
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }

    /// `<name>_questions.docx`
    pub fn questions_file_name(&self) -> String {
        format!("{}_questions.docx", self.name)
    }

    /// `<name>_answers.docx`
    pub fn answers_file_name(&self) -> String {
        format!("{}_answers.docx", self.name)
    }

    /// `<name>.zip`
    pub fn zip_file_name(&self) -> String {
        format!("{}.zip", self.name)
    }

    /// Check that the name can be used as a file name.
    pub fn validate(&self) -> Result<()> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::PackageError("Document name is empty".to_string()));
        }
        if name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(Error::PackageError(format!(
                "Document name must not be a path: {}",
                self.name
            )));
        }
        Ok(())
    }

    /// The questions document.
    pub fn questions_docx(&self) -> Result<Vec<u8>> {
        build_document(&format!("{} - Questions", self.name), &self.questions)
    }

    /// The answers document.
    pub fn answers_docx(&self) -> Result<Vec<u8>> {
        build_document(&format!("{} - Answers", self.name), &self.answers)
    }

    /// ZIP archive holding both documents at its root.
    pub fn to_zip(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let entries = [
            (self.questions_file_name(), self.questions_docx()?),
            (self.answers_file_name(), self.answers_docx()?),
        ];
        bundle(&entries)
    }

    /// Write both documents and the archive into `dir`, creating it if needed.
    ///
    /// Returns the path of the archive.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        self.validate()?;
        fs::create_dir_all(dir)?;

        let questions = self.questions_docx()?;
        let answers = self.answers_docx()?;
        fs::write(dir.join(self.questions_file_name()), &questions)?;
        fs::write(dir.join(self.answers_file_name()), &answers)?;

        let archive = bundle(&[
            (self.questions_file_name(), questions),
            (self.answers_file_name(), answers),
        ])?;
        let zip_path = dir.join(self.zip_file_name());
        fs::write(&zip_path, archive)?;

        log::info!("Wrote exam package to {}", zip_path.display());
        Ok(zip_path)
    }
}

/// A document with a level-one heading followed by numbered items.
fn build_document(heading: &str, items: &[String]) -> Result<Vec<u8>> {
    let heading_style = Style::new(HEADING_STYLE_ID, StyleType::Paragraph)
        .name("Heading 1")
        .size(32)
        .bold();

    let mut docx = Docx::new().add_style(heading_style).add_paragraph(
        Paragraph::new()
            .style(HEADING_STYLE_ID)
            .add_run(Run::new().add_text(heading)),
    );

    for (i, item) in items.iter().enumerate() {
        docx = docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(format!("{}. {}", i + 1, item)))
                .line_spacing(LineSpacing::new().after(ITEM_SPACE_AFTER)),
        );
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| Error::DocxError(format!("Error writing DOCX: {}", e)))?;
    Ok(buf.into_inner())
}

fn bundle(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, bytes) in entries {
        zip.start_file(name.as_str(), options)
            .map_err(|e| Error::ZipError(e.to_string()))?;
        zip.write_all(bytes)?;
    }

    let cursor = zip.finish().map_err(|e| Error::ZipError(e.to_string()))?;
    Ok(cursor.into_inner())
}
