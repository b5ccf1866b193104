//! Legacy PPT extraction through an external converter process.
//!
//! The converter (a Java tool built on Apache POI) takes a `.ppt` path and
//! prints each slide's text after a `--- Slide <N> ---` marker line. Uploads
//! are staged in a private temporary directory that is removed on every exit
//! path, including converter failures.

use deck_core::{parse_converter_output, Error, Result, SlideRecord};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Default location of the converter jar, relative to the working directory.
pub const DEFAULT_CONVERTER_JAR: &str =
    "ppt_converter/target/ppt-converter-1.0-jar-with-dependencies.jar";

/// File name used for staged uploads inside their temporary directory.
const STAGED_FILE_NAME: &str = "upload.ppt";

/// Runs an external tool that turns a `.ppt` file into slide-delimited text.
pub trait Converter {
    /// Convert the file at `path`, returning the tool's standard output.
    fn convert(&self, path: &Path) -> Result<String>;
}

impl<C: Converter + ?Sized> Converter for Box<C> {
    fn convert(&self, path: &Path) -> Result<String> {
        (**self).convert(path)
    }
}

/// Converter invoked as `java -jar <jar> <path>`.
#[derive(Debug, Clone)]
pub struct JavaConverter {
    java: PathBuf,
    jar: PathBuf,
}

impl JavaConverter {
    /// Create a converter using the given Java executable and jar.
    pub fn new(java: impl Into<PathBuf>, jar: impl Into<PathBuf>) -> Self {
        Self {
            java: java.into(),
            jar: jar.into(),
        }
    }

    /// The jar this converter runs.
    pub fn jar(&self) -> &Path {
        &self.jar
    }
}

impl Default for JavaConverter {
    fn default() -> Self {
        Self::new("java", DEFAULT_CONVERTER_JAR)
    }
}

impl Converter for JavaConverter {
    fn convert(&self, path: &Path) -> Result<String> {
        log::debug!(
            "Running {} -jar {} {}",
            self.java.display(),
            self.jar.display(),
            path.display()
        );

        let output = Command::new(&self.java)
            .arg("-jar")
            .arg(&self.jar)
            .arg(path)
            .output()
            .map_err(|e| Error::ConverterFailed {
                status: format!("failed to launch {}", self.java.display()),
                stderr: e.to_string(),
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            log::warn!("Converter stdout: {}", stdout);
            log::warn!("Converter stderr: {}", stderr);
            return Err(Error::ConverterFailed {
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(stdout)
    }
}

/// What to do when the converter fails or its output cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LegacyPolicy {
    /// Log the failure and report no slides.
    #[default]
    Lenient,
    /// Return the error to the caller.
    Strict,
}

/// Extracts slide text from legacy `.ppt` files.
#[derive(Debug, Clone, Default)]
pub struct LegacyExtractor<C = JavaConverter> {
    converter: C,
    policy: LegacyPolicy,
}

impl<C: Converter> LegacyExtractor<C> {
    /// Create an extractor around a converter, using the lenient policy.
    pub fn new(converter: C) -> Self {
        Self {
            converter,
            policy: LegacyPolicy::default(),
        }
    }

    /// Set the failure policy.
    pub fn with_policy(mut self, policy: LegacyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The configured failure policy.
    pub fn policy(&self) -> LegacyPolicy {
        self.policy
    }

    /// Extract slide records from a `.ppt` file on disk.
    pub fn extract_file(&self, path: &Path) -> Result<Vec<SlideRecord>> {
        let result = self
            .converter
            .convert(path)
            .and_then(|stdout| parse_converter_output(&stdout));
        self.apply_policy(result)
    }

    /// Extract slide records from uploaded `.ppt` bytes.
    ///
    /// The bytes are written to a fresh temporary directory for the converter
    /// and deleted afterwards.
    pub fn extract_bytes(&self, bytes: &[u8]) -> Result<Vec<SlideRecord>> {
        let staging = tempfile::Builder::new().prefix("deck-ppt-").tempdir()?;
        let path = staging.path().join(STAGED_FILE_NAME);
        fs::write(&path, bytes)?;

        let records = self.extract_file(&path);

        if let Err(e) = staging.close() {
            log::warn!("Failed to remove staged upload: {}", e);
        }

        records
    }

    fn apply_policy(&self, result: Result<Vec<SlideRecord>>) -> Result<Vec<SlideRecord>> {
        match result {
            Ok(records) => Ok(records),
            Err(e @ (Error::ConverterFailed { .. } | Error::MalformedConverterOutput(_)))
                if self.policy == LegacyPolicy::Lenient =>
            {
                log::warn!("Legacy extraction failed, returning no slides: {}", e);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }
}
