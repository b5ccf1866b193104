//! CLI tool for extracting text from presentations and documents.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use deck_core::{DocumentFormat, SlideFormatter, SlideRecord, TextLayout};
use deck_docs::DocumentExtractor;
use deck_exam::ExamPackage;
use deck_ppt::{JavaConverter, LegacyExtractor, LegacyPolicy, DEFAULT_CONVERTER_JAR};
use deck_pptx::PptxParser;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

/// Extract slide text from PowerPoint files and plain text from documents.
#[derive(Parser, Debug)]
#[command(name = "deck-extract")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Input files (.pptx, .ppt, .pdf, .docx, .txt, .jpg, .jpeg, .png, .tiff)
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory (default: same as input file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print output to stdout instead of writing to file
    #[arg(short, long)]
    print: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Delimited)]
    format: OutputFormat,

    /// Java executable used for legacy .ppt conversion
    #[arg(long, default_value = "java")]
    java: PathBuf,

    /// Converter jar used for legacy .ppt conversion
    #[arg(long, default_value = DEFAULT_CONVERTER_JAR)]
    converter_jar: PathBuf,

    /// Fail on legacy converter errors instead of reporting no slides
    #[arg(long)]
    strict: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build question and answer Word documents and zip them
    Package {
        /// Base name for the documents and the archive
        #[arg(short, long)]
        name: String,

        /// Text file with one question per line
        #[arg(short, long)]
        questions: PathBuf,

        /// Text file with one answer per line
        #[arg(short, long)]
        answers: PathBuf,

        /// Output directory (default: current directory)
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// `Slide N:` headed blocks
    Text,
    /// `--- Slide N ---` marker blocks
    Delimited,
    /// JSON object per input
    Json,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Text | Self::Delimited => "txt",
        }
    }
}

/// What a single input produced.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Extracted {
    Slides {
        filename: String,
        slides: Vec<SlideRecord>,
    },
    Document {
        filename: String,
        text: String,
    },
}

/// Backends shared across all inputs of a run.
struct Extractors {
    pptx: PptxParser,
    legacy: LegacyExtractor,
    documents: DocumentExtractor,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if let Some(Command::Package {
        name,
        questions,
        answers,
        output,
    }) = &args.command
    {
        return run_package(name, questions, answers, output);
    }

    let policy = if args.strict {
        LegacyPolicy::Strict
    } else {
        LegacyPolicy::Lenient
    };
    let extractors = Extractors {
        pptx: PptxParser::new(),
        legacy: LegacyExtractor::new(JavaConverter::new(&args.java, &args.converter_jar))
            .with_policy(policy),
        documents: DocumentExtractor::new(),
    };

    for input_path in &args.input {
        if args.verbose {
            eprintln!("Processing: {}", input_path.display());
        }

        let result = process_file(input_path, &extractors)
            .and_then(|extracted| render(&extracted, args.format));

        match result {
            Ok(output) => {
                if args.print {
                    print!("{}", output);
                } else {
                    let output_path =
                        get_output_path(input_path, args.output.as_ref(), args.format)?;
                    write_output(&output_path, &output)?;
                    if args.verbose {
                        eprintln!("Written to: {}", output_path.display());
                    }
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {:#}", input_path.display(), e);
            }
        }
    }

    Ok(())
}

/// Extract slides or document text from a single file.
fn process_file(input_path: &Path, extractors: &Extractors) -> Result<Extracted> {
    let filename = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let format = match DocumentFormat::from_filename(&filename) {
        Some(format) => format,
        None => {
            let mut magic = [0u8; 8];
            let mut file = File::open(input_path)
                .with_context(|| format!("Failed to open {}", input_path.display()))?;
            let read = file
                .read(&mut magic)
                .with_context(|| "Failed to read file header")?;
            DocumentFormat::from_magic(&magic[..read])
                .ok_or_else(|| anyhow::anyhow!("Could not detect file format"))?
        }
    };

    let slides = match format {
        DocumentFormat::Pptx => {
            log::debug!("Parsing as PPTX");
            let file = File::open(input_path)
                .with_context(|| format!("Failed to open {}", input_path.display()))?;
            extractors.pptx.extract(BufReader::new(file))?
        }
        DocumentFormat::Ppt => {
            log::debug!("Converting legacy PPT");
            extractors.legacy.extract_file(input_path)?
        }
        _ => {
            log::debug!("Extracting document text as {:?}", format);
            let bytes = std::fs::read(input_path)
                .with_context(|| format!("Failed to read {}", input_path.display()))?;
            let text = extractors.documents.extract(&bytes, &filename)?;
            return Ok(Extracted::Document { filename, text });
        }
    };

    log::debug!("Found {} slides", slides.len());
    Ok(Extracted::Slides { filename, slides })
}

/// Render an extraction result in the requested format.
fn render(extracted: &Extracted, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        let mut json = serde_json::to_string_pretty(extracted)?;
        json.push('\n');
        return Ok(json);
    }

    let output = match extracted {
        Extracted::Slides { slides, .. } => {
            let layout = match format {
                OutputFormat::Text => TextLayout::Labeled,
                _ => TextLayout::Delimited,
            };
            SlideFormatter::new().with_layout(layout).format(slides)
        }
        Extracted::Document { text, .. } => format!("{}\n", text),
    };
    Ok(output)
}

/// Build an exam package from two line-per-item text files.
fn run_package(name: &str, questions: &Path, answers: &Path, output: &Path) -> Result<()> {
    let package = ExamPackage::new(name, read_items(questions)?, read_items(answers)?);
    let zip_path = package
        .write_to_dir(output)
        .with_context(|| format!("Failed to build exam package {}", name))?;
    println!("Exam package created: {}", zip_path.display());
    Ok(())
}

/// Non-empty, trimmed lines of a text file.
fn read_items(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Determine the output path for a processed file.
fn get_output_path(
    input_path: &Path,
    output_dir: Option<&PathBuf>,
    format: OutputFormat,
) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = format!("{}.{}", stem, format.extension());

    let output_path = match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
            dir.join(output_filename)
        }
        None => {
            if let Some(parent) = input_path.parent() {
                parent.join(output_filename)
            } else {
                PathBuf::from(output_filename)
            }
        }
    };

    Ok(output_path)
}

/// Write output to a file.
fn write_output(path: &Path, content: &str) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
