//! CLI tool for viewing, editing, and stripping office document metadata.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use docmeta_container::MetadataProcessor;
use docmeta_core::{DocumentFormat, EditableMap, Metadata, PropertyValue};
use indexmap::IndexMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// View, edit, and strip metadata of office documents.
#[derive(Parser, Debug)]
#[command(name = "docmeta")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the metadata of one or more documents
    Show {
        /// Input document(s) (.docx, .pptx, .xlsx, .odt, ...)
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Print the extracted metadata as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set editable properties and write an edited copy
    Set {
        /// Input document
        input: PathBuf,

        /// Property to set, as name=value (repeat a name to set a list)
        #[arg(short, long = "set", value_name = "NAME=VALUE", required = true)]
        set: Vec<String>,

        /// Output file (default: <stem>.edited.<ext> next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Remove all metadata and write a stripped copy
    Strip {
        /// Input document(s)
        #[arg(required = true)]
        input: Vec<PathBuf>,

        /// Output directory (default: same as input file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let processor = MetadataProcessor::new();

    match &args.command {
        Command::Show { input, json } => {
            for input_path in input {
                match show_file(&processor, input_path, *json) {
                    Ok(output) => print!("{}", output),
                    Err(e) => eprintln!("Error processing {}: {:#}", input_path.display(), e),
                }
            }
        }
        Command::Set { input, set, output } => {
            let data = read_input(input)?;
            let edits = parse_assignments(set)?;

            let metadata = processor
                .extract(&data)
                .with_context(|| format!("Failed to read metadata from {}", input.display()))?;
            let editable = apply_assignments(metadata.editable, edits)?;
            let edited = processor
                .edit(&data, &editable)
                .with_context(|| format!("Failed to edit {}", input.display()))?;

            let output_path = match output {
                Some(path) => path.clone(),
                None => get_output_path(input, None, "edited")?,
            };
            write_output(&output_path, &edited)?;
            if args.verbose {
                eprintln!("Written to: {}", output_path.display());
            }
        }
        Command::Strip { input, output } => {
            for input_path in input {
                if args.verbose {
                    eprintln!("Processing: {}", input_path.display());
                }

                match strip_file(&processor, input_path, output.as_ref()) {
                    Ok(output_path) => {
                        if args.verbose {
                            eprintln!("Written to: {}", output_path.display());
                        }
                    }
                    Err(e) => eprintln!("Error processing {}: {:#}", input_path.display(), e),
                }
            }
        }
    }

    Ok(())
}

/// Read a document, rejecting anything that is not a zip container.
fn read_input(input_path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)
        .with_context(|| format!("Failed to read {}", input_path.display()))?;

    if !DocumentFormat::is_zip(&data) {
        bail!("Not a zip-based office document");
    }

    let format = input_path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(DocumentFormat::from_filename);
    match format {
        Some(format) => log::debug!("Reading {} ({})", input_path.display(), format.mime_type()),
        None => log::warn!("Unrecognized extension on {}", input_path.display()),
    }

    Ok(data)
}

fn show_file(processor: &MetadataProcessor<'_>, input_path: &Path, json: bool) -> Result<String> {
    let data = read_input(input_path)?;
    let metadata = processor.extract(&data)?;

    if json {
        let mut output = serde_json::to_string_pretty(&metadata)?;
        output.push('\n');
        return Ok(output);
    }

    Ok(format!("{}:\n{}", input_path.display(), format_metadata(&metadata)))
}

/// Render metadata as `name: display [raw]` lines.
fn format_metadata(metadata: &Metadata) -> String {
    let mut output = String::new();

    for (name, record) in &metadata.editable {
        if record.display_value == record.value {
            output.push_str(&format!("  {}: {}\n", name, record.display_value));
        } else {
            output.push_str(&format!(
                "  {}: {} [{}]\n",
                name, record.display_value, record.value
            ));
        }
    }

    for (name, record) in &metadata.read_only {
        output.push_str(&format!("  {} (read-only):\n", name));
        for value in &record.display_value {
            output.push_str(&format!("    - {}\n", value));
        }
    }

    output
}

/// Group `name=value` arguments by name, keeping first-seen order.
fn parse_assignments(assignments: &[String]) -> Result<IndexMap<String, Vec<String>>> {
    let mut edits: IndexMap<String, Vec<String>> = IndexMap::new();

    for assignment in assignments {
        let Some((name, value)) = assignment.split_once('=') else {
            bail!("Expected NAME=VALUE, got '{}'", assignment);
        };
        edits
            .entry(name.trim().to_string())
            .or_default()
            .push(value.to_string());
    }

    Ok(edits)
}

fn apply_assignments(
    mut editable: EditableMap,
    edits: IndexMap<String, Vec<String>>,
) -> Result<EditableMap> {
    for (name, mut values) in edits {
        let Some(record) = editable.get_mut(&name) else {
            bail!("Unknown property '{}'", name);
        };

        record.value = if values.len() == 1 {
            PropertyValue::Scalar(values.remove(0))
        } else {
            PropertyValue::List(values)
        };
        log::debug!("Setting {} = {}", name, record.value);
    }

    Ok(editable)
}

fn strip_file(
    processor: &MetadataProcessor<'_>,
    input_path: &Path,
    output_dir: Option<&PathBuf>,
) -> Result<PathBuf> {
    let data = read_input(input_path)?;
    let stripped = processor.remove(&data)?;

    let output_path = get_output_path(input_path, output_dir, "stripped")?;
    write_output(&output_path, &stripped)?;
    Ok(output_path)
}

/// Determine the output path for a processed file.
fn get_output_path(input_path: &Path, output_dir: Option<&PathBuf>, suffix: &str) -> Result<PathBuf> {
    let stem = input_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");

    let output_filename = match input_path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}.{}.{}", stem, suffix, ext),
        None => format!("{}.{}", stem, suffix),
    };

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
fn write_output(path: &Path, content: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(content)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
