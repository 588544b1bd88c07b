//! `stree` CLI: read, edit, walk and diff JSON/YAML documents by field path.
//!
//! ## Usage
//!
//! ```sh
//! # Print one value
//! stree get .servers[0].host -i deploy.yaml
//!
//! # Set a value (synthesizing missing maps/lists) and write the result
//! stree set .limits.cpu 2 -i deploy.yaml -o deploy.yaml
//!
//! # List every leaf path
//! echo '{"a":{"b":[1,2]}}' | stree paths
//!
//! # Compare two documents (exit status 1 when they differ)
//! stree diff old.json new.json --all
//!
//! # Show the traversal with keys sorted
//! stree walk -i deploy.yaml
//!
//! # Annotate YAML source lines with their field paths
//! stree lines -i deploy.yaml
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::cell::RefCell;
use std::io::{self, Read};
use std::path::Path;
use std::process::ExitCode;
use stree_core::yaml_lines;
use stree_core::{FieldComparison, FieldPath, FnVisitor, Format, Value};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "stree",
    version,
    about = "Path-addressed reading, editing and diffing of JSON/YAML documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Input format (detected from the file extension when omitted, else JSON)
    #[arg(long, global = true, value_enum)]
    format: Option<FormatArg>,

    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG applies otherwise
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Json,
    Yaml,
}

impl From<FormatArg> for Format {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => Format::Json,
            FormatArg::Yaml => Format::Yaml,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a field path
    Get {
        /// Field path, e.g. `.servers[0].host`
        path: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Format for composite values (defaults to the input format)
        #[arg(long, value_enum)]
        output_format: Option<FormatArg>,
    },
    /// Set the value at a field path and print the new document
    Set {
        /// Field path, e.g. `.servers[0].port`
        path: String,
        /// New value as a YAML literal (`5`, `true`, `x`, `[1, 2]`, `{a: 1}`)
        value: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Output format (defaults to the input format)
        #[arg(long, value_enum)]
        output_format: Option<FormatArg>,
    },
    /// Print every leaf path, sorted
    Paths {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Compare two documents leaf by leaf
    Diff {
        /// Subject document
        subject: String,
        /// Object document
        object: String,
        /// Also print paths with no difference
        #[arg(long)]
        all: bool,
    },
    /// Print the depth-first traversal with map keys sorted
    Walk {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Print each key line of a YAML source with its field path
    Lines {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Get {
            path,
            input,
            output_format,
        } => {
            let (tree, format) = read_document(input.as_deref(), cli.format)?;
            let value = tree
                .get(&path)
                .with_context(|| format!("Failed to get {}", path))?;
            let out_format = output_format.map(Format::from).unwrap_or(format);
            let text = if value.is_primitive() {
                format!("{}\n", value)
            } else {
                render(value, out_format)?
            };
            write_output(None, &text)?;
        }
        Commands::Set {
            path,
            value,
            input,
            output,
            output_format,
        } => {
            let (tree, format) = read_document(input.as_deref(), cli.format)?;
            let value = stree_core::decode_yaml_value(&value)
                .with_context(|| format!("Failed to parse value: {}", value))?;
            let updated = tree
                .set_val(&path, value)
                .with_context(|| format!("Failed to set {}", path))?;
            let out_format = output_format.map(Format::from).unwrap_or(format);
            write_output(output.as_deref(), &render(&updated, out_format)?)?;
        }
        Commands::Paths { input } => {
            let (tree, _) = read_document(input.as_deref(), cli.format)?;
            let mut paths: Vec<String> = tree.field_paths().iter().map(|p| p.to_string()).collect();
            paths.sort();
            let mut text = String::new();
            for path in paths {
                text.push_str(&path);
                text.push('\n');
            }
            write_output(None, &text)?;
        }
        Commands::Diff {
            subject,
            object,
            all,
        } => {
            let (subject_tree, _) = read_document(Some(subject.as_str()), cli.format)?;
            let (object_tree, _) = read_document(Some(object.as_str()), cli.format)?;
            let cmp = subject_tree.compare_to(&object_tree);

            let mut text = String::new();
            for (path, classification) in cmp.iter() {
                if all || classification != FieldComparison::NoDifference {
                    text.push_str(&format!("{}\t{}\n", path, classification));
                }
            }
            write_output(None, &text)?;

            if !cmp.is_identical() {
                tracing::debug!(differences = cmp.differences().count(), "documents differ");
                return Ok(ExitCode::from(1));
            }
        }
        Commands::Walk { input } => {
            let (tree, _) = read_document(input.as_deref(), cli.format)?;
            write_output(None, &walk_listing(&tree))?;
        }
        Commands::Lines { input } => {
            let text = read_input(input.as_deref())?;
            let mut out = String::new();
            yaml_lines::scan(&text, |line| {
                out.push_str(&format!("{}\t{}\t{}\n", line.number, line.path, line.value));
            })
            .context("Failed to scan YAML lines")?;
            write_output(None, &out)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Install the stderr log subscriber. `-v` flags win over `RUST_LOG`.
fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read and decode a document, returning it with the format it was read as.
fn read_document(path: Option<&str>, format: Option<FormatArg>) -> Result<(Value, Format)> {
    let format = format
        .map(Format::from)
        .or_else(|| path.and_then(|p| Format::from_path(Path::new(p))))
        .unwrap_or(Format::Json);
    let text = read_input(path)?;
    let tree = stree_core::decode(&text, format).with_context(|| match path {
        Some(path) => format!("Failed to decode {:?} document: {}", format, path),
        None => format!("Failed to decode {:?} document from stdin", format),
    })?;
    Ok((tree, format))
}

/// Encode a value for output, always ending with a newline.
fn render(value: &Value, format: Format) -> Result<String> {
    let mut text = stree_core::encode(value, format, true).context("Failed to encode document")?;
    if !text.ends_with('\n') {
        text.push('\n');
    }
    Ok(text)
}

/// One line per traversal event, indented by depth.
fn walk_listing(tree: &Value) -> String {
    fn label(path: &FieldPath) -> String {
        if path.is_empty() {
            "<root>".to_string()
        } else {
            path.to_string()
        }
    }

    let out = RefCell::new(Vec::new());
    let mut visitor = FnVisitor::<std::convert::Infallible>::new()
        .on_map_begin(|path, _| {
            out.borrow_mut().push(format!("{:w$}{} {{", "", label(path), w = 2 * path.len()));
            Ok(())
        })
        .on_map_end(|path, _| {
            out.borrow_mut().push(format!("{:w$}}}", "", w = 2 * path.len()));
            Ok(())
        })
        .on_list_begin(|path, _| {
            out.borrow_mut().push(format!("{:w$}{} [", "", label(path), w = 2 * path.len()));
            Ok(())
        })
        .on_list_end(|path, _| {
            out.borrow_mut().push(format!("{:w$}]", "", w = 2 * path.len()));
            Ok(())
        })
        .on_leaf(|path, value| {
            let line = format!("{:w$}{} = {}", "", label(path), value, w = 2 * path.len());
            out.borrow_mut().push(line);
            Ok(())
        });
    if let Err(never) = tree.visit_ordered(&mut visitor, |a, b| a.cmp(b)) {
        match never {}
    }
    drop(visitor);

    let mut text = out.into_inner().join("\n");
    text.push('\n');
    text
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
