//! proptree - Inspect reflected object graphs as property documents.
//!
//! Usage:
//!   proptree dump <SCENE>              Print the property tree
//!   proptree dump <SCENE> -f json      Print the property document as JSON
//!   proptree events <SCENE>            Print the raw visitor events
//!   proptree --help                    Show help

mod schema;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use itertools::Itertools;
use proptree_bridge::{DocumentBuilder, Recorder, ReflectionBridge, TraversalReport, Visitor};
use proptree_core::{TraversalConfig, TypeId, Value};
use proptree_reflect::memory::MemoryIntrospection;
use tracing_subscriber::EnvFilter;

use crate::schema::{LoadedScene, Scene};

#[derive(Parser)]
#[command(
    name = "proptree",
    version,
    about = "Inspect reflected object graphs as property documents",
    long_about = "proptree loads a scene file (type declarations plus one root instance), \
                  walks it the way a property editor would, and prints what the editor \
                  would show."
)]
struct Cli {
    /// Log traversal diagnostics to stderr (RUST_LOG overrides the level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the property tree of a scene
    Dump {
        /// Scene file
        scene: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        traversal: TraversalArgs,
    },

    /// Print every visitor event as one JSON line
    Events {
        /// Scene file
        scene: PathBuf,

        #[command(flatten)]
        traversal: TraversalArgs,
    },
}

#[derive(clap::Args)]
struct TraversalArgs {
    /// Show the root object itself instead of only its children
    #[arg(long)]
    show_root: bool,

    /// Deliver strings as text values instead of objects
    #[arg(long)]
    text_strings: bool,

    /// Maximum number of warnings to keep
    #[arg(long)]
    max_warnings: Option<usize>,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Dump {
            scene,
            format,
            traversal,
        } => run_dump(&scene, format, &traversal)?,
        Command::Events { scene, traversal } => run_events(&scene, &traversal)?,
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "proptree=debug" } else { "proptree=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the property tree or document of a scene.
fn run_dump(path: &Path, format: OutputFormat, args: &TraversalArgs) -> Result<()> {
    let mut builder = DocumentBuilder::new();
    let report = traverse(path, args, &mut builder)?;
    let document = builder.into_document();

    match format {
        OutputFormat::Text => {
            if let Some(rows) = document.as_array() {
                print_rows(rows, 0);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    print_warnings(&report);
    Ok(())
}

/// Print the raw event log of a scene.
fn run_events(path: &Path, args: &TraversalArgs) -> Result<()> {
    let mut recorder = Recorder::new();
    let report = traverse(path, args, &mut recorder)?;

    for event in recorder.events() {
        println!("{}", serde_json::to_string(event)?);
    }

    print_warnings(&report);
    Ok(())
}

/// Load a scene and run `visitor` over its root.
fn traverse(path: &Path, args: &TraversalArgs, visitor: &mut dyn Visitor) -> Result<TraversalReport> {
    let scene = Scene::from_path(path).wrap_err_with(|| format!("Invalid scene {}", path.display()))?;
    let registry = scene.attribute_registry()?;
    let config = traversal_config(&scene.config, args)?;
    let LoadedScene {
        types,
        graph,
        root,
        root_type,
    } = scene.load().context("Failed to build scene instances")?;

    let introspection = MemoryIntrospection::new(&types, &graph);
    let mut bridge = ReflectionBridge::new(&introspection)
        .with_registry(registry)
        .with_config(config);
    if args.text_strings {
        bridge.register_text_handler(TypeId::STRING);
    }

    let report = bridge.visit(visitor, root, &root_type).context("Traversal failed")?;
    tracing::debug!(
        target: "proptree",
        objects = report.objects_begun,
        values = report.values,
        "dumped {}",
        path.display()
    );
    Ok(report)
}

/// Scene configuration with command line overrides applied.
fn traversal_config(base: &TraversalConfig, args: &TraversalArgs) -> Result<TraversalConfig> {
    let config = TraversalConfig::builder()
        .visit_from_root(base.visit_from_root && !args.show_root)
        .primitive_handlers(base.primitive_handlers)
        .collect_warnings(base.collect_warnings)
        .max_warnings(args.max_warnings.or(base.max_warnings))
        .build()?;
    Ok(config)
}

fn print_warnings(report: &TraversalReport) {
    if !report.has_warnings() {
        return;
    }
    eprintln!();
    eprintln!("{} warning(s) during traversal", report.warnings.len() as u64 + report.warnings_dropped);
    for warning in &report.warnings {
        eprintln!("  {}: {}", display_path(&warning.path), warning.message);
    }
}

/// Print document rows as an indented tree.
fn print_rows(rows: &[Value], depth: usize) {
    for row in rows.iter().filter_map(Value::as_object) {
        let label = row
            .get("label")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>");
        let mut line = format!("{}{}", "  ".repeat(depth), label);

        if let Some(value) = row.get("value") {
            line.push_str(" = ");
            line.push_str(&format_value(value));
        } else if let Some(value_type) = row.get("type").and_then(Value::as_str) {
            line.push_str(&format!(" [{value_type}]"));
        }
        if row.get("disabled").and_then(Value::as_bool) == Some(true) {
            line.push_str(" (read-only)");
        }
        println!("{line}");

        if let Some(children) = row.get("children").and_then(Value::as_array) {
            print_rows(children, depth + 1);
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Uint(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::String(v) => format!("{v:?}"),
        Value::Array(items) => format!("[{}]", items.iter().map(format_value).join(", ")),
        Value::Object(fields) => format!(
            "{{{}}}",
            fields
                .iter()
                .map(|(k, v)| format!("{k}: {}", format_value(v)))
                .join(", ")
        ),
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}
