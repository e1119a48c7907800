//! OpenAPI Reducer CLI
//!
//! Command-line interface for listing, reducing and checking OpenAPI documents.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgGroup, Parser, Subcommand};
use openapi_reduce::{
    check, check_file, is_url, load_spec_auto, CheckStatus, LoadOptions, LoadedSpec, Operation,
    SelectionSet, Severity,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "openapi-reduce")]
#[command(about = "Reduce an OpenAPI document to selected operations and their schemas")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List operations grouped by tag
    List {
        /// OpenAPI document: file path or URL (http:// or https://)
        spec: String,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Write a document containing only the selected operations and their schemas
    #[command(group(ArgGroup::new("selection").required(true).multiple(true).args(["op", "tag", "all"])))]
    Reduce {
        /// OpenAPI document: file path or URL (http:// or https://)
        spec: String,

        /// Select an operation by operationId (repeatable)
        #[arg(long)]
        op: Vec<String>,

        /// Select every operation with this tag (repeatable)
        #[arg(long)]
        tag: Vec<String>,

        /// Select every operation
        #[arg(long)]
        all: bool,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Fail when a schema reference names an undefined schema
        #[arg(long)]
        strict_refs: bool,

        /// Do not print selection statistics
        #[arg(long, short)]
        quiet: bool,
    },

    /// Check a document for broken schema refs and operationId problems
    Check {
        /// OpenAPI document: file path or URL (http:// or https://)
        spec: String,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::List { spec, format } => run_list(&spec, &format),
        Commands::Reduce {
            spec,
            op,
            tag,
            all,
            output,
            pretty,
            strict_refs,
            quiet,
        } => run_reduce(ReduceArgs {
            spec,
            ops: op,
            tags: tag,
            all,
            output,
            pretty,
            strict_refs,
            quiet,
        }),
        Commands::Check {
            spec,
            format,
            strict,
        } => run_check(&spec, &format, strict),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(spec: &str, options: &LoadOptions) -> Result<LoadedSpec, u8> {
    LoadedSpec::from_source(spec, options).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })
}

#[derive(Serialize)]
struct TagGroup<'a> {
    tag: &'a str,
    operations: Vec<&'a Operation>,
}

fn run_list(spec: &str, format: &str) -> Result<(), u8> {
    let loaded = load(spec, &LoadOptions::new())?;

    let groups: Vec<TagGroup> = loaded
        .catalog()
        .by_tag()
        .into_iter()
        .map(|(tag, mut operations)| {
            operations.sort_by(|a, b| a.path.cmp(&b.path).then(a.method.cmp(&b.method)));
            TagGroup { tag, operations }
        })
        .collect();

    if format == "json" {
        let output = serde_json::to_string_pretty(&groups).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", output);
        return Ok(());
    }

    for group in &groups {
        println!("{}", group.tag);
        for op in &group.operations {
            println!(
                "  {:<7} {:<40} {:>3} schemas  {}  {}",
                op.method.to_string(),
                op.path,
                op.schemas.len(),
                op.id(),
                op.summary
            );
        }
    }
    println!(
        "\n{} operations, {} schemas",
        loaded.catalog().len(),
        loaded.schemas().len()
    );
    Ok(())
}

struct ReduceArgs {
    spec: String,
    ops: Vec<String>,
    tags: Vec<String>,
    all: bool,
    output: Option<PathBuf>,
    pretty: bool,
    strict_refs: bool,
    quiet: bool,
}

fn run_reduce(args: ReduceArgs) -> Result<(), u8> {
    let ReduceArgs {
        spec,
        ops,
        tags,
        all,
        output,
        pretty,
        strict_refs,
        quiet,
    } = args;

    let options = LoadOptions::new().deny_unresolved(strict_refs);
    let loaded = load(&spec, &options)?;

    let mut selection = if all {
        SelectionSet::all(loaded.catalog())
    } else {
        SelectionSet::by_tags(loaded.catalog(), tags.as_slice())
    };
    selection.extend(ops);

    let reduced = loaded.reduce(&selection).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let json_output = if pretty {
        serde_json::to_string_pretty(&reduced.document)
    } else {
        serde_json::to_string(&reduced.document)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    if !quiet {
        let stats = reduced.stats;
        eprintln!(
            "Operations ({}/{}), Schemas ({}/{})",
            stats.operations_selected,
            stats.operations_total,
            stats.schemas_selected,
            stats.schemas_total
        );
    }

    Ok(())
}

fn run_check(spec: &str, format: &str, strict: bool) -> Result<(), u8> {
    let result = if is_url(spec) {
        match load_spec_auto(spec) {
            Ok(document) => check(&document),
            Err(e) => {
                eprintln!("Error: {}", e);
                return Err(e.exit_code() as u8);
            }
        }
    } else {
        check_file(std::path::Path::new(spec))
    };

    if format == "json" {
        let output = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", output);
    } else {
        for diag in &result.diagnostics {
            let color = match diag.severity {
                Severity::Error => "\x1b[31merror",
                Severity::Warning => "\x1b[33mwarning",
            };
            println!(
                "  {}[{}]\x1b[0m: {} - {}",
                color, diag.code, diag.path, diag.message
            );
        }

        match result.status {
            CheckStatus::Ok => println!("\x1b[32m✓ {} passed\x1b[0m", spec),
            CheckStatus::Warning => println!(
                "\x1b[33m⚠ {}: {} warnings\x1b[0m",
                spec, result.warnings
            ),
            CheckStatus::Error => println!(
                "\x1b[31m✗ {}: {} errors, {} warnings\x1b[0m",
                spec, result.errors, result.warnings
            ),
        }
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}
