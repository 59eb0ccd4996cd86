//! oas-trim CLI
//!
//! Command-line interface for filtering OpenAPI documents by tag.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use oas_trim::{
    check_document, filter_document, is_http_method, load_document_auto, render_document,
    split_tag_args, write_document, DocumentError, EmptyIncludePolicy, FilterOptions,
    FilterSummary, Severity,
};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "oas-trim")]
#[command(about = "Reduce an OpenAPI document to tag-matched operations")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter a document by operation tags, prune and inline components
    Filter {
        /// Document source: file path or URL (http:// or https://)
        document: String,

        /// Tags to include. Repeat or use comma-separated values; a
        /// trailing '*' requests prefix matching (e.g. 'sales*')
        #[arg(long, short = 'i', value_name = "TAG[,TAG...]")]
        include: Vec<String>,

        /// Tags to exclude. Same syntax; exclusion beats inclusion
        #[arg(long, short = 'x', value_name = "TAG[,TAG...]")]
        exclude: Vec<String>,

        /// Keep every tagged operation instead of requiring --include
        #[arg(long, required_unless_present = "include")]
        all: bool,

        /// Do not inline $ref/allOf in operation schemas (by default,
        /// schemas are inlined and components re-pruned)
        #[arg(long)]
        no_inline: bool,

        /// Output file (stdout if not specified)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Suppress the completion summary
        #[arg(long, short)]
        quiet: bool,
    },

    /// List the distinct operation tags in a document
    Tags {
        /// Document source: file path or URL
        document: String,

        /// Output as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Check a document for shape errors and filter hazards
    Check {
        /// Document source: file path or URL
        document: String,

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

    let result = match cli.command {
        Commands::Filter {
            document,
            include,
            exclude,
            all,
            no_inline,
            output,
            pretty,
            quiet,
        } => run_filter(FilterArgs {
            document,
            include,
            exclude,
            all,
            no_inline,
            output,
            pretty,
            quiet,
        }),

        Commands::Tags { document, json } => run_tags(&document, json),

        Commands::Check {
            document,
            format,
            strict,
        } => run_check(&document, &format, strict),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn fatal(err: DocumentError) -> u8 {
    eprintln!("Error: {}", err);
    err.exit_code() as u8
}

struct FilterArgs {
    document: String,
    include: Vec<String>,
    exclude: Vec<String>,
    all: bool,
    no_inline: bool,
    output: Option<PathBuf>,
    pretty: bool,
    quiet: bool,
}

fn run_filter(args: FilterArgs) -> Result<(), u8> {
    let spec = load_document_auto(&args.document).map_err(fatal)?;

    let policy = if args.all {
        EmptyIncludePolicy::MatchAll
    } else {
        EmptyIncludePolicy::MatchNone
    };
    let options = FilterOptions::new(split_tag_args(&args.include), split_tag_args(&args.exclude))
        .inline(!args.no_inline)
        .empty_include(policy);

    let outcome = filter_document(&spec, &options).map_err(fatal)?;

    match args.output {
        Some(path) => {
            write_document(&path, &outcome.document, args.pretty).map_err(fatal)?;
            if !args.quiet {
                print_summary(&outcome.summary, &path);
            }
        }
        None => {
            let rendered = render_document(&outcome.document, args.pretty).map_err(fatal)?;
            println!("{}", rendered);
        }
    }

    Ok(())
}

fn print_summary(summary: &FilterSummary, path: &std::path::Path) {
    println!(
        "Wrote filtered document with {} paths ({} operations, {} components) to {}",
        summary.paths,
        summary.operations,
        summary.components,
        path.display()
    );
    println!(
        "Included tags (exact): {:?}; prefixes: {:?}",
        summary.include_exact, summary.include_prefix
    );
    println!(
        "Excluded tags (exact): {:?}; prefixes: {:?}",
        summary.exclude_exact, summary.exclude_prefix
    );
}

fn run_tags(source: &str, json_output: bool) -> Result<(), u8> {
    let spec = load_document_auto(source).map_err(fatal)?;

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    if let Some(paths) = spec.get("paths").and_then(Value::as_object) {
        for entry in paths.values() {
            let Some(methods) = entry.as_object() else {
                continue;
            };
            for (method, operation) in methods {
                if !is_http_method(method) {
                    continue;
                }
                let Some(tags) = operation.get("tags").and_then(Value::as_array) else {
                    continue;
                };
                for tag in tags.iter().filter_map(Value::as_str) {
                    *counts.entry(tag.to_string()).or_insert(0) += 1;
                }
            }
        }
    }

    if json_output {
        let entries: Vec<Value> = counts
            .iter()
            .map(|(name, operations)| {
                serde_json::json!({ "name": name, "operations": operations })
            })
            .collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&Value::Array(entries)).map_err(|e| {
                eprintln!("Error serializing output: {}", e);
                2u8
            })?
        );
    } else if counts.is_empty() {
        println!("No tagged operations found");
    } else {
        let width = counts.keys().map(String::len).max().unwrap_or(0);
        for (name, operations) in &counts {
            println!("{:width$}  {}", name, operations, width = width);
        }
    }

    Ok(())
}

fn run_check(source: &str, format: &str, strict: bool) -> Result<(), u8> {
    let spec = load_document_auto(source).map_err(fatal)?;
    let result = check_document(&spec);

    if format == "json" {
        match serde_json::to_string_pretty(&result) {
            Ok(rendered) => println!("{}", rendered),
            Err(e) => {
                eprintln!("Error serializing output: {}", e);
                return Err(2);
            }
        }
    } else {
        for diag in &result.diagnostics {
            let (color, level) = match diag.severity {
                Severity::Error => ("\x1b[31m", "error"),
                Severity::Warning => ("\x1b[33m", "warning"),
            };
            println!(
                "  {}{}[{}]\x1b[0m: {} - {}",
                color, level, diag.code, diag.path, diag.message
            );
        }
        if result.passes(strict) {
            println!(
                "\x1b[32m✓ {} error(s), {} warning(s)\x1b[0m",
                result.errors, result.warnings
            );
        } else {
            println!(
                "\x1b[31m✗ {} error(s), {} warning(s)\x1b[0m",
                result.errors, result.warnings
            );
        }
    }

    if result.passes(strict) {
        Ok(())
    } else {
        Err(1)
    }
}
