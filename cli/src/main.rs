use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use netstat_schema_core::{Record, RecordMode, validate_records};
use netstat_schema_parser::{OutputFormat, ParseConfig, ParseOptions, format_records, parse_netstat};
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "netstat-json")]
#[command(about = "Convert netstat output into structured records")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse netstat output from a file.
    ParseFile(ParseFileArgs),
    /// Parse netstat output from stdin.
    ParseStdin(ParseStdinArgs),
    /// Validate one or more JSON record files.
    Validate(ValidateArgs),
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Keep every field as text (skip integer coercion).
    #[arg(long)]
    raw: bool,
    /// Suppress the platform compatibility warning.
    #[arg(long)]
    quiet: bool,
    /// Output format (overrides the config file).
    #[arg(long)]
    format: Option<OutputFormat>,
    /// YAML file with default parse settings.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    /// Path to captured netstat output.
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    parse: ParseArgs,
}

#[derive(Debug, Args)]
struct ParseStdinArgs {
    #[command(flatten)]
    parse: ParseArgs,
}

#[derive(Debug, Args)]
struct ValidateArgs {
    /// Expect raw (unnormalized) records.
    #[arg(long)]
    raw: bool,
    /// JSON files holding a record array.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::ParseFile(args) => run_parse_file(args),
        Command::ParseStdin(args) => run_parse_stdin(args),
        Command::Validate(args) => run_validate(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run_parse_file(args: ParseFileArgs) -> Result<(), String> {
    let text = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    run_parse(&text, &args.parse)
}

fn run_parse_stdin(args: ParseStdinArgs) -> Result<(), String> {
    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    run_parse(&text, &args.parse)
}

/// Merges command-line flags over the optional config file.
fn resolve_settings(args: &ParseArgs) -> Result<(ParseOptions, OutputFormat), String> {
    let config = match &args.config {
        Some(path) => ParseConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => ParseConfig::default(),
    };

    let options = ParseOptions {
        raw: args.raw || config.raw,
        quiet: args.quiet || config.quiet,
    };
    let format = args.format.unwrap_or(config.format);
    Ok((options, format))
}

fn run_parse(text: &str, args: &ParseArgs) -> Result<(), String> {
    let (options, format) = resolve_settings(args)?;
    let result = parse_netstat(text, &options);
    debug!(
        records = result.records.len(),
        dialect = ?result.dialect,
        "Parsed netstat input"
    );

    let rendered = format_records(&result.records, format)
        .map_err(|err| format!("Failed to format records: {err}"))?;
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), String> {
    let mode = if args.raw {
        RecordMode::Raw
    } else {
        RecordMode::Normalized
    };

    let mut total_records = 0;
    let mut total_errors = 0;
    for path in &args.inputs {
        let raw = fs::read_to_string(path)
            .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
        let records: Vec<Record> = serde_json::from_str(&raw)
            .map_err(|err| format!("Failed to parse '{}': {err}", path.display()))?;

        let errors = validate_records(&records, mode);
        for error in &errors {
            eprintln!("{}: {error}", path.display());
        }
        total_records += records.len();
        total_errors += errors.len();
    }

    if total_errors > 0 {
        return Err(format!("{total_errors} validation error(s) found"));
    }

    println!(
        "Validated {total_records} record(s) in {} file(s).",
        args.inputs.len()
    );
    Ok(())
}
