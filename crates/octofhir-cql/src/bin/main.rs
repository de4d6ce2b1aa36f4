//! cql-scope command-line interface

use anyhow::Result;
use clap::{Parser, Subcommand};
use octofhir_cql::cli::output::{self, OutputFormat};
use octofhir_cql::cli::query::{self, AggregateKind, KindArg, Query, QueryConfig};
use octofhir_cql::cli::validate::{self, ValidateConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// CQL library scope tool
#[derive(Parser)]
#[command(name = "cql-scope")]
#[command(author, version, about = "Query and validate CQL library scope trees", long_about = None)]
struct Cli {
    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (json, table, pretty)
    #[arg(short = 'f', long, global = true)]
    format: Option<String>,

    /// Output file (default: stdout)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    color: String,

    /// Library search paths
    #[arg(short = 'L', long = "library-path", global = true)]
    library_paths: Vec<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a code reference (`Lib-version|alias|name` or a local name)
    Code {
        /// Scope JSON file
        file: PathBuf,
        reference: String,
    },

    /// Resolve a value set reference
    Valueset {
        /// Scope JSON file
        file: PathBuf,
        reference: String,
    },

    /// List symbols of one kind from the directly included libraries
    Aggregate {
        /// Scope JSON file
        file: PathBuf,
        #[arg(value_enum)]
        kind: AggregateKind,
    },

    /// List `alias.name` identifiers of one kind from the direct includes
    Identifiers {
        /// Scope JSON file
        file: PathBuf,
        #[arg(value_enum)]
        kind: KindArg,
    },

    /// List local definition and function names
    Names {
        /// Scope JSON file
        file: PathBuf,
    },

    /// Show readable definition, function and code listings
    Listing {
        /// Scope JSON file
        file: PathBuf,
    },

    /// Validate scope files
    Validate {
        /// Scope JSON files to validate
        files: Vec<PathBuf>,

        /// Strict mode (warnings as errors)
        #[arg(short, long)]
        strict: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // Also installs the `log` bridge for the library crates
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run(cli: Cli) -> Result<bool> {
    let format = cli
        .format
        .as_deref()
        .map(OutputFormat::parse)
        .unwrap_or(OutputFormat::JsonPretty);

    let (file, query) = match cli.command {
        Commands::Validate { files, strict } => {
            let summary = validate::validate(ValidateConfig {
                files,
                strict,
                library_paths: cli.library_paths,
            })?;
            return Ok(!summary.failed());
        }
        Commands::Code { file, reference } => (file, Query::Code(reference)),
        Commands::Valueset { file, reference } => (file, Query::ValueSet(reference)),
        Commands::Aggregate { file, kind } => (file, Query::Aggregate(kind)),
        Commands::Identifiers { file, kind } => (file, Query::Identifiers(kind)),
        Commands::Names { file } => (file, Query::Names),
        Commands::Listing { file } => (file, Query::Listing),
    };

    let config = QueryConfig {
        file,
        library_paths: cli.library_paths,
        format,
        output_file: cli.output,
    };
    query::run(config, query)?;
    Ok(true)
}

fn main() {
    human_panic::setup_panic!();

    let cli = Cli::parse();

    output::setup_colors(&cli.color);
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", output::format_error(&e));
            std::process::exit(1);
        }
    }
}
