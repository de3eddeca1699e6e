//! SPDX 3 Merge CLI
//!
//! Command-line tool for merging SPDX 3 documents into one document.

use std::path::PathBuf;

use clap::{ArgAction, Args, CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use spdx3_merge::{
    merge, write_to_path, AuthorSpec, ImportSpec, InputSource, MergeError, MergeOptions,
    RandomIdSource,
};

#[derive(Parser)]
#[command(name = "spdx3-merge")]
#[command(about = "Merge SPDX 3 Documents")]
#[command(version)]
struct Cli {
    /// Input SPDX 3 Document (path or URL). The new document root elements
    /// will be copied from the first listed document
    #[arg(short, long = "input", value_name = "PATH")]
    input: Vec<String>,

    /// Output file
    #[arg(short, long)]
    output: PathBuf,

    /// Write a pretty output file (e.g. with whitespace and indentation)
    #[arg(long)]
    pretty: bool,

    /// Import external SPDX ID in another document as an external reference.
    /// URL, ALGORITHM and HASH may be empty strings
    #[arg(
        long = "import",
        num_args = 4,
        value_names = ["SPDXID", "URL", "ALGORITHM", "HASH"],
        action = ArgAction::Append,
        allow_hyphen_values = true
    )]
    imports: Vec<String>,

    #[command(flatten)]
    authors: AuthorArgs,
}

/// Set Document Author (choose at least one)
#[derive(Args)]
#[command(next_help_heading = "Document Author")]
struct AuthorArgs {
    /// Create Person with name NAME as a document author
    #[arg(long, value_name = "NAME")]
    author_person: Vec<String>,

    /// Create Organization with name NAME as a document author
    #[arg(long, value_name = "NAME")]
    author_org: Vec<String>,

    /// Create SoftwareAgent with name NAME as a document author
    #[arg(long, value_name = "NAME")]
    author_software_agent: Vec<String>,

    /// Add SPDXID as a document author (may need to add an --import also)
    #[arg(long, value_name = "SPDXID")]
    author_spdxid: Vec<String>,
}

impl From<AuthorArgs> for AuthorSpec {
    fn from(args: AuthorArgs) -> Self {
        AuthorSpec {
            persons: args.author_person,
            organizations: args.author_org,
            software_agents: args.author_software_agent,
            spdx_ids: args.author_spdxid,
        }
    }
}

fn run(cli: Cli) -> Result<(), MergeError> {
    let imports = cli
        .imports
        .chunks(4)
        .map(ImportSpec::from_cli)
        .collect::<Result<Vec<_>, _>>()?;

    let options = MergeOptions {
        imports,
        authors: cli.authors.into(),
        ..Default::default()
    };

    let sources: Vec<InputSource> = cli.input.iter().map(|s| InputSource::parse(s)).collect();

    let result = merge(&sources, &options, &mut RandomIdSource)?;

    tracing::info!(
        inputs = result.stats.inputs,
        documents = result.stats.input_documents,
        elements = result.stats.elements,
        imports = result.stats.imports,
        authors = result.stats.authors,
        renamed_blank_nodes = result.stats.renamed_blank_nodes,
        "merged documents"
    );

    if !result.unresolved.is_empty() {
        println!("WARNING: The following SPDX IDs are unresolved:");
        for id in &result.unresolved {
            println!("  {}", id);
        }
    }

    write_to_path(&result.objects, &cli.output, cli.pretty)?;
    tracing::info!(output = %cli.output.display(), "wrote merged document");

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => {}
        Err(MergeError::Configuration(msg)) => {
            println!("ERROR: {}", msg);
            let _ = Cli::command().print_help();
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
