#![deny(missing_docs)]

//! # RestDocs CLI
//!
//! Command Line Interface for working with generated API documentation snippets.
//!
//! Supported Commands:
//! - `assemble`: Writes an index document including every generated snippet.
//! - `list`: Prints the documented operations and their snippets.

use clap::{Parser, Subcommand};

use crate::error::CliResult;

mod assemble;
mod catalog;
mod error;
mod list;

#[derive(Parser, Debug)]
#[clap(author, version, about = "RestDocs snippet toolchain")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble generated snippets into a single index document.
    Assemble(assemble::AssembleArgs),
    /// List documented operations and their snippets.
    List(list::ListArgs),
}

fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Assemble(args) => assemble::execute(args)?,
        Commands::List(args) => list::execute(args)?,
    }

    Ok(())
}
