#![deny(missing_docs)]

//! # List Command
//!
//! Prints each documented operation with the snippets generated for it.

use crate::catalog::{scan, Catalog};
use crate::error::CliResult;
use restdocs_core::TemplateFormatKind;
use std::path::PathBuf;

/// Arguments for the list command.
#[derive(clap::Args, Debug, Clone)]
pub struct ListArgs {
    /// Directory the snippets were generated into.
    #[clap(long, env = "RESTDOCS_OUTPUT_DIR", default_value = "target/generated-snippets")]
    pub snippets_dir: PathBuf,

    /// Markup of the snippets (`asciidoctor` or `markdown`).
    #[clap(long, env = "RESTDOCS_TEMPLATE_FORMAT", default_value = "asciidoctor")]
    pub format: TemplateFormatKind,
}

/// One line per operation: `identifier: snippet, snippet, ...`.
pub fn format_listing(catalog: &Catalog) -> String {
    catalog
        .iter()
        .map(|(identifier, snippets)| {
            let names: Vec<&str> = snippets.iter().map(|s| s.name.as_str()).collect();
            format!("{}: {}\n", identifier, names.join(", "))
        })
        .collect()
}

/// Executes the list command.
pub fn execute(args: &ListArgs) -> CliResult<()> {
    let catalog = scan(&args.snippets_dir, args.format)?;
    print!("{}", format_listing(&catalog));
    Ok(())
}
